use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use lead_sync::http::{handle_registration_event, ApiGatewayResponse};
use lead_sync::utils::logger;
use lead_sync::{HandlerConfig, HubSpotClient, RegistrationHandler, SupabaseLeadStore};
use serde_json::Value;
use std::sync::Arc;

type Handler = RegistrationHandler<SupabaseLeadStore, HubSpotClient>;

async fn function_handler(
    handler: &Handler,
    event: LambdaEvent<Value>,
) -> Result<ApiGatewayResponse, Error> {
    tracing::debug!(request_id = %event.context.request_id, "Registration request received");
    Ok(handle_registration_event(event.payload, handler).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = HandlerConfig::from_env().map_err(|e| Box::new(e) as Error)?;
    let crm = match HubSpotClient::from_config(&config.crm) {
        Ok(client) => Some(client),
        Err(e) => {
            // 沒有 token 仍然接受註冊，只是不同步
            tracing::error!("HubSpot sync disabled: {}", e);
            None
        }
    };
    let handler = RegistrationHandler::new(SupabaseLeadStore::new(&config.store), crm);
    let handler = Arc::new(handler);

    run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = Arc::clone(&handler);
        async move { function_handler(&handler, event).await }
    }))
    .await
}
