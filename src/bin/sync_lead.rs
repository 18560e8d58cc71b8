use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use lead_sync::http::{handle_sync_event, ApiGatewayResponse};
use lead_sync::utils::logger;
use lead_sync::{HandlerConfig, HubSpotClient, SupabaseLeadStore, SyncHandler};
use serde_json::Value;
use std::sync::Arc;

type Handler = SyncHandler<SupabaseLeadStore, HubSpotClient>;

async fn function_handler(
    handler: &Handler,
    event: LambdaEvent<Value>,
) -> Result<ApiGatewayResponse, Error> {
    tracing::debug!(request_id = %event.context.request_id, "Sync request received");
    Ok(handle_sync_event(event.payload, handler).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = HandlerConfig::from_env().map_err(|e| Box::new(e) as Error)?;
    // 缺少 token 時每個請求都回 500，而不是啟動失敗
    let crm = HubSpotClient::from_config(&config.crm)
        .inspect_err(|e| tracing::error!("HubSpot client unavailable: {}", e))
        .ok();
    let handler = SyncHandler::new(SupabaseLeadStore::new(&config.store), crm);
    let handler = Arc::new(handler);

    run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = Arc::clone(&handler);
        async move { function_handler(&handler, event).await }
    }))
    .await
}
