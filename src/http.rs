//! API Gateway / function URL glue around the two handlers.
//!
//! Events may be proxy events (REST v1 or HTTP v2 payloads) carrying the JSON
//! document in `body`, or the bare JSON document itself.

use crate::core::registration::RegistrationHandler;
use crate::core::sync::SyncHandler;
use crate::domain::model::{LeadSubmission, Registration, SyncRequest, SyncedContact};
use crate::domain::ports::{CrmClient, LeadStore};
use crate::utils::error::{LeadError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
const ALLOW_METHODS: &str = "POST, OPTIONS";

const STORE_FAILURE: &str = "Registration failed. Please try again.";
const UNEXPECTED_FAILURE: &str = "An unexpected error occurred";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

impl ApiGatewayResponse {
    pub fn body_json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

fn cors_headers() -> Map<String, Value> {
    let mut headers = Map::new();
    headers.insert("Access-Control-Allow-Origin".to_string(), json!("*"));
    headers.insert("Access-Control-Allow-Headers".to_string(), json!(ALLOW_HEADERS));
    headers.insert("Access-Control-Allow-Methods".to_string(), json!(ALLOW_METHODS));
    headers
}

fn json_response(status_code: u16, payload: Value) -> ApiGatewayResponse {
    let mut headers = cors_headers();
    headers.insert("Content-Type".to_string(), json!("application/json"));
    ApiGatewayResponse {
        status_code,
        headers: Value::Object(headers),
        body: payload.to_string(),
    }
}

fn error_response(status_code: u16, message: &str) -> ApiGatewayResponse {
    json_response(status_code, json!({ "success": false, "error": message }))
}

pub fn preflight_response() -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code: 200,
        headers: Value::Object(cors_headers()),
        body: "ok".to_string(),
    }
}

/// `httpMethod` (REST v1) or `requestContext.http.method` (HTTP v2, function URLs).
pub fn request_method(event: &Value) -> Option<&str> {
    event
        .get("httpMethod")
        .or_else(|| event.pointer("/requestContext/http/method"))
        .and_then(Value::as_str)
}

fn is_preflight(event: &Value) -> bool {
    request_method(event).is_some_and(|method| method.eq_ignore_ascii_case("OPTIONS"))
}

fn normalize_event(event: Value) -> std::result::Result<Value, String> {
    let Some(object) = event.as_object() else {
        return Err("Request payload must be a JSON object".to_string());
    };

    let Some(body) = object.get("body") else {
        return Ok(event);
    };

    if object.get("isBase64Encoded").and_then(Value::as_bool) == Some(true) {
        return Err("Base64 encoded bodies are not supported".to_string());
    }

    match body {
        Value::Null => Ok(json!({})),
        Value::Object(_) => Ok(body.clone()),
        Value::String(text) => {
            serde_json::from_str(text).map_err(|error| format!("Malformed JSON body: {error}"))
        }
        _ => Err("Request body must be a JSON object".to_string()),
    }
}

pub fn parse_payload<T: DeserializeOwned>(event: Value) -> std::result::Result<T, String> {
    let payload = normalize_event(event)?;
    serde_json::from_value(payload).map_err(|error| format!("Malformed request: {error}"))
}

pub fn registration_response(result: Result<Registration>) -> ApiGatewayResponse {
    match result {
        Ok(Registration::Registered { lead_id }) => json_response(
            200,
            json!({
                "success": true,
                "message": "Registration successful!",
                "lead_id": lead_id,
            }),
        ),
        Ok(Registration::AlreadyRegistered) => json_response(
            200,
            json!({
                "success": true,
                "message": "This email is already registered. Welcome back!",
                "already_registered": true,
            }),
        ),
        Err(LeadError::ValidationError(failure)) => error_response(400, &failure.to_string()),
        Err(LeadError::StoreError { .. }) => error_response(500, STORE_FAILURE),
        Err(e) => {
            tracing::error!("Unexpected error: {}", e);
            error_response(500, UNEXPECTED_FAILURE)
        }
    }
}

pub fn sync_response(result: Result<SyncedContact>) -> ApiGatewayResponse {
    match result {
        Ok(contact) => json_response(
            200,
            json!({
                "success": true,
                "action": contact.action,
                "hubspot_contact_id": contact.contact_id,
            }),
        ),
        Err(e) => {
            tracing::error!("Error syncing to HubSpot: {}", e);
            error_response(500, &e.to_string())
        }
    }
}

pub async fn handle_registration_event<S, C>(
    event: Value,
    handler: &RegistrationHandler<S, C>,
) -> ApiGatewayResponse
where
    S: LeadStore,
    C: CrmClient,
{
    if is_preflight(&event) {
        return preflight_response();
    }

    let submission = match parse_payload::<LeadSubmission>(event) {
        Ok(submission) => submission,
        Err(message) => {
            tracing::error!("Unexpected error: {}", message);
            return error_response(500, UNEXPECTED_FAILURE);
        }
    };

    registration_response(handler.register(submission).await)
}

pub async fn handle_sync_event<S, C>(event: Value, handler: &SyncHandler<S, C>) -> ApiGatewayResponse
where
    S: LeadStore,
    C: CrmClient,
{
    if is_preflight(&event) {
        return preflight_response();
    }

    let request = match parse_payload::<SyncRequest>(event) {
        Ok(request) => request,
        Err(message) => {
            tracing::warn!("Rejected sync payload: {}", message);
            return error_response(500, &message);
        }
    };

    sync_response(handler.sync(request).await)
}
