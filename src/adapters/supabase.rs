use crate::config::StoreConfig;
use crate::domain::model::{Lead, NewLead};
use crate::domain::ports::LeadStore;
use crate::utils::error::{LeadError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};

/// Postgres `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Lead table behind Supabase's PostgREST endpoint, using the service-role key.
#[derive(Clone)]
pub struct SupabaseLeadStore {
    client: Client,
    table_url: String,
    service_role_key: String,
}

impl SupabaseLeadStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            client: Client::new(),
            table_url: format!(
                "{}/rest/v1/{}",
                config.url.trim_end_matches('/'),
                config.table
            ),
            service_role_key: config.service_role_key.clone(),
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }
}

async fn error_body(response: Response) -> (u16, Value) {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(_) => Value::String(text),
        },
        Err(e) => Value::String(e.to_string()),
    };
    (status, body)
}

#[async_trait]
impl LeadStore for SupabaseLeadStore {
    async fn insert_lead(&self, lead: &NewLead) -> Result<Lead> {
        let request = self
            .client
            .post(&self.table_url)
            .header("Prefer", "return=representation")
            .json(&[lead]);

        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| LeadError::StoreError {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let (status, body) = error_body(response).await;
            if body.get("code").and_then(Value::as_str) == Some(UNIQUE_VIOLATION) {
                return Err(LeadError::DuplicateEmail {
                    email: lead.email.clone(),
                });
            }
            return Err(LeadError::StoreError {
                message: format!("insert rejected with status {}: {}", status, body),
            });
        }

        let rows: Vec<Lead> = response.json().await.map_err(|e| LeadError::StoreError {
            message: format!("unreadable insert result: {}", e),
        })?;
        rows.into_iter().next().ok_or_else(|| LeadError::StoreError {
            message: "insert returned no row".to_string(),
        })
    }

    async fn mark_synced(&self, lead_id: &str, contact_id: &str) -> Result<()> {
        let request = self
            .client
            .patch(&self.table_url)
            .query(&[("id", format!("eq.{}", lead_id))])
            .header("Prefer", "return=minimal")
            .json(&json!({
                "synced_to_hubspot": true,
                "hubspot_contact_id": contact_id,
            }));

        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| LeadError::WritebackError {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let (status, body) = error_body(response).await;
            return Err(LeadError::WritebackError {
                message: format!("update rejected with status {}: {}", status, body),
            });
        }

        tracing::debug!(%lead_id, "Lead marked as synced");
        Ok(())
    }
}
