use crate::domain::model::{ContactProperties, Lead, NewLead};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Persistence for leads. `insert_lead` must report a duplicate email as
/// `LeadError::DuplicateEmail`, every other failure as `LeadError::StoreError`.
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn insert_lead(&self, lead: &NewLead) -> Result<Lead>;

    async fn mark_synced(&self, lead_id: &str, contact_id: &str) -> Result<()>;
}

/// Raw CRM answer. Status interpretation belongs to the upsert, not the client.
#[derive(Debug, Clone, PartialEq)]
pub struct CrmReply {
    pub status: u16,
    pub body: Value,
}

impl CrmReply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Contact operations against the CRM. An `Err` means the request never
/// produced a response (connection, TLS, body read).
#[async_trait]
pub trait CrmClient: Send + Sync {
    async fn create_contact(&self, properties: &ContactProperties) -> Result<CrmReply>;

    async fn update_contact(
        &self,
        contact_id: &str,
        properties: &ContactProperties,
    ) -> Result<CrmReply>;

    async fn search_contact_by_email(&self, email: &str) -> Result<CrmReply>;
}
