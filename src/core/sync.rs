use crate::core::upsert::{contact_properties, ContactUpsert};
use crate::domain::model::{SyncRequest, SyncedContact};
use crate::domain::ports::{CrmClient, LeadStore};
use crate::utils::error::{LeadError, Result};

/// Re-runs the HubSpot upsert for a stored lead. Unlike registration, a failed
/// upsert is the caller's problem.
pub struct SyncHandler<S: LeadStore, C: CrmClient> {
    store: S,
    crm: Option<C>,
}

impl<S: LeadStore, C: CrmClient> SyncHandler<S, C> {
    pub fn new(store: S, crm: Option<C>) -> Self {
        Self { store, crm }
    }

    pub async fn sync(&self, request: SyncRequest) -> Result<SyncedContact> {
        let non_empty = |field: &Option<String>| field.clone().filter(|value| !value.is_empty());
        let (Some(lead_id), Some(email), Some(full_name)) = (
            non_empty(&request.lead_id),
            non_empty(&request.email),
            non_empty(&request.full_name),
        ) else {
            return Err(LeadError::MissingFieldsError {
                fields: "lead_id, email, full_name".to_string(),
            });
        };

        tracing::info!(%email, %lead_id, "Processing lead");

        let crm = self.crm.as_ref().ok_or_else(|| LeadError::ConfigError {
            message: "HUBSPOT_ACCESS_TOKEN not configured".to_string(),
        })?;

        let properties = contact_properties(
            &email,
            &full_name,
            request.company_name.as_deref(),
            request.job_title.as_deref(),
            request.phone_number.as_deref(),
            request.business_sector.as_deref(),
        );

        let contact = ContactUpsert::new(crm, &properties).run().await.outcome?;

        // HubSpot 已經寫入成功，回寫失敗只記錄
        match self.store.mark_synced(&lead_id, &contact.contact_id).await {
            Ok(()) => tracing::info!(%lead_id, "Updated lead sync status"),
            Err(e) => tracing::error!(%lead_id, "Error updating lead sync status: {}", e),
        }

        Ok(contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Lead, UpsertAction};
    use crate::domain::ports::CrmReply;
    use crate::testutils::{FakeCrm, InMemoryLeadStore, ScriptedCrm};
    use crate::utils::error::CrmFailure;
    use serde_json::json;

    fn stored_lead() -> Lead {
        Lead {
            id: "lead-7".to_string(),
            email: "ada@example.com".to_string(),
            full_name: "Ada Lovelace".to_string(),
            company_name: Some("Analytical Engines".to_string()),
            job_title: None,
            phone_number: None,
            business_sector: None,
            synced_to_hubspot: false,
            hubspot_contact_id: None,
            created_at: None,
        }
    }

    fn request() -> SyncRequest {
        SyncRequest {
            lead_id: Some("lead-7".to_string()),
            email: Some("ada@example.com".to_string()),
            full_name: Some("Ada Lovelace".to_string()),
            company_name: Some("Analytical Engines".to_string()),
            ..SyncRequest::default()
        }
    }

    #[tokio::test]
    async fn creates_then_updates_and_writes_back() {
        let handler = SyncHandler::new(
            InMemoryLeadStore::new().with_lead(stored_lead()),
            Some(FakeCrm::new()),
        );

        let created = handler.sync(request()).await.unwrap();
        let updated = handler.sync(request()).await.unwrap();

        assert_eq!(created.action, UpsertAction::Created);
        assert_eq!(updated.action, UpsertAction::Updated);
        assert_eq!(created.contact_id, updated.contact_id);

        let lead = handler.store.lead("lead-7").unwrap();
        assert!(lead.synced_to_hubspot);
        assert_eq!(lead.hubspot_contact_id, Some(created.contact_id));
    }

    #[tokio::test]
    async fn requires_lead_id_email_and_name() {
        let handler = SyncHandler::new(InMemoryLeadStore::new(), Some(FakeCrm::new()));
        let mut missing = request();
        missing.lead_id = Some(String::new());

        let err = handler.sync(missing).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Missing required fields: lead_id, email, full_name"
        );
        assert_eq!(handler.crm.as_ref().unwrap().contact_count(), 0);
    }

    #[tokio::test]
    async fn missing_crm_client_is_config_error() {
        let handler: SyncHandler<_, FakeCrm> = SyncHandler::new(InMemoryLeadStore::new(), None);

        let err = handler.sync(request()).await.unwrap_err();
        assert!(matches!(err, LeadError::ConfigError { .. }));
    }

    #[tokio::test]
    async fn unresolved_conflict_is_surfaced() {
        let crm = ScriptedCrm::new()
            .on_create(CrmReply::new(409, json!({})))
            .on_search(CrmReply::new(200, json!({"results": []})));
        let handler = SyncHandler::new(InMemoryLeadStore::new().with_lead(stored_lead()), Some(crm));

        let err = handler.sync(request()).await.unwrap_err();

        assert!(matches!(
            err,
            LeadError::CrmError(CrmFailure::UnresolvedConflict { .. })
        ));
        assert!(!handler.store.lead("lead-7").unwrap().synced_to_hubspot);
    }

    #[tokio::test]
    async fn writeback_failure_does_not_change_outcome() {
        let handler = SyncHandler::new(
            InMemoryLeadStore::failing_writeback("permission denied"),
            Some(FakeCrm::new()),
        );

        let contact = handler.sync(request()).await.unwrap();
        assert_eq!(contact.action, UpsertAction::Created);
    }
}
