use crate::core::upsert::{contact_properties, ContactUpsert};
use crate::core::validator::validate_submission;
use crate::domain::model::{Lead, LeadSubmission, Registration};
use crate::domain::ports::{CrmClient, LeadStore};
use crate::utils::error::{LeadError, Result};

/// Validates, stores and mirrors a new lead.
///
/// CRM sync is best-effort: once the row is stored the registration succeeds,
/// whatever happens in HubSpot. A missing CRM client just skips the sync.
pub struct RegistrationHandler<S: LeadStore, C: CrmClient> {
    store: S,
    crm: Option<C>,
}

impl<S: LeadStore, C: CrmClient> RegistrationHandler<S, C> {
    pub fn new(store: S, crm: Option<C>) -> Self {
        Self { store, crm }
    }

    pub async fn register(&self, submission: LeadSubmission) -> Result<Registration> {
        let new_lead = validate_submission(&submission)?;
        tracing::info!(email = %new_lead.email, "Processing registration");

        let lead = match self.store.insert_lead(&new_lead).await {
            Ok(lead) => lead,
            Err(LeadError::DuplicateEmail { email }) => {
                tracing::info!(%email, "Email already registered");
                return Ok(Registration::AlreadyRegistered);
            }
            Err(e) => {
                tracing::error!("❌ Database error: {}", e);
                return Err(e);
            }
        };

        tracing::info!(lead_id = %lead.id, "Lead saved to database");
        self.sync_to_crm(&lead).await;

        Ok(Registration::Registered { lead_id: lead.id })
    }

    /// Never fails; problems end up in the log and the lead stays unsynced.
    async fn sync_to_crm(&self, lead: &Lead) {
        let Some(crm) = &self.crm else {
            tracing::error!("HUBSPOT_ACCESS_TOKEN not configured, skipping HubSpot sync");
            return;
        };

        let properties = contact_properties(
            &lead.email,
            &lead.full_name,
            lead.company_name.as_deref(),
            lead.job_title.as_deref(),
            lead.phone_number.as_deref(),
            lead.business_sector.as_deref(),
        );

        let report = ContactUpsert::new(crm, &properties).run().await;
        let contact = match report.outcome {
            Ok(contact) => contact,
            Err(failure) => {
                tracing::warn!(lead_id = %lead.id, "HubSpot sync failed (will retry later): {}", failure);
                return;
            }
        };

        match self.store.mark_synced(&lead.id, &contact.contact_id).await {
            Ok(()) => tracing::info!(
                lead_id = %lead.id,
                contact_id = %contact.contact_id,
                "✅ HubSpot sync successful"
            ),
            Err(e) => tracing::error!(lead_id = %lead.id, "Failed to record HubSpot sync: {}", e),
        }
    }
}
