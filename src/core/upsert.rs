//! Create-or-update of a CRM contact keyed by email.
//!
//! The upsert is an explicit state machine. Every call to [`ContactUpsert::run`]
//! starts at [`UpsertState::AttemptCreate`] and advances one CRM request at a
//! time until a terminal state is reached:
//!
//! ```text
//! AttemptCreate --2xx--> Created
//!      |--409--> ResolveExisting --embedded id / search hit--> AttemptUpdate --2xx--> Updated
//!      |                 `--no match--> UnresolvedConflict          `--else--> UpdateFailed
//!      `--else--> CreateFailed
//! ```
//!
//! Any transport error ends in `TransportError`. Conflict messages are never
//! parsed; an existing id is only taken from a structured field of the 409 body.

use crate::core::names::split_full_name;
use crate::domain::model::{id_to_string, ContactProperties, SyncedContact, UpsertAction};
use crate::domain::ports::{CrmClient, CrmReply};
use crate::utils::error::CrmFailure;
use serde_json::Value;

const CONFLICT_STATUS: u16 = 409;

/// Keys of a 409 body that may carry the existing contact id.
const EMBEDDED_ID_KEYS: [&str; 2] = ["existingId", "id"];

/// Builds the fixed property mapping. Absent descriptive fields become "".
pub fn contact_properties(
    email: &str,
    full_name: &str,
    company_name: Option<&str>,
    job_title: Option<&str>,
    phone_number: Option<&str>,
    business_sector: Option<&str>,
) -> ContactProperties {
    let name = split_full_name(full_name);

    ContactProperties {
        email: email.to_string(),
        firstname: name.first,
        lastname: name.last,
        company: company_name.unwrap_or_default().to_string(),
        jobtitle: job_title.unwrap_or_default().to_string(),
        phone: phone_number.unwrap_or_default().to_string(),
        industry: business_sector.unwrap_or_default().to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertState {
    AttemptCreate,
    ResolveExisting { embedded_id: Option<String> },
    AttemptUpdate { contact_id: String },
    Created { contact_id: String },
    Updated { contact_id: String },
    Failed(CrmFailure),
}

/// Flat name of a state, used for traces and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertStage {
    AttemptCreate,
    ResolveExisting,
    AttemptUpdate,
    Created,
    Updated,
    CreateFailed,
    UpdateFailed,
    UnresolvedConflict,
    TransportError,
}

impl UpsertState {
    pub fn stage(&self) -> UpsertStage {
        match self {
            UpsertState::AttemptCreate => UpsertStage::AttemptCreate,
            UpsertState::ResolveExisting { .. } => UpsertStage::ResolveExisting,
            UpsertState::AttemptUpdate { .. } => UpsertStage::AttemptUpdate,
            UpsertState::Created { .. } => UpsertStage::Created,
            UpsertState::Updated { .. } => UpsertStage::Updated,
            UpsertState::Failed(CrmFailure::CreateFailed { .. }) => UpsertStage::CreateFailed,
            UpsertState::Failed(CrmFailure::UpdateFailed { .. }) => UpsertStage::UpdateFailed,
            UpsertState::Failed(CrmFailure::UnresolvedConflict { .. }) => {
                UpsertStage::UnresolvedConflict
            }
            UpsertState::Failed(CrmFailure::Transport { .. }) => UpsertStage::TransportError,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UpsertState::Created { .. } | UpsertState::Updated { .. } | UpsertState::Failed(_)
        )
    }

    /// Splits a terminal state into its outcome; pending states come back as `Err`.
    pub fn finish(self) -> Result<Result<SyncedContact, CrmFailure>, UpsertState> {
        match self {
            UpsertState::Created { contact_id } => Ok(Ok(SyncedContact {
                action: UpsertAction::Created,
                contact_id,
            })),
            UpsertState::Updated { contact_id } => Ok(Ok(SyncedContact {
                action: UpsertAction::Updated,
                contact_id,
            })),
            UpsertState::Failed(failure) => Ok(Err(failure)),
            pending => Err(pending),
        }
    }
}

/// What one run went through and where it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertReport {
    pub trace: Vec<UpsertStage>,
    pub outcome: Result<SyncedContact, CrmFailure>,
}

pub struct ContactUpsert<'a, C: CrmClient + ?Sized> {
    crm: &'a C,
    properties: &'a ContactProperties,
}

impl<'a, C: CrmClient + ?Sized> ContactUpsert<'a, C> {
    pub fn new(crm: &'a C, properties: &'a ContactProperties) -> Self {
        Self { crm, properties }
    }

    pub async fn run(&self) -> UpsertReport {
        let mut state = UpsertState::AttemptCreate;
        let mut trace = vec![state.stage()];

        let outcome = loop {
            match state.finish() {
                Ok(outcome) => break outcome,
                Err(pending) => {
                    state = self.advance(pending).await;
                    trace.push(state.stage());
                }
            }
        };

        match &outcome {
            Ok(contact) => tracing::info!(
                email = %self.properties.email,
                contact_id = %contact.contact_id,
                action = ?contact.action,
                "HubSpot contact upserted"
            ),
            Err(failure) => tracing::error!(
                email = %self.properties.email,
                stage = ?trace.last(),
                "HubSpot upsert failed: {}",
                failure
            ),
        }

        UpsertReport { trace, outcome }
    }

    /// Performs the request owned by `state` and returns the next state.
    /// Terminal states are returned unchanged.
    pub async fn advance(&self, state: UpsertState) -> UpsertState {
        match state {
            UpsertState::AttemptCreate => self.attempt_create().await,
            UpsertState::ResolveExisting { embedded_id } => self.resolve_existing(embedded_id).await,
            UpsertState::AttemptUpdate { contact_id } => self.attempt_update(contact_id).await,
            terminal => terminal,
        }
    }

    async fn attempt_create(&self) -> UpsertState {
        tracing::debug!(email = %self.properties.email, "Creating HubSpot contact");
        let reply = match self.crm.create_contact(self.properties).await {
            Ok(reply) => reply,
            Err(e) => return transport_failure(e),
        };

        if reply.status == CONFLICT_STATUS {
            tracing::info!(email = %self.properties.email, "Contact exists, resolving to update");
            return UpsertState::ResolveExisting {
                embedded_id: embedded_contact_id(&reply.body),
            };
        }

        if reply.is_success() {
            if let Some(contact_id) = reply.body.get("id").and_then(id_to_string) {
                return UpsertState::Created { contact_id };
            }
        }

        UpsertState::Failed(CrmFailure::CreateFailed {
            status: reply.status,
            body: body_text(&reply),
        })
    }

    async fn resolve_existing(&self, embedded_id: Option<String>) -> UpsertState {
        if let Some(contact_id) = embedded_id {
            return UpsertState::AttemptUpdate { contact_id };
        }

        let email = &self.properties.email;
        tracing::debug!(%email, "Searching HubSpot contact by email");
        let reply = match self.crm.search_contact_by_email(email).await {
            Ok(reply) => reply,
            Err(e) => return transport_failure(e),
        };

        match first_search_hit(&reply) {
            Some(contact_id) => UpsertState::AttemptUpdate { contact_id },
            None => UpsertState::Failed(CrmFailure::UnresolvedConflict {
                email: email.clone(),
            }),
        }
    }

    async fn attempt_update(&self, contact_id: String) -> UpsertState {
        tracing::debug!(%contact_id, "Updating HubSpot contact");
        let reply = match self.crm.update_contact(&contact_id, self.properties).await {
            Ok(reply) => reply,
            Err(e) => return transport_failure(e),
        };

        if reply.is_success() {
            UpsertState::Updated { contact_id }
        } else {
            UpsertState::Failed(CrmFailure::UpdateFailed {
                contact_id,
                status: reply.status,
                body: body_text(&reply),
            })
        }
    }
}

fn transport_failure(error: impl std::fmt::Display) -> UpsertState {
    UpsertState::Failed(CrmFailure::Transport {
        message: error.to_string(),
    })
}

fn embedded_contact_id(body: &Value) -> Option<String> {
    EMBEDDED_ID_KEYS
        .iter()
        .find_map(|key| body.get(*key).and_then(id_to_string))
}

fn first_search_hit(reply: &CrmReply) -> Option<String> {
    if !reply.is_success() {
        return None;
    }
    reply
        .body
        .get("results")?
        .as_array()?
        .first()?
        .get("id")
        .and_then(id_to_string)
}

fn body_text(reply: &CrmReply) -> String {
    match &reply.body {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
