use crate::domain::model::{ContactProperties, Lead, NewLead};
use crate::domain::ports::{CrmClient, CrmReply, LeadStore};
use crate::utils::error::{LeadError, Result};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

fn connection_error(message: &str) -> LeadError {
    LeadError::IoError(io::Error::new(io::ErrorKind::ConnectionReset, message.to_string()))
}

/// Lead table with a unique email index.
#[derive(Default)]
pub struct InMemoryLeadStore {
    leads: Mutex<Vec<Lead>>,
    fail_insert: Option<String>,
    fail_writeback: Option<String>,
}

impl InMemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_insert(message: &str) -> Self {
        Self {
            fail_insert: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_writeback(message: &str) -> Self {
        Self {
            fail_writeback: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn with_lead(self, lead: Lead) -> Self {
        self.leads.lock().unwrap().push(lead);
        self
    }

    pub fn leads(&self) -> Vec<Lead> {
        self.leads.lock().unwrap().clone()
    }

    pub fn lead(&self, id: &str) -> Option<Lead> {
        self.leads().into_iter().find(|lead| lead.id == id)
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn insert_lead(&self, lead: &NewLead) -> Result<Lead> {
        if let Some(message) = &self.fail_insert {
            return Err(LeadError::StoreError {
                message: message.clone(),
            });
        }

        let mut leads = self.leads.lock().unwrap();
        if leads.iter().any(|existing| existing.email == lead.email) {
            return Err(LeadError::DuplicateEmail {
                email: lead.email.clone(),
            });
        }

        let stored = Lead {
            id: format!("lead-{}", leads.len() + 1),
            email: lead.email.clone(),
            full_name: lead.full_name.clone(),
            company_name: Some(lead.company_name.clone()),
            job_title: Some(lead.job_title.clone()),
            phone_number: Some(lead.phone_number.clone()),
            business_sector: Some(lead.business_sector.clone()),
            synced_to_hubspot: false,
            hubspot_contact_id: None,
            created_at: None,
        };
        leads.push(stored.clone());
        Ok(stored)
    }

    async fn mark_synced(&self, lead_id: &str, contact_id: &str) -> Result<()> {
        if let Some(message) = &self.fail_writeback {
            return Err(LeadError::WritebackError {
                message: message.clone(),
            });
        }

        let mut leads = self.leads.lock().unwrap();
        let lead = leads
            .iter_mut()
            .find(|lead| lead.id == lead_id)
            .ok_or_else(|| LeadError::WritebackError {
                message: format!("lead {} not found", lead_id),
            })?;
        lead.synced_to_hubspot = true;
        lead.hubspot_contact_id = Some(contact_id.to_string());
        Ok(())
    }
}

/// Behaves like HubSpot: 409 on a known email, with the id only in the message.
#[derive(Default)]
pub struct FakeCrm {
    contacts: Mutex<HashMap<String, (String, ContactProperties)>>,
}

impl FakeCrm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.lock().unwrap().len()
    }

    pub fn contact(&self, email: &str) -> Option<(String, ContactProperties)> {
        self.contacts.lock().unwrap().get(email).cloned()
    }
}

#[async_trait]
impl CrmClient for FakeCrm {
    async fn create_contact(&self, properties: &ContactProperties) -> Result<CrmReply> {
        let mut contacts = self.contacts.lock().unwrap();
        if let Some((id, _)) = contacts.get(&properties.email) {
            return Ok(CrmReply::new(
                409,
                json!({
                    "status": "error",
                    "message": format!("Contact already exists. Existing ID: {}", id),
                    "category": "CONFLICT"
                }),
            ));
        }

        let id = (1000 + contacts.len() + 1).to_string();
        contacts.insert(properties.email.clone(), (id.clone(), properties.clone()));
        Ok(CrmReply::new(201, json!({ "id": id })))
    }

    async fn update_contact(
        &self,
        contact_id: &str,
        properties: &ContactProperties,
    ) -> Result<CrmReply> {
        let mut contacts = self.contacts.lock().unwrap();
        match contacts.values_mut().find(|(id, _)| id == contact_id) {
            Some(entry) => {
                entry.1 = properties.clone();
                Ok(CrmReply::new(200, json!({ "id": contact_id })))
            }
            None => Ok(CrmReply::new(404, json!({ "category": "OBJECT_NOT_FOUND" }))),
        }
    }

    async fn search_contact_by_email(&self, email: &str) -> Result<CrmReply> {
        let contacts = self.contacts.lock().unwrap();
        let results: Vec<_> = contacts
            .get(email)
            .map(|(id, _)| json!({ "id": id }))
            .into_iter()
            .collect();
        Ok(CrmReply::new(
            200,
            json!({ "total": results.len(), "results": results }),
        ))
    }
}

type Scripted = Option<std::result::Result<CrmReply, String>>;

/// One canned answer per operation; unscripted operations fail as transport errors.
#[derive(Default)]
pub struct ScriptedCrm {
    create: Scripted,
    search: Scripted,
    update: Scripted,
    create_calls: Mutex<usize>,
    search_calls: Mutex<usize>,
    updated_ids: Mutex<Vec<String>>,
}

impl ScriptedCrm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_create(mut self, reply: CrmReply) -> Self {
        self.create = Some(Ok(reply));
        self
    }

    pub fn on_search(mut self, reply: CrmReply) -> Self {
        self.search = Some(Ok(reply));
        self
    }

    pub fn on_update(mut self, reply: CrmReply) -> Self {
        self.update = Some(Ok(reply));
        self
    }

    pub fn fail_create(mut self, message: &str) -> Self {
        self.create = Some(Err(message.to_string()));
        self
    }

    pub fn fail_search(mut self, message: &str) -> Self {
        self.search = Some(Err(message.to_string()));
        self
    }

    pub fn create_calls(&self) -> usize {
        *self.create_calls.lock().unwrap()
    }

    pub fn search_calls(&self) -> usize {
        *self.search_calls.lock().unwrap()
    }

    pub fn updated_ids(&self) -> Vec<String> {
        self.updated_ids.lock().unwrap().clone()
    }

    fn answer(scripted: &Scripted, operation: &str) -> Result<CrmReply> {
        match scripted {
            Some(Ok(reply)) => Ok(reply.clone()),
            Some(Err(message)) => Err(connection_error(message)),
            None => Err(connection_error(&format!("no scripted reply for {}", operation))),
        }
    }
}

#[async_trait]
impl CrmClient for ScriptedCrm {
    async fn create_contact(&self, _properties: &ContactProperties) -> Result<CrmReply> {
        *self.create_calls.lock().unwrap() += 1;
        Self::answer(&self.create, "create")
    }

    async fn update_contact(
        &self,
        contact_id: &str,
        _properties: &ContactProperties,
    ) -> Result<CrmReply> {
        self.updated_ids.lock().unwrap().push(contact_id.to_string());
        Self::answer(&self.update, "update")
    }

    async fn search_contact_by_email(&self, _email: &str) -> Result<CrmReply> {
        *self.search_calls.lock().unwrap() += 1;
        Self::answer(&self.search, "search")
    }
}
