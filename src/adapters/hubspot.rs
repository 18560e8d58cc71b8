use crate::config::CrmConfig;
use crate::domain::model::ContactProperties;
use crate::domain::ports::{CrmClient, CrmReply};
use crate::utils::error::{LeadError, Result};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

const CONTACTS_PATH: &str = "/crm/v3/objects/contacts";

#[derive(Serialize)]
struct ContactBody<'a> {
    properties: &'a ContactProperties,
}

/// HubSpot CRM v3 contacts API over a private-app access token.
#[derive(Clone)]
pub struct HubSpotClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl HubSpotClient {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    pub fn from_config(config: &CrmConfig) -> Result<Self> {
        let token = validate_required_field("hubspot_access_token", &config.access_token)?;
        Ok(Self::new(config.base_url.clone(), token.clone()))
    }

    fn contacts_url(&self, suffix: &str) -> String {
        format!("{}{}{}", self.base_url, CONTACTS_PATH, suffix)
    }

    /// `contacts/{id}` with the id as one escaped path segment.
    fn contact_url(&self, contact_id: &str) -> Result<Url> {
        let invalid = || LeadError::ConfigError {
            message: format!("HubSpot base URL cannot address contacts: {}", self.base_url),
        };
        let mut url = Url::parse(&self.contacts_url("")).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .push(contact_id);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<CrmReply> {
        let response = request.bearer_auth(&self.access_token).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        tracing::debug!("HubSpot response status: {}", status);

        Ok(CrmReply::new(status, parse_body(text)))
    }
}

fn parse_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => Value::String(text),
    }
}

#[async_trait]
impl CrmClient for HubSpotClient {
    async fn create_contact(&self, properties: &ContactProperties) -> Result<CrmReply> {
        let request = self
            .client
            .post(self.contacts_url(""))
            .json(&ContactBody { properties });
        self.send(request).await
    }

    async fn update_contact(
        &self,
        contact_id: &str,
        properties: &ContactProperties,
    ) -> Result<CrmReply> {
        let request = self
            .client
            .patch(self.contact_url(contact_id)?)
            .json(&ContactBody { properties });
        self.send(request).await
    }

    async fn search_contact_by_email(&self, email: &str) -> Result<CrmReply> {
        let query = json!({
            "filterGroups": [{
                "filters": [{
                    "propertyName": "email",
                    "operator": "EQ",
                    "value": email,
                }]
            }]
        });
        let request = self.client.post(self.contacts_url("/search")).json(&query);
        self.send(request).await
    }
}
