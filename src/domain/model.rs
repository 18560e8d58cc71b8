use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Store and CRM ids arrive as either JSON strings or numbers.
pub fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_to_string(&value)
        .ok_or_else(|| de::Error::custom(format!("expected a string or numeric id, got {}", value)))
}

/// Postgres `timestamptz` renders with an offset, plain `timestamp` without one.
/// Offset-less values are read as UTC; anything unreadable is dropped.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => parse_timestamp(&text),
        _ => None,
    })
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        value => id_to_string(&value).map(Some).ok_or_else(|| {
            de::Error::custom(format!("expected a string or numeric id, got {}", value))
        }),
    }
}

/// Registration payload as posted by the form. Nothing is trusted yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub phone_number: Option<String>,
    pub business_sector: Option<String>,
}

/// A submission that passed validation; the row handed to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLead {
    pub email: String,
    pub full_name: String,
    pub company_name: String,
    pub job_title: String,
    pub phone_number: String,
    pub business_sector: String,
}

/// A stored lead row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub business_sector: Option<String>,
    #[serde(default)]
    pub synced_to_hubspot: bool,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub hubspot_contact_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload of the standalone sync entry point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncRequest {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub lead_id: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub phone_number: Option<String>,
    pub business_sector: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    pub first: String,
    pub last: String,
}

/// HubSpot contact properties. Field names are the CRM's internal names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactProperties {
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub company: String,
    pub jobtitle: String,
    pub phone: String,
    pub industry: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    Created,
    Updated,
}

/// Result of a successful upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncedContact {
    pub action: UpsertAction,
    pub contact_id: String,
}

/// Outcome of a registration that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Registered { lead_id: String },
    AlreadyRegistered,
}
