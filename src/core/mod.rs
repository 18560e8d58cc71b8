pub mod names;
pub mod registration;
pub mod sync;
pub mod upsert;
pub mod validator;

pub use crate::domain::model::{
    ContactProperties, Lead, LeadSubmission, NewLead, Registration, SyncRequest, SyncedContact,
    UpsertAction,
};
pub use crate::domain::ports::{CrmClient, CrmReply, LeadStore};
pub use crate::utils::error::Result;
