pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod http;
pub mod utils;

#[cfg(test)]
mod testutils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{HubSpotClient, SupabaseLeadStore};
pub use config::HandlerConfig;
pub use crate::core::{registration::RegistrationHandler, sync::SyncHandler};
pub use utils::error::{LeadError, Result};
