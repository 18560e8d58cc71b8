use clap::Parser;
use lead_sync::config::cli::Command;
use lead_sync::domain::model::{LeadSubmission, Registration, SyncRequest};
use lead_sync::utils::logger;
use lead_sync::{
    CliConfig, HandlerConfig, HubSpotClient, LeadError, RegistrationHandler, SupabaseLeadStore,
    SyncHandler,
};
use serde::de::DeserializeOwned;
use std::path::Path;

fn read_payload<T: DeserializeOwned>(path: &Path) -> lead_sync::Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn crm_client(config: &HandlerConfig) -> Option<HubSpotClient> {
    match HubSpotClient::from_config(&config.crm) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!("HubSpot client unavailable: {}", e);
            None
        }
    }
}

async fn run(cli: CliConfig) -> lead_sync::Result<()> {
    let config = match &cli.config {
        Some(path) => HandlerConfig::from_file(path)?,
        None => HandlerConfig::from_env()?,
    };
    if cli.verbose {
        tracing::debug!("Handler config: {:?}", config);
    }

    let store = SupabaseLeadStore::new(&config.store);
    let crm = crm_client(&config);

    match cli.command {
        Command::Register { payload } => {
            let submission: LeadSubmission = read_payload(&payload)?;
            let handler = RegistrationHandler::new(store, crm);
            match handler.register(submission).await? {
                Registration::Registered { lead_id } => {
                    println!("✅ Registration successful! Lead ID: {}", lead_id)
                }
                Registration::AlreadyRegistered => {
                    println!("✅ This email is already registered.")
                }
            }
        }
        Command::Sync { payload } => {
            let request: SyncRequest = read_payload(&payload)?;
            let handler = SyncHandler::new(store, crm);
            let contact = handler.sync(request).await?;
            println!(
                "✅ HubSpot contact {:?}: {}",
                contact.action, contact.contact_id
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting lead-sync CLI");

    if let Err(e) = run(cli).await {
        report_failure(&e);
        std::process::exit(1);
    }
}

fn report_failure(e: &LeadError) {
    tracing::error!("❌ Command failed: {} (Category: {:?})", e, e.category());
    eprintln!("❌ {}", e.user_friendly_message());
}
