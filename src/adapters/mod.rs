// Adapters layer: concrete implementations for HubSpot and the Supabase lead table.

pub mod hubspot;
pub mod supabase;

pub use hubspot::HubSpotClient;
pub use supabase::SupabaseLeadStore;
