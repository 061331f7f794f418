//! Configuration management

use anyhow::Result;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// NATS server URL
    pub nats_url: String,

    /// OSRM routing server URL
    pub osrm_url: String,

    /// Skip the routing service entirely and estimate everything
    /// (useful for development without network access)
    pub routing_offline: bool,

    /// Path to the stop catalog JSON file
    pub catalog_path: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let nats_url =
            std::env::var("NATS_URL").unwrap_or_else(|_| "nats://localhost:4222".to_string());

        let osrm_url = std::env::var("OSRM_URL")
            .unwrap_or_else(|_| "https://router.project-osrm.org".to_string());

        let routing_offline = std::env::var("ROUTING_OFFLINE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let catalog_path =
            std::env::var("CATALOG_PATH").unwrap_or_else(|_| "./data/stops.json".to_string());

        Ok(Self {
            nats_url,
            osrm_url,
            routing_offline,
            catalog_path,
        })
    }
}
