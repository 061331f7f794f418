//! NATS message handlers

pub mod ping;
pub mod tour;

use std::sync::Arc;

use anyhow::Result;
use async_nats::Client;
use tokio::select;
use tracing::{error, info};

use crate::config::Config;
use crate::services::catalog::StopCatalog;
use crate::services::routing::{create_routing_provider, OsrmConfig, RoutingProvider};
use crate::services::tour::TourPlanner;

/// Start all message handlers
pub async fn start_handlers(client: Client, catalog: StopCatalog, config: &Config) -> Result<()> {
    info!("Starting message handlers...");

    let osrm_config = if config.routing_offline {
        None
    } else {
        Some(OsrmConfig::new(&config.osrm_url))
    };
    let routing: Arc<dyn RoutingProvider> = Arc::from(create_routing_provider(osrm_config));
    info!("Routing provider initialized: {}", routing.name());

    let planner = Arc::new(TourPlanner::new(catalog, routing));

    let ping_sub = client.subscribe("showings.ping").await?;
    let tour_plan_sub = client.subscribe("showings.tour.plan").await?;
    info!("Subscribed to NATS subjects");

    let client_ping = client.clone();
    let client_tour_plan = client.clone();

    let ping_handle = tokio::spawn(async move { ping::handle_ping(client_ping, ping_sub).await });
    let tour_plan_handle = tokio::spawn(async move {
        tour::handle_tour_plan(client_tour_plan, tour_plan_sub, planner).await
    });

    info!("All handlers started");

    select! {
        result = ping_handle => {
            error!("Ping handler exited: {:?}", result);
        }
        result = tour_plan_handle => {
            error!("Tour plan handler exited: {:?}", result);
        }
    }

    Ok(())
}
