//! Routing providers
//!
//! Abstraction over the external routing service. Providers never surface
//! network flakiness as errors: a call either yields data or `None`
//! ("unavailable"), and the planner falls back to haversine estimates on
//! `None`.

mod osrm;

pub use osrm::{OsrmClient, OsrmConfig, TableCache};

use async_trait::async_trait;

use crate::services::matrix::TravelMatrix;
use crate::types::Coordinates;

/// Per-leg road distance and duration.
#[derive(Debug, Clone)]
pub struct RouteLeg {
    pub distance_km: f64,
    pub duration_min: f64,
}

/// Full route detail for an ordered coordinate sequence.
/// Geometry is GeoJSON point order: `[lng, lat]`.
#[derive(Debug, Clone)]
pub struct RouteDetail {
    pub geometry: Vec<[f64; 2]>,
    pub legs: Vec<RouteLeg>,
    pub total_km: f64,
    pub total_min: f64,
}

/// Routing service abstraction (OSRM in production, offline for tests
/// and keyless deployments).
#[async_trait]
pub trait RoutingProvider: Send + Sync {
    /// Pairwise travel-time matrix in minutes for the ordered coordinates.
    /// `None` means the service is unavailable, not that the tour failed.
    async fn get_table(&self, coords: &[Coordinates]) -> Option<TravelMatrix>;

    /// Route geometry plus per-leg distances/durations for ≥2 coordinates.
    async fn get_route_detail(&self, coords: &[Coordinates]) -> Option<RouteDetail>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Provider that reports the routing service as permanently unavailable,
/// forcing the planner onto its haversine fallback. Used when the worker
/// runs without network routing.
pub struct OfflineRoutingProvider;

#[async_trait]
impl RoutingProvider for OfflineRoutingProvider {
    async fn get_table(&self, _coords: &[Coordinates]) -> Option<TravelMatrix> {
        None
    }

    async fn get_route_detail(&self, _coords: &[Coordinates]) -> Option<RouteDetail> {
        None
    }

    fn name(&self) -> &str {
        "Offline"
    }
}

/// Create a routing provider from configuration.
pub fn create_routing_provider(config: Option<OsrmConfig>) -> Box<dyn RoutingProvider> {
    match config {
        Some(cfg) => Box::new(OsrmClient::new(cfg)),
        None => Box::new(OfflineRoutingProvider),
    }
}
