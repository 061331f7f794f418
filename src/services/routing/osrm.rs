//! OSRM routing client
//!
//! OSRM API documentation:
//! https://project-osrm.org/docs/v5.24.0/api/
//!
//! The public demo server is rate-limited and best-effort, so every call
//! goes through bounded retry with exponential backoff, and successful
//! table responses are cached for a few minutes. Exhausted retries and
//! non-retryable failures both come back as `None` — the planner treats
//! that as a signal to estimate, never as an error.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{RouteDetail, RouteLeg, RoutingProvider};
use crate::services::matrix::{TravelMatrix, UNKNOWN_MINUTES};
use crate::types::Coordinates;

/// OSRM client configuration
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL of the OSRM server (e.g. "https://router.project-osrm.org")
    pub base_url: String,
    /// Per-attempt request timeout in seconds
    pub timeout_seconds: u64,
    /// Total attempts per call, transient failures included
    pub max_attempts: u32,
    /// First backoff delay; doubles after each failed attempt
    pub backoff_initial: Duration,
    /// Table cache entry lifetime
    pub table_cache_ttl: Duration,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            timeout_seconds: 10,
            max_attempts: 3,
            backoff_initial: Duration::from_millis(400),
            table_cache_ttl: Duration::from_secs(5 * 60),
        }
    }
}

impl OsrmConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Concurrency-safe table cache with per-entry TTL.
///
/// Entries are immutable once inserted and expire by age; there is no
/// invalidation API. The lock covers only the map operation itself.
pub struct TableCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, TravelMatrix)>>,
}

impl TableCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fresh entry for `key`, evicting it if expired.
    pub fn get(&self, key: &str) -> Option<TravelMatrix> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((inserted, matrix)) if inserted.elapsed() < self.ttl => Some(matrix.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, key: String, matrix: TravelMatrix) {
        self.entries.lock().insert(key, (Instant::now(), matrix));
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// OSRM routing client
pub struct OsrmClient {
    client: reqwest::Client,
    config: OsrmConfig,
    table_cache: TableCache,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");
        let table_cache = TableCache::new(config.table_cache_ttl);

        Self {
            client,
            config,
            table_cache,
        }
    }

    /// Canonical `lng,lat;lng,lat` path segment. Doubles as the cache key.
    fn join_coords(coords: &[Coordinates]) -> String {
        coords
            .iter()
            .map(|c| format!("{:.6},{:.6}", c.lng, c.lat))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// GET with bounded retry. Returns the successful response, or `None`
    /// after exhausting retries or hitting a non-retryable status.
    ///
    /// Retryable: 429, 5xx, and transport errors (timeouts included).
    async fn fetch_with_backoff(&self, url: &str) -> Option<reqwest::Response> {
        let mut delay = self.config.backoff_initial;

        for attempt in 1..=self.config.max_attempts {
            match self.client.get(url).send().await {
                Ok(response) if response.status().is_success() => return Some(response),
                Ok(response) => {
                    let status = response.status();
                    let retryable = status.as_u16() == 429 || status.is_server_error();
                    if !retryable {
                        warn!("OSRM returned non-retryable status {} for {}", status, url);
                        return None;
                    }
                    warn!(
                        "OSRM returned {} (attempt {}/{})",
                        status, attempt, self.config.max_attempts
                    );
                }
                Err(e) => {
                    warn!(
                        "OSRM request failed (attempt {}/{}): {}",
                        attempt, self.config.max_attempts, e
                    );
                }
            }

            tokio::time::sleep(delay).await;
            delay *= 2;
        }

        None
    }
}

#[async_trait]
impl RoutingProvider for OsrmClient {
    async fn get_table(&self, coords: &[Coordinates]) -> Option<TravelMatrix> {
        let n = coords.len();
        if n == 0 {
            return Some(TravelMatrix::zeros(0));
        }

        let joined = Self::join_coords(coords);
        if let Some(cached) = self.table_cache.get(&joined) {
            debug!("Table cache hit for {} locations", n);
            return Some(cached);
        }

        let url = format!(
            "{}/table/v1/driving/{}?annotations=duration",
            self.config.base_url, joined
        );
        debug!("Requesting duration table from OSRM for {} locations", n);

        let response = self.fetch_with_backoff(&url).await?;
        let body: OsrmTableResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to parse OSRM table response: {}", e);
                return None;
            }
        };

        let rows = body.durations?;
        if rows.len() != n || rows.iter().any(|row| row.len() != n) {
            warn!(
                "OSRM table has wrong shape: expected {}x{}, got {} rows",
                n,
                n,
                rows.len()
            );
            return None;
        }

        // Service-native seconds to minutes; unpriced pairs become the
        // unknown sentinel.
        let minutes: Vec<Vec<f64>> = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| match cell {
                        Some(seconds) => seconds / 60.0,
                        None => UNKNOWN_MINUTES,
                    })
                    .collect()
            })
            .collect();

        let matrix = TravelMatrix::from_rows(minutes);
        self.table_cache.put(joined, matrix.clone());
        Some(matrix)
    }

    async fn get_route_detail(&self, coords: &[Coordinates]) -> Option<RouteDetail> {
        if coords.len() < 2 {
            return None;
        }

        let joined = Self::join_coords(coords);
        let url = format!(
            "{}/route/v1/driving/{}?overview=full&geometries=geojson&steps=false",
            self.config.base_url, joined
        );
        debug!("Requesting route detail from OSRM for {} locations", coords.len());

        let response = self.fetch_with_backoff(&url).await?;
        let body: OsrmRouteResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to parse OSRM route response: {}", e);
                return None;
            }
        };

        let route = body.routes.into_iter().next()?;
        let legs = route
            .legs
            .into_iter()
            .map(|leg| RouteLeg {
                distance_km: leg.distance / 1000.0,
                duration_min: leg.duration / 60.0,
            })
            .collect();

        Some(RouteDetail {
            geometry: route.geometry.map(|g| g.coordinates).unwrap_or_default(),
            legs,
            total_km: route.distance / 1000.0,
            total_min: route.duration / 60.0,
        })
    }

    fn name(&self) -> &str {
        "OSRM"
    }
}

// OSRM API types

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    durations: Option<Vec<Vec<Option<f64>>>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
    geometry: Option<OsrmGeometry>,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}
