//! Tour planning request/response types and error taxonomy

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::stop::Coordinates;

/// Tour planning request payload.
///
/// Optional fields have documented defaults applied by the planner:
/// `start_time` defaults to now, `dwell_minutes` to 20 (clamped to 5–120),
/// `buffer_minutes` to 5 (clamped to 0–30).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourRequest {
    /// Requested stop ids. De-duplicated before validation; 2–10 remain.
    pub ids: Vec<String>,
    /// Departure instant. Defaults to now.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// Minutes spent at each stop.
    #[serde(default)]
    pub dwell_minutes: Option<i64>,
    /// Transition overhead added before each stop.
    #[serde(default)]
    pub buffer_minutes: Option<i64>,
    /// Optional custom departure point. Validated against coordinate ranges.
    #[serde(default)]
    pub start_coord: Option<Coordinates>,
    /// Free-text notes per stop id, appended to calendar descriptions.
    #[serde(default)]
    pub notes: Option<HashMap<String, String>>,
    /// Caller-supplied visiting order. Used only when it is a complete
    /// permutation of the selected stop ids; otherwise silently ignored.
    #[serde(default)]
    pub order_ids: Option<Vec<String>>,
}

/// One scheduled stop in the planned tour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: String,
    pub address: String,
    pub eta: DateTime<Utc>,
    pub etd: DateTime<Utc>,
    /// Travel minutes from the previous position (0 for the first stop
    /// when no custom start point was supplied).
    pub travel_minutes: f64,
    pub visit_minutes: i64,
}

/// Assembled tour bundle returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourResponse {
    /// Stop ids in visiting order.
    pub order: Vec<String>,
    pub schedule: Vec<ScheduleEntry>,
    /// iCalendar document, one VEVENT per stop.
    pub ics: String,
    /// Route polyline as GeoJSON [lng, lat] points. Straight lines between
    /// stops when the routing service was unavailable.
    pub route: Vec<[f64; 2]>,
    pub total_drive_minutes: f64,
    pub leg_distances_km: Vec<f64>,
    pub total_distance_km: f64,
    /// True when the travel matrix came from the haversine estimator
    /// instead of the routing service.
    pub matrix_estimated: bool,
    /// True when the total distance is a haversine approximation.
    pub distance_estimated: bool,
}

/// Tour planning failures.
///
/// Only invalid client input is surfaced with a specific message; routing
/// service unavailability is absorbed by fallback estimation and is never
/// an error. Everything else is internal.
#[derive(Debug, Error)]
pub enum TourError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl TourError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// NATS error code for the response envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// User-facing message. Internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidRequest(msg) => msg.clone(),
            Self::Internal(_) => "Failed to build tour".to_string(),
        }
    }
}
