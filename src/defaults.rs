//! Tour planning defaults and clamp ranges

/// Default minutes spent viewing each property.
pub const DEFAULT_DWELL_MINUTES: i64 = 20;
pub const MIN_DWELL_MINUTES: i64 = 5;
pub const MAX_DWELL_MINUTES: i64 = 120;

/// Default transition overhead inserted before each stop.
pub const DEFAULT_BUFFER_MINUTES: i64 = 5;
pub const MIN_BUFFER_MINUTES: i64 = 0;
pub const MAX_BUFFER_MINUTES: i64 = 30;

/// Stop count bounds after de-duplication.
pub const MIN_TOUR_STOPS: usize = 2;
pub const MAX_TOUR_STOPS: usize = 10;

/// Assumed average speed when estimating the travel-time matrix without
/// the routing service.
pub const MATRIX_FALLBACK_SPEED_KMH: f64 = 35.0;

/// Assumed average speed for the distance-only approximation used when
/// route details are unavailable.
pub const DISTANCE_FALLBACK_SPEED_KMH: f64 = 60.0;

pub fn clamp_dwell(minutes: Option<i64>) -> i64 {
    minutes
        .unwrap_or(DEFAULT_DWELL_MINUTES)
        .clamp(MIN_DWELL_MINUTES, MAX_DWELL_MINUTES)
}

pub fn clamp_buffer(minutes: Option<i64>) -> i64 {
    minutes
        .unwrap_or(DEFAULT_BUFFER_MINUTES)
        .clamp(MIN_BUFFER_MINUTES, MAX_BUFFER_MINUTES)
}
