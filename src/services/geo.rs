//! Geographic calculations
//!
//! Haversine great-circle distance and the travel-time estimates derived
//! from it. These back the fallback matrix used whenever the routing
//! service is unavailable.

use crate::defaults::{DISTANCE_FALLBACK_SPEED_KMH, MATRIX_FALLBACK_SPEED_KMH};
use crate::services::matrix::TravelMatrix;
use crate::types::Coordinates;

/// Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate Haversine distance between two points in kilometers
pub fn haversine_km(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lng - from.lng).to_radians();

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Estimate travel time in minutes at the given average speed.
///
/// Deterministic and I/O-free. NaN coordinates propagate NaN; callers
/// validate coordinates at the boundary.
pub fn estimate_minutes(from: &Coordinates, to: &Coordinates, avg_speed_kmh: f64) -> f64 {
    haversine_km(from, to) / avg_speed_kmh * 60.0
}

/// Build a full travel-time matrix from the haversine estimator.
///
/// Zero diagonal, off-diagonal estimated at [`MATRIX_FALLBACK_SPEED_KMH`].
/// Always succeeds — this is the fallback when the routing service is down.
pub fn fallback_matrix(coords: &[Coordinates]) -> TravelMatrix {
    let n = coords.len();
    let mut matrix = TravelMatrix::zeros(n);

    for i in 0..n {
        for j in 0..n {
            if i != j {
                matrix.set(
                    i,
                    j,
                    estimate_minutes(&coords[i], &coords[j], MATRIX_FALLBACK_SPEED_KMH),
                );
            }
        }
    }

    matrix
}

/// Approximate total route distance by summing straight-line legs.
///
/// Used when the routing service returned no route detail. This is an
/// estimate derived from the same coordinates as the schedule, not a road
/// distance; callers flag it as such.
pub fn fallback_route_km(coords: &[Coordinates]) -> f64 {
    coords
        .windows(2)
        .map(|pair| {
            let minutes = estimate_minutes(&pair[0], &pair[1], DISTANCE_FALLBACK_SPEED_KMH);
            minutes / 60.0 * DISTANCE_FALLBACK_SPEED_KMH
        })
        .sum()
}
