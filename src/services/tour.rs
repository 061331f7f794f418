//! Tour planning orchestration
//!
//! `TourPlanner` composes the catalog, routing provider, order solver,
//! schedule builder and calendar exporter into the single `plan` entry
//! point behind the `showings.tour.plan` subject. This is the only layer
//! that turns conditions into user-visible failures, and it does so for
//! client-input validation alone — routing unavailability always degrades
//! to haversine estimates.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::defaults::{clamp_buffer, clamp_dwell, MAX_TOUR_STOPS, MIN_TOUR_STOPS};
use crate::services::catalog::StopCatalog;
use crate::services::geo::{self, haversine_km};
use crate::services::ics::{generate_ics, CalendarEvent, DEFAULT_PROD_ID};
use crate::services::matrix::{MatrixLayout, TravelMatrix};
use crate::services::order::{nearest_neighbor_order, resolve_manual_order};
use crate::services::routing::RoutingProvider;
use crate::services::schedule::build_schedule;
use crate::types::{Coordinates, Stop, TourError, TourRequest, TourResponse};

pub struct TourPlanner {
    catalog: StopCatalog,
    routing: Arc<dyn RoutingProvider>,
}

impl TourPlanner {
    pub fn new(catalog: StopCatalog, routing: Arc<dyn RoutingProvider>) -> Self {
        Self { catalog, routing }
    }

    /// Plan a viewing tour for the requested stops.
    pub async fn plan(&self, request: &TourRequest) -> Result<TourResponse, TourError> {
        let selected = self.validate_stops(&request.ids)?;

        let dwell = clamp_dwell(request.dwell_minutes);
        let buffer = clamp_buffer(request.buffer_minutes);
        let start_time = request.start_time.unwrap_or_else(Utc::now);

        if let Some(start) = &request.start_coord {
            if !start.is_valid() {
                return Err(TourError::invalid("Invalid start coordinate"));
            }
        }

        // Coordinate sequence fed to the routing service; a custom start
        // point is prepended and the layout tracks the index shift.
        let layout = MatrixLayout::new(request.start_coord.is_some());
        let stop_coords: Vec<Coordinates> = selected.iter().map(Stop::coordinates).collect();
        let mut coords = Vec::with_capacity(stop_coords.len() + 1);
        if let Some(start) = request.start_coord {
            coords.push(start);
        }
        coords.extend(&stop_coords);

        let (matrix, matrix_estimated) = self.resolve_matrix(&coords).await;
        let order = self.resolve_order(request, &selected, &matrix, layout)?;

        let schedule = build_schedule(
            &selected, &order, &matrix, layout, start_time, dwell, buffer,
        );

        let events: Vec<CalendarEvent> = schedule
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let note = request
                    .notes
                    .as_ref()
                    .and_then(|notes| notes.get(&entry.id))
                    .map(|n| n.trim())
                    .filter(|n| !n.is_empty());
                let description = match note {
                    Some(note) => format!("Planned property viewing tour.\nNotes: {}", note),
                    None => "Planned property viewing tour.".to_string(),
                };
                CalendarEvent {
                    uid: None,
                    start: entry.eta,
                    end: entry.etd,
                    title: format!("Showing {}: {}", i + 1, entry.address),
                    description: Some(description),
                    location: Some(entry.address.clone()),
                }
            })
            .collect();
        let ics = generate_ics(&events, DEFAULT_PROD_ID);

        // Route detail for map display follows the exact visiting order,
        // custom start included.
        let mut route_coords = Vec::with_capacity(order.len() + 1);
        if let Some(start) = request.start_coord {
            route_coords.push(start);
        }
        route_coords.extend(order.iter().map(|&pos| stop_coords[pos]));

        let (route, leg_distances_km, total_distance_km, distance_estimated) =
            self.resolve_route(&route_coords).await;

        info!(
            "Planned tour: {} stops, {:.0} min drive, {:.1} km{}",
            order.len(),
            schedule.total_drive_minutes,
            total_distance_km,
            if matrix_estimated { " (estimated)" } else { "" }
        );

        Ok(TourResponse {
            order: order.iter().map(|&pos| selected[pos].id.clone()).collect(),
            schedule: schedule.entries,
            ics,
            route,
            total_drive_minutes: schedule.total_drive_minutes,
            leg_distances_km,
            total_distance_km,
            matrix_estimated,
            distance_estimated,
        })
    }

    /// De-duplicate requested ids (first occurrence wins), resolve them
    /// against the catalog and enforce the stop-count bounds.
    fn validate_stops(&self, ids: &[String]) -> Result<Vec<Stop>, TourError> {
        let mut seen = HashSet::new();
        let unique_ids: Vec<String> = ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();

        if unique_ids.len() < MIN_TOUR_STOPS {
            return Err(TourError::invalid("Pick at least two stops"));
        }
        if unique_ids.len() > MAX_TOUR_STOPS {
            return Err(TourError::invalid("Max 10 stops per tour"));
        }

        let selected = self.catalog.select(&unique_ids);
        if selected.len() < MIN_TOUR_STOPS {
            return Err(TourError::invalid("No matching stops selected"));
        }
        Ok(selected)
    }

    /// Live matrix when the routing service answers, haversine fallback
    /// otherwise. The boolean flags the fallback.
    async fn resolve_matrix(&self, coords: &[Coordinates]) -> (TravelMatrix, bool) {
        match self.routing.get_table(coords).await {
            Some(matrix) => (matrix, false),
            None => {
                warn!(
                    "Routing service ({}) unavailable, estimating travel times",
                    self.routing.name()
                );
                (geo::fallback_matrix(coords), true)
            }
        }
    }

    /// Manual order when it is a complete permutation of the selected
    /// stop ids; nearest-neighbor heuristic otherwise.
    fn resolve_order(
        &self,
        request: &TourRequest,
        selected: &[Stop],
        matrix: &TravelMatrix,
        layout: MatrixLayout,
    ) -> Result<Vec<usize>, TourError> {
        if let Some(order_ids) = &request.order_ids {
            if let Some(order) = resolve_manual_order(order_ids, selected) {
                debug!("Using caller-supplied stop order");
                return Ok(order);
            }
            debug!("Caller-supplied order is not a complete permutation, using heuristic");
        }

        let nn = nearest_neighbor_order(matrix, 0).map_err(TourError::Internal)?;
        Ok(nn
            .into_iter()
            .filter_map(|idx| layout.stop_position(idx))
            .collect())
    }

    /// Road geometry and distances when available; straight lines and
    /// haversine figures otherwise.
    async fn resolve_route(
        &self,
        route_coords: &[Coordinates],
    ) -> (Vec<[f64; 2]>, Vec<f64>, f64, bool) {
        if let Some(detail) = self.routing.get_route_detail(route_coords).await {
            let legs = detail.legs.iter().map(|leg| leg.distance_km).collect();
            return (detail.geometry, legs, detail.total_km, false);
        }

        let geometry = route_coords.iter().map(|c| [c.lng, c.lat]).collect();
        let legs: Vec<f64> = route_coords
            .windows(2)
            .map(|pair| haversine_km(&pair[0], &pair[1]))
            .collect();
        let total = geo::fallback_route_km(route_coords);
        (geometry, legs, total, true)
    }
}
