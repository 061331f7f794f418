//! Schedule computation for an ordered tour
//!
//! Walks the visiting order with a running clock and produces arrival and
//! departure instants per stop. The order is fixed by the time this runs;
//! no re-optimisation happens here.

use chrono::{DateTime, Duration, Utc};

use crate::services::matrix::{MatrixLayout, TravelMatrix};
use crate::types::{ScheduleEntry, Stop};

/// Computed schedule plus aggregate travel figures.
#[derive(Debug, Clone)]
pub struct Schedule {
    /// Per-stop entries in visiting order.
    pub entries: Vec<ScheduleEntry>,
    /// Travel minutes per leg (parallel to `entries`).
    pub leg_minutes: Vec<f64>,
    /// Sum of all travel legs, excluding dwell and buffer.
    pub total_drive_minutes: f64,
}

fn add_minutes(t: DateTime<Utc>, minutes: f64) -> DateTime<Utc> {
    t + Duration::milliseconds((minutes * 60_000.0).round() as i64)
}

/// Build the timed schedule for `order` (stop positions into `stops`).
///
/// The clock starts at `start_time`; each stop advances it by leg travel
/// plus `buffer_minutes` to get the ETA, then by `dwell_minutes` to get
/// the ETD. The first leg is priced from the custom start point when the
/// layout has one, otherwise it is free. Unknown matrix cells count as
/// zero travel rather than corrupting the clock.
pub fn build_schedule(
    stops: &[Stop],
    order: &[usize],
    matrix: &TravelMatrix,
    layout: MatrixLayout,
    start_time: DateTime<Utc>,
    dwell_minutes: i64,
    buffer_minutes: i64,
) -> Schedule {
    let mut entries = Vec::with_capacity(order.len());
    let mut leg_minutes = Vec::with_capacity(order.len());
    let mut total_drive_minutes = 0.0;

    let mut cursor = start_time;
    let mut prev_matrix_idx = layout.start_index();

    for &stop_pos in order {
        let stop = &stops[stop_pos];
        let to_idx = layout.stop_index(stop_pos);

        let travel = match prev_matrix_idx {
            Some(from_idx) => matrix.minutes(from_idx, to_idx).max(0.0),
            None => 0.0,
        };

        leg_minutes.push(travel);
        total_drive_minutes += travel;

        let eta = add_minutes(cursor, travel + buffer_minutes as f64);
        let etd = add_minutes(eta, dwell_minutes as f64);

        entries.push(ScheduleEntry {
            id: stop.id.clone(),
            address: stop.address.clone(),
            eta,
            etd,
            travel_minutes: travel,
            visit_minutes: dwell_minutes,
        });

        cursor = etd;
        prev_matrix_idx = Some(to_idx);
    }

    Schedule {
        entries,
        leg_minutes,
        total_drive_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stops(n: usize) -> Vec<Stop> {
        (0..n)
            .map(|i| Stop {
                id: format!("s{}", i),
                address: format!("{} Oak St", 100 + i),
                lat: 30.0,
                lng: -97.0,
            })
            .collect()
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 0, 0).unwrap()
    }

    #[test]
    fn custom_start_walk_matches_leg_durations() {
        // Matrix layout: [start=0, a=1, b=2]. start→a = 10 min, a→b = 15 min.
        let mut matrix = TravelMatrix::zeros(3);
        matrix.set(0, 1, 10.0);
        matrix.set(1, 2, 15.0);
        let layout = MatrixLayout::new(true);

        let schedule = build_schedule(&stops(2), &[0, 1], &matrix, layout, start(), 20, 5);

        assert_eq!(schedule.entries.len(), 2);

        // ETA[0] = T + 10 + 5, ETD[0] = ETA[0] + 20
        let a = &schedule.entries[0];
        assert_eq!(a.eta, add_minutes(start(), 15.0));
        assert_eq!(a.etd, add_minutes(start(), 35.0));
        assert_eq!(a.travel_minutes, 10.0);
        assert_eq!(a.visit_minutes, 20);

        // ETA[1] = ETD[0] + 15 + 5, ETD[1] = ETA[1] + 20
        let b = &schedule.entries[1];
        assert_eq!(b.eta, add_minutes(start(), 55.0));
        assert_eq!(b.etd, add_minutes(start(), 75.0));

        assert_eq!(schedule.total_drive_minutes, 25.0);
        assert_eq!(schedule.leg_minutes, vec![10.0, 15.0]);
    }

    #[test]
    fn no_custom_start_first_leg_is_free() {
        let mut matrix = TravelMatrix::zeros(2);
        matrix.set(0, 1, 12.0);
        matrix.set(1, 0, 12.0);
        let layout = MatrixLayout::new(false);

        let schedule = build_schedule(&stops(2), &[0, 1], &matrix, layout, start(), 30, 5);

        // First stop: only the buffer before arrival.
        assert_eq!(schedule.entries[0].eta, add_minutes(start(), 5.0));
        assert_eq!(schedule.entries[0].travel_minutes, 0.0);
        // Second stop: 12 min travel + 5 buffer after 30 min dwell.
        assert_eq!(schedule.entries[1].eta, add_minutes(start(), 5.0 + 30.0 + 17.0));
        assert_eq!(schedule.total_drive_minutes, 12.0);
    }

    #[test]
    fn etd_always_eta_plus_dwell() {
        let mut matrix = TravelMatrix::zeros(4);
        for i in 0..4 {
            for j in 0..4 {
                if i != j {
                    matrix.set(i, j, 7.5);
                }
            }
        }
        let layout = MatrixLayout::new(false);
        let schedule = build_schedule(&stops(4), &[2, 0, 3, 1], &matrix, layout, start(), 45, 0);

        for entry in &schedule.entries {
            assert_eq!(entry.etd - entry.eta, Duration::minutes(45));
        }
        // Visiting order preserved in the entries.
        let ids: Vec<&str> = schedule.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["s2", "s0", "s3", "s1"]);
    }

    #[test]
    fn unknown_travel_counts_as_zero() {
        let mut matrix = TravelMatrix::zeros(2);
        matrix.set(0, 1, -1.0);
        let layout = MatrixLayout::new(false);

        let schedule = build_schedule(&stops(2), &[0, 1], &matrix, layout, start(), 20, 0);

        assert_eq!(schedule.entries[1].travel_minutes, 0.0);
        assert_eq!(schedule.total_drive_minutes, 0.0);
    }

    #[test]
    fn empty_order_yields_empty_schedule() {
        let matrix = TravelMatrix::zeros(0);
        let schedule = build_schedule(&[], &[], &matrix, MatrixLayout::new(false), start(), 20, 5);
        assert!(schedule.entries.is_empty());
        assert_eq!(schedule.total_drive_minutes, 0.0);
    }
}
