//! Tour ordering
//!
//! Nearest-neighbor heuristic over a travel-time matrix, plus validation
//! of caller-supplied manual orders. Stop counts are capped at 10
//! upstream, so the O(n²) greedy walk is plenty.

use std::collections::{HashMap, HashSet};

use anyhow::{bail, Result};

use crate::services::matrix::TravelMatrix;
use crate::types::Stop;

/// Order matrix indices by the nearest-neighbor heuristic.
///
/// Starts at `start_index` and repeatedly moves to the closest unvisited
/// index with a known non-negative duration. Rows without any valid entry
/// fall back to the first unvisited index, so the result is a complete
/// permutation even for degenerate matrices.
pub fn nearest_neighbor_order(matrix: &TravelMatrix, start_index: usize) -> Result<Vec<usize>> {
    let n = matrix.size();
    if n == 0 {
        return Ok(vec![]);
    }
    if !matrix.is_square() {
        bail!("Travel matrix is not square");
    }
    if start_index >= n {
        bail!("Start index {} out of bounds for {} locations", start_index, n);
    }

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    order.push(start_index);
    visited[start_index] = true;
    let mut current = start_index;

    for _ in 1..n {
        let mut next: Option<usize> = None;
        let mut best = f64::INFINITY;
        for j in 0..n {
            let minutes = matrix.minutes(current, j);
            if !visited[j] && minutes >= 0.0 && minutes < best {
                best = minutes;
                next = Some(j);
            }
        }

        // Disconnected row: take the first remaining index so the walk
        // always terminates with a full permutation.
        let next = match next {
            Some(j) => j,
            None => (0..n)
                .find(|&j| !visited[j])
                .expect("unvisited index exists while order is incomplete"),
        };

        visited[next] = true;
        order.push(next);
        current = next;
    }

    Ok(order)
}

/// Validate a caller-supplied order against the selected stops.
///
/// Returns stop positions only when `order_ids` is a complete permutation
/// of the exact stop id set — same cardinality, no duplicates, every id
/// present. Anything else returns `None` and the caller falls back to the
/// heuristic order.
pub fn resolve_manual_order(order_ids: &[String], stops: &[Stop]) -> Option<Vec<usize>> {
    if order_ids.len() != stops.len() {
        return None;
    }

    let unique: HashSet<&String> = order_ids.iter().collect();
    if unique.len() != order_ids.len() {
        return None;
    }

    let id_to_pos: HashMap<&str, usize> = stops
        .iter()
        .enumerate()
        .map(|(pos, stop)| (stop.id.as_str(), pos))
        .collect();

    order_ids
        .iter()
        .map(|id| id_to_pos.get(id.as_str()).copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<Vec<f64>>) -> TravelMatrix {
        TravelMatrix::from_rows(rows)
    }

    fn stop(id: &str) -> Stop {
        Stop {
            id: id.to_string(),
            address: format!("{} Test Ln", id),
            lat: 30.0,
            lng: -97.0,
        }
    }

    #[test]
    fn empty_matrix_gives_empty_order() {
        let order = nearest_neighbor_order(&matrix(vec![]), 0).unwrap();
        assert!(order.is_empty());
    }

    #[test]
    fn triangle_matrix_orders_greedily() {
        let m = matrix(vec![
            vec![0.0, 1.0, 5.0],
            vec![1.0, 0.0, 1.0],
            vec![5.0, 1.0, 0.0],
        ]);
        assert_eq!(nearest_neighbor_order(&m, 0).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn order_is_a_permutation_starting_at_start_index() {
        let m = matrix(vec![
            vec![0.0, 9.0, 2.0, 4.0],
            vec![9.0, 0.0, 3.0, 1.0],
            vec![2.0, 3.0, 0.0, 7.0],
            vec![4.0, 1.0, 7.0, 0.0],
        ]);
        let order = nearest_neighbor_order(&m, 2).unwrap();

        assert_eq!(order[0], 2);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
    }

    #[test]
    fn start_index_out_of_bounds_fails() {
        let m = matrix(vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
        let err = nearest_neighbor_order(&m, 2).unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
    }

    #[test]
    fn non_square_matrix_fails() {
        let m = matrix(vec![vec![0.0, 1.0], vec![1.0]]);
        assert!(nearest_neighbor_order(&m, 0).is_err());
    }

    #[test]
    fn degenerate_matrix_still_visits_everything() {
        // Row 1 has no valid way out; the walk must still finish.
        let m = matrix(vec![
            vec![0.0, 1.0, -1.0],
            vec![-1.0, 0.0, -1.0],
            vec![-1.0, -1.0, 0.0],
        ]);
        let order = nearest_neighbor_order(&m, 0).unwrap();

        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);
        assert_eq!(order[0], 0);
    }

    #[test]
    fn manual_order_accepts_complete_permutation() {
        let stops = vec![stop("a"), stop("b"), stop("c")];
        let order_ids: Vec<String> = ["c", "a", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(resolve_manual_order(&order_ids, &stops), Some(vec![2, 0, 1]));
    }

    #[test]
    fn manual_order_rejects_subset() {
        let stops = vec![stop("a"), stop("b"), stop("c")];
        let order_ids: Vec<String> = ["c", "a"].iter().map(|s| s.to_string()).collect();
        assert_eq!(resolve_manual_order(&order_ids, &stops), None);
    }

    #[test]
    fn manual_order_rejects_duplicates() {
        let stops = vec![stop("a"), stop("b"), stop("c")];
        let order_ids: Vec<String> = ["a", "a", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(resolve_manual_order(&order_ids, &stops), None);
    }

    #[test]
    fn manual_order_rejects_unknown_id() {
        let stops = vec![stop("a"), stop("b")];
        let order_ids: Vec<String> = ["a", "z"].iter().map(|s| s.to_string()).collect();
        assert_eq!(resolve_manual_order(&order_ids, &stops), None);
    }
}
