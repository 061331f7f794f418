//! Travel-time matrix and index layout
//!
//! The matrix covers every coordinate fed to the routing service. When the
//! caller supplies a custom start point it is prepended to the coordinate
//! sequence, so matrix indices are shifted by one relative to stop
//! positions. `MatrixLayout` owns that mapping so the shift is never
//! recomputed inline.

/// Sentinel for a pair the routing service could not price.
pub const UNKNOWN_MINUTES: f64 = -1.0;

/// Square travel-time table in minutes. The diagonal is always zero;
/// off-diagonal cells are non-negative minutes or [`UNKNOWN_MINUTES`].
#[derive(Debug, Clone)]
pub struct TravelMatrix {
    rows: Vec<Vec<f64>>,
}

impl TravelMatrix {
    /// Wrap raw rows. The caller is responsible for squareness; use
    /// [`TravelMatrix::is_square`] before index-heavy consumers.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// All-zero n×n matrix.
    pub fn zeros(n: usize) -> Self {
        Self {
            rows: vec![vec![0.0; n]; n],
        }
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_square(&self) -> bool {
        let n = self.rows.len();
        self.rows.iter().all(|row| row.len() == n)
    }

    /// Minutes from `from` to `to`. May be [`UNKNOWN_MINUTES`].
    pub fn minutes(&self, from: usize, to: usize) -> f64 {
        self.rows[from][to]
    }

    pub fn set(&mut self, from: usize, to: usize, minutes: f64) {
        self.rows[from][to] = minutes;
    }
}

/// Maps logical stop positions to matrix rows/columns.
///
/// With a custom start point the matrix is one larger than the stop list:
/// index 0 is the start, stop `i` sits at `i + 1`. Without one the two
/// index spaces coincide.
#[derive(Debug, Clone, Copy)]
pub struct MatrixLayout {
    has_custom_start: bool,
}

impl MatrixLayout {
    pub fn new(has_custom_start: bool) -> Self {
        Self { has_custom_start }
    }

    /// Matrix index of the custom start point, if present.
    pub fn start_index(&self) -> Option<usize> {
        self.has_custom_start.then_some(0)
    }

    /// Matrix index for a stop position.
    pub fn stop_index(&self, stop_pos: usize) -> usize {
        if self.has_custom_start {
            stop_pos + 1
        } else {
            stop_pos
        }
    }

    /// Inverse of [`MatrixLayout::stop_index`]. `None` for the start index.
    pub fn stop_position(&self, matrix_idx: usize) -> Option<usize> {
        if self.has_custom_start {
            matrix_idx.checked_sub(1)
        } else {
            Some(matrix_idx)
        }
    }
}
