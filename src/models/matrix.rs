//! Dense square matrix of pairwise durations.

use serde::{Deserialize, Serialize};

/// A dense n×n matrix of durations stored in row-major order.
///
/// Holds the setup times `s[i][j]` and the precedence delays `d[i][j]` of an
/// [`Instance`](super::Instance). Rows are indexed by the preceding job.
///
/// # Examples
///
/// ```
/// use u_sequencing::models::TimeMatrix;
///
/// let m = TimeMatrix::from_rows(&[vec![0.0, 3.0], vec![4.0, 0.0]]).unwrap();
/// assert_eq!(m.get(0, 1), 3.0);
/// assert_eq!(m.get(1, 0), 4.0);
/// assert_eq!(m.size(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatrixData", into = "MatrixData")]
pub struct TimeMatrix {
    data: Vec<f64>,
    size: usize,
}

/// Serialized shape of a [`TimeMatrix`]; checked by [`TimeMatrix::from_data`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MatrixData {
    data: Vec<f64>,
    size: usize,
}

impl TryFrom<MatrixData> for TimeMatrix {
    type Error = String;

    fn try_from(raw: MatrixData) -> Result<Self, Self::Error> {
        let (size, len) = (raw.size, raw.data.len());
        Self::from_data(size, raw.data)
            .ok_or_else(|| format!("{len} entries cannot fill a {size}x{size} matrix"))
    }
}

impl From<TimeMatrix> for MatrixData {
    fn from(matrix: TimeMatrix) -> Self {
        Self {
            data: matrix.data,
            size: matrix.size,
        }
    }
}

impl TimeMatrix {
    /// Creates a matrix of the given size with every entry set to `value`.
    pub fn filled(size: usize, value: f64) -> Self {
        Self {
            data: vec![value; size * size],
            size,
        }
    }

    /// Creates a matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self::filled(size, 0.0)
    }

    /// Creates a matrix from a flat row-major buffer.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Creates a matrix from nested rows.
    ///
    /// Returns `None` unless every row has exactly `rows.len()` entries.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|r| r.len() != size) {
            return None;
        }
        let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Some(Self { data, size })
    }

    /// Returns the entry for the ordered pair `(from, to)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the entry for the ordered pair `(from, to)`.
    pub fn set(&mut self, from: usize, to: usize, value: f64) {
        self.data[from * self.size + to] = value;
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns row `from` as a slice.
    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.size..(from + 1) * self.size]
    }

    /// Largest entry of column `to`, or 0 for an empty matrix.
    pub fn column_max(&self, to: usize) -> f64 {
        (0..self.size).map(|i| self.get(i, to)).fold(0.0, f64::max)
    }

    /// Copies the matrix back into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.size).map(|i| self.row(i).to_vec()).collect()
    }
}
