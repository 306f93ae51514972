//! Problem instance and its shape invariants.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TimeMatrix;

/// Marker stored in the delay matrix when no precedence exists between a pair.
pub const NO_DELAY: f64 = -1.0;

/// Reason an [`Instance`] was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceError {
    /// A matrix does not have one row per job.
    ShapeMismatch {
        /// Which table is malformed (`"setup"` or `"delay"`).
        field: &'static str,
        /// Expected side length (number of jobs).
        expected: usize,
        /// Number of rows found.
        found: usize,
    },
    /// A matrix row does not have one entry per job.
    RaggedRow {
        /// Which table is malformed (`"setup"` or `"delay"`).
        field: &'static str,
        /// Offending row.
        row: usize,
        /// Expected row length (number of jobs).
        expected: usize,
        /// Entries found.
        found: usize,
    },
    /// Processing time is negative or not finite.
    InvalidProcessing {
        /// Offending job.
        job: usize,
        /// Value found.
        value: f64,
    },
    /// Setup time is negative or not finite.
    InvalidSetup {
        /// Preceding job.
        from: usize,
        /// Following job.
        to: usize,
        /// Value found.
        value: f64,
    },
    /// `s[j][j]` is not zero.
    NonZeroSetupDiagonal {
        /// Offending job.
        job: usize,
        /// Value found.
        value: f64,
    },
    /// Delay is neither `-1` nor a finite non-negative number.
    InvalidDelay {
        /// Predecessor.
        from: usize,
        /// Successor.
        to: usize,
        /// Value found.
        value: f64,
    },
    /// Instance text or JSON could not be parsed.
    Parse {
        /// 1-based line number of the offending input.
        line: usize,
        /// What went wrong.
        message: String,
    },
    /// Instance file could not be read.
    Io(String),
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                field,
                expected,
                found,
            } => write!(f, "{field} matrix must be {expected}x{expected}, got {found} rows"),
            Self::RaggedRow {
                field,
                row,
                expected,
                found,
            } => write!(f, "{field} row {row} must have {expected} entries, got {found}"),
            Self::InvalidProcessing { job, value } => {
                write!(f, "processing time of job {job} must be finite and >= 0, got {value}")
            }
            Self::InvalidSetup { from, to, value } => {
                write!(f, "setup {from}->{to} must be finite and >= 0, got {value}")
            }
            Self::NonZeroSetupDiagonal { job, value } => {
                write!(f, "setup {job}->{job} must be 0, got {value}")
            }
            Self::InvalidDelay { from, to, value } => {
                write!(f, "delay {from}->{to} must be -1 or finite and >= 0, got {value}")
            }
            Self::Parse { line, message } => write!(f, "line {line}: {message}"),
            Self::Io(message) => write!(f, "cannot read instance: {message}"),
        }
    }
}

impl std::error::Error for InstanceError {}

/// Serialized shape of an [`Instance`]; validated on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InstanceData {
    processing: Vec<f64>,
    setup: Vec<Vec<f64>>,
    delay: Vec<Vec<f64>>,
}

/// Immutable single-machine sequencing instance.
///
/// Jobs are indexed `0..n`. Each job has a processing time `p[j]`; `s[i][j]`
/// is the setup incurred when `j` runs immediately after `i`; `d[i][j]` is the
/// minimum gap between the finish of `i` and the start of `j`, with `-1`
/// meaning "no precedence".
///
/// All shape invariants are checked once in [`Instance::new`]; afterwards the
/// instance is shared read-only by every search component. The precedence
/// arcs are not required to form a DAG: a cycle, or a job listed as its own
/// predecessor, only means the jobs involved can never be placed, which the
/// evaluator reports and the builders treat as a blocked construction.
///
/// # Examples
///
/// ```
/// use u_sequencing::models::Instance;
///
/// let inst = Instance::from_rows(
///     vec![1.0, 1.0],
///     vec![vec![0.0, 0.0], vec![0.0, 0.0]],
///     vec![vec![-1.0, 5.0], vec![-1.0, -1.0]],
/// )
/// .unwrap();
/// assert_eq!(inst.n(), 2);
/// assert_eq!(inst.delay(0, 1), Some(5.0));
/// assert_eq!(inst.delay(1, 0), None);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "InstanceData", into = "InstanceData")]
pub struct Instance {
    processing: Vec<f64>,
    setup: TimeMatrix,
    delay: TimeMatrix,
    predecessors: Vec<Vec<(usize, f64)>>,
    successors: Vec<Vec<(usize, f64)>>,
}

impl Instance {
    /// Creates an instance, checking every shape invariant.
    pub fn new(
        processing: Vec<f64>,
        setup: TimeMatrix,
        delay: TimeMatrix,
    ) -> Result<Self, InstanceError> {
        let n = processing.len();
        if setup.size() != n {
            return Err(InstanceError::ShapeMismatch {
                field: "setup",
                expected: n,
                found: setup.size(),
            });
        }
        if delay.size() != n {
            return Err(InstanceError::ShapeMismatch {
                field: "delay",
                expected: n,
                found: delay.size(),
            });
        }

        for (job, &value) in processing.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(InstanceError::InvalidProcessing { job, value });
            }
        }

        let mut predecessors = vec![Vec::new(); n];
        let mut successors = vec![Vec::new(); n];
        for from in 0..n {
            for to in 0..n {
                let s = setup.get(from, to);
                if !s.is_finite() || s < 0.0 {
                    return Err(InstanceError::InvalidSetup { from, to, value: s });
                }
                if from == to && s != 0.0 {
                    return Err(InstanceError::NonZeroSetupDiagonal { job: from, value: s });
                }

                let d = delay.get(from, to);
                if d == NO_DELAY {
                    continue;
                }
                if !d.is_finite() || d < 0.0 {
                    return Err(InstanceError::InvalidDelay { from, to, value: d });
                }
                predecessors[to].push((from, d));
                successors[from].push((to, d));
            }
        }

        Ok(Self {
            processing,
            setup,
            delay,
            predecessors,
            successors,
        })
    }

    /// Creates an instance from nested rows (`-1` marks "no precedence").
    pub fn from_rows(
        processing: Vec<f64>,
        setup: Vec<Vec<f64>>,
        delay: Vec<Vec<f64>>,
    ) -> Result<Self, InstanceError> {
        let n = processing.len();
        let setup = square(n, "setup", &setup)?;
        let delay = square(n, "delay", &delay)?;
        Self::new(processing, setup, delay)
    }

    /// Creates an instance with no precedence constraints.
    pub fn without_precedence(
        processing: Vec<f64>,
        setup: TimeMatrix,
    ) -> Result<Self, InstanceError> {
        let n = processing.len();
        Self::new(processing, setup, TimeMatrix::filled(n, NO_DELAY))
    }

    /// Number of jobs.
    pub fn n(&self) -> usize {
        self.processing.len()
    }

    /// Returns `true` if the instance has no jobs.
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    /// Processing time `p[job]`.
    pub fn processing(&self, job: usize) -> f64 {
        self.processing[job]
    }

    /// All processing times.
    pub fn processing_times(&self) -> &[f64] {
        &self.processing
    }

    /// Setup time `s[from][to]`.
    pub fn setup(&self, from: usize, to: usize) -> f64 {
        self.setup.get(from, to)
    }

    /// The full setup matrix.
    pub fn setup_matrix(&self) -> &TimeMatrix {
        &self.setup
    }

    /// Minimum delay between the finish of `from` and the start of `to`,
    /// or `None` when no precedence exists.
    pub fn delay(&self, from: usize, to: usize) -> Option<f64> {
        let d = self.delay.get(from, to);
        (d != NO_DELAY).then_some(d)
    }

    /// The raw delay matrix (`-1` for "no precedence").
    pub fn delay_matrix(&self) -> &TimeMatrix {
        &self.delay
    }

    /// Jobs that must precede `job`, with their delays.
    pub fn predecessors(&self, job: usize) -> &[(usize, f64)] {
        &self.predecessors[job]
    }

    /// Jobs that `job` must precede, with their delays.
    pub fn successors(&self, job: usize) -> &[(usize, f64)] {
        &self.successors[job]
    }

    /// Number of precedence arcs.
    pub fn num_precedences(&self) -> usize {
        self.predecessors.iter().map(Vec::len).sum()
    }

    /// Sum of all processing times (a lower bound on any complete makespan).
    pub fn total_processing(&self) -> f64 {
        self.processing.iter().sum()
    }
}

/// Packs `rows` into an `n x n` matrix, naming the first bad dimension.
fn square(n: usize, field: &'static str, rows: &[Vec<f64>]) -> Result<TimeMatrix, InstanceError> {
    if rows.len() != n {
        return Err(InstanceError::ShapeMismatch {
            field,
            expected: n,
            found: rows.len(),
        });
    }
    if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
        return Err(InstanceError::RaggedRow {
            field,
            row,
            expected: n,
            found: r.len(),
        });
    }
    TimeMatrix::from_rows(rows).ok_or(InstanceError::ShapeMismatch {
        field,
        expected: n,
        found: rows.len(),
    })
}

impl TryFrom<InstanceData> for Instance {
    type Error = InstanceError;

    fn try_from(data: InstanceData) -> Result<Self, Self::Error> {
        Self::from_rows(data.processing, data.setup, data.delay)
    }
}

impl From<Instance> for InstanceData {
    fn from(instance: Instance) -> Self {
        Self {
            setup: instance.setup.to_rows(),
            delay: instance.delay.to_rows(),
            processing: instance.processing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zeros(n: usize) -> Vec<Vec<f64>> {
        vec![vec![0.0; n]; n]
    }

    fn no_delay(n: usize) -> Vec<Vec<f64>> {
        vec![vec![NO_DELAY; n]; n]
    }

    #[test]
    fn test_valid_instance() {
        let mut d = no_delay(3);
        d[0][2] = 4.0;
        let inst = Instance::from_rows(vec![2.0, 3.0, 1.0], zeros(3), d).expect("valid");
        assert_eq!(inst.n(), 3);
        assert_eq!(inst.processing(1), 3.0);
        assert_eq!(inst.predecessors(2), &[(0, 4.0)]);
        assert_eq!(inst.successors(0), &[(2, 4.0)]);
        assert_eq!(inst.num_precedences(), 1);
        assert!((inst.total_processing() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_instance() {
        let inst = Instance::from_rows(vec![], vec![], vec![]).expect("valid");
        assert!(inst.is_empty());
    }

    #[test]
    fn test_shape_mismatch() {
        let err = Instance::from_rows(vec![1.0, 2.0], zeros(3), no_delay(2)).unwrap_err();
        assert!(matches!(
            err,
            InstanceError::ShapeMismatch {
                field: "setup",
                expected: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_negative_processing() {
        let err = Instance::from_rows(vec![1.0, -2.0], zeros(2), no_delay(2)).unwrap_err();
        assert_eq!(err, InstanceError::InvalidProcessing { job: 1, value: -2.0 });
    }

    #[test]
    fn test_nonzero_diagonal() {
        let mut s = zeros(2);
        s[1][1] = 3.0;
        let err = Instance::from_rows(vec![1.0, 1.0], s, no_delay(2)).unwrap_err();
        assert_eq!(err, InstanceError::NonZeroSetupDiagonal { job: 1, value: 3.0 });
    }

    #[test]
    fn test_invalid_delay() {
        let mut d = no_delay(2);
        d[0][1] = -3.0;
        let err = Instance::from_rows(vec![1.0, 1.0], zeros(2), d).unwrap_err();
        assert!(matches!(err, InstanceError::InvalidDelay { from: 0, to: 1, .. }));
    }

    #[test]
    fn test_self_precedence_accepted() {
        let mut d = no_delay(2);
        d[0][0] = 0.0;
        let inst = Instance::from_rows(vec![1.0, 1.0], zeros(2), d).expect("valid");
        assert_eq!(inst.predecessors(0), &[(0, 0.0)]);
    }

    #[test]
    fn test_cycle_accepted() {
        let mut d = no_delay(3);
        d[0][1] = 0.0;
        d[1][0] = 0.0;
        let inst = Instance::from_rows(vec![1.0; 3], zeros(3), d).expect("valid");
        assert_eq!(inst.predecessors(0), &[(1, 0.0)]);
        assert_eq!(inst.predecessors(1), &[(0, 0.0)]);
        assert_eq!(inst.num_precedences(), 2);
    }

    #[test]
    fn test_ragged_row_reports_row_length() {
        let err = Instance::from_rows(
            vec![1.0, 1.0],
            vec![vec![0.0, 0.0], vec![0.0]],
            no_delay(2),
        )
        .unwrap_err();
        assert_eq!(
            err,
            InstanceError::RaggedRow {
                field: "setup",
                row: 1,
                expected: 2,
                found: 1
            }
        );
        assert_eq!(err.to_string(), "setup row 1 must have 2 entries, got 1");
    }

    #[test]
    fn test_delay_accessor() {
        let mut d = no_delay(2);
        d[1][0] = 0.0;
        let inst = Instance::from_rows(vec![1.0, 1.0], zeros(2), d).expect("valid");
        assert_eq!(inst.delay(1, 0), Some(0.0));
        assert_eq!(inst.delay(0, 1), None);
    }

    #[test]
    fn test_json_round_trip_validates() {
        let mut d = no_delay(2);
        d[0][1] = 5.0;
        let inst = Instance::from_rows(vec![1.0, 2.0], zeros(2), d).expect("valid");
        let json = serde_json::to_string(&inst).expect("serialize");
        let back: Instance = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.delay(0, 1), Some(5.0));
        assert_eq!(back.processing_times(), &[1.0, 2.0]);

        let bad = r#"{"processing":[1.0],"setup":[[2.0]],"delay":[[-1.0]]}"#;
        assert!(serde_json::from_str::<Instance>(bad).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = InstanceError::Parse {
            line: 3,
            message: "expected 'A='".into(),
        };
        assert_eq!(err.to_string(), "line 3: expected 'A='");
    }
}
