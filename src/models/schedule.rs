//! Timed schedule derived from an ordering.

use serde::{Deserialize, Serialize};

/// A single job placed on the machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledJob {
    /// Job index.
    pub job: usize,
    /// Start time.
    pub start: f64,
    /// Finish time (`start + p[job]`).
    pub finish: f64,
    /// Setup incurred from the immediately preceding job (0 for the first).
    pub setup: f64,
}

/// Start and finish times for the jobs of one ordering, in ordering order.
///
/// Produced fresh by the evaluator; never edited independently of the
/// ordering it was computed from.
///
/// # Examples
///
/// ```
/// use u_sequencing::models::{Schedule, ScheduledJob};
///
/// let mut schedule = Schedule::with_capacity(3, 1);
/// schedule.push(ScheduledJob { job: 2, start: 0.0, finish: 4.0, setup: 0.0 });
/// assert_eq!(schedule.len(), 1);
/// assert_eq!(schedule.finish(2), Some(4.0));
/// assert_eq!(schedule.finish(0), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleData", into = "ScheduleData")]
pub struct Schedule {
    entries: Vec<ScheduledJob>,
    slot: Vec<Option<usize>>,
}

/// Serialized shape of a [`Schedule`]; the job index is rebuilt on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScheduleData {
    jobs: usize,
    entries: Vec<ScheduledJob>,
}

impl Schedule {
    /// Creates an empty schedule for an instance with `n` jobs.
    pub fn with_capacity(n: usize, capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            slot: vec![None; n],
        }
    }

    /// Appends a placed job.
    ///
    /// # Panics
    ///
    /// Panics if `entry.job` is not below the instance size.
    pub fn push(&mut self, entry: ScheduledJob) {
        self.slot[entry.job] = Some(self.entries.len());
        self.entries.push(entry);
    }

    /// Placed jobs in ordering order.
    pub fn entries(&self) -> &[ScheduledJob] {
        &self.entries
    }

    /// Number of placed jobs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no job is placed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The ordering this schedule was computed from.
    pub fn sequence(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.job).collect()
    }

    /// Entry for `job`, if it is placed.
    pub fn get(&self, job: usize) -> Option<&ScheduledJob> {
        self.slot
            .get(job)
            .copied()
            .flatten()
            .map(|idx| &self.entries[idx])
    }

    /// Start time of `job`, if it is placed.
    pub fn start(&self, job: usize) -> Option<f64> {
        self.get(job).map(|e| e.start)
    }

    /// Finish time of `job`, if it is placed.
    pub fn finish(&self, job: usize) -> Option<f64> {
        self.get(job).map(|e| e.finish)
    }

    /// Finish time of the last job in ordering order (0 when empty).
    pub fn last_finish(&self) -> f64 {
        self.entries.last().map_or(0.0, |e| e.finish)
    }

    /// Largest finish time over all placed jobs (0 when empty).
    pub fn max_finish(&self) -> f64 {
        self.entries.iter().map(|e| e.finish).fold(0.0, f64::max)
    }

    /// Machine time spent on setups.
    pub fn total_setup(&self) -> f64 {
        self.entries.iter().map(|e| e.setup).sum()
    }

    /// Machine time spent neither processing nor setting up, up to the last finish.
    pub fn total_idle(&self) -> f64 {
        let mut idle = 0.0;
        let mut previous_finish = 0.0;
        for e in &self.entries {
            idle += e.start - e.setup - previous_finish;
            previous_finish = e.finish;
        }
        idle.max(0.0)
    }
}

impl TryFrom<ScheduleData> for Schedule {
    type Error = String;

    fn try_from(data: ScheduleData) -> Result<Self, Self::Error> {
        let mut schedule = Self::with_capacity(data.jobs, data.entries.len());
        for entry in data.entries {
            match schedule.slot.get(entry.job) {
                None => return Err(format!("job {} outside 0..{}", entry.job, data.jobs)),
                Some(Some(_)) => return Err(format!("job {} scheduled twice", entry.job)),
                Some(None) => schedule.push(entry),
            }
        }
        Ok(schedule)
    }
}

impl From<Schedule> for ScheduleData {
    fn from(schedule: Schedule) -> Self {
        Self {
            jobs: schedule.slot.len(),
            entries: schedule.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Schedule {
        let mut s = Schedule::with_capacity(3, 3);
        s.push(ScheduledJob {
            job: 1,
            start: 0.0,
            finish: 3.0,
            setup: 0.0,
        });
        s.push(ScheduledJob {
            job: 0,
            start: 5.0,
            finish: 7.0,
            setup: 1.0,
        });
        s
    }

    #[test]
    fn test_schedule_empty() {
        let s = Schedule::with_capacity(2, 0);
        assert!(s.is_empty());
        assert_eq!(s.last_finish(), 0.0);
        assert_eq!(s.start(0), None);
    }

    #[test]
    fn test_schedule_lookup() {
        let s = sample();
        assert_eq!(s.len(), 2);
        assert_eq!(s.sequence(), vec![1, 0]);
        assert_eq!(s.start(0), Some(5.0));
        assert_eq!(s.finish(1), Some(3.0));
        assert_eq!(s.get(2), None);
        assert_eq!(s.get(7), None);
    }

    #[test]
    fn test_schedule_totals() {
        let s = sample();
        assert!((s.last_finish() - 7.0).abs() < 1e-10);
        assert!((s.max_finish() - 7.0).abs() < 1e-10);
        assert!((s.total_setup() - 1.0).abs() < 1e-10);
        // Gap 3 -> 5 holds 1 unit of setup and 1 unit of waiting.
        assert!((s.total_idle() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_schedule_json_rebuilds_lookup() {
        let s = sample();
        let json = serde_json::to_string(&s).expect("serialize");
        let back: Schedule = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, s);
        assert_eq!(back.start(0), Some(5.0));
    }

    #[test]
    fn test_schedule_json_rejects_bad_jobs() {
        let entry = r#"{"job":3,"start":0.0,"finish":1.0,"setup":0.0}"#;
        let out_of_range = format!(r#"{{"jobs":2,"entries":[{entry}]}}"#);
        assert!(serde_json::from_str::<Schedule>(&out_of_range).is_err());

        let entry = r#"{"job":1,"start":0.0,"finish":1.0,"setup":0.0}"#;
        let twice = format!(r#"{{"jobs":2,"entries":[{entry},{entry}]}}"#);
        assert!(serde_json::from_str::<Schedule>(&twice).is_err());
    }
}
