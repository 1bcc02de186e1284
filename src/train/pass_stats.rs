use serde::{Deserialize, Serialize};

/// Outcome of one training pass, handed to the observer when the pass ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassStats {
    /// 0-based pass number.
    pub pass: usize,
    /// Pass budget of this run.
    pub max_passes: usize,
    /// Weight updates applied during the pass, in `[0, 2N]`.
    pub adjustments: usize,
    /// Wall-clock duration of the pass in milliseconds.
    pub elapsed_ms: u64,
}

/// Summary of a full baseline → train → final run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Classifications per evaluation pass (`2N`).
    pub attempts: usize,
    pub baseline_fails: usize,
    pub final_fails: usize,
    pub passes: Vec<PassStats>,
    /// True when a pass finished with zero adjustments.
    pub converged: bool,
    /// Weight snapshots handed to the observer over the whole run.
    pub snapshots: usize,
}

impl TrainingReport {
    pub fn baseline_fail_rate(&self) -> f64 {
        fail_rate(self.baseline_fails, self.attempts)
    }

    pub fn final_fail_rate(&self) -> f64 {
        fail_rate(self.final_fails, self.attempts)
    }
}

pub fn fail_rate(fails: usize, attempts: usize) -> f64 {
    if attempts == 0 {
        return 0.0;
    }
    fails as f64 / attempts as f64
}
