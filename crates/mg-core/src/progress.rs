/// Turns raw service percentages into the values shown to the user.
///
/// The service may report progress that jumps backwards between polls or
/// reaches 100 before the job is actually finished. Reported values never
/// decrease, and 100 is only emitted once, by [`ProgressTracker::finish`].
#[derive(Debug, Default, Clone)]
pub struct ProgressTracker {
    last: Option<u8>,
    finished: bool,
}

/// Highest value a job that has not finished yet may report
pub const MAX_PENDING_PERCENT: u8 = 99;

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a progress value for a job that is still running.
    pub fn observe(&mut self, reported: u8) -> u8 {
        let capped = reported.min(MAX_PENDING_PERCENT);
        let value = self.last.map_or(capped, |last| last.max(capped));
        self.last = Some(value);
        value
    }

    /// Mark the job as done. Returns `Some(100)` the first time only.
    pub fn finish(&mut self) -> Option<u8> {
        if self.finished {
            return None;
        }
        self.finished = true;
        self.last = Some(100);
        Some(100)
    }

    pub fn last(&self) -> Option<u8> {
        self.last
    }
}
