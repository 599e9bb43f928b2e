//! Course unit completion
//!
//! Unit rows are the only record of progress; the counts are always
//! recomputed from them.

/// Completion counts for one course
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UnitProgress {
    pub total: i64,
    pub completed: i64,
}

impl UnitProgress {
    /// Completed share in percent, 0 for a course without units
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed as f64 / self.total as f64 * 1000.0).round() / 10.0
    }
}

/// Count total and completed units from completion flags
pub fn unit_progress<I>(flags: I) -> UnitProgress
where
    I: IntoIterator<Item = bool>,
{
    flags
        .into_iter()
        .fold(UnitProgress::default(), |mut progress, complete| {
            progress.total += 1;
            if complete {
                progress.completed += 1;
            }
            progress
        })
}
