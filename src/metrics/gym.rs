//! Personal-record detection
//!
//! Plans store sets, reps and weight as free text because a plan can say
//! "8-12" or "50kg". When a plan is completed each entry is parsed into a
//! number pair; entries that do not parse are skipped without error.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Outcome of parsing one planned exercise
#[derive(Debug, Clone, PartialEq)]
pub enum LiftParse {
    Parsed { weight: f64, reps: i64 },
    Skipped(SkipReason),
}

/// Why an entry was left out of PR detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingWeight,
    MissingReps,
    NonPositive,
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("valid number pattern"))
}

/// Largest number in a free-text field ("8-10" -> 10, "50kg" -> 50)
fn upper_bound(text: &str) -> Option<f64> {
    number_pattern()
        .find_iter(text)
        .filter_map(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
        .fold(None, |best: Option<f64>, n| Some(best.map_or(n, |b| b.max(n))))
}

/// Parse the weight and reps text of a planned exercise
pub fn parse_lift(weight: Option<&str>, reps: Option<&str>) -> LiftParse {
    let Some(weight) = weight.and_then(upper_bound) else {
        return LiftParse::Skipped(SkipReason::MissingWeight);
    };
    let Some(reps) = reps.and_then(upper_bound) else {
        return LiftParse::Skipped(SkipReason::MissingReps);
    };

    let reps = reps.trunc() as i64;
    if weight <= 0.0 || reps < 1 {
        return LiftParse::Skipped(SkipReason::NonPositive);
    }

    LiftParse::Parsed { weight, reps }
}

/// Epley estimate: `weight * (1 + reps / 30)`
pub fn estimated_one_rep_max(weight: f64, reps: i64) -> f64 {
    weight * (1.0 + reps as f64 / 30.0)
}

/// Best estimated max per exercise, updated as new lifts are accepted
#[derive(Debug, Default)]
pub struct PrTracker {
    best: HashMap<i64, f64>,
}

impl PrTracker {
    /// Seed from existing `(exercise_id, weight, reps)` records
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (i64, f64, i64)>,
    {
        let mut tracker = Self::default();
        for (exercise_id, weight, reps) in records {
            let e1rm = estimated_one_rep_max(weight, reps);
            let best = tracker.best.entry(exercise_id).or_insert(e1rm);
            if e1rm > *best {
                *best = e1rm;
            }
        }
        tracker
    }

    /// Current best estimate for an exercise
    pub fn best(&self, exercise_id: i64) -> Option<f64> {
        self.best.get(&exercise_id).copied()
    }

    /// Accept the lift if it strictly beats the current best
    pub fn consider(&mut self, exercise_id: i64, weight: f64, reps: i64) -> bool {
        let e1rm = estimated_one_rep_max(weight, reps);
        match self.best.get(&exercise_id) {
            Some(best) if e1rm <= *best => false,
            _ => {
                self.best.insert(exercise_id, e1rm);
                true
            }
        }
    }
}
