//! Lecture completion

use chrono::NaiveDate;

/// A lecture is finished once every assigned university lecture is studied
pub fn is_finished(uni_lecs: i64, studied: i64) -> bool {
    uni_lecs > 0 && studied >= uni_lecs
}

/// Finished date after an update
///
/// Set to `today` on the update that crosses the threshold, kept while the
/// lecture stays finished, cleared as soon as it no longer is.
pub fn finished_date(
    uni_lecs: i64,
    studied: i64,
    previous: Option<NaiveDate>,
    today: NaiveDate,
) -> Option<NaiveDate> {
    if is_finished(uni_lecs, studied) {
        Some(previous.unwrap_or(today))
    } else {
        None
    }
}
