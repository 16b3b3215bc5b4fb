/// Time-slot overlap between two courses
use crate::catalog::{Course, Day, Period};

/// Returns the first `(day, period)` both courses meet at, scanning days in week order.
///
/// Periods are compared by label equality only.
pub fn first_overlap(a: &Course, b: &Course) -> Option<(Day, Period)> {
    Day::ALL.into_iter().find_map(|day| {
        let other = b.time.slots(day);
        a.time
            .slots(day)
            .iter()
            .find(|p| other.contains(p))
            .map(|&p| (day, p))
    })
}

/// True iff the two courses share at least one (day, period) pair.
pub fn time_conflict(a: &Course, b: &Course) -> bool {
    first_overlap(a, b).is_some()
}
