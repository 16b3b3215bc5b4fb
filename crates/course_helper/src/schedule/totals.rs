/// Credit and hour totals for a selection
use crate::catalog::Course;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub total_credits: f64,
    pub total_hours: u32,
}

pub fn totals(selection: &[Course]) -> Totals {
    selection.iter().fold(Totals::default(), |acc, c| Totals {
        total_credits: acc.total_credits + c.credit,
        total_hours: acc.total_hours.saturating_add(c.hours),
    })
}
