//! Weekly grid layout.
//!
//! A course meeting over several consecutive periods is drawn once, at the first
//! period of the run, spanning the whole run.

use crate::catalog::{Course, Day, Period};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunInfo {
    pub is_start: bool,
    pub consecutive_count: usize,
}

/// Describes the run containing `slot` for `course` on `day`.
///
/// Consecutiveness is by position in `ordered_slots`. If the course doesn't meet
/// at `slot`, or `slot` isn't in `ordered_slots`, the result is an empty non-start run.
pub fn consecutive_run(course: &Course, day: Day, slot: Period, ordered_slots: &[Period]) -> RunInfo {
    let meets = course.time.slots(day);
    let position = match ordered_slots.iter().position(|&p| p == slot) {
        Some(pos) if meets.contains(&slot) => pos,
        _ => {
            return RunInfo {
                is_start: false,
                consecutive_count: 0,
            }
        }
    };

    let is_start = position == 0 || !meets.contains(&ordered_slots[position - 1]);
    let consecutive_count = ordered_slots[position..]
        .iter()
        .take_while(|p| meets.contains(p))
        .count();

    RunInfo {
        is_start,
        consecutive_count,
    }
}

/// One drawn meeting block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridBlock {
    pub course_id: String,
    pub day: Day,
    pub start: Period,
    pub span: usize,
}

/// Blocks for `days` over `ordered_slots`, in selection order, then day, then period.
pub fn layout_blocks(selection: &[Course], days: &[Day], ordered_slots: &[Period]) -> Vec<GridBlock> {
    let mut blocks = Vec::new();

    for course in selection {
        for &day in days {
            for &slot in ordered_slots {
                let run = consecutive_run(course, day, slot, ordered_slots);
                if run.is_start {
                    blocks.push(GridBlock {
                        course_id: course.id.clone(),
                        day,
                        start: slot,
                        span: run.consecutive_count,
                    });
                }
            }
        }
    }

    blocks
}

/// Blocks for the rendered week (`mon`–`fri`, every period).
pub fn layout_week(selection: &[Course]) -> Vec<GridBlock> {
    layout_blocks(selection, &Day::WEEKDAYS, &Period::ALL)
}
