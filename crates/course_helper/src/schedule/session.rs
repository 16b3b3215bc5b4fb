//! A student's course selection for one session.

use super::conflict::first_overlap;
use super::totals::{totals, Totals};
use crate::catalog::{BilingualName, Course, Day, Period};
use serde::Serialize;
use tracing::debug;

/// Enough of a course to name it in a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseLabel {
    pub id: String,
    pub code: String,
    pub name: BilingualName,
}

impl From<&Course> for CourseLabel {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.clone(),
            code: course.code.clone(),
            name: course.name.clone(),
        }
    }
}

/// Why an add was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Conflict {
    /// The course is already selected
    Duplicate { course: CourseLabel },
    /// The course meets at the same time as an already selected one
    TimeOverlap {
        course: CourseLabel,
        existing: CourseLabel,
        day: Day,
        period: Period,
    },
}

/// Conflicts from the most recent add/remove attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    conflicts: Vec<Conflict>,
}

impl ConflictReport {
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    fn clear(&mut self) {
        self.conflicts.clear();
    }

    fn push(&mut self, conflict: Conflict) {
        self.conflicts.push(conflict);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Rejected(Conflict),
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added)
    }
}

/// Selected courses in insertion order, plus the conflict report.
#[derive(Debug, Clone, Default)]
pub struct ScheduleSession {
    selected: Vec<Course>,
    report: ConflictReport,
}

impl ScheduleSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &[Course] {
        &self.selected
    }

    pub fn report(&self) -> &ConflictReport {
        &self.report
    }

    pub fn contains(&self, course_id: &str) -> bool {
        self.selected.iter().any(|c| c.id == course_id)
    }

    pub fn totals(&self) -> Totals {
        totals(&self.selected)
    }

    /// Adds a course unless it is already selected or overlaps a selected course.
    pub fn add(&mut self, course: Course) -> AddOutcome {
        self.report.clear();

        let conflict = if self.contains(&course.id) {
            Some(Conflict::Duplicate {
                course: CourseLabel::from(&course),
            })
        } else {
            self.selected.iter().find_map(|existing| {
                first_overlap(existing, &course).map(|(day, period)| Conflict::TimeOverlap {
                    course: CourseLabel::from(&course),
                    existing: CourseLabel::from(existing),
                    day,
                    period,
                })
            })
        };

        match conflict {
            Some(conflict) => {
                debug!(course_id = %course.id, conflict = ?conflict, "Rejected course");
                self.report.push(conflict.clone());
                AddOutcome::Rejected(conflict)
            }
            None => {
                debug!(course_id = %course.id, "Added course");
                self.selected.push(course);
                AddOutcome::Added
            }
        }
    }

    /// Removes a course by id. Returns whether one was removed.
    pub fn remove(&mut self, course_id: &str) -> bool {
        self.report.clear();
        let before = self.selected.len();
        self.selected.retain(|c| c.id != course_id);
        before != self.selected.len()
    }
}
