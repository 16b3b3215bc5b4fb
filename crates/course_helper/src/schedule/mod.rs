//! In-memory schedule engine: conflicts, selection, totals, and grid layout.
//!
//! Everything here is synchronous and owned by a single session.

mod conflict;
mod layout;
mod session;
mod totals;

pub use conflict::{first_overlap, time_conflict};
pub use layout::{consecutive_run, layout_blocks, layout_week, GridBlock, RunInfo};
pub use session::{AddOutcome, Conflict, ConflictReport, CourseLabel, ScheduleSession};
pub use totals::{totals, Totals};
