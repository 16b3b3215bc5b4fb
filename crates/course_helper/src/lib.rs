//! Course catalog search API and weekly timetable engine.
//!
//! - [`catalog`]: course records, the paginated query contract, an HTTP client and
//!   a debounced search driver.
//! - [`db`]: the SQLite-backed catalog store.
//! - [`schedule`]: conflict detection, selection, totals and grid layout.
//! - [`i18n`]: the zh/en string table.
//! - [`server`]: the `axum` router.

pub mod catalog;
pub mod config;
pub mod db;
pub mod i18n;
pub mod schedule;
pub mod server;
pub mod types;
