//! Core domain logic for the trs time recorder.
//!
//! This crate contains the fundamental types and logic for:
//! - Time entries: open and closed intervals of worked time
//! - The entry state machine: at most one open entry at a time
//! - Daily aggregation: local day boundaries and summed durations

pub mod day;
mod entry;
mod state;

pub use day::{day_bounds, format_duration, sum_duration, today_bounds};
pub use entry::{EntryId, TimeEntry};
pub use state::{EntryState, Transition, TransitionError};
