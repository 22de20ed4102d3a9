//! Core types for the schedule tracker.
//!
//! This crate holds the calendar/event engine used by the `schedule` CLI:
//! - `store` and `tags` for the per-user event collection and tag vocabulary
//! - `grid` for the 42-cell month view
//! - `stats` for the dashboard aggregates
//! - `session` for wiring them together behind explicit commands

pub mod accounts;
pub mod change;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod grid;
pub mod identity;
pub mod session;
pub mod stats;
pub mod storage;
pub mod store;
pub mod tags;

pub use error::{ScheduleError, ScheduleResult};
pub use event::{ClockTime, Event, EventFields, ExportRow};
pub use identity::{IdentityProvider, UserId};
