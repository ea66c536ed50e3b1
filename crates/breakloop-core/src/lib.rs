//! # Breakloop Core Library
//!
//! This library provides the core logic for Breakloop, a local-first tracker
//! for habits one is trying to break. Users catalog the habits (with the
//! replacement strategies they want to reach for instead), log each urge as
//! it happens, and review a day-grouped timeline of how urges were resolved.
//! All operations are available through a standalone CLI binary; any GUI
//! shell is a thin layer over this same library.
//!
//! ## Architecture
//!
//! - **Entities**: [`Habit`] and [`Urge`] enforce their validation rules at
//!   construction and on every mutation, so a live entity is always valid
//! - **Timeline**: pure day-bucketing of urges for display, newest day first
//! - **Storage**: SQLite-based entity storage and TOML-based configuration
//! - **Events**: synchronous change notifications for view refresh
//!
//! ## Key Components
//!
//! - [`Habit`]: a behavior to break, with its replacement strategies
//! - [`Urge`]: one logged occurrence of wanting to act on a habit
//! - [`group_by_day`]: the timeline grouping function
//! - [`Database`]: habit and urge persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod habit;
pub mod storage;
pub mod timeline;
pub mod urge;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::{Event, EventBus};
pub use habit::Habit;
pub use storage::{Config, Database};
pub use timeline::{day_label, group_by_day, group_by_day_now, DayGroup};
pub use urge::{Resolution, Urge};
