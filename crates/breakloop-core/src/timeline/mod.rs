//! Urge timeline views.
//!
//! This module buckets logged urges by calendar day for display, newest
//! day first, with "Today"/"Yesterday" headings for the most recent days.

mod group;

pub use group::{day_label, group_by_day, group_by_day_now, DayGroup};
