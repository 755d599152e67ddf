//! Core utilities for timetrack.
//!
//! This module provides date/time helpers shared by the store, the report
//! aggregator, and the command layer.

mod datetime;

pub use datetime::{
    add_days, backdate, iso_week_start, local_to_utc, parse_date, parse_local_datetime, parse_time,
    today_local, week_start,
};
