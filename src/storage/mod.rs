//! Storage layer for timetrack.
//!
//! This module provides JSON file persistence for:
//! - The session log (`sessions.json`)
//! - Category configuration (`categories.json`)
//!
//! plus the advisory lock that serializes concurrent invocations.

mod json_file;
mod lock;

pub use json_file::{read_json, write_json_atomic};
pub use lock::DataLock;
