//! timetrack - personal time tracking from the command line
//!
//! This crate records work sessions against a fixed set of categories,
//! supports pausing and resuming the active timer, and summarizes tracked
//! time per day or ISO week. Data is kept in JSON files under
//! `~/.timetrack/`.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod output;
pub mod storage;
pub mod tracking;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::TimetrackError;
pub use tracking::{Session, SessionStore};
