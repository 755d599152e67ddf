//! Configuration management for timetrack.
//!
//! This module handles locating data files and loading settings from `~/.timetrack/`.

mod paths;
mod settings;

pub use paths::{Paths, HOME_ENV};
pub use settings::{ColorSetting, Config, GeneralConfig, ReportConfig};
