//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load the payroll policy (overtime
//! tiers, the Saturday premium window) and the report vocabulary used by
//! punch extraction from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/standard").unwrap();
//! println!("Premium window starts at {}", config.policy().sabbath.window_start);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ClockPolicy, ExtractionLabels, OvertimePolicy, PayrollPolicy, PolicyFile, SabbathPolicy, SerialRange,
};
