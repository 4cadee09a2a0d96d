//! Payroll engine for time-clock report exports.
//!
//! This crate reads clock-in/clock-out punches out of spreadsheet report
//! tables, splits them into calendar days with a Saturday premium window,
//! applies daily overtime tiers, and prices the result per employee and
//! month. A [`session::Session`] holds one payroll run and round-trips
//! through versioned JSON snapshots.
//!
//! # Example
//!
//! ```
//! use payroll_engine::config::PayrollPolicy;
//! use payroll_engine::extraction::{extract, ExtractionStrategy};
//! use payroll_engine::models::table_from_text;
//!
//! let policy = PayrollPolicy::default();
//! let table = table_from_text(&[
//!     &["Report of work hours for Dana between 1/1/2024 and 31/1/2024"],
//!     &["Time in", "Time out"],
//!     &["07/01/2024 08:00", "07/01/2024 18:30"],
//! ]);
//!
//! let punches = extract(&table, &policy.labels, ExtractionStrategy::Primary).unwrap();
//! assert_eq!(punches.len(), 1);
//! assert_eq!(punches[0].employee.as_str(), "Dana");
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod extraction;
pub mod models;
pub mod session;
