//! Core library surface for the Student Management System TUI.
//!
//! The binary only wires these pieces together, so integration tests and
//! other tooling can drive the same persistence layer directly.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod ui;

pub use config::AppConfig;

/// Persistence entry points used at startup.
pub use db::{ensure_schema, fetch_students, open_database};

pub use models::{NewStudent, Student, ValidationError};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
