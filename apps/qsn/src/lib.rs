//! # QSN Library
//!
//! This library exposes the QSN app modules for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod api;
pub mod cli;
pub mod config;
pub mod ticker;

// Re-export qsn_core for convenience
pub use qsn_core;
