//! # Guardian Library
//!
//! This library exposes the Guardian CLI commands for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod cli;

// Re-export guardian_core for convenience
pub use guardian_core;
