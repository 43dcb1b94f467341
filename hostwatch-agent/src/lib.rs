//! Hostwatch agent library.
//!
//! This library exposes internal modules for integration testing.
//! In production, `hostwatch-agent` is used as a binary (main.rs).

pub mod actions;
pub mod cli;
pub mod logging;
pub mod scheduler;
