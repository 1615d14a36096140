//! Utility modules for common functionality
//!
//! This module provides logging and progress reporting used by the CLI.

pub mod logger;
pub(crate) mod progress;
