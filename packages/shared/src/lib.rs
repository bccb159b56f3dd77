//! Shared utilities for Sketchroom binaries.

pub mod logger;
pub mod time;
