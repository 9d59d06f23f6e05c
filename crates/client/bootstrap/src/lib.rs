//! Shared bootstrap utilities for client front-ends.
//!
//! Provides configuration loading and battle session assembly that can be
//! reused by CLI, UI, or other front-end crates.
pub mod builder;
pub mod config;

pub use builder::{SessionBuilder, SessionSetup};
pub use config::ClientConfig;
