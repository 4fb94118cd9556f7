//! Shared library for the sweatlist song suggestion service
//!
//! Error taxonomy, configuration, period derivation, database schema and
//! seeding used by the HTTP service crate.

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};

/// Placeholder participant identity (no real authentication exists yet;
/// a future auth collaborator replaces these).
pub const PLACEHOLDER_PARTICIPANT_ID: &str = "user123";
/// Placeholder instructor identity associated with the demo class.
pub const PLACEHOLDER_INSTRUCTOR_ID: &str = "instructor456";
/// Placeholder class identity used by seeded suggestions.
pub const PLACEHOLDER_CLASS_ID: &str = "class789";
