//! # Adventure Core
//!
//! Common types and schema handling for the Arduino Adventure progress
//! tracker.
//!
//! This crate provides the foundational pieces used by the persistence and
//! rules layers:
//! - The `PlayerProgress` aggregate and its nested sections
//! - Typed defaults for every field of the record
//! - Field-by-field reconciliation of loaded data against the defaults
//! - Idempotent validation (clamping and deduplication)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod player;
pub mod schema;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::player::*;
    pub use crate::schema::*;
}

pub use prelude::*;
