//! # Palisade Common
//!
//! Shared types and services for the Palisade plugins.
//!
//! This crate provides the foundations both feature plugins build on:
//! - ID types (`TaskId`, `ItemId`, `EntityId`)
//! - Slot-based save storage with a versioned wire format
//! - A bounded event bus for in-process notifications

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod events;
pub mod ids;
pub mod slot;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::events::*;
    pub use crate::ids::*;
    pub use crate::slot::*;
}

pub use prelude::*;
