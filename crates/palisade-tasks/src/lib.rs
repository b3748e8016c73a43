//! # Palisade Tasks
//!
//! Linear task and objective tracking.
//!
//! A task is an ordered list of objectives; at most one task is active at a
//! time and a single cursor walks its objectives front to back. Gameplay code
//! reports kills, pickups, and arrivals; the coordinator counts them against
//! the current objective, advances when it completes, and persists progress
//! after every change so a restart resumes mid-task.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coordinator;
pub mod data;
pub mod events;
pub mod registry;
pub mod save;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coordinator::*;
    pub use crate::data::*;
    pub use crate::events::*;
    pub use crate::registry::*;
    pub use crate::save::*;
}

pub use prelude::*;
