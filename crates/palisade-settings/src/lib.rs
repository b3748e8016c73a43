//! # Palisade Settings
//!
//! User-settings coordinator for the Palisade runtime.
//!
//! UI code queues individual preference changes into a staging record; an
//! explicit apply step commits them to the live display/audio drivers and to
//! durable slot storage. This crate provides:
//! - Settings data model (persisted record + optional-valued staging record)
//! - Driver traits for the display and audio seams, with headless doubles
//! - The coordinator with queue/apply/revert/reset operations and queries
//! - Settings notifications broadcast through an event bus

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod audio;
pub mod coordinator;
pub mod data;
pub mod display;
pub mod events;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::audio::*;
    pub use crate::coordinator::*;
    pub use crate::data::*;
    pub use crate::display::*;
    pub use crate::events::*;
}

pub use prelude::*;
