//! Collaborator traits
//!
//! These traits define the interface between the synchronization logic and
//! the services it drives. Output lines use [`segwall_hal::PinDriver`].

pub mod world;

pub use segwall_hal::{Level, PinDriver, PinId};
pub use world::{TouchBatch, TouchEvent, World, MAX_TOUCH_BATCH};
