//! Board-agnostic core logic for the segment wall
//!
//! This crate contains all synchronization logic that does not depend on a
//! concrete world service or pin backend:
//!
//! - Block coordinates and block types
//! - Seven-segment digit decoding
//! - Segment geometry generation (fixed and proportional layouts)
//! - Wall rendering
//! - Bit registers that keep markers, output lines and the glyph in step
//! - Touch event routing
//! - Collaborator traits and configuration types

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod block;
pub mod config;
pub mod coord;
pub mod digit;
pub mod geometry;
pub mod register;
pub mod router;
pub mod traits;
pub mod wall;

#[cfg(test)]
pub(crate) mod testing;

pub use block::BlockType;
pub use config::{MarkerConfig, MarkerStyle, RegisterConfig, WallConfig};
pub use coord::{Coord, Cuboid};
pub use digit::{decode, Digit, DigitError, Segment};
pub use geometry::{Layout, SegmentSpec, WallGeometry};
pub use register::{BitMarker, Register, RegisterError, Toggle, UpdateError};
pub use router::{Dispatched, MarkerRef, PollError, PollReport, Router, RouterError};
pub use traits::{Level, PinDriver, PinId, TouchBatch, TouchEvent, World};
pub use wall::{RenderError, Wall, WallError};
