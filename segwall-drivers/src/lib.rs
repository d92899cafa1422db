//! Output line driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in segwall-hal:
//!
//! - Pin banks that address individual output pins by line number
//! - Adapters from `embedded-hal` 1.0 output pins

#![no_std]
#![deny(unsafe_code)]

pub mod pins;

pub use pins::{EmbeddedHalPin, PinBank, PinError, MAX_LINES};
