//! segwall Hardware Abstraction Layer
//!
//! This crate defines the output-line traits shared by the synchronization
//! core and the concrete pin backends. The same core logic drives a
//! Raspberry Pi header, an `embedded-hal` pin set, or an in-memory fake.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  segwall-core (registers, router)       │
//! └─────────────────────────────────────────┘
//!                     │  PinDriver
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  segwall-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │  OutputPin
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ segwall-      │       │ segwall-host  │
//! │ drivers       │       │ (rppal, dry)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - a single digital output line
//! - [`gpio::PinDriver`] - a bank of output lines addressed by [`gpio::PinId`]

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;

pub use gpio::{Level, OutputPin, PinDriver, PinId};
