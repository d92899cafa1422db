//! Configuration types
//!
//! Board-agnostic descriptions of walls and registers. The host binary
//! fills these from its TOML file.

pub mod types;

pub use types::*;
