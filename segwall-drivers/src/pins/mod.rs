//! Output line drivers

pub mod bank;
pub mod embedded;

pub use bank::{PinBank, PinError, MAX_LINES};
pub use embedded::EmbeddedHalPin;
