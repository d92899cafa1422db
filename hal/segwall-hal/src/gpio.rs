//! GPIO output abstractions
//!
//! Two levels of abstraction are provided: [`OutputPin`] for one physical
//! line, and [`PinDriver`] for a bank of lines addressed by identifier.

/// Output line identifier
///
/// The numbering scheme belongs to the driver (BCM numbers for the
/// Raspberry Pi backend).
pub type PinId = u8;

/// Logic level of an output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0
    #[default]
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// Level representing a boolean state (`true` = high)
    pub const fn from_bool(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }

    /// Check if this is the high level
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    /// The opposite level
    pub const fn inverted(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        Level::from_bool(high)
    }
}

/// Digital output pin
///
/// Implementations handle the actual hardware access for one line.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific level
    fn set_level(&mut self, level: Level) {
        match level {
            Level::High => self.set_high(),
            Level::Low => self.set_low(),
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Bank of output lines
///
/// This is the pin-driver collaborator consumed by the synchronization core.
/// Every call is synchronous; errors are reported through `Self::Error`.
pub trait PinDriver {
    /// Error type for driver operations
    type Error;

    /// Configure a line as an output
    fn configure_output(&mut self, pin: PinId) -> Result<(), Self::Error>;

    /// Drive a configured line to `level`
    fn set_level(&mut self, pin: PinId, level: Level) -> Result<(), Self::Error>;

    /// Return every line to a known-safe state
    ///
    /// Called once on shutdown, after all owned lines were driven low.
    fn reset_all(&mut self) -> Result<(), Self::Error>;
}
