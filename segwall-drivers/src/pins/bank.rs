//! Pin bank
//!
//! Addresses a set of individual output pins by line number. Each line can
//! be active-low (driving the logical level inverted), for LEDs wired to
//! the supply rail or relay boards that switch on a low input.

use heapless::Vec;
use segwall_hal::{Level, OutputPin, PinDriver, PinId};

/// Maximum lines in one bank (the Raspberry Pi header exposes BCM 0-27)
pub const MAX_LINES: usize = 28;

/// Pin bank errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// No pin is attached for this line
    UnknownLine(PinId),
    /// Line was driven before being configured as an output
    NotConfigured(PinId),
    /// A pin is already attached for this line
    DuplicateLine(PinId),
    /// Bank holds [`MAX_LINES`] pins already
    BankFull,
}

struct Line<P> {
    id: PinId,
    pin: P,
    /// If true, logical HIGH = pin LOW
    inverted: bool,
    configured: bool,
    /// Current logical level
    level: Level,
}

impl<P: OutputPin> Line<P> {
    fn drive(&mut self, level: Level) {
        self.level = level;
        if self.inverted {
            self.pin.set_level(level.inverted());
        } else {
            self.pin.set_level(level);
        }
    }
}

/// A [`PinDriver`] over individually owned output pins
pub struct PinBank<P> {
    lines: Vec<Line<P>, MAX_LINES>,
}

impl<P> Default for PinBank<P> {
    fn default() -> Self {
        Self { lines: Vec::new() }
    }
}

impl<P: OutputPin> PinBank<P> {
    /// Create an empty bank
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a pin for `id`
    ///
    /// The pin is not driven until the line is configured.
    pub fn attach(&mut self, id: PinId, pin: P, inverted: bool) -> Result<(), PinError> {
        if self.lines.iter().any(|l| l.id == id) {
            return Err(PinError::DuplicateLine(id));
        }
        self.lines
            .push(Line {
                id,
                pin,
                inverted,
                configured: false,
                level: Level::Low,
            })
            .map_err(|_| PinError::BankFull)
    }

    /// Number of attached lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Attached line numbers in attach order
    pub fn ids(&self) -> impl Iterator<Item = PinId> + '_ {
        self.lines.iter().map(|l| l.id)
    }

    /// Logical level of a line
    pub fn level(&self, id: PinId) -> Option<Level> {
        self.lines.iter().find(|l| l.id == id).map(|l| l.level)
    }

    /// Check if a line is active-low
    pub fn is_inverted(&self, id: PinId) -> Option<bool> {
        self.lines.iter().find(|l| l.id == id).map(|l| l.inverted)
    }

    /// Borrow the pin attached for a line
    pub fn pin(&self, id: PinId) -> Option<&P> {
        self.lines.iter().find(|l| l.id == id).map(|l| &l.pin)
    }

    fn line_mut(&mut self, id: PinId) -> Result<&mut Line<P>, PinError> {
        self.lines
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(PinError::UnknownLine(id))
    }
}

impl<P: OutputPin> PinDriver for PinBank<P> {
    type Error = PinError;

    fn configure_output(&mut self, pin: PinId) -> Result<(), PinError> {
        let line = self.line_mut(pin)?;
        line.configured = true;
        line.drive(Level::Low);
        Ok(())
    }

    fn set_level(&mut self, pin: PinId, level: Level) -> Result<(), PinError> {
        let line = self.line_mut(pin)?;
        if !line.configured {
            return Err(PinError::NotConfigured(pin));
        }
        line.drive(level);
        Ok(())
    }

    fn reset_all(&mut self) -> Result<(), PinError> {
        for line in self.lines.iter_mut() {
            line.drive(Level::Low);
            line.configured = false;
        }
        Ok(())
    }
}
