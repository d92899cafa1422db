//! Bit registers
//!
//! A register keeps three views of one binary value in step:
//!
//! ```text
//!   touch ──► marker bits ──┬──► output lines (HIGH/LOW)
//!                           ├──► marker blocks (on/off style)
//!                           └──► wall glyph (decode(value))
//! ```
//!
//! Outside an update the views always agree. When a collaborator fails in
//! the middle of an update the register is flagged out of sync and
//! [`Register::resync`] re-applies every view from the committed bits.

pub mod marker;

use heapless::{String, Vec};

use crate::config::{MarkerStyle, RegisterConfig, MAX_BITS, MAX_NAME_LEN};
use crate::coord::Coord;
use crate::digit::Digit;
use crate::traits::{Level, PinDriver, PinId, World};
use crate::wall::{Wall, WallError};

pub use marker::BitMarker;

/// Errors that can occur when building or addressing a register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterError {
    /// No markers configured
    NoMarkers,
    /// Two markers share a coordinate
    DuplicateMarker(Coord),
    /// Two markers share an output line
    DuplicateLine(PinId),
    /// A wall cannot show the register's maximum value
    ValueExceedsDigit { bits: u8 },
    /// Bit index past the last marker
    InvalidBitIndex(usize),
    /// Marker style would replace the marker block with air
    HiddenMarker,
    /// Wall placement is invalid
    Wall(WallError),
}

impl From<WallError> for RegisterError {
    fn from(e: WallError) -> Self {
        RegisterError::Wall(e)
    }
}

/// Failure of a collaborator during an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UpdateError<W, P> {
    /// World call failed
    World(W),
    /// Pin driver call failed
    Pin(P),
}

/// Result of a touch that hit a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Toggle {
    /// Bit that was toggled
    pub bit: usize,
    /// New state of the bit
    pub on: bool,
    /// Register value after the toggle
    pub value: u8,
}

type UpdateResult<W, P> =
    Result<(), UpdateError<<W as World>::Error, <P as PinDriver>::Error>>;

/// A fixed-width binary value shown by markers, lines and an optional wall
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Register {
    name: String<MAX_NAME_LEN>,
    markers: Vec<BitMarker, MAX_BITS>,
    style: MarkerStyle,
    wall: Option<Wall>,
    in_sync: bool,
}

impl Register {
    /// Build a register with every bit off
    pub fn new(config: &RegisterConfig) -> Result<Self, RegisterError> {
        if config.markers.is_empty() {
            return Err(RegisterError::NoMarkers);
        }

        let mut markers: Vec<BitMarker, MAX_BITS> = Vec::new();
        for m in config.markers.iter() {
            if markers.iter().any(|o| o.pos == m.pos) {
                return Err(RegisterError::DuplicateMarker(m.pos));
            }
            if markers.iter().any(|o| o.line == m.line) {
                return Err(RegisterError::DuplicateLine(m.line));
            }
            // Capacity matches the config's
            let _ = markers.push(BitMarker::new(m.pos, m.line));
        }

        let style = config.resolved_style();
        if style.hides_marker() {
            return Err(RegisterError::HiddenMarker);
        }

        let wall = match &config.wall {
            Some(wall) => {
                let bits = markers.len() as u8;
                if (1u16 << bits) - 1 > Digit::MAX as u16 {
                    return Err(RegisterError::ValueExceedsDigit { bits });
                }
                Some(Wall::new(wall)?)
            }
            None => None,
        };

        Ok(Self {
            name: config.name.clone(),
            markers,
            style,
            wall,
            in_sync: true,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn markers(&self) -> &[BitMarker] {
        &self.markers
    }

    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    pub fn wall(&self) -> Option<&Wall> {
        self.wall.as_ref()
    }

    /// Number of bits
    pub fn width(&self) -> usize {
        self.markers.len()
    }

    /// Check if every view matches the committed bits
    pub fn is_in_sync(&self) -> bool {
        self.in_sync
    }

    /// Current value, bit 0 least significant
    pub fn value(&self) -> u8 {
        marker::weigh(&self.markers)
    }

    /// State of one bit
    pub fn bit(&self, index: usize) -> Option<bool> {
        self.markers.get(index).map(|m| m.on)
    }

    /// Index of the marker at exactly `pos`
    pub fn marker_at(&self, pos: Coord) -> Option<usize> {
        self.markers.iter().position(|m| m.pos == pos)
    }

    /// Flip one bit without rendering, returning its new state
    ///
    /// The register is left out of sync until the next [`Register::resync`].
    pub fn toggle_bit(&mut self, index: usize) -> Result<bool, RegisterError> {
        let on = self
            .markers
            .get_mut(index)
            .map(BitMarker::flip)
            .ok_or(RegisterError::InvalidBitIndex(index))?;
        self.in_sync = false;
        Ok(on)
    }

    /// Drive every line and render every marker from its bit
    pub fn recompute<W: World, P: PinDriver>(
        &self,
        world: &mut W,
        pins: &mut P,
    ) -> UpdateResult<W, P> {
        for m in self.markers.iter() {
            pins.set_level(m.line, m.level()).map_err(UpdateError::Pin)?;
            world
                .set_block(self.style.cell(m.pos), self.style.block(m.on))
                .map_err(UpdateError::World)?;
        }
        Ok(())
    }

    /// Toggle the marker at `pos`, if any, and bring every view along
    ///
    /// Touches that miss every marker return `Ok(None)` and change nothing.
    /// If the old glyph cannot be erased the bit is left alone; any later
    /// failure leaves the bit toggled and the register out of sync.
    pub fn apply_touch<W: World, P: PinDriver>(
        &mut self,
        pos: Coord,
        world: &mut W,
        pins: &mut P,
    ) -> Result<Option<Toggle>, UpdateError<W::Error, P::Error>> {
        let Some(bit) = self.marker_at(pos) else {
            return Ok(None);
        };

        if let Some(wall) = &self.wall {
            if let Err(e) = wall.erase(world) {
                self.in_sync = false;
                return Err(UpdateError::World(e));
            }
        }

        let on = self.markers[bit].flip();
        let value = self.value();
        if let Err(e) = self.render(world, pins) {
            self.in_sync = false;
            return Err(e);
        }

        Ok(Some(Toggle { bit, on, value }))
    }

    /// Configure lines, clear every bit and draw the wall showing 0
    pub fn init<W: World, P: PinDriver>(
        &mut self,
        world: &mut W,
        pins: &mut P,
    ) -> UpdateResult<W, P> {
        for m in self.markers.iter_mut() {
            m.on = false;
        }
        self.in_sync = false;

        for m in self.markers.iter() {
            pins.configure_output(m.line).map_err(UpdateError::Pin)?;
        }
        self.recompute(world, pins)?;
        if let Some(wall) = &mut self.wall {
            wall.reset(world).map_err(UpdateError::World)?;
        }

        self.in_sync = true;
        Ok(())
    }

    /// Re-apply lines, markers and glyph from the committed bits
    pub fn resync<W: World, P: PinDriver>(
        &mut self,
        world: &mut W,
        pins: &mut P,
    ) -> UpdateResult<W, P> {
        self.recompute(world, pins)?;
        let digit = self.digit();
        if let Some(wall) = &mut self.wall {
            wall.restore(world, digit).map_err(UpdateError::World)?;
        }
        self.in_sync = true;
        Ok(())
    }

    /// Drive every line low
    ///
    /// Keeps going past failures and reports the first one.
    pub fn shutdown<P: PinDriver>(&mut self, pins: &mut P) -> Result<(), P::Error> {
        let mut result = Ok(());
        for m in self.markers.iter() {
            if let Err(e) = pins.set_level(m.line, Level::Low) {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    /// Glyph for the current value
    fn digit(&self) -> Digit {
        // Walls are only attached to registers whose value fits a digit
        Digit::new(self.value()).unwrap_or_default()
    }

    fn render<W: World, P: PinDriver>(
        &mut self,
        world: &mut W,
        pins: &mut P,
    ) -> UpdateResult<W, P> {
        self.recompute(world, pins)?;
        let digit = self.digit();
        if let Some(wall) = &mut self.wall {
            wall.light(world, digit).map_err(UpdateError::World)?;
        }
        Ok(())
    }
}
