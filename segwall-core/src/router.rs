//! Touch event routing
//!
//! The router owns every register and maps touched coordinates to the
//! marker they hit. Marker coordinates and output lines are unique across
//! all registers, so a touch toggles at most one bit.

use heapless::Vec;

use crate::config::{RegisterConfig, MAX_REGISTERS};
use crate::coord::Coord;
use crate::register::{Register, RegisterError, Toggle, UpdateError};
use crate::traits::{PinDriver, PinId, TouchEvent, World, MAX_TOUCH_BATCH};

/// Errors that can occur when assembling a router
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RouterError {
    /// More than [`MAX_REGISTERS`] registers
    TooManyRegisters,
    /// Two registers have the same name
    DuplicateName,
    /// A marker coordinate belongs to another register
    OverlappingMarker(Coord),
    /// An output line belongs to another register
    SharedLine(PinId),
    /// A register config was rejected
    Register(RegisterError),
}

impl From<RegisterError> for RouterError {
    fn from(e: RegisterError) -> Self {
        RouterError::Register(e)
    }
}

/// Location of a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MarkerRef {
    /// Register index
    pub register: usize,
    /// Bit index within the register
    pub bit: usize,
}

/// A toggle and the register it happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dispatched {
    pub register: usize,
    pub toggle: Toggle,
}

/// Outcome of one poll
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollReport {
    /// Registers brought back in sync before polling
    pub resynced: usize,
    /// Touch events received
    pub touches: usize,
    /// Touches that hit a marker, in order
    pub toggled: Vec<Dispatched, MAX_TOUCH_BATCH>,
    /// Touches skipped because their register failed earlier in the batch
    pub dropped: usize,
}

/// A poll that hit a collaborator failure
///
/// `report` covers everything the poll got done before and after the
/// failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollError<W, P> {
    /// First failure in the poll
    pub error: UpdateError<W, P>,
    pub report: PollReport,
}

/// Routes touch events to registers
#[derive(Debug, Clone, Default)]
pub struct Router {
    registers: Vec<Register, MAX_REGISTERS>,
}

impl Router {
    /// Create an empty router
    pub fn new() -> Self {
        Self::default()
    }

    /// Build registers from configs and add them in order
    pub fn from_configs(configs: &[RegisterConfig]) -> Result<Self, RouterError> {
        let mut router = Self::new();
        for config in configs {
            router.add(Register::new(config)?)?;
        }
        Ok(router)
    }

    /// Add a register, returning its index
    pub fn add(&mut self, register: Register) -> Result<usize, RouterError> {
        for existing in self.registers.iter() {
            if existing.name() == register.name() {
                return Err(RouterError::DuplicateName);
            }
            for m in register.markers() {
                if existing.marker_at(m.pos).is_some() {
                    return Err(RouterError::OverlappingMarker(m.pos));
                }
                if existing.markers().iter().any(|o| o.line == m.line) {
                    return Err(RouterError::SharedLine(m.line));
                }
            }
        }

        let index = self.registers.len();
        self.registers
            .push(register)
            .map_err(|_| RouterError::TooManyRegisters)?;
        Ok(index)
    }

    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    pub fn register(&self, index: usize) -> Option<&Register> {
        self.registers.get(index)
    }

    pub fn register_by_name(&self, name: &str) -> Option<&Register> {
        self.registers.iter().find(|r| r.name() == name)
    }

    /// Find the marker at exactly `pos`
    pub fn route(&self, pos: Coord) -> Option<MarkerRef> {
        self.registers
            .iter()
            .enumerate()
            .find_map(|(register, r)| r.marker_at(pos).map(|bit| MarkerRef { register, bit }))
    }

    /// Initialize every register
    pub fn init<W: World, P: PinDriver>(
        &mut self,
        world: &mut W,
        pins: &mut P,
    ) -> Result<(), UpdateError<W::Error, P::Error>> {
        for register in self.registers.iter_mut() {
            register.init(world, pins)?;
        }
        Ok(())
    }

    /// Apply one touch to the register it hits
    pub fn dispatch<W: World, P: PinDriver>(
        &mut self,
        touch: &TouchEvent,
        world: &mut W,
        pins: &mut P,
    ) -> Result<Option<Dispatched>, UpdateError<W::Error, P::Error>> {
        let Some(target) = self.route(touch.pos) else {
            return Ok(None);
        };
        let register = &mut self.registers[target.register];
        let toggle = register.apply_touch(touch.pos, world, pins)?;
        Ok(toggle.map(|toggle| Dispatched {
            register: target.register,
            toggle,
        }))
    }

    /// Resync stale registers, then process one batch of touches in order
    ///
    /// A failed resync ends the poll before any touches are taken. Once a
    /// register fails mid-batch, later touches on it are dropped until the
    /// next poll resyncs it; touches on other registers still apply. The
    /// first failure is returned along with the report.
    pub fn poll<W: World, P: PinDriver>(
        &mut self,
        world: &mut W,
        pins: &mut P,
    ) -> Result<PollReport, PollError<W::Error, P::Error>> {
        let mut report = PollReport::default();

        for register in self.registers.iter_mut().filter(|r| !r.is_in_sync()) {
            if let Err(error) = register.resync(world, pins) {
                return Err(PollError { error, report });
            }
            report.resynced += 1;
        }

        let batch = match world.poll_touches() {
            Ok(batch) => batch,
            Err(e) => {
                return Err(PollError {
                    error: UpdateError::World(e),
                    report,
                })
            }
        };
        report.touches = batch.len();

        let mut first_error = None;
        for touch in batch.iter() {
            let stale = self
                .route(touch.pos)
                .is_some_and(|target| !self.registers[target.register].is_in_sync());
            if stale {
                report.dropped += 1;
                continue;
            }

            match self.dispatch(touch, world, pins) {
                Ok(Some(hit)) => {
                    // One toggle per touch at most, so the batch size bounds this
                    let _ = report.toggled.push(hit);
                }
                Ok(None) => {}
                Err(error) => {
                    first_error.get_or_insert(error);
                }
            }
        }

        match first_error {
            Some(error) => Err(PollError { error, report }),
            None => Ok(report),
        }
    }

    /// Check if any register needs a resync
    pub fn is_in_sync(&self) -> bool {
        self.registers.iter().all(Register::is_in_sync)
    }

    /// Drive every line low, then reset the driver
    pub fn shutdown<P: PinDriver>(&mut self, pins: &mut P) -> Result<(), P::Error> {
        let mut result = Ok(());
        for register in self.registers.iter_mut() {
            if let Err(e) = register.shutdown(pins) {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        pins.reset_all()?;
        result
    }
}
