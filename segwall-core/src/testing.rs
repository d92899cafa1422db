//! Fake collaborators for unit tests

use std::collections::{HashMap, HashSet, VecDeque};
use std::string::{String, ToString};
use std::vec::Vec;

use crate::block::BlockType;
use crate::coord::{Coord, Cuboid};
use crate::digit::Digit;
use crate::traits::{Level, PinDriver, PinId, TouchBatch, TouchEvent, World};
use crate::wall::Wall;

/// Error returned by [`FakeWorld`] once its call budget is spent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldDown;

/// In-memory world; unset cells read as air
#[derive(Debug, Clone, Default)]
pub struct FakeWorld {
    pub blocks: HashMap<Coord, BlockType>,
    pub pending: VecDeque<TouchBatch>,
    pub messages: Vec<String>,
    pub player: Option<Coord>,
    /// Successful block calls
    pub calls: usize,
    /// Block calls allowed before every further one fails
    budget: Option<usize>,
}

impl FakeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_at(&self, pos: Coord) -> BlockType {
        self.blocks.get(&pos).copied().unwrap_or(BlockType::AIR)
    }

    /// Queue one poll's worth of touches
    pub fn queue_touches(&mut self, positions: &[Coord]) {
        let mut batch = TouchBatch::new();
        for pos in positions {
            batch.push(TouchEvent::at(*pos)).unwrap();
        }
        self.pending.push_back(batch);
    }

    /// Let `calls` more block calls succeed, then fail
    pub fn fail_after(&mut self, calls: usize) {
        self.budget = Some(calls);
    }

    pub fn heal(&mut self) {
        self.budget = None;
    }

    fn spend(&mut self) -> Result<(), WorldDown> {
        match self.budget {
            Some(0) => return Err(WorldDown),
            Some(n) => self.budget = Some(n - 1),
            None => {}
        }
        self.calls += 1;
        Ok(())
    }
}

impl World for FakeWorld {
    type Error = WorldDown;

    fn set_block(&mut self, pos: Coord, block: BlockType) -> Result<(), WorldDown> {
        self.spend()?;
        self.blocks.insert(pos, block);
        Ok(())
    }

    fn set_blocks(&mut self, from: Coord, to: Coord, block: BlockType) -> Result<(), WorldDown> {
        self.spend()?;
        for pos in Cuboid::new(from, to).cells() {
            self.blocks.insert(pos, block);
        }
        Ok(())
    }

    fn poll_touches(&mut self) -> Result<TouchBatch, WorldDown> {
        Ok(self.pending.pop_front().unwrap_or_default())
    }

    fn set_player_position(&mut self, pos: Coord) -> Result<(), WorldDown> {
        self.player = Some(pos);
        Ok(())
    }

    fn post_message(&mut self, text: &str) -> Result<(), WorldDown> {
        self.messages.push(text.to_string());
        Ok(())
    }
}

/// Error returned by [`FakePins`] while failing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

/// In-memory pin bank; unset lines read low
#[derive(Debug, Clone, Default)]
pub struct FakePins {
    pub levels: HashMap<PinId, Level>,
    pub configured: HashSet<PinId>,
    pub resets: usize,
    pub failing: bool,
    /// Line whose level changes fail
    pub stuck: Option<PinId>,
}

impl FakePins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self, pin: PinId) -> Level {
        self.levels.get(&pin).copied().unwrap_or(Level::Low)
    }
}

impl PinDriver for FakePins {
    type Error = PinFault;

    fn configure_output(&mut self, pin: PinId) -> Result<(), PinFault> {
        if self.failing {
            return Err(PinFault);
        }
        self.configured.insert(pin);
        Ok(())
    }

    fn set_level(&mut self, pin: PinId, level: Level) -> Result<(), PinFault> {
        if self.failing || self.stuck == Some(pin) {
            return Err(PinFault);
        }
        self.levels.insert(pin, level);
        Ok(())
    }

    fn reset_all(&mut self) -> Result<(), PinFault> {
        if self.failing {
            return Err(PinFault);
        }
        self.resets += 1;
        self.levels.clear();
        self.configured.clear();
        Ok(())
    }
}

/// Check that `wall` shows exactly `digit` in `world`
///
/// Lit strokes must be lit in every cell. Unlit strokes must be background
/// wherever they do not share a cell with a lit stroke.
pub fn assert_glyph(world: &FakeWorld, wall: &Wall, digit: Digit) {
    let mask = digit.segments();
    let mut lit_cells = HashSet::new();
    for spec in wall.segments().iter() {
        if mask[spec.segment.index()] {
            for pos in spec.bounds().cells() {
                assert_eq!(
                    world.block_at(pos),
                    wall.lit(),
                    "segment {:?} of {} at {:?}",
                    spec.segment,
                    digit.value(),
                    pos
                );
                lit_cells.insert(pos);
            }
        }
    }
    for spec in wall.segments().iter() {
        if !mask[spec.segment.index()] {
            for pos in spec.bounds().cells().filter(|p| !lit_cells.contains(p)) {
                assert_eq!(
                    world.block_at(pos),
                    wall.background(),
                    "segment {:?} of {} at {:?}",
                    spec.segment,
                    digit.value(),
                    pos
                );
            }
        }
    }
}
