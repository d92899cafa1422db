//! Wall renderer
//!
//! A wall is a slab of background blocks with a seven-segment glyph drawn
//! into it. Segment boxes are computed once at construction; rendering only
//! ever sets blocks, so drawing the same state twice is a no-op.

use crate::block::BlockType;
use crate::config::WallConfig;
use crate::coord::Cuboid;
use crate::digit::{Digit, DigitError};
use crate::geometry::{GeometryError, Layout, SegmentSet, WallGeometry};
use crate::traits::World;

/// Errors that can occur when building a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WallError {
    /// Placement is invalid
    Geometry(GeometryError),
}

impl From<GeometryError> for WallError {
    fn from(e: GeometryError) -> Self {
        WallError::Geometry(e)
    }
}

/// Errors that can occur while rendering a digit given as a raw value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError<E> {
    /// Value is not a decimal digit; nothing was rendered
    Digit(DigitError),
    /// World call failed
    World(E),
}

/// A seven-segment display built from blocks
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Wall {
    geometry: WallGeometry,
    layout: Layout,
    background: BlockType,
    lit: BlockType,
    segments: SegmentSet,
    digit: Digit,
}

impl Wall {
    /// Build a wall showing 0
    ///
    /// Nothing is rendered until [`Wall::draw`] is called.
    pub fn new(config: &WallConfig) -> Result<Self, WallError> {
        let geometry = WallGeometry::new(
            config.origin,
            config.width,
            config.height,
            config.thickness,
        )?;
        Ok(Self {
            geometry,
            layout: config.layout,
            background: config.background,
            lit: config.lit,
            segments: config.layout.segments(&geometry),
            digit: Digit::ZERO,
        })
    }

    pub fn geometry(&self) -> &WallGeometry {
        &self.geometry
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn background(&self) -> BlockType {
        self.background
    }

    pub fn lit(&self) -> BlockType {
        self.lit
    }

    pub fn segments(&self) -> &SegmentSet {
        &self.segments
    }

    /// Digit currently shown
    pub fn digit(&self) -> Digit {
        self.digit
    }

    /// Volume occupied by the wall
    pub fn bounds(&self) -> Cuboid {
        self.geometry.bounds()
    }

    /// Fill the wall with background, then light the current digit
    pub fn draw<W: World>(&self, world: &mut W) -> Result<(), W::Error> {
        world.fill(self.bounds(), self.background)?;
        self.paint(world, self.digit, true)
    }

    /// Show 0 on a freshly filled wall
    pub fn reset<W: World>(&mut self, world: &mut W) -> Result<(), W::Error> {
        self.digit = Digit::ZERO;
        self.draw(world)
    }

    /// Render the segments of `value` lit or as background
    ///
    /// Only segments that are part of `value` are touched. Does not change
    /// the stored digit.
    pub fn set_digit<W: World>(
        &self,
        world: &mut W,
        value: u8,
        illuminated: bool,
    ) -> Result<(), RenderError<W::Error>> {
        let digit = Digit::new(value).map_err(RenderError::Digit)?;
        self.paint(world, digit, illuminated)
            .map_err(RenderError::World)
    }

    /// Return the segments of the current digit to background
    pub fn erase<W: World>(&self, world: &mut W) -> Result<(), W::Error> {
        self.paint(world, self.digit, false)
    }

    /// Store `digit` and light its segments
    ///
    /// Segments of the previous digit are left as they are; call
    /// [`Wall::erase`] first.
    pub fn light<W: World>(&mut self, world: &mut W, digit: Digit) -> Result<(), W::Error> {
        self.digit = digit;
        self.paint(world, digit, true)
    }

    /// Replace the shown digit
    pub fn show<W: World>(
        &mut self,
        world: &mut W,
        value: u8,
    ) -> Result<(), RenderError<W::Error>> {
        let digit = Digit::new(value).map_err(RenderError::Digit)?;
        self.erase(world).map_err(RenderError::World)?;
        self.light(world, digit).map_err(RenderError::World)
    }

    /// Set every segment to lit or background from the current digit
    ///
    /// Restores the glyph whatever state a failed update left it in.
    pub fn repaint<W: World>(&self, world: &mut W) -> Result<(), W::Error> {
        // Unlit strokes first: fixed-layout strokes share corner cells
        self.paint_where(world, self.digit, false, self.background)?;
        self.paint_where(world, self.digit, true, self.lit)
    }

    /// Show `digit` whatever the wall currently holds
    pub fn restore<W: World>(&mut self, world: &mut W, digit: Digit) -> Result<(), W::Error> {
        self.digit = digit;
        self.repaint(world)
    }

    fn paint<W: World>(
        &self,
        world: &mut W,
        digit: Digit,
        illuminated: bool,
    ) -> Result<(), W::Error> {
        let block = if illuminated { self.lit } else { self.background };
        self.paint_where(world, digit, true, block)
    }

    /// Fill every segment whose lit state in `digit` equals `lit`
    fn paint_where<W: World>(
        &self,
        world: &mut W,
        digit: Digit,
        lit: bool,
        block: BlockType,
    ) -> Result<(), W::Error> {
        let mask = digit.segments();
        for spec in self.segments.iter() {
            if mask[spec.segment.index()] == lit {
                world.fill(spec.bounds(), block)?;
            }
        }
        Ok(())
    }
}
