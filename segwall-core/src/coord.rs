//! Block coordinates
//!
//! All positions are integer block coordinates in the world's space.
//! `y` is the vertical axis.

use core::ops::Add;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A block coordinate
///
/// Deserializes from either `{ x, y, z }` or `[x, y, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coord {
    /// The world origin
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    /// Create a new coordinate
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// This coordinate moved by `(dx, dy, dz)`
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        self.offset(rhs.x, rhs.y, rhs.z)
    }
}

impl From<(i32, i32, i32)> for Coord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

/// Axis-aligned box between two inclusive corners
///
/// Invariant: `start <= end` on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cuboid {
    start: Coord,
    end: Coord,
}

impl Cuboid {
    /// Create a box spanning two corners, given in any order
    pub fn new(a: Coord, b: Coord) -> Self {
        Self {
            start: Coord::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            end: Coord::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// A box holding a single cell
    pub const fn cell(pos: Coord) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Corner with the smallest coordinates
    pub const fn start(&self) -> Coord {
        self.start
    }

    /// Corner with the largest coordinates
    pub const fn end(&self) -> Coord {
        self.end
    }

    /// Check if the box is a single cell
    pub fn is_cell(&self) -> bool {
        self.start == self.end
    }

    /// Check if `pos` lies inside the box
    pub fn contains(&self, pos: Coord) -> bool {
        (self.start.x..=self.end.x).contains(&pos.x)
            && (self.start.y..=self.end.y).contains(&pos.y)
            && (self.start.z..=self.end.z).contains(&pos.z)
    }

    /// Check if `other` lies entirely inside this box
    pub fn encloses(&self, other: &Cuboid) -> bool {
        self.contains(other.start) && self.contains(other.end)
    }

    /// Number of cells in the box
    pub fn volume(&self) -> u64 {
        let dx = (self.end.x - self.start.x) as u64 + 1;
        let dy = (self.end.y - self.start.y) as u64 + 1;
        let dz = (self.end.z - self.start.z) as u64 + 1;
        dx * dy * dz
    }

    /// Clamp a coordinate into the box
    pub fn clamp(&self, pos: Coord) -> Coord {
        Coord::new(
            pos.x.clamp(self.start.x, self.end.x),
            pos.y.clamp(self.start.y, self.end.y),
            pos.z.clamp(self.start.z, self.end.z),
        )
    }

    /// Iterate every cell, x fastest
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (self.start.z..=self.end.z).flat_map(move |z| {
            (self.start.y..=self.end.y)
                .flat_map(move |y| (self.start.x..=self.end.x).map(move |x| Coord::new(x, y, z)))
        })
    }
}
