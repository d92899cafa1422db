//! Seven-segment digit decoding
//!
//! Segment naming follows the usual convention:
//!
//! ```text
//!    aaa
//!   f   b
//!   f   b
//!    ggg
//!   e   c
//!   e   c
//!    ddd
//! ```

/// Number of segments in a glyph
pub const SEGMENT_COUNT: usize = 7;

/// On/off state of each segment, indexed by [`Segment::index`]
pub type SegmentMask = [bool; SEGMENT_COUNT];

/// Errors that can occur when decoding a digit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DigitError {
    /// Value is not a decimal digit (0-9)
    OutOfRange(u8),
}

/// One stroke of a seven-segment glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Segment {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Segment {
    /// All segments in index order
    pub const ALL: [Segment; SEGMENT_COUNT] = [
        Segment::A,
        Segment::B,
        Segment::C,
        Segment::D,
        Segment::E,
        Segment::F,
        Segment::G,
    ];

    /// Position of this segment in a [`SegmentMask`]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Check if this is a horizontal stroke (a, d, g)
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Segment::A | Segment::D | Segment::G)
    }
}

const ON: bool = true;
const OFF: bool = false;

/// Segment table for 0-9, columns a..g
const DIGIT_SEGMENTS: [SegmentMask; 10] = [
    [ON, ON, ON, ON, ON, ON, OFF],      // 0
    [OFF, ON, ON, OFF, OFF, OFF, OFF],  // 1
    [ON, ON, OFF, ON, ON, OFF, ON],     // 2
    [ON, ON, ON, ON, OFF, OFF, ON],     // 3
    [OFF, ON, ON, OFF, OFF, ON, ON],    // 4
    [ON, OFF, ON, ON, OFF, ON, ON],     // 5
    [ON, OFF, ON, ON, ON, ON, ON],      // 6
    [ON, ON, ON, OFF, OFF, OFF, OFF],   // 7
    [ON, ON, ON, ON, ON, ON, ON],       // 8
    [ON, ON, ON, ON, OFF, ON, ON],      // 9
];

/// Decode a digit value into its segment mask
///
/// Values above 9 are rejected, never wrapped.
pub fn decode(value: u8) -> Result<SegmentMask, DigitError> {
    DIGIT_SEGMENTS
        .get(value as usize)
        .copied()
        .ok_or(DigitError::OutOfRange(value))
}

/// A validated decimal digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Digit(u8);

impl Digit {
    pub const ZERO: Self = Self(0);
    pub const EIGHT: Self = Self(8);
    pub const MAX: u8 = 9;

    /// Create a digit, rejecting values above 9
    pub const fn new(value: u8) -> Result<Self, DigitError> {
        if value > Self::MAX {
            Err(DigitError::OutOfRange(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Numeric value (0-9)
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Segment mask for this digit
    pub fn segments(self) -> SegmentMask {
        DIGIT_SEGMENTS[self.0 as usize]
    }

    /// Check if `segment` is lit for this digit
    pub fn is_lit(self, segment: Segment) -> bool {
        self.segments()[segment.index()]
    }
}

impl TryFrom<u8> for Digit {
    type Error = DigitError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Digit::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(lit: &str) -> SegmentMask {
        let mut m = [false; SEGMENT_COUNT];
        for c in lit.chars() {
            m[(c as u8 - b'a') as usize] = true;
        }
        m
    }

    #[test]
    fn test_decode_table_exhaustive() {
        let expected = [
            "abcdef", "bc", "abdeg", "abcdg", "bcfg", "acdfg", "acdefg", "abc", "abcdefg",
            "abcdfg",
        ];
        for (value, lit) in expected.iter().enumerate() {
            assert_eq!(decode(value as u8), Ok(mask(lit)), "digit {}", value);
        }
    }

    #[test]
    fn test_decode_rejects_out_of_range() {
        assert_eq!(decode(10), Err(DigitError::OutOfRange(10)));
        assert_eq!(decode(255), Err(DigitError::OutOfRange(255)));
        assert_eq!(Digit::new(10), Err(DigitError::OutOfRange(10)));
        assert!(Digit::try_from(9).is_ok());
    }

    #[test]
    fn test_segment_indices() {
        for (i, seg) in Segment::ALL.iter().enumerate() {
            assert_eq!(seg.index(), i);
        }
        assert!(Segment::G.is_horizontal());
        assert!(!Segment::F.is_horizontal());
    }

    #[test]
    fn test_digit_lit_segments() {
        let one = Digit::new(1).unwrap();
        assert!(one.is_lit(Segment::B));
        assert!(one.is_lit(Segment::C));
        assert!(!one.is_lit(Segment::A));
        assert_eq!(Digit::EIGHT.segments(), [true; SEGMENT_COUNT]);
    }
}
