//! Block-hit events returned by `events.block.hits()`
//!
//! Response format: `x,y,z,face,entityId` entries joined by `|`. An empty
//! line means no hits are pending.

use heapless::Vec;

/// Maximum hits kept from one poll; the rest are counted and dropped
pub const MAX_HITS_PER_POLL: usize = 32;

/// Errors that can occur while parsing a hits response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HitParseError {
    /// An entry did not have exactly five fields
    FieldCount,
    /// A field was not a valid integer
    InvalidNumber,
}

/// A single block hit reported by the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlockHit {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    /// Face of the block that was hit (0-5)
    pub face: i32,
    /// Entity (player) that produced the hit
    pub entity_id: i32,
}

/// Hits decoded from one response line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitBatch {
    /// Hits in the order the world reported them
    pub hits: Vec<BlockHit, MAX_HITS_PER_POLL>,
    /// Hits that did not fit in `hits`
    pub dropped: usize,
}

impl HitBatch {
    /// Check if the batch holds no hits
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

impl BlockHit {
    /// Parse a single `x,y,z,face,entityId` entry
    pub fn parse(entry: &str) -> Result<Self, HitParseError> {
        let mut fields = [0i32; 5];
        let mut count = 0;
        for field in entry.split(',') {
            if count == fields.len() {
                return Err(HitParseError::FieldCount);
            }
            fields[count] = parse_int(field)?;
            count += 1;
        }
        if count != fields.len() {
            return Err(HitParseError::FieldCount);
        }

        Ok(Self {
            x: fields[0],
            y: fields[1],
            z: fields[2],
            face: fields[3],
            entity_id: fields[4],
        })
    }
}

/// Some servers report coordinates as floats ("6.0"); accept an integral
/// fractional part.
fn parse_int(field: &str) -> Result<i32, HitParseError> {
    let field = field.trim();
    let whole = match field.split_once('.') {
        Some((whole, frac)) if frac.bytes().all(|b| b == b'0') => whole,
        Some(_) => return Err(HitParseError::InvalidNumber),
        None => field,
    };
    whole.parse().map_err(|_| HitParseError::InvalidNumber)
}

/// Parse a complete `events.block.hits()` response line
pub fn parse_block_hits(line: &str) -> Result<HitBatch, HitParseError> {
    let mut batch = HitBatch::default();
    let line = line.trim();
    if line.is_empty() {
        return Ok(batch);
    }

    for entry in line.split('|') {
        let hit = BlockHit::parse(entry)?;
        if batch.hits.push(hit).is_err() {
            batch.dropped += 1;
        }
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response() {
        let batch = parse_block_hits("").unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.dropped, 0);
    }

    #[test]
    fn test_single_hit() {
        let batch = parse_block_hits("6,0,3,1,1\n").unwrap();
        assert_eq!(batch.hits.len(), 1);
        assert_eq!(
            batch.hits[0],
            BlockHit {
                x: 6,
                y: 0,
                z: 3,
                face: 1,
                entity_id: 1
            }
        );
    }

    #[test]
    fn test_multiple_hits_keep_order() {
        let batch = parse_block_hits("6,0,3,1,1|-9,2,11,5,1|18,0,3,0,2").unwrap();
        let xs: [i32; 3] = [batch.hits[0].x, batch.hits[1].x, batch.hits[2].x];
        assert_eq!(xs, [6, -9, 18]);
        assert_eq!(batch.hits[1].z, 11);
        assert_eq!(batch.hits[2].entity_id, 2);
    }

    #[test]
    fn test_float_coordinates_accepted() {
        let hit = BlockHit::parse("6.0,0.0,3.0,1,1").unwrap();
        assert_eq!((hit.x, hit.y, hit.z), (6, 0, 3));

        assert_eq!(
            BlockHit::parse("6.5,0,3,1,1"),
            Err(HitParseError::InvalidNumber)
        );
    }

    #[test]
    fn test_malformed_entries() {
        assert_eq!(parse_block_hits("1,2,3"), Err(HitParseError::FieldCount));
        assert_eq!(
            parse_block_hits("1,2,3,4,5,6"),
            Err(HitParseError::FieldCount)
        );
        assert_eq!(
            parse_block_hits("1,2,x,4,5"),
            Err(HitParseError::InvalidNumber)
        );
        assert_eq!(
            parse_block_hits("1,2,3,4,5|"),
            Err(HitParseError::InvalidNumber)
        );
    }

    #[test]
    fn test_overflow_counts_dropped() {
        let mut line: heapless::String<2048> = heapless::String::new();
        for i in 0..(MAX_HITS_PER_POLL + 3) {
            if i > 0 {
                line.push('|').unwrap();
            }
            line.push_str("1,2,3,0,1").unwrap();
        }

        let batch = parse_block_hits(&line).unwrap();
        assert_eq!(batch.hits.len(), MAX_HITS_PER_POLL);
        assert_eq!(batch.dropped, 3);
    }

    proptest::proptest! {
        #[test]
        fn prop_parse_never_panics(line in "[0-9,|.\\- ]{0,64}") {
            let _ = parse_block_hits(&line);
        }

        #[test]
        fn prop_well_formed_entries_parse(
            x in -30000i32..30000,
            y in -64i32..256,
            z in -30000i32..30000,
            face in 0i32..6,
        ) {
            let mut line: heapless::String<64> = heapless::String::new();
            core::fmt::Write::write_fmt(&mut line, format_args!("{},{},{},{},1", x, y, z, face))
                .unwrap();
            let batch = parse_block_hits(&line).unwrap();
            proptest::prop_assert_eq!(batch.hits.len(), 1);
            let hit = batch.hits[0];
            proptest::prop_assert_eq!((hit.x, hit.y, hit.z), (x, y, z));
        }
    }
}
