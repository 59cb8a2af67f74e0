//! Columns where a chunk upgraded from the old world height had no bedrock.
//!
//! Chunks written before the world was extended to `y = -64` are
//! regenerated below zero. The old bedrock floor is turned into deepslate,
//! and columns whose floor had been dug through are cleared entirely so
//! players' holes stay open.

use log::warn;
use serde::{Deserialize, Serialize};
use strata_noise::BlockStateId;

use super::BlockPos;
use super::proto_chunk::ProtoChunk;

const WORDS: usize = 4;
/// Highest Y of the old bedrock floor.
const OLD_BEDROCK_TOP: i32 = 4;

/// One bit per column, indexed `z * 16 + x`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<i64>", into = "Vec<i64>")]
pub struct MissingBedrockBitset {
    words: [u64; WORDS],
}

impl MissingBedrockBitset {
    /// Reads the little-endian word array a chunk file stores. Shorter arrays
    /// are zero extended. Bits past column 255 name no column and are dropped.
    #[must_use]
    pub fn from_longs(longs: &[i64]) -> Self {
        if longs.iter().skip(WORDS).any(|&word| word != 0) {
            warn!(
                "Ignoring bits past column 255 in a missing bedrock mask of {} words",
                longs.len()
            );
        }
        let mut words = [0; WORDS];
        for (slot, &word) in words.iter_mut().zip(longs) {
            *slot = word as u64;
        }
        Self { words }
    }

    /// The word array with trailing zero words dropped.
    #[must_use]
    pub fn to_longs(&self) -> Vec<i64> {
        let used = self
            .words
            .iter()
            .rposition(|&word| word != 0)
            .map_or(0, |last| last + 1);
        self.words[..used].iter().map(|&word| word as i64).collect()
    }

    #[inline]
    const fn bit(x: i32, z: i32) -> usize {
        ((z & 15) * 16 + (x & 15)) as usize
    }

    #[must_use]
    pub const fn has_bedrock_hole(&self, x: i32, z: i32) -> bool {
        let bit = Self::bit(x, z);
        self.words[bit / 64] & (1 << (bit % 64)) != 0
    }

    pub fn set_bedrock_hole(&mut self, x: i32, z: i32, hole: bool) {
        let bit = Self::bit(x, z);
        if hole {
            self.words[bit / 64] |= 1 << (bit % 64);
        } else {
            self.words[bit / 64] &= !(1 << (bit % 64));
        }
    }

    #[must_use]
    pub fn has_bedrock_holes(&self) -> bool {
        self.words.iter().any(|&word| word != 0)
    }

    /// Turns the old bedrock floor between `y = 0` and `y = 4` into deepslate.
    pub fn replace_old_bedrock(chunk: &ProtoChunk) {
        let (base_x, base_z) = (chunk.pos().min_block_x(), chunk.pos().min_block_z());
        for y in 0..=OLD_BEDROCK_TOP {
            for z in 0..16 {
                for x in 0..16 {
                    let pos = BlockPos::new(base_x + x, y, base_z + z);
                    if chunk.get_block_state(pos) == BlockStateId::BEDROCK {
                        chunk.set_block_state(pos, BlockStateId::DEEPSLATE);
                    }
                }
            }
        }
    }

    /// Clears every column with a bedrock hole over the full world height.
    pub fn apply_bedrock_mask(&self, chunk: &ProtoChunk) {
        let (base_x, base_z) = (chunk.pos().min_block_x(), chunk.pos().min_block_z());
        for z in 0..16 {
            for x in 0..16 {
                if !self.has_bedrock_hole(x, z) {
                    continue;
                }
                for y in chunk.min_y()..chunk.max_y() {
                    chunk.set_block_state(BlockPos::new(base_x + x, y, base_z + z), BlockStateId::AIR);
                }
            }
        }
    }
}

impl From<Vec<i64>> for MissingBedrockBitset {
    fn from(value: Vec<i64>) -> Self {
        Self::from_longs(&value)
    }
}

impl From<MissingBedrockBitset> for Vec<i64> {
    fn from(value: MissingBedrockBitset) -> Self {
        value.to_longs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_order_matches_word_layout() {
        let mut mask = MissingBedrockBitset::default();
        mask.set_bedrock_hole(3, 0, true);
        mask.set_bedrock_hole(15, 4, true);
        // (15, 4) is bit 79: bit 15 of the second word.
        assert_eq!(mask.to_longs(), vec![1 << 3, 1 << 15]);
        assert!(mask.has_bedrock_hole(15, 4));
        assert!(mask.has_bedrock_hole(-13, 16));
        assert!(!mask.has_bedrock_hole(4, 15));
    }

    #[test]
    fn test_longs_round_trip() {
        let longs = vec![0, -1, 0, i64::MIN];
        let mask = MissingBedrockBitset::from_longs(&longs);
        assert_eq!(mask.to_longs(), longs);
        assert!(mask.has_bedrock_hole(0, 4));
        assert!(mask.has_bedrock_hole(15, 15));
        assert!(!mask.has_bedrock_hole(0, 0));
    }

    #[test]
    fn test_trailing_zero_words_are_trimmed() {
        let mask = MissingBedrockBitset::from_longs(&[5, 0, 0]);
        assert_eq!(mask.to_longs(), vec![5]);
        assert!(MissingBedrockBitset::default().to_longs().is_empty());
        assert!(!MissingBedrockBitset::default().has_bedrock_holes());
    }

    #[test]
    fn test_ignores_bits_past_the_chunk() {
        let mask = MissingBedrockBitset::from_longs(&[9, 0, 0, 2, 1, -1]);
        assert_eq!(mask.to_longs(), vec![9, 0, 0, 2]);
        assert!(mask.has_bedrock_hole(0, 0));
        assert!(mask.has_bedrock_hole(1, 12));

        let back: MissingBedrockBitset = serde_json::from_str("[0,0,0,0,7]").unwrap();
        assert!(!back.has_bedrock_holes());
    }

    #[test]
    fn test_serde_uses_word_array() {
        let mut mask = MissingBedrockBitset::default();
        mask.set_bedrock_hole(0, 1, true);
        let json = serde_json::to_string(&mask).unwrap();
        assert_eq!(json, "[65536]");
        let back: MissingBedrockBitset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mask);
    }
}
