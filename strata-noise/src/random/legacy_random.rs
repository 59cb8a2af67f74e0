//! 48-bit linear congruential random stream.

use super::{DOUBLE_UNIT, FLOAT_UNIT, PositionalRandom, Random, RandomSource, RandomSplitter};
use crate::math::positional_seed;

const MULTIPLIER: i64 = 0x5_DEEC_E66D;
const INCREMENT: i64 = 0xB;
const MASK: i64 = (1 << 48) - 1;

#[derive(Clone, Debug)]
pub struct LegacyRandom {
    seed: i64,
}

impl LegacyRandom {
    #[must_use]
    pub const fn from_seed(seed: u64) -> Self {
        Self {
            seed: (seed as i64 ^ MULTIPLIER) & MASK,
        }
    }

    #[inline]
    fn next(&mut self, bits: u32) -> i32 {
        self.seed = self
            .seed
            .wrapping_mul(MULTIPLIER)
            .wrapping_add(INCREMENT)
            & MASK;
        (self.seed >> (48 - bits)) as i32
    }
}

impl Random for LegacyRandom {
    #[inline]
    fn next_i32(&mut self) -> i32 {
        self.next(32)
    }

    fn next_i32_bounded(&mut self, bound: i32) -> i32 {
        if bound & (bound - 1) == 0 {
            return ((i64::from(bound) * i64::from(self.next(31))) >> 31) as i32;
        }
        loop {
            let bits = self.next(31);
            let value = bits % bound;
            if bits.wrapping_sub(value).wrapping_add(bound - 1) >= 0 {
                return value;
            }
        }
    }

    fn next_i64(&mut self) -> i64 {
        let high = i64::from(self.next(32));
        let low = i64::from(self.next(32));
        (high << 32).wrapping_add(low)
    }

    #[inline]
    fn next_bool(&mut self) -> bool {
        self.next(1) != 0
    }

    #[inline]
    fn next_f32(&mut self) -> f32 {
        self.next(24) as f32 * FLOAT_UNIT
    }

    fn next_f64(&mut self) -> f64 {
        let high = i64::from(self.next(26));
        let low = i64::from(self.next(27));
        ((high << 27) + low) as f64 * DOUBLE_UNIT
    }

    fn fork(&mut self) -> RandomSource {
        RandomSource::Legacy(Self::from_seed(self.next_i64() as u64))
    }

    fn next_positional(&mut self) -> RandomSplitter {
        RandomSplitter::Legacy(LegacySplitter {
            seed: self.next_i64(),
        })
    }
}

/// Positional factory for [`LegacyRandom`] streams.
#[derive(Clone, Debug)]
pub struct LegacySplitter {
    seed: i64,
}

/// UTF-16 string hash, `s[0] * 31^(n-1) + ... + s[n-1]` with wrapping.
fn string_hash(name: &str) -> i32 {
    name.encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(i32::from(unit))
        })
}

impl PositionalRandom for LegacySplitter {
    fn at(&self, x: i32, y: i32, z: i32) -> RandomSource {
        let seed = positional_seed(x, y, z) ^ self.seed;
        RandomSource::Legacy(LegacyRandom::from_seed(seed as u64))
    }

    fn with_hash_of(&self, name: &str) -> RandomSource {
        let seed = i64::from(string_hash(name)) ^ self.seed;
        RandomSource::Legacy(LegacyRandom::from_seed(seed as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sequence() {
        let mut random = LegacyRandom::from_seed(0);
        assert_eq!(random.next_i32(), -1_155_484_576);

        let mut random = LegacyRandom::from_seed(42);
        assert_eq!(random.next_i32(), -1_170_105_035);

        let mut random = LegacyRandom::from_seed(0);
        assert_eq!(random.next_i64(), -4_962_768_465_676_381_896);

        let mut random = LegacyRandom::from_seed(0);
        assert!((random.next_f64() - 0.730_967_787_376_657).abs() < 1e-15);
    }

    #[test]
    fn test_string_hash() {
        assert_eq!(string_hash(""), 0);
        assert_eq!(string_hash("a"), 97);
        assert_eq!(string_hash("ab"), 3105);
    }

    #[test]
    fn test_bounded_stays_in_range() {
        let mut random = LegacyRandom::from_seed(3);
        for bound in [1, 3, 16, 100, 262] {
            for _ in 0..200 {
                assert!((0..bound).contains(&random.next_i32_bounded(bound)));
            }
        }
    }
}
