//! xoroshiro128++ random stream.

use super::{DOUBLE_UNIT, FLOAT_UNIT, PositionalRandom, Random, RandomSource, RandomSplitter};
use crate::math::positional_seed;

const GOLDEN_RATIO_64: u64 = 0x9E37_79B9_7F4A_7C15;
const SILVER_RATIO_64: u64 = 0x6A09_E667_F3BC_C909;

#[inline]
const fn mix_stafford_13(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[derive(Clone, Debug)]
pub struct Xoroshiro {
    lo: u64,
    hi: u64,
}

impl Xoroshiro {
    /// Creates a stream from a 64-bit world seed, spreading it over 128 bits first.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        let lo = seed ^ SILVER_RATIO_64;
        let hi = lo.wrapping_add(GOLDEN_RATIO_64);
        Self::new(mix_stafford_13(lo), mix_stafford_13(hi))
    }

    /// Creates a stream from raw state. An all-zero state is replaced, it would never advance.
    #[must_use]
    pub const fn new(lo: u64, hi: u64) -> Self {
        if lo == 0 && hi == 0 {
            Self {
                lo: GOLDEN_RATIO_64,
                hi: SILVER_RATIO_64,
            }
        } else {
            Self { lo, hi }
        }
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        let l = self.lo;
        let mut m = self.hi;
        let n = l.wrapping_add(m).rotate_left(17).wrapping_add(l);
        m ^= l;
        self.lo = l.rotate_left(49) ^ m ^ (m << 21);
        self.hi = m.rotate_left(28);
        n
    }

    #[inline]
    fn next_bits(&mut self, bits: u32) -> u64 {
        self.next_u64() >> (64 - bits)
    }
}

impl Random for Xoroshiro {
    #[inline]
    fn next_i32(&mut self) -> i32 {
        self.next_u64() as i32
    }

    fn next_i32_bounded(&mut self, bound: i32) -> i32 {
        let bound_u = bound as u64;
        let mut l = u64::from(self.next_i32() as u32);
        let mut m = l * bound_u;
        let mut n = m & 0xFFFF_FFFF;
        if n < bound_u {
            let threshold = u64::from(bound.wrapping_neg() as u32 % bound as u32);
            while n < threshold {
                l = u64::from(self.next_i32() as u32);
                m = l * bound_u;
                n = m & 0xFFFF_FFFF;
            }
        }
        (m >> 32) as i32
    }

    #[inline]
    fn next_i64(&mut self) -> i64 {
        self.next_u64() as i64
    }

    #[inline]
    fn next_bool(&mut self) -> bool {
        self.next_u64() & 1 != 0
    }

    #[inline]
    fn next_f32(&mut self) -> f32 {
        self.next_bits(24) as f32 * FLOAT_UNIT
    }

    #[inline]
    fn next_f64(&mut self) -> f64 {
        self.next_bits(53) as f64 * DOUBLE_UNIT
    }

    fn fork(&mut self) -> RandomSource {
        let lo = self.next_u64();
        let hi = self.next_u64();
        RandomSource::Xoroshiro(Self::new(lo, hi))
    }

    fn next_positional(&mut self) -> RandomSplitter {
        let lo = self.next_u64();
        let hi = self.next_u64();
        RandomSplitter::Xoroshiro(XoroshiroSplitter { lo, hi })
    }
}

/// Positional factory for [`Xoroshiro`] streams.
#[derive(Clone, Debug)]
pub struct XoroshiroSplitter {
    lo: u64,
    hi: u64,
}

impl PositionalRandom for XoroshiroSplitter {
    fn at(&self, x: i32, y: i32, z: i32) -> RandomSource {
        let seed = positional_seed(x, y, z) as u64;
        RandomSource::Xoroshiro(Xoroshiro::new(seed ^ self.lo, self.hi))
    }

    fn with_hash_of(&self, name: &str) -> RandomSource {
        let digest = md5::compute(name.as_bytes()).0;
        let mut lo_bytes = [0u8; 8];
        let mut hi_bytes = [0u8; 8];
        lo_bytes.copy_from_slice(&digest[..8]);
        hi_bytes.copy_from_slice(&digest[8..]);
        RandomSource::Xoroshiro(Xoroshiro::new(
            u64::from_be_bytes(lo_bytes) ^ self.lo,
            u64::from_be_bytes(hi_bytes) ^ self.hi,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = Xoroshiro::from_seed(12345);
        let mut b = Xoroshiro::from_seed(12345);
        for _ in 0..100 {
            assert_eq!(a.next_i64(), b.next_i64());
        }
    }

    #[test]
    fn test_zero_state_is_replaced() {
        let mut random = Xoroshiro::new(0, 0);
        assert_ne!(random.next_i64(), 0);
    }

    #[test]
    fn test_bounded_stays_in_range() {
        let mut random = Xoroshiro::from_seed(42);
        for bound in [1, 2, 7, 10, 256, 1 << 30] {
            for _ in 0..200 {
                let value = random.next_i32_bounded(bound);
                assert!((0..bound).contains(&value));
            }
        }
    }

    #[test]
    fn test_fork_diverges_from_parent() {
        let mut parent = Xoroshiro::from_seed(5);
        let mut child = parent.fork();
        assert_ne!(parent.next_i64(), child.next_i64());
    }
}
