//! Fixed-width integers packed into longs.

use anyhow::ensure;

/// `size` unsigned values of `bits` bits each. Values never straddle two
/// longs, so each long holds `64 / bits` of them and the spare high bits
/// stay zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleBitStorage {
    data: Box<[u64]>,
    bits: u32,
    size: usize,
    mask: u64,
    values_per_long: usize,
}

impl SimpleBitStorage {
    #[must_use]
    pub fn new(bits: u32, size: usize) -> Self {
        let values_per_long = Self::values_per_long(bits);
        Self {
            data: vec![0; size.div_ceil(values_per_long)].into_boxed_slice(),
            bits,
            size,
            mask: (1_u64 << bits) - 1,
            values_per_long,
        }
    }

    /// Wraps packed longs, which must be exactly as many as the layout needs.
    pub fn from_raw(bits: u32, size: usize, raw: &[i64]) -> anyhow::Result<Self> {
        let mut storage = Self::new(bits, size);
        ensure!(
            raw.len() == storage.data.len(),
            "expected {} longs for {size} values of {bits} bits, got {}",
            storage.data.len(),
            raw.len()
        );
        for (slot, &value) in storage.data.iter_mut().zip(raw) {
            *slot = value as u64;
        }
        Ok(storage)
    }

    /// Longs needed for `size` values of `bits` bits.
    #[must_use]
    pub const fn long_count(bits: u32, size: usize) -> usize {
        size.div_ceil(Self::values_per_long(bits))
    }

    const fn values_per_long(bits: u32) -> usize {
        (64 / bits) as usize
    }

    #[inline]
    fn locate(&self, index: usize) -> (usize, u32) {
        debug_assert!(index < self.size, "index {index} out of {}", self.size);
        let cell = index / self.values_per_long;
        let shift = (index - cell * self.values_per_long) as u32 * self.bits;
        (cell, shift)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> u32 {
        let (cell, shift) = self.locate(index);
        ((self.data[cell] >> shift) & self.mask) as u32
    }

    pub fn set(&mut self, index: usize, value: u32) {
        let (cell, shift) = self.locate(index);
        let value = u64::from(value) & self.mask;
        self.data[cell] = (self.data[cell] & !(self.mask << shift)) | (value << shift);
    }

    /// Packed longs in the signed form chunk files store.
    #[must_use]
    pub fn raw(&self) -> Vec<i64> {
        self.data.iter().map(|&value| value as i64).collect()
    }

    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heightmap_layout() {
        // 9 bits: 7 values per long, 256 values in 37 longs.
        let storage = SimpleBitStorage::new(9, 256);
        assert_eq!(storage.raw().len(), 37);
        assert_eq!(SimpleBitStorage::long_count(9, 256), 37);
    }

    #[test]
    fn test_values_do_not_straddle_longs() {
        let mut storage = SimpleBitStorage::new(9, 256);
        storage.set(6, 511);
        storage.set(7, 300);
        let raw = storage.raw();
        assert_eq!(raw[0] as u64, 511 << 54);
        assert_eq!(raw[1], 300);
        assert_eq!(storage.get(6), 511);
        assert_eq!(storage.get(7), 300);
        assert_eq!(storage.get(5), 0);
    }

    #[test]
    fn test_set_masks_overflow() {
        let mut storage = SimpleBitStorage::new(4, 16);
        storage.set(1, 0x1f);
        assert_eq!(storage.get(1), 0xf);
        assert_eq!(storage.get(2), 0);
    }

    #[test]
    fn test_from_raw_checks_length() {
        assert!(SimpleBitStorage::from_raw(9, 256, &[0; 36]).is_err());
        let mut storage = SimpleBitStorage::new(9, 256);
        storage.set(100, 77);
        let restored = SimpleBitStorage::from_raw(9, 256, &storage.raw()).unwrap();
        assert_eq!(restored, storage);
    }
}
