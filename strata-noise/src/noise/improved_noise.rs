//! Single-octave Perlin noise.

use crate::math::{floor, lerp3, smoothstep};
use crate::random::Random;

/// Nudges the flattened Y lattice position up before flooring.
/// The constant is a float widened to double, not the double literal.
const SHIFT_UP_EPSILON: f64 = 1.0e-7_f32 as f64;

/// Gradient directions, indexed by the low four bits of the hash.
pub(crate) const GRADIENT: [[i32; 3]; 16] = [
    [1, 1, 0],
    [-1, 1, 0],
    [1, -1, 0],
    [-1, -1, 0],
    [1, 0, 1],
    [-1, 0, 1],
    [1, 0, -1],
    [-1, 0, -1],
    [0, 1, 1],
    [0, -1, 1],
    [0, 1, -1],
    [0, -1, -1],
    [1, 1, 0],
    [0, -1, 1],
    [-1, 1, 0],
    [0, -1, -1],
];

/// Perlin noise with a random origin offset and a shuffled permutation table.
#[derive(Debug, Clone)]
pub struct ImprovedNoise {
    p: [u8; 256],
    pub xo: f64,
    pub yo: f64,
    pub zo: f64,
}

impl ImprovedNoise {
    /// Draws the origin offset (3 doubles) and then shuffles the permutation
    /// table (256 bounded ints). Callers that skip an octave must consume the
    /// same 262 values to keep later octaves aligned.
    pub fn new<R: Random>(random: &mut R) -> Self {
        let xo = random.next_f64() * 256.0;
        let yo = random.next_f64() * 256.0;
        let zo = random.next_f64() * 256.0;

        let mut p: [u8; 256] = std::array::from_fn(|i| i as u8);
        for i in 0..256 {
            let offset = random.next_i32_bounded((256 - i) as i32) as usize;
            p.swap(i, i + offset);
        }

        Self { p, xo, yo, zo }
    }

    #[inline]
    #[must_use]
    pub fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        self.noise_with_y_scale(x, y, z, 0.0, 0.0)
    }

    /// Samples with vertical flattening: when `y_scale` is non-zero the Y
    /// fraction used for the gradients is snapped down to a multiple of
    /// `y_scale`, capped at `y_max` when that is smaller. The interpolation
    /// weight still uses the unsnapped fraction.
    #[must_use]
    #[allow(clippy::many_single_char_names, clippy::similar_names)]
    pub fn noise_with_y_scale(&self, x: f64, y: f64, z: f64, y_scale: f64, y_max: f64) -> f64 {
        let x = x + self.xo;
        let y = y + self.yo;
        let z = z + self.zo;

        let xi = floor(x);
        let yi = floor(y);
        let zi = floor(z);

        let xr = x - f64::from(xi);
        let yr = y - f64::from(yi);
        let zr = z - f64::from(zi);

        let y_snap = if y_scale == 0.0 {
            0.0
        } else {
            let limit = if y_max >= 0.0 && y_max < yr { y_max } else { yr };
            f64::from(floor(limit / y_scale + SHIFT_UP_EPSILON)) * y_scale
        };

        self.sample_and_lerp(xi, yi, zi, xr, yr - y_snap, zr, yr)
    }

    #[inline]
    const fn p(&self, x: i32) -> i32 {
        self.p[(x & 255) as usize] as i32
    }

    #[allow(clippy::too_many_arguments)]
    fn sample_and_lerp(
        &self,
        x: i32,
        y: i32,
        z: i32,
        xr: f64,
        yr: f64,
        zr: f64,
        yr_weight: f64,
    ) -> f64 {
        let x0 = self.p(x);
        let x1 = self.p(x + 1);
        let xy00 = self.p(x0 + y);
        let xy01 = self.p(x0 + y + 1);
        let xy10 = self.p(x1 + y);
        let xy11 = self.p(x1 + y + 1);

        let d000 = grad_dot(self.p(xy00 + z), xr, yr, zr);
        let d100 = grad_dot(self.p(xy10 + z), xr - 1.0, yr, zr);
        let d010 = grad_dot(self.p(xy01 + z), xr, yr - 1.0, zr);
        let d110 = grad_dot(self.p(xy11 + z), xr - 1.0, yr - 1.0, zr);
        let d001 = grad_dot(self.p(xy00 + z + 1), xr, yr, zr - 1.0);
        let d101 = grad_dot(self.p(xy10 + z + 1), xr - 1.0, yr, zr - 1.0);
        let d011 = grad_dot(self.p(xy01 + z + 1), xr, yr - 1.0, zr - 1.0);
        let d111 = grad_dot(self.p(xy11 + z + 1), xr - 1.0, yr - 1.0, zr - 1.0);

        lerp3(
            smoothstep(xr),
            smoothstep(yr_weight),
            smoothstep(zr),
            d000,
            d100,
            d010,
            d110,
            d001,
            d101,
            d011,
            d111,
        )
    }
}

#[inline]
fn grad_dot(hash: i32, x: f64, y: f64, z: f64) -> f64 {
    let g = &GRADIENT[(hash & 15) as usize];
    f64::from(g[0]) * x + f64::from(g[1]) * y + f64::from(g[2]) * z
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::xoroshiro::Xoroshiro;

    #[test]
    fn test_same_seed_same_table() {
        let a = ImprovedNoise::new(&mut Xoroshiro::from_seed(12345));
        let b = ImprovedNoise::new(&mut Xoroshiro::from_seed(12345));
        assert_eq!(a.p, b.p);
        assert_eq!(a.xo.to_bits(), b.xo.to_bits());
        assert_eq!(
            a.noise(100.0, 64.0, 100.0).to_bits(),
            b.noise(100.0, 64.0, 100.0).to_bits()
        );
    }

    #[test]
    fn test_permutation_is_a_permutation() {
        let noise = ImprovedNoise::new(&mut Xoroshiro::from_seed(9));
        let mut seen = [false; 256];
        for value in noise.p {
            seen[value as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_lattice_points_are_zero() {
        // Gradient noise vanishes on integer lattice points once the offset is removed.
        let noise = ImprovedNoise::new(&mut Xoroshiro::from_seed(42));
        for i in -3..3 {
            let v = noise.noise(
                f64::from(i) - noise.xo,
                f64::from(i * 2) - noise.yo,
                -noise.zo,
            );
            assert!(v.abs() < 1e-9, "lattice sample {v}");
        }
    }

    #[test]
    fn test_range() {
        let noise = ImprovedNoise::new(&mut Xoroshiro::from_seed(42));
        for x in -10..10 {
            for z in -10..10 {
                let v = noise.noise(f64::from(x) * 10.3, 64.7, f64::from(z) * 10.1);
                assert!((-1.5..=1.5).contains(&v));
            }
        }
    }
}
