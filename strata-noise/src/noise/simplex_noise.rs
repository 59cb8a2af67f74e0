//! Two-dimensional simplex noise and its octave stack.

use crate::math::floor;
use crate::noise::improved_noise::GRADIENT;
use crate::random::Random;

const SQRT_3: f64 = 1.732_050_807_568_877_2;
const F2: f64 = 0.5 * (SQRT_3 - 1.0);
const G2: f64 = (3.0 - SQRT_3) / 6.0;

/// Simplex noise over a shuffled permutation table.
#[derive(Debug, Clone)]
pub struct SimplexNoise {
    p: [u8; 256],
    pub xo: f64,
    pub yo: f64,
    pub zo: f64,
}

impl SimplexNoise {
    /// Draws in the same order as [`ImprovedNoise`](super::ImprovedNoise).
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
    fn p(&self, i: i32) -> usize {
        self.p[(i & 0xFF) as usize] as usize
    }

    #[inline]
    fn corner_noise(gradient: usize, x: f64, y: f64, falloff: f64) -> f64 {
        let t = falloff - x * x - y * y;
        if t < 0.0 {
            0.0
        } else {
            let g = GRADIENT[gradient];
            let t = t * t;
            t * t * (f64::from(g[0]) * x + f64::from(g[1]) * y)
        }
    }

    #[must_use]
    #[allow(clippy::many_single_char_names)]
    pub fn get_value(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * F2;
        let i = floor(x + skew);
        let j = floor(y + skew);
        let unskew = f64::from(i + j) * G2;
        let x0 = x - (f64::from(i) - unskew);
        let y0 = y - (f64::from(j) - unskew);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };
        let x1 = x0 - f64::from(i1) + G2;
        let y1 = y0 - f64::from(j1) + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = i & 0xFF;
        let jj = j & 0xFF;
        let g0 = self.p(ii + self.p(jj) as i32) % 12;
        let g1 = self.p(ii + i1 + self.p(jj + j1) as i32) % 12;
        let g2 = self.p(ii + 1 + self.p(jj + 1) as i32) % 12;

        70.0 * (Self::corner_noise(g0, x0, y0, 0.5)
            + Self::corner_noise(g1, x1, y1, 0.5)
            + Self::corner_noise(g2, x2, y2, 0.5))
    }
}

/// Simplex octaves `first_octave..=0`, drawn from one stream starting with the
/// highest frequency. Each halving of frequency doubles the octave's weight.
#[derive(Debug, Clone)]
pub struct PerlinSimplexNoise {
    noise_levels: Vec<SimplexNoise>,
    highest_freq_value_factor: f64,
}

impl PerlinSimplexNoise {
    /// `first_octave` is clamped to at most zero.
    pub fn new<R: Random>(random: &mut R, first_octave: i32) -> Self {
        let count = (1 - first_octave.min(0)) as usize;
        let noise_levels = (0..count).map(|_| SimplexNoise::new(random)).collect();
        Self {
            noise_levels,
            highest_freq_value_factor: 1.0 / (2f64.powi(count as i32) - 1.0),
        }
    }

    #[must_use]
    pub fn get_value(&self, x: f64, y: f64) -> f64 {
        let mut input_factor = 1.0;
        let mut value_factor = self.highest_freq_value_factor;
        let mut value = 0.0;
        for noise in &self.noise_levels {
            value += noise.get_value(x * input_factor, y * input_factor) * value_factor;
            input_factor /= 2.0;
            value_factor *= 2.0;
        }
        value
    }
}
