//! Numeric helpers for terrain noise.
//!
//! Several of these look like they could be replaced by std methods, but the
//! generated terrain depends on the exact rounding of each formula. `lerp` is
//! `a + t * (b - a)`, never a fused multiply-add, and `floor` goes through an
//! integer truncation the same way the reference generator does.

/// Quintic fade curve `6x^5 - 15x^4 + 10x^3`.
#[inline]
#[must_use]
pub fn smoothstep(x: f64) -> f64 {
    x * x * x * (x * (x * 6.0 - 15.0) + 10.0)
}

/// Floor to `i32`, saturating like an `as` cast for out-of-range input.
#[inline]
#[must_use]
pub fn floor(v: f64) -> i32 {
    let i = v as i32;
    if v < f64::from(i) { i - 1 } else { i }
}

/// Floor to `i64`.
#[inline]
#[must_use]
pub fn lfloor(v: f64) -> i64 {
    let i = v as i64;
    if v < i as f64 { i - 1 } else { i }
}

/// Integer division rounding toward negative infinity.
#[inline]
#[must_use]
pub const fn floor_div(x: i32, y: i32) -> i32 {
    let q = x / y;
    if (x % y != 0) && ((x ^ y) < 0) { q - 1 } else { q }
}

/// Modulo with the sign of the divisor.
#[inline]
#[must_use]
pub const fn floor_mod(x: i32, y: i32) -> i32 {
    x - floor_div(x, y) * y
}

#[inline]
#[must_use]
pub fn lerp(alpha: f64, a: f64, b: f64) -> f64 {
    a + alpha * (b - a)
}

#[inline]
#[must_use]
pub fn lerp_f32(alpha: f32, a: f32, b: f32) -> f32 {
    a + alpha * (b - a)
}

/// Bilinear interpolation over a unit square.
#[inline]
#[must_use]
pub fn lerp2(a1: f64, a2: f64, x00: f64, x10: f64, x01: f64, x11: f64) -> f64 {
    lerp(a2, lerp(a1, x00, x10), lerp(a1, x01, x11))
}

/// Trilinear interpolation over a unit cube.
///
/// Corner naming is `xYZ` bit order: `x100` is the corner at `x = 1, y = 0, z = 0`.
#[inline]
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn lerp3(
    a1: f64,
    a2: f64,
    a3: f64,
    x000: f64,
    x100: f64,
    x010: f64,
    x110: f64,
    x001: f64,
    x101: f64,
    x011: f64,
    x111: f64,
) -> f64 {
    lerp(
        a3,
        lerp2(a1, a2, x000, x100, x010, x110),
        lerp2(a1, a2, x001, x101, x011, x111),
    )
}

/// Lerp with the factor clamped to `[0, 1]`.
#[inline]
#[must_use]
pub fn clamped_lerp(min: f64, max: f64, factor: f64) -> f64 {
    if factor < 0.0 {
        min
    } else if factor > 1.0 {
        max
    } else {
        lerp(factor, min, max)
    }
}

/// Clamp without the NaN assertions of `f64::clamp`.
#[inline]
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Position of `value` between `from_min` and `from_max`, `0..1` inside the range.
#[inline]
#[must_use]
pub fn inverse_lerp(value: f64, from_min: f64, from_max: f64) -> f64 {
    (value - from_min) / (from_max - from_min)
}

/// Linear remap without clamping.
#[inline]
#[must_use]
pub fn map(value: f64, from_min: f64, from_max: f64, to_min: f64, to_max: f64) -> f64 {
    lerp(inverse_lerp(value, from_min, from_max), to_min, to_max)
}

/// Linear remap with the output held at the range ends.
#[inline]
#[must_use]
pub fn clamped_map(value: f64, from_min: f64, from_max: f64, to_min: f64, to_max: f64) -> f64 {
    clamped_lerp(to_min, to_max, inverse_lerp(value, from_min, from_max))
}

#[inline]
#[must_use]
pub fn square(x: f64) -> f64 {
    x * x
}

#[inline]
#[must_use]
pub fn cube(x: f64) -> f64 {
    x * x * x
}

/// Hashes a block position into the seed used by positional random factories.
///
/// The `x` product wraps in 32 bits before widening.
#[inline]
#[must_use]
pub const fn positional_seed(x: i32, y: i32, z: i32) -> i64 {
    let mut l = (x.wrapping_mul(3_129_871) as i64) ^ (z as i64).wrapping_mul(116_129_781) ^ (y as i64);
    l = l
        .wrapping_mul(l)
        .wrapping_mul(42_317_861)
        .wrapping_add(l.wrapping_mul(11));
    l >> 16
}
