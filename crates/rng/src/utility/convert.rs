/// Converts a `u32` value into a `f32` value in the range `[0.0, 1.0]`.
#[inline]
pub fn f32_from_u32_01(x: u32) -> f32 {
    (x & 0xFFFFFF) as f32 * (1.0 / 0xFFFFFF as f32)
}

/// Converts a `u32` value into a `f32` value in the range `[-1.0, 1.0]`.
#[inline]
pub fn f32_from_u32_11(x: u32) -> f32 {
    // `f32_from_u32_01` only uses the low 24 bits of `x`, meaning we can use the most significant
    // one for the sign.
    if x & 0x8000_0000 != 0 {
        -f32_from_u32_01(x)
    } else {
        f32_from_u32_01(x)
    }
}

/// Returns the largest `i32` value that is less than or equal to `x`.
#[inline]
pub fn floor_i32(x: f32) -> i32 {
    let i = x as i32;
    if x < i as f32 {
        i - 1
    } else {
        i
    }
}

/// The quintic fade curve used to interpolate gradient noise.
#[inline]
pub fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Linearly interpolates between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
