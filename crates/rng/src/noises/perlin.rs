use crate::utility::{fade, floor_i32, lerp};
use crate::{FromRng, Mixer, Noise, Rng};

/// The gradients used by [`Perlin2`].
const GRADS_2D: [[f32; 2]; 8] = [
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [0.70710677, 0.70710677],
    [-0.70710677, 0.70710677],
    [0.70710677, -0.70710677],
    [-0.70710677, -0.70710677],
];

/// The gradients used by [`Perlin3`] (the edges of a cube).
const GRADS_3D: [[f32; 3]; 16] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [0.0, -1.0, 1.0],
    [0.0, -1.0, -1.0],
];

/// A 2D gradient noise.
///
/// Lattice gradients are picked by hashing the lattice coordinates, so no permutation table is
/// needed and the noise never repeats.
#[derive(Debug, Clone, FromRng)]
pub struct Perlin2 {
    mixer: Mixer<2>,
}

impl Perlin2 {
    #[inline]
    fn grad(&self, x: i32, y: i32, dx: f32, dy: f32) -> f32 {
        let [gx, gy] = GRADS_2D[(self.mixer.mix_i32([x, y]) >> 61) as usize];
        gx * dx + gy * dy
    }
}

impl Noise<[f32; 2]> for Perlin2 {
    type Output = f32;

    /// Samples the provided position in the noise field.
    ///
    /// # Returns
    ///
    /// This function returns the sampled value in the range `[-1.0, 1.0]`.
    fn sample(&self, [x, y]: [f32; 2]) -> f32 {
        let x0 = floor_i32(x);
        let y0 = floor_i32(y);
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let n00 = self.grad(x0, y0, fx, fy);
        let n10 = self.grad(x0 + 1, y0, fx - 1.0, fy);
        let n01 = self.grad(x0, y0 + 1, fx, fy - 1.0);
        let n11 = self.grad(x0 + 1, y0 + 1, fx - 1.0, fy - 1.0);

        let u = fade(fx);
        let v = fade(fy);

        let value = lerp(lerp(n00, n10, u), lerp(n01, n11, u), v);
        (value * std::f32::consts::SQRT_2).clamp(-1.0, 1.0)
    }
}

/// A 3D gradient noise.
#[derive(Debug, Clone, FromRng)]
pub struct Perlin3 {
    mixer: Mixer<3>,
}

impl Perlin3 {
    #[inline]
    fn grad(&self, x: i32, y: i32, z: i32, dx: f32, dy: f32, dz: f32) -> f32 {
        let [gx, gy, gz] = GRADS_3D[(self.mixer.mix_i32([x, y, z]) >> 60) as usize];
        gx * dx + gy * dy + gz * dz
    }
}

impl Noise<[f32; 3]> for Perlin3 {
    type Output = f32;

    /// Samples the provided position in the noise field.
    ///
    /// # Returns
    ///
    /// This function returns the sampled value in the range `[-1.0, 1.0]`.
    fn sample(&self, [x, y, z]: [f32; 3]) -> f32 {
        let x0 = floor_i32(x);
        let y0 = floor_i32(y);
        let z0 = floor_i32(z);
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;
        let fz = z - z0 as f32;

        let u = fade(fx);
        let v = fade(fy);
        let w = fade(fz);

        let c = |ox: i32, oy: i32, oz: i32| {
            self.grad(
                x0 + ox,
                y0 + oy,
                z0 + oz,
                fx - ox as f32,
                fy - oy as f32,
                fz - oz as f32,
            )
        };

        let x00 = lerp(c(0, 0, 0), c(1, 0, 0), u);
        let x10 = lerp(c(0, 1, 0), c(1, 1, 0), u);
        let x01 = lerp(c(0, 0, 1), c(1, 0, 1), u);
        let x11 = lerp(c(0, 1, 1), c(1, 1, 1), u);

        let value = lerp(lerp(x00, x10, v), lerp(x01, x11, v), w);
        value.clamp(-1.0, 1.0)
    }
}
