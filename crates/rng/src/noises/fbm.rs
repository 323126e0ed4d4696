use crate::Noise;

/// Fractal Brownian motion: the sum of `O` octaves of a base noise, each one sampled at a higher
/// frequency and a lower amplitude than the previous one.
///
/// # Remarks
///
/// The output is normalized by the sum of the amplitudes. If the base noise returns values in
/// `[-1.0, 1.0]`, so does this one.
#[derive(Debug, Clone)]
pub struct Fbm<N, const O: usize> {
    /// One independent noise per octave.
    pub octaves: [N; O],
    /// The frequency of the first octave.
    pub frequency: f32,
    /// The factor applied to the frequency between two octaves.
    pub lacunarity: f32,
    /// The factor applied to the amplitude between two octaves.
    pub persistence: f32,
}

impl<N, const O: usize> Fbm<N, O> {
    /// Creates a new [`Fbm`] with the usual lacunarity of `2.0` and persistence of `0.5`.
    pub fn new(octaves: [N; O], frequency: f32) -> Self {
        Self {
            octaves,
            frequency,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }

    fn accumulate(&self, mut f: impl FnMut(&N, f32) -> f32) -> f32 {
        let mut total = 0.0;
        let mut norm = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;

        for octave in &self.octaves {
            total += f(octave, frequency) * amplitude;
            norm += amplitude;
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        if norm == 0.0 {
            0.0
        } else {
            total / norm
        }
    }
}

impl<N, const O: usize> Noise<[f32; 2]> for Fbm<N, O>
where
    N: Noise<[f32; 2], Output = f32>,
{
    type Output = f32;

    fn sample(&self, [x, y]: [f32; 2]) -> f32 {
        self.accumulate(|noise, f| noise.sample([x * f, y * f]))
    }
}

impl<N, const O: usize> Noise<[f32; 3]> for Fbm<N, O>
where
    N: Noise<[f32; 3], Output = f32>,
{
    type Output = f32;

    fn sample(&self, [x, y, z]: [f32; 3]) -> f32 {
        self.accumulate(|noise, f| noise.sample([x * f, y * f, z * f]))
    }
}
