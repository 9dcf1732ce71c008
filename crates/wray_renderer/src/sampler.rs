//! Sample sets over the unit square, and their mappings to the disk and
//! hemisphere.
//!
//! A sampler precomputes `num_sets` independent sets of `num_samples` points
//! each. Pixels pick a set deterministically from their coordinates, so a
//! render is reproducible regardless of the order buckets finish in.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use rand::seq::SliceRandom;
use rand::Rng;
use wray_math::{Vec2, Vec3};

/// Number of sets used when the caller has no preference.
pub const DEFAULT_NUM_SETS: usize = 83;

/// Precomputed sample sets over `[0, 1)^2`.
#[derive(Debug, Clone)]
pub struct Sampler {
    num_samples: usize,
    num_sets: usize,
    samples: Vec<Vec2>,
}

impl Sampler {
    /// A single set of cell centers on an `n x n` grid, `n = round(sqrt(num_samples))`.
    ///
    /// With one sample this is the pixel center.
    pub fn regular(num_samples: usize) -> Self {
        let n = grid_side(num_samples);
        let inv = 1.0 / n as f32;

        let mut samples = Vec::with_capacity(n * n);
        for p in 0..n {
            for q in 0..n {
                samples.push(Vec2::new((q as f32 + 0.5) * inv, (p as f32 + 0.5) * inv));
            }
        }

        Self {
            num_samples: n * n,
            num_sets: 1,
            samples,
        }
    }

    /// One random point in each cell of an `n x n` grid, per set.
    ///
    /// The order within each set is shuffled, so that sample `k` of two
    /// different jittered samplers is uncorrelated.
    pub fn jittered<R: Rng + ?Sized>(num_samples: usize, num_sets: usize, rng: &mut R) -> Self {
        let n = grid_side(num_samples);
        let num_sets = num_sets.max(1);
        let inv = 1.0 / n as f32;

        let mut samples = Vec::with_capacity(n * n * num_sets);
        for _ in 0..num_sets {
            let start = samples.len();
            for p in 0..n {
                for q in 0..n {
                    let x = (q as f32 + rng.gen::<f32>()) * inv;
                    let y = (p as f32 + rng.gen::<f32>()) * inv;
                    samples.push(Vec2::new(x, y));
                }
            }
            samples[start..].shuffle(rng);
        }

        if n * n != num_samples {
            log::debug!("Jittered sampler rounded {} samples to {}", num_samples, n * n);
        }

        Self {
            num_samples: n * n,
            num_sets,
            samples,
        }
    }

    /// Samples per set.
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Number of sets.
    pub fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Set `index` (wrapping).
    pub fn set(&self, index: usize) -> &[Vec2] {
        let start = (index % self.num_sets) * self.num_samples;
        &self.samples[start..start + self.num_samples]
    }

    /// The set used for the pixel at `(row, col)`.
    pub fn pixel_set(&self, row: u32, col: u32) -> &[Vec2] {
        let hash = row.wrapping_mul(73_856_093) ^ col.wrapping_mul(19_349_663);
        self.set(hash as usize)
    }
}

fn grid_side(num_samples: usize) -> usize {
    ((num_samples as f32).sqrt().round() as usize).max(1)
}

/// Concentric map from `[0, 1)^2` to the unit disk.
///
/// Preserves relative areas, so stratified square samples stay stratified
/// on the disk.
pub fn map_to_disk(p: Vec2) -> Vec2 {
    let x = 2.0 * p.x - 1.0;
    let y = 2.0 * p.y - 1.0;

    if x == 0.0 && y == 0.0 {
        return Vec2::ZERO;
    }

    let (r, phi) = if x.abs() > y.abs() {
        (x, FRAC_PI_4 * (y / x))
    } else {
        (y, FRAC_PI_2 - FRAC_PI_4 * (x / y))
    };

    Vec2::new(r * phi.cos(), r * phi.sin())
}

/// Map from `[0, 1)^2` to the hemisphere around +Z with density
/// proportional to `cos(theta)^e`. `e = 1` is cosine-weighted.
pub fn map_to_hemisphere(p: Vec2, e: f32) -> Vec3 {
    let phi = TAU * p.x;
    let cos_theta = (1.0 - p.y).powf(1.0 / (e + 1.0));
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}
