use crate::math::{Point2, Vec3};

use rand::{distributions::Standard, Rng};
use rand_pcg::Pcg32;

/// The random source threaded through every sampling operation.
///
/// Pcg has uncorrelated streams so each pixel, path sample or Markov chain
/// gets its own stream of a shared seed.
pub type Random = Pcg32;

/// Creates the [`Random`] for `stream` of `seed`.
pub fn create_random(seed: u64, stream: u64) -> Random {
    Pcg32::new(seed, stream)
}

/// Returns a uniform sample in [0,1).
#[inline]
pub fn get_1d(rng: &mut Random) -> f64 {
    rng.sample(Standard)
}

/// Returns a uniform sample in [0,1)^2.
#[inline]
pub fn get_2d(rng: &mut Random) -> Point2 {
    Point2::new(rng.sample(Standard), rng.sample(Standard))
}

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Monte_Carlo_Integration/2D_Sampling_with_Multidimensional_Transformations

pub fn concentric_sample_disk(u: Point2) -> Point2 {
    let offset = Point2::new(u.x * 2.0 - 1.0, u.y * 2.0 - 1.0);
    if offset.x == 0.0 && offset.y == 0.0 {
        return Point2::new(0.0, 0.0);
    }

    let (theta, r) = if offset.x.abs() > offset.y.abs() {
        (
            std::f64::consts::FRAC_PI_4 * (offset.y / offset.x),
            offset.x,
        )
    } else {
        (
            std::f64::consts::FRAC_PI_2 - std::f64::consts::FRAC_PI_4 * (offset.x / offset.y),
            offset.y,
        )
    };

    Point2::new(theta.cos() * r, theta.sin() * r)
}

/// Samples the +z hemisphere with a cosine-weighted distribution.
pub fn cosine_sample_hemisphere(u: Point2) -> Vec3 {
    let d = concentric_sample_disk(u);
    let z = (1.0 - d.x * d.x - d.y * d.y).max(0.0).sqrt();
    Vec3::new(d.x, d.y, z)
}

/// Solid angle density of [`cosine_sample_hemisphere`] for a direction with `cos_theta`.
#[inline]
pub fn cosine_hemisphere_pdf(cos_theta: f64) -> f64 {
    if cos_theta > 0.0 {
        cos_theta * std::f64::consts::FRAC_1_PI
    } else {
        0.0
    }
}

/// Samples the unit sphere uniformly.
pub fn uniform_sample_sphere(u: Point2) -> Vec3 {
    let z = 1.0 - 2.0 * u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * std::f64::consts::PI * u.y;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Solid angle density of [`uniform_sample_sphere`].
#[inline]
pub fn uniform_sphere_pdf() -> f64 {
    1.0 / (4.0 * std::f64::consts::PI)
}

/// Picks one of `count` items uniformly with `u`.
/// Returns the index of the chosen item and `u` remapped to [0,1].
pub fn sample_discrete(u: f64, count: usize) -> Option<(usize, f64)> {
    if count == 0 {
        return None;
    }
    let scaled = u * (count as f64);
    let i = (scaled as usize).min(count - 1);
    Some((i, (scaled - i as f64).clamp(0.0, 1.0)))
}
