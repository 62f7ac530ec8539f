use super::{Emitter, EmitterSample, Light};
use crate::{
    color::Wavelengths,
    materials::Material,
    sampling::{get_2d, Random},
    scene::{Intersection, Shape},
};

use std::sync::Arc;

// Based on Physically Based Rendering 3rd ed.
// https://pbr-book.org/3ed-2018/Light_Sources/Area_Lights

/// Emits from the surface of a shape that is also part of the scene geometry.
///
/// Positions are sampled uniformly by area.
pub struct AreaLight {
    shape_id: usize,
    shape: Arc<dyn Shape>,
    material: Arc<dyn Material>,
}

impl AreaLight {
    /// Creates a new `AreaLight`. `shape_id` has to be the id the shape got
    /// in the scene geometry so that hits on it can be recognized.
    pub fn new(shape_id: usize, shape: Arc<dyn Shape>, material: Arc<dyn Material>) -> Self {
        Self {
            shape_id,
            shape,
            material,
        }
    }
}

impl Light for AreaLight {
    fn sample_emitter(&self, lambda: &Wavelengths, rng: &mut Random) -> Option<EmitterSample> {
        let area = self.shape.area();
        if !(area > 0.0) {
            return None;
        }

        let (p, n) = self.shape.sample(get_2d(rng));
        let hit = Intersection {
            p,
            n,
            ns: n,
            t: 0.0,
            front: true,
            shape_id: self.shape_id,
            material: self.material.clone(),
        };
        let power = self.material.emission(&hit, n, lambda);
        if power.is_black() {
            return None;
        }

        Some(EmitterSample {
            emitter: Emitter::Surface { hit },
            power,
            pdf: 1.0 / area,
        })
    }

    fn emitter_pdf(&self, hit: &Intersection) -> f64 {
        let area = self.shape.area();
        if hit.shape_id == self.shape_id && area > 0.0 {
            1.0 / area
        } else {
            0.0
        }
    }
}
