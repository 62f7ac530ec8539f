use super::{Emitter, EmitterSample, Light};
use crate::{
    color::Wavelengths,
    math::{Point3, Spectrum},
    sampling::Random,
    scene::Intersection,
};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Light_Sources/Point_Lights.html

pub struct PointLight {
    p: Point3,
    i: Spectrum,
}

impl PointLight {
    /// Creates a new `PointLight` at `p` with intensity `i`.
    pub fn new(p: Point3, i: Spectrum) -> Self {
        Self { p, i }
    }
}

impl Light for PointLight {
    fn sample_emitter(&self, lambda: &Wavelengths, _rng: &mut Random) -> Option<EmitterSample> {
        let power = lambda.restrict(self.i);
        if power.is_black() {
            return None;
        }
        Some(EmitterSample {
            emitter: Emitter::Point {
                position: self.p,
                intensity: self.i,
            },
            power,
            pdf: 1.0,
        })
    }

    fn emitter_pdf(&self, _hit: &Intersection) -> f64 {
        0.0
    }
}
