use super::{EmitterSample, Light};
use crate::{
    color::Wavelengths,
    math::Point3,
    sampling::{get_1d, sample_discrete, Random},
    scene::Intersection,
};

use std::sync::Arc;

/// Chooses one of its lights uniformly at random.
///
/// The selection probability is folded into every density it reports.
pub struct CompositeLight {
    lights: Vec<Arc<dyn Light>>,
}

impl CompositeLight {
    pub fn new(lights: Vec<Arc<dyn Light>>) -> Self {
        Self { lights }
    }

    fn select(&self, rng: &mut Random) -> Option<(&Arc<dyn Light>, f64)> {
        let (i, _) = sample_discrete(get_1d(rng), self.lights.len())?;
        Some((&self.lights[i], 1.0 / (self.lights.len() as f64)))
    }
}

impl Light for CompositeLight {
    fn sample_emitter(&self, lambda: &Wavelengths, rng: &mut Random) -> Option<EmitterSample> {
        let (light, selection_pdf) = self.select(rng)?;
        light.sample_emitter(lambda, rng).map(|mut sample| {
            sample.pdf *= selection_pdf;
            sample
        })
    }

    fn illuminate(
        &self,
        p: Point3,
        lambda: &Wavelengths,
        rng: &mut Random,
    ) -> Option<EmitterSample> {
        let (light, selection_pdf) = self.select(rng)?;
        light.illuminate(p, lambda, rng).map(|mut sample| {
            sample.pdf *= selection_pdf;
            sample
        })
    }

    fn emitter_pdf(&self, hit: &Intersection) -> f64 {
        if self.lights.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.lights.iter().map(|l| l.emitter_pdf(hit)).sum();
        sum / (self.lights.len() as f64)
    }

    fn count(&self) -> usize {
        self.lights.len()
    }
}
