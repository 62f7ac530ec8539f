use super::{Material, ScatterSample, ScatterType};
use crate::{
    color::Wavelengths,
    math::{Spectrum, Vec3},
    sampling::Random,
    scene::Intersection,
};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Specular_Reflection_and_Transmission

/// Perfect specular reflector.
pub struct Mirror {
    r: Spectrum,
}

impl Mirror {
    pub fn new(r: Spectrum) -> Self {
        Self { r }
    }
}

fn reflect(incident: Vec3, n: Vec3) -> Vec3 {
    incident - n * (2.0 * incident.dot(n))
}

impl Material for Mirror {
    fn sample_scatter(
        &self,
        x: &Intersection,
        incident: Vec3,
        _adjoint: bool,
        _lambda: &Wavelengths,
        _rng: &mut Random,
    ) -> Option<ScatterSample> {
        if self.r.is_black() {
            return None;
        }
        let direction = reflect(incident, x.ns).try_normalized()?;
        Some(ScatterSample {
            direction,
            // The delta in f cancels against the delta in the pdf
            weight: self.r,
            pdf: 1.0,
            sample_type: ScatterType::SPECULAR | ScatterType::REFLECTION,
        })
    }

    fn evaluate_scatter(
        &self,
        _x: &Intersection,
        _incident: Vec3,
        _out: Vec3,
        _lambda: &Wavelengths,
    ) -> Spectrum {
        Spectrum::zeros()
    }

    fn scatter_pdf(
        &self,
        _x: &Intersection,
        _incident: Vec3,
        _out: Vec3,
        _adjoint: bool,
        _lambda: &Wavelengths,
    ) -> f64 {
        0.0
    }

    fn is_specular(&self) -> bool {
        true
    }
}
