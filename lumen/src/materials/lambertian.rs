use super::{Material, ScatterSample, ScatterType};
use crate::{
    color::Wavelengths,
    math::{Frame, Spectrum, Vec3},
    sampling::{cosine_hemisphere_pdf, cosine_sample_hemisphere, get_2d, Random},
    scene::Intersection,
};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Lambertian_Reflection
// https://pbr-book.org/3ed-2018/Light_Sources/Area_Lights

/// Ideal diffuse reflector that optionally emits diffusely from its front side.
pub struct Lambertian {
    reflectance: Spectrum,
    emittance: Option<Spectrum>,
}

impl Lambertian {
    /// Creates a new non-emissive `Lambertian`.
    pub fn new(reflectance: Spectrum) -> Self {
        Self {
            reflectance,
            emittance: None,
        }
    }

    /// Creates a new `Lambertian` that emits `emittance` radiance.
    pub fn emissive(reflectance: Spectrum, emittance: Spectrum) -> Self {
        Self {
            reflectance,
            emittance: Some(emittance),
        }
    }

    pub fn reflectance(&self) -> Spectrum {
        self.reflectance
    }
}

/// Reflection only happens between directions on the same side of the surface.
fn same_side(x: &Intersection, incident: Vec3, out: Vec3) -> bool {
    let n = x.ns;
    (-incident).dot(n) * out.dot(n) > 0.0
}

impl Material for Lambertian {
    fn sample_scatter(
        &self,
        x: &Intersection,
        incident: Vec3,
        _adjoint: bool,
        _lambda: &Wavelengths,
        rng: &mut Random,
    ) -> Option<ScatterSample> {
        if self.reflectance.is_black() {
            return None;
        }

        let n = x.ns.faceforward(-incident);
        let local = cosine_sample_hemisphere(get_2d(rng));
        let pdf = cosine_hemisphere_pdf(local.z);
        if pdf == 0.0 {
            return None;
        }
        let direction = Frame::from_normal(n).to_world(local).normalized();

        Some(ScatterSample {
            direction,
            // f * cos / pdf = (r / pi) * cos / (cos / pi)
            weight: self.reflectance,
            pdf,
            sample_type: ScatterType::DIFFUSE | ScatterType::REFLECTION,
        })
    }

    fn evaluate_scatter(
        &self,
        x: &Intersection,
        incident: Vec3,
        out: Vec3,
        _lambda: &Wavelengths,
    ) -> Spectrum {
        if same_side(x, incident, out) {
            self.reflectance * std::f64::consts::FRAC_1_PI
        } else {
            Spectrum::zeros()
        }
    }

    fn scatter_pdf(
        &self,
        x: &Intersection,
        incident: Vec3,
        out: Vec3,
        _adjoint: bool,
        _lambda: &Wavelengths,
    ) -> f64 {
        if self.reflectance.is_black() || !same_side(x, incident, out) {
            return 0.0;
        }
        cosine_hemisphere_pdf(out.normalized().dot(x.ns).abs())
    }

    fn emission(&self, x: &Intersection, out: Vec3, lambda: &Wavelengths) -> Spectrum {
        match self.emittance {
            Some(emittance) if out.dot(x.n) > 0.0 => lambda.restrict(emittance),
            _ => Spectrum::zeros(),
        }
    }

    fn emission_pdf(&self, x: &Intersection, out: Vec3, _lambda: &Wavelengths) -> f64 {
        if self.emittance.is_none() {
            return 0.0;
        }
        cosine_hemisphere_pdf(out.normalized().dot(x.n))
    }

    fn sample_emission(
        &self,
        x: &Intersection,
        _lambda: &Wavelengths,
        rng: &mut Random,
    ) -> Option<ScatterSample> {
        self.emittance?;

        let local = cosine_sample_hemisphere(get_2d(rng));
        let pdf = cosine_hemisphere_pdf(local.z);
        if pdf == 0.0 {
            return None;
        }

        Some(ScatterSample {
            direction: Frame::from_normal(x.n).to_world(local).normalized(),
            // Unit directional factor: cos / (cos / pi)
            weight: Spectrum::splat(std::f64::consts::PI),
            pdf,
            sample_type: ScatterType::EMISSION | ScatterType::DIFFUSE,
        })
    }

    fn is_emissive(&self) -> bool {
        self.emittance.is_some()
    }
}
