mod area_light;
mod composite_light;
mod point_light;

pub use area_light::AreaLight;
pub use composite_light::CompositeLight;
pub use point_light::PointLight;

use crate::{
    color::Wavelengths,
    materials::{ScatterSample, ScatterType},
    math::{Point3, Spectrum, Vec3},
    sampling::{get_2d, uniform_sample_sphere, uniform_sphere_pdf, Random},
    scene::Intersection,
};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Light_Sources/Light_Interface.html#Light
// https://pbr-book.org/3ed-2018/Light_Transport_III_Bidirectional_Methods/The_Path-Space_Measurement_Equation#SamplingLightSources

/// The point a light subpath starts from.
#[derive(Clone, Debug)]
pub enum Emitter {
    /// Isotropic emitter at a single point
    Point { position: Point3, intensity: Spectrum },
    /// A point on an emissive surface
    Surface { hit: Intersection },
}

impl Emitter {
    pub fn position(&self) -> Point3 {
        match self {
            Emitter::Point { position, .. } => *position,
            Emitter::Surface { hit } => hit.p,
        }
    }

    /// Returns `true` if the emitter has no area and can't be hit by rays.
    pub fn is_delta(&self) -> bool {
        matches!(self, Emitter::Point { .. })
    }

    /// Returns the radiant quantity leaving toward `d`: intensity for point
    /// emitters, radiance for surfaces.
    pub fn emitted(&self, d: Vec3, lambda: &Wavelengths) -> Spectrum {
        match self {
            Emitter::Point { intensity, .. } => lambda.restrict(*intensity),
            Emitter::Surface { hit } => hit.material.emission(hit, d, lambda),
        }
    }

    /// Returns the solid angle density of emitting toward `d`.
    pub fn direction_pdf(&self, d: Vec3, lambda: &Wavelengths) -> f64 {
        match self {
            Emitter::Point { .. } => uniform_sphere_pdf(),
            Emitter::Surface { hit } => hit.material.emission_pdf(hit, d, lambda),
        }
    }

    /// Returns the cosine between `d` and the emitting surface.
    pub fn cosine(&self, d: Vec3) -> f64 {
        match self {
            Emitter::Point { .. } => 1.0,
            Emitter::Surface { hit } => hit.n.dot(d.normalized()).abs(),
        }
    }

    /// Samples an emission direction.
    ///
    /// The returned weight is left for the caller to fill in since it depends
    /// on how the emitted quantity was split into the subpath's weight.
    pub fn sample_direction(&self, lambda: &Wavelengths, rng: &mut Random) -> Option<ScatterSample> {
        match self {
            Emitter::Point { .. } => {
                let direction = uniform_sample_sphere(get_2d(rng));
                Some(ScatterSample {
                    direction,
                    weight: Spectrum::zeros(),
                    pdf: uniform_sphere_pdf(),
                    sample_type: ScatterType::EMISSION,
                })
            }
            Emitter::Surface { hit } => hit.material.sample_emission(hit, lambda, rng),
        }
    }
}

/// A sampled emitter with the density it was chosen with.
#[derive(Clone, Debug)]
pub struct EmitterSample {
    pub emitter: Emitter,
    /// Emitted quantity along the emitter's main direction, restricted to
    /// the path's wavelengths
    pub power: Spectrum,
    /// Area density of the position. Point emitters report the probability
    /// of having been selected.
    pub pdf: f64,
}

pub trait Light: Send + Sync {
    /// Chooses an emitter and a position on it.
    fn sample_emitter(&self, lambda: &Wavelengths, rng: &mut Random) -> Option<EmitterSample>;

    /// Chooses an emitter for shading `p`.
    ///
    /// The default ignores `p` and matches [`Light::sample_emitter`].
    fn illuminate(
        &self,
        _p: Point3,
        lambda: &Wavelengths,
        rng: &mut Random,
    ) -> Option<EmitterSample> {
        self.sample_emitter(lambda, rng)
    }

    /// Returns the area density with which [`Light::sample_emitter`] produces
    /// the surface point `hit`. Zero for points that aren't on an emitter.
    fn emitter_pdf(&self, hit: &Intersection) -> f64;

    /// Number of emitters this light chooses between.
    fn count(&self) -> usize {
        1
    }
}
