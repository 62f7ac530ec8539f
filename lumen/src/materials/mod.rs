mod lambertian;
mod mirror;

pub use lambertian::Lambertian;
pub use mirror::Mirror;

use crate::{
    color::Wavelengths,
    math::{Spectrum, Vec3},
    sampling::Random,
    scene::Intersection,
};

use bitflags::bitflags;

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Materials/Material_Interface_and_Implementations
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Basic_Interface#BxDF

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct ScatterType: u8 {
        const REFLECTION = 0b00001;
        const TRANSMISSION = 0b00010;
        const DIFFUSE = 0b00100;
        const SPECULAR = 0b01000;
        const EMISSION = 0b10000;
    }
}

/// A sampled scattering or emission direction.
#[derive(Copy, Clone, Debug)]
pub struct ScatterSample {
    /// Sampled direction of travel, away from the surface.
    pub direction: Vec3,
    /// `f * |cos| / pdf` for the sampled direction.
    pub weight: Spectrum,
    /// Solid angle density of `direction`. Delta lobes report 1.
    pub pdf: f64,
    pub sample_type: ScatterType,
}

impl ScatterSample {
    pub fn is_specular(&self) -> bool {
        self.sample_type.contains(ScatterType::SPECULAR)
    }
}

/// Local scattering and emission at a surface point.
///
/// Directions are directions of travel: `incident` arrives at the surface and
/// `out` leaves it. `adjoint` is set when the query comes from a subpath that
/// started at the eye.
pub trait Material: Send + Sync {
    /// Samples an outgoing direction for light arriving along `incident`.
    ///
    /// Returns `None` when the ray is absorbed.
    fn sample_scatter(
        &self,
        x: &Intersection,
        incident: Vec3,
        adjoint: bool,
        lambda: &Wavelengths,
        rng: &mut Random,
    ) -> Option<ScatterSample>;

    /// Evaluates the scattering function for the pair of directions.
    fn evaluate_scatter(
        &self,
        x: &Intersection,
        incident: Vec3,
        out: Vec3,
        lambda: &Wavelengths,
    ) -> Spectrum;

    /// Returns the solid angle density of sampling `out` with [`Material::sample_scatter`].
    ///
    /// Delta lobes return 0.
    fn scatter_pdf(
        &self,
        x: &Intersection,
        incident: Vec3,
        out: Vec3,
        adjoint: bool,
        lambda: &Wavelengths,
    ) -> f64;

    /// Returns the radiance emitted from `x` along `out`.
    fn emission(&self, _x: &Intersection, _out: Vec3, _lambda: &Wavelengths) -> Spectrum {
        Spectrum::zeros()
    }

    /// Returns the solid angle density of emitting along `out`.
    fn emission_pdf(&self, _x: &Intersection, _out: Vec3, _lambda: &Wavelengths) -> f64 {
        0.0
    }

    /// Samples an emission direction from `x`.
    ///
    /// The weight is the directional factor of the emission times `|cos| / pdf`,
    /// so the spatial radiance is not included.
    fn sample_emission(
        &self,
        _x: &Intersection,
        _lambda: &Wavelengths,
        _rng: &mut Random,
    ) -> Option<ScatterSample> {
        None
    }

    fn is_emissive(&self) -> bool {
        false
    }

    /// Returns `true` if all scattering at this material is a delta distribution.
    fn is_specular(&self) -> bool {
        false
    }
}
