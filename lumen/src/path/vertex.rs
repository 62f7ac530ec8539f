use super::PathContext;
use crate::{
    error::{check_pdf, Error, Result},
    lights::{Emitter, EmitterSample},
    math::{Point2, Point3, Ray, Spectrum, Vec3},
    sampling::Random,
    scene::Intersection,
};

use std::sync::Arc;

// Based on Physically Based Rendering 3rd ed.
// https://pbr-book.org/3ed-2018/Light_Transport_III_Bidirectional_Methods/Bidirectional_Path_Tracing#Vertex

/// The subpath a vertex belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Eye,
    Light,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Eye => Side::Light,
            Side::Light => Side::Eye,
        }
    }
}

/// Where a vertex lies.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Location {
    Finite(Point3),
    /// Direction toward the point at infinity
    AtInfinity(Vec3),
}

#[derive(Clone, Debug)]
pub enum Role {
    /// Sensor sample for a raster position
    EyeTerminal { pixel: Point2 },
    /// Sampled emitter with its emitted quantity and position density
    LightTerminal {
        emitter: Emitter,
        power: Spectrum,
        pdf: f64,
    },
    /// Scene surface reached along `incident`
    Surface { hit: Intersection, incident: Vec3 },
    /// A ray that left the scene along `direction`
    Background { direction: Vec3 },
}

/// A direction sampled at a vertex.
#[derive(Copy, Clone, Debug)]
pub struct VertexSample {
    pub direction: Vec3,
    /// Multiplier for the carried weight: `evaluate * cos / pdf`
    pub weight: Spectrum,
    /// Solid angle density of `direction`, 1 for delta samples
    pub pdf: f64,
    pub specular: bool,
}

/// One event of a subpath.
///
/// Vertices are immutable and link to their parent, toward the subpath's
/// terminal. Subpaths that share a prefix share the vertices of the prefix.
pub struct PathVertex {
    role: Role,
    side: Side,
    parent: Option<Arc<PathVertex>>,
    weight: Spectrum,
    depth: u32,
    /// The parent reached this vertex through a delta mode
    parent_specular: bool,
    context: Arc<PathContext>,
}

impl PathVertex {
    /// Creates the eye terminal for the raster position `pixel`.
    ///
    /// Returns `None` if `pixel` is outside the image.
    pub fn eye_terminal(pixel: Point2, context: &Arc<PathContext>) -> Option<Arc<Self>> {
        context.scene().lens.direction(pixel)?;
        Some(Arc::new(Self {
            role: Role::EyeTerminal { pixel },
            side: Side::Eye,
            parent: None,
            weight: Spectrum::ones(),
            depth: 0,
            parent_specular: false,
            context: context.clone(),
        }))
    }

    /// Creates the light terminal for a sampled emitter.
    ///
    /// The carried weight is the emitted power over the position density.
    pub fn light_terminal(
        sample: EmitterSample,
        context: &Arc<PathContext>,
    ) -> Result<Option<Arc<Self>>> {
        let pdf = check_pdf(sample.pdf, "Light::sample_emitter")?;
        if pdf == 0.0 || sample.power.is_black() {
            return Ok(None);
        }
        if sample.power.has_negatives() || !sample.power.is_finite() {
            crate::lumen_error!("Light::sample_emitter returned power {:?}", sample.power);
            return Err(Error::CollaboratorContract(format!(
                "Light::sample_emitter returned power {:?}",
                sample.power
            )));
        }

        Ok(Some(Arc::new(Self {
            weight: sample.power / pdf,
            role: Role::LightTerminal {
                emitter: sample.emitter,
                power: sample.power,
                pdf,
            },
            side: Side::Light,
            parent: None,
            depth: 0,
            parent_specular: false,
            context: context.clone(),
        })))
    }

    /// Creates a vertex that continues `parent`'s subpath.
    ///
    /// `parent_specular` tells if the direction toward it came from a delta
    /// mode of `parent`.
    pub(crate) fn child(
        role: Role,
        weight: Spectrum,
        parent_specular: bool,
        parent: &Arc<PathVertex>,
    ) -> Arc<Self> {
        debug_assert!(matches!(
            role,
            Role::Surface { .. } | Role::Background { .. }
        ));
        Arc::new(Self {
            role,
            side: parent.side,
            parent: Some(parent.clone()),
            weight,
            depth: parent.depth + 1,
            parent_specular,
            context: parent.context.clone(),
        })
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn parent(&self) -> Option<&Arc<PathVertex>> {
        self.parent.as_ref()
    }

    /// Returns the `n`th ancestor, `self` being the 0th.
    pub fn ancestor(self: &Arc<Self>, n: usize) -> Option<Arc<PathVertex>> {
        let mut v = self.clone();
        for _ in 0..n {
            v = v.parent.clone()?;
        }
        Some(v)
    }

    /// Importance or power carried from the terminal, divided by the
    /// densities of the samples that led here.
    pub fn weight(&self) -> Spectrum {
        self.weight
    }

    /// Number of vertices between this one and its terminal.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn context(&self) -> &Arc<PathContext> {
        &self.context
    }

    /// Returns the direction of travel that reached this vertex.
    pub fn incident(&self) -> Option<Vec3> {
        match &self.role {
            Role::Surface { incident, .. } => Some(*incident),
            Role::Background { direction } => Some(*direction),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns `true` if scattering at this vertex is a delta distribution
    /// before any mode has been sampled, as at the open end of a subpath.
    ///
    /// Use [`PathVertex::is_specular_toward`] once the subpath continues.
    pub fn is_specular(&self) -> bool {
        match &self.role {
            Role::Surface { hit, .. } => hit.material.is_specular(),
            _ => false,
        }
    }

    /// Returns `true` if the parent sampled the direction toward this vertex
    /// from a delta mode.
    pub fn parent_specular(&self) -> bool {
        self.parent_specular
    }

    /// Returns `true` if the mode sampled at this vertex to reach `next` was
    /// a delta distribution.
    ///
    /// Falls back to [`PathVertex::is_specular`] if `next` isn't a child of
    /// this vertex.
    pub fn is_specular_toward(&self, next: &PathVertex) -> bool {
        match &next.parent {
            Some(parent) if std::ptr::eq(Arc::as_ptr(parent), self) => next.parent_specular,
            _ => self.is_specular(),
        }
    }

    pub fn position(&self) -> Location {
        match &self.role {
            Role::EyeTerminal { .. } => Location::Finite(self.context.scene().lens.position()),
            Role::LightTerminal { emitter, .. } => Location::Finite(emitter.position()),
            Role::Surface { hit, .. } => Location::Finite(hit.p),
            Role::Background { direction } => Location::AtInfinity(*direction),
        }
    }

    /// Returns the position if it is finite.
    pub fn point(&self) -> Option<Point3> {
        match self.position() {
            Location::Finite(p) => Some(p),
            Location::AtInfinity(_) => None,
        }
    }

    /// Returns the raster position of the subpath's eye terminal.
    pub fn pixel(&self) -> Option<Point2> {
        let mut v = self;
        while let Some(parent) = &v.parent {
            v = parent.as_ref();
        }
        match v.role {
            Role::EyeTerminal { pixel } => Some(pixel),
            _ => None,
        }
    }

    fn adjoint(&self) -> bool {
        self.side == Side::Eye
    }

    /// Samples the direction the subpath continues in.
    ///
    /// Returns `None` when the subpath ends here.
    pub fn sample_position(&self, rng: &mut Random) -> Result<Option<VertexSample>> {
        let lambda = self.context.wavelengths();
        match &self.role {
            Role::EyeTerminal { pixel } => {
                let lens = &self.context.scene().lens;
                let direction = match lens.direction(*pixel) {
                    Some(d) => d,
                    None => return Ok(None),
                };
                let pdf = check_pdf(lens.pdf_direction(direction), "Lens::pdf_direction")?;
                if pdf == 0.0 {
                    return Ok(None);
                }
                let weight = lens.importance(direction) * lens.cosine(direction) / pdf;
                Ok(Some(VertexSample {
                    direction,
                    weight: Spectrum::splat(weight),
                    pdf,
                    specular: false,
                }))
            }
            Role::LightTerminal { emitter, .. } => {
                let sample = match emitter.sample_direction(lambda, rng) {
                    Some(s) => s,
                    None => return Ok(None),
                };
                let pdf = check_pdf(sample.pdf, "emission sampling")?;
                if pdf == 0.0 {
                    return Ok(None);
                }
                let weight =
                    self.evaluate(sample.direction) * (emitter.cosine(sample.direction) / pdf);
                Ok(Some(VertexSample {
                    direction: sample.direction,
                    weight,
                    pdf,
                    specular: false,
                }))
            }
            Role::Surface { hit, incident } => {
                let sample = match hit.material.sample_scatter(
                    hit,
                    *incident,
                    self.adjoint(),
                    lambda,
                    rng,
                ) {
                    Some(s) => s,
                    None => return Ok(None),
                };
                let pdf = check_pdf(sample.pdf, "Material::sample_scatter")?;
                if pdf == 0.0 {
                    return Ok(None);
                }
                if sample.weight.has_negatives() || !sample.weight.is_finite() {
                    crate::lumen_error!(
                        "Material::sample_scatter returned weight {:?}",
                        sample.weight
                    );
                    return Err(Error::CollaboratorContract(format!(
                        "Material::sample_scatter returned weight {:?}",
                        sample.weight
                    )));
                }
                Ok(Some(VertexSample {
                    direction: sample.direction,
                    weight: sample.weight,
                    pdf,
                    specular: sample.is_specular(),
                }))
            }
            Role::Background { .. } => Ok(None),
        }
    }

    /// Evaluates the local response toward `d` without sampling.
    ///
    /// `d` points from this vertex toward the vertex it is being connected to.
    pub fn evaluate(&self, d: Vec3) -> Spectrum {
        let lambda = self.context.wavelengths();
        let d = d.normalized();
        let value = match &self.role {
            Role::EyeTerminal { .. } => {
                Spectrum::splat(self.context.scene().lens.importance(d))
            }
            // Directional factor only, the power is already in the weight
            Role::LightTerminal { emitter, power, .. } => {
                emitter.emitted(d, lambda).safe_div(*power)
            }
            Role::Surface { hit, incident } => match self.side {
                Side::Light => hit.material.evaluate_scatter(hit, *incident, d, lambda),
                Side::Eye => hit.material.evaluate_scatter(hit, -d, -*incident, lambda),
            },
            Role::Background { .. } => lambda.restrict(self.context.scene().background),
        };
        value.finite_or_zero()
    }

    /// Returns the solid angle density of [`PathVertex::sample_position`]
    /// producing `d`. Delta modes contribute nothing, so purely specular
    /// vertices always return 0.
    pub fn forward_pdf(&self, d: Vec3) -> Result<f64> {
        let lambda = self.context.wavelengths();
        let d = match d.try_normalized() {
            Some(d) => d,
            None => return Ok(0.0),
        };
        match &self.role {
            Role::EyeTerminal { .. } => check_pdf(
                self.context.scene().lens.pdf_direction(d),
                "Lens::pdf_direction",
            ),
            Role::LightTerminal { emitter, .. } => {
                check_pdf(emitter.direction_pdf(d, lambda), "emission pdf")
            }
            Role::Surface { hit, incident } => {
                if self.is_specular() {
                    return Ok(0.0);
                }
                check_pdf(
                    hit.material
                        .scatter_pdf(hit, *incident, d, self.adjoint(), lambda),
                    "Material::scatter_pdf",
                )
            }
            Role::Background { .. } => Ok(0.0),
        }
    }

    /// Returns the solid angle density of leaving toward the parent when
    /// traversal arrives from the side of `d`, i.e. of sampling this vertex
    /// in the opposite direction.
    pub fn reverse_pdf(&self, d: Vec3) -> Result<f64> {
        let lambda = self.context.wavelengths();
        let d = match d.try_normalized() {
            Some(d) => d,
            None => return Ok(0.0),
        };
        match &self.role {
            Role::Surface { hit, incident } => {
                if self.is_specular() {
                    return Ok(0.0);
                }
                check_pdf(
                    hit.material
                        .scatter_pdf(hit, -d, -*incident, !self.adjoint(), lambda),
                    "Material::scatter_pdf",
                )
            }
            _ => Ok(0.0),
        }
    }

    /// Returns the cosine factor of this vertex for a segment along `d`.
    pub fn cosine_term(&self, d: Vec3) -> f64 {
        let d = d.normalized();
        match &self.role {
            Role::EyeTerminal { .. } => self.context.scene().lens.cosine(d),
            Role::LightTerminal { emitter, .. } => emitter.cosine(d),
            Role::Surface { hit, .. } => hit.ns.dot(d).abs(),
            Role::Background { .. } => 1.0,
        }
    }

    /// Returns `true` if this vertex is a surface point on an emitter.
    pub fn is_on_light_source(&self) -> bool {
        match &self.role {
            Role::Surface { hit, .. } => hit.material.is_emissive(),
            _ => false,
        }
    }

    /// Returns the area density of the light generating this point.
    pub fn source_pdf(&self) -> Result<f64> {
        match &self.role {
            Role::Surface { hit, .. } => check_pdf(
                self.context.scene().light.emitter_pdf(hit),
                "Light::emitter_pdf",
            ),
            _ => Ok(0.0),
        }
    }

    /// Returns the solid angle density of the emitter at this point emitting
    /// toward `d`.
    pub fn source_direction_pdf(&self, d: Vec3) -> Result<f64> {
        match &self.role {
            Role::Surface { hit, .. } => check_pdf(
                hit.material
                    .emission_pdf(hit, d.normalized(), self.context.wavelengths()),
                "Material::emission_pdf",
            ),
            _ => Ok(0.0),
        }
    }

    /// Returns the radiance emitted from this point back toward the parent.
    pub fn source_radiance(&self) -> Spectrum {
        match &self.role {
            Role::Surface { hit, incident } => hit
                .material
                .emission(hit, -*incident, self.context.wavelengths())
                .finite_or_zero(),
            _ => Spectrum::zeros(),
        }
    }

    /// Returns a ray leaving this vertex along `d`.
    pub fn spawn_ray(&self, d: Vec3) -> Option<Ray> {
        let d = d.try_normalized()?;
        self.point().map(|p| Ray::new(p, d))
    }

    /// Returns the weight a child reached along `d` would carry, or `None`
    /// if `d` can't be sampled from here.
    pub fn throughput_toward(&self, d: Vec3) -> Result<Option<Spectrum>> {
        let pdf = self.forward_pdf(d)?;
        if pdf == 0.0 {
            return Ok(None);
        }
        let weight = self.weight * self.evaluate(d) * (self.cosine_term(d) / pdf);
        Ok(Some(weight.finite_or_zero()))
    }
}

impl std::fmt::Debug for PathVertex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let role = match &self.role {
            Role::EyeTerminal { .. } => "EyeTerminal",
            Role::LightTerminal { .. } => "LightTerminal",
            Role::Surface { .. } => "Surface",
            Role::Background { .. } => "Background",
        };
        f.debug_struct("PathVertex")
            .field("role", &role)
            .field("side", &self.side)
            .field("position", &self.position())
            .field("weight", &self.weight)
            .field("depth", &self.depth)
            .field("parent_specular", &self.parent_specular)
            .finish()
    }
}
