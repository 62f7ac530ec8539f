mod intersection;
mod shapes;

pub use intersection::Intersection;
pub use shapes::{Quad, Shape, ShapeHit, Sphere};

use crate::{
    camera::{CameraParameters, Lens, PinholeLens, Point3Def},
    lights::{AreaLight, CompositeLight, Light, PointLight},
    materials::{Lambertian, Material, Mirror},
    math::{Point3, Ray, Spectrum, Vec3},
    lumen_info,
};

use std::sync::Arc;

/// Nearest-hit query against the scene's surfaces.
pub trait Geometry: Send + Sync {
    /// Returns the closest surface point along `ray` inside its `[t_min, t_max]`.
    fn nearest_intersection(&self, ray: &Ray) -> Option<Intersection>;
}

struct Primitive {
    shape: Arc<dyn Shape>,
    material: Arc<dyn Material>,
}

/// Flat list of shapes tested one by one.
#[derive(Default)]
pub struct GeometryList {
    primitives: Vec<Primitive>,
}

impl GeometryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a shape and returns its id, which ends up in [`Intersection::shape_id`].
    pub fn push(&mut self, shape: Arc<dyn Shape>, material: Arc<dyn Material>) -> usize {
        self.primitives.push(Primitive { shape, material });
        self.primitives.len() - 1
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl Geometry for GeometryList {
    fn nearest_intersection(&self, ray: &Ray) -> Option<Intersection> {
        let mut ray = *ray;
        let mut nearest = None;
        for (shape_id, prim) in self.primitives.iter().enumerate() {
            if let Some(hit) = prim.shape.intersect(&ray) {
                ray.t_max = hit.t;
                nearest = Some((shape_id, hit));
            }
        }

        nearest.map(|(shape_id, hit)| Intersection {
            p: hit.p,
            n: hit.n,
            ns: hit.n,
            t: hit.t,
            front: ray.d.dot(hit.n) < 0.0,
            shape_id,
            material: self.primitives[shape_id].material.clone(),
        })
    }
}

/// Everything a path needs to query: surfaces, emitters, the sensor and the
/// radiance arriving from infinity.
pub struct Scene {
    pub name: String,
    pub geometry: Arc<dyn Geometry>,
    pub light: Arc<dyn Light>,
    pub lens: Arc<dyn Lens>,
    /// Constant radiance of rays that leave the scene
    pub background: Spectrum,
}

impl Scene {
    pub fn new(
        name: &str,
        geometry: Arc<dyn Geometry>,
        light: Arc<dyn Light>,
        lens: Arc<dyn Lens>,
    ) -> Self {
        Self {
            name: name.to_string(),
            geometry,
            light,
            lens,
            background: Spectrum::zeros(),
        }
    }

    pub fn with_background(mut self, background: Spectrum) -> Self {
        self.background = background;
        self
    }

    /// Returns `true` if nothing blocks the segment between `p0` and `p1`.
    pub fn unoccluded(&self, p0: Point3, p1: Point3) -> bool {
        crate::visibility::VisibilityTester::new(p0, p1).unoccluded(self)
    }

    /// Builds a Cornell box with a diffuse ceiling emitter, a small point
    /// light, a mirror ball and a diffuse ball.
    pub fn cornell_box(resolution: (u16, u16)) -> Option<Scene> {
        let white: Arc<dyn Material> = Arc::new(Lambertian::new(Spectrum::new(0.73, 0.73, 0.73)));
        let red: Arc<dyn Material> = Arc::new(Lambertian::new(Spectrum::new(0.65, 0.05, 0.05)));
        let green: Arc<dyn Material> = Arc::new(Lambertian::new(Spectrum::new(0.12, 0.45, 0.15)));
        let mirror: Arc<dyn Material> = Arc::new(Mirror::new(Spectrum::splat(0.9)));
        let emitter: Arc<dyn Material> = Arc::new(Lambertian::emissive(
            Spectrum::splat(0.78),
            Spectrum::new(17.0, 12.0, 4.0),
        ));

        let quad = |c: (f64, f64, f64), e0: (f64, f64, f64), e1: (f64, f64, f64)| -> Arc<dyn Shape> {
            Arc::new(Quad::new(
                Point3::new(c.0, c.1, c.2),
                Vec3::new(e0.0, e0.1, e0.2),
                Vec3::new(e1.0, e1.1, e1.2),
            ))
        };

        let mut geometry = GeometryList::new();
        // Floor, ceiling, back wall all face into the box
        geometry.push(quad((0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 0.0, -1.0)), white.clone());
        geometry.push(quad((0.0, 1.0, 0.0), (0.0, 0.0, -1.0), (1.0, 0.0, 0.0)), white.clone());
        geometry.push(quad((0.0, 0.0, -1.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0)), white.clone());
        geometry.push(quad((0.0, 0.0, 0.0), (0.0, 0.0, -1.0), (0.0, 1.0, 0.0)), red);
        geometry.push(quad((1.0, 0.0, 0.0), (0.0, 1.0, 0.0), (0.0, 0.0, -1.0)), green);
        geometry.push(
            Arc::new(Sphere::new(Point3::new(0.3, 0.18, -0.65), 0.18)),
            mirror,
        );
        geometry.push(
            Arc::new(Sphere::new(Point3::new(0.7, 0.15, -0.35), 0.15)),
            white,
        );

        // Slightly below the ceiling so the emitter isn't coplanar with it
        let light_shape = quad((0.4, 0.999, -0.4), (0.0, 0.0, -0.2), (0.2, 0.0, 0.0));
        let light_id = geometry.push(light_shape.clone(), emitter.clone());

        let lights: Vec<Arc<dyn Light>> = vec![
            Arc::new(AreaLight::new(light_id, light_shape, emitter)),
            Arc::new(PointLight::new(
                Point3::new(0.5, 0.9, -0.1),
                Spectrum::splat(0.5),
            )),
        ];

        let lens = PinholeLens::new(
            CameraParameters {
                position: Point3Def(0.5, 0.5, 1.4),
                target: Point3Def(0.5, 0.5, 0.0),
                up: Point3Def(0.0, 1.0, 0.0),
                fov: 40.0,
            },
            resolution,
        )?;

        lumen_info!(
            "Built Cornell box with {} shapes and {} lights",
            geometry.len(),
            lights.len()
        );

        Some(Scene::new(
            "cornell_box",
            Arc::new(geometry),
            Arc::new(CompositeLight::new(lights)),
            Arc::new(lens),
        ))
    }
}
