// Small hand-built scenes with known geometry.
//
// Every camera here has an 8x8 image with the center pixel looking straight
// at the origin, where a diffuse floor in the z = 0 plane faces +z.

use lumen::{
    camera::{CameraParameters, PinholeLens, Point3Def},
    color::{ColorModel, Wavelengths},
    lights::{AreaLight, Light, PointLight},
    materials::{Lambertian, Material, Mirror, ScatterSample},
    math::{Point2, Point3, Spectrum, Vec3},
    path::{PathVertex, SubpathTracer, DEFAULT_MAX_DEPTH},
    sampling::{create_random, get_1d, Random},
    scene::{GeometryList, Intersection, Quad, Scene, Shape},
};

use std::sync::Arc;

pub const FLOOR_ALBEDO: f64 = 0.5;
pub const LIGHT_RADIANCE: f64 = 4.0;
pub const CENTER: Point2 = Point2::new(4.0, 4.0);

fn floor_shape() -> Arc<dyn Shape> {
    Arc::new(Quad::new(
        Point3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
    ))
}

fn diffuse() -> Arc<dyn Material> {
    Arc::new(Lambertian::new(Spectrum::splat(FLOOR_ALBEDO)))
}

fn lens(position: Point3Def, up: Point3Def) -> Arc<PinholeLens> {
    Arc::new(
        PinholeLens::new(
            CameraParameters {
                position,
                target: Point3Def(0.0, 0.0, 0.0),
                up,
                fov: 60.0,
            },
            (8, 8),
        )
        .unwrap(),
    )
}

fn overhead_lens() -> Arc<PinholeLens> {
    lens(Point3Def(0.0, 0.0, 5.0), Point3Def(0.0, 1.0, 0.0))
}

pub fn tracer(scene: &Arc<Scene>) -> SubpathTracer {
    SubpathTracer::new(scene.clone(), ColorModel::Rgb, DEFAULT_MAX_DEPTH)
}

/// Diffuse floor lit by a single point light.
pub fn point_lit_floor(light: Point3, intensity: Spectrum) -> Arc<Scene> {
    let mut geometry = GeometryList::new();
    geometry.push(floor_shape(), diffuse());
    Arc::new(Scene::new(
        "point_lit_floor",
        Arc::new(geometry),
        Arc::new(PointLight::new(light, intensity)),
        overhead_lens(),
    ))
}

/// Mirror floor lit by a single point light.
pub fn mirror_floor() -> Arc<Scene> {
    let mut geometry = GeometryList::new();
    geometry.push(floor_shape(), Arc::new(Mirror::new(Spectrum::ones())));
    Arc::new(Scene::new(
        "mirror_floor",
        Arc::new(geometry),
        Arc::new(PointLight::new(Point3::new(1.0, 0.0, 2.0), Spectrum::ones())),
        overhead_lens(),
    ))
}

/// Diffuse floor and a diffuse panel at z = 2 facing down, with a point light
/// under the panel at (1.5, 0, 1).
///
/// Light reaches the origin through the panel point (1.5, 0, 2).
pub fn two_bounce() -> Arc<Scene> {
    let mut geometry = GeometryList::new();
    geometry.push(floor_shape(), diffuse());
    geometry.push(
        Arc::new(Quad::new(
            Point3::new(1.0, -0.5, 2.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        )),
        diffuse(),
    );
    Arc::new(Scene::new(
        "two_bounce",
        Arc::new(geometry),
        Arc::new(PointLight::new(
            Point3::new(1.5, 0.0, 1.0),
            Spectrum::new(1.0, 2.0, 3.0),
        )),
        overhead_lens(),
    ))
}

/// Diffuse floor under a unit square emitter at z = 2 facing down.
///
/// The camera sits off to the side so that the emitter doesn't block it.
pub fn area_lit_floor() -> Arc<Scene> {
    let emitter: Arc<dyn Material> = Arc::new(Lambertian::emissive(
        Spectrum::zeros(),
        Spectrum::splat(LIGHT_RADIANCE),
    ));
    let light_shape: Arc<dyn Shape> = Arc::new(Quad::new(
        Point3::new(-0.5, -0.5, 2.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
    ));

    let mut geometry = GeometryList::new();
    geometry.push(floor_shape(), diffuse());
    let light_id = geometry.push(light_shape.clone(), emitter.clone());
    let light: Arc<dyn Light> = Arc::new(AreaLight::new(light_id, light_shape, emitter));

    Arc::new(Scene::new(
        "area_lit_floor",
        Arc::new(geometry),
        light,
        lens(Point3Def(3.0, 0.0, 1.0), Point3Def(0.0, 0.0, 1.0)),
    ))
}

/// Picks a mirror or a diffuse lobe with equal probability.
pub struct HalfMirror {
    mirror: Mirror,
    diffuse: Lambertian,
}

impl HalfMirror {
    pub fn new() -> Self {
        Self {
            mirror: Mirror::new(Spectrum::ones()),
            diffuse: Lambertian::new(Spectrum::splat(FLOOR_ALBEDO)),
        }
    }
}

impl Material for HalfMirror {
    fn sample_scatter(
        &self,
        x: &Intersection,
        incident: Vec3,
        adjoint: bool,
        lambda: &Wavelengths,
        rng: &mut Random,
    ) -> Option<ScatterSample> {
        let lobe: &dyn Material = if get_1d(rng) < 0.5 {
            &self.mirror
        } else {
            &self.diffuse
        };
        let sample = lobe.sample_scatter(x, incident, adjoint, lambda, rng)?;
        Some(ScatterSample {
            weight: sample.weight * 2.0,
            pdf: sample.pdf * 0.5,
            ..sample
        })
    }

    fn evaluate_scatter(
        &self,
        x: &Intersection,
        incident: Vec3,
        out: Vec3,
        lambda: &Wavelengths,
    ) -> Spectrum {
        self.diffuse.evaluate_scatter(x, incident, out, lambda)
    }

    fn scatter_pdf(
        &self,
        x: &Intersection,
        incident: Vec3,
        out: Vec3,
        adjoint: bool,
        lambda: &Wavelengths,
    ) -> f64 {
        0.5 * self.diffuse.scatter_pdf(x, incident, out, adjoint, lambda)
    }
}

/// `HalfMirror` floor seen from (3, 0, 1), with a diffuse wall at x = -3
/// facing +x and a point light at (-2, 0, 1.5).
///
/// The mirror lobe reflects the center pixel's ray from the origin to the
/// wall point (-3, 0, 1).
pub fn half_mirror_floor() -> Arc<Scene> {
    let mut geometry = GeometryList::new();
    geometry.push(floor_shape(), Arc::new(HalfMirror::new()));
    geometry.push(
        Arc::new(Quad::new(
            Point3::new(-3.0, -1.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
        )),
        diffuse(),
    );
    Arc::new(Scene::new(
        "half_mirror_floor",
        Arc::new(geometry),
        Arc::new(PointLight::new(Point3::new(-2.0, 0.0, 1.5), Spectrum::ones())),
        lens(Point3Def(3.0, 0.0, 1.0), Point3Def(0.0, 0.0, 1.0)),
    ))
}

/// Nothing but a constant background.
pub fn empty(background: Spectrum) -> Arc<Scene> {
    Arc::new(
        Scene::new(
            "empty",
            Arc::new(GeometryList::new()),
            Arc::new(PointLight::new(Point3::new(0.0, 0.0, 1.0), Spectrum::ones())),
            overhead_lens(),
        )
        .with_background(background),
    )
}

/// Extends `v`'s subpath toward `target` as if that direction was sampled.
pub fn extend_toward(
    tracer: &SubpathTracer,
    v: &Arc<PathVertex>,
    target: Point3,
) -> Arc<PathVertex> {
    let d = target - v.point().unwrap();
    let weight = v.throughput_toward(d).unwrap().unwrap();
    let ray = v.spawn_ray(d).unwrap();
    tracer.extend(&ray, weight, v).unwrap()
}

/// Returns the center pixel's floor vertex in `half_mirror_floor` and a
/// child sampled from its mirror lobe.
pub fn mirror_bounce(tracer: &SubpathTracer) -> (Arc<PathVertex>, Arc<PathVertex>) {
    let (ctx, _) = tracer.context(0, 0);
    let eye = tracer.trace_eye(CENTER, &ctx).unwrap();
    let floor = extend_toward(tracer, &eye, Point3::zeros());
    for stream in 0..64 {
        let mut rng = create_random(5, stream);
        if let Some(next) = tracer.step(&floor, &mut rng).unwrap() {
            if next.parent_specular() {
                return (floor, next);
            }
        }
    }
    panic!("Mirror lobe was never sampled");
}
