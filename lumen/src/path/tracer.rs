use super::{vertex::Role, PathContext, PathVertex};
use crate::{
    color::ColorModel,
    error::Result,
    lumen_trace,
    math::{Point2, Point3, Ray, Spectrum},
    sampling::{create_random, Random},
    scene::Scene,
};

use std::sync::Arc;

/// Builds subpaths by sampling terminals and extending rays through the scene.
///
/// The tracer holds no per-sample state; everything a sample needs travels in
/// its [`PathContext`] and the random handle passed to each call.
#[derive(Clone)]
pub struct SubpathTracer {
    scene: Arc<Scene>,
    color_model: ColorModel,
    max_depth: u32,
}

impl SubpathTracer {
    pub fn new(scene: Arc<Scene>, color_model: ColorModel, max_depth: u32) -> Self {
        Self {
            scene,
            color_model,
            max_depth,
        }
    }

    pub fn scene(&self) -> &Arc<Scene> {
        &self.scene
    }

    pub fn color_model(&self) -> ColorModel {
        self.color_model
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Starts a new sample on `stream` of `seed`.
    ///
    /// Returns the sample's context and the random handle it continues with.
    pub fn context(&self, seed: u64, stream: u64) -> (Arc<PathContext>, Random) {
        let mut rng = create_random(seed, stream);
        let wavelengths = self.color_model.sample(&mut rng);
        let context = Arc::new(PathContext::new(
            self.scene.clone(),
            wavelengths,
            self.color_model,
            self.max_depth,
            seed,
            stream,
        ));
        (context, rng)
    }

    /// Creates the eye terminal for raster position `pixel`.
    pub fn trace_eye(&self, pixel: Point2, context: &Arc<PathContext>) -> Option<Arc<PathVertex>> {
        PathVertex::eye_terminal(pixel, context)
    }

    /// Creates a light terminal on an emitter chosen by the scene's light.
    pub fn trace_light(
        &self,
        context: &Arc<PathContext>,
        rng: &mut Random,
    ) -> Result<Option<Arc<PathVertex>>> {
        match context.scene().light.sample_emitter(context.wavelengths(), rng) {
            Some(sample) => PathVertex::light_terminal(sample, context),
            None => Ok(None),
        }
    }

    /// Creates a light terminal on an emitter chosen for illuminating `p`.
    pub fn trace_light_toward(
        &self,
        p: Point3,
        context: &Arc<PathContext>,
        rng: &mut Random,
    ) -> Result<Option<Arc<PathVertex>>> {
        match context
            .scene()
            .light
            .illuminate(p, context.wavelengths(), rng)
        {
            Some(sample) => PathVertex::light_terminal(sample, context),
            None => Ok(None),
        }
    }

    /// Continues `parent`'s subpath along `ray`, as if a non-delta mode of
    /// `parent` had picked its direction.
    ///
    /// Returns a surface vertex if the ray hits the scene, a background vertex
    /// if it escapes and `None` without tracing if `parent` is already at the
    /// depth limit.
    pub fn extend(
        &self,
        ray: &Ray,
        weight: Spectrum,
        parent: &Arc<PathVertex>,
    ) -> Option<Arc<PathVertex>> {
        self.extend_sampled(ray, weight, false, parent)
    }

    fn extend_sampled(
        &self,
        ray: &Ray,
        weight: Spectrum,
        specular: bool,
        parent: &Arc<PathVertex>,
    ) -> Option<Arc<PathVertex>> {
        if parent.depth() >= parent.context().max_depth() {
            return None;
        }

        let role = match parent.context().scene().geometry.nearest_intersection(ray) {
            Some(hit) => Role::Surface {
                hit,
                incident: ray.d,
            },
            None => Role::Background { direction: ray.d },
        };
        Some(PathVertex::child(role, weight, specular, parent))
    }

    /// Takes one sampled step from `vertex`.
    ///
    /// Returns `None` when the subpath can't continue from it.
    pub fn step(&self, vertex: &Arc<PathVertex>, rng: &mut Random) -> Result<Option<Arc<PathVertex>>> {
        let sample = match vertex.sample_position(rng)? {
            Some(sample) => sample,
            None => return Ok(None),
        };
        let weight = vertex.weight() * sample.weight;
        if weight.is_black() {
            return Ok(None);
        }
        Ok(vertex
            .spawn_ray(sample.direction)
            .and_then(|ray| self.extend_sampled(&ray, weight, sample.specular, vertex)))
    }

    /// Grows the subpath ending at `vertex` until it terminates.
    ///
    /// Returns the new end of the subpath, `vertex` itself if nothing could
    /// be added.
    pub fn expand(&self, vertex: &Arc<PathVertex>, rng: &mut Random) -> Result<Arc<PathVertex>> {
        let mut tail = vertex.clone();
        while let Some(next) = self.step(&tail, rng)? {
            tail = next;
        }
        lumen_trace!(
            "{:?} subpath expanded from depth {} to {}",
            tail.side(),
            vertex.depth(),
            tail.depth()
        );
        Ok(tail)
    }

    /// Traces a full eye subpath through raster position `pixel`.
    pub fn sample_eye(
        &self,
        pixel: Point2,
        context: &Arc<PathContext>,
        rng: &mut Random,
    ) -> Result<Option<Arc<PathVertex>>> {
        match self.trace_eye(pixel, context) {
            Some(terminal) => self.expand(&terminal, rng).map(Some),
            None => Ok(None),
        }
    }

    /// Traces a full light subpath.
    pub fn sample_light(
        &self,
        context: &Arc<PathContext>,
        rng: &mut Random,
    ) -> Result<Option<Arc<PathVertex>>> {
        match self.trace_light(context, rng)? {
            Some(terminal) => self.expand(&terminal, rng).map(Some),
            None => Ok(None),
        }
    }
}
