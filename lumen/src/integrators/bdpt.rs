use super::{image_resolution, thread_pool, Integrator, RenderResult};
use crate::{
    error::Result,
    lumen_info,
    math::{Point2, Spectrum},
    path::{PathEvaluator, SubpathTracer},
    sampling::get_2d,
    scene::Scene,
    settings::RenderSettings,
};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use std::{sync::Arc, time::Instant};

// Based on Physically Based Rendering 3rd ed.
// https://pbr-book.org/3ed-2018/Light_Transport_III_Bidirectional_Methods/Bidirectional_Path_Tracing

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Params {
    pub samples_per_pixel: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            samples_per_pixel: 4,
        }
    }
}

/// Traces one eye and one light subpath per sample and sums every strategy
/// that connects them.
pub struct Bidirectional {
    samples_per_pixel: u32,
}

impl Bidirectional {
    pub fn new(params: Params) -> Self {
        Self {
            samples_per_pixel: params.samples_per_pixel.max(1),
        }
    }

    /// Estimates the pixel with index `pixel_index`.
    ///
    /// Sample `i` of the pixel uses stream `pixel_index * spp + i`.
    pub fn estimate(
        &self,
        tracer: &SubpathTracer,
        seed: u64,
        pixel_index: usize,
    ) -> Result<Spectrum> {
        let evaluator = PathEvaluator::new();
        let width = tracer.scene().lens.resolution().0 as usize;
        let (x, y) = (pixel_index % width, pixel_index / width);
        let spp = self.samples_per_pixel as u64;

        let mut sum = Spectrum::zeros();
        for sample in 0..spp {
            let (context, mut rng) = tracer.context(seed, (pixel_index as u64) * spp + sample);
            let pixel = Point2::new(x as f64, y as f64) + get_2d(&mut rng);
            let eye = match tracer.sample_eye(pixel, &context, &mut rng)? {
                Some(eye) => eye,
                None => continue,
            };
            let light = tracer.sample_light(&context, &mut rng)?;
            sum += evaluator.estimate_pixel(light.as_ref(), &eye)?;
        }
        Ok(sum / (spp as f64))
    }
}

impl Integrator for Bidirectional {
    fn render(&self, scene: &Arc<Scene>, settings: &RenderSettings) -> Result<RenderResult> {
        let start = Instant::now();
        let resolution = image_resolution(scene, settings)?;
        let pixel_count = (resolution.0 as usize) * (resolution.1 as usize);
        let tracer = SubpathTracer::new(scene.clone(), settings.color_model, settings.max_depth);

        let pool = thread_pool(settings)?;
        let pixels = pool.install(|| {
            (0..pixel_count)
                .into_par_iter()
                .map(|i| self.estimate(&tracer, settings.seed, i))
                .collect::<Result<Vec<Spectrum>>>()
        })?;

        let path_count = pixel_count * (self.samples_per_pixel as usize) * 2;
        lumen_info!(
            "Bidirectional: {} subpaths in {:.2}s",
            path_count,
            start.elapsed().as_secs_f32()
        );

        Ok(RenderResult {
            pixels,
            resolution,
            path_count,
        })
    }
}
