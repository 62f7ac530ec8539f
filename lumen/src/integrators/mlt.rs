use super::{image_resolution, thread_pool, Integrator, RenderResult};
use crate::{
    color::ColorModel,
    error::Result,
    lumen_debug, lumen_info, lumen_warn,
    math::{Point2, Spectrum},
    path::{Path, PathEvaluator, PathMutator, Side, SubpathTracer, SuffixMutator},
    sampling::{create_random, get_1d, get_2d, Random},
    scene::Scene,
    settings::RenderSettings,
};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use std::{sync::Arc, time::Instant};

// Based on Veach, E. and Guibas, L. J. 1997. Metropolis Light Transport.
// https://graphics.stanford.edu/papers/metro/metro.pdf
// https://pbr-book.org/3ed-2018/Light_Transport_III_Bidirectional_Methods/Metropolis_Light_Transport

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Params {
    /// Independent samples used to estimate the image brightness and seed chains
    pub bootstrap_samples: u32,
    pub chains: u32,
    /// Average number of mutations per pixel over all chains
    pub mutations_per_pixel: u32,
    /// Largest number of vertices a mutation removes or adds
    pub max_change: u32,
    /// Probability of mutating the light subpath instead of the eye subpath
    pub light_mutation_probability: f64,
    /// Eye subpaths per pixel for emission that chains can't reach
    pub emission_samples: u32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            bootstrap_samples: 4096,
            chains: 256,
            mutations_per_pixel: 64,
            max_change: 2,
            light_mutation_probability: 0.5,
            emission_samples: 4,
        }
    }
}

// Streams are split so that bootstrap, chains and emission samples never overlap
const BOOTSTRAP_STREAMS: u64 = 1 << 40;
const CHAIN_STREAMS: u64 = 2 << 40;
const SEEDING_STREAM: u64 = 3 << 40;

/// Chain state with its cached target value.
#[derive(Clone)]
struct State {
    path: Path,
    /// Weighted contribution
    value: Spectrum,
    /// Scalar target, the luminance of the weighted measurement contribution
    target: f64,
}

impl State {
    fn new(path: Path, evaluator: &PathEvaluator, color_model: ColorModel) -> Result<State> {
        let value = evaluator.combine(&path)?;
        let luminance = color_model.y(value);
        let target = if luminance > 0.0 {
            luminance * evaluator.strategy_density(&path)?
        } else {
            0.0
        };
        Ok(State {
            path,
            value,
            target,
        })
    }

    /// Contribution of one unit of time spent in this state, before the
    /// image normalization.
    fn deposit(&self, color_model: ColorModel) -> Spectrum {
        let y = color_model.y(self.value);
        if y > 0.0 {
            self.value / y
        } else {
            Spectrum::zeros()
        }
    }
}

/// Metropolis light transport over joined paths.
///
/// A chain's state is a path together with the split it was joined at and
/// its target is the luminance of the path's weighted contribution, so the
/// chains together cover every connecting strategy. Eye terminals are never
/// mutated, which keeps each chain on its starting pixel. Chain starts are
/// resampled from bootstrap paths so that pixels get chains in proportion to
/// their brightness.
pub struct Metropolis {
    params: Params,
}

impl Metropolis {
    pub fn new(params: Params) -> Self {
        Self {
            params: Params {
                bootstrap_samples: params.bootstrap_samples.max(1),
                chains: params.chains.max(1),
                max_change: params.max_change.max(1),
                light_mutation_probability: params.light_mutation_probability.clamp(0.0, 1.0),
                ..params
            },
        }
    }

    /// Traces one bootstrap sample and returns every connection with a
    /// positive target.
    fn bootstrap_sample(
        &self,
        tracer: &SubpathTracer,
        seed: u64,
        index: u64,
    ) -> Result<Vec<State>> {
        let evaluator = PathEvaluator::new();
        let color_model = tracer.color_model();
        let (w, h) = tracer.scene().lens.resolution();
        let (context, mut rng) = tracer.context(seed, BOOTSTRAP_STREAMS + index);

        let u = get_2d(&mut rng);
        let pixel = Point2::new(u.x * (w as f64), u.y * (h as f64));
        let eye = match tracer.sample_eye(pixel, &context, &mut rng)? {
            Some(eye) => eye,
            None => return Ok(Vec::new()),
        };
        let light = match tracer.sample_light(&context, &mut rng)? {
            Some(light) => light,
            None => return Ok(Vec::new()),
        };

        let mut states = Vec::new();
        let mut e = Some(&eye);
        while let Some(eye_vertex) = e {
            if eye_vertex.depth() >= 1 {
                let mut l = Some(&light);
                while let Some(light_vertex) = l {
                    let path = Path::join(light_vertex.clone(), eye_vertex.clone())?;
                    let state = State::new(path, &evaluator, color_model)?;
                    if state.target > 0.0 {
                        states.push(state);
                    }
                    l = light_vertex.parent();
                }
            }
            e = eye_vertex.parent();
        }
        Ok(states)
    }

    /// Runs one chain for `steps` mutations.
    ///
    /// Returns the pixel the chain stays on and the sum of its deposits.
    fn run_chain(
        &self,
        tracer: &SubpathTracer,
        start: State,
        steps: u64,
        rng: &mut Random,
    ) -> Result<Option<(Point2, Spectrum)>> {
        let evaluator = PathEvaluator::new();
        let color_model = tracer.color_model();
        let max_change = self.params.max_change as usize;
        let mutators = [
            SuffixMutator::new(tracer.clone(), Side::Light, max_change),
            SuffixMutator::new(tracer.clone(), Side::Eye, max_change),
        ];

        let pixel = match start.path.eye_tail().pixel() {
            Some(p) => p,
            None => return Ok(None),
        };

        let mut current = start;
        let mut sum = Spectrum::zeros();
        let mut accepted = 0;
        for _ in 0..steps {
            let mutator = if get_1d(rng) < self.params.light_mutation_probability {
                &mutators[0]
            } else {
                &mutators[1]
            };

            let proposal = mutator.propose(&current.path, rng)?;
            let candidate = match &proposal.candidate {
                Some(path) => State::new(path.clone(), &evaluator, color_model)?,
                None => {
                    sum += current.deposit(color_model);
                    continue;
                }
            };

            let a = proposal.acceptance(current.target, candidate.target);
            sum += current.deposit(color_model) * (1.0 - a);
            sum += candidate.deposit(color_model) * a;

            if get_1d(rng) < a {
                current = candidate;
                accepted += 1;
            }
        }

        lumen_debug!(
            "Chain at ({:.1}, {:.1}) accepted {} of {} mutations",
            pixel.x,
            pixel.y,
            accepted,
            steps
        );
        Ok(Some((pixel, sum)))
    }

    /// Adds the emission found directly by eye subpaths, which no chain state
    /// represents.
    fn emission(&self, tracer: &SubpathTracer, seed: u64, pixel_index: usize) -> Result<Spectrum> {
        let spp = self.params.emission_samples as u64;
        if spp == 0 {
            return Ok(Spectrum::zeros());
        }
        let evaluator = PathEvaluator::new();
        let width = tracer.scene().lens.resolution().0 as usize;
        let (x, y) = (pixel_index % width, pixel_index / width);

        let mut sum = Spectrum::zeros();
        for sample in 0..spp {
            let (context, mut rng) = tracer.context(seed, (pixel_index as u64) * spp + sample);
            let pixel = Point2::new(x as f64, y as f64) + get_2d(&mut rng);
            let mut e = tracer.sample_eye(pixel, &context, &mut rng)?;
            while let Some(eye_vertex) = e {
                sum += evaluator.emission(&eye_vertex)?;
                e = eye_vertex.parent().cloned();
            }
        }
        Ok(sum / (spp as f64))
    }
}

/// Picks an index with probability proportional to `weights` given their
/// running sums in `cdf`.
fn sample_cdf(cdf: &[f64], u: f64) -> usize {
    let total = cdf.last().copied().unwrap_or(0.0);
    let target = u * total;
    cdf.partition_point(|&c| c <= target).min(cdf.len().saturating_sub(1))
}

impl Integrator for Metropolis {
    fn render(&self, scene: &Arc<Scene>, settings: &RenderSettings) -> Result<RenderResult> {
        let start = Instant::now();
        let resolution = image_resolution(scene, settings)?;
        let pixel_count = (resolution.0 as usize) * (resolution.1 as usize);
        let tracer = SubpathTracer::new(scene.clone(), settings.color_model, settings.max_depth);
        let pool = thread_pool(settings)?;

        let mut pixels = pool.install(|| {
            (0..pixel_count)
                .into_par_iter()
                .map(|i| self.emission(&tracer, settings.seed, i))
                .collect::<Result<Vec<Spectrum>>>()
        })?;

        let bootstrap_count = self.params.bootstrap_samples as u64;
        let candidates: Vec<State> = pool
            .install(|| {
                (0..bootstrap_count)
                    .into_par_iter()
                    .map(|i| self.bootstrap_sample(&tracer, settings.seed, i))
                    .collect::<Result<Vec<Vec<State>>>>()
            })?
            .into_iter()
            .flatten()
            .collect();

        let cdf: Vec<f64> = candidates
            .iter()
            .scan(0.0, |acc, s| {
                *acc += settings.color_model.y(s.value);
                Some(*acc)
            })
            .collect();
        let total = cdf.last().copied().unwrap_or(0.0);
        // Luminance of the whole image without the directly seen emission
        let brightness = (pixel_count as f64) * total / (bootstrap_count as f64);
        lumen_debug!(
            "Metropolis: {} bootstrap paths, image brightness {}",
            candidates.len(),
            brightness
        );

        if !(total > 0.0) {
            lumen_warn!("Metropolis: No bootstrap path carried light");
            return Ok(RenderResult {
                pixels,
                resolution,
                path_count: pixel_count * (self.params.emission_samples as usize),
            });
        }

        let chain_count = self.params.chains as u64;
        let steps = ((self.params.mutations_per_pixel as u64) * (pixel_count as u64))
            .div_ceil(chain_count)
            .max(1);
        let mut seeding = create_random(settings.seed, SEEDING_STREAM);
        let starts: Vec<State> = (0..chain_count)
            .map(|_| candidates[sample_cdf(&cdf, get_1d(&mut seeding))].clone())
            .collect();

        let results = pool.install(|| {
            starts
                .into_par_iter()
                .enumerate()
                .map(|(c, state)| {
                    let mut rng = create_random(settings.seed, CHAIN_STREAMS + c as u64);
                    self.run_chain(&tracer, state, steps, &mut rng)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let scale = brightness / ((chain_count * steps) as f64);
        for (pixel, sum) in results.into_iter().flatten() {
            let x = (pixel.x as usize).min(resolution.0 as usize - 1);
            let y = (pixel.y as usize).min(resolution.1 as usize - 1);
            pixels[y * (resolution.0 as usize) + x] += sum * scale;
        }

        let path_count = (chain_count * steps) as usize;
        lumen_info!(
            "Metropolis: {} mutations in {} chains in {:.2}s",
            path_count,
            chain_count,
            start.elapsed().as_secs_f32()
        );

        Ok(RenderResult {
            pixels,
            resolution,
            path_count,
        })
    }
}
