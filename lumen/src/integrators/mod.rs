mod bdpt;
mod mlt;

pub use bdpt::Bidirectional;
pub use mlt::Metropolis;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

use crate::{
    error::{Error, Result},
    math::Spectrum,
    scene::Scene,
    settings::RenderSettings,
};

use std::sync::Arc;

pub type BidirectionalParams = bdpt::Params;
pub type MetropolisParams = mlt::Params;

#[derive(
    Copy, Clone, Debug, PartialEq, Deserialize, Serialize, Display, EnumVariantNames, EnumString,
)]
pub enum IntegratorType {
    Bidirectional(bdpt::Params),
    Metropolis(mlt::Params),
}

impl IntegratorType {
    pub fn instantiate(self) -> Box<dyn Integrator> {
        match self {
            IntegratorType::Bidirectional(params) => Box::new(Bidirectional::new(params)),
            IntegratorType::Metropolis(params) => Box::new(Metropolis::new(params)),
        }
    }
}

#[allow(clippy::derivable_impls)] // Can't derive Default for non unit variants
impl Default for IntegratorType {
    fn default() -> Self {
        IntegratorType::Bidirectional(bdpt::Params::default())
    }
}

/// Pixels of a finished render, row by row from the top.
#[derive(Clone, Debug)]
pub struct RenderResult {
    pub pixels: Vec<Spectrum>,
    pub resolution: (u16, u16),
    /// Number of subpaths or mutations that went into the image
    pub path_count: usize,
}

impl RenderResult {
    pub fn pixel(&self, x: u16, y: u16) -> Spectrum {
        self.pixels[(y as usize) * (self.resolution.0 as usize) + (x as usize)]
    }

    /// Average of all pixels.
    pub fn mean(&self) -> Spectrum {
        if self.pixels.is_empty() {
            return Spectrum::zeros();
        }
        let sum = self
            .pixels
            .iter()
            .fold(Spectrum::zeros(), |acc, &p| acc + p);
        sum / (self.pixels.len() as f64)
    }
}

// Public interface for scene integrators.
pub trait Integrator {
    /// Renders `scene` as seen through its lens.
    ///
    /// Fails with [`Error::Settings`] if `settings` asks for a different
    /// resolution than the lens has.
    fn render(&self, scene: &Arc<Scene>, settings: &RenderSettings) -> Result<RenderResult>;
}

/// Creates the pool render work is spread on.
fn thread_pool(settings: &RenderSettings) -> Result<rayon::ThreadPool> {
    let num_threads = if settings.use_single_render_thread {
        1
    } else {
        num_cpus::get()
    };
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|why| Error::Settings(format!("failed to create render threads: {}", why)))
}

/// Returns the resolution to render at, which both the lens and `settings`
/// have to agree on.
fn image_resolution(scene: &Scene, settings: &RenderSettings) -> Result<(u16, u16)> {
    let resolution = scene.lens.resolution();
    if resolution != settings.resolution {
        return Err(Error::Settings(format!(
            "resolution {:?} doesn't match the {:?} lens of '{}'",
            settings.resolution, resolution, scene.name
        )));
    }
    Ok(resolution)
}
