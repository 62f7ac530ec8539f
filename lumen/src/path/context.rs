use crate::{
    color::{ColorModel, Wavelengths},
    scene::Scene,
};

use std::sync::Arc;

/// Default limit on the number of bounces of one subpath.
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Shared, read-only state of one rendered sample.
///
/// Every vertex of the sample holds the same context.
pub struct PathContext {
    scene: Arc<Scene>,
    wavelengths: Wavelengths,
    color_model: ColorModel,
    max_depth: u32,
    seed: u64,
    stream: u64,
}

impl PathContext {
    pub fn new(
        scene: Arc<Scene>,
        wavelengths: Wavelengths,
        color_model: ColorModel,
        max_depth: u32,
        seed: u64,
        stream: u64,
    ) -> Self {
        Self {
            scene,
            wavelengths,
            color_model,
            max_depth,
            seed,
            stream,
        }
    }

    pub fn scene(&self) -> &Arc<Scene> {
        &self.scene
    }

    pub fn wavelengths(&self) -> &Wavelengths {
        &self.wavelengths
    }

    pub fn color_model(&self) -> ColorModel {
        self.color_model
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Seed of the random stream the sample draws from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Id of the random stream the sample draws from.
    pub fn stream(&self) -> u64 {
        self.stream
    }
}

impl std::fmt::Debug for PathContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathContext")
            .field("scene", &self.scene.name)
            .field("wavelengths", &self.wavelengths)
            .field("max_depth", &self.max_depth)
            .field("seed", &self.seed)
            .field("stream", &self.stream)
            .finish()
    }
}
