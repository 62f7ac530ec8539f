use serde::{Deserialize, Serialize};

use crate::{
    color::ColorModel,
    error::{Error, Result},
    integrators::IntegratorType,
    lumen_info,
    path::DEFAULT_MAX_DEPTH,
};

use std::path::Path;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Has to match the resolution of the rendered scene's lens
    pub resolution: (u16, u16),
    /// Largest vertex depth a subpath can reach
    pub max_depth: u32,
    pub seed: u64,
    pub color_model: ColorModel,
    pub integrator: IntegratorType,
    pub use_single_render_thread: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resolution: (64, 64),
            max_depth: DEFAULT_MAX_DEPTH,
            seed: 0,
            color_model: ColorModel::default(),
            integrator: IntegratorType::default(),
            use_single_render_thread: false,
        }
    }
}

impl RenderSettings {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let settings: RenderSettings =
            serde_yaml::from_str(yaml).map_err(|why| Error::Settings(why.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|why| Error::Settings(why.to_string()))
    }

    /// Loads settings from a yaml file, missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        let settings = Self::from_yaml_str(&yaml)?;
        lumen_info!("Loaded settings from '{}'", path.display());
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.resolution.0 == 0 || self.resolution.1 == 0 {
            return Err(Error::Settings(format!(
                "resolution {:?} has no pixels",
                self.resolution
            )));
        }
        if self.max_depth < 1 {
            return Err(Error::Settings(
                "max_depth must allow at least one bounce".into(),
            ));
        }
        Ok(())
    }
}
