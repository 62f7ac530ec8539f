//! Bidirectional path construction and evaluation for light transport.
//!
//! [`path`] holds the core: vertices, subpaths, joined paths, their MIS
//! weighting and Metropolis mutations. The remaining modules are the scene
//! collaborators those operate on and the integrators built from them.

mod macros;

pub mod camera;
pub mod color;
pub mod error;
pub mod integrators;
pub mod lights;
pub mod materials;
pub mod math;
pub mod path;
pub mod sampling;
pub mod scene;
pub mod settings;
pub mod visibility;

pub use error::{Error, Result};
pub use log;
