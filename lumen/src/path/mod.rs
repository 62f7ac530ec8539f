//! Bidirectional path construction.
//!
//! Subpaths are chains of immutable [`PathVertex`]es grown by the
//! [`SubpathTracer`] from an eye or a light terminal. A [`Path`] joins one of
//! each, the [`PathEvaluator`] weighs the strategies that could have produced
//! it and a [`PathMutator`] proposes new paths for Metropolis sampling.

mod context;
mod evaluator;
mod full_path;
mod mutator;
mod tracer;
mod vertex;

pub use context::{PathContext, DEFAULT_MAX_DEPTH};
pub use evaluator::PathEvaluator;
pub use full_path::Path;
pub use mutator::{PathMutator, Proposal, SuffixMutator};
pub use tracer::SubpathTracer;
pub use vertex::{Location, PathVertex, Role, Side, VertexSample};
