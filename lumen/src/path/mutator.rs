use super::{evaluator::to_area, Path, PathVertex, Side, SubpathTracer};
use crate::{
    error::Result,
    lumen_trace,
    sampling::{get_1d, sample_discrete, Random},
};

use std::sync::Arc;

// Based on Veach, E. and Guibas, L. J. 1997. Metropolis Light Transport.
// https://graphics.stanford.edu/papers/metro/metro.pdf

/// A mutated path with the densities needed to accept or reject it.
#[derive(Clone, Debug)]
pub struct Proposal {
    /// `None` if the mutation was rejected before producing a path
    pub candidate: Option<Path>,
    /// Density of proposing the candidate from the current path
    pub forward_density: f64,
    /// Density of proposing the current path from the candidate
    pub reverse_density: f64,
}

impl Proposal {
    pub fn rejected() -> Self {
        Self {
            candidate: None,
            forward_density: 0.0,
            reverse_density: 0.0,
        }
    }

    /// Returns the Metropolis acceptance probability of the candidate given
    /// the target function values of the current and the candidate path.
    pub fn acceptance(&self, current_value: f64, candidate_value: f64) -> f64 {
        if self.candidate.is_none() || !(candidate_value > 0.0) || !(self.forward_density > 0.0)
        {
            return 0.0;
        }
        if !(current_value > 0.0) {
            return 1.0;
        }
        let a = (candidate_value * self.reverse_density) / (current_value * self.forward_density);
        if a.is_finite() {
            a.min(1.0)
        } else {
            0.0
        }
    }
}

pub trait PathMutator: Send + Sync {
    /// Proposes a new path based on `path`, which is left untouched.
    fn propose(&self, path: &Path, rng: &mut Random) -> Result<Proposal>;

    /// Returns the density of proposing `to` when mutating `from`.
    fn transition_density(&self, from: &Path, to: &Path) -> Result<f64>;
}

/// Replaces the open end of one subpath.
///
/// Removes `k` vertices from the side's tail and grows `m` new ones from the
/// remaining tail, with both `k` and `m` uniform in `1..=max_change`.
pub struct SuffixMutator {
    tracer: SubpathTracer,
    side: Side,
    max_change: usize,
}

impl SuffixMutator {
    pub fn new(tracer: SubpathTracer, side: Side, max_change: usize) -> Self {
        Self {
            tracer,
            side,
            max_change: max_change.max(1),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    fn sample_count(&self, rng: &mut Random) -> usize {
        sample_discrete(get_1d(rng), self.max_change)
            .map(|(i, _)| i + 1)
            .unwrap_or(1)
    }
}

/// Returns the window of `len` vertices ending at `tail`, tail first.
fn window(tail: &Arc<PathVertex>, len: usize) -> Vec<Arc<PathVertex>> {
    let mut out = Vec::with_capacity(len);
    let mut v = Some(tail);
    while let Some(vertex) = v {
        if out.len() == len {
            break;
        }
        out.push(vertex.clone());
        v = vertex.parent();
    }
    out
}

/// Area density of `v` having been sampled from its parent.
fn generation_density(v: &PathVertex) -> Result<f64> {
    let parent = match v.parent() {
        Some(p) => p,
        None => return Ok(0.0),
    };
    if v.parent_specular() {
        return Ok(1.0);
    }
    let (from, to) = match (parent.point(), v.point()) {
        (Some(a), Some(b)) => (a, b),
        _ => return Ok(0.0),
    };
    let pdf = parent.forward_pdf(to - from)?;
    Ok(to_area(pdf, parent, v))
}

impl PathMutator for SuffixMutator {
    fn propose(&self, path: &Path, rng: &mut Random) -> Result<Proposal> {
        let len = path.side_length(self.side);
        let removed = self.sample_count(rng);
        if removed >= len {
            lumen_trace!(
                "Can't remove {} of {} {:?} vertices",
                removed,
                len,
                self.side
            );
            return Ok(Proposal::rejected());
        }
        let added = self.sample_count(rng);

        let prefix = match self.side {
            Side::Light => path.truncate_light(removed)?,
            Side::Eye => path.truncate_eye(removed)?,
        };
        let mut tail = prefix.side_tail(self.side).clone();
        for _ in 0..added {
            match self.tracer.step(&tail, rng)? {
                Some(next) if next.point().is_some() => tail = next,
                _ => return Ok(Proposal::rejected()),
            }
        }

        let candidate = path.with_tail(self.side, tail, len - removed + added);
        let forward_density = self.transition_density(path, &candidate)?;
        let reverse_density = self.transition_density(&candidate, path)?;
        Ok(Proposal {
            candidate: Some(candidate),
            forward_density,
            reverse_density,
        })
    }

    fn transition_density(&self, from: &Path, to: &Path) -> Result<f64> {
        let other = self.side.opposite();
        if !Arc::ptr_eq(from.side_tail(other), to.side_tail(other))
            || from.side_length(other) != to.side_length(other)
        {
            return Ok(0.0);
        }

        let from_side = window(from.side_tail(self.side), from.side_length(self.side));
        let to_side = window(to.side_tail(self.side), to.side_length(self.side));
        let common = from_side
            .iter()
            .rev()
            .zip(to_side.iter().rev())
            .take_while(|(a, b)| Arc::ptr_eq(a, b))
            .count();

        let removed = from_side.len() - common;
        let added = to_side.len() - common;
        let counts = 1..=self.max_change;
        if common == 0 || !counts.contains(&removed) || !counts.contains(&added) {
            return Ok(0.0);
        }

        let choice = 1.0 / (self.max_change as f64);
        let mut density = choice * choice;
        for v in &to_side[..added] {
            density *= generation_density(v)?;
            if density == 0.0 {
                break;
            }
        }
        Ok(density)
    }
}
