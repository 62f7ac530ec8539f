use super::{vertex::Role, Path, PathVertex, Side};
use crate::{
    error::Result,
    lumen_trace,
    math::{solid_angle_to_area, Spectrum},
};

use itertools::Itertools;
use std::sync::Arc;

// Based on Physically Based Rendering 3rd ed.
// https://pbr-book.org/3ed-2018/Light_Transport_III_Bidirectional_Methods/Bidirectional_Path_Tracing#ConnectingSubpaths
// https://pbr-book.org/3ed-2018/Light_Transport_III_Bidirectional_Methods/Bidirectional_Path_Tracing#MultipleImportanceSampling

/// Area densities of every vertex of a path, ordered from the light end.
///
/// `pf[i]` is the density of the light-side traversal producing vertex `i`,
/// `pr[i]` the density of the eye-side traversal producing it. Densities
/// caused by a specular vertex are 1 since the delta cancels in every ratio.
struct Densities {
    pf: Vec<f64>,
    pr: Vec<f64>,
}

impl Densities {
    /// Density of the strategy that samples `s` vertices from the light.
    fn strategy(&self, s: usize) -> f64 {
        let light: f64 = self.pf[..s].iter().product();
        let eye: f64 = self.pr[s..].iter().product();
        light * eye
    }
}

/// Area density of `to` given a solid angle density `pdf` at `from`.
pub(crate) fn to_area(pdf: f64, from: &PathVertex, to: &PathVertex) -> f64 {
    match (from.point(), to.point()) {
        (Some(a), Some(b)) => {
            let d = a - b;
            solid_angle_to_area(pdf, to.cosine_term(d), d.len_sqr())
        }
        _ => 0.0,
    }
}

/// Returns for each vertex of `x` if it scattered through a delta mode.
///
/// The mode is known where a neighbor in `x` is the vertex's child. Subpath
/// tails only know whether their material is purely specular.
fn specular_flags(x: &[Arc<PathVertex>]) -> Vec<bool> {
    (0..x.len())
        .map(|i| {
            let child = std::iter::once(i + 1)
                .chain(i.checked_sub(1))
                .filter_map(|j| x.get(j))
                .find(|n| n.parent().is_some_and(|p| Arc::ptr_eq(p, &x[i])));
            match child {
                Some(child) => x[i].is_specular_toward(child),
                None => x[i].is_specular(),
            }
        })
        .collect()
}

/// Computes the densities of `x` as if its first `s` vertices came from the
/// light. `x` has to start at a light terminal (or an emitter surface when
/// `s` is 0) and end at the eye terminal.
fn densities(x: &[Arc<PathVertex>], specular: &[bool], s: usize) -> Result<Option<Densities>> {
    let n = x.len();
    if n < 2 || s >= n || x.iter().any(|v| v.point().is_none()) {
        return Ok(None);
    }
    if !matches!(x[n - 1].role(), Role::EyeTerminal { .. }) {
        return Ok(None);
    }

    let mut pf = vec![0.0; n];
    let mut pr = vec![0.0; n];
    pf[0] = match x[0].role() {
        Role::LightTerminal { pdf, .. } if s > 0 => *pdf,
        Role::Surface { .. } if s == 0 => x[0].source_pdf()?,
        _ => return Ok(None),
    };
    // Pinhole position
    pr[n - 1] = 1.0;

    for (i, (from, to)) in x.iter().tuple_windows().enumerate() {
        let (p_from, p_to) = match (from.point(), to.point()) {
            (Some(a), Some(b)) => (a, b),
            _ => return Ok(None),
        };

        // Light traversal from x[i] to x[i + 1]
        let pdf = if i < s {
            from.forward_pdf(p_to - p_from)?
        } else if i == 0 {
            from.source_direction_pdf(p_to - p_from)?
        } else {
            match x[i - 1].point() {
                Some(p) => from.reverse_pdf(p - p_from)?,
                None => 0.0,
            }
        };
        pf[i + 1] = to_area(pdf, from, to);

        // Eye traversal from x[i + 1] to x[i]
        let pdf = if i + 1 >= s {
            to.forward_pdf(p_from - p_to)?
        } else {
            match x[i + 2].point() {
                Some(p) => to.reverse_pdf(p - p_to)?,
                None => 0.0,
            }
        };
        pr[i] = to_area(pdf, to, from);
    }

    for (k, &delta) in specular.iter().enumerate() {
        if delta {
            if k + 1 < n {
                pf[k + 1] = 1.0;
            }
            if k > 0 {
                pr[k - 1] = 1.0;
            }
        }
    }

    Ok(Some(Densities { pf, pr }))
}

/// Returns `true` if the strategy with `j` light vertices could have
/// produced `x`.
///
/// Eye subpaths need at least two vertices, connections can't touch specular
/// vertices and only emitters with area can be hit by eye subpaths.
fn is_counted(x: &[Arc<PathVertex>], specular: &[bool], j: usize) -> bool {
    let n = x.len();
    if j + 2 > n {
        return false;
    }
    if j == 0 {
        return match x[0].role() {
            Role::LightTerminal { emitter, .. } => !emitter.is_delta(),
            Role::Surface { .. } => x[0].is_on_light_source(),
            _ => false,
        };
    }
    !specular[j - 1] && !specular[j]
}

/// Balance heuristic weight of the strategy with `s` light vertices.
fn balance_weight(x: &[Arc<PathVertex>], s: usize) -> Result<f64> {
    let specular = specular_flags(x);
    if !is_counted(x, &specular, s) {
        return Ok(0.0);
    }
    let densities = match densities(x, &specular, s)? {
        Some(d) => d,
        None => return Ok(0.0),
    };

    let own = densities.strategy(s);
    if own == 0.0 {
        return Ok(0.0);
    }
    let sum: f64 = (0..x.len())
        .filter(|&j| is_counted(x, &specular, j))
        .map(|j| densities.strategy(j))
        .sum();

    let weight = own / sum;
    if weight.is_finite() {
        Ok(weight)
    } else {
        Ok(0.0)
    }
}

/// Evaluates joined paths and weighs the strategies that could produce them.
#[derive(Copy, Clone, Debug, Default)]
pub struct PathEvaluator;

impl PathEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Returns the unweighted estimate of `path` for its own split: the
    /// weights of both subpaths times the connection between their tails.
    pub fn contribution(&self, path: &Path) -> Result<Spectrum> {
        let zero = Ok(Spectrum::zeros());
        if path.eye_length() < 2 {
            return zero;
        }

        let (a, b) = (path.light_tail(), path.eye_tail());
        if a.is_specular() || b.is_specular() {
            return zero;
        }
        let (pa, pb) = match (a.point(), b.point()) {
            (Some(pa), Some(pb)) => (pa, pb),
            _ => return zero,
        };

        let v = pb - pa;
        let dist_sqr = v.len_sqr();
        if !(dist_sqr > 0.0) || !dist_sqr.is_finite() {
            return zero;
        }
        let d = v / dist_sqr.sqrt();

        let g = a.cosine_term(d) * b.cosine_term(-d) / dist_sqr;
        let c = a.weight() * a.evaluate(d) * b.evaluate(-d) * b.weight() * g;
        if c.is_black() || !c.is_finite() {
            return zero;
        }
        if !a.context().scene().unoccluded(pa, pb) {
            return zero;
        }
        Ok(c)
    }

    /// Returns the balance heuristic weight of `path`'s own split.
    pub fn mis_weight(&self, path: &Path) -> Result<f64> {
        if !path.is_complete() {
            lumen_trace!("Weighing an incomplete path");
            return Ok(0.0);
        }
        balance_weight(&path.vertices(), path.light_length())
    }

    /// Returns the area-product density of sampling `path` with its own split.
    pub fn strategy_density(&self, path: &Path) -> Result<f64> {
        if !path.is_complete() {
            return Ok(0.0);
        }
        let x = path.vertices();
        Ok(densities(&x, &specular_flags(&x), path.light_length())?
            .map(|d| d.strategy(path.light_length()))
            .unwrap_or(0.0))
    }

    /// Returns the weighted contribution of `path`.
    ///
    /// For a fixed physical path this doesn't depend on which split produced it.
    pub fn combine(&self, path: &Path) -> Result<Spectrum> {
        let c = self.contribution(path)?;
        if c.is_black() {
            return Ok(c);
        }
        Ok(c * self.mis_weight(path)?)
    }

    /// Returns the weighted emission found by an eye subpath ending at
    /// `eye_vertex`, i.e. the strategy without light vertices.
    pub fn emission(&self, eye_vertex: &Arc<PathVertex>) -> Result<Spectrum> {
        let zero = Ok(Spectrum::zeros());
        if eye_vertex.side() != Side::Eye || eye_vertex.depth() < 1 {
            return zero;
        }

        match eye_vertex.role() {
            // Nothing but escaping eye rays can reach the background
            Role::Background { direction } => {
                Ok((eye_vertex.weight() * eye_vertex.evaluate(*direction)).finite_or_zero())
            }
            Role::Surface { .. } if eye_vertex.is_on_light_source() => {
                let le = eye_vertex.source_radiance();
                if le.is_black() {
                    return zero;
                }
                let mut x = vec![eye_vertex.clone()];
                let mut v = eye_vertex.parent();
                while let Some(parent) = v {
                    x.push(parent.clone());
                    v = parent.parent();
                }
                let w = balance_weight(&x, 0)?;
                Ok((eye_vertex.weight() * le * w).finite_or_zero())
            }
            _ => zero,
        }
    }

    /// Sums every strategy that connects prefixes of the two subpaths.
    pub fn estimate_pixel(
        &self,
        light_tail: Option<&Arc<PathVertex>>,
        eye_tail: &Arc<PathVertex>,
    ) -> Result<Spectrum> {
        let mut sum = Spectrum::zeros();
        let mut eye = Some(eye_tail);
        while let Some(e) = eye {
            if e.depth() >= 1 {
                sum += self.emission(e)?;
                let mut light = light_tail;
                while let Some(l) = light {
                    sum += self.combine(&Path::join(l.clone(), e.clone())?)?;
                    light = l.parent();
                }
            }
            eye = e.parent();
        }
        Ok(sum)
    }
}
