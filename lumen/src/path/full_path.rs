use super::{PathVertex, Side};
use crate::error::{Error, Result};

use std::sync::Arc;

/// A light subpath and an eye subpath meeting at a seam.
///
/// Each side is a window of `len` vertices ending at its tail, so paths made
/// by slicing or truncating share every vertex with the path they came from.
#[derive(Clone)]
pub struct Path {
    light_tail: Arc<PathVertex>,
    eye_tail: Arc<PathVertex>,
    s: usize,
    t: usize,
}

impl Path {
    /// Joins two subpaths at their open ends.
    ///
    /// Fails if `light_tail` isn't on a light subpath or `eye_tail` on an eye
    /// subpath.
    pub fn join(light_tail: Arc<PathVertex>, eye_tail: Arc<PathVertex>) -> Result<Self> {
        if light_tail.side() != Side::Light || eye_tail.side() != Side::Eye {
            return Err(Error::InvalidJoin {
                light: light_tail.side(),
                eye: eye_tail.side(),
            });
        }

        let s = light_tail.depth() as usize + 1;
        let t = eye_tail.depth() as usize + 1;
        Ok(Self {
            light_tail,
            eye_tail,
            s,
            t,
        })
    }

    /// Number of light subpath vertices.
    pub fn light_length(&self) -> usize {
        self.s
    }

    /// Number of eye subpath vertices.
    pub fn eye_length(&self) -> usize {
        self.t
    }

    pub fn total_vertex_count(&self) -> usize {
        self.s + self.t
    }

    /// The open end of the light subpath.
    pub fn light_tail(&self) -> &Arc<PathVertex> {
        &self.light_tail
    }

    /// The open end of the eye subpath.
    pub fn eye_tail(&self) -> &Arc<PathVertex> {
        &self.eye_tail
    }

    /// Returns `true` if both windows reach their terminals.
    pub fn is_complete(&self) -> bool {
        self.light_tail.depth() as usize + 1 == self.s && self.eye_tail.depth() as usize + 1 == self.t
    }

    /// Returns the path's vertices ordered from the light end to the eye end.
    pub fn vertices(&self) -> Vec<Arc<PathVertex>> {
        let mut vertices = Vec::with_capacity(self.s + self.t);
        collect_window(&self.light_tail, self.s, &mut vertices);
        vertices.reverse();
        collect_window(&self.eye_tail, self.t, &mut vertices);
        vertices
    }

    /// Returns the vertices in `[from, to)` of [`Path::vertices`] as a path.
    ///
    /// Both sides have to keep at least one vertex.
    pub fn slice(&self, from: usize, to: usize) -> Result<Path> {
        let len = self.total_vertex_count();
        if from >= self.s || to <= self.s || to > len {
            return Err(Error::InvalidSlice { from, to, len });
        }
        Ok(Self {
            light_tail: self.light_tail.clone(),
            eye_tail: self.eye_tail.clone(),
            s: self.s - from,
            t: to - self.s,
        })
    }

    /// Removes `k` vertices from the open end of the light subpath.
    pub fn truncate_light(&self, k: usize) -> Result<Path> {
        if k >= self.s {
            return Err(Error::InvalidTruncation {
                removed: k,
                length: self.s,
            });
        }
        let light_tail = self
            .light_tail
            .ancestor(k)
            .ok_or(Error::InvalidTruncation {
                removed: k,
                length: self.s,
            })?;
        Ok(Self {
            light_tail,
            eye_tail: self.eye_tail.clone(),
            s: self.s - k,
            t: self.t,
        })
    }

    /// Removes `k` vertices from the open end of the eye subpath.
    pub fn truncate_eye(&self, k: usize) -> Result<Path> {
        if k >= self.t {
            return Err(Error::InvalidTruncation {
                removed: k,
                length: self.t,
            });
        }
        let eye_tail = self.eye_tail.ancestor(k).ok_or(Error::InvalidTruncation {
            removed: k,
            length: self.t,
        })?;
        Ok(Self {
            light_tail: self.light_tail.clone(),
            eye_tail,
            s: self.s,
            t: self.t - k,
        })
    }

    /// Returns the path with the side's open end replaced by `tail`, which
    /// has to continue the side's window.
    pub(crate) fn with_tail(&self, side: Side, tail: Arc<PathVertex>, len: usize) -> Path {
        match side {
            Side::Light => Self {
                light_tail: tail,
                eye_tail: self.eye_tail.clone(),
                s: len,
                t: self.t,
            },
            Side::Eye => Self {
                light_tail: self.light_tail.clone(),
                eye_tail: tail,
                s: self.s,
                t: len,
            },
        }
    }

    pub fn side_tail(&self, side: Side) -> &Arc<PathVertex> {
        match side {
            Side::Light => &self.light_tail,
            Side::Eye => &self.eye_tail,
        }
    }

    pub fn side_length(&self, side: Side) -> usize {
        match side {
            Side::Light => self.s,
            Side::Eye => self.t,
        }
    }
}

/// Pushes `tail` and its `len - 1` closest ancestors, tail first.
fn collect_window(tail: &Arc<PathVertex>, len: usize, out: &mut Vec<Arc<PathVertex>>) {
    let mut v = Some(tail);
    for _ in 0..len {
        match v {
            Some(vertex) => {
                out.push(vertex.clone());
                v = vertex.parent();
            }
            None => break,
        }
    }
}

impl std::fmt::Debug for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Path")
            .field("s", &self.s)
            .field("t", &self.t)
            .field("vertices", &self.vertices())
            .finish()
    }
}
