use super::{Point3, Vec3};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Rays.html

/// Offset used to keep spawned rays from re-hitting their origin surface.
pub const RAY_EPSILON: f64 = 1e-9;

/// A ray with an origin, a unit direction and a valid parametric range.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    /// The origin of the ray.
    pub o: Point3,
    /// The direction of the ray.
    pub d: Vec3,
    /// Hits closer than this are ignored.
    pub t_min: f64,
    /// Hits further than this are ignored.
    pub t_max: f64,
}

impl Ray {
    /// Creates a new `Ray` from `o` toward `d` with an open far end.
    pub fn new(o: Point3, d: Vec3) -> Self {
        debug_assert!(!d.has_nans());

        Self {
            o,
            d,
            t_min: RAY_EPSILON,
            t_max: f64::INFINITY,
        }
    }

    /// Creates a `Ray` spanning the open segment between `p0` and `p1`.
    ///
    /// Returns `None` if the points coincide.
    pub fn segment(p0: Point3, p1: Point3) -> Option<Self> {
        let v = p1 - p0;
        let dist = v.len();
        if !(dist > 0.0) || !dist.is_finite() {
            return None;
        }
        Some(Self {
            o: p0,
            d: v / dist,
            t_min: RAY_EPSILON * dist.max(1.0),
            t_max: dist * (1.0 - RAY_EPSILON),
        })
    }

    /// Finds the point at distance `t` along the ray.
    #[inline]
    pub fn point(&self, t: f64) -> Point3 {
        self.o + self.d * t
    }
}
