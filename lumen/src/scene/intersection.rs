use crate::{
    materials::Material,
    math::{Point3, Vec3},
};

use std::sync::Arc;

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Interactions#SurfaceInteraction

/// Info for a point on a surface
#[derive(Clone)]
pub struct Intersection {
    /// World position
    pub p: Point3,
    /// Geometric normal, the side the surface was defined to face
    pub n: Vec3,
    /// Shading normal
    pub ns: Vec3,
    /// Distance along the ray
    pub t: f64,
    /// `true` if the ray arrived on the side `n` points to
    pub front: bool,
    /// Index of the shape in its [`GeometryList`](super::GeometryList)
    pub shape_id: usize,
    pub material: Arc<dyn Material>,
}

impl std::fmt::Debug for Intersection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Intersection")
            .field("p", &self.p)
            .field("n", &self.n)
            .field("t", &self.t)
            .field("front", &self.front)
            .field("shape_id", &self.shape_id)
            .finish()
    }
}
