use crate::{
    math::{Point3, Ray},
    scene::Scene,
};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Light_Sources/Light_Interface#VisibilityTesting

/// Tests the open segment between two finite path vertices for occluders.
pub struct VisibilityTester {
    p0: Point3,
    p1: Point3,
}

impl VisibilityTester {
    pub fn new(p0: Point3, p1: Point3) -> Self {
        Self { p0, p1 }
    }

    /// Returns the ray spanning the segment, `None` if the points coincide.
    pub fn ray(&self) -> Option<Ray> {
        Ray::segment(self.p0, self.p1)
    }

    /// Coincident points count as occluded since no connection exists between them.
    pub fn unoccluded(&self, scene: &Scene) -> bool {
        match self.ray() {
            Some(ray) => scene.geometry.nearest_intersection(&ray).is_none(),
            None => false,
        }
    }
}
