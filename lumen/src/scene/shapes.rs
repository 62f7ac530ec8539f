use crate::math::{Point2, Point3, Ray, Vec3};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Shapes/Basic_Shape_Interface.html#Shape

/// Geometric part of a ray-shape hit.
#[derive(Copy, Clone, Debug)]
pub struct ShapeHit {
    pub t: f64,
    pub p: Point3,
    pub n: Vec3,
}

pub trait Shape: Send + Sync {
    /// Intersects [`Ray`] with this object.
    fn intersect(&self, ray: &Ray) -> Option<ShapeHit>;
    /// Returns the surface area of this object.
    fn area(&self) -> f64;
    /// Samples a point uniformly by area. Returns the point and its normal.
    fn sample(&self, u: Point2) -> (Point3, Vec3);
}

/// A sphere object.
pub struct Sphere {
    center: Point3,
    radius: f64,
}

impl Sphere {
    /// Creates a new `Sphere`.
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl Shape for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<ShapeHit> {
        let o = ray.o - self.center;
        let d = ray.d;

        // Quadratic coefficients
        let a = d.len_sqr();
        let b = 2.0 * d.dot(o);
        let c = o.len_sqr() - self.radius * self.radius;

        // Solve quadratic equation for ts
        let discrim = b * b - 4.0 * a * c;
        if discrim < 0.0 || a == 0.0 {
            return None;
        }
        let rd = discrim.sqrt();

        let q = if b < 0.0 {
            -0.5 * (b - rd)
        } else {
            -0.5 * (b + rd)
        };
        if q == 0.0 {
            return None;
        }

        // Find hit points
        let mut t0 = q / a;
        let mut t1 = c / q;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        let t = if t0 > ray.t_min {
            t0
        } else if t1 > ray.t_min {
            t1
        } else {
            return None;
        };
        if t >= ray.t_max {
            return None;
        }

        let p = ray.point(t);
        let n = (p - self.center).normalized();
        Some(ShapeHit { t, p, n })
    }

    fn area(&self) -> f64 {
        4.0 * std::f64::consts::PI * self.radius * self.radius
    }

    fn sample(&self, u: Point2) -> (Point3, Vec3) {
        let n = crate::sampling::uniform_sample_sphere(u);
        (self.center + n * self.radius, n)
    }
}

/// A parallelogram spanned by `edge0` and `edge1` from `corner`.
///
/// The normal is `edge0 x edge1`.
pub struct Quad {
    corner: Point3,
    edge0: Vec3,
    edge1: Vec3,
    n: Vec3,
    area: f64,
}

impl Quad {
    pub fn new(corner: Point3, edge0: Vec3, edge1: Vec3) -> Self {
        let c = edge0.cross(edge1);
        Self {
            corner,
            edge0,
            edge1,
            n: c.normalized(),
            area: c.len(),
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.n
    }
}

impl Shape for Quad {
    fn intersect(&self, ray: &Ray) -> Option<ShapeHit> {
        let denom = ray.d.dot(self.n);
        if denom == 0.0 || self.area == 0.0 {
            return None;
        }
        let t = (self.corner - ray.o).dot(self.n) / denom;
        if !(t > ray.t_min && t < ray.t_max) {
            return None;
        }

        let p = ray.point(t);
        // Solve p = corner + u * edge0 + v * edge1 in the plane
        let rel = p - self.corner;
        let c = self.edge0.cross(self.edge1);
        let inv = 1.0 / c.len_sqr();
        let u = rel.cross(self.edge1).dot(c) * inv;
        let v = self.edge0.cross(rel).dot(c) * inv;
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return None;
        }

        Some(ShapeHit { t, p, n: self.n })
    }

    fn area(&self) -> f64 {
        self.area
    }

    fn sample(&self, u: Point2) -> (Point3, Vec3) {
        (self.corner + self.edge0 * u.x + self.edge1 * u.y, self.n)
    }
}
