mod frame;
mod ray;
mod spectrum;
mod vector;

pub use frame::Frame;
pub use ray::{Ray, RAY_EPSILON};
pub use spectrum::Spectrum;
pub use vector::{Point2, Point3, Vec3};

/// Converts a solid angle density at the origin of a segment into an area
/// density at its end point.
///
/// `cos_end` is the cosine at the receiving point and `dist_sqr` the squared
/// segment length. Degenerate segments have zero density.
#[inline]
pub fn solid_angle_to_area(pdf: f64, cos_end: f64, dist_sqr: f64) -> f64 {
    if pdf == 0.0 || !(dist_sqr > 0.0) || !dist_sqr.is_finite() {
        return 0.0;
    }
    pdf * cos_end.abs() / dist_sqr
}
