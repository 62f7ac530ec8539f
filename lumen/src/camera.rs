use crate::math::{Point2, Point3, Vec3};

use serde::{Deserialize, Serialize};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Camera_Models.html
// https://pbr-book.org/3ed-2018/Light_Transport_III_Bidirectional_Methods/The_Path-Space_Measurement_Equation#SamplingCameras

/// The sensing end of eye subpaths.
///
/// Pixel samples are in raster space: `[0, width) x [0, height)` with y down.
pub trait Lens: Send + Sync {
    /// Returns the position rays start from.
    fn position(&self) -> Point3;
    /// Returns the primary ray direction through `pixel`.
    fn direction(&self, pixel: Point2) -> Option<Vec3>;
    /// Returns the solid angle density of generating `dir` with a uniformly
    /// sampled raster position of unit pixel area.
    fn pdf_direction(&self, dir: Vec3) -> f64;
    /// Returns the directional importance toward `dir`.
    fn importance(&self, dir: Vec3) -> f64;
    /// Returns the cosine between `dir` and the viewing axis, clamped to zero.
    fn cosine(&self, dir: Vec3) -> f64;
    /// Projects `dir` back to its raster position.
    fn raster_position(&self, dir: Vec3) -> Option<Point2>;
    /// Returns the raster resolution.
    fn resolution(&self) -> (u16, u16);
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
pub struct CameraParameters {
    pub position: Point3Def,
    pub target: Point3Def,
    pub up: Point3Def,
    /// Horizontal field of view in degrees
    pub fov: f64,
}

/// Serializable mirror of [`Point3`] used in settings.
#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
pub struct Point3Def(pub f64, pub f64, pub f64);

impl From<Point3Def> for Point3 {
    fn from(p: Point3Def) -> Self {
        Point3::new(p.0, p.1, p.2)
    }
}

impl From<Point3Def> for Vec3 {
    fn from(p: Point3Def) -> Self {
        Vec3::new(p.0, p.1, p.2)
    }
}

impl Default for CameraParameters {
    fn default() -> Self {
        Self {
            position: Point3Def(0.0, 0.0, 0.0),
            target: Point3Def(0.0, 0.0, -1.0),
            up: Point3Def(0.0, 1.0, 0.0),
            fov: 60.0,
        }
    }
}

/// A simple pinhole camera
///
/// Importance is normalized so that `importance * cos / pdf == 1` for every
/// direction inside the frustum, which makes eye subpath weights start at one.
#[derive(Clone, Debug)]
pub struct PinholeLens {
    position: Point3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
    tan_x: f64,
    tan_y: f64,
    resolution: (u16, u16),
}

impl PinholeLens {
    /// Creates a new `PinholeLens`. Returns `None` for degenerate orientations.
    pub fn new(params: CameraParameters, resolution: (u16, u16)) -> Option<Self> {
        let position = Point3::from(params.position);
        let forward = (Point3::from(params.target) - position).try_normalized()?;
        let right = forward.cross(Vec3::from(params.up)).try_normalized()?;
        let up = right.cross(forward);
        let tan_x = (params.fov.to_radians() / 2.0).tan();
        if !(tan_x > 0.0) || !tan_x.is_finite() || resolution.0 == 0 || resolution.1 == 0 {
            return None;
        }
        let tan_y = tan_x * (resolution.1 as f64) / (resolution.0 as f64);

        Some(Self {
            position,
            right,
            up,
            forward,
            tan_x,
            tan_y,
            resolution,
        })
    }

    /// Area of the image plane at unit distance, scaled to unit pixel area.
    fn plane_area(&self) -> f64 {
        4.0 * self.tan_x * self.tan_y / ((self.resolution.0 as f64) * (self.resolution.1 as f64))
    }
}

impl Lens for PinholeLens {
    fn position(&self) -> Point3 {
        self.position
    }

    fn direction(&self, pixel: Point2) -> Option<Vec3> {
        let (w, h) = (self.resolution.0 as f64, self.resolution.1 as f64);
        if !(0.0..=w).contains(&pixel.x) || !(0.0..=h).contains(&pixel.y) {
            return None;
        }
        let sx = (2.0 * pixel.x / w - 1.0) * self.tan_x;
        let sy = (1.0 - 2.0 * pixel.y / h) * self.tan_y;
        (self.forward + self.right * sx + self.up * sy).try_normalized()
    }

    fn pdf_direction(&self, dir: Vec3) -> f64 {
        let cos = self.cosine(dir);
        if cos <= 0.0 || self.raster_position(dir).is_none() {
            return 0.0;
        }
        1.0 / (self.plane_area() * cos * cos * cos)
    }

    fn importance(&self, dir: Vec3) -> f64 {
        let cos = self.cosine(dir);
        if cos <= 0.0 {
            return 0.0;
        }
        self.pdf_direction(dir) / cos
    }

    fn cosine(&self, dir: Vec3) -> f64 {
        dir.normalized().dot(self.forward).max(0.0)
    }

    fn raster_position(&self, dir: Vec3) -> Option<Point2> {
        let dir = dir.try_normalized()?;
        let cos = dir.dot(self.forward);
        if cos <= 0.0 {
            return None;
        }
        let p = dir / cos;
        let sx = p.dot(self.right) / self.tan_x;
        let sy = p.dot(self.up) / self.tan_y;
        if sx.abs() > 1.0 || sy.abs() > 1.0 {
            return None;
        }
        let (w, h) = (self.resolution.0 as f64, self.resolution.1 as f64);
        Some(Point2::new((sx + 1.0) * 0.5 * w, (1.0 - sy) * 0.5 * h))
    }

    fn resolution(&self) -> (u16, u16) {
        self.resolution
    }
}
