use approx::{AbsDiffEq, RelativeEq};
use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Neg, Sub, SubAssign};

// Based on Physically Based Rendering 3rd ed.
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Vectors.html
// http://www.pbr-book.org/3ed-2018/Geometry_and_Transformations/Points.html

/// A three-dimensional vector.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3 {
    /// The x component of the vector.
    pub x: f64,
    /// The y component of the vector.
    pub y: f64,
    /// The z component of the vector.
    pub z: f64,
}

/// A two-dimensional point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point2 {
    /// The x component of the point.
    pub x: f64,
    /// The y component of the point.
    pub y: f64,
}

/// A three-dimensional point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point3 {
    /// The x component of the point.
    pub x: f64,
    /// The y component of the point.
    pub y: f64,
    /// The z component of the point.
    pub z: f64,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn zeros() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Calculates the dot product of this `Vec3` and another `Vec3`.
    #[inline]
    pub fn dot(&self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Calculates the cross product of this `Vec3` and another `Vec3`.
    #[inline]
    pub fn cross(&self, other: Self) -> Self {
        Self {
            x: (self.y * other.z) - (self.z * other.y),
            y: (self.z * other.x) - (self.x * other.z),
            z: (self.x * other.y) - (self.y * other.x),
        }
    }

    #[inline]
    pub fn len_sqr(&self) -> f64 {
        self.dot(*self)
    }

    #[inline]
    pub fn len(&self) -> f64 {
        self.len_sqr().sqrt()
    }

    /// Returns the unit vector in the direction of this `Vec3`.
    ///
    /// Zero-length and non-finite vectors return `None`.
    #[inline]
    pub fn try_normalized(&self) -> Option<Self> {
        let len = self.len();
        if len > 0.0 && len.is_finite() {
            Some(*self / len)
        } else {
            None
        }
    }

    /// Returns the unit vector in the direction of this `Vec3`.
    ///
    /// Degenerate vectors normalize to zero.
    #[inline]
    pub fn normalized(&self) -> Self {
        self.try_normalized().unwrap_or_else(Self::zeros)
    }

    #[inline]
    pub fn abs(&self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    #[inline]
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Flips this `Vec3` to point to the same hemisphere as `v`.
    #[inline]
    pub fn faceforward(&self, v: Self) -> Self {
        if self.dot(v) < 0.0 {
            -*self
        } else {
            *self
        }
    }
}

impl Point2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Point3 {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn zeros() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    #[inline]
    pub fn dist_sqr(&self, other: Self) -> f64 {
        (*self - other).len_sqr()
    }

    #[inline]
    pub fn dist(&self, other: Self) -> f64 {
        (*self - other).len()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<Point3> for Vec3 {
    fn from(p: Point3) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

impl From<Vec3> for Point3 {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl Index<usize> for Vec3 {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vec3 index {} out of bounds", i),
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

macro_rules! impl_componentwise_op {
    ( $lhs:ty, $rhs:ty, $out:ty, $op:ident, $f:ident, $sym:tt ) => {
        impl $op<$rhs> for $lhs {
            type Output = $out;

            #[inline]
            fn $f(self, other: $rhs) -> $out {
                <$out>::new(self.x $sym other.x, self.y $sym other.y, self.z $sym other.z)
            }
        }
    };
}
impl_componentwise_op!(Vec3, Vec3, Vec3, Add, add, +);
impl_componentwise_op!(Vec3, Vec3, Vec3, Sub, sub, -);
impl_componentwise_op!(Point3, Vec3, Point3, Add, add, +);
impl_componentwise_op!(Point3, Vec3, Point3, Sub, sub, -);
impl_componentwise_op!(Point3, Point3, Vec3, Sub, sub, -);

macro_rules! impl_componentwise_assign_op {
    ( $lhs:ty, $op:ident, $f:ident, $sym:tt ) => {
        impl $op<Vec3> for $lhs {
            #[inline]
            fn $f(&mut self, other: Vec3) {
                self.x $sym other.x;
                self.y $sym other.y;
                self.z $sym other.z;
            }
        }
    };
}
impl_componentwise_assign_op!(Vec3, AddAssign, add_assign, +=);
impl_componentwise_assign_op!(Vec3, SubAssign, sub_assign, -=);
impl_componentwise_assign_op!(Point3, AddAssign, add_assign, +=);

impl Mul<f64> for Vec3 {
    type Output = Self;

    #[inline]
    fn mul(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;

    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}

impl MulAssign<f64> for Vec3 {
    #[inline]
    fn mul_assign(&mut self, s: f64) {
        *self = *self * s;
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;

    #[inline]
    fn div(self, s: f64) -> Self {
        let inv = 1.0 / s;
        Self::new(self.x * inv, self.y * inv, self.z * inv)
    }
}

impl DivAssign<f64> for Vec3 {
    #[inline]
    fn div_assign(&mut self, s: f64) {
        *self = *self / s;
    }
}

impl Add<Point2> for Point2 {
    type Output = Self;

    #[inline]
    fn add(self, other: Point2) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

macro_rules! impl_approx {
    ( $t:ty, $( $c:ident ),+ ) => {
        impl AbsDiffEq for $t {
            type Epsilon = f64;

            fn default_epsilon() -> f64 {
                f64::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
                $( self.$c.abs_diff_eq(&other.$c, epsilon) )&&+
            }
        }

        impl RelativeEq for $t {
            fn default_max_relative() -> f64 {
                f64::default_max_relative()
            }

            fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
                $( self.$c.relative_eq(&other.$c, epsilon, max_relative) )&&+
            }
        }
    };
}
impl_approx!(Vec3, x, y, z);
impl_approx!(Point3, x, y, z);
impl_approx!(Point2, x, y);
