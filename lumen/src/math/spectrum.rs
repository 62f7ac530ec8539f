use approx::{AbsDiffEq, RelativeEq};
use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Sub};

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Color_and_Radiometry/Spectral_Representation

/// A spectral power distribution stored as RGB
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Spectrum {
    /// The r component of the spd
    pub r: f64,
    /// The g component of the spd
    pub g: f64,
    /// The b component of the spd
    pub b: f64,
}

impl Spectrum {
    #[inline]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn zeros() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    #[inline]
    pub const fn ones() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    #[inline]
    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    #[inline]
    pub fn has_negatives(&self) -> bool {
        self.r < 0.0 || self.g < 0.0 || self.b < 0.0
    }

    #[inline]
    pub fn max_comp(&self) -> f64 {
        self.r.max(self.g.max(self.b))
    }

    #[inline]
    pub fn sum(&self) -> f64 {
        self.r + self.g + self.b
    }

    /// Divides component-wise, treating division by zero as zero.
    #[inline]
    pub fn safe_div(self, other: Spectrum) -> Self {
        let div = |a: f64, b: f64| if b == 0.0 { 0.0 } else { a / b };
        Self::new(div(self.r, other.r), div(self.g, other.g), div(self.b, other.b))
    }

    /// Replaces non-finite components with zero.
    #[inline]
    pub fn finite_or_zero(self) -> Self {
        if self.is_finite() {
            self
        } else {
            Self::zeros()
        }
    }
}

impl Index<usize> for Spectrum {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        match i {
            0 => &self.r,
            1 => &self.g,
            2 => &self.b,
            _ => panic!("Spectrum index {} out of bounds", i),
        }
    }
}

macro_rules! impl_spectrum_op {
    ( $op:ident, $f:ident, $assign_op:ident, $assign_f:ident, $sym:tt ) => {
        impl $op<Spectrum> for Spectrum {
            type Output = Spectrum;

            #[inline]
            fn $f(self, other: Spectrum) -> Spectrum {
                Spectrum::new(self.r $sym other.r, self.g $sym other.g, self.b $sym other.b)
            }
        }

        impl $op<f64> for Spectrum {
            type Output = Spectrum;

            #[inline]
            fn $f(self, s: f64) -> Spectrum {
                Spectrum::new(self.r $sym s, self.g $sym s, self.b $sym s)
            }
        }

        impl $assign_op<Spectrum> for Spectrum {
            #[inline]
            fn $assign_f(&mut self, other: Spectrum) {
                *self = *self $sym other;
            }
        }

        impl $assign_op<f64> for Spectrum {
            #[inline]
            fn $assign_f(&mut self, s: f64) {
                *self = *self $sym s;
            }
        }
    };
}
impl_spectrum_op!(Add, add, AddAssign, add_assign, +);
impl_spectrum_op!(Mul, mul, MulAssign, mul_assign, *);
impl_spectrum_op!(Div, div, DivAssign, div_assign, /);

impl Sub<Spectrum> for Spectrum {
    type Output = Spectrum;

    #[inline]
    fn sub(self, other: Spectrum) -> Spectrum {
        Spectrum::new(self.r - other.r, self.g - other.g, self.b - other.b)
    }
}

impl Mul<Spectrum> for f64 {
    type Output = Spectrum;

    #[inline]
    fn mul(self, s: Spectrum) -> Spectrum {
        s * self
    }
}

impl AbsDiffEq for Spectrum {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.r.abs_diff_eq(&other.r, epsilon)
            && self.g.abs_diff_eq(&other.g, epsilon)
            && self.b.abs_diff_eq(&other.b, epsilon)
    }
}

impl RelativeEq for Spectrum {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.r.relative_eq(&other.r, epsilon, max_relative)
            && self.g.relative_eq(&other.g, epsilon, max_relative)
            && self.b.relative_eq(&other.b, epsilon, max_relative)
    }
}
