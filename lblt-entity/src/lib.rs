use bytemuck::Pod;
use core::{
    fmt::Debug,
    ops::{Add, Div, Mul, Neg, Sub},
};

mod double;
pub use double::DoubleF64;

/// Unstable trait containing the operations that a real number type needs to implement.
///
/// Arithmetic goes through the `core::ops` traits. The remaining operations carry the `lblt_`
/// prefix so that they never collide with the inherent methods of the primitive float types.
pub trait RealField:
    Copy
    + Debug
    + PartialOrd
    + Send
    + Sync
    + Pod
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Converts `value` from `f64` to `Self`.  
    /// The conversion may be lossy when converting to a type with less precision.
    fn lblt_from_f64(value: f64) -> Self;

    /// Returns `0.0`.
    fn lblt_zero() -> Self;
    /// Returns `1.0`.
    fn lblt_one() -> Self;

    /// Returns the absolute value of `self`.
    fn lblt_abs(self) -> Self;
    /// Returns the square root of `self`.
    fn lblt_sqrt(self) -> Self;
    /// Returns `1.0/self`.
    #[inline(always)]
    fn lblt_inv(self) -> Self {
        Self::lblt_one() / self
    }

    /// Returns the machine epsilon of the type.
    fn lblt_epsilon() -> Self;

    /// Returns true if `self` is a NaN value, or false otherwise.
    #[inline(always)]
    fn lblt_is_nan(&self) -> bool {
        #[allow(clippy::eq_op)]
        {
            self != self
        }
    }

    /// Returns true if `self` is neither infinite nor NaN.
    #[inline(always)]
    fn lblt_is_finite(&self) -> bool {
        let inf = Self::lblt_zero().lblt_inv();
        self.lblt_abs() < inf
    }

    /// Returns the larger of `self` and `other`, or `self` if they compare equal or either is NaN.
    #[inline(always)]
    fn lblt_max(self, other: Self) -> Self {
        if other > self {
            other
        } else {
            self
        }
    }
}

impl RealField for f32 {
    #[inline(always)]
    fn lblt_from_f64(value: f64) -> Self {
        value as _
    }

    #[inline(always)]
    fn lblt_zero() -> Self {
        0.0
    }

    #[inline(always)]
    fn lblt_one() -> Self {
        1.0
    }

    #[inline(always)]
    fn lblt_abs(self) -> Self {
        self.abs()
    }

    #[inline(always)]
    fn lblt_sqrt(self) -> Self {
        self.sqrt()
    }

    #[inline(always)]
    fn lblt_epsilon() -> Self {
        f32::EPSILON
    }
}

impl RealField for f64 {
    #[inline(always)]
    fn lblt_from_f64(value: f64) -> Self {
        value
    }

    #[inline(always)]
    fn lblt_zero() -> Self {
        0.0
    }

    #[inline(always)]
    fn lblt_one() -> Self {
        1.0
    }

    #[inline(always)]
    fn lblt_abs(self) -> Self {
        self.abs()
    }

    #[inline(always)]
    fn lblt_sqrt(self) -> Self {
        self.sqrt()
    }

    #[inline(always)]
    fn lblt_epsilon() -> Self {
        f64::EPSILON
    }
}
