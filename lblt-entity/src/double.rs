use crate::RealField;

/// Double-double extended precision real number.
///
/// The value is the unevaluated sum `self.0 + self.1`, with `|self.1| <= ulp(self.0) / 2`.
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct DoubleF64(pub f64, pub f64);

#[inline(always)]
fn quick_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let err = b - (s - a);
    (s, err)
}

#[inline(always)]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;

    // (a - (s - bb)) + (b - bb)
    let err = (a - (s - bb)) + (b - bb);
    (s, err)
}

#[inline(always)]
fn two_diff(a: f64, b: f64) -> (f64, f64) {
    let s = a - b;
    let bb = s - a;

    // (a - (s - bb)) - (b + bb)
    let err = (a - (s - bb)) - (b + bb);
    (s, err)
}

#[inline(always)]
fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let err = f64::mul_add(a, b, -p);
    (p, err)
}

impl DoubleF64 {
    /// 2.0^{-100}
    pub const EPSILON: Self = Self(7.888609052210118e-31, 0.0);
    /// 2.0^{-970}: precision below this value begins to degrade.
    pub const MIN_POSITIVE: Self = Self(1.0020841800044864e-292, 0.0);

    pub const ZERO: Self = Self(0.0, 0.0);
    pub const ONE: Self = Self(1.0, 0.0);
    pub const NAN: Self = Self(f64::NAN, f64::NAN);
    pub const INFINITY: Self = Self(f64::INFINITY, f64::INFINITY);
    pub const NEG_INFINITY: Self = Self(f64::NEG_INFINITY, f64::NEG_INFINITY);

    /// Rounds `self` to the nearest `f64`.
    #[inline(always)]
    pub fn to_f64(self) -> f64 {
        self.0 + self.1
    }

    #[inline(always)]
    fn mul_f64(self, rhs: f64) -> Self {
        let (p1, p2) = two_prod(self.0, rhs);
        let p2 = p2 + self.1 * rhs;
        let (p1, p2) = quick_two_sum(p1, p2);
        Self(p1, p2)
    }

    #[inline]
    pub fn abs(self) -> Self {
        if self.0 < 0.0 {
            -self
        } else {
            self
        }
    }

    #[inline]
    pub fn sqrt(self) -> Self {
        if self.0 == 0.0 {
            Self::ZERO
        } else if self.0 < 0.0 {
            Self::NAN
        } else if self.0 == f64::INFINITY {
            Self::INFINITY
        } else {
            // one newton step on the reciprocal square root
            let a = self;
            let x = a.0.sqrt().recip();
            let ax = Self(a.0 * x, 0.0);

            ax + (a - ax * ax).mul_f64(x * 0.5)
        }
    }
}

impl From<f64> for DoubleF64 {
    #[inline(always)]
    fn from(value: f64) -> Self {
        Self(value, 0.0)
    }
}

impl core::ops::Add for DoubleF64 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        let (s, e) = two_sum(self.0, rhs.0);
        let e = e + (self.1 + rhs.1);
        let (s, e) = quick_two_sum(s, e);
        Self(s, e)
    }
}

impl core::ops::Sub for DoubleF64 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        let (s, e) = two_diff(self.0, rhs.0);
        let e = e + self.1;
        let e = e - rhs.1;
        let (s, e) = quick_two_sum(s, e);
        Self(s, e)
    }
}

impl core::ops::Mul for DoubleF64 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        let (p1, p2) = two_prod(self.0, rhs.0);
        let p2 = p2 + (self.0 * rhs.1 + self.1 * rhs.0);
        let (p1, p2) = quick_two_sum(p1, p2);
        Self(p1, p2)
    }
}

impl core::ops::Div for DoubleF64 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self::Output {
        let a_is_zero = self == Self::ZERO;
        let b_is_zero = rhs == Self::ZERO;
        let a_is_infty = self.0.abs() == f64::INFINITY;
        let b_is_infty = rhs.0.abs() == f64::INFINITY;
        let negative = self.0.is_sign_negative() != rhs.0.is_sign_negative();

        if b_is_zero && !a_is_zero {
            let inf = if negative {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            };
            return Self(inf, inf);
        }
        if b_is_infty && !a_is_infty {
            let zero = if negative { -0.0 } else { 0.0 };
            return Self(zero, zero);
        }

        let q1 = self.0 / rhs.0;
        let r = rhs.mul_f64(q1);

        let (s1, s2) = two_diff(self.0, r.0);
        let s2 = s2 - r.1;
        let s2 = s2 + self.1;

        let q2 = (s1 + s2) / rhs.0;
        let (q1, q2) = quick_two_sum(q1, q2);
        Self(q1, q2)
    }
}

impl core::ops::AddAssign for DoubleF64 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl core::ops::SubAssign for DoubleF64 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl core::ops::MulAssign for DoubleF64 {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl core::ops::DivAssign for DoubleF64 {
    #[inline(always)]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl core::ops::Neg for DoubleF64 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Self(-self.0, -self.1)
    }
}

impl RealField for DoubleF64 {
    #[inline(always)]
    fn lblt_from_f64(value: f64) -> Self {
        Self(value, 0.0)
    }

    #[inline(always)]
    fn lblt_zero() -> Self {
        Self::ZERO
    }

    #[inline(always)]
    fn lblt_one() -> Self {
        Self::ONE
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
        Self::EPSILON
    }

    #[inline(always)]
    fn lblt_is_finite(&self) -> bool {
        self.0.is_finite()
    }
}
