//! 26.6 fixed point for pen positions
//!
//! Glyph advances, offsets and the running pen all live on a 1/64 pixel
//! grid until the final metrics are reported. Keeping them as integers
//! means repeated measurement of the same string is bit-identical.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A pixel value with six fractional bits
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct F26Dot6(i32);

impl F26Dot6 {
    pub const FRAC_BITS: u32 = 6;
    pub const FRAC_MASK: i32 = (1 << Self::FRAC_BITS) - 1;
    pub const ONE: F26Dot6 = F26Dot6(1 << Self::FRAC_BITS);
    pub const ZERO: F26Dot6 = F26Dot6(0);

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        F26Dot6(raw)
    }

    #[inline]
    pub const fn from_int(x: i32) -> Self {
        F26Dot6(x << Self::FRAC_BITS)
    }

    /// Truncates toward zero like a C cast of `64.0 * x`
    #[inline]
    pub fn from_f64(x: f64) -> Self {
        F26Dot6((x * 64.0) as i32)
    }

    /// Rounds to the nearest 1/64
    #[inline]
    pub fn from_f64_round(x: f64) -> Self {
        F26Dot6((x * 64.0).round() as i32)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 64.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn floor(self) -> F26Dot6 {
        F26Dot6(self.0 & !Self::FRAC_MASK)
    }

    #[inline]
    pub const fn ceil(self) -> F26Dot6 {
        F26Dot6((self.0 + Self::FRAC_MASK) & !Self::FRAC_MASK)
    }

    #[inline]
    pub fn max(self, other: F26Dot6) -> F26Dot6 {
        if other.0 > self.0 {
            other
        } else {
            self
        }
    }
}

impl Add for F26Dot6 {
    type Output = F26Dot6;

    #[inline]
    fn add(self, rhs: F26Dot6) -> F26Dot6 {
        F26Dot6(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for F26Dot6 {
    #[inline]
    fn add_assign(&mut self, rhs: F26Dot6) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}

impl Sub for F26Dot6 {
    type Output = F26Dot6;

    #[inline]
    fn sub(self, rhs: F26Dot6) -> F26Dot6 {
        F26Dot6(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for F26Dot6 {
    #[inline]
    fn sub_assign(&mut self, rhs: F26Dot6) {
        self.0 = self.0.wrapping_sub(rhs.0);
    }
}

impl Neg for F26Dot6 {
    type Output = F26Dot6;

    #[inline]
    fn neg(self) -> F26Dot6 {
        F26Dot6(-self.0)
    }
}
