use core::fmt;

#[cfg(feature = "arbitrary-precision")]
use num_bigint::BigUint;
#[cfg(feature = "arbitrary-precision")]
use num_traits::{FromPrimitive, One, ToPrimitive, Zero};

/// An unsigned integer that can carry a decimal coefficient.
///
/// The arithmetic kernel is generic over this trait so that the
/// working representation can be chosen from the configured
/// precision: `u64` up to 9 digits, `u128` up to 19 digits, and
/// `BigUint` beyond that. The cutoffs guarantee that the product of
/// two full-precision coefficients still fits the fixed backends.
///
/// The kernel never divides a coefficient by zero.
pub trait Coeff: Clone + Ord + fmt::Debug {
    /// The number of decimal digits guaranteed to fit, or
    /// `u32::MAX` when the backend grows on demand.
    const CAPACITY: u32;

    /// Returns the value zero.
    fn zero() -> Self;

    /// Returns the value one.
    fn one() -> Self;

    /// Reports whether the value is zero.
    fn is_zero(&self) -> bool;

    /// Reports whether the value is odd.
    fn is_odd(&self) -> bool;

    /// Converts from a native integer. This cannot fail: every
    /// backend holds at least 19 digits.
    fn from_u64(v: u64) -> Self;

    /// Converts from a non-negative `f64` with a zero fractional
    /// part, or returns `None` if the value does not fit.
    fn from_f64_integral(v: f64) -> Option<Self>;

    /// Converts to the nearest `f64`.
    fn to_f64(&self) -> f64;

    /// Computes `self + rhs`, returning `None` on overflow.
    fn checked_add(&self, rhs: &Self) -> Option<Self>;

    /// Computes `self - rhs`, returning `None` on underflow.
    fn checked_sub(&self, rhs: &Self) -> Option<Self>;

    /// Computes `self * rhs`, returning `None` on overflow.
    fn checked_mul(&self, rhs: &Self) -> Option<Self>;

    /// Shifts `self` to the left by `n` decimal digits, returning
    /// `None` on overflow.
    fn checked_shl10(&self, n: u32) -> Option<Self>;

    /// Computes `self * 10 + digit`, returning `None` on overflow.
    ///
    /// `digit` must be in [0, 9].
    fn checked_push_digit(&self, digit: u8) -> Option<Self>;

    /// Computes the quotient and remainder of `self / rhs`.
    ///
    /// # Panics
    ///
    /// Panics if `rhs` is zero.
    fn div_rem(&self, rhs: &Self) -> (Self, Self);

    /// Computes the quotient of `self / 10` and the discarded
    /// low-order digit.
    fn div_rem10(&self) -> (Self, u8);

    /// Returns the number of decimal digits in `self`.
    ///
    /// Zero has one digit.
    fn digits(&self) -> u32;

    /// Writes the decimal digits of `self` to `dst`, with no sign
    /// and no leading zeros.
    fn write_digits<W: fmt::Write>(&self, dst: &mut W) -> fmt::Result;
}

/// Aborts the operation that outgrew a fixed-width coefficient.
///
/// Exponent alignment between operands with wildly different
/// exponents can require more digits than the backend holds. This
/// is not a recoverable condition; policies needing headroom should
/// select a wider backend.
#[cold]
pub(crate) fn insufficient_storage() -> ! {
    panic!("decimal coefficient exceeds its storage width")
}

/// All `u64` powers of 10.
const POW10_64: [u64; 20] = {
    let mut tab = [0u64; 20];
    let mut i = 0;
    while i < tab.len() {
        tab[i] = 10u64.pow(i as u32);
        i += 1;
    }
    tab
};

/// All `u128` powers of 10.
const POW10_128: [u128; 39] = {
    let mut tab = [0u128; 39];
    let mut i = 0;
    while i < tab.len() {
        tab[i] = 10u128.pow(i as u32);
        i += 1;
    }
    tab
};

/// Returns the number of decimal digits in `x`.
///
/// The result will be in [1, 20].
const fn digits64(mut x: u64) -> u32 {
    // Ensure that `x` is non-zero so that `digits(0) == 1`.
    //
    // This cannot cause an incorrect result because:
    //
    // - `x|1` sets the lowest bit, so it cannot increase the bit
    // length for a non-zero `x`.
    // - `x >= p` remains correct because the largest integer less
    // than `p` is 999...999, which is odd, meaning `x|1` is a no-op.
    x |= 1;

    let r = ((bitlen64(x) + 1) * 1233) / 4096;
    let p = POW10_64[r as usize];
    r + (x >= p) as u32
}

/// Returns the number of decimal digits in `x`.
///
/// The result will be in [1, 39].
const fn digits128(mut x: u128) -> u32 {
    // See `digits64` for why this cannot be incorrect.
    x |= 1;

    let r = ((bitlen128(x) + 1) * 1233) / 4096;
    let p = POW10_128[r as usize];
    r + (x >= p) as u32
}

/// Returns the minimum number of bits required to represent `x`.
const fn bitlen64(x: u64) -> u32 {
    u64::BITS - x.leading_zeros()
}

const fn bitlen128(x: u128) -> u32 {
    u128::BITS - x.leading_zeros()
}

impl Coeff for u64 {
    const CAPACITY: u32 = 19;

    fn zero() -> Self {
        0
    }

    fn one() -> Self {
        1
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }

    fn is_odd(&self) -> bool {
        self & 1 == 1
    }

    fn from_u64(v: u64) -> Self {
        v
    }

    fn from_f64_integral(v: f64) -> Option<Self> {
        debug_assert!(v >= 0.0 && v.fract() == 0.0);

        // `u64::MAX as f64` rounds up to 2^64 exactly, so use
        // a strict comparison.
        if v < u64::MAX as f64 {
            Some(v as u64)
        } else {
            None
        }
    }

    fn to_f64(&self) -> f64 {
        *self as f64
    }

    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        u64::checked_add(*self, *rhs)
    }

    fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        u64::checked_sub(*self, *rhs)
    }

    fn checked_mul(&self, rhs: &Self) -> Option<Self> {
        u64::checked_mul(*self, *rhs)
    }

    fn checked_shl10(&self, n: u32) -> Option<Self> {
        if *self == 0 {
            return Some(0);
        }
        let p = POW10_64.get(n as usize)?;
        u64::checked_mul(*self, *p)
    }

    fn checked_push_digit(&self, digit: u8) -> Option<Self> {
        debug_assert!(digit < 10);

        u64::checked_mul(*self, 10)?.checked_add(digit as u64)
    }

    fn div_rem(&self, rhs: &Self) -> (Self, Self) {
        (self / rhs, self % rhs)
    }

    fn div_rem10(&self) -> (Self, u8) {
        (self / 10, (self % 10) as u8)
    }

    fn digits(&self) -> u32 {
        digits64(*self)
    }

    fn write_digits<W: fmt::Write>(&self, dst: &mut W) -> fmt::Result {
        let mut buf = itoa::Buffer::new();
        dst.write_str(buf.format(*self))
    }
}

impl Coeff for u128 {
    const CAPACITY: u32 = 38;

    fn zero() -> Self {
        0
    }

    fn one() -> Self {
        1
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }

    fn is_odd(&self) -> bool {
        self & 1 == 1
    }

    fn from_u64(v: u64) -> Self {
        v as u128
    }

    fn from_f64_integral(v: f64) -> Option<Self> {
        debug_assert!(v >= 0.0 && v.fract() == 0.0);

        if v < u128::MAX as f64 {
            Some(v as u128)
        } else {
            None
        }
    }

    fn to_f64(&self) -> f64 {
        *self as f64
    }

    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        u128::checked_add(*self, *rhs)
    }

    fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        u128::checked_sub(*self, *rhs)
    }

    fn checked_mul(&self, rhs: &Self) -> Option<Self> {
        u128::checked_mul(*self, *rhs)
    }

    fn checked_shl10(&self, n: u32) -> Option<Self> {
        if *self == 0 {
            return Some(0);
        }
        let p = POW10_128.get(n as usize)?;
        u128::checked_mul(*self, *p)
    }

    fn checked_push_digit(&self, digit: u8) -> Option<Self> {
        debug_assert!(digit < 10);

        u128::checked_mul(*self, 10)?.checked_add(digit as u128)
    }

    fn div_rem(&self, rhs: &Self) -> (Self, Self) {
        (self / rhs, self % rhs)
    }

    fn div_rem10(&self) -> (Self, u8) {
        (self / 10, (self % 10) as u8)
    }

    fn digits(&self) -> u32 {
        digits128(*self)
    }

    fn write_digits<W: fmt::Write>(&self, dst: &mut W) -> fmt::Result {
        let mut buf = itoa::Buffer::new();
        dst.write_str(buf.format(*self))
    }
}

#[cfg(feature = "arbitrary-precision")]
impl Coeff for BigUint {
    const CAPACITY: u32 = u32::MAX;

    fn zero() -> Self {
        Zero::zero()
    }

    fn one() -> Self {
        One::one()
    }

    fn is_zero(&self) -> bool {
        Zero::is_zero(self)
    }

    fn is_odd(&self) -> bool {
        self.bit(0)
    }

    fn from_u64(v: u64) -> Self {
        BigUint::from(v)
    }

    fn from_f64_integral(v: f64) -> Option<Self> {
        debug_assert!(v >= 0.0 && v.fract() == 0.0);

        BigUint::from_f64(v)
    }

    fn to_f64(&self) -> f64 {
        ToPrimitive::to_f64(self).unwrap_or(f64::INFINITY)
    }

    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        Some(self + rhs)
    }

    fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        if self < rhs {
            None
        } else {
            Some(self - rhs)
        }
    }

    fn checked_mul(&self, rhs: &Self) -> Option<Self> {
        Some(self * rhs)
    }

    fn checked_shl10(&self, n: u32) -> Option<Self> {
        Some(self * BigUint::from(10u32).pow(n))
    }

    fn checked_push_digit(&self, digit: u8) -> Option<Self> {
        debug_assert!(digit < 10);

        Some(self * 10u32 + digit)
    }

    fn div_rem(&self, rhs: &Self) -> (Self, Self) {
        (self / rhs, self % rhs)
    }

    fn div_rem10(&self) -> (Self, u8) {
        let ten = BigUint::from(10u32);
        let q = self / &ten;
        let r = self % &ten;
        (q, r.to_u8().unwrap_or(0))
    }

    fn digits(&self) -> u32 {
        if Zero::is_zero(self) {
            return 1;
        }

        // Log-scan: estimate from the bit length, then correct by
        // a single power-of-10 comparison. See `digits64`.
        let r = ((self.bits() + 1) * 1233 / 4096) as u32;
        let p = BigUint::from(10u32).pow(r);
        r + (*self >= p) as u32
    }

    fn write_digits<W: fmt::Write>(&self, dst: &mut W) -> fmt::Result {
        write!(dst, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::Coeff;

    #[test]
    fn test_digits64() {
        let mut buf = itoa::Buffer::new();
        for i in 0..u64::CAPACITY {
            for x in [10u64.pow(i), 10u64.pow(i) - 1, 10u64.pow(i) + 1] {
                let want = buf.format(x).len() as u32;
                assert_eq!(Coeff::digits(&x), want, "{x}");
            }
        }
        assert_eq!(Coeff::digits(&0u64), 1);
        assert_eq!(Coeff::digits(&u64::MAX), 20);
    }

    #[test]
    fn test_digits128() {
        let mut buf = itoa::Buffer::new();
        for i in 0..u128::CAPACITY {
            for x in [10u128.pow(i), 10u128.pow(i) - 1, 10u128.pow(i) + 1] {
                let want = buf.format(x).len() as u32;
                assert_eq!(Coeff::digits(&x), want, "{x}");
            }
        }
        assert_eq!(Coeff::digits(&0u128), 1);
    }

    #[test]
    fn test_shl10() {
        assert_eq!(123u64.checked_shl10(0), Some(123));
        assert_eq!(123u64.checked_shl10(3), Some(123_000));
        assert_eq!(0u64.checked_shl10(100), Some(0));
        assert_eq!(u64::MAX.checked_shl10(1), None);
        assert_eq!(1u64.checked_shl10(20), None);
        assert_eq!(1u128.checked_shl10(38), Some(10u128.pow(38)));
    }

    #[test]
    fn test_push_digit() {
        let mut x = 0u64;
        for d in [1, 2, 3] {
            x = x.checked_push_digit(d).unwrap();
        }
        assert_eq!(x, 123);
        assert_eq!(u64::MAX.checked_push_digit(9), None);
    }

    #[test]
    fn test_div_rem10() {
        assert_eq!(1234u64.div_rem10(), (123, 4));
        assert_eq!(9u64.div_rem10(), (0, 9));
        assert_eq!(0u64.div_rem10(), (0, 0));
    }

    #[test]
    fn test_from_f64_integral() {
        assert_eq!(u64::from_f64_integral(42.0), Some(42));
        assert_eq!(u64::from_f64_integral(0.0), Some(0));
        assert_eq!(u64::from_f64_integral(2f64.powi(64)), None);
        assert_eq!(u128::from_f64_integral(2f64.powi(64)), Some(1 << 64));
    }

    #[cfg(feature = "arbitrary-precision")]
    #[test]
    fn test_bigint_digits() {
        use num_bigint::BigUint;

        for i in 1u32..200 {
            let p = BigUint::from(10u32).pow(i);
            assert_eq!(Coeff::digits(&p), i + 1, "10^{i}");
            assert_eq!(Coeff::digits(&(&p - 1u32)), i, "10^{i} - 1");
        }
        assert_eq!(Coeff::digits(&BigUint::from(0u32)), 1);
    }

    #[cfg(feature = "arbitrary-precision")]
    #[test]
    fn test_bigint_checked_sub() {
        use num_bigint::BigUint;

        let a = BigUint::from(5u32);
        let b = BigUint::from(7u32);
        assert_eq!(Coeff::checked_sub(&b, &a), Some(BigUint::from(2u32)));
        assert_eq!(Coeff::checked_sub(&a, &b), None);
    }
}
