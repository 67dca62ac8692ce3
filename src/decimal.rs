use core::{cmp::Ordering, convert::Infallible, ops::Neg, str::FromStr};

use crate::{
    coeff::Coeff,
    flags::Condition,
    policy::{Abort, Policy},
};

/// Distinguishes finite numbers from the two non-finite states.
///
/// Non-finite values always store a zero coefficient and a zero
/// exponent.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Class {
    Finite,
    Infinite,
    Nan,
}

/// An exact base-10 floating point number.
///
/// A finite value is `(-1)^sign * coefficient * 10^exponent`, where
/// the coefficient is an unsigned integer of at most
/// [`P::PRECISION`][Policy::PRECISION] decimal digits. There are two
/// zeros and two infinities, and NaN also carries a sign.
///
/// Every operation records the exceptional conditions it encountered
/// as sticky [`Condition`] flags on its result and reports them to
/// the policy. Flags travel with the value, including through
/// [`Clone`], until [`reset_flags`][Self::reset_flags] clears them.
///
/// The ordering implemented by [`Ord`] is total so that sequences of
/// decimals can be sorted: `-Infinity < -NaN < NaN < finite
/// < +Infinity`, and zeros compare equal regardless of sign.
pub struct Decimal<P: Policy = Abort> {
    pub(crate) coeff: P::Coeff,
    pub(crate) exp: i32,
    pub(crate) flags: Condition,
    pub(crate) sign: bool,
    pub(crate) class: Class,
}

impl<P: Policy> Decimal<P> {
    /// Rejects policies whose precision does not fit the chosen
    /// coefficient backend. Evaluated once per instantiation.
    const POLICY_OK: () = {
        assert!(P::PRECISION >= 2, "policy precision must be at least 2");
        assert!(P::PRECISION < u32::MAX, "policy precision is too large");
        assert!(
            P::Coeff::CAPACITY == u32::MAX
                || 2 * (P::PRECISION as u64) <= P::Coeff::CAPACITY as u64,
            "coefficient backend is too narrow for twice the policy precision",
        );
    };

    pub(crate) fn from_parts(sign: bool, exp: i32, coeff: P::Coeff) -> Self {
        let () = Self::POLICY_OK;

        Self {
            coeff,
            exp,
            flags: Condition::empty(),
            sign,
            class: Class::Finite,
        }
    }

    pub(crate) fn special(class: Class, sign: bool) -> Self {
        let () = Self::POLICY_OK;
        debug_assert!(class != Class::Finite);

        Self {
            coeff: P::Coeff::zero(),
            exp: 0,
            flags: Condition::empty(),
            sign,
            class,
        }
    }

    pub(crate) fn one() -> Self {
        Self::from_parts(false, 0, P::Coeff::one())
    }

    /// Returns positive zero.
    pub fn zero() -> Self {
        Self::from_parts(false, 0, P::Coeff::zero())
    }

    /// Returns a positive quiet NaN.
    pub fn nan() -> Self {
        Self::special(Class::Nan, false)
    }

    /// Returns positive infinity.
    ///
    /// Negative infinity is its negation.
    pub fn infinity() -> Self {
        Self::special(Class::Infinite, false)
    }

    /// Assembles a finite decimal from saved parts, then rounds it
    /// to the policy precision.
    ///
    /// The value is `(-1)^sign * coeff * 10^exp`. Together with
    /// [`coefficient`][Self::coefficient],
    /// [`exponent`][Self::exponent], and the sign and class
    /// queries, this round-trips any finite value.
    pub fn from_raw_parts(sign: bool, exp: i32, coeff: P::Coeff) -> Self {
        let mut d = Self::from_parts(sign, exp, coeff);
        d.round();
        d
    }

    /// Returns the coefficient magnitude.
    ///
    /// Zero for NaNs and infinities.
    pub fn coefficient(&self) -> &P::Coeff {
        &self.coeff
    }

    /// Returns the exponent.
    ///
    /// Zero for NaNs and infinities.
    pub fn exponent(&self) -> i32 {
        self.exp
    }

    /// Reports whether the value is NaN.
    pub fn is_nan(&self) -> bool {
        self.class == Class::Nan
    }

    /// Reports whether the value is an infinity of either sign.
    pub fn is_infinite(&self) -> bool {
        self.class == Class::Infinite
    }

    /// Reports whether the value is neither NaN nor an infinity.
    pub fn is_finite(&self) -> bool {
        self.class == Class::Finite
    }

    /// Reports whether the value is a zero of either sign.
    pub fn is_zero(&self) -> bool {
        self.class == Class::Finite && self.coeff.is_zero()
    }

    /// Reports whether the sign is negative.
    ///
    /// Zeros, NaNs, and infinities are signed as well.
    pub fn is_sign_negative(&self) -> bool {
        self.sign
    }

    /// Reports whether the sign is positive.
    pub fn is_sign_positive(&self) -> bool {
        !self.sign
    }

    /// Returns the absolute value.
    ///
    /// Flags carry over; no condition is raised.
    pub fn abs(&self) -> Self {
        let mut d = self.clone();
        d.sign = false;
        d
    }

    /// Adds one in place.
    pub fn increment(&mut self) {
        *self = self.add_impl(&Self::one(), true);
    }

    /// Subtracts one in place.
    pub fn decrement(&mut self) {
        *self = self.sub_impl(&Self::one(), true);
    }

    /// Returns the condition flags.
    pub fn flags(&self) -> Condition {
        self.flags
    }

    /// Returns a mutable reference to the condition flags.
    ///
    /// Writing through it does not invoke policy callbacks.
    pub fn flags_mut(&mut self) -> &mut Condition {
        &mut self.flags
    }

    /// Clears every condition flag.
    pub fn reset_flags(&mut self) {
        self.flags = Condition::empty();
    }

    /// Sets `cond` and invokes the matching policy callbacks.
    ///
    /// Callbacks run in a fixed order, with `on_inexact` before
    /// `on_rounded` and the non-rounding conditions after both.
    pub(crate) fn raise(&mut self, cond: Condition) {
        self.flags |= cond;

        if cond.contains(Condition::INEXACT) {
            P::on_inexact(self);
        }
        if cond.contains(Condition::ROUNDED) {
            P::on_rounded(self);
        }
        if cond.contains(Condition::CLAMPED) {
            P::on_clamped(self);
        }
        if cond.contains(Condition::SUBNORMAL) {
            P::on_subnormal(self);
        }
        if cond.contains(Condition::UNDERFLOW) {
            P::on_underflow(self);
        }
        if cond.contains(Condition::OVERFLOW) {
            P::on_overflow(self);
        }
        if cond.contains(Condition::DIVISION_BY_ZERO) {
            P::on_division_by_zero(self);
        }
        if cond.contains(Condition::INVALID_OPERATION) {
            P::on_invalid_operation(self);
        }
    }

    /// Compares two values under the total order.
    ///
    /// `-Infinity < -NaN < NaN < finite < +Infinity`; same-sign
    /// non-finites compare equal, and so do the two zeros. Finite
    /// values compare numerically. No flags are raised, even for
    /// NaN operands.
    pub fn compare(&self, rhs: &Self) -> Ordering {
        fn rank<P: Policy>(d: &Decimal<P>) -> u8 {
            match d.class {
                Class::Infinite if d.sign => 0,
                Class::Nan if d.sign => 1,
                Class::Nan => 2,
                Class::Finite => 3,
                Class::Infinite => 4,
            }
        }

        let (lr, rr) = (rank(self), rank(rhs));
        if lr != rr {
            return lr.cmp(&rr);
        }
        if self.class != Class::Finite {
            return Ordering::Equal;
        }

        if self.sign != rhs.sign && !(self.is_zero() && rhs.is_zero()) {
            return if self.sign {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        if self.is_zero() && rhs.is_zero() {
            return Ordering::Equal;
        }
        if self.is_zero() {
            return if rhs.sign {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }
        if rhs.is_zero() {
            return if self.sign {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }

        // Same sign, both nonzero. Magnitudes with different
        // adjusted exponents are decided without aligning, so
        // comparing values with wildly different exponents cannot
        // exhaust the coefficient.
        let la = self.exp as i64 + self.coeff.digits() as i64;
        let ra = rhs.exp as i64 + rhs.coeff.digits() as i64;
        if la != ra {
            let ord = la.cmp(&ra);
            return if self.sign { ord.reverse() } else { ord };
        }

        let diff = self.sub_impl(rhs, false);
        if diff.coeff.is_zero() {
            Ordering::Equal
        } else if diff.sign {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    /// Converts to `bool`: true for NaNs, infinities, and finite
    /// values with a magnitude of at least one.
    pub fn to_bool(&self) -> bool {
        match self.class {
            Class::Nan | Class::Infinite => true,
            Class::Finite => {
                !self.coeff.is_zero() && self.exp as i64 + self.coeff.digits() as i64 > 0
            }
        }
    }

    /// Converts to the nearest binary floating point value.
    pub fn to_f64(&self) -> f64 {
        /// Powers of 10 that are exact in an `f64`.
        const POW10: [f64; 23] = [
            1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15,
            1e16, 1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
        ];

        match self.class {
            Class::Nan => f64::NAN,
            Class::Infinite => {
                if self.sign {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                }
            }
            Class::Finite => {
                // A coefficient of at most 15 digits is exact in
                // the mantissa, and scaling by an exact power of 10
                // is a single correctly rounded operation. Wider
                // values go through the decimal text form instead,
                // which also parses with correct rounding.
                let mag = if self.coeff.digits() <= 15 && self.exp.unsigned_abs() <= 22 {
                    let c = self.coeff.to_f64();
                    if self.exp >= 0 {
                        c * POW10[self.exp.unsigned_abs() as usize]
                    } else {
                        c / POW10[self.exp.unsigned_abs() as usize]
                    }
                } else {
                    self.abs().to_string().parse::<f64>().unwrap_or(f64::NAN)
                };
                if self.sign {
                    -mag
                } else {
                    mag
                }
            }
        }
    }

    /// Converts from a binary floating point value, then rounds.
    ///
    /// NaNs and infinities map to their decimal counterparts. The
    /// finite conversion scales the value by ten until its
    /// fractional part is gone, which reflects the binary value the
    /// argument actually holds rather than the digits it was
    /// written with. Construct from text when the digits matter.
    pub fn from_f64(v: f64) -> Self {
        let () = Self::POLICY_OK;

        if v.is_nan() {
            return Self::special(Class::Nan, v.is_sign_negative());
        }
        if v.is_infinite() {
            return Self::special(Class::Infinite, v.is_sign_negative());
        }

        let sign = v.is_sign_negative();
        let mut x = v.abs();
        let mut exp = 0i32;
        loop {
            if x.fract() == 0.0 {
                if let Some(coeff) = P::Coeff::from_f64_integral(x) {
                    let mut d = Self::from_parts(sign, exp, coeff);
                    d.round();
                    return d;
                }
                // Integral but too wide for the coefficient.
                x /= 10.0;
                exp += 1;
            } else {
                if x >= f64::MAX / 10.0 {
                    // The fraction cannot be scaled away within
                    // f64 range. Fall back to the shortest text
                    // form.
                    return Self::parse(&format!("{v:e}"));
                }
                x *= 10.0;
                exp -= 1;
            }
        }
    }
}

impl<P: Policy> Clone for Decimal<P> {
    fn clone(&self) -> Self {
        Self {
            coeff: self.coeff.clone(),
            exp: self.exp,
            flags: self.flags,
            sign: self.sign,
            class: self.class,
        }
    }
}

impl<P: Policy> Default for Decimal<P> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<P: Policy> PartialEq for Decimal<P> {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl<P: Policy> Eq for Decimal<P> {}

impl<P: Policy> PartialOrd for Decimal<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P: Policy> Ord for Decimal<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl<P: Policy> Neg for Decimal<P> {
    type Output = Self;

    /// Flips the sign of nonzero finite values and infinities.
    /// Zeros and NaNs keep theirs.
    fn neg(mut self) -> Self {
        let flip = match self.class {
            Class::Infinite => true,
            Class::Nan => false,
            Class::Finite => !self.coeff.is_zero(),
        };
        if flip {
            self.sign = !self.sign;
        }
        self
    }
}

impl<P: Policy> Neg for &Decimal<P> {
    type Output = Decimal<P>;

    fn neg(self) -> Decimal<P> {
        -self.clone()
    }
}

impl<P: Policy> FromStr for Decimal<P> {
    type Err = Infallible;

    /// Equivalent to [`Decimal::parse`]. Malformed input yields
    /// a NaN with [`Condition::INVALID_OPERATION`] raised, never an
    /// `Err`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),+ $(,)?) => {$(
        impl<P: Policy> From<$ty> for Decimal<P> {
            fn from(v: $ty) -> Self {
                let mut d = Self::from_parts(false, 0, P::Coeff::from_u64(v as u64));
                d.round();
                d
            }
        }
    )+};
}

macro_rules! impl_from_signed {
    ($($ty:ty),+ $(,)?) => {$(
        impl<P: Policy> From<$ty> for Decimal<P> {
            fn from(v: $ty) -> Self {
                let coeff = P::Coeff::from_u64(v.unsigned_abs() as u64);
                let mut d = Self::from_parts(v < 0, 0, coeff);
                d.round();
                d
            }
        }
    )+};
}

impl_from_unsigned!(u8, u16, u32, u64, usize);
impl_from_signed!(i8, i16, i32, i64, isize);

impl<P: Policy> From<f64> for Decimal<P> {
    fn from(v: f64) -> Self {
        Self::from_f64(v)
    }
}

impl<P: Policy> From<f32> for Decimal<P> {
    fn from(v: f32) -> Self {
        Self::from_f64(v as f64)
    }
}

#[cfg(feature = "serde")]
impl<P: Policy> serde::Serialize for Decimal<P> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de, P: Policy> serde::Deserialize<'de> for Decimal<P> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::marker::PhantomData;

        struct Visitor<P>(PhantomData<P>);

        impl<P: Policy> serde::de::Visitor<'_> for Visitor<P> {
            type Value = Decimal<P>;

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("a decimal number as a string")
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let d = Decimal::<P>::parse(s);
                if d.is_nan() && d.flags().contains(Condition::INVALID_OPERATION) {
                    Err(E::invalid_value(serde::de::Unexpected::Str(s), &self))
                } else {
                    Ok(d)
                }
            }
        }

        deserializer.deserialize_str(Visitor(PhantomData))
    }
}
