use core::{
    cmp::Ordering,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign},
};

use crate::{
    coeff::{insufficient_storage, Coeff},
    decimal::{Class, Decimal},
    flags::Condition,
    policy::{Policy, Rounding},
};

impl<P: Policy> Decimal<P> {
    /// Returns both coefficients scaled to the smaller exponent.
    fn aligned(&self, rhs: &Self) -> (P::Coeff, P::Coeff, i32) {
        // The delta can span the whole i32 range, so widen before
        // subtracting.
        fn scale<C: Coeff>(coeff: &C, from: i32, to: i32) -> C {
            debug_assert!(from >= to);

            let delta = (from as i64 - to as i64) as u32;
            if delta == 0 {
                return coeff.clone();
            }
            match coeff.checked_shl10(delta) {
                Some(c) => c,
                None => insufficient_storage(),
            }
        }

        let exp = self.exp.min(rhs.exp);
        (
            scale(&self.coeff, self.exp, exp),
            scale(&rhs.coeff, rhs.exp, exp),
            exp,
        )
    }

    /// A NaN result taking its sign from the first NaN operand.
    /// Flags carry over from the left operand; nothing is raised.
    fn propagate_nan(&self, rhs: &Self) -> Self {
        debug_assert!(self.is_nan() || rhs.is_nan());

        let sign = if self.is_nan() { self.sign } else { rhs.sign };
        let mut d = Self::special(Class::Nan, sign);
        d.flags = self.flags;
        d
    }

    /// The sum, optionally left unrounded for internal comparison.
    pub(crate) fn add_impl(&self, rhs: &Self, apply_rounding: bool) -> Self {
        if self.is_nan() || rhs.is_nan() {
            return self.propagate_nan(rhs);
        }

        if self.is_infinite() || rhs.is_infinite() {
            if self.is_infinite() && rhs.is_infinite() && self.sign != rhs.sign {
                let mut d = Self::special(Class::Nan, false);
                d.flags = self.flags;
                d.raise(Condition::INVALID_OPERATION);
                return d;
            }
            let sign = if self.is_infinite() { self.sign } else { rhs.sign };
            let mut d = Self::special(Class::Infinite, sign);
            d.flags = self.flags;
            return d;
        }

        let (lc, rc, exp) = self.aligned(rhs);
        let (sign, coeff) = if self.sign == rhs.sign {
            let sum = match lc.checked_add(&rc) {
                Some(c) => c,
                None => insufficient_storage(),
            };
            (self.sign, sum)
        } else {
            match lc.cmp(&rc) {
                Ordering::Greater => match lc.checked_sub(&rc) {
                    Some(c) => (self.sign, c),
                    None => insufficient_storage(),
                },
                Ordering::Less => match rc.checked_sub(&lc) {
                    Some(c) => (rhs.sign, c),
                    None => insufficient_storage(),
                },
                // Cancellation to zero. The signs differ here, so
                // the zero is negative only under Floor rounding.
                Ordering::Equal => (
                    matches!(P::ROUNDING, Rounding::Floor),
                    P::Coeff::zero(),
                ),
            }
        };

        let mut d = Self::from_parts(sign, exp, coeff);
        d.flags = self.flags;
        if apply_rounding {
            d.round();
        }
        d
    }

    /// The difference: addition with the right sign flipped, except
    /// that a NaN operand keeps its sign.
    pub(crate) fn sub_impl(&self, rhs: &Self, apply_rounding: bool) -> Self {
        if rhs.is_nan() {
            return self.add_impl(rhs, apply_rounding);
        }
        let mut negated = rhs.clone();
        negated.sign = !negated.sign;
        self.add_impl(&negated, apply_rounding)
    }

    fn mul_impl(&self, rhs: &Self) -> Self {
        if self.is_nan() || rhs.is_nan() {
            return self.propagate_nan(rhs);
        }

        let sign = self.sign ^ rhs.sign;
        if self.is_infinite() || rhs.is_infinite() {
            if self.is_zero() || rhs.is_zero() {
                let mut d = Self::special(Class::Nan, false);
                d.flags = self.flags;
                d.raise(Condition::INVALID_OPERATION);
                return d;
            }
            let mut d = Self::special(Class::Infinite, sign);
            d.flags = self.flags;
            return d;
        }

        let coeff = match self.coeff.checked_mul(&rhs.coeff) {
            Some(c) => c,
            None => insufficient_storage(),
        };
        let mut d = Self::from_parts(sign, self.exp.saturating_add(rhs.exp), coeff);
        d.flags = self.flags;
        d.round();
        d
    }

    fn div_impl(&self, rhs: &Self) -> Self {
        if self.is_nan() || rhs.is_nan() {
            return self.propagate_nan(rhs);
        }

        let sign = self.sign ^ rhs.sign;
        if self.is_infinite() {
            if rhs.is_infinite() {
                let mut d = Self::special(Class::Nan, false);
                d.flags = self.flags;
                d.raise(Condition::INVALID_OPERATION);
                return d;
            }
            let mut d = Self::special(Class::Infinite, sign);
            d.flags = self.flags;
            return d;
        }
        if rhs.is_infinite() {
            let mut d = Self::from_parts(sign, 0, P::Coeff::zero());
            d.flags = self.flags;
            return d;
        }

        if rhs.is_zero() {
            let d = if self.is_zero() {
                let mut d = Self::special(Class::Nan, false);
                d.flags = self.flags;
                d.raise(Condition::DIVISION_BY_ZERO);
                d
            } else {
                let mut d = Self::special(Class::Infinite, sign);
                d.flags = self.flags;
                d.raise(Condition::DIVISION_BY_ZERO | Condition::INVALID_OPERATION);
                d
            };
            return d;
        }
        if self.is_zero() {
            let mut d = Self::from_parts(sign, self.exp.saturating_sub(rhs.exp), P::Coeff::zero());
            d.flags = self.flags;
            d.round();
            return d;
        }

        // Base-10 long division, carried one digit past the
        // precision so the rounding engine sees the decisive digit.
        let mut adjust: i32 = 0;
        let mut dividend = self.coeff.clone();
        let mut divisor = rhs.coeff.clone();

        while dividend < divisor {
            dividend = match dividend.checked_shl10(1) {
                Some(c) => c,
                None => insufficient_storage(),
            };
            adjust += 1;
        }
        loop {
            match divisor.checked_shl10(1) {
                Some(d10) if d10 <= dividend => {
                    divisor = d10;
                    adjust -= 1;
                }
                _ => break,
            }
        }

        let target = P::PRECISION + 1;
        let mut res = P::Coeff::zero();
        loop {
            // The scaling above keeps `dividend < divisor * 10`, so
            // each step yields a single digit.
            let (q, rem) = dividend.div_rem(&divisor);
            res = match res.checked_add(&q) {
                Some(c) => c,
                None => insufficient_storage(),
            };
            dividend = rem;
            if (dividend.is_zero() && adjust >= 0) || res.digits() == target {
                break;
            }
            res = match res.checked_shl10(1) {
                Some(c) => c,
                None => insufficient_storage(),
            };
            dividend = match dividend.checked_shl10(1) {
                Some(c) => c,
                None => insufficient_storage(),
            };
            adjust += 1;
        }

        let exp = self.exp.saturating_sub(rhs.exp).saturating_sub(adjust);
        let mut d = Self::from_parts(sign, exp, res);
        d.flags = self.flags;
        d.round();
        d
    }
}

macro_rules! impl_binop {
    ($op:ident, $method:ident, $assign:ident, $assign_method:ident, $kernel:ident) => {
        impl<P: Policy> $op for Decimal<P> {
            type Output = Decimal<P>;

            fn $method(self, rhs: Decimal<P>) -> Decimal<P> {
                Decimal::$kernel(&self, &rhs)
            }
        }

        impl<P: Policy> $op<&Decimal<P>> for &Decimal<P> {
            type Output = Decimal<P>;

            fn $method(self, rhs: &Decimal<P>) -> Decimal<P> {
                Decimal::$kernel(self, rhs)
            }
        }

        impl<P: Policy> $assign for Decimal<P> {
            fn $assign_method(&mut self, rhs: Decimal<P>) {
                *self = Decimal::$kernel(self, &rhs);
            }
        }

        impl<P: Policy> $assign<&Decimal<P>> for Decimal<P> {
            fn $assign_method(&mut self, rhs: &Decimal<P>) {
                *self = Decimal::$kernel(self, rhs);
            }
        }
    };
}

impl<P: Policy> Decimal<P> {
    fn do_add(&self, rhs: &Self) -> Self {
        self.add_impl(rhs, true)
    }

    fn do_sub(&self, rhs: &Self) -> Self {
        self.sub_impl(rhs, true)
    }
}

impl_binop!(Add, add, AddAssign, add_assign, do_add);
impl_binop!(Sub, sub, SubAssign, sub_assign, do_sub);
impl_binop!(Mul, mul, MulAssign, mul_assign, mul_impl);
impl_binop!(Div, div, DivAssign, div_assign, div_impl);

/// A native integer operand is promoted through construction under
/// the same policy.
macro_rules! impl_binop_mixed {
    ($($ty:ty),+ $(,)?) => {$(
        impl_binop_mixed!(@one $ty, Add, add, AddAssign, add_assign, do_add);
        impl_binop_mixed!(@one $ty, Sub, sub, SubAssign, sub_assign, do_sub);
        impl_binop_mixed!(@one $ty, Mul, mul, MulAssign, mul_assign, mul_impl);
        impl_binop_mixed!(@one $ty, Div, div, DivAssign, div_assign, div_impl);
    )+};
    (@one $ty:ty, $op:ident, $method:ident, $assign:ident, $assign_method:ident, $kernel:ident) => {
        impl<P: Policy> $op<$ty> for Decimal<P> {
            type Output = Decimal<P>;

            fn $method(self, rhs: $ty) -> Decimal<P> {
                Decimal::$kernel(&self, &Decimal::from(rhs))
            }
        }

        impl<P: Policy> $op<Decimal<P>> for $ty {
            type Output = Decimal<P>;

            fn $method(self, rhs: Decimal<P>) -> Decimal<P> {
                Decimal::$kernel(&Decimal::from(self), &rhs)
            }
        }

        impl<P: Policy> $assign<$ty> for Decimal<P> {
            fn $assign_method(&mut self, rhs: $ty) {
                *self = Decimal::$kernel(self, &Decimal::from(rhs));
            }
        }
    };
}

impl_binop_mixed!(i32, i64, u32, u64);
