use crate::{
    coeff::{insufficient_storage, Coeff},
    decimal::{Class, Decimal},
    flags::Condition,
    policy::{Policy, Rounding},
};

impl<P: Policy> Decimal<P> {
    /// Reduces the coefficient to at most
    /// [`P::PRECISION`][Policy::PRECISION] digits and applies the
    /// exponent bounds, raising whatever conditions result.
    pub(crate) fn round(&mut self) {
        self.round_sticky(false)
    }

    /// Like [`round`][Self::round], except that `sticky` records
    /// nonzero digits that were already discarded below the current
    /// coefficient, so they still count toward inexactness.
    pub(crate) fn round_sticky(&mut self, sticky: bool) {
        if self.class != Class::Finite {
            return;
        }

        let mut cond = Condition::empty();
        let mut inexact = sticky;
        let digits = self.coeff.digits();
        let prec = P::PRECISION;

        if digits > prec {
            let excess = digits - prec;
            let mut coeff = self.coeff.clone();

            // Discard the low `excess` digits. The digit exposed by
            // the final division decides the rounding; the earlier
            // ones only feed the sticky bit.
            let mut low_nonzero = sticky;
            let mut decider = 0u8;
            for i in 0..excess {
                let (q, r) = coeff.div_rem10();
                if i + 1 < excess {
                    low_nonzero |= r != 0;
                } else {
                    decider = r;
                }
                coeff = q;
            }
            self.exp = self.exp.saturating_add(excess as i32);
            inexact = low_nonzero || decider != 0;

            let up = match P::ROUNDING {
                Rounding::Down => false,
                Rounding::Up => inexact,
                Rounding::HalfUp => decider >= 5,
                Rounding::HalfDown => decider > 5 || (decider == 5 && low_nonzero),
                Rounding::HalfEven => {
                    decider > 5 || (decider == 5 && (low_nonzero || coeff.is_odd()))
                }
                Rounding::Ceiling => !self.sign && inexact,
                Rounding::Floor => self.sign && inexact,
                Rounding::ZeroFiveUp => inexact && matches!(coeff.div_rem10().1, 0 | 5),
            };
            if up {
                coeff = match coeff.checked_add(&P::Coeff::one()) {
                    Some(c) => c,
                    None => insufficient_storage(),
                };
                if coeff.digits() > prec {
                    // The increment carried 99...9 into 100...0.
                    let (q, r) = coeff.div_rem10();
                    debug_assert_eq!(r, 0);
                    coeff = q;
                    self.exp = self.exp.saturating_add(1);
                }
            }
            self.coeff = coeff;

            cond |= Condition::ROUNDED;
            if inexact {
                cond |= Condition::INEXACT;
            }
        } else if sticky {
            cond |= Condition::ROUNDED | Condition::INEXACT;
        }

        self.apply_bounds(&mut cond, inexact);
        if !cond.is_empty() {
            self.raise(cond);
        }
    }

    /// Enforces the policy's exponent bounds, if any.
    fn apply_bounds(&mut self, cond: &mut Condition, inexact: bool) {
        if let Some(max) = P::MAX_EXPONENT {
            if self.exp > max {
                if self.coeff.is_zero() {
                    self.exp = max;
                    *cond |= Condition::CLAMPED;
                } else {
                    self.coeff = P::Coeff::zero();
                    self.exp = 0;
                    self.class = Class::Infinite;
                    *cond |= Condition::OVERFLOW | Condition::INEXACT | Condition::ROUNDED;
                }
                return;
            }
        }
        if let Some(min) = P::MIN_EXPONENT {
            if self.exp < min {
                if self.coeff.is_zero() {
                    self.exp = min;
                    *cond |= Condition::CLAMPED;
                } else if inexact {
                    *cond |= Condition::UNDERFLOW
                        | Condition::INEXACT
                        | Condition::ROUNDED
                        | Condition::SUBNORMAL;
                } else {
                    *cond |= Condition::SUBNORMAL;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        decimal::Decimal,
        flags::Condition,
        policy::{Policy, Rounding},
    };

    macro_rules! policy5 {
        ($name:ident, $mode:ident) => {
            struct $name;

            impl Policy for $name {
                type Coeff = u64;

                const PRECISION: u32 = 5;
                const ROUNDING: Rounding = Rounding::$mode;
            }
        };
    }

    policy5!(HalfUp5, HalfUp);
    policy5!(Down5, Down);
    policy5!(Up5, Up);
    policy5!(HalfEven5, HalfEven);
    policy5!(HalfDown5, HalfDown);
    policy5!(Ceiling5, Ceiling);
    policy5!(Floor5, Floor);
    policy5!(ZeroFiveUp5, ZeroFiveUp);

    fn check<P: Policy>(input: &str, want: &str, want_inexact: bool) {
        let d = Decimal::<P>::parse(input);
        assert_eq!(d.to_string(), want, "{input}");
        assert!(d.flags().contains(Condition::ROUNDED), "{input}");
        assert_eq!(
            d.flags().contains(Condition::INEXACT),
            want_inexact,
            "{input}",
        );
    }

    #[test]
    fn test_half_up() {
        check::<HalfUp5>("123465", "123470", true);
        check::<HalfUp5>("123464", "123460", true);
        check::<HalfUp5>("123455", "123460", true);
    }

    #[test]
    fn test_down() {
        check::<Down5>("123465", "123460", true);
        check::<Down5>("123469", "123460", true);
    }

    #[test]
    fn test_up() {
        check::<Up5>("123454", "123460", true);
        check::<Up5>("123451", "123460", true);
    }

    #[test]
    fn test_half_even() {
        // Ties go to the even digit; anything past a tie rounds up.
        check::<HalfEven5>("123455", "123460", true);
        check::<HalfEven5>("123445", "123440", true);
        check::<HalfEven5>("1234451", "1234500", true);
        check::<HalfEven5>("123446", "123450", true);
    }

    #[test]
    fn test_half_down() {
        check::<HalfDown5>("123455", "123450", true);
        check::<HalfDown5>("1234551", "1234600", true);
        check::<HalfDown5>("123456", "123460", true);
    }

    #[test]
    fn test_ceiling_floor() {
        check::<Ceiling5>("123451", "123460", true);
        check::<Ceiling5>("-123451", "-123450", true);
        check::<Floor5>("123451", "123450", true);
        check::<Floor5>("-123451", "-123460", true);
    }

    #[test]
    fn test_zero_five_up() {
        // Truncations ending in 0 or 5 round away instead.
        check::<ZeroFiveUp5>("150001", "150010", true);
        check::<ZeroFiveUp5>("199991", "199990", true);
        check::<ZeroFiveUp5>("123451", "123460", true);
        check::<ZeroFiveUp5>("123461", "123460", true);
    }

    #[test]
    fn test_exact_discard_is_rounded_not_inexact() {
        check::<HalfUp5>("123450", "123450", false);
        check::<Down5>("1234000", "1234000", false);
    }

    #[test]
    fn test_carry_lengthens_coefficient() {
        check::<HalfUp5>("999995", "1000000", true);
        check::<Up5>("9999901", "10000000", true);
    }

    #[test]
    fn test_within_precision_is_silent() {
        let d = Decimal::<HalfUp5>::parse("12345");
        assert_eq!(d.to_string(), "12345");
        assert!(d.flags().is_empty());
    }
}
