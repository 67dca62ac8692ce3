use crate::{
    coeff::Coeff,
    decimal::{Class, Decimal},
    flags::Condition,
    policy::Policy,
};

impl<P: Policy> Decimal<P> {
    /// Parses a decimal from text.
    ///
    /// The accepted forms are an optional sign followed by digits
    /// with an optional point and an optional `e`/`E` exponent,
    /// `Inf`/`Infinity`, or `NaN`, all case-insensitive. `NaN` may
    /// be followed by diagnostic digits, which are dropped.
    ///
    /// Parsing never fails: any deviation from that grammar yields
    /// a positive NaN with [`Condition::INVALID_OPERATION`] raised.
    /// A successfully parsed coefficient is rounded to the policy
    /// precision, which may raise the rounding conditions.
    pub fn parse(s: &str) -> Self {
        let mut s = s.as_bytes();

        let mut sign = false;
        if let Some((c @ (b'-' | b'+'), rest)) = s.split_first() {
            sign = *c == b'-';
            s = rest;
        }

        match s.first() {
            Some(b'0'..=b'9' | b'.') => Self::parse_finite(sign, s),
            Some(b'i' | b'I') => {
                if s.eq_ignore_ascii_case(b"inf") || s.eq_ignore_ascii_case(b"infinity") {
                    Self::special(Class::Infinite, sign)
                } else {
                    Self::invalid()
                }
            }
            Some(b'n' | b'N') => match s.get(..3) {
                // Trailing diagnostic digits, and anything after
                // them, are accepted and dropped.
                Some(prefix) if prefix.eq_ignore_ascii_case(b"nan") => {
                    Self::special(Class::Nan, sign)
                }
                _ => Self::invalid(),
            },
            _ => Self::invalid(),
        }
    }

    /// A positive NaN with the invalid-operation condition raised.
    fn invalid() -> Self {
        let mut d = Self::special(Class::Nan, false);
        d.raise(Condition::INVALID_OPERATION);
        d
    }

    /// Parses everything after the sign of a finite number.
    fn parse_finite(sign: bool, s: &[u8]) -> Self {
        let mut coeff = P::Coeff::zero();
        let mut exp: i32 = 0;
        // Digits past the coefficient's width are dropped here and
        // folded back in as inexactness when the result is rounded.
        let mut sticky = false;
        let mut any_digits = false;
        let mut rest = s;

        while let Some((&c, r)) = rest.split_first() {
            if !c.is_ascii_digit() {
                break;
            }
            any_digits = true;
            match coeff.checked_push_digit(c - b'0') {
                Some(wider) => coeff = wider,
                None => {
                    sticky |= c != b'0';
                    exp = exp.saturating_add(1);
                }
            }
            rest = r;
        }

        if let Some((&b'.', r)) = rest.split_first() {
            rest = r;
            while let Some((&c, r)) = rest.split_first() {
                if !c.is_ascii_digit() {
                    break;
                }
                any_digits = true;
                match coeff.checked_push_digit(c - b'0') {
                    Some(wider) => {
                        coeff = wider;
                        exp = exp.saturating_sub(1);
                    }
                    None => sticky |= c != b'0',
                }
                rest = r;
            }
        }
        if !any_digits {
            return Self::invalid();
        }

        if let Some((b'e' | b'E', r)) = rest.split_first() {
            rest = r;
            let mut esign = false;
            if let Some((c @ (b'-' | b'+'), r)) = rest.split_first() {
                esign = *c == b'-';
                rest = r;
            }
            let mut eval: i32 = 0;
            let mut any_exp_digits = false;
            while let Some((&c, r)) = rest.split_first() {
                if !c.is_ascii_digit() {
                    break;
                }
                any_exp_digits = true;
                eval = match eval
                    .checked_mul(10)
                    .and_then(|e| e.checked_add((c - b'0') as i32))
                {
                    Some(e) => e,
                    None => return Self::invalid(),
                };
                rest = r;
            }
            if !any_exp_digits {
                return Self::invalid();
            }
            exp = match exp.checked_add(if esign { -eval } else { eval }) {
                Some(e) => e,
                None => return Self::invalid(),
            };
        }

        if !rest.is_empty() {
            return Self::invalid();
        }

        let mut d = Self::from_parts(sign, exp, coeff);
        d.round_sticky(sticky);
        d
    }
}

#[cfg(test)]
mod tests {
    use crate::{decimal::Decimal, flags::Condition, policy::NoOp};

    type Dec = Decimal<NoOp>;

    fn invalid(s: &str) {
        let d = Dec::parse(s);
        assert!(d.is_nan(), "{s:?}");
        assert!(d.is_sign_positive(), "{s:?}");
        assert!(d.flags().contains(Condition::INVALID_OPERATION), "{s:?}");
    }

    fn valid(s: &str, want: &str) {
        let d = Dec::parse(s);
        assert!(!d.flags().contains(Condition::INVALID_OPERATION), "{s:?}");
        assert_eq!(d.to_string(), want, "{s:?}");
    }

    #[test]
    fn test_plain_numbers() {
        valid("0", "0");
        valid("00", "0");
        valid("1", "1");
        valid("-1", "-1");
        valid("+1", "1");
        valid("000123", "123");
        valid("12.70", "12.70");
        valid("1.", "1");
        valid(".5", "0.5");
        valid("-.5", "-0.5");
        valid("0.00", "0.00");
        valid("-0", "-0");
    }

    #[test]
    fn test_exponents() {
        valid("1e3", "1000");
        valid("1E+3", "1000");
        valid("1e-3", "0.001");
        valid("30.5E10", "305000000000");
        valid("1.2345678E-7", "0.00000012345678");
        valid("0.999E-2", "0.00999");
        valid("10000e+9", "10000000000000");
        valid("5e0", "5");
    }

    #[test]
    fn test_specials() {
        valid("Inf", "Infinity");
        valid("inf", "Infinity");
        valid("-INF", "-Infinity");
        valid("Infinity", "Infinity");
        valid("-infinity", "-Infinity");
        valid("NaN", "NaN");
        valid("nan", "NaN");
        valid("-NaN", "-NaN");
        valid("+nAn", "NaN");
    }

    #[test]
    fn test_nan_diagnostics_dropped() {
        for s in ["NaN123", "-NaN456", "nan0"] {
            let d = Dec::parse(s);
            assert!(d.is_nan(), "{s:?}");
            assert!(!d.flags().contains(Condition::INVALID_OPERATION), "{s:?}");
        }
        // Trailing junk after the diagnostic digits is dropped
        // without raising anything.
        let d = Dec::parse("NaN12x");
        assert!(d.is_nan());
        assert!(d.flags().is_empty());
    }

    #[test]
    fn test_malformed() {
        invalid("");
        invalid("+");
        invalid("-");
        invalid(".");
        invalid("-.");
        invalid("abc");
        invalid("1x");
        invalid("1.2.3");
        invalid("1e");
        invalid("1e+");
        invalid("1e++3");
        invalid("1e+-3");
        invalid("1e3.5");
        invalid("--1");
        invalid("1 ");
        invalid(" 1");
        invalid("in");
        invalid("infinityy");
        invalid("na");
        invalid("e3");
        invalid("1e99999999999999999999");
    }

    #[test]
    fn test_fraction_scales_exponent() {
        valid("1.23", "1.23");
        valid("0.0001", "0.0001");
        valid("123.456e3", "123456");
        valid("123.456e-1", "12.3456");
    }

    #[test]
    fn test_rounds_to_precision() {
        let d = Dec::parse("1234567891");
        assert_eq!(d.to_string(), "1234567890");
        assert!(d.flags().contains(Condition::ROUNDED));
        assert!(d.flags().contains(Condition::INEXACT));

        let d = Dec::parse("1234567895");
        assert_eq!(d.to_string(), "1234567900");
    }

    #[test]
    fn test_overlong_coefficient_is_inexact() {
        // More digits than even the backing integer holds. The
        // dropped tail still shows up in the flags.
        let d = Dec::parse("123456789012345678901234567890123");
        assert!(d.flags().contains(Condition::INEXACT));
        assert_eq!(d.to_string(), "123456789000000000000000000000000");

        let d = Dec::parse("9.9999999999999999999999999999e-20");
        assert!(d.flags().contains(Condition::INEXACT));
    }

    #[test]
    fn test_round_trip() {
        for s in ["0", "-0", "1", "-1", "12.70", "0.004", "123000", "-4.625"] {
            let d = Dec::parse(s);
            let again = Dec::parse(&d.to_string());
            assert_eq!(d, again, "{s:?}");
            assert_eq!(d.to_string(), again.to_string(), "{s:?}");
        }
    }
}
