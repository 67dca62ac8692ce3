use exdec::{Condition, Decimal, NoOp, Policy, Rounding};
use proptest::prelude::*;

type Dec = Decimal<NoOp>;

fn dec(s: &str) -> Dec {
    Dec::parse(s)
}

/// Three digits of precision, otherwise like [`NoOp`].
struct Precision3;

impl Policy for Precision3 {
    type Coeff = u64;

    const PRECISION: u32 = 3;
    const ROUNDING: Rounding = Rounding::HalfUp;
}

#[test]
fn subtract_small_magnitudes() {
    let r = dec("1.23E-10") - dec("2.00E-10");
    assert_eq!(r.to_string(), "-0.000000000077");
    assert!(r.flags().is_empty());
}

#[test]
fn add_rounds_at_low_precision() {
    let a = Decimal::<Precision3>::parse("0.999E-2");
    let b = Decimal::<Precision3>::parse("0.1E-2");
    let r = a + b;
    assert_eq!(r.to_string(), "0.0110");
    assert!(r.flags().contains(Condition::INEXACT));
    assert!(r.flags().contains(Condition::ROUNDED));
}

#[cfg(feature = "arbitrary-precision")]
#[test]
fn subtract_across_wide_exponent_gap() {
    use exdec::HighPrecision;

    let a = Decimal::<HighPrecision>::parse("10000e+9");
    let b = Decimal::<HighPrecision>::parse("7");
    assert_eq!((a - b).to_string(), "9999999999993");
}

#[test]
fn divide_one_by_three() {
    let r = dec("1") / dec("3");
    assert_eq!(r.to_string(), "0.333333333");
    assert!(r.flags().contains(Condition::INEXACT));
    assert!(r.flags().contains(Condition::ROUNDED));
    assert!(!r.flags().contains(Condition::DIVISION_BY_ZERO));
    assert!(!r.flags().contains(Condition::INVALID_OPERATION));
}

#[test]
fn infinity_minus_infinity() {
    let r = dec("Inf") - dec("Inf");
    assert_eq!(r.to_string(), "NaN");
    assert!(r.flags().contains(Condition::INVALID_OPERATION));
}

#[test]
fn nonzero_divided_by_zero() {
    let r = dec("1000") / dec("0");
    assert_eq!(r.to_string(), "Infinity");
    assert!(r.flags().contains(Condition::DIVISION_BY_ZERO));
    assert!(r.flags().contains(Condition::INVALID_OPERATION));
}

#[test]
fn format_positive_exponent() {
    assert_eq!(dec("30.5E10").to_string(), "305000000000");
}

#[test]
fn format_negative_exponent() {
    assert_eq!(dec("1.2345678E-7").to_string(), "0.00000012345678");
}

#[test]
fn parse_garbage_is_flagged_nan() {
    let d = dec("not a number");
    assert!(d.is_nan());
    assert!(d.flags().contains(Condition::INVALID_OPERATION));
}

#[cfg(feature = "arbitrary-precision")]
#[test]
fn high_precision_division() {
    use exdec::HighPrecision;

    let r = Decimal::<HighPrecision>::parse("1") / Decimal::<HighPrecision>::parse("3");
    assert_eq!(
        r.to_string(),
        "0.3333333333333333333333333333333333333333333333333333333333333333",
    );
    assert!(r.flags().contains(Condition::INEXACT));
}

fn arb_dec() -> impl Strategy<Value = Dec> {
    (any::<bool>(), 0u64..1_000_000_000, -20i32..20).prop_map(|(sign, coeff, exp)| {
        let mut s = String::new();
        if sign {
            s.push('-');
        }
        s.push_str(&coeff.to_string());
        s.push('e');
        s.push_str(&exp.to_string());
        Dec::parse(&s)
    })
}

proptest! {
    #[test]
    fn prop_round_trip(d in arb_dec()) {
        let again = Dec::parse(&d.to_string());
        prop_assert_eq!(&again, &d);
        prop_assert_eq!(again.to_string(), d.to_string());
    }

    #[test]
    fn prop_add_commutes(a in arb_dec(), b in arb_dec()) {
        prop_assert_eq!(a.clone() + b.clone(), b + a);
    }

    #[test]
    fn prop_mul_commutes(a in arb_dec(), b in arb_dec()) {
        prop_assert_eq!(a.clone() * b.clone(), b * a);
    }

    #[test]
    fn prop_add_negation_is_zero(d in arb_dec()) {
        let r = d.clone() + (-d);
        prop_assert!(r.is_zero());
    }

    #[test]
    fn prop_mul_identity(d in arb_dec()) {
        prop_assert_eq!(d.clone() * Dec::from(1), d.clone());
        prop_assert!((d * Dec::from(0)).is_zero());
    }

    #[test]
    fn prop_div_identity(d in arb_dec()) {
        prop_assert_eq!(d.clone() / Dec::from(1), d);
    }

    #[test]
    fn prop_compare_reflexive(d in arb_dec()) {
        prop_assert_eq!(d.compare(&d), core::cmp::Ordering::Equal);
    }

    #[test]
    fn prop_precision_invariant(a in arb_dec(), b in arb_dec()) {
        // No operation may leave more significant digits than the
        // precision, so re-parsing a result can discard only
        // trailing zeros and must compare equal.
        for r in [a.clone() + b.clone(), a.clone() - b.clone(), a.clone() * b.clone(), a / b] {
            if r.is_finite() {
                let again = Dec::parse(&r.to_string());
                prop_assert!(!again.flags().contains(Condition::INEXACT), "{r}");
                prop_assert_eq!(&again, &r);
            }
        }
    }

    #[test]
    fn prop_sorting_never_panics(mut values in proptest::collection::vec(arb_dec(), 0..20)) {
        values.push(Dec::nan());
        values.push(Dec::infinity());
        values.push(-Dec::infinity());
        values.sort();
        for pair in values.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }
}
