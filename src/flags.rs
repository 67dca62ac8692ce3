use bitflags::bitflags;

bitflags! {
    /// Exceptional conditions raised while producing a value.
    ///
    /// Conditions are sticky: an operation may set one or more bits
    /// on its result, and nothing clears them except
    /// [`reset_flags`][crate::Decimal::reset_flags]. A caller that
    /// wants cumulative tracking across a whole computation can OR
    /// the flags of intermediate results together.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct Condition: u8 {
        /// Occurs when the exponent was adjusted to fit the
        /// configured bounds without changing the represented
        /// value.
        const CLAMPED = 0x01;
        /// Occurs when division is attempted with a divisor of
        /// zero, including the zero-divided-by-zero case.
        const DIVISION_BY_ZERO = 0x02;
        /// Occurs when rounding discarded one or more nonzero
        /// digits, so the result differs from the exact value.
        const INEXACT = 0x04;
        /// Occurs when:
        ///
        /// - A string with invalid syntax is converted to a decimal.
        /// - Infinities of opposite signs are added, or of the same
        ///   sign subtracted.
        /// - Zero is multiplied by an infinity of either sign.
        /// - An infinity is divided by an infinity.
        /// - A nonzero finite is divided by zero.
        const INVALID_OPERATION = 0x08;
        /// Occurs when the exponent of a nonzero result exceeds the
        /// configured maximum. [`INEXACT`][Self::INEXACT] and
        /// [`ROUNDED`][Self::ROUNDED] are raised as well.
        const OVERFLOW = 0x10;
        /// Occurs whenever rounding reduced the digit count, even
        /// if every discarded digit was zero.
        const ROUNDED = 0x20;
        /// Occurs when the exponent of an exact nonzero result is
        /// below the configured minimum.
        const SUBNORMAL = 0x40;
        /// Occurs when the exponent of an inexact nonzero result is
        /// below the configured minimum. [`INEXACT`][Self::INEXACT],
        /// [`ROUNDED`][Self::ROUNDED], and
        /// [`SUBNORMAL`][Self::SUBNORMAL] are raised as well.
        const UNDERFLOW = 0x80;
    }
}

impl Default for Condition {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Condition;

    #[test]
    fn test_empty_by_default() {
        assert_eq!(Condition::default(), Condition::empty());
        assert!(!Condition::default().contains(Condition::ROUNDED));
    }

    #[test]
    fn test_accumulate() {
        let mut c = Condition::empty();
        c |= Condition::INEXACT | Condition::ROUNDED;
        c |= Condition::ROUNDED;
        assert!(c.contains(Condition::INEXACT));
        assert!(c.contains(Condition::ROUNDED));
        assert!(!c.contains(Condition::OVERFLOW));
    }
}
