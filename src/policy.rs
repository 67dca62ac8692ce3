use std::process;

#[cfg(feature = "arbitrary-precision")]
use num_bigint::BigUint;
use thiserror::Error;

use crate::{coeff::Coeff, decimal::Decimal, flags::Condition};

/// How digits beyond the working precision are discarded.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Rounding {
    /// Truncates toward zero.
    Down,
    /// Rounds to the nearest value; 0.5 rounds away from zero.
    #[default]
    HalfUp,
    /// Rounds to the nearest value; 0.5 rounds to the nearest even
    /// digit.
    HalfEven,
    /// Rounds toward positive infinity.
    Ceiling,
    /// Rounds toward negative infinity.
    Floor,
    /// Rounds to the nearest value; 0.5 rounds toward zero.
    HalfDown,
    /// Rounds away from zero if any discarded digit is nonzero.
    Up,
    /// Truncates, except that a result ending in 0 or 5 is rounded
    /// away from zero if any discarded digit is nonzero.
    ZeroFiveUp,
}

/// The error raised by the [`Throw`] policy when a serious condition
/// occurs.
///
/// It is delivered via [`std::panic::panic_any`], so it can be
/// recovered with [`std::panic::catch_unwind`] and downcast.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("decimal condition {condition:?} raised producing {value}")]
pub struct ConditionError {
    /// The condition that was raised.
    pub condition: Condition,
    /// The offending result, in its canonical text form.
    pub value: String,
}

/// Compile-time configuration for [`Decimal`].
///
/// A policy fixes the working precision, the coefficient
/// representation, the rounding mode, optional exponent bounds, and
/// one callback per condition. Callbacks default to doing nothing
/// and compile away entirely when not overridden; an override runs
/// synchronously on the calling thread, right after the flag is set
/// on the result it receives.
///
/// `Coeff` must be wide enough to hold the product of two
/// `PRECISION`-digit values. The bundled backends give `u64` for
/// precisions up to 9, `u128` up to 19, and `BigUint` beyond;
/// a policy that violates the rule fails to compile.
pub trait Policy: Sized {
    /// The coefficient representation.
    type Coeff: Coeff;

    /// The maximum number of decimal digits a coefficient may
    /// carry. Must be in [2, 2³² − 2].
    const PRECISION: u32;

    /// The rounding mode.
    const ROUNDING: Rounding;

    /// The smallest allowed exponent, if bounded.
    const MIN_EXPONENT: Option<i32> = None;

    /// The largest allowed exponent, if bounded.
    const MAX_EXPONENT: Option<i32> = None;

    /// Called when [`Condition::CLAMPED`] is raised.
    fn on_clamped(_result: &mut Decimal<Self>) {}

    /// Called when [`Condition::DIVISION_BY_ZERO`] is raised.
    fn on_division_by_zero(_result: &mut Decimal<Self>) {}

    /// Called when [`Condition::INEXACT`] is raised.
    fn on_inexact(_result: &mut Decimal<Self>) {}

    /// Called when [`Condition::INVALID_OPERATION`] is raised.
    fn on_invalid_operation(_result: &mut Decimal<Self>) {}

    /// Called when [`Condition::OVERFLOW`] is raised.
    fn on_overflow(_result: &mut Decimal<Self>) {}

    /// Called when [`Condition::ROUNDED`] is raised.
    fn on_rounded(_result: &mut Decimal<Self>) {}

    /// Called when [`Condition::SUBNORMAL`] is raised.
    fn on_subnormal(_result: &mut Decimal<Self>) {}

    /// Called when [`Condition::UNDERFLOW`] is raised.
    fn on_underflow(_result: &mut Decimal<Self>) {}
}

/// Prints the condition to stderr and aborts the process.
#[cold]
fn fatal<P: Policy>(condition: Condition, result: &Decimal<P>) -> ! {
    eprintln!("decimal condition {condition:?} raised producing {result}");
    process::abort()
}

/// Panics with a [`ConditionError`] payload.
#[cold]
fn throw<P: Policy>(condition: Condition, result: &Decimal<P>) -> ! {
    std::panic::panic_any(ConditionError {
        condition,
        value: result.to_string(),
    })
}

/// The default policy: 9 digits, [`Rounding::HalfUp`], and an abort
/// on any serious condition.
///
/// Division by zero, invalid operations, overflow, and underflow
/// terminate the process. Rounding conditions only set flags.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Abort;

impl Policy for Abort {
    type Coeff = u64;

    const PRECISION: u32 = 9;
    const ROUNDING: Rounding = Rounding::HalfUp;

    fn on_division_by_zero(result: &mut Decimal<Self>) {
        fatal(Condition::DIVISION_BY_ZERO, result)
    }

    fn on_invalid_operation(result: &mut Decimal<Self>) {
        fatal(Condition::INVALID_OPERATION, result)
    }

    fn on_overflow(result: &mut Decimal<Self>) {
        fatal(Condition::OVERFLOW, result)
    }

    fn on_underflow(result: &mut Decimal<Self>) {
        fatal(Condition::UNDERFLOW, result)
    }
}

/// Like [`Abort`], but serious conditions panic with a typed
/// [`ConditionError`] instead of aborting.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Throw;

impl Policy for Throw {
    type Coeff = u64;

    const PRECISION: u32 = 9;
    const ROUNDING: Rounding = Rounding::HalfUp;

    fn on_division_by_zero(result: &mut Decimal<Self>) {
        throw(Condition::DIVISION_BY_ZERO, result)
    }

    fn on_invalid_operation(result: &mut Decimal<Self>) {
        throw(Condition::INVALID_OPERATION, result)
    }

    fn on_overflow(result: &mut Decimal<Self>) {
        throw(Condition::OVERFLOW, result)
    }

    fn on_underflow(result: &mut Decimal<Self>) {
        throw(Condition::UNDERFLOW, result)
    }
}

/// Like [`Abort`], but with 64 digits of precision on an
/// arbitrary-precision coefficient.
#[cfg(feature = "arbitrary-precision")]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct HighPrecision;

#[cfg(feature = "arbitrary-precision")]
impl Policy for HighPrecision {
    type Coeff = BigUint;

    const PRECISION: u32 = 64;
    const ROUNDING: Rounding = Rounding::HalfUp;

    fn on_division_by_zero(result: &mut Decimal<Self>) {
        fatal(Condition::DIVISION_BY_ZERO, result)
    }

    fn on_invalid_operation(result: &mut Decimal<Self>) {
        fatal(Condition::INVALID_OPERATION, result)
    }

    fn on_overflow(result: &mut Decimal<Self>) {
        fatal(Condition::OVERFLOW, result)
    }

    fn on_underflow(result: &mut Decimal<Self>) {
        fatal(Condition::UNDERFLOW, result)
    }
}

/// 9 digits, [`Rounding::HalfUp`], and no callbacks at all.
///
/// Conditions only set flags on the result; inspecting them is up
/// to the caller.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct NoOp;

impl Policy for NoOp {
    type Coeff = u64;

    const PRECISION: u32 = 9;
    const ROUNDING: Rounding = Rounding::HalfUp;
}
