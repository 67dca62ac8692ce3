//! Exact base-10 decimal arithmetic.
//!
//! This crate implements the General Decimal Arithmetic model: every
//! number is a signed integer coefficient paired with a base-10
//! exponent, so values like `0.1` are represented exactly instead of
//! being approximated in binary. It is meant as a drop-in replacement
//! for binary floating point wherever decimal fidelity matters, such
//! as financial computation and tabular data interchange.
//!
//! The central type is [`Decimal`], parameterized by a compile-time
//! [`Policy`] that fixes the working precision, the [`Rounding`] mode,
//! optional exponent bounds, and what happens when an exceptional
//! condition arises. Four policies are provided out of the box:
//! [`Abort`] (the default), [`Throw`], [`HighPrecision`], and
//! [`NoOp`].
//!
//! ```
//! use exdec::{Decimal, NoOp};
//!
//! let a = Decimal::<NoOp>::parse("1.23E-10");
//! let b = Decimal::<NoOp>::parse("2.00E-10");
//! assert_eq!((a - b).to_string(), "-0.000000000077");
//!
//! let third = Decimal::<NoOp>::from(1) / Decimal::<NoOp>::from(3);
//! assert_eq!(third.to_string(), "0.333333333");
//! assert!(third.flags().contains(exdec::Condition::INEXACT));
//! ```
//!
//! Exceptional conditions never vanish silently. Each operation
//! records the conditions it encountered as sticky [`Condition`]
//! flags on its result, and the policy decides whether a condition is
//! also fatal. Construct from text rather than from binary floats
//! whenever the exact digits matter; see [`Decimal::from_f64`].

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(unused_lifetimes)]
#![deny(unused_qualifications)]
#![warn(clippy::expect_used)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::wildcard_imports)]

mod arith;
mod atod;
mod coeff;
mod decimal;
mod dtoa;
mod flags;
mod policy;
mod round;

pub use coeff::Coeff;
pub use decimal::Decimal;
pub use flags::Condition;
#[cfg(feature = "arbitrary-precision")]
pub use policy::HighPrecision;
pub use policy::{Abort, ConditionError, NoOp, Policy, Rounding, Throw};
