use core::fmt;

use crate::{
    coeff::Coeff,
    decimal::{Class, Decimal},
    policy::Policy,
};

impl<P: Policy> Decimal<P> {
    /// Writes the canonical text form into `dst`.
    ///
    /// The output is plain decimal notation with no exponent
    /// marker: the coefficient digits with a point inserted or
    /// zeros appended as the exponent requires. Non-finite values
    /// print as `Infinity` and `NaN`, prefixed with `-` when
    /// negative.
    pub fn write_to<W: fmt::Write>(&self, dst: &mut W) -> fmt::Result {
        if self.sign {
            dst.write_char('-')?;
        }
        match self.class {
            Class::Infinite => return dst.write_str("Infinity"),
            Class::Nan => return dst.write_str("NaN"),
            Class::Finite => {}
        }

        let mut digits = String::new();
        self.coeff.write_digits(&mut digits)?;

        if self.exp >= 0 {
            dst.write_str(&digits)?;
            for _ in 0..self.exp {
                dst.write_char('0')?;
            }
            return Ok(());
        }

        let frac = self.exp.unsigned_abs() as usize;
        if frac < digits.len() {
            let (int, fract) = digits.split_at(digits.len() - frac);
            dst.write_str(int)?;
            dst.write_char('.')?;
            dst.write_str(fract)
        } else {
            dst.write_str("0.")?;
            for _ in 0..frac - digits.len() {
                dst.write_char('0')?;
            }
            dst.write_str(&digits)
        }
    }
}

impl<P: Policy> fmt::Display for Decimal<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

impl<P: Policy> fmt::Debug for Decimal<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = self.sign as u8;
        match self.class {
            Class::Nan => write!(f, "[{sign},NaN]"),
            Class::Infinite => write!(f, "[{sign},inf]"),
            Class::Finite => write!(f, "[{sign},{:?},{}]", self.coeff, self.exp),
        }
    }
}
