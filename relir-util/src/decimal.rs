use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecimalParseError {
    #[error("empty decimal literal")]
    Empty,
    #[error("unexpected character {0:?} in decimal literal")]
    InvalidCharacter(char),
    #[error("decimal literal has no digits")]
    NoDigits,
    #[error("decimal coefficient does not fit in 128 bits")]
    CoefficientOverflow,
    #[error("decimal exponent is out of range")]
    ExponentOverflow,
}

/// A fixed-point number: `(-1)^negative * magnitude * 10^-scale`.
///
/// The sign is kept separately from the magnitude, so negative zero is a
/// distinct value and survives a round trip through the codec.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decimal {
    negative: bool,
    magnitude: u128,
    scale: i32,
}

impl Decimal {
    pub const ZERO: Decimal = Decimal::new(false, 0, 0);

    pub const fn new(negative: bool, magnitude: u128, scale: i32) -> Self {
        Self {
            negative,
            magnitude,
            scale,
        }
    }

    pub const fn from_i64(value: i64) -> Self {
        Self::new(value < 0, value.unsigned_abs() as u128, 0)
    }

    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    pub const fn magnitude(&self) -> u128 {
        self.magnitude
    }

    pub const fn scale(&self) -> i32 {
        self.scale
    }

    /// Returns the value as an integer when it has scale zero and fits an `i64`.
    ///
    /// Negative zero has no integer counterpart and yields `None`.
    pub fn to_i64(&self) -> Option<i64> {
        if self.scale != 0 {
            return None;
        }
        if self.negative {
            if self.magnitude == 0 {
                return None;
            }
            let magnitude = i128::try_from(self.magnitude).ok()?;
            i64::try_from(-magnitude).ok()
        } else {
            i64::try_from(self.magnitude).ok()
        }
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl FromStr for Decimal {
    type Err = DecimalParseError;

    /// Parses literals like `-3.14`, `+12`, `.5`, `1.5e-3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(DecimalParseError::Empty);
        }

        let (negative, body) = match s.as_bytes()[0] {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };
        let (mantissa, exponent) = match body.find(['e', 'E']) {
            Some(index) => (&body[..index], Some(&body[index + 1..])),
            None => (body, None),
        };

        let mut magnitude: u128 = 0;
        let mut scale: i64 = 0;
        let mut digits = 0usize;
        let mut seen_point = false;
        for c in mantissa.chars() {
            match c {
                '.' if !seen_point => seen_point = true,
                '0'..='9' => {
                    let digit = u128::from(c as u8 - b'0');
                    magnitude = magnitude
                        .checked_mul(10)
                        .and_then(|m| m.checked_add(digit))
                        .ok_or(DecimalParseError::CoefficientOverflow)?;
                    digits += 1;
                    if seen_point {
                        scale += 1;
                    }
                }
                _ => return Err(DecimalParseError::InvalidCharacter(c)),
            }
        }
        if digits == 0 {
            return Err(DecimalParseError::NoDigits);
        }

        if let Some(exponent) = exponent {
            let exponent: i64 = exponent
                .parse()
                .map_err(|_| DecimalParseError::ExponentOverflow)?;
            scale = scale
                .checked_sub(exponent)
                .ok_or(DecimalParseError::ExponentOverflow)?;
        }
        let scale = i32::try_from(scale)
            .map_err(|_| DecimalParseError::ExponentOverflow)?;

        Ok(Decimal::new(negative, magnitude, scale))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        let digits = self.magnitude.to_string();
        if self.scale <= 0 {
            f.write_str(&digits)?;
            if self.magnitude != 0 {
                for _ in 0..self.scale.unsigned_abs() {
                    f.write_str("0")?;
                }
            }
            return Ok(());
        }

        let scale = self.scale.unsigned_abs() as usize;
        if digits.len() > scale {
            let (whole, fraction) = digits.split_at(digits.len() - scale);
            write!(f, "{whole}.{fraction}")
        } else {
            write!(f, "0.{digits:0>scale$}")
        }
    }
}
