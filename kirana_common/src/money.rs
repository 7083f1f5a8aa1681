use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const NPR_CURRENCY_CODE: &str = "NPR";
pub const NPR_CURRENCY_CODE_LOWER: &str = "npr";

//--------------------------------------       Money       -----------------------------------------------------------
/// An amount of Nepalese rupees, stored as an integer number of paisa (100 paisa = 1 rupee).
///
/// Prices coming from the catalog and totals stored against orders are always paisa-exact; floating point never
/// enters the money path.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Money(i64);

op!(binary Money, Add, add);
op!(binary Money, Sub, sub);
op!(inplace Money, SubAssign, sub_assign);
op!(unary Money, Neg, neg);

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a rupee amount: {0}")]
pub struct MoneyConversionError(pub String);

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Money {}

impl Money {
    pub fn from_paisa(paisa: i64) -> Self {
        Self(paisa)
    }

    pub fn from_rupees(rupees: i64) -> Self {
        Self(rupees * 100)
    }

    /// The amount in paisa.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Renders the amount the way the payment gateway expects it in signed messages: no thousands separators and no
    /// trailing decimal zeros. `Rs 100.00` becomes `100`, `Rs 99.50` becomes `99.5`.
    pub fn to_plain_string(&self) -> String {
        let rupees = self.0 / 100;
        let paisa = (self.0 % 100).abs();
        if paisa == 0 {
            format!("{rupees}")
        } else if paisa % 10 == 0 {
            format!("{rupees}.{}", paisa / 10)
        } else {
            format!("{rupees}.{paisa:02}")
        }
    }
}

impl FromStr for Money {
    type Err = MoneyConversionError;

    /// Parses decimal amounts as they appear in gateway payloads, e.g. `1000`, `99.5` or `1,000.00`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s.trim().replace(',', "");
        let mut parts = cleaned.split('.');
        let rupees = parts
            .next()
            .ok_or_else(|| MoneyConversionError(s.to_string()))?
            .parse::<i64>()
            .map_err(|e| MoneyConversionError(format!("{s}: {e}")))?;
        let paisa = match parts.next() {
            None | Some("") => 0,
            Some(frac) if frac.len() <= 2 && frac.chars().all(|c| c.is_ascii_digit()) => {
                let mut v = frac.parse::<i64>().map_err(|e| MoneyConversionError(format!("{s}: {e}")))?;
                if frac.len() == 1 {
                    v *= 10;
                }
                v
            },
            Some(frac) => return Err(MoneyConversionError(format!("{s}: too many decimals in '{frac}'"))),
        };
        if parts.next().is_some() {
            return Err(MoneyConversionError(s.to_string()));
        }
        let sign = if rupees < 0 { -1 } else { 1 };
        Ok(Self(rupees * 100 + sign * paisa))
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rupees = self.0 / 100;
        let paisa = (self.0 % 100).abs();
        write!(f, "Rs {rupees}.{paisa:02}")
    }
}
