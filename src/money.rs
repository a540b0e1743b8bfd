//! Whole-unit monetary amounts.
//!
//! Uses `rust_decimal` internally at scale 0 so stakes, balances and transfers
//! stay integral without floating-point error, and so sums of many rounds stay
//! far away from overflow.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Largest amount accepted from user input, in whole units.
const MAX_INPUT_UNITS: i64 = 1_000_000_000_000_000;

/// A signed amount of whole currency units.
///
/// # Examples
///
/// ```
/// use betting_settlement::Money;
///
/// let amount = Money::from(1_234_567);
/// assert_eq!(amount.to_string(), "1234567");
/// assert_eq!(amount.grouped(','), "1,234,567");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places kept.
    pub const SCALE: u32 = 0;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Creates a new `Money`, truncating any fractional part toward zero.
    pub fn new(value: Decimal) -> Self {
        let mut whole = value.trunc();
        if whole.is_zero() {
            return Money::ZERO;
        }
        whole.rescale(Self::SCALE);
        Money(whole)
    }

    /// Largest amount a single loss may carry.
    pub fn max_input() -> Self {
        Money(Decimal::from(MAX_INPUT_UNITS))
    }

    /// Applies the lenient input policy to a decimal: negative or oversized
    /// values become zero, fractions are truncated.
    pub fn coerce(value: Decimal) -> Self {
        if value.is_sign_negative() || value > Decimal::from(MAX_INPUT_UNITS) {
            return Money::ZERO;
        }
        Money::new(value)
    }

    /// Applies the lenient input policy to free text. Anything that does not
    /// read as a number becomes zero.
    pub fn coerce_str(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Money::ZERO;
        }
        let parsed = Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed));
        match parsed {
            Ok(value) => Money::coerce(value),
            Err(_) => Money::ZERO,
        }
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` for amounts strictly below zero.
    pub fn is_negative(&self) -> bool {
        !self.0.is_zero() && self.0.is_sign_negative()
    }

    /// Returns `true` for amounts strictly above zero.
    pub fn is_positive(&self) -> bool {
        !self.0.is_zero() && self.0.is_sign_positive()
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Formats the amount with `separator` between groups of three digits.
    pub fn grouped(&self, separator: char) -> String {
        let digits = self.0.abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if self.is_negative() {
            out.push('-');
        }
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                out.push(separator);
            }
            out.push(ch);
        }
        out
    }
}

impl From<i64> for Money {
    fn from(units: i64) -> Self {
        Money::new(Decimal::from(units))
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Ok(Money::new(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money::new(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money::new(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money::new(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Conversion of caller-supplied stakes into a loss amount.
///
/// Every implementation follows the same permissive policy: inputs that are
/// negative, non-numeric or absent become zero instead of being rejected.
pub trait IntoAmount {
    fn into_amount(self) -> Money;
}

impl IntoAmount for Money {
    fn into_amount(self) -> Money {
        Money::coerce(self.0)
    }
}

impl IntoAmount for Decimal {
    fn into_amount(self) -> Money {
        Money::coerce(self)
    }
}

impl IntoAmount for &str {
    fn into_amount(self) -> Money {
        Money::coerce_str(self)
    }
}

impl IntoAmount for String {
    fn into_amount(self) -> Money {
        Money::coerce_str(&self)
    }
}

impl IntoAmount for &String {
    fn into_amount(self) -> Money {
        Money::coerce_str(self)
    }
}

impl<T: IntoAmount> IntoAmount for Option<T> {
    fn into_amount(self) -> Money {
        self.map(IntoAmount::into_amount).unwrap_or(Money::ZERO)
    }
}

macro_rules! integer_amount {
    ($($t:ty),*) => {
        $(
            impl IntoAmount for $t {
                fn into_amount(self) -> Money {
                    Money::coerce(Decimal::from(self))
                }
            }
        )*
    };
}

integer_amount!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
