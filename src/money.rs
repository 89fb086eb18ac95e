//! Fixed-point money amounts.

use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
};

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// An amount of money held as an integer number of cents.
///
/// Amounts are parsed from JSON numbers or numeric strings, rounded half
/// away from zero to two decimal places, and serialized as JSON numbers.
/// Arithmetic on amounts is exact.
///
/// Accepted amounts are at most [Amount::MAX] in size, so totals over any
/// realistic number of records fit into an `i64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// The amount zero.
    pub const ZERO: Amount = Amount(0);

    /// The largest accepted amount, one hundred billion.
    pub const MAX: Amount = Amount(10_000_000_000_000);

    /// Create an amount from a number of cents.
    #[cfg(test)]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create an amount from a decimal, rounding to the nearest cent.
    ///
    /// # Errors
    ///
    /// Returns [Error::AmountOutOfRange] if the rounded amount is larger
    /// than [Amount::MAX] or smaller than its negation.
    pub fn try_from_decimal(value: Decimal) -> Result<Self, Error> {
        value
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .filter(|cents| cents.unsigned_abs() <= Self::MAX.0.unsigned_abs())
            .map(Self)
            .ok_or(Error::AmountOutOfRange)
    }

    /// The amount as a decimal with two decimal places.
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Whether this amount is zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Parsing the decimal text gives the f64 closest to the exact value.
        let value: f64 = self.to_string().parse().map_err(serde::ser::Error::custom)?;

        serializer.serialize_f64(value)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;

        Amount::try_from_decimal(value).map_err(serde::de::Error::custom)
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Amount)
    }
}

#[cfg(test)]
mod amount_tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::{Error, money::Amount};

    #[test]
    fn rounds_to_nearest_cent() {
        let amount = Amount::try_from_decimal(Decimal::from_str("12.345").unwrap());

        assert_eq!(amount, Ok(Amount::from_cents(1235)));
    }

    #[test]
    fn rounds_negative_half_away_from_zero() {
        let amount = Amount::try_from_decimal(Decimal::from_str("-0.005").unwrap());

        assert_eq!(amount, Ok(Amount::from_cents(-1)));
    }

    #[test]
    fn rejects_amount_that_does_not_fit() {
        let amount = Amount::try_from_decimal(Decimal::MAX);

        assert_eq!(amount, Err(Error::AmountOutOfRange));
    }

    #[test]
    fn accepts_the_largest_amount() {
        let amount = Amount::try_from_decimal(Decimal::from(100_000_000_000_i64));

        assert_eq!(amount, Ok(Amount::MAX));
    }

    #[test]
    fn rejects_amount_above_the_largest() {
        let too_large = Decimal::from_str("100000000000.01").unwrap();

        assert_eq!(
            Amount::try_from_decimal(too_large),
            Err(Error::AmountOutOfRange)
        );
        assert_eq!(
            Amount::try_from_decimal(-too_large),
            Err(Error::AmountOutOfRange)
        );
    }

    #[test]
    fn rejects_json_amount_that_would_overflow_a_total() {
        let result = serde_json::from_value::<Amount>(json!("90000000000000000"));

        assert!(result.is_err());
    }

    #[test]
    fn many_of_the_largest_amounts_sum_without_overflow() {
        let total: Amount = std::iter::repeat_n(Amount::MAX, 1000).sum();

        assert_eq!(total, Amount::from_cents(10_000_000_000_000_000));
    }

    #[test]
    fn sums_are_exact() {
        let amounts: Vec<Amount> = [0.1, 0.2]
            .into_iter()
            .map(|value| serde_json::from_value(json!(value)).unwrap())
            .collect();

        let total: Amount = amounts.iter().sum();

        assert_eq!(total, Amount::from_cents(30));
        assert_eq!(total.to_string(), "0.30");
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let from_number: Amount = serde_json::from_value(json!(150.5)).unwrap();
        let from_string: Amount = serde_json::from_value(json!("150.50")).unwrap();

        assert_eq!(from_number, Amount::from_cents(15050));
        assert_eq!(from_string, from_number);
    }

    #[test]
    fn serializes_as_number() {
        let value = serde_json::to_value(Amount::from_cents(-4599)).unwrap();

        assert_eq!(value, json!(-45.99));
    }
}
