//! Money helpers.
//!
//! Amounts are held as [`Decimal`] rounded to two decimal places everywhere
//! inside the ledger. Display strings such as `KES 45,000.00` only exist at the
//! presentation boundary: [`format_amount`] produces them and [`parse_amount`]
//! reads them back (seed sheets exported from spreadsheets use this form).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::Deserializer;
use serde::Deserialize;
use std::str::FromStr;

use crate::Error;

/// Currency code prefixed to formatted amounts.
pub const CURRENCY: &str = "KES";

/// Number of minor-unit digits kept for every amount.
pub const SCALE: u32 = 2;

/// Rounds an amount to the ledger's scale.
pub fn round(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount for display, e.g. `KES 12,500.00` or `-KES 40.00`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = round(amount);
    let digits = format!("{:.2}", rounded.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{CURRENCY} {grouped}.{fraction}")
}

/// Parses a display string (with or without currency code and thousands
/// separators) back into an amount.
pub fn parse_amount(input: &str) -> Result<Decimal, Error> {
    let trimmed = input.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };
    let rest = rest.strip_prefix(CURRENCY).unwrap_or(rest);
    let cleaned: String = rest
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    let value = Decimal::from_str(&cleaned).map_err(|_| Error::InvalidAmount(input.to_string()))?;
    Ok(round(if negative { -value } else { value }))
}

pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    <Decimal as Deserialize>::deserialize(deserializer).map(round)
}

pub(crate) fn deserialize_optional_amount<'de, D>(
    deserializer: D,
) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Decimal>::deserialize(deserializer).map(|opt| opt.map(round))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(format_amount(dec!(45000)), "KES 45,000.00");
        assert_eq!(format_amount(dec!(1234567.5)), "KES 1,234,567.50");
        assert_eq!(format_amount(dec!(999)), "KES 999.00");
        assert_eq!(format_amount(dec!(0)), "KES 0.00");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_amount(dec!(-1500.25)), "-KES 1,500.25");
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round(dec!(10.005)), dec!(10.01));
        assert_eq!(round(dec!(10.004)), dec!(10.00));
        assert_eq!(round(dec!(-10.005)), dec!(-10.01));
    }

    #[test]
    fn test_parse_display_strings() {
        assert_eq!(parse_amount("KES 45,000").unwrap(), dec!(45000));
        assert_eq!(parse_amount("KES 1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_amount("12500").unwrap(), dec!(12500));
        assert_eq!(parse_amount("-KES 40.00").unwrap(), dec!(-40));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            parse_amount("KES abc"),
            Err(Error::InvalidAmount("KES abc".to_string()))
        );
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn test_deserialize_amount_rounds_csv_field() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(deserialize_with = "deserialize_amount")]
            balance: Decimal,
            #[serde(deserialize_with = "deserialize_optional_amount")]
            paid: Option<Decimal>,
        }

        let data = "balance,paid\n1500.456,10.005\n200,\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let rows: Vec<Row> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows[0].balance, dec!(1500.46));
        assert_eq!(rows[0].paid, Some(dec!(10.01)));
        assert_eq!(rows[1].balance, dec!(200));
        assert_eq!(rows[1].paid, None);
    }

    #[test]
    fn test_format_then_parse_is_stable() {
        let amount = dec!(87654.32);
        assert_eq!(parse_amount(&format_amount(amount)).unwrap(), amount);
    }
}
