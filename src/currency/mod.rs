use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::SubtrackError;

/// Closed set of currencies the tracker understands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Currency {
    #[serde(rename = "JPY")]
    Jpy,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Jpy => "JPY",
            Currency::Usd => "USD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Jpy => "¥",
            Currency::Usd => "$",
        }
    }

    /// Number of decimal places carried by the currency's minor unit.
    pub fn minor_units(&self) -> u8 {
        match self {
            Currency::Jpy => 0,
            Currency::Usd => 2,
        }
    }

    pub fn all() -> &'static [Currency] {
        &[Currency::Jpy, Currency::Usd]
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = SubtrackError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "JPY" => Ok(Currency::Jpy),
            "USD" => Ok(Currency::Usd),
            _ => Err(SubtrackError::UnsupportedEnum {
                field: "currency",
                value: value.to_string(),
            }),
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Jpy
    }
}

/// USD→JPY quote: how many yen one dollar buys. Both conversion directions
/// derive from this single number.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ExchangeRate(f64);

impl ExchangeRate {
    pub fn new(jpy_per_usd: f64) -> Self {
        Self(jpy_per_usd)
    }

    pub fn quote(&self) -> f64 {
        self.0
    }

    /// Converts an amount between the supported currencies. Identity when the
    /// currencies match; a non-positive or non-finite quote converts to zero
    /// rather than propagating junk into totals.
    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> f64 {
        if from == to {
            return amount;
        }
        if !self.0.is_finite() || self.0 <= 0.0 {
            return 0.0;
        }
        match (from, to) {
            (Currency::Usd, Currency::Jpy) => amount * self.0,
            (Currency::Jpy, Currency::Usd) => amount / self.0,
            _ => amount,
        }
    }
}

/// Renders an amount the way the tracker displays money: whole grouped yen,
/// two-decimal dollars.
pub fn format_amount(amount: f64, currency: Currency) -> String {
    match currency {
        Currency::Jpy => format!("¥{}", group_digits(&format!("{:.0}", amount.round()))),
        Currency::Usd => format!("${:.2}", amount),
    }
}

fn group_digits(digits: &str) -> String {
    let (sign, body) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::new();
    let mut count = 0;
    for ch in body.chars().rev() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, ',');
        }
        grouped.insert(0, ch);
        count += 1;
    }
    format!("{}{}", sign, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_usd_to_jpy_by_multiplying() {
        let rate = ExchangeRate::new(150.0);
        assert_eq!(rate.convert(10.0, Currency::Usd, Currency::Jpy), 1500.0);
    }

    #[test]
    fn converts_jpy_to_usd_by_dividing() {
        let rate = ExchangeRate::new(150.0);
        assert_eq!(rate.convert(1500.0, Currency::Jpy, Currency::Usd), 10.0);
    }

    #[test]
    fn matching_currencies_pass_through() {
        let rate = ExchangeRate::new(150.0);
        assert_eq!(rate.convert(980.0, Currency::Jpy, Currency::Jpy), 980.0);
    }

    #[test]
    fn round_trip_preserves_amount() {
        let rate = ExchangeRate::new(151.37);
        let yen = 12345.0;
        let back = rate.convert(rate.convert(yen, Currency::Jpy, Currency::Usd), Currency::Usd, Currency::Jpy);
        assert!((back - yen).abs() < 1e-6);
    }

    #[test]
    fn formats_grouped_yen_and_decimal_dollars() {
        assert_eq!(format_amount(1234.6, Currency::Jpy), "¥1,235");
        assert_eq!(format_amount(12.3, Currency::Usd), "$12.30");
    }

    #[test]
    fn unknown_currency_code_is_rejected() {
        let err = "EUR".parse::<Currency>().unwrap_err();
        assert!(format!("{err}").contains("currency"));
    }
}
