// Silver cost calculator and fixed-rate currency conversion.
//
// Amounts are in INR. Rates are "INR per 1 unit of the foreign currency" and
// are static configuration, never fetched.
use crate::error::{DashError, Result};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const GRAMS_PER_KG: f64 = 1000.0;

pub const DEFAULT_WEIGHT_GRAMS: f64 = 100.0;
pub const DEFAULT_PRICE_PER_GRAM: f64 = 75.0;
pub const DEFAULT_CURRENCY: &str = "USD";

static FIXED_RATES: Lazy<BTreeMap<&'static str, f64>> = Lazy::new(|| {
    BTreeMap::from([
        ("USD", 83.50),
        ("EUR", 90.25),
        ("GBP", 105.50),
        ("AED", 22.75),
    ])
});

/// `amount_base / rate`.
pub fn convert(amount_base: f64, rate: f64) -> f64 {
    amount_base / rate
}

#[derive(Debug, Clone)]
pub struct ExchangeRates {
    rates: BTreeMap<String, f64>,
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self::fixed()
    }
}

impl ExchangeRates {
    /// The built-in table.
    pub fn fixed() -> Self {
        Self {
            rates: FIXED_RATES
                .iter()
                .map(|(code, rate)| (code.to_string(), *rate))
                .collect(),
        }
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn rate(&self, code: &str) -> Result<f64> {
        let key = code.trim().to_ascii_uppercase();
        self.rates.get(&key).copied().ok_or_else(|| {
            DashError::Config(format!(
                "unknown currency `{}` (known: {})",
                code,
                self.codes().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    pub fn convert_to(&self, amount_base: f64, code: &str) -> Result<f64> {
        if !(amount_base.is_finite() && amount_base >= 0.0) {
            return Err(DashError::Config(format!(
                "amount must be a non-negative number, got {}",
                amount_base
            )));
        }
        Ok(convert(amount_base, self.rate(code)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeightUnit {
    Grams,
    Kilograms,
}

impl WeightUnit {
    pub fn to_grams(self, weight: f64) -> f64 {
        match self {
            WeightUnit::Grams => weight,
            WeightUnit::Kilograms => weight * GRAMS_PER_KG,
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightUnit::Grams => f.write_str("g"),
            WeightUnit::Kilograms => f.write_str("kg"),
        }
    }
}

impl FromStr for WeightUnit {
    type Err = DashError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "g" | "gram" | "grams" => Ok(WeightUnit::Grams),
            "kg" | "kilogram" | "kilograms" => Ok(WeightUnit::Kilograms),
            other => Err(DashError::Config(format!("unknown weight unit `{}`", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostQuote {
    pub weight_g: f64,
    pub weight_kg: f64,
    pub price_per_gram: f64,
    pub total_inr: f64,
    pub currency: String,
    pub converted: f64,
}

/// Total cost of `weight` of silver at `price_per_gram` INR, plus the same
/// total in `currency`.
pub fn quote(
    rates: &ExchangeRates,
    weight: f64,
    unit: WeightUnit,
    price_per_gram: f64,
    currency: &str,
) -> Result<CostQuote> {
    if !(weight.is_finite() && weight >= 0.0) {
        return Err(DashError::Config(format!("weight must be non-negative, got {}", weight)));
    }
    if !(price_per_gram.is_finite() && price_per_gram >= 0.0) {
        return Err(DashError::Config(format!(
            "price per gram must be non-negative, got {}",
            price_per_gram
        )));
    }
    let weight_g = unit.to_grams(weight);
    let total_inr = weight_g * price_per_gram;
    if !total_inr.is_finite() {
        return Err(DashError::Config(format!(
            "weight × price overflows: {} {} at {} per gram",
            weight, unit, price_per_gram
        )));
    }
    let converted = rates.convert_to(total_inr, currency)?;
    Ok(CostQuote {
        weight_g,
        weight_kg: weight_g / GRAMS_PER_KG,
        price_per_gram,
        total_inr,
        currency: currency.trim().to_ascii_uppercase(),
        converted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_through_usd_rate() {
        assert_eq!(convert(8350.0, 83.5), 100.0);
        let rates = ExchangeRates::fixed();
        assert_eq!(rates.convert_to(8350.0, "usd").unwrap(), 100.0);
    }

    #[test]
    fn unknown_currency_is_config_error() {
        let rates = ExchangeRates::fixed();
        assert!(matches!(rates.rate("JPY"), Err(DashError::Config(_))));
        assert!(matches!(rates.convert_to(1.0, "XXX"), Err(DashError::Config(_))));
    }

    #[test]
    fn fixed_table_has_four_codes() {
        let rates = ExchangeRates::fixed();
        assert_eq!(rates.codes().collect::<Vec<_>>(), vec!["AED", "EUR", "GBP", "USD"]);
        assert_eq!(rates.rate("GBP").unwrap(), 105.50);
    }

    #[test]
    fn quote_with_default_inputs() {
        let rates = ExchangeRates::fixed();
        let q = quote(
            &rates,
            DEFAULT_WEIGHT_GRAMS,
            WeightUnit::Grams,
            DEFAULT_PRICE_PER_GRAM,
            DEFAULT_CURRENCY,
        )
        .unwrap();
        assert_eq!(q.total_inr, 7500.0);
        assert_eq!(q.weight_kg, 0.1);
        assert!((q.converted - 7500.0 / 83.5).abs() < 1e-12);
    }

    #[test]
    fn kilograms_are_scaled() {
        let rates = ExchangeRates::fixed();
        let q = quote(&rates, 0.5, WeightUnit::Kilograms, 80.0, "AED").unwrap();
        assert_eq!(q.weight_g, 500.0);
        assert_eq!(q.total_inr, 40_000.0);
        assert_eq!(q.currency, "AED");
    }

    #[test]
    fn negative_inputs_rejected() {
        let rates = ExchangeRates::fixed();
        assert!(quote(&rates, -1.0, WeightUnit::Grams, 75.0, "USD").is_err());
        assert!(quote(&rates, 1.0, WeightUnit::Grams, -75.0, "USD").is_err());
    }

    #[test]
    fn overflowing_total_names_weight_and_price() {
        let rates = ExchangeRates::fixed();
        match quote(&rates, 1e300, WeightUnit::Kilograms, 1e10, "USD") {
            Err(DashError::Config(msg)) => {
                assert!(msg.contains("weight × price"), "{msg}");
                assert!(!msg.contains("amount"), "{msg}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn huge_finite_total_is_printed_in_full() {
        let rates = ExchangeRates::fixed();
        let q = quote(&rates, 1e12, WeightUnit::Kilograms, 1e5, "USD").unwrap();
        assert_eq!(q.total_inr, 1e20);
        assert_eq!(
            crate::util::format_number(q.total_inr, 2),
            "100,000,000,000,000,000,000.00"
        );
    }

    #[test]
    fn weight_unit_parsing() {
        assert_eq!("Kilograms".parse::<WeightUnit>().unwrap(), WeightUnit::Kilograms);
        assert_eq!("g".parse::<WeightUnit>().unwrap(), WeightUnit::Grams);
        assert!("oz".parse::<WeightUnit>().is_err());
    }
}
