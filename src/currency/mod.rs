use std::{collections::HashMap, fmt};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(from = "String")]
pub struct CurrencyCode(pub String);

impl From<String> for CurrencyCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    /// Strict constructor for intake: three ASCII letters.
    pub fn parse(code: &str) -> Result<Self, EngineError> {
        let candidate = Self::new(code);
        if candidate.is_well_formed() {
            Ok(candidate)
        } else {
            Err(EngineError::InvalidCurrency(code.to_string()))
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.0.len() == 3 && self.0.chars().all(|c| c.is_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonetaryAmount {
    pub value: Decimal,
    pub currency: CurrencyCode,
}

impl MonetaryAmount {
    pub fn new(value: Decimal, currency: CurrencyCode) -> Self {
        Self { value, currency }
    }

    pub fn zero(currency: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Copy of this amount rounded for display.
    pub fn rounded(&self) -> Self {
        Self::new(round_money(self.value), self.currency.clone())
    }
}

/// A directed conversion factor: `1 from = rate to`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExchangeRate {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ExchangeRate {
    pub fn new(from: CurrencyCode, to: CurrencyCode, rate: Decimal) -> Self {
        Self {
            from,
            to,
            rate,
            source: None,
        }
    }
}

/// Directed exchange-rate lookup table.
///
/// Entries are stored per direction and never inferred: `(A, B)` being present
/// says nothing about `(B, A)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<ExchangeRate>", into = "Vec<ExchangeRate>")]
pub struct ExchangeRateTable {
    rates: HashMap<(CurrencyCode, CurrencyCode), ExchangeRate>,
}

impl ExchangeRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table the way the rate refresh job does: every `1 base = rate
    /// code` entry is stored together with its reciprocal.
    pub fn from_base_rates<I>(base: &CurrencyCode, rates: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (CurrencyCode, Decimal)>,
    {
        let mut table = Self::new();
        for (code, rate) in rates {
            if &code == base {
                continue;
            }
            table.insert(ExchangeRate::new(base.clone(), code.clone(), rate))?;
            table.insert(ExchangeRate::new(code, base.clone(), Decimal::ONE / rate))?;
        }
        Ok(table)
    }

    /// Adds or replaces a directed rate. Rates must be strictly positive.
    pub fn insert(&mut self, rate: ExchangeRate) -> Result<(), EngineError> {
        if rate.rate <= Decimal::ZERO {
            return Err(EngineError::InvalidRate {
                from: rate.from.0.clone(),
                to: rate.to.0.clone(),
                rate: rate.rate,
            });
        }
        let key = (rate.from.clone(), rate.to.clone());
        self.rates.insert(key, rate);
        Ok(())
    }

    pub fn with_rate(
        mut self,
        from: &str,
        to: &str,
        rate: Decimal,
    ) -> Result<Self, EngineError> {
        self.insert(ExchangeRate::new(
            CurrencyCode::new(from),
            CurrencyCode::new(to),
            rate,
        ))?;
        Ok(self)
    }

    pub fn rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<Decimal> {
        self.rates
            .get(&(from.clone(), to.clone()))
            .map(|entry| entry.rate)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// All rates ordered by `(from, to)` so serialized tables are stable.
    pub fn all_rates(&self) -> Vec<ExchangeRate> {
        let mut out: Vec<ExchangeRate> = self.rates.values().cloned().collect();
        out.sort_by(|a, b| (&a.from, &a.to).cmp(&(&b.from, &b.to)));
        out
    }
}

impl TryFrom<Vec<ExchangeRate>> for ExchangeRateTable {
    type Error = EngineError;

    fn try_from(rates: Vec<ExchangeRate>) -> Result<Self, Self::Error> {
        let mut table = Self::new();
        for rate in rates {
            table.insert(rate)?;
        }
        Ok(table)
    }
}

impl From<ExchangeRateTable> for Vec<ExchangeRate> {
    fn from(table: ExchangeRateTable) -> Self {
        table.all_rates()
    }
}

/// How a [`ConvertedAmount`] was produced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Conversion {
    Identity,
    Converted { rate: Decimal },
    /// No usable rate for the pair; the amount is still in its source currency.
    Passthrough,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConvertedAmount {
    pub amount: MonetaryAmount,
    pub conversion: Conversion,
}

impl ConvertedAmount {
    pub fn is_converted(&self) -> bool {
        !matches!(self.conversion, Conversion::Passthrough)
    }
}

/// Converts `amount` into `target` using the directed rate from `table`.
///
/// Falls back to the unconverted amount when the pair is missing or the
/// product does not fit in a `Decimal`. Returns full precision; rounding is
/// left to the presentation layer.
pub fn convert(
    amount: &MonetaryAmount,
    target: &CurrencyCode,
    table: &ExchangeRateTable,
) -> ConvertedAmount {
    if &amount.currency == target {
        return ConvertedAmount {
            amount: amount.clone(),
            conversion: Conversion::Identity,
        };
    }
    let converted = table
        .rate(&amount.currency, target)
        .and_then(|rate| Some((amount.value.checked_mul(rate)?, rate)));
    match converted {
        Some((value, rate)) => ConvertedAmount {
            amount: MonetaryAmount::new(value, target.clone()),
            conversion: Conversion::Converted { rate },
        },
        None => ConvertedAmount {
            amount: amount.clone(),
            conversion: Conversion::Passthrough,
        },
    }
}

/// Rounds a monetary figure to exactly two decimals, midpoint away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        "BRL" => "R$".into(),
        "INR" => "₹".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u32 {
    match code {
        "JPY" | "KRW" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Renders an amount with its currency symbol and grouped thousands,
/// e.g. `$1,234.50`.
pub fn format_money(amount: &MonetaryAmount) -> String {
    let precision = minor_units_for(amount.currency.as_str());
    let rounded = amount
        .value
        .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    let body = format!("{:.*}", precision as usize, rounded.abs());
    let (int_part, frac_part) = match body.find('.') {
        Some(pos) => (&body[..pos], &body[pos..]),
        None => (body.as_str(), ""),
    };
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!(
        "{}{}{}{}",
        sign,
        symbol_for(amount.currency.as_str()),
        group_digits(int_part, ','),
        frac_part
    )
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
