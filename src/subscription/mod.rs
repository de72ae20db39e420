//! Subscription records and the per-request views built from them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::{convert, Conversion, CurrencyCode, ExchangeRateTable, MonetaryAmount};
use crate::cycle::{compute_occurrences, CycleOccurrences, RecurrenceRule, Schedule};
use crate::errors::EngineError;

/// Largest price accepted at intake, one trillion. Keeps converted prices and yearly totals
/// well inside `Decimal`'s range.
pub const MAX_PRICE: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// A subscription row as stored by the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub currency: CurrencyCode,
    pub schedule: Schedule,
    pub first_payment_date: NaiveDate,
    #[serde(default)]
    pub payer_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub inactive: bool,
}

impl Subscription {
    pub fn new(
        name: impl Into<String>,
        price: Decimal,
        currency: CurrencyCode,
        schedule: Schedule,
        first_payment_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price,
            currency,
            schedule,
            first_payment_date,
            payer_ids: Vec::new(),
            category: None,
            inactive: false,
        }
    }

    pub fn with_payers<I, S>(mut self, payers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.payer_ids = payers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Intake checks; rows that pass are safe to hand to the engine.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(EngineError::InvalidAmount(format!(
                "subscription `{}` has negative price {}",
                self.name, self.price
            )));
        }
        if self.price > MAX_PRICE {
            return Err(EngineError::InvalidAmount(format!(
                "subscription `{}` has price {} above the limit of {}",
                self.name, self.price, MAX_PRICE
            )));
        }
        if !self.currency.is_well_formed() {
            return Err(EngineError::InvalidCurrency(self.currency.0.clone()));
        }
        Ok(())
    }

    pub fn rule(&self) -> RecurrenceRule {
        RecurrenceRule::new(self.schedule, self.first_payment_date)
    }

    pub fn amount(&self) -> MonetaryAmount {
        MonetaryAmount::new(self.price, self.currency.clone())
    }

    /// Rows without explicit payers are paid by their owner alone.
    pub fn payer_count(&self) -> u32 {
        u32::try_from(self.payer_ids.len()).unwrap_or(u32::MAX).max(1)
    }
}

/// The aggregator's input element: an already-normalized price plus the
/// cycle dates computed for the current reference date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionView {
    pub price: MonetaryAmount,
    pub schedule: Schedule,
    pub occurrences: CycleOccurrences,
    pub payer_count: u32,
}

impl SubscriptionView {
    pub fn new(
        price: MonetaryAmount,
        schedule: Schedule,
        occurrences: CycleOccurrences,
        payer_count: u32,
    ) -> Result<Self, EngineError> {
        if payer_count == 0 {
            return Err(EngineError::InvalidPayerCount(payer_count));
        }
        Ok(Self {
            price,
            schedule,
            occurrences,
            payer_count,
        })
    }
}

/// A view together with the record it came from and how its price was
/// normalized.
#[derive(Debug, Clone)]
pub struct AnnotatedSubscription<'a> {
    pub subscription: &'a Subscription,
    pub view: SubscriptionView,
    pub conversion: Conversion,
}

/// Composes the cycle calculator and currency normalizer for one row.
pub fn annotate<'a>(
    subscription: &'a Subscription,
    target: &CurrencyCode,
    rates: &ExchangeRateTable,
    reference: NaiveDate,
) -> AnnotatedSubscription<'a> {
    let occurrences = compute_occurrences(&subscription.rule(), reference);
    let converted = convert(&subscription.amount(), target, rates);
    AnnotatedSubscription {
        subscription,
        view: SubscriptionView {
            price: converted.amount,
            schedule: subscription.schedule,
            occurrences,
            payer_count: subscription.payer_count(),
        },
        conversion: converted.conversion,
    }
}
