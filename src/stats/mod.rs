//! Period totals over annotated subscriptions.
//!
//! Every function here is a pure reduction over [`SubscriptionView`]s: sums are
//! accumulated at full precision and rounded once per reported figure.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::round_money;
use crate::cycle::{end_of_month, MonthWindow, Schedule};
use crate::subscription::SubscriptionView;

const MONTHS_PER_YEAR: u32 = 12;

/// Whether shared subscriptions are reported at full price or per payer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CostShare {
    #[default]
    Full,
    PerPayer,
}

impl CostShare {
    pub fn effective_price(&self, view: &SubscriptionView) -> Decimal {
        match self {
            CostShare::Full => view.price.value,
            CostShare::PerPayer => view.price.value / Decimal::from(view.payer_count.max(1)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub subscription_count: usize,
    pub total_monthly_subscriptions: Decimal,
    pub total_yearly_subscriptions: Decimal,
    pub total_per_month: Decimal,
    pub total_per_year: Decimal,
    pub remaining_this_month: Decimal,
    pub expected_next_month: Decimal,
    pub total_this_month: Decimal,
}

#[derive(Default)]
struct RawTotals {
    monthly: Decimal,
    yearly: Decimal,
    remaining_this_month: Decimal,
    expected_next_month: Decimal,
    total_this_month: Decimal,
}

/// Rolls `views` into the reporting metrics for the month containing
/// `reference`. Sums saturate at `Decimal::MAX` instead of overflowing.
pub fn compute_stats(views: &[SubscriptionView], reference: NaiveDate, share: CostShare) -> Stats {
    let month_end = end_of_month(reference);
    let this_month = MonthWindow::containing(reference);
    let next_month = MonthWindow::following(reference);

    let mut raw = RawTotals::default();
    for view in views {
        let price = share.effective_price(view);
        let occ = &view.occurrences;

        match view.schedule {
            Schedule::Monthly => raw.monthly = raw.monthly.saturating_add(price),
            Schedule::Yearly => raw.yearly = raw.yearly.saturating_add(price),
        }
        if occ.next <= month_end {
            raw.remaining_this_month = raw.remaining_this_month.saturating_add(price);
        }
        if next_month.contains(occ.next) || next_month.contains(occ.second_next) {
            raw.expected_next_month = raw.expected_next_month.saturating_add(price);
        }
        if this_month.contains(occ.next) || occ.previous.is_some_and(|d| this_month.contains(d)) {
            raw.total_this_month = raw.total_this_month.saturating_add(price);
        }
    }

    let months = Decimal::from(MONTHS_PER_YEAR);
    Stats {
        subscription_count: views.len(),
        total_monthly_subscriptions: round_money(raw.monthly),
        total_yearly_subscriptions: round_money(raw.yearly),
        total_per_month: round_money(raw.monthly.saturating_add(raw.yearly / months)),
        total_per_year: round_money(raw.monthly.saturating_mul(months).saturating_add(raw.yearly)),
        remaining_this_month: round_money(raw.remaining_this_month),
        expected_next_month: round_money(raw.expected_next_month),
        total_this_month: round_money(raw.total_this_month),
    }
}

/// Smoothed monthly cost of a single view, unrounded.
pub fn monthly_run_rate(view: &SubscriptionView, share: CostShare) -> Decimal {
    let price = share.effective_price(view);
    match view.schedule {
        Schedule::Monthly => price,
        Schedule::Yearly => price / Decimal::from(MONTHS_PER_YEAR),
    }
}

/// Groups monthly run-rates by key. A view may contribute to several keys
/// (one per payer, for example); each contribution is computed with `share`.
pub fn breakdown_by<'a, K, I, F, KS>(views: I, share: CostShare, keys: F) -> BTreeMap<K, Decimal>
where
    K: Ord,
    I: IntoIterator<Item = &'a SubscriptionView>,
    F: Fn(usize, &SubscriptionView) -> KS,
    KS: IntoIterator<Item = K>,
{
    let mut totals: BTreeMap<K, Decimal> = BTreeMap::new();
    for (idx, view) in views.into_iter().enumerate() {
        let rate = monthly_run_rate(view, share);
        for key in keys(idx, view) {
            let total = totals.entry(key).or_default();
            *total = total.saturating_add(rate);
        }
    }
    for value in totals.values_mut() {
        *value = round_money(*value);
    }
    totals
}

/// Monthly spend measured against a configured budget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BudgetUsage {
    pub budget: Decimal,
    pub used: Decimal,
    pub remaining: Decimal,
    pub over_budget: Decimal,
}

impl BudgetUsage {
    pub fn evaluate(budget: Decimal, stats: &Stats) -> Self {
        let used = stats.total_per_month;
        let difference = budget.saturating_sub(used);
        Self {
            budget: round_money(budget),
            used,
            remaining: round_money(difference.max(Decimal::ZERO)),
            over_budget: round_money((-difference).max(Decimal::ZERO)),
        }
    }

    pub fn percent_used(&self) -> Option<Decimal> {
        if self.budget.is_zero() {
            return None;
        }
        let ratio = self.used.checked_div(self.budget)?;
        Some(round_money(ratio.saturating_mul(Decimal::ONE_HUNDRED)))
    }
}
