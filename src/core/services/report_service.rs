use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::currency::{round_money, Conversion, CurrencyCode, ExchangeRateTable, MonetaryAmount};
use crate::cycle::{DueStatus, Schedule};
use crate::stats::{breakdown_by, compute_stats, monthly_run_rate, BudgetUsage, CostShare, Stats};
use crate::subscription::{annotate, AnnotatedSubscription, Subscription, SubscriptionView};
use crate::utils::persistence::{load_snapshot_from_file, Snapshot};

use super::{ServiceError, ServiceResult};

const UNCATEGORIZED: &str = "Uncategorized";

/// Per-request knobs, usually derived from [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub currency: CurrencyCode,
    pub cost_share: CostShare,
    pub notify_days_before: u32,
    pub monthly_budget: Option<Decimal>,
}

impl ReportOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            currency: config.main_currency.clone(),
            cost_share: config.cost_share,
            notify_days_before: config.notify_days_before,
            monthly_budget: config.monthly_budget,
        }
    }

    pub fn with_currency(mut self, code: &str) -> ServiceResult<Self> {
        self.currency = CurrencyCode::parse(code)?;
        Ok(self)
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionReportRow {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub schedule: Schedule,
    pub payer_count: u32,
    pub original_price: MonetaryAmount,
    pub normalized_price: MonetaryAmount,
    pub conversion: Conversion,
    pub monthly_cost: Decimal,
    pub previous_payment_date: Option<NaiveDate>,
    pub next_payment_date: NaiveDate,
    pub second_next_payment_date: NaiveDate,
    pub due_status: DueStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MostExpensive {
    pub id: Uuid,
    pub name: String,
    pub monthly_cost: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub reference_date: NaiveDate,
    pub currency: CurrencyCode,
    pub cost_share: CostShare,
    pub subscriptions: Vec<SubscriptionReportRow>,
    pub stats: Stats,
    pub inactive_count: usize,
    /// Names of rows that failed intake validation and were left out.
    pub rejected: Vec<String>,
    /// Names of rows whose price could not be converted.
    pub unconverted: Vec<String>,
    pub by_category: BTreeMap<String, Decimal>,
    pub by_payer: BTreeMap<String, Decimal>,
    pub most_expensive: Option<MostExpensive>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetUsage>,
}

/// Builds reports by annotating raw subscriptions and handing the views to
/// the aggregator.
pub struct ReportService;

impl ReportService {
    pub fn build(
        subscriptions: &[Subscription],
        rates: &ExchangeRateTable,
        options: &ReportOptions,
        reference: NaiveDate,
    ) -> Report {
        let mut rejected = Vec::new();
        let mut inactive_count = 0usize;
        let mut accepted: Vec<&Subscription> = Vec::with_capacity(subscriptions.len());
        for subscription in subscriptions {
            if let Err(err) = subscription.validate() {
                tracing::warn!(name = %subscription.name, error = %err, "skipping invalid subscription");
                rejected.push(subscription.name.clone());
                continue;
            }
            if subscription.inactive {
                tracing::debug!(name = %subscription.name, "inactive subscription left out of totals");
                inactive_count += 1;
                continue;
            }
            accepted.push(subscription);
        }

        let annotated: Vec<AnnotatedSubscription<'_>> = accepted
            .par_iter()
            .map(|subscription| annotate(*subscription, &options.currency, rates, reference))
            .collect();

        let mut unconverted = Vec::new();
        for item in &annotated {
            if item.conversion == Conversion::Passthrough {
                tracing::warn!(
                    name = %item.subscription.name,
                    from = %item.subscription.currency,
                    to = %options.currency,
                    "exchange rate missing, reporting unconverted price"
                );
                unconverted.push(item.subscription.name.clone());
            }
        }

        let views: Vec<SubscriptionView> = annotated.iter().map(|item| item.view.clone()).collect();
        let share = options.cost_share;
        let stats = compute_stats(&views, reference, share);

        let by_category = breakdown_by(&views, share, |idx, _| {
            let category = annotated[idx]
                .subscription
                .category
                .clone()
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            [category]
        });
        let by_payer = breakdown_by(&views, share, |idx, _| {
            annotated[idx].subscription.payer_ids.clone()
        });

        let most_expensive = annotated
            .iter()
            .max_by_key(|item| monthly_run_rate(&item.view, share))
            .map(|item| MostExpensive {
                id: item.subscription.id,
                name: item.subscription.name.clone(),
                monthly_cost: round_money(monthly_run_rate(&item.view, share)),
            });

        let rows = annotated
            .iter()
            .map(|item| Self::row(item, reference, options))
            .collect();

        let budget = options
            .monthly_budget
            .map(|budget| BudgetUsage::evaluate(budget, &stats));

        tracing::debug!(
            reference = %reference,
            active = stats.subscription_count,
            inactive = inactive_count,
            rejected = rejected.len(),
            "report built"
        );

        Report {
            reference_date: reference,
            currency: options.currency.clone(),
            cost_share: share,
            subscriptions: rows,
            stats,
            inactive_count,
            rejected,
            unconverted,
            by_category,
            by_payer,
            most_expensive,
            budget,
        }
    }

    /// Loads a snapshot from disk and builds its report.
    pub fn build_from_file(
        path: &Path,
        options: &ReportOptions,
        reference: NaiveDate,
    ) -> ServiceResult<Report> {
        let snapshot: Snapshot = load_snapshot_from_file(path)?;
        Ok(Self::build(
            &snapshot.subscriptions,
            &snapshot.rates,
            options,
            reference,
        ))
    }

    /// Subscriptions ordered by their next payment date, soonest first.
    pub fn upcoming(report: &Report, limit: Option<usize>) -> Vec<&SubscriptionReportRow> {
        let mut rows: Vec<&SubscriptionReportRow> = report.subscriptions.iter().collect();
        rows.sort_by(|a, b| {
            a.next_payment_date
                .cmp(&b.next_payment_date)
                .then_with(|| a.name.cmp(&b.name))
        });
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        rows
    }

    /// Looks up a single row by name, case-insensitively.
    pub fn find<'r>(report: &'r Report, name: &str) -> ServiceResult<&'r SubscriptionReportRow> {
        report
            .subscriptions
            .iter()
            .find(|row| row.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ServiceError::Invalid(format!("subscription `{}` not found", name)))
    }

    fn row(
        item: &AnnotatedSubscription<'_>,
        reference: NaiveDate,
        options: &ReportOptions,
    ) -> SubscriptionReportRow {
        let occ = item.view.occurrences;
        SubscriptionReportRow {
            id: item.subscription.id,
            name: item.subscription.name.clone(),
            category: item.subscription.category.clone(),
            schedule: item.view.schedule,
            payer_count: item.view.payer_count,
            original_price: item.subscription.amount(),
            normalized_price: item.view.price.rounded(),
            conversion: item.conversion,
            monthly_cost: round_money(monthly_run_rate(&item.view, options.cost_share)),
            previous_payment_date: occ.previous,
            next_payment_date: occ.next,
            second_next_payment_date: occ.second_next,
            due_status: DueStatus::classify(occ.next, reference, options.notify_days_before),
        }
    }
}
