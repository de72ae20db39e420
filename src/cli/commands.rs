use crate::cli::output;
use crate::cli::{usage, CliError, Command, CommandResult, Invocation};
use crate::config::ConfigManager;
use crate::core::services::{Report, ReportOptions, ReportService};
use crate::core::utils::default_snapshot_file;
use crate::core::{Clock, SystemClock};
use crate::currency::{format_money, MonetaryAmount};
use crate::errors::EngineError;
use crate::stats::CostShare;
use crate::utils::build_info;

pub fn dispatch(invocation: &Invocation) -> CommandResult {
    match invocation.command {
        Command::Report => cmd_report(invocation),
        Command::Upcoming => cmd_upcoming(invocation),
        Command::Json => cmd_json(invocation),
        Command::Version => cmd_version(),
        Command::Help => {
            output::info(usage());
            Ok(())
        }
    }
}

fn load_report(invocation: &Invocation) -> Result<Report, CliError> {
    let config = ConfigManager::new()?.load()?;
    let mut options = ReportOptions::from_config(&config);
    if let Some(code) = &invocation.currency {
        options = options.with_currency(code)?;
    }
    if invocation.per_payer {
        options.cost_share = CostShare::PerPayer;
    }
    let reference = invocation
        .date
        .unwrap_or_else(|| SystemClock::with_offset_minutes(config.utc_offset_minutes).today());
    let path = invocation
        .snapshot
        .clone()
        .unwrap_or_else(default_snapshot_file);
    tracing::debug!(path = %path.display(), %reference, "building report");
    Ok(ReportService::build_from_file(&path, &options, reference)?)
}

fn money(report: &Report, value: rust_decimal::Decimal) -> String {
    format_money(&MonetaryAmount::new(value, report.currency.clone()))
}

fn cmd_report(invocation: &Invocation) -> CommandResult {
    let report = load_report(invocation)?;
    let stats = &report.stats;

    output::section(format!(
        "Subscriptions as of {} ({})",
        report.reference_date, report.currency
    ));
    output::field("Active subscriptions", stats.subscription_count);
    output::field("Inactive subscriptions", report.inactive_count);
    output::field("Monthly subscriptions", money(&report, stats.total_monthly_subscriptions));
    output::field("Yearly subscriptions", money(&report, stats.total_yearly_subscriptions));
    output::field("Cost per month", money(&report, stats.total_per_month));
    output::field("Cost per year", money(&report, stats.total_per_year));
    output::field("Due this month", money(&report, stats.total_this_month));
    output::field("Remaining this month", money(&report, stats.remaining_this_month));
    output::field("Expected next month", money(&report, stats.expected_next_month));

    if let Some(most) = &report.most_expensive {
        output::field(
            "Most expensive",
            format!("{} ({}/month)", most.name, money(&report, most.monthly_cost)),
        );
    }

    if let Some(budget) = &report.budget {
        output::section("Budget");
        output::field("Budget", money(&report, budget.budget));
        output::field("Used", money(&report, budget.used));
        output::field("Remaining", money(&report, budget.remaining));
        if let Some(percent) = budget.percent_used() {
            output::field("Used (%)", percent);
        }
        if !budget.over_budget.is_zero() {
            output::warning(format!(
                "over budget by {}",
                money(&report, budget.over_budget)
            ));
        }
    }

    if !report.by_category.is_empty() {
        output::section("Per month by category");
        for (category, total) in &report.by_category {
            output::field(category, money(&report, *total));
        }
    }
    if !report.by_payer.is_empty() {
        output::section("Per month by payer");
        for (payer, total) in &report.by_payer {
            output::field(payer, money(&report, *total));
        }
    }

    print_warnings(&report);
    Ok(())
}

fn cmd_upcoming(invocation: &Invocation) -> CommandResult {
    let report = load_report(invocation)?;
    output::section(format!("Upcoming payments after {}", report.reference_date));
    let rows = ReportService::upcoming(&report, invocation.limit);
    if rows.is_empty() {
        output::info("  No active subscriptions.");
    }
    for row in rows {
        output::info(format!(
            "  {}  {:<24} {:>12}  {:<8} {}",
            row.next_payment_date,
            row.name,
            format_money(&row.normalized_price),
            row.schedule,
            row.due_status.label()
        ));
    }
    print_warnings(&report);
    Ok(())
}

fn cmd_json(invocation: &Invocation) -> CommandResult {
    let report = load_report(invocation)?;
    let json = serde_json::to_string_pretty(&report).map_err(EngineError::from)?;
    println!("{}", json);
    Ok(())
}

fn cmd_version() -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Subscription Core {}", meta.version));
    output::field("Build hash", format!("{} ({})", meta.git_hash, meta.git_status));
    output::field("Built at", meta.timestamp);
    output::field("Target", meta.target);
    output::field("Profile", meta.profile);
    output::field("Rustc", meta.rustc);
    Ok(())
}

fn print_warnings(report: &Report) {
    for name in &report.unconverted {
        output::warning(format!(
            "no exchange rate for `{}`, shown in its original currency",
            name
        ));
    }
    for name in &report.rejected {
        output::warning(format!("`{}` failed validation and was skipped", name));
    }
}
