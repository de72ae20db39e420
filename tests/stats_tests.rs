use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use subscription_core::currency::{CurrencyCode, ExchangeRateTable};
use subscription_core::cycle::Schedule;
use subscription_core::stats::{compute_stats, CostShare, Stats};
use subscription_core::subscription::{annotate, Subscription, SubscriptionView};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn views_for(subs: &[Subscription], reference: NaiveDate) -> Vec<SubscriptionView> {
    let eur = CurrencyCode::new("EUR");
    let rates = ExchangeRateTable::new()
        .with_rate("USD", "EUR", dec!(0.9))
        .unwrap();
    subs.iter()
        .map(|sub| annotate(sub, &eur, &rates, reference).view)
        .collect()
}

fn monthly(name: &str, price: Decimal, anchor: NaiveDate) -> Subscription {
    Subscription::new(name, price, CurrencyCode::new("EUR"), Schedule::Monthly, anchor)
}

fn yearly(name: &str, price: Decimal, anchor: NaiveDate) -> Subscription {
    Subscription::new(name, price, CurrencyCode::new("EUR"), Schedule::Yearly, anchor)
}

#[test]
fn empty_input_yields_zero_stats() {
    let stats = compute_stats(&[], date(2024, 1, 1), CostShare::PerPayer);
    assert_eq!(stats, Stats::default());
    assert_eq!(stats.total_per_year, Decimal::ZERO);
}

#[test]
fn two_monthly_subscriptions_scenario() {
    let reference = date(2024, 4, 10);
    let subs = vec![
        monthly("Video", dec!(12.99), date(2023, 2, 5)),
        monthly("Notes", dec!(7.00), date(2023, 6, 20)),
    ];
    let stats = compute_stats(&views_for(&subs, reference), reference, CostShare::Full);
    assert_eq!(stats.total_monthly_subscriptions, dec!(19.99));
    assert_eq!(stats.total_per_year, dec!(239.88));
    assert_eq!(stats.total_per_month, dec!(19.99));
}

#[test]
fn one_yearly_subscription_scenario() {
    let reference = date(2024, 4, 10);
    let subs = vec![yearly("Domain", dec!(120.00), date(2021, 8, 1))];
    let stats = compute_stats(&views_for(&subs, reference), reference, CostShare::Full);
    assert_eq!(stats.total_yearly_subscriptions, dec!(120));
    assert_eq!(stats.total_per_month, dec!(10.00));
    assert_eq!(stats.total_per_year, dec!(120));
}

#[test]
fn totals_are_invariant_under_permutation() {
    let reference = date(2024, 2, 14);
    let subs = vec![
        monthly("A", dec!(3.333), date(2023, 1, 31)),
        monthly("B", dec!(9.99), date(2024, 2, 14)),
        yearly("C", dec!(99.95), date(2023, 3, 1)),
        monthly("D", dec!(0.01), date(2024, 3, 1)),
        yearly("E", dec!(45.5), date(2022, 2, 28)),
        Subscription::new(
            "F",
            dec!(20),
            CurrencyCode::new("USD"),
            Schedule::Monthly,
            date(2023, 12, 15),
        )
        .with_payers(["ana", "bo", "cy"]),
    ];
    let views = views_for(&subs, reference);
    for share in [CostShare::Full, CostShare::PerPayer] {
        let expected = compute_stats(&views, reference, share);
        let mut reversed = views.clone();
        reversed.reverse();
        assert_eq!(compute_stats(&reversed, reference, share), expected);
        for shift in 1..views.len() {
            let mut rotated = views.clone();
            rotated.rotate_left(shift);
            assert_eq!(compute_stats(&rotated, reference, share), expected);
        }
    }
}

#[test]
fn calendar_month_buckets_follow_reference() {
    let reference = date(2024, 2, 14);
    let subs = vec![
        // Paid Feb 1, next Mar 1.
        monthly("Early", dec!(10), date(2023, 11, 1)),
        // Due Feb 20, then Mar 20.
        monthly("Late", dec!(5), date(2023, 11, 20)),
        // Yearly due Mar 3 2024.
        yearly("Annual", dec!(60), date(2020, 3, 3)),
        // Starts in April.
        monthly("Future", dec!(2), date(2024, 4, 2)),
    ];
    let stats = compute_stats(&views_for(&subs, reference), reference, CostShare::Full);
    assert_eq!(stats.remaining_this_month, dec!(5));
    assert_eq!(stats.total_this_month, dec!(15));
    assert_eq!(stats.expected_next_month, dec!(75));
    assert_eq!(stats.subscription_count, 4);
}

#[test]
fn per_payer_split_rounds_once_at_the_end() {
    let reference = date(2024, 2, 14);
    let subs: Vec<Subscription> = (0..3)
        .map(|idx| {
            monthly(&format!("Shared {idx}"), dec!(10), date(2023, 1, 20))
                .with_payers(["ana", "bo", "cy"])
        })
        .collect();
    let stats = compute_stats(&views_for(&subs, reference), reference, CostShare::PerPayer);
    // 3 × 3.333… sums to 10.00, not 3 × 3.33.
    assert_eq!(stats.total_monthly_subscriptions, dec!(10.00));
    assert_eq!(stats.remaining_this_month, dec!(10.00));
}
