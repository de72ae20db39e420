use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use subscription_core::currency::{
    convert, format_money, Conversion, CurrencyCode, ExchangeRateTable, MonetaryAmount,
};

fn money(value: Decimal, code: &str) -> MonetaryAmount {
    MonetaryAmount::new(value, CurrencyCode::new(code))
}

fn sample_table() -> ExchangeRateTable {
    ExchangeRateTable::new()
        .with_rate("USD", "EUR", dec!(0.92))
        .unwrap()
        .with_rate("EUR", "USD", dec!(1.1))
        .unwrap()
        .with_rate("GBP", "EUR", dec!(1.17))
        .unwrap()
}

#[test]
fn identity_conversion_is_exact_for_any_table() {
    let amount = money(dec!(19.999999), "EUR");
    for table in [ExchangeRateTable::new(), sample_table()] {
        let result = convert(&amount, &CurrencyCode::new("EUR"), &table);
        assert_eq!(result.amount, amount);
        assert_eq!(result.conversion, Conversion::Identity);
    }
}

#[test]
fn missing_rate_passes_amount_through() {
    let amount = money(dec!(10), "XYZ");
    let result = convert(&amount, &CurrencyCode::new("EUR"), &sample_table());
    assert_eq!(result.amount, money(dec!(10), "XYZ"));
    assert_eq!(result.conversion, Conversion::Passthrough);
    assert!(!result.is_converted());
}

#[test]
fn directed_rates_are_used_independently() {
    let table = sample_table();
    let to_eur = convert(&money(dec!(100), "USD"), &CurrencyCode::new("EUR"), &table);
    let to_usd = convert(&money(dec!(100), "EUR"), &CurrencyCode::new("USD"), &table);
    assert_eq!(to_eur.amount, money(dec!(92), "EUR"));
    assert_eq!(to_usd.amount, money(dec!(110), "USD"));
    assert_eq!(to_usd.conversion, Conversion::Converted { rate: dec!(1.1) });
}

#[test]
fn no_inverse_is_inferred_for_one_way_pairs() {
    let result = convert(
        &money(dec!(50), "EUR"),
        &CurrencyCode::new("GBP"),
        &sample_table(),
    );
    assert_eq!(result.conversion, Conversion::Passthrough);
    assert_eq!(result.amount.currency.as_str(), "EUR");
}

#[test]
fn rates_deserialize_from_json_list() {
    let json = r#"[
        { "from": "usd", "to": "eur", "rate": "0.9" },
        { "from": "EUR", "to": "USD", "rate": 1.25, "source": "feed" }
    ]"#;
    let table: ExchangeRateTable = serde_json::from_str(json).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.rate(&CurrencyCode::new("USD"), &CurrencyCode::new("EUR")),
        Some(dec!(0.9))
    );
}

#[test]
fn negative_rates_fail_to_deserialize() {
    let json = r#"[{ "from": "USD", "to": "EUR", "rate": "-1" }]"#;
    assert!(serde_json::from_str::<ExchangeRateTable>(json).is_err());
}

#[test]
fn formats_converted_amounts_for_display() {
    let result = convert(
        &money(dec!(12.345), "USD"),
        &CurrencyCode::new("EUR"),
        &sample_table(),
    );
    assert_eq!(format_money(&result.amount), "€11.36");
}
