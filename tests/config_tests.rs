use rust_decimal_macros::dec;
use subscription_core::config::{Config, ConfigManager};
use subscription_core::currency::CurrencyCode;
use subscription_core::stats::CostShare;
use tempfile::tempdir;

#[test]
fn default_config_has_non_empty_fields() {
    let cfg = Config::default();

    assert!(cfg.main_currency.is_well_formed());
    assert!(!cfg.locale.is_empty());
    assert_eq!(cfg.cost_share, CostShare::Full);
    assert!(cfg.monthly_budget.is_none());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.main_currency = CurrencyCode::new("BRL");
    cfg.locale = "pt-BR".to_string();
    cfg.notify_days_before = 7;
    cfg.monthly_budget = Some(dec!(250.00));

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded.main_currency.as_str(), "BRL");
    assert_eq!(loaded.locale, "pt-BR");
    assert_eq!(loaded.notify_days_before, 7);
    assert_eq!(loaded.monthly_budget, Some(dec!(250)));
}

#[test]
fn cost_share_is_stored_in_snake_case() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    let cfg = Config {
        cost_share: CostShare::PerPayer,
        ..Config::default()
    };
    manager.save(&cfg).expect("save config");

    let raw = std::fs::read_to_string(manager.path()).expect("read config");
    assert!(raw.contains("\"per_payer\""));
}
