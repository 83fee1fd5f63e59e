//! End-to-end runs of the estimator commands against a config file.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tax_cli::app::{self, CalculateRequest, VisitAction};
use tax_cli::config::AppConfig;
use tax_core::Period;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Loads the fixture config. Its bracket path is relative to the crate root.
fn fixture_config() -> AppConfig {
    let mut config = AppConfig::load_with(Some(&fixture("estimator.toml")), |_| None)
        .expect("fixture config should load");
    if let Some(path) = config.brackets_file.take() {
        config.brackets_file = Some(Path::new(env!("CARGO_MANIFEST_DIR")).join(path));
    }
    config
}

fn calculate(
    config: &AppConfig,
    income: &str,
    json: bool,
) -> String {
    let request = CalculateRequest {
        income,
        period: Period::Annual,
        view: Period::Annual,
        brackets: None,
        json,
    };
    app::run_calculate(config, &request).expect("calculation should succeed")
}

fn amount(
    json: &str,
    field: &str,
) -> Decimal {
    let value: serde_json::Value = serde_json::from_str(json).expect("output should be JSON");
    value[field]
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| panic!("{field} should be a decimal string"))
}

#[test]
fn fixture_config_is_applied() {
    let config = fixture_config();

    assert_eq!(config.currency_symbol, "$");
    assert_eq!(config.log_level.as_deref(), Some("debug"));
    assert_eq!(config.counter_config().backend, "none");
    assert_eq!(config.counter_config().key, "estimator:test-visits");
}

#[test]
fn configured_table_and_currency_are_used() {
    let output = calculate(&fixture_config(), "5,000,000", false);

    assert!(output.contains("Above $1,000,000"));
    assert!(output.contains("$229,999.90"));
}

#[test]
fn waive_policy_reports_no_deductions_at_zero_income() {
    let output = calculate(&fixture_config(), "0", true);

    assert_eq!(amount(&output, "total_deductions"), Decimal::ZERO);
    assert_eq!(amount(&output, "total_tax"), Decimal::ZERO);
    assert_eq!(amount(&output, "effective_rate"), Decimal::ZERO);
}

#[test]
fn default_config_charges_insurance_at_zero_income() {
    let output = calculate(&AppConfig::default(), "", true);

    assert_eq!(amount(&output, "total_deductions"), dec!(300000));
    assert_eq!(amount(&output, "taxable_income"), Decimal::ZERO);
}

#[test]
fn brackets_command_prints_configured_table() {
    let output = app::run_brackets(&fixture_config(), None).unwrap();

    assert!(output.contains("First $1,000,000"));
    assert!(output.contains("10%"));
}

#[tokio::test]
async fn visits_degrade_without_a_store() {
    let counter = app::build_counter(&fixture_config().counter_config()).await;

    assert_eq!(app::run_visits(&counter, VisitAction::Get).await, 0);
    assert_eq!(app::run_visits(&counter, VisitAction::Increment).await, 1);
    assert_eq!(app::run_visits(&counter, VisitAction::Increment).await, 1);
}
