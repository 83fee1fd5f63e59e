use std::path::Path;

use anyhow::{Context, Result};
use tax_core::calculations::TaxCalculator;
use tax_core::calculations::common::group_thousands;
use tax_core::counter::{CounterConfig, CounterStoreRegistry, NoopCounterStoreFactory, VisitCounter};
use tax_core::{Period, TaxTable};
use tax_counter_redis::RedisCounterStoreFactory;
use tax_data::TaxBracketLoader;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::report;
use crate::state::EstimatorState;
use crate::utils::parse_income;

/// Build a registry with every compiled-in counter backend.
///
/// To add a backend, implement [`tax_core::counter::CounterStoreFactory`]
/// in its own crate and register it here.
pub fn build_registry() -> CounterStoreRegistry {
    let mut registry = CounterStoreRegistry::new();
    registry.register(Box::new(NoopCounterStoreFactory));
    registry.register(Box::new(RedisCounterStoreFactory));
    registry
}

/// Connect the configured counter store. A store that cannot be reached
/// is replaced by a disabled counter so visits never block the estimator.
pub async fn build_counter(config: &CounterConfig) -> VisitCounter {
    match build_registry().create(config).await {
        Ok(store) => {
            info!(backend = %config.backend, key = %config.key, "visit counter ready");
            VisitCounter::new(store)
        }
        Err(e) => {
            warn!(backend = %config.backend, "visit counter disabled: {}", e);
            VisitCounter::disabled()
        }
    }
}

/// The bracket table from `override_path`, else the configured file, else
/// the built-in table.
pub fn load_table(
    config: &AppConfig,
    override_path: Option<&Path>,
) -> Result<TaxTable> {
    match override_path.or(config.brackets_file.as_deref()) {
        Some(path) => TaxBracketLoader::load_file(path, &config.currency_symbol)
            .with_context(|| format!("Failed to load bracket table: {}", path.display())),
        None => Ok(TaxTable::standard()),
    }
}

pub struct CalculateRequest<'a> {
    pub income: &'a str,
    pub period: Period,
    pub view: Period,
    pub brackets: Option<&'a Path>,
    pub json: bool,
}

/// Calculate tax for the entered income and render it for printing.
pub fn run_calculate(
    config: &AppConfig,
    request: &CalculateRequest<'_>,
) -> Result<String> {
    let entered = parse_income(request.income).context("Invalid income")?;
    let table = load_table(config, request.brackets)?;
    let rules = config.deduction_rules();
    let calculator = TaxCalculator::new(&table, &rules);

    let state = EstimatorState::new(entered, request.period).with_view(request.view);
    let result = state.calculate(&calculator).context("Invalid income")?;

    if request.json {
        serde_json::to_string_pretty(&result).context("Failed to serialize result")
    } else {
        Ok(report::render_result(&result, state.view_period, &config.currency_symbol))
    }
}

/// Convert a value entered in `from` terms into `to` terms.
pub fn run_convert(
    value: &str,
    from: Period,
    to: Period,
) -> Result<String> {
    let entered = parse_income(value).context("Invalid value")?;
    let mut state = EstimatorState::new(entered, from);
    state.set_input_period(to).context("Invalid value")?;
    Ok(group_thousands(state.entered))
}

pub fn run_brackets(
    config: &AppConfig,
    brackets: Option<&Path>,
) -> Result<String> {
    let table = load_table(config, brackets)?;
    Ok(report::render_table(&table, &config.currency_symbol))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitAction {
    Get,
    Increment,
    Set(i64),
}

/// Apply `action` and return the count to report.
pub async fn run_visits(
    counter: &VisitCounter,
    action: VisitAction,
) -> i64 {
    match action {
        VisitAction::Get => counter.get_count().await,
        VisitAction::Increment => counter.increment_count().await,
        VisitAction::Set(count) => {
            counter.save_count(count).await;
            count
        }
    }
}
