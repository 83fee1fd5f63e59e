//! Text rendering of results and bracket tables.

use rust_decimal::Decimal;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};
use tax_core::calculations::{PeriodProjector, ProjectedTaxResult};
use tax_core::{Period, TaxResult, TaxTable};

use crate::utils::{format_currency, format_percent};

#[derive(Debug, Clone, Tabled)]
struct AmountRow {
    #[tabled(rename = "Item")]
    item: &'static str,
    #[tabled(rename = "Amount")]
    amount: String,
}

#[derive(Debug, Clone, Tabled)]
struct AllocationRow {
    #[tabled(rename = "Bracket")]
    bracket: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Amount Taxed")]
    amount_taxed: String,
    #[tabled(rename = "Tax")]
    tax_owed: String,
}

#[derive(Debug, Clone, Tabled)]
struct BracketRow {
    #[tabled(rename = "Bracket")]
    label: String,
    #[tabled(rename = "From")]
    min_income: String,
    #[tabled(rename = "To")]
    max_income: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string()
}

fn rate_percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

fn period_heading(period: Period) -> &'static str {
    match period {
        Period::Annual => "annual",
        Period::Monthly => "monthly",
    }
}

/// Deductions, summary and bracket breakdown of `result`, each amount
/// expressed in `view` terms.
pub fn render_result(
    result: &TaxResult,
    view: Period,
    currency_symbol: &str,
) -> String {
    let projected = PeriodProjector::project_result(result, view);
    let money = |amount: Decimal| format_currency(amount, currency_symbol);

    let mut out = String::new();
    out.push_str(&format!("Deductions ({})\n", period_heading(view)));
    out.push_str(&render(deduction_rows(&projected, &money)));
    out.push_str(&format!("\n\nSummary ({})\n", period_heading(view)));
    out.push_str(&render(summary_rows(&projected, &money)));

    out.push_str(&format!("\n\nBracket breakdown ({})\n", period_heading(view)));
    if projected.breakdown.is_empty() {
        out.push_str("  (no taxable income)");
    } else {
        let rows: Vec<_> = projected
            .breakdown
            .iter()
            .map(|allocation| AllocationRow {
                bracket: allocation.bracket.clone(),
                rate: rate_percent(allocation.rate),
                amount_taxed: money(allocation.amount_taxed),
                tax_owed: money(allocation.tax_owed),
            })
            .collect();
        out.push_str(&render(rows));
    }
    out.push('\n');
    out
}

fn deduction_rows(
    projected: &ProjectedTaxResult,
    money: &dyn Fn(Decimal) -> String,
) -> Vec<AmountRow> {
    let d = &projected.deductions;
    vec![
        AmountRow {
            item: "Mortgage interest",
            amount: money(d.mortgage),
        },
        AmountRow {
            item: "Pension contribution",
            amount: money(d.pension),
        },
        AmountRow {
            item: "Rent relief",
            amount: money(d.rent),
        },
        AmountRow {
            item: "Insurance",
            amount: money(d.insurance),
        },
        AmountRow {
            item: "Total deductions",
            amount: money(projected.total_deductions),
        },
    ]
}

fn summary_rows(
    projected: &ProjectedTaxResult,
    money: &dyn Fn(Decimal) -> String,
) -> Vec<AmountRow> {
    vec![
        AmountRow {
            item: "Gross income",
            amount: money(projected.gross_income),
        },
        AmountRow {
            item: "Taxable income",
            amount: money(projected.taxable_income),
        },
        AmountRow {
            item: "Total tax",
            amount: money(projected.total_tax),
        },
        AmountRow {
            item: "Net income",
            amount: money(projected.net_income),
        },
        AmountRow {
            item: "Effective rate",
            amount: format_percent(projected.effective_rate),
        },
    ]
}

/// The brackets of `table` with their bounds and rates.
pub fn render_table(
    table: &TaxTable,
    currency_symbol: &str,
) -> String {
    let rows: Vec<_> = table
        .brackets()
        .iter()
        .map(|bracket| BracketRow {
            label: bracket.label.clone(),
            min_income: format_currency(bracket.min_income, currency_symbol),
            max_income: bracket
                .max_income
                .map(|max| format_currency(max, currency_symbol))
                .unwrap_or_else(|| "-".to_string()),
            rate: rate_percent(bracket.tax_rate),
        })
        .collect();
    render(rows)
}
