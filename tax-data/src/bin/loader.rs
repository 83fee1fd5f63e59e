use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use tax_core::DeductionRules;
use tax_core::calculations::TaxCalculator;
use tax_data::TaxBracketLoader;

/// Validate a bracket table CSV file and print it.
///
/// The CSV file should have the following columns:
/// - min_income: The lowest income taxed in the bracket
/// - max_income: The highest income taxed in the bracket (empty for unbounded)
/// - rate: The marginal tax rate as a fraction (e.g., 0.15)
/// - label: Optional display name
#[derive(Parser, Debug)]
#[command(name = "tax-table-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing the bracket table
    #[arg(short, long)]
    file: PathBuf,

    /// Annual gross income to run through the table after validation
    #[arg(short, long)]
    income: Option<Decimal>,

    /// Currency symbol used for generated labels
    #[arg(short, long, default_value = "₦")]
    currency: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Checking bracket table: {}", args.file.display());

    let table = TaxBracketLoader::load_file(&args.file, &args.currency)
        .with_context(|| format!("Invalid bracket table: {}", args.file.display()))?;

    println!("Table is valid ({} brackets):", table.len());
    for bracket in &table {
        println!("  {:<32} {:>6}%", bracket.label, bracket.tax_rate * Decimal::ONE_HUNDRED);
    }

    if let Some(income) = args.income {
        anyhow::ensure!(income >= Decimal::ZERO, "income must not be negative");

        let rules = DeductionRules::standard();
        let result = TaxCalculator::new(&table, &rules).calculate_tax(income);

        println!();
        println!("Gross income:     {}", result.gross_income);
        println!("Total deductions: {}", result.total_deductions);
        println!("Taxable income:   {}", result.taxable_income);
        for allocation in &result.breakdown {
            println!(
                "  {:<32} {:>16} -> {}",
                allocation.bracket, allocation.amount_taxed, allocation.tax_owed
            );
        }
        println!("Total tax:        {}", result.total_tax);
    }

    Ok(())
}
