use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{TaxBracket, TaxTable, TaxTableError};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading a bracket table.
#[derive(Debug, Error)]
pub enum TaxBracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid bracket table: {0}")]
    InvalidTable(#[from] TaxTableError),

    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },
}

impl From<csv::Error> for TaxBracketLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxBracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of a bracket table CSV file.
///
/// - `min_income`: lowest income taxed in this bracket
/// - `max_income`: highest income taxed in this bracket (empty for unbounded)
/// - `rate`: marginal rate as a fraction (e.g. 0.15 for 15%)
/// - `label`: display name; generated from the bounds when empty or absent
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
    #[serde(default)]
    pub label: Option<String>,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl TaxBracketRecord {
    fn into_bracket(
        self,
        currency_symbol: &str,
    ) -> TaxBracket {
        let label = match self.label {
            Some(label) if !label.trim().is_empty() => label.trim().to_string(),
            _ => TaxBracket::default_label(self.min_income, self.max_income, currency_symbol),
        };
        TaxBracket::new(self.min_income, self.max_income, self.rate, label)
    }
}

/// Reads bracket tables from CSV and turns them into validated
/// [`TaxTable`]s.
pub struct TaxBracketLoader;

impl TaxBracketLoader {
    /// Parse bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice. Surrounding whitespace in fields is ignored.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, TaxBracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        debug!(count = records.len(), "parsed bracket records");
        Ok(records)
    }

    /// Build a table from parsed records, in file order.
    ///
    /// Missing labels are generated with `currency_symbol`, e.g.
    /// `₦800,001 - ₦3,000,000`.
    pub fn into_table(
        records: Vec<TaxBracketRecord>,
        currency_symbol: &str,
    ) -> Result<TaxTable, TaxBracketLoaderError> {
        let brackets = records
            .into_iter()
            .map(|record| record.into_bracket(currency_symbol))
            .collect();

        Ok(TaxTable::new(brackets)?)
    }

    /// Parse and validate the table stored at `path`.
    pub fn load_file(
        path: impl AsRef<Path>,
        currency_symbol: &str,
    ) -> Result<TaxTable, TaxBracketLoaderError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TaxBracketLoaderError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let table = Self::into_table(Self::parse(file)?, currency_symbol)?;
        info!(path = %path.display(), brackets = table.len(), "loaded bracket table");
        Ok(table)
    }
}
