//! Loading bracket tables from CSV.

mod loader;

pub use loader::{TaxBracketLoader, TaxBracketLoaderError, TaxBracketRecord};
