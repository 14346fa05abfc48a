//! Catalog command implementation.

use crate::error::Result;
use crate::output::Formatter;
use chemlog_extractor::Catalog;

/// Execute the catalog command.
pub fn execute_catalog(formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_catalog(&Catalog::standard())?);
    Ok(())
}
