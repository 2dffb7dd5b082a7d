pub mod calculate;
pub mod metals;
pub mod sample;

use hmpi_core::error::HmpiError;
use hmpi_core::reference::{self, ReferenceTable};
use log::info;
use std::path::Path;

/// The table from `--reference`, or the built-in one.
fn load_reference(path: Option<&Path>) -> Result<ReferenceTable, HmpiError> {
    let table = match path {
        Some(path) => reference::load_table(path)?,
        None => ReferenceTable::default(),
    };
    info!(
        "using reference table '{}' (v{})",
        table.name(),
        table.version()
    );
    Ok(table)
}
