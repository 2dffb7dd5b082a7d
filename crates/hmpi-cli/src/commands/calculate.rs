use hmpi_core::error::HmpiError;
use hmpi_core::export;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use super::load_reference;
use crate::output;

pub fn run(
    input_file: PathBuf,
    reference_file: Option<PathBuf>,
    output_format: &str,
    output_file: Option<PathBuf>,
    verbose: bool,
) -> Result<(), HmpiError> {
    let table = load_reference(reference_file.as_deref())?;
    let analysis = hmpi_core::analyze_file(&input_file, table.clone())?;

    match output_format {
        "json" => output::json::print_analysis(&analysis)?,
        "csv" => print!("{}", export::to_csv(&analysis.results)?),
        _ => output::table::print_analysis(&analysis, &table, verbose),
    }

    if let Some(path) = output_file {
        let file = File::create(&path)?;
        export::write_csv(BufWriter::new(file), &analysis.results)?;
        eprintln!(
            "Exported {} result(s) to {}",
            analysis.results.len(),
            path.display()
        );
    }

    if analysis.error_count > 0 && !verbose {
        eprintln!(
            "{} record(s) rejected; rerun with --verbose to list them",
            analysis.error_count
        );
    }

    Ok(())
}
