use hmpi_core::engine::SampleResult;
use hmpi_core::error::HmpiError;
use hmpi_core::Analysis;

pub fn print_analysis(analysis: &Analysis) -> Result<(), HmpiError> {
    let json = serde_json::to_string_pretty(analysis)?;
    println!("{json}");
    Ok(())
}

pub fn print_result(result: &SampleResult) -> Result<(), HmpiError> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}
