use hmpi_core::error::HmpiError;
use hmpi_core::model::{MetalKey, RawSample};
use hmpi_core::session::Session;
use std::path::PathBuf;

use super::load_reference;
use crate::output;

/// A sample as typed on the command line, metals in canonical order.
pub struct SampleArgs {
    pub name: String,
    pub metals: [String; 6],
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl SampleArgs {
    fn into_raw(self) -> RawSample {
        RawSample {
            name: Some(self.name),
            latitude: self.lat,
            longitude: self.lon,
            metals: MetalKey::ALL.into_iter().zip(self.metals).collect(),
        }
    }
}

pub fn run(
    input: SampleArgs,
    reference_file: Option<PathBuf>,
    output_format: &str,
) -> Result<(), HmpiError> {
    let table = load_reference(reference_file.as_deref())?;
    let mut session = Session::new(table);
    let result = session.on_sample_submitted(&input.into_raw())?;

    match output_format {
        "json" => output::json::print_result(&result)?,
        _ => output::table::print_result(&result, session.store().reference()),
    }

    Ok(())
}
