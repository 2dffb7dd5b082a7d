pub mod hmpi;
pub mod outcome;

pub use hmpi::{categorize, compute, compute_sample, percent_of_standard};
pub use outcome::{HmpiOutcome, SampleResult};
