use crate::engine::outcome::{HmpiOutcome, SampleResult};
use crate::error::HmpiError;
use crate::model::{Category, Concentrations, MetalKey, Sample};
use crate::reference::ReferenceTable;
use chrono::Utc;
use log::debug;
use rust_decimal::Decimal;

/// Upper bound (inclusive) of the `safe` category.
pub const SAFE_LIMIT: Decimal = Decimal::ONE_HUNDRED;
/// Upper bound (inclusive) of the `moderate` category.
pub const MODERATE_LIMIT: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

/// Compute the pollution index for a set of concentrations.
///
/// For every metal present in `metals`:
///   ratio = concentration / standard
///   hmpi  = sum(ratio * weight * 100) / sum(weight)
///
/// The sum of weights only covers metals that were present, so omitting a
/// metal does not drag the index down. Fails with `NoMatchedMetals` when
/// nothing matched and `ComputeOverflow` when a term leaves the decimal range.
pub fn compute(
    metals: &Concentrations,
    table: &ReferenceTable,
) -> Result<HmpiOutcome, HmpiError> {
    let mut sum_weighted_ratio = Decimal::ZERO;
    let mut sum_weight = Decimal::ZERO;
    let mut max_ratio = Decimal::ZERO;
    let mut dominant_metal = None;

    for metal in MetalKey::ALL {
        let Some(&concentration) = metals.get(&metal) else {
            continue;
        };
        let reference = table.entry(metal);
        let overflow = || HmpiError::ComputeOverflow { metal };

        let ratio = concentration
            .checked_div(reference.standard)
            .ok_or_else(overflow)?;
        let term = ratio
            .checked_mul(reference.weight)
            .and_then(|t| t.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(overflow)?;
        sum_weighted_ratio = sum_weighted_ratio.checked_add(term).ok_or_else(overflow)?;
        sum_weight += reference.weight;

        // Strict comparison: the first metal in canonical order wins ties.
        if ratio > max_ratio {
            max_ratio = ratio;
            dominant_metal = Some(metal);
        }
    }

    if sum_weight.is_zero() {
        return Err(HmpiError::NoMatchedMetals);
    }

    let hmpi = sum_weighted_ratio
        .checked_div(sum_weight)
        .ok_or(HmpiError::NoMatchedMetals)?
        .normalize();

    Ok(HmpiOutcome {
        hmpi,
        category: categorize(hmpi),
        dominant_metal,
    })
}

/// Map an index value to its category. Both limits are inclusive.
pub fn categorize(hmpi: Decimal) -> Category {
    if hmpi <= SAFE_LIMIT {
        Category::Safe
    } else if hmpi <= MODERATE_LIMIT {
        Category::Moderate
    } else {
        Category::Hazardous
    }
}

/// Concentration as a percentage of the metal's standard, `None` on overflow.
pub fn percent_of_standard(
    metal: MetalKey,
    concentration: Decimal,
    table: &ReferenceTable,
) -> Option<Decimal> {
    concentration
        .checked_div(table.standard(metal))?
        .checked_mul(Decimal::ONE_HUNDRED)
}

/// Compute a stored result for a sample, stamped with the current time.
pub fn compute_sample(
    sample: &Sample,
    table: &ReferenceTable,
) -> Result<SampleResult, HmpiError> {
    let outcome = compute(sample.metals(), table)?;
    debug!(
        "sample {} '{}': hmpi={} category={} dominant={:?}",
        sample.id(),
        sample.name(),
        outcome.hmpi,
        outcome.category,
        outcome.dominant_metal
    );

    Ok(SampleResult {
        sample_id: sample.id(),
        sample_name: sample.name().to_string(),
        hmpi: outcome.hmpi,
        category: outcome.category,
        dominant_metal: outcome.dominant_metal,
        computed_at: Utc::now(),
        metals: sample.metals().clone(),
        latitude: sample.latitude(),
        longitude: sample.longitude(),
    })
}
