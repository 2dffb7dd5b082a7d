use hmpi_core::engine::{percent_of_standard, SampleResult};
use hmpi_core::export::format_hmpi;
use hmpi_core::model::{Category, MetalKey};
use hmpi_core::reference::ReferenceTable;
use hmpi_core::store::StoreSummary;
use hmpi_core::Analysis;

pub fn print_analysis(analysis: &Analysis, table: &ReferenceTable, verbose: bool) {
    println!("=== HMPI ({}) ===\n", analysis.reference);

    let name_width = analysis
        .results
        .iter()
        .map(|r| r.sample_name.chars().count())
        .max()
        .unwrap_or(10)
        .max("Sample".len());

    println!(
        "  {:<width$}  {:>10}  {:<10}  {}",
        "Sample",
        "HMPI",
        "Category",
        "Dominant",
        width = name_width
    );
    println!("  {}", "-".repeat(name_width + 36));

    for result in &analysis.results {
        println!(
            "  {:<width$}  {:>10}  {:<10}  {}",
            result.sample_name,
            format_hmpi(result.hmpi),
            result.category.as_str(),
            result.dominant_label(),
            width = name_width
        );
        if verbose {
            print_ratios(result, table);
        }
    }
    println!();

    print_summary(&analysis.summary);

    println!(
        "  Imported: {}  Rejected: {}",
        analysis.success_count, analysis.error_count
    );
    if verbose && !analysis.failures.is_empty() {
        println!("\n  Rejected records:");
        for failure in &analysis.failures {
            println!(
                "    #{:<4} {:<20} {}",
                failure.record,
                failure.name.as_deref().unwrap_or("(unnamed)"),
                failure.reason
            );
        }
    }
    println!();
}

pub fn print_result(result: &SampleResult, table: &ReferenceTable) {
    println!("=== {} ===\n", result.sample_name);
    println!("  HMPI:     {}", format_hmpi(result.hmpi));
    println!("  Category: {}", result.category);
    println!("  Dominant: {}", result.dominant_label());
    if let Some(lat) = result.latitude {
        println!("  Latitude:  {}", lat);
    }
    if let Some(lon) = result.longitude {
        println!("  Longitude: {}", lon);
    }
    println!();
    print_ratios(result, table);
    println!();
}

fn print_ratios(result: &SampleResult, table: &ReferenceTable) {
    for metal in MetalKey::ALL {
        let Some(&value) = result.metals.get(&metal) else {
            continue;
        };
        let percent = percent_of_standard(metal, value, table)
            .map(|p| format!("{}%", p.round_dp(1)))
            .unwrap_or_else(|| "-".to_string());
        let marker = if result.dominant_metal == Some(metal) {
            " *"
        } else {
            ""
        };
        println!(
            "    {:<3} {:>12} mg/L  {:>9} of {} mg/L{}",
            metal.symbol(),
            value.to_string(),
            percent,
            table.standard(metal),
            marker
        );
    }
}

fn print_summary(summary: &StoreSummary) {
    let counts: Vec<String> = Category::ALL
        .iter()
        .map(|c| format!("{} {}", summary.count(*c), c))
        .collect();
    println!("  {} sample(s): {}", summary.computed, counts.join(", "));

    if let (Some(min), Some(max), Some(mean)) =
        (summary.min_hmpi, summary.max_hmpi, summary.mean_hmpi)
    {
        println!(
            "  HMPI min {}  max {}  mean {}",
            format_hmpi(min),
            format_hmpi(max),
            format_hmpi(mean)
        );
    }
}
