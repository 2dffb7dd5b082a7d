mod commands;
mod output;

use clap::{Parser, Subcommand};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hmpi",
    version,
    about = "Heavy metal pollution index for groundwater samples"
)]
struct Cli {
    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn", value_name = "LEVEL")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a batch file (CSV, JSON or XLSX) and compute the HMPI of every sample
    Calculate {
        /// Path to a .csv, .json or .xlsx file
        input_file: PathBuf,

        /// Custom JSON reference table (default: built-in WHO limits)
        #[arg(short, long = "reference", value_name = "FILE")]
        reference: Option<PathBuf>,

        /// Output format: table (default), json or csv
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the CSV export to a file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Show per-metal ratios and rejected records
        #[arg(long)]
        verbose: bool,
    },
    /// Compute the HMPI of a single sample given on the command line
    Sample {
        #[arg(long)]
        name: String,
        /// Cadmium (mg/L)
        #[arg(long, allow_hyphen_values = true)]
        cd: String,
        /// Lead (mg/L)
        #[arg(long, allow_hyphen_values = true)]
        pb: String,
        /// Chromium (mg/L)
        #[arg(long, allow_hyphen_values = true)]
        cr: String,
        /// Copper (mg/L)
        #[arg(long, allow_hyphen_values = true)]
        cu: String,
        /// Zinc (mg/L)
        #[arg(long, allow_hyphen_values = true)]
        zn: String,
        /// Nickel (mg/L)
        #[arg(long, allow_hyphen_values = true)]
        ni: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<String>,

        /// Custom JSON reference table
        #[arg(short, long = "reference", value_name = "FILE")]
        reference: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Inspect the metal reference table
    Metals {
        #[command(subcommand)]
        action: MetalsAction,
    },
}

#[derive(Subcommand)]
enum MetalsAction {
    /// List metals with their standards and weights
    List {
        /// Custom JSON reference table
        #[arg(short, long = "reference", value_name = "FILE")]
        reference: Option<PathBuf>,
    },
    /// Show health effects and sources for one metal
    Explain {
        /// Metal code, symbol or name (e.g. "cd", "Pb", "zinc")
        metal: String,

        /// Custom JSON reference table
        #[arg(short, long = "reference", value_name = "FILE")]
        reference: Option<PathBuf>,
    },
    /// Print the reference table JSON format with an example
    Schema,
    /// Validate a custom reference table file
    Validate {
        /// Path to JSON reference table
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Ignore the error when a logger is already installed.
    let _ = TermLogger::init(
        cli.log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let result = match cli.command {
        Commands::Calculate {
            input_file,
            reference,
            output,
            out,
            verbose,
        } => commands::calculate::run(input_file, reference, &output, out, verbose),
        Commands::Sample {
            name,
            cd,
            pb,
            cr,
            cu,
            zn,
            ni,
            lat,
            lon,
            reference,
            output,
        } => {
            let input = commands::sample::SampleArgs {
                name,
                metals: [cd, pb, cr, cu, zn, ni],
                lat,
                lon,
            };
            commands::sample::run(input, reference, &output)
        }
        Commands::Metals { action } => match action {
            MetalsAction::List { reference } => commands::metals::list(reference),
            MetalsAction::Explain { metal, reference } => {
                commands::metals::explain(&metal, reference)
            }
            MetalsAction::Schema => commands::metals::schema(),
            MetalsAction::Validate { file } => commands::metals::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
