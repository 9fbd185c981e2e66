//! nat2dose - NAT2 genotype lookup for isoniazid therapy
//!
//! ## Usage
//!
//! ```bash
//! nat2dose                          # interactive interface
//! nat2dose --calls 282=T,590=A      # print a report
//! nat2dose --input patient.calls    # read calls from a file
//! nat2dose --population             # genotype and phenotype frequencies
//! nat2dose --info                   # background on NAT2 testing
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use nat2dose::allele::ObservedAlleles;
use nat2dose::calls::parse_calls_file;
use nat2dose::controller::run_app;
use nat2dose::logging::{init_logging, random_log_path, LogConfig};
use nat2dose::model::AppState;
use nat2dose::reference::{all_genotypes, shadowed_genotypes};
use nat2dose::report::{render_analysis, render_information, render_population, DEFAULT_WIDTH};
use nat2dose::resolver::Analysis;

/// nat2dose - NAT2 genotype analysis and isoniazid dosing guidance
///
/// Without --calls, --input, --population or --info, opens the interactive
/// interface. Otherwise prints a plain-text report to stdout.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Observed calls, e.g. "282=T,590=A". Unlisted positions are wild type
    #[arg(short = 'c', long = "calls", conflicts_with = "input")]
    calls: Option<String>,

    /// Read observed calls from a file (one POSITION ALLELE pair per line)
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Print genotype and acetylator frequencies
    #[arg(short = 'p', long = "population")]
    population: bool,

    /// Print background information on NAT2 testing
    #[arg(long = "info")]
    info: bool,

    /// Wrap report lines at this width
    #[arg(short = 'w', long = "width", default_value_t = DEFAULT_WIDTH)]
    width: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Disable colors in log output on stderr
    #[arg(long = "no-color")]
    no_color: bool,
}

impl Args {
    fn is_cli_mode(&self) -> bool {
        self.calls.is_some() || self.input.is_some() || self.population || self.info
    }

    /// Reads the calls given on the command line, if any.
    fn observed(&self) -> Result<Option<ObservedAlleles>> {
        if let Some(calls) = &self.calls {
            let observed = calls
                .parse()
                .with_context(|| format!("Invalid --calls value: {}", calls))?;
            return Ok(Some(observed));
        }
        if let Some(path) = &self.input {
            let observed = parse_calls_file(path)
                .with_context(|| format!("Cannot read calls from {}", path.display()))?;
            return Ok(Some(observed));
        }
        Ok(None)
    }
}

/// Runs CLI mode: print the requested reports to stdout.
fn run_cli_mode(args: &Args) -> Result<()> {
    let mut sections = Vec::new();

    if let Some(observed) = args.observed()? {
        sections.push(render_analysis(&Analysis::run(observed), args.width));
    }
    if args.population {
        sections.push(render_population(args.width));
    }
    if args.info {
        sections.push(render_information(args.width));
    }

    println!("{}", sections.join("\n"));
    Ok(())
}

/// Sets up logging for the chosen mode.
///
/// The interactive interface owns the terminal, so it only logs when asked
/// to, and then to a file.
fn setup_logging(args: &Args) -> Result<()> {
    let log_file = if args.is_cli_mode() {
        args.log_file.clone()
    } else if args.verbose > 0 || args.log_file.is_some() {
        Some(
            args.log_file
                .clone()
                .unwrap_or_else(|| random_log_path(&std::env::temp_dir())),
        )
    } else {
        return Ok(());
    };

    let config = LogConfig::from_verbosity(args.verbose)
        .with_log_file(log_file.clone())
        .with_ansi(!args.no_color);
    init_logging(&config).context("Failed to initialize logging")?;
    if let Some(path) = log_file {
        tracing::info!(path = %path.display(), "logging to file");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.width < 20 {
        anyhow::bail!("Width must be at least 20 (got {})", args.width);
    }

    setup_logging(&args)?;

    for (shadowed, earlier) in shadowed_genotypes(all_genotypes()) {
        tracing::info!(
            genotype = shadowed.label,
            shadowed_by = earlier.label,
            "reference genotype has the same allele pattern as an earlier entry and cannot be matched"
        );
    }

    if args.is_cli_mode() {
        run_cli_mode(&args)?;
    } else {
        run_app(AppState::new())?;
    }

    Ok(())
}
