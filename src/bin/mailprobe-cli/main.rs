use anyhow::{Context, Result};
use mailprobe_lib::{VerificationPipeline, VerificationStatus};
use tracing_subscriber::EnvFilter;

mod args;
mod output;
mod verify;

use args::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let addresses = verify::gather_addresses(&cli)?;
    if addresses.is_empty() {
        Cli::clap_command().print_help()?;
        println!();
        return Ok(());
    }

    let pipeline =
        VerificationPipeline::new(cli.verifier_options()).context("initialize pipeline")?;
    let rows = verify::run(&pipeline, &addresses);

    output::emit(&cli.format, cli.out.as_deref(), &rows)?;

    if cli.stats {
        verify::print_statistics(&pipeline.cache_statistics());
    }

    // Exit codes: 0 all verified, 2 at least one INVALID, 1 fatal error.
    let any_invalid = rows
        .iter()
        .any(|row| row.result.status == VerificationStatus::Invalid);
    if any_invalid {
        std::process::exit(2);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
