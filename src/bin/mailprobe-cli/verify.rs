use std::io::{self, BufRead, BufReader};

use anyhow::{Context, Result};
use mailprobe_lib::{CacheStatistics, VerificationPipeline};

use crate::args::Cli;
use crate::output::ReportRow;

/// Collect the addresses to verify from the subcommand, a file, or stdin.
pub fn gather_addresses(cli: &Cli) -> Result<Vec<String>> {
    let mut addresses = Vec::new();

    if let Some(crate::args::Commands::Verify { email }) = &cli.cmd {
        addresses.push(email.clone());
    }

    if let Some(path) = &cli.file {
        let file = std::fs::File::open(path).with_context(|| format!("open {path}"))?;
        collect_lines(BufReader::new(file), &mut addresses)?;
    }

    if cli.stdin {
        collect_lines(io::stdin().lock(), &mut addresses)?;
    }

    Ok(addresses)
}

fn collect_lines(reader: impl BufRead, addresses: &mut Vec<String>) -> Result<()> {
    for line in reader.lines() {
        let line = line.context("read address line")?;
        let trimmed = line.trim();
        // Blank lines and #-comments are skipped, as in any address list.
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        addresses.push(trimmed.to_string());
    }
    Ok(())
}

pub fn run(pipeline: &VerificationPipeline, addresses: &[String]) -> Vec<ReportRow> {
    addresses
        .iter()
        .map(|address| ReportRow {
            address: address.clone(),
            result: pipeline.verify(address),
        })
        .collect()
}

pub fn print_statistics(stats: &CacheStatistics) {
    if !stats.enabled {
        println!("cache: disabled");
        return;
    }
    println!(
        "cache: size={} hits={} misses={} hit_rate={:.1}%",
        stats.size,
        stats.hits,
        stats.misses,
        stats.hit_rate * 100.0
    );
}
