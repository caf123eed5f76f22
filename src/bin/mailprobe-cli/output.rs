use anyhow::Result;
use mailprobe_lib::{VerificationResult, VerificationStatus};

const ANSI_RESET: &str = "\u{1b}[0m";
const ANSI_GREEN: &str = "\u{1b}[32m";
const ANSI_RED: &str = "\u{1b}[31m";
const ANSI_YELLOW: &str = "\u{1b}[33m";
const ANSI_MAGENTA: &str = "\u{1b}[35m";

/// One verified address plus its outcome, as reported to the user.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
pub struct ReportRow {
    pub address: String,
    #[cfg_attr(feature = "with-serde", serde(flatten))]
    pub result: VerificationResult,
}

pub fn print_human(row: &ReportRow) {
    let color = status_color(row.result.status);
    println!(
        "{color}[{}]{ANSI_RESET} {}",
        row.result.status, row.address
    );
    if let Some(diagnostic) = &row.result.diagnostic {
        println!("        {diagnostic}");
    }
    if row.result.status == VerificationStatus::Valid {
        println!(
            "        catch-all: {}",
            row.result.catch_all_confidence
        );
    }
}

fn status_color(status: VerificationStatus) -> &'static str {
    match status {
        VerificationStatus::Valid => ANSI_GREEN,
        VerificationStatus::CatchAll => ANSI_MAGENTA,
        VerificationStatus::Invalid => ANSI_RED,
        VerificationStatus::Unknown => ANSI_YELLOW,
    }
}

pub fn emit(format: &str, out: Option<&str>, rows: &[ReportRow]) -> Result<()> {
    match format {
        "human" => {
            for row in rows {
                print_human(row);
            }
        }
        "json" => {
            #[cfg(feature = "with-serde")]
            {
                let payload = serde_json::to_string_pretty(rows)?;
                write_out(out, payload.into_bytes())?;
            }
            #[cfg(not(feature = "with-serde"))]
            anyhow::bail!("format=json requires the 'with-serde' feature");
        }
        "ndjson" => {
            #[cfg(feature = "with-serde")]
            {
                let mut buf = Vec::new();
                for row in rows {
                    buf.extend_from_slice(serde_json::to_string(row)?.as_bytes());
                    buf.push(b'\n');
                }
                write_out(out, buf)?;
            }
            #[cfg(not(feature = "with-serde"))]
            anyhow::bail!("format=ndjson requires the 'with-serde' feature");
        }
        "csv" => {
            #[cfg(feature = "with-csv")]
            {
                let mut wtr = csv::Writer::from_writer(Vec::new());
                wtr.write_record([
                    "address",
                    "status",
                    "syntax_valid",
                    "domain_resolvable",
                    "smtp_accepted",
                    "catch_all_confidence",
                    "diagnostic",
                ])?;
                for row in rows {
                    let status = row.result.status.to_string();
                    let confidence = row.result.catch_all_confidence.to_string();
                    wtr.write_record([
                        row.address.as_str(),
                        status.as_str(),
                        bool_str(row.result.syntax_valid),
                        bool_str(row.result.domain_resolvable),
                        bool_str(row.result.smtp_accepted),
                        confidence.as_str(),
                        row.result.diagnostic.as_deref().unwrap_or(""),
                    ])?;
                }
                write_out(out, wtr.into_inner()?)?;
            }
            #[cfg(not(feature = "with-csv"))]
            anyhow::bail!("format=csv requires the 'with-csv' feature");
        }
        other => anyhow::bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
    Ok(())
}

#[cfg(any(feature = "with-serde", feature = "with-csv"))]
fn write_out(out: Option<&str>, bytes: Vec<u8>) -> Result<()> {
    match out {
        Some(path) => write_all_atomically(path, &bytes),
        None => {
            let text = String::from_utf8_lossy(&bytes);
            println!("{}", text.trim_end_matches('\n'));
            Ok(())
        }
    }
}

#[cfg(any(feature = "with-serde", feature = "with-csv"))]
fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;
    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(feature = "with-csv")]
fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
