use clap::{Parser, Subcommand};
use mailprobe_lib::VerifierOptions;

#[derive(Parser)]
#[command(name = "mailprobe-cli", about = "Verify email deliverability without sending mail")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// read addresses from stdin (one per line)
    #[arg(long)]
    pub stdin: bool,

    /// read addresses from a file (one per line)
    #[arg(long)]
    pub file: Option<String>,

    /// output format: human|json|ndjson|csv
    #[arg(long, default_value = "human")]
    pub format: String,

    /// write the report to a file instead of stdout
    #[arg(long)]
    pub out: Option<String>,

    /// identity announced in HELO
    #[arg(long)]
    pub helo: Option<String>,

    /// envelope sender for MAIL FROM
    #[arg(long = "from")]
    pub mail_from: Option<String>,

    /// random-address probes per catch-all check (1..=5)
    #[arg(long = "probes", default_value_t = 2)]
    pub probe_count: u8,

    /// SMTP port
    #[arg(long, default_value_t = 25)]
    pub port: u16,

    /// DNS query timeout (ms)
    #[arg(long = "dns-timeout", default_value_t = 5_000)]
    pub dns_timeout_ms: u64,

    /// SMTP connect timeout (ms)
    #[arg(long = "connect-timeout", default_value_t = 10_000)]
    pub connect_timeout_ms: u64,

    /// SMTP read timeout (ms)
    #[arg(long = "read-timeout", default_value_t = 15_000)]
    pub read_timeout_ms: u64,

    /// disable the per-domain catch-all cache
    #[arg(long = "no-cache")]
    pub no_cache: bool,

    /// print cache statistics after the run
    #[arg(long)]
    pub stats: bool,

    /// enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// verify a single address
    Verify { email: String },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }

    pub fn verifier_options(&self) -> VerifierOptions {
        let defaults = VerifierOptions::default();
        VerifierOptions {
            helo_domain: self
                .helo
                .clone()
                .unwrap_or_else(|| defaults.helo_domain.clone()),
            mail_from: self
                .mail_from
                .clone()
                .unwrap_or_else(|| defaults.mail_from.clone()),
            smtp_port: self.port,
            dns_timeout_ms: self.dns_timeout_ms,
            smtp_connect_timeout_ms: self.connect_timeout_ms,
            smtp_read_timeout_ms: self.read_timeout_ms,
            probe_count: self.probe_count,
            caching_enabled: !self.no_cache,
            ..defaults
        }
    }
}
