#![forbid(unsafe_code)]
//! mailprobe_lib: email deliverability verification without sending mail.
//!
//! The pipeline interrogates a domain's mail servers with a partial SMTP
//! dialogue (always aborted before DATA) and fuses syntax, DNS, dialogue,
//! and multi-probe behavioural signals into one conservative classification:
//! valid, catch-all, invalid, or unknown.

pub mod catchall;
pub mod dns;
pub mod options;
pub mod pipeline;
pub mod smtp;
pub mod syntax;

pub use catchall::{CacheStatistics, CatchAllDetectionResult, CatchAllDetector, Confidence};
pub use dns::{DnsError, DnsResolutionResult, DnsStatus, MailHostResolver, MxRecord};
pub use options::VerifierOptions;
pub use pipeline::{VerificationPipeline, VerificationResult, VerificationStatus};
pub use smtp::{
    SmtpError, SmtpOutcome, SmtpPhase, SmtpResponse, SmtpSession, SmtpTransport,
    SmtpVerificationResult, interpret,
};
pub use syntax::{SyntaxResult, validate_address};
