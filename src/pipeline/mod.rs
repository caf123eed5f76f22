//! The stage-orchestrating verification pipeline.
//!
//! Stages run in order (syntax, DNS, SMTP dialogue, interpretation,
//! behavioural analysis) with fail-fast early exits: a syntax failure never
//! touches DNS, an unresolvable domain never opens a socket, and the probe
//! session only runs after the primary dialogue accepted the recipient.

mod types;

pub use types::{VerificationResult, VerificationStatus};

use crate::catchall::{CacheStatistics, CatchAllDetectionResult, CatchAllDetector};
use crate::dns::{DnsError, LookupMailHosts, MailHostResolver, resolve_with};
use crate::options::VerifierOptions;
use crate::smtp::{Connector, SmtpOutcome, SmtpSession, TcpConnector, interpret};
use crate::syntax::validate_address;

/// Verifies addresses end to end.
///
/// One instance is meant to be shared: the detector's domain cache lives for
/// the lifetime of the pipeline, and concurrent `verify` calls only share
/// that cache; each call owns its transports exclusively.
pub struct VerificationPipeline {
    resolver: MailHostResolver,
    connector: TcpConnector,
    detector: CatchAllDetector,
    options: VerifierOptions,
}

impl VerificationPipeline {
    pub fn new(options: VerifierOptions) -> Result<Self, DnsError> {
        let resolver = MailHostResolver::from_system_conf(options.dns_timeout())?;
        let connector = TcpConnector {
            port: options.smtp_port,
            connect_timeout: options.connect_timeout(),
            read_timeout: options.read_timeout(),
        };
        let detector = CatchAllDetector::new(&options);
        Ok(Self {
            resolver,
            connector,
            detector,
            options,
        })
    }

    /// Classify one address. Never panics and never returns an error; every
    /// failure mode maps onto a [`VerificationStatus`].
    pub fn verify(&self, address: &str) -> VerificationResult {
        verify_with(
            &self.resolver,
            &self.connector,
            &self.detector,
            &self.options,
            address,
        )
    }

    pub fn cache_statistics(&self) -> CacheStatistics {
        self.detector.cache_statistics()
    }

    pub fn clear_cache(&self) {
        self.detector.clear_cache();
    }
}

pub(crate) fn verify_with<R, C>(
    resolver: &R,
    connector: &C,
    detector: &CatchAllDetector,
    options: &VerifierOptions,
    address: &str,
) -> VerificationResult
where
    R: LookupMailHosts,
    C: Connector + ?Sized,
{
    let syntax = validate_address(address);
    if !syntax.valid {
        tracing::debug!(address, reason = %syntax.message, "rejected by syntax stage");
        return VerificationResult::invalid(false, false, "Invalid email syntax");
    }
    let domain = syntax.domain.as_deref().unwrap_or_default();

    let dns = resolve_with(resolver, domain);
    if !dns.has_mail_hosts() {
        tracing::debug!(domain, status = %dns.status, "no mail hosts");
        return VerificationResult::invalid(true, false, "Domain has no valid MX/A mail hosts");
    }
    let mail_host = dns.primary_mail_host().unwrap_or_default().to_string();

    let responses = {
        let mut transport = match connector.connect(&mail_host) {
            Ok(transport) => transport,
            Err(err) => {
                return VerificationResult::unknown(format!("SMTP transport failure: {err}"));
            }
        };
        let session = SmtpSession::new(
            transport.as_mut(),
            &options.helo_domain,
            &options.mail_from,
        );
        match session.verify(address) {
            Ok(responses) => responses,
            Err(err) => {
                return VerificationResult::unknown(format!("SMTP transport failure: {err}"));
            }
        }
    };

    let smtp_result = interpret(&responses);

    let catch_all = if smtp_result.outcome == SmtpOutcome::Accepted {
        detector.analyze_multi_probe(connector, &responses, &mail_host, domain)
    } else {
        CatchAllDetectionResult::not_detected("Primary verification rejected")
    };

    match smtp_result.outcome {
        SmtpOutcome::Accepted => {
            if catch_all.is_confirmed() {
                VerificationResult::catch_all(smtp_result.diagnostic)
            } else {
                VerificationResult::valid(catch_all.confidence, smtp_result.diagnostic)
            }
        }
        SmtpOutcome::Rejected => VerificationResult::invalid(
            true,
            true,
            smtp_result.diagnostic.unwrap_or_default(),
        ),
        SmtpOutcome::Indeterminate => {
            VerificationResult::unknown(smtp_result.diagnostic.unwrap_or_default())
        }
    }
}
