use std::time::Duration;

use trust_dns_resolver::Resolver;
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::proto::op::ResponseCode;
use trust_dns_resolver::system_conf::read_system_conf;

use super::error::DnsError;
use super::types::{DnsResolutionResult, DnsStatus, MxRecord};

/// Why an MX query produced no usable records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LookupFailure {
    NxDomain,
    NoRecords,
    Timeout,
    Other(String),
}

/// Seam between the resolution policy and the actual DNS client, so the
/// policy can be exercised against stubs.
pub(crate) trait LookupMailHosts {
    fn mx_records(&self, domain: &str) -> Result<Vec<MxRecord>, LookupFailure>;
    fn has_address_records(&self, domain: &str) -> bool;
}

/// Resolves a domain to the ordered list of hosts that accept its mail.
///
/// MX records answer when present; otherwise the domain's own A/AAAA record
/// is used as the implicit MX per RFC 5321. NXDOMAIN suppresses the fallback.
pub struct MailHostResolver {
    resolver: Resolver,
}

impl MailHostResolver {
    /// Build on the system resolver configuration with the given query
    /// timeout.
    pub fn from_system_conf(timeout: Duration) -> Result<Self, DnsError> {
        let (config, mut opts) = read_system_conf().map_err(DnsError::resolver_init)?;
        opts.timeout = timeout;
        let resolver = Resolver::new(config, opts).map_err(DnsError::resolver_init)?;
        Ok(Self { resolver })
    }

    pub fn resolve(&self, domain: &str) -> DnsResolutionResult {
        resolve_with(&self.resolver, domain)
    }
}

pub(crate) fn resolve_with<R: LookupMailHosts>(resolver: &R, domain: &str) -> DnsResolutionResult {
    let domain = domain.trim();
    if domain.is_empty() {
        return DnsResolutionResult::failure("Domain is empty");
    }

    let mx_result = query_mx(resolver, domain);
    if mx_result.status == DnsStatus::MxFound {
        return mx_result;
    }

    // No MX but the domain exists: its own address record is the implicit MX.
    if mx_result.status != DnsStatus::NxDomain && resolver.has_address_records(domain) {
        tracing::debug!(domain, "no MX records, using A/AAAA fallback");
        return DnsResolutionResult::fallback_a_record(domain);
    }

    mx_result
}

fn query_mx<R: LookupMailHosts>(resolver: &R, domain: &str) -> DnsResolutionResult {
    match resolver.mx_records(domain) {
        Ok(records) => {
            let mut records = records;
            records.sort_by_key(|r| r.preference);
            let hosts: Vec<String> = records
                .into_iter()
                .map(|r| normalize_exchange(r.exchange))
                .filter(|host| !host.is_empty())
                .collect();
            if hosts.is_empty() {
                DnsResolutionResult::failure("No MX records found")
            } else {
                DnsResolutionResult::mx_found(hosts)
            }
        }
        Err(LookupFailure::NxDomain) => DnsResolutionResult::nx_domain(),
        Err(LookupFailure::NoRecords) => DnsResolutionResult::failure("No MX records found"),
        Err(LookupFailure::Timeout) => DnsResolutionResult::timeout(),
        Err(LookupFailure::Other(message)) => {
            DnsResolutionResult::failure(format!("DNS query failed: {message}"))
        }
    }
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    exchange.trim_end_matches('.').to_ascii_lowercase()
}

impl LookupMailHosts for MailHostResolver {
    fn mx_records(&self, domain: &str) -> Result<Vec<MxRecord>, LookupFailure> {
        self.resolver.mx_records(domain)
    }

    fn has_address_records(&self, domain: &str) -> bool {
        self.resolver.has_address_records(domain)
    }
}

impl LookupMailHosts for Resolver {
    fn mx_records(&self, domain: &str) -> Result<Vec<MxRecord>, LookupFailure> {
        let lookup = self.mx_lookup(domain).map_err(classify_resolve_error)?;
        Ok(lookup
            .iter()
            .map(|mx| MxRecord::new(mx.preference(), mx.exchange().to_utf8()))
            .collect())
    }

    fn has_address_records(&self, domain: &str) -> bool {
        self.lookup_ip(domain)
            .map(|lookup| lookup.iter().next().is_some())
            .unwrap_or(false)
    }
}

fn classify_resolve_error(err: ResolveError) -> LookupFailure {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            if *response_code == ResponseCode::NXDomain {
                LookupFailure::NxDomain
            } else {
                LookupFailure::NoRecords
            }
        }
        ResolveErrorKind::Timeout => LookupFailure::Timeout,
        _ => LookupFailure::Other(err.to_string()),
    }
}
