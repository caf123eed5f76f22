use std::fmt;

/// How the mail-host lookup concluded.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DnsStatus {
    /// MX records answered the query.
    MxFound,
    /// No MX; the domain's own A/AAAA record serves as the implicit MX.
    FallbackARecord,
    /// The domain does not exist.
    NxDomain,
    /// The query timed out.
    Timeout,
    /// Any other lookup failure.
    Failure,
}

impl fmt::Display for DnsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MxFound => f.write_str("MX records found"),
            Self::FallbackARecord => f.write_str("A/AAAA fallback"),
            Self::NxDomain => f.write_str("domain does not exist"),
            Self::Timeout => f.write_str("DNS query timed out"),
            Self::Failure => f.write_str("DNS lookup failed"),
        }
    }
}

/// Result of resolving a domain to its mail hosts.
///
/// `mail_hosts` is non-empty exactly when the status is [`DnsStatus::MxFound`]
/// or [`DnsStatus::FallbackARecord`]; the first entry is the primary host.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsResolutionResult {
    pub status: DnsStatus,
    pub mail_hosts: Vec<String>,
    pub error: Option<String>,
}

impl DnsResolutionResult {
    pub fn mx_found(mail_hosts: Vec<String>) -> Self {
        debug_assert!(!mail_hosts.is_empty());
        Self {
            status: DnsStatus::MxFound,
            mail_hosts,
            error: None,
        }
    }

    pub fn fallback_a_record(hostname: impl Into<String>) -> Self {
        Self {
            status: DnsStatus::FallbackARecord,
            mail_hosts: vec![hostname.into()],
            error: None,
        }
    }

    pub fn nx_domain() -> Self {
        Self {
            status: DnsStatus::NxDomain,
            mail_hosts: Vec::new(),
            error: Some("Domain does not exist".to_string()),
        }
    }

    pub fn timeout() -> Self {
        Self {
            status: DnsStatus::Timeout,
            mail_hosts: Vec::new(),
            error: Some("DNS query timed out".to_string()),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            status: DnsStatus::Failure,
            mail_hosts: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn has_mail_hosts(&self) -> bool {
        matches!(self.status, DnsStatus::MxFound | DnsStatus::FallbackARecord)
    }

    pub fn primary_mail_host(&self) -> Option<&str> {
        self.mail_hosts.first().map(String::as_str)
    }
}

/// One MX answer: preference plus exchange hostname.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }
}
