use std::fmt;

use crate::catchall::Confidence;

/// Final classification of one address.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    /// Accepted by a selective server.
    Valid,
    /// Accepted, but the server accepts every local part.
    CatchAll,
    /// Failed syntax, DNS, or was rejected by the server.
    Invalid,
    /// The question could not be settled. Unknown beats guessing.
    Unknown,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => f.write_str("VALID"),
            Self::CatchAll => f.write_str("CATCH-ALL"),
            Self::Invalid => f.write_str("INVALID"),
            Self::Unknown => f.write_str("UNKNOWN"),
        }
    }
}

/// Complete verification record: the final status plus the per-stage signals
/// it was fused from.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub status: VerificationStatus,
    pub syntax_valid: bool,
    pub domain_resolvable: bool,
    pub smtp_accepted: bool,
    pub catch_all_confidence: Confidence,
    pub diagnostic: Option<String>,
}

impl VerificationResult {
    pub fn valid(catch_all_confidence: Confidence, diagnostic: Option<String>) -> Self {
        Self {
            status: VerificationStatus::Valid,
            syntax_valid: true,
            domain_resolvable: true,
            smtp_accepted: true,
            catch_all_confidence,
            diagnostic,
        }
    }

    pub fn catch_all(diagnostic: Option<String>) -> Self {
        Self {
            status: VerificationStatus::CatchAll,
            syntax_valid: true,
            domain_resolvable: true,
            smtp_accepted: true,
            catch_all_confidence: Confidence::Confirmed,
            diagnostic,
        }
    }

    pub fn invalid(
        syntax_valid: bool,
        domain_resolvable: bool,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self {
            status: VerificationStatus::Invalid,
            syntax_valid,
            domain_resolvable,
            smtp_accepted: false,
            catch_all_confidence: Confidence::NotDetected,
            diagnostic: Some(diagnostic.into()),
        }
    }

    pub fn unknown(diagnostic: impl Into<String>) -> Self {
        Self {
            status: VerificationStatus::Unknown,
            syntax_valid: true,
            domain_resolvable: true,
            smtp_accepted: false,
            catch_all_confidence: Confidence::Indeterminate,
            diagnostic: Some(diagnostic.into()),
        }
    }
}
