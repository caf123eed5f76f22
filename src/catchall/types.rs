use std::fmt;

/// How strongly the observed behaviour points at a catch-all server.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// Every random-address probe was accepted.
    Confirmed,
    /// Acceptance observed but probes could not settle the question.
    Suspected,
    /// The server rejected at least one unknown mailbox.
    NotDetected,
    /// No usable signal.
    Indeterminate,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed => f.write_str("confirmed"),
            Self::Suspected => f.write_str("suspected"),
            Self::NotDetected => f.write_str("not detected"),
            Self::Indeterminate => f.write_str("indeterminate"),
        }
    }
}

/// Verdict of the behavioural analysis for one domain.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchAllDetectionResult {
    pub confidence: Confidence,
    pub diagnostic: Option<String>,
}

impl CatchAllDetectionResult {
    pub fn confirmed(diagnostic: impl Into<String>) -> Self {
        Self {
            confidence: Confidence::Confirmed,
            diagnostic: Some(diagnostic.into()),
        }
    }

    pub fn suspected(diagnostic: impl Into<String>) -> Self {
        Self {
            confidence: Confidence::Suspected,
            diagnostic: Some(diagnostic.into()),
        }
    }

    pub fn not_detected(diagnostic: impl Into<String>) -> Self {
        Self {
            confidence: Confidence::NotDetected,
            diagnostic: Some(diagnostic.into()),
        }
    }

    pub fn indeterminate(diagnostic: impl Into<String>) -> Self {
        Self {
            confidence: Confidence::Indeterminate,
            diagnostic: Some(diagnostic.into()),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.confidence == Confidence::Confirmed
    }
}

/// Outcome of one random-address RCPT TO probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ProbeOutcome {
    Accepted(i32),
    Rejected(i32),
    Failed(String),
}
