use std::fmt;

/// Sentinel code recorded when the server sent nothing parseable.
pub const NO_RESPONSE_CODE: i32 = -1;

/// Phases of the verification dialogue, in wire order.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SmtpPhase {
    Greeting,
    Helo,
    MailFrom,
    RcptTo,
    Quit,
}

impl fmt::Display for SmtpPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Greeting => f.write_str("GREETING"),
            Self::Helo => f.write_str("HELO"),
            Self::MailFrom => f.write_str("MAIL FROM"),
            Self::RcptTo => f.write_str("RCPT TO"),
            Self::Quit => f.write_str("QUIT"),
        }
    }
}

/// A single phase-tagged server response.
///
/// `code` is the 3-digit status, or [`NO_RESPONSE_CODE`] when the server sent
/// nothing or something unparseable; the sentinel is neither positive,
/// transient, nor permanent.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpResponse {
    pub code: i32,
    pub message: String,
    pub phase: SmtpPhase,
}

impl SmtpResponse {
    pub fn new(code: i32, message: impl Into<String>, phase: SmtpPhase) -> Self {
        Self {
            code,
            message: message.into(),
            phase,
        }
    }

    /// Parse a raw reassembled reply into a structured observation.
    ///
    /// The first three bytes must form a decimal status code; anything else
    /// is recorded verbatim under the sentinel code.
    pub fn parse(raw: &str, phase: SmtpPhase) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::new(NO_RESPONSE_CODE, "NO_RESPONSE", phase);
        }
        if let Some(prefix) = trimmed.get(..3) {
            if let Ok(code) = prefix.parse::<i32>() {
                let message = trimmed.get(3..).unwrap_or("").trim();
                return Self::new(code, message, phase);
            }
        }
        Self::new(NO_RESPONSE_CODE, trimmed, phase)
    }

    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_transient_failure(&self) -> bool {
        (400..500).contains(&self.code)
    }

    pub fn is_permanent_failure(&self) -> bool {
        (500..600).contains(&self.code)
    }
}

/// High-level semantic outcome of the primary dialogue.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpOutcome {
    Accepted,
    Rejected,
    Indeterminate,
}

impl fmt::Display for SmtpOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => f.write_str("accepted"),
            Self::Rejected => f.write_str("rejected"),
            Self::Indeterminate => f.write_str("indeterminate"),
        }
    }
}

/// Interpretation of a recorded response sequence.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpVerificationResult {
    pub outcome: SmtpOutcome,
    /// The phase whose response determined the outcome, when one did.
    pub decisive_phase: Option<SmtpPhase>,
    pub diagnostic: Option<String>,
}

impl SmtpVerificationResult {
    pub fn accepted(diagnostic: impl Into<String>) -> Self {
        Self {
            outcome: SmtpOutcome::Accepted,
            decisive_phase: Some(SmtpPhase::RcptTo),
            diagnostic: Some(diagnostic.into()),
        }
    }

    pub fn rejected(diagnostic: impl Into<String>) -> Self {
        Self {
            outcome: SmtpOutcome::Rejected,
            decisive_phase: Some(SmtpPhase::RcptTo),
            diagnostic: Some(diagnostic.into()),
        }
    }

    /// Transient 4xx on RCPT TO. Greylisting lands here.
    pub fn temporary_failure(diagnostic: impl Into<String>) -> Self {
        Self {
            outcome: SmtpOutcome::Indeterminate,
            decisive_phase: Some(SmtpPhase::RcptTo),
            diagnostic: Some(diagnostic.into()),
        }
    }

    /// Rejection at a phase before RCPT TO: a block, not mailbox evidence.
    pub fn blocked(phase: SmtpPhase, diagnostic: impl Into<String>) -> Self {
        Self {
            outcome: SmtpOutcome::Indeterminate,
            decisive_phase: Some(phase),
            diagnostic: Some(diagnostic.into()),
        }
    }

    pub fn indeterminate(phase: Option<SmtpPhase>, diagnostic: impl Into<String>) -> Self {
        Self {
            outcome: SmtpOutcome::Indeterminate,
            decisive_phase: phase,
            diagnostic: Some(diagnostic.into()),
        }
    }
}
