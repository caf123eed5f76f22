use crate::smtp::types::{SmtpPhase, SmtpResponse, SmtpVerificationResult};

/// Classify a recorded response sequence.
///
/// Pure and deterministic: the same list always yields the same result. The
/// RCPT TO response is authoritative; rejections at earlier phases are
/// treated as blocks (anti-verification measures), not mailbox evidence.
pub fn interpret(responses: &[SmtpResponse]) -> SmtpVerificationResult {
    if responses.is_empty() {
        return SmtpVerificationResult::indeterminate(
            None,
            "Empty response collection - session failed to initiate or collapsed immediately",
        );
    }

    if let Some(rcpt_to) = find_phase(responses, SmtpPhase::RcptTo) {
        return interpret_rcpt_to(rcpt_to);
    }

    interpret_incomplete_session(responses)
}

fn interpret_rcpt_to(rcpt_to: &SmtpResponse) -> SmtpVerificationResult {
    let code = rcpt_to.code;

    if rcpt_to.is_positive_completion() {
        return SmtpVerificationResult::accepted(format!(
            "RCPT TO accepted with code {code}: {}",
            rcpt_to.message
        ));
    }

    if rcpt_to.is_transient_failure() {
        return SmtpVerificationResult::temporary_failure(format!(
            "RCPT TO returned transient failure {code}: {}",
            rcpt_to.message
        ));
    }

    if rcpt_to.is_permanent_failure() {
        return SmtpVerificationResult::rejected(format!(
            "RCPT TO permanently rejected with code {code}: {}",
            rcpt_to.message
        ));
    }

    SmtpVerificationResult::indeterminate(
        Some(SmtpPhase::RcptTo),
        format!(
            "RCPT TO returned non-standard code {code}: {} - unable to interpret definitively",
            rcpt_to.message
        ),
    )
}

fn interpret_incomplete_session(responses: &[SmtpResponse]) -> SmtpVerificationResult {
    if let Some(greeting) = find_phase(responses, SmtpPhase::Greeting) {
        if is_blocking(greeting.code) {
            return SmtpVerificationResult::blocked(
                SmtpPhase::Greeting,
                format!(
                    "Connection rejected at GREETING phase with code {}: {}",
                    greeting.code, greeting.message
                ),
            );
        }
    }

    if let Some(helo) = find_phase(responses, SmtpPhase::Helo) {
        if is_blocking(helo.code) {
            return SmtpVerificationResult::blocked(
                SmtpPhase::Helo,
                format!(
                    "HELO rejected with code {}: {} - common anti-verification measure",
                    helo.code, helo.message
                ),
            );
        }
    }

    if let Some(mail_from) = find_phase(responses, SmtpPhase::MailFrom) {
        if is_blocking(mail_from.code) {
            return SmtpVerificationResult::blocked(
                SmtpPhase::MailFrom,
                format!(
                    "MAIL FROM rejected with code {}: {} - sender validation failed",
                    mail_from.code, mail_from.message
                ),
            );
        }
    }

    let last_phase = responses.last().map(|r| r.phase);
    SmtpVerificationResult::indeterminate(
        last_phase,
        format!(
            "SMTP session terminated before RCPT TO - last recorded phase: {}",
            last_phase.map_or_else(|| "NONE".to_string(), |p| p.to_string())
        ),
    )
}

fn is_blocking(code: i32) -> bool {
    !(200..400).contains(&code)
}

fn find_phase(responses: &[SmtpResponse], phase: SmtpPhase) -> Option<&SmtpResponse> {
    responses.iter().find(|r| r.phase == phase)
}
