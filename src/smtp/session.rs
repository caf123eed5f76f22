use crate::smtp::error::SmtpError;
use crate::smtp::transport::Transport;
use crate::smtp::types::{NO_RESPONSE_CODE, SmtpPhase, SmtpResponse};

/// Drives the linear verification dialogue on an already-connected transport.
///
/// The machine never branches on response codes; interpretation is a
/// separate concern. Every phase that produces a server reply is recorded as
/// a phase-tagged [`SmtpResponse`], and QUIT is attempted on every exit path.
pub struct SmtpSession<'a> {
    transport: &'a mut dyn Transport,
    helo_domain: &'a str,
    mail_from: &'a str,
    responses: Vec<SmtpResponse>,
}

impl<'a> SmtpSession<'a> {
    pub fn new(transport: &'a mut dyn Transport, helo_domain: &'a str, mail_from: &'a str) -> Self {
        Self {
            transport,
            helo_domain,
            mail_from,
            responses: Vec::new(),
        }
    }

    /// Execute the dialogue for one recipient.
    ///
    /// Returns the ordered response list, one entry per phase reached plus a
    /// final QUIT entry. A transport error stops the dialogue from advancing;
    /// QUIT is still attempted, then the error is surfaced to the caller.
    pub fn verify(mut self, recipient: &str) -> Result<Vec<SmtpResponse>, SmtpError> {
        let dialogue = self.run_dialogue(recipient);
        self.send_quit();
        dialogue?;
        Ok(self.responses)
    }

    fn run_dialogue(&mut self, recipient: &str) -> Result<(), SmtpError> {
        self.read_reply(SmtpPhase::Greeting)?;
        self.exchange(&format!("HELO {}", self.helo_domain), SmtpPhase::Helo)?;
        self.exchange(
            &format!("MAIL FROM:<{}>", self.mail_from),
            SmtpPhase::MailFrom,
        )?;
        self.exchange(&format!("RCPT TO:<{recipient}>"), SmtpPhase::RcptTo)?;
        Ok(())
    }

    fn send_quit(&mut self) {
        if self.exchange("QUIT", SmtpPhase::Quit).is_err() {
            self.responses.push(SmtpResponse::new(
                NO_RESPONSE_CODE,
                "NO_RESPONSE (connection closed during QUIT)",
                SmtpPhase::Quit,
            ));
        }
    }

    fn exchange(&mut self, command: &str, phase: SmtpPhase) -> Result<(), SmtpError> {
        self.transport.send_command(command)?;
        self.read_reply(phase)
    }

    fn read_reply(&mut self, phase: SmtpPhase) -> Result<(), SmtpError> {
        let raw = self.transport.read_response()?;
        let response = SmtpResponse::parse(&raw, phase);
        tracing::debug!(phase = %phase, code = response.code, "smtp reply");
        self.responses.push(response);
        Ok(())
    }
}
