//! SMTP dialogue machinery: transport, session state machine, and response
//! interpretation.
//!
//! The transport owns one TCP connection and speaks CRLF-framed lines with
//! multi-line reply reassembly. The session drives the fixed
//! GREETING → HELO → MAIL FROM → RCPT TO → QUIT dialogue and records what the
//! server said; [`interpret`] turns that record into a verdict.

mod error;
mod interpret;
mod session;
mod transport;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use error::SmtpError;
pub use interpret::interpret;
pub use session::SmtpSession;
pub use transport::{Connector, SmtpTransport, TcpConnector, Transport};
pub use types::{
    NO_RESPONSE_CODE, SmtpOutcome, SmtpPhase, SmtpResponse, SmtpVerificationResult,
};
