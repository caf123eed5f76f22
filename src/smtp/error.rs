use thiserror::Error;

/// Transport-level failures for a single SMTP connection.
#[derive(Debug, Error)]
pub enum SmtpError {
    #[error("connection to {host}:{port} failed: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },
    #[error("transport failure on {host}:{port}: {source}")]
    Io {
        host: String,
        port: u16,
        #[source]
        source: std::io::Error,
    },
    #[error("no socket address resolved for {host}:{port}")]
    NoSocketAddress { host: String, port: u16 },
    #[error("not connected")]
    NotConnected,
}

impl SmtpError {
    pub(crate) fn connect(host: &str, port: u16, source: std::io::Error) -> Self {
        Self::Connect {
            host: host.to_string(),
            port,
            source,
        }
    }

    pub(crate) fn io(host: &str, port: u16, source: std::io::Error) -> Self {
        Self::Io {
            host: host.to_string(),
            port,
            source,
        }
    }
}
