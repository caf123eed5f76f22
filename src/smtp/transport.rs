use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::smtp::error::SmtpError;

/// Line-oriented request/response surface of one SMTP connection.
///
/// Commands go out with an explicit CRLF terminator; responses come back
/// fully reassembled (continuation lines joined with `\n`).
pub trait Transport {
    fn send_command(&mut self, line: &str) -> Result<(), SmtpError>;
    fn read_response(&mut self) -> Result<String, SmtpError>;
}

/// Factory for fresh connections to a mail host.
pub trait Connector {
    fn connect(&self, host: &str) -> Result<Box<dyn Transport>, SmtpError>;
}

/// Opens real TCP transports with the configured port and timeouts.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    pub port: u16,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Connector for TcpConnector {
    fn connect(&self, host: &str) -> Result<Box<dyn Transport>, SmtpError> {
        let transport =
            SmtpTransport::connect(host, self.port, self.connect_timeout, self.read_timeout)?;
        Ok(Box::new(transport))
    }
}

/// A scoped handle on one TCP connection to a mail host.
///
/// Dropping the handle closes the socket; [`SmtpTransport::close`] does the
/// same explicitly and never fails. Operations after close return
/// [`SmtpError::NotConnected`].
#[derive(Debug)]
pub struct SmtpTransport {
    host: String,
    port: u16,
    stream: Option<TcpStream>,
    reader: Option<BufReader<TcpStream>>,
}

impl SmtpTransport {
    pub fn connect(
        host: &str,
        port: u16,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self, SmtpError> {
        let addrs = resolve_addrs(host, port)?;
        let mut last_err = None;
        for addr in &addrs {
            match TcpStream::connect_timeout(addr, connect_timeout) {
                Ok(stream) => {
                    stream
                        .set_read_timeout(Some(read_timeout))
                        .map_err(|err| SmtpError::io(host, port, err))?;
                    stream
                        .set_write_timeout(Some(read_timeout))
                        .map_err(|err| SmtpError::io(host, port, err))?;
                    let reader = BufReader::new(
                        stream
                            .try_clone()
                            .map_err(|err| SmtpError::io(host, port, err))?,
                    );
                    return Ok(Self {
                        host: host.to_string(),
                        port,
                        stream: Some(stream),
                        reader: Some(reader),
                    });
                }
                Err(err) => last_err = Some(err),
            }
        }
        Err(match last_err {
            Some(err) => SmtpError::connect(host, port, err),
            None => SmtpError::NoSocketAddress {
                host: host.to_string(),
                port,
            },
        })
    }

    /// Flush and close the socket. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = (&stream).flush();
            let _ = stream.shutdown(std::net::Shutdown::Both);
        }
        self.reader = None;
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

impl Transport for SmtpTransport {
    fn send_command(&mut self, line: &str) -> Result<(), SmtpError> {
        let stream = self.stream.as_mut().ok_or(SmtpError::NotConnected)?;
        let mut data = line.as_bytes().to_vec();
        data.extend_from_slice(b"\r\n");
        stream
            .write_all(&data)
            .and_then(|()| stream.flush())
            .map_err(|err| SmtpError::io(&self.host, self.port, err))
    }

    fn read_response(&mut self) -> Result<String, SmtpError> {
        let host = self.host.clone();
        let port = self.port;
        let reader = self.reader.as_mut().ok_or(SmtpError::NotConnected)?;
        let mut lines = Vec::new();
        loop {
            let line = read_line(reader, &host, port)?;
            // "NNN-" marks a continuation; "NNN " or anything shorter than
            // four characters terminates the reply.
            let done = line.as_bytes().get(3).copied() != Some(b'-');
            lines.push(line);
            if done {
                break;
            }
        }
        Ok(lines.join("\n"))
    }
}

impl Drop for SmtpTransport {
    fn drop(&mut self) {
        self.close();
    }
}

fn resolve_addrs(host: &str, port: u16) -> Result<Vec<SocketAddr>, SmtpError> {
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|err| SmtpError::connect(host, port, err))?
        .collect();
    if addrs.is_empty() {
        return Err(SmtpError::NoSocketAddress {
            host: host.to_string(),
            port,
        });
    }
    Ok(addrs)
}

fn read_line(
    reader: &mut BufReader<TcpStream>,
    host: &str,
    port: u16,
) -> Result<String, SmtpError> {
    let mut buf = Vec::new();
    let read = reader
        .read_until(b'\n', &mut buf)
        .map_err(|err| SmtpError::io(host, port, err))?;
    if read == 0 {
        return Err(SmtpError::io(
            host,
            port,
            std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed while reading reply",
            ),
        ));
    }
    if buf.ends_with(b"\n") {
        buf.pop();
        if buf.ends_with(b"\r") {
            buf.pop();
        }
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    fn spawn_line_server(payload: &'static [u8]) -> (u16, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let port = listener.local_addr().expect("addr").port();
        let (ready_tx, ready_rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            ready_tx.send(()).ok();
            if let Ok((mut stream, _)) = listener.accept() {
                stream.write_all(payload).ok();
                stream.flush().ok();
            }
        });
        ready_rx.recv().expect("server ready");
        (port, handle)
    }

    fn connect_local(port: u16) -> SmtpTransport {
        SmtpTransport::connect(
            "127.0.0.1",
            port,
            Duration::from_secs(2),
            Duration::from_secs(2),
        )
        .expect("connect")
    }

    #[test]
    #[ignore = "requires loopback TCP binding"]
    fn reads_single_line_reply() {
        let (port, handle) = spawn_line_server(b"220 mail.test ESMTP\r\n");
        let mut transport = connect_local(port);
        let reply = transport.read_response().expect("reply");
        assert_eq!(reply, "220 mail.test ESMTP");
        handle.join().expect("server thread");
    }

    #[test]
    #[ignore = "requires loopback TCP binding"]
    fn reassembles_multi_line_reply() {
        let (port, handle) =
            spawn_line_server(b"250-mail.test\r\n250-SIZE 35882577\r\n250 HELP\r\n");
        let mut transport = connect_local(port);
        let reply = transport.read_response().expect("reply");
        assert_eq!(reply, "250-mail.test\n250-SIZE 35882577\n250 HELP");
        handle.join().expect("server thread");
    }

    #[test]
    #[ignore = "requires loopback TCP binding"]
    fn short_line_terminates_reassembly() {
        let (port, handle) = spawn_line_server(b"ok\r\n");
        let mut transport = connect_local(port);
        let reply = transport.read_response().expect("reply");
        assert_eq!(reply, "ok");
        handle.join().expect("server thread");
    }

    #[test]
    #[ignore = "requires loopback TCP binding"]
    fn operations_after_close_fail() {
        let (port, handle) = spawn_line_server(b"220 hi\r\n");
        let mut transport = connect_local(port);
        transport.close();
        transport.close();
        assert!(matches!(
            transport.send_command("QUIT"),
            Err(SmtpError::NotConnected)
        ));
        assert!(matches!(
            transport.read_response(),
            Err(SmtpError::NotConnected)
        ));
        handle.join().expect("server thread");
    }
}
