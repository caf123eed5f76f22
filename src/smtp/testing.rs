//! Scripted in-memory transports for exercising sessions without sockets.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::smtp::error::SmtpError;
use crate::smtp::transport::{Connector, Transport};

pub(crate) struct ScriptedTransport {
    replies: VecDeque<String>,
    sent: Vec<String>,
    log: Option<Arc<Mutex<Vec<String>>>>,
}

impl ScriptedTransport {
    pub(crate) fn replies(replies: Vec<&str>) -> Self {
        Self {
            replies: replies.into_iter().map(String::from).collect(),
            sent: Vec::new(),
            log: None,
        }
    }

    fn with_log(replies: Vec<String>, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            sent: Vec::new(),
            log: Some(log),
        }
    }

    pub(crate) fn sent(&self) -> Vec<&str> {
        self.sent.iter().map(String::as_str).collect()
    }
}

impl Transport for ScriptedTransport {
    fn send_command(&mut self, line: &str) -> Result<(), SmtpError> {
        self.sent.push(line.to_string());
        if let Some(log) = &self.log {
            log.lock().expect("command log").push(line.to_string());
        }
        Ok(())
    }

    fn read_response(&mut self) -> Result<String, SmtpError> {
        self.replies.pop_front().ok_or_else(|| {
            SmtpError::io(
                "scripted.test",
                25,
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "script exhausted"),
            )
        })
    }
}

/// Hands out one scripted transport per `connect` call, in order.
///
/// When the script queue runs dry, `connect` fails the way a refused TCP
/// connection would.
pub(crate) struct ScriptedConnector {
    scripts: Mutex<VecDeque<Vec<String>>>,
    pub(crate) log: Arc<Mutex<Vec<String>>>,
    pub(crate) connects: AtomicUsize,
}

impl ScriptedConnector {
    pub(crate) fn new(scripts: Vec<Vec<&str>>) -> Self {
        Self {
            scripts: Mutex::new(
                scripts
                    .into_iter()
                    .map(|s| s.into_iter().map(String::from).collect())
                    .collect(),
            ),
            log: Arc::new(Mutex::new(Vec::new())),
            connects: AtomicUsize::new(0),
        }
    }

    pub(crate) fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub(crate) fn sent_commands(&self) -> Vec<String> {
        self.log.lock().expect("command log").clone()
    }
}

impl Connector for ScriptedConnector {
    fn connect(&self, host: &str) -> Result<Box<dyn Transport>, SmtpError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let script = self.scripts.lock().expect("scripts").pop_front();
        match script {
            Some(replies) => Ok(Box::new(ScriptedTransport::with_log(
                replies,
                Arc::clone(&self.log),
            ))),
            None => Err(SmtpError::connect(
                host,
                25,
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "no script queued"),
            )),
        }
    }
}
