//! Control-channel client for the engine's line-oriented TCP protocol
//!
//! The engine exposes a plain-text request/response protocol: the client
//! writes a newline-terminated command, the engine answers with zero or more
//! lines of text followed by a terminator line containing a single `.`.
//! The protocol is strictly half-duplex; a command must complete before the
//! next one is issued, which the `&mut self` receiver on
//! [`ControlChannel::command`] enforces at compile time.
//!
//! [`ControlChannel`] is the seam between the controllers and the wire:
//! [`TcpControlClient`] implements it over a real socket, and tests use a
//! scripted in-memory channel instead.

use crate::error::{PanelError, Result};
use std::fmt;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::TcpStream;
use std::time::Duration;

/// Line that terminates every response
pub const RESPONSE_TERMINATOR: &str = ".";

/// Address of a running engine's control port
///
/// Immutable once constructed; shared by the poll loop and every dispatched
/// node controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Hostname or address
    pub host: String,
    /// TCP port of the control protocol
    pub port: u16,
}

impl Endpoint {
    /// Create a new endpoint
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Unified interface for issuing control-protocol commands
///
/// Implementations must be `Send` so channels can move into worker threads
/// and node controllers.
pub trait ControlChannel: Send {
    /// Send one command and return the response body
    ///
    /// The body is everything the engine wrote before the `.` terminator,
    /// with `\r` stripped and without a trailing newline.
    fn command(&mut self, cmd: &str) -> Result<String>;
}

/// [`ControlChannel`] implementation over a TCP socket
pub struct TcpControlClient {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
}

impl TcpControlClient {
    /// Connect to the engine without a read timeout
    ///
    /// A refused or unreachable target surfaces as [`PanelError::Connection`];
    /// callers must propagate it, since the only sane response is to inform
    /// the user and abort startup.
    pub fn connect(endpoint: &Endpoint) -> Result<Self> {
        Self::connect_with_timeout(endpoint, None)
    }

    /// Connect with an optional read timeout on every command
    ///
    /// The timeout is a hardening addition over the observed protocol: the
    /// engine never negotiates one, but a stalled response would otherwise
    /// hang the caller forever. Expiry surfaces as [`PanelError::Timeout`].
    pub fn connect_with_timeout(
        endpoint: &Endpoint,
        read_timeout: Option<Duration>,
    ) -> Result<Self> {
        let stream = TcpStream::connect((endpoint.host.as_str(), endpoint.port))?;
        stream.set_read_timeout(read_timeout)?;
        stream.set_nodelay(true)?;
        let reader = BufReader::new(stream.try_clone()?);
        Ok(Self { stream, reader })
    }
}

impl ControlChannel for TcpControlClient {
    fn command(&mut self, cmd: &str) -> Result<String> {
        self.stream.write_all(cmd.as_bytes())?;
        self.stream.write_all(b"\n")?;
        self.stream.flush()?;

        let mut body = String::new();
        let mut line = String::new();
        loop {
            line.clear();
            let n = self.reader.read_line(&mut line).map_err(|e| {
                if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) {
                    PanelError::Timeout(format!("no response to `{}` before the read timeout", cmd))
                } else {
                    PanelError::Connection(e)
                }
            })?;
            if n == 0 {
                return Err(PanelError::MalformedResponse(format!(
                    "connection closed before the `.` terminator (command `{}`)",
                    cmd
                )));
            }
            let trimmed = line.trim_end_matches(|c| c == '\r' || c == '\n');
            if trimmed == RESPONSE_TERMINATOR {
                break;
            }
            body.push_str(trimmed);
            body.push('\n');
        }

        // Drop the newline the loop appended after the last body line.
        body.pop();
        Ok(body)
    }
}
