//! Output node controller
//!
//! Output nodes are the sinks of the stream graph: speakers, files, and
//! icecast mounts all answer the same command set, so a single controller
//! covers every `output.*` tag.

use crate::client::{ControlChannel, Endpoint, TcpControlClient};
use crate::error::{PanelError, Result};
use crate::nodes::metadata::{parse_metadata_blocks, Metadata};

/// The engine's marker for an unknown remaining time
const UNDEF: &str = "(undef)";

/// Controller for an `output.*` node
pub struct OutputController {
    op: String,
    channel: Box<dyn ControlChannel>,
}

impl OutputController {
    /// Wrap an existing channel
    pub fn new(op: impl Into<String>, channel: Box<dyn ControlChannel>) -> Self {
        Self {
            op: op.into(),
            channel,
        }
    }

    /// Open a dedicated connection for this node
    pub fn connect(endpoint: &Endpoint, op: impl Into<String>) -> Result<Self> {
        let channel = TcpControlClient::connect(endpoint)?;
        Ok(Self::new(op, Box::new(channel)))
    }

    /// Name of the node this controller is bound to
    pub fn name(&self) -> &str {
        &self.op
    }

    /// Whether the output is currently running
    pub fn is_on(&mut self) -> Result<bool> {
        let body = self.channel.command(&format!("{}.status", self.op))?;
        match body.trim() {
            "on" => Ok(true),
            "off" => Ok(false),
            other => Err(PanelError::MalformedResponse(format!(
                "expected `on` or `off`, got `{}`",
                other
            ))),
        }
    }

    /// Seconds left on the current track, or `None` when undefined
    pub fn remaining(&mut self) -> Result<Option<f64>> {
        let body = self.channel.command(&format!("{}.remaining", self.op))?;
        let body = body.trim();
        if body == UNDEF {
            return Ok(None);
        }
        body.parse().map(Some).map_err(|_| {
            PanelError::MalformedResponse(format!("expected a remaining time, got `{}`", body))
        })
    }

    /// Start the output
    pub fn start(&mut self) -> Result<()> {
        self.channel
            .command(&format!("{}.start", self.op))
            .map(drop)
    }

    /// Stop the output
    pub fn stop(&mut self) -> Result<()> {
        self.channel.command(&format!("{}.stop", self.op)).map(drop)
    }

    /// Start or stop depending on `on`
    pub fn set_on(&mut self, on: bool) -> Result<()> {
        if on {
            self.start()
        } else {
            self.stop()
        }
    }

    /// Skip the current track
    pub fn skip(&mut self) -> Result<()> {
        self.channel.command(&format!("{}.skip", self.op)).map(drop)
    }

    /// Metadata of the tracks this output has played, most recent last
    pub fn metadata(&mut self) -> Result<Vec<Metadata>> {
        let body = self.channel.command(&format!("{}.metadata", self.op))?;
        Ok(parse_metadata_blocks(&body))
    }
}
