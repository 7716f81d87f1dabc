//! Static playlist node controller
//!
//! Playlist nodes are non-interactive: their contents are fixed by the
//! engine's own configuration. The only observable state is the list of
//! upcoming entries, each optionally prefixed with a resolution status in
//! square brackets.

use crate::client::{ControlChannel, Endpoint, TcpControlClient};
use crate::error::Result;

/// One upcoming playlist entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    /// Resolution status, e.g. `playing` or `ready`, when the engine
    /// reported one
    pub status: Option<String>,
    /// URI of the entry
    pub uri: String,
}

/// Controller for a `playlist` node
pub struct PlaylistController {
    op: String,
    channel: Box<dyn ControlChannel>,
}

impl PlaylistController {
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

    /// Upcoming entries, in play order
    pub fn next(&mut self) -> Result<Vec<PlaylistEntry>> {
        let body = self.channel.command(&format!("{}.next", self.op))?;
        Ok(body
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(parse_playlist_entry)
            .collect())
    }
}

/// `[status] uri`, or a bare URI when no status is reported
fn parse_playlist_entry(line: &str) -> PlaylistEntry {
    if let Some(rest) = line.strip_prefix('[') {
        if let Some((status, uri)) = rest.split_once("] ") {
            return PlaylistEntry {
                status: Some(status.to_string()),
                uri: uri.to_string(),
            };
        }
    }
    PlaylistEntry {
        status: None,
        uri: line.to_string(),
    }
}
