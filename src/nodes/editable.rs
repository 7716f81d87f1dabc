//! Editable playlist node controller
//!
//! An editable node is a queue whose pending region can be reordered:
//! requests can be inserted at a position, moved, or removed, not only
//! pushed at the bottom. Positions index into the pending queue; `-1`
//! means the end.

use crate::client::{ControlChannel, Endpoint, TcpControlClient};
use crate::error::{PanelError, Result};
use crate::nodes::metadata::Metadata;
use crate::nodes::queue::{fetch_queue, fetch_request_metadata};

/// Controller for an `editable` node
pub struct EditableController {
    op: String,
    channel: Box<dyn ControlChannel>,
}

impl EditableController {
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

    /// Ids of the currently scheduled requests
    pub fn queue(&mut self) -> Result<Vec<u32>> {
        fetch_queue(self.channel.as_mut(), &self.op)
    }

    /// Metadata for every scheduled request, in queue order
    pub fn contents(&mut self) -> Result<Vec<Metadata>> {
        let rids = self.queue()?;
        rids.into_iter()
            .map(|rid| fetch_request_metadata(self.channel.as_mut(), rid))
            .collect()
    }

    /// Enqueue a URI at the bottom
    pub fn push(&mut self, uri: &str) -> Result<()> {
        self.channel
            .command(&format!("{}.push {}", self.op, uri))
            .map(drop)
    }

    /// Insert a URI at a position in the pending queue
    pub fn insert(&mut self, position: i64, uri: &str) -> Result<()> {
        self.channel
            .command(&format!("{}.insert {} {}", self.op, position, uri))
            .map(drop)
    }

    /// Move a request to a position in the pending queue
    pub fn move_request(&mut self, rid: u32, position: i64) -> Result<()> {
        self.channel
            .command(&format!("{}.move {} {}", self.op, rid, position))
            .map(drop)
    }

    /// Remove a request from the pending queue
    pub fn remove(&mut self, rid: u32) -> Result<()> {
        self.channel
            .command(&format!("{}.remove {}", self.op, rid))
            .map(drop)
    }

    /// Number of requests still in the pending (reorderable) region
    pub fn pending_length(&mut self) -> Result<usize> {
        let body = self.channel.command(&format!("{}.pending_length", self.op))?;
        body.trim().parse().map_err(|_| {
            PanelError::MalformedResponse(format!("expected a pending length, got `{}`", body))
        })
    }
}
