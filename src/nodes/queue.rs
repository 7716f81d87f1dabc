//! Queue node controller
//!
//! Queues are interactive request lists: clients push URIs, the engine
//! schedules them, and individual requests can be flagged to be skipped
//! (`ignore`) or restored (`consider`).

use crate::client::{ControlChannel, Endpoint, TcpControlClient};
use crate::error::{PanelError, Result};
use crate::nodes::metadata::{parse_metadata_blocks, Metadata};

/// Controller for a `queue` node
pub struct QueueController {
    op: String,
    channel: Box<dyn ControlChannel>,
}

impl QueueController {
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

    /// Metadata for one request
    pub fn request_metadata(&mut self, rid: u32) -> Result<Metadata> {
        fetch_request_metadata(self.channel.as_mut(), rid)
    }

    /// Enqueue a URI
    pub fn push(&mut self, uri: &str) -> Result<()> {
        self.channel
            .command(&format!("{}.push {}", self.op, uri))
            .map(drop)
    }

    /// Restore a request previously flagged to be skipped
    pub fn consider(&mut self, rid: u32) -> Result<()> {
        self.channel
            .command(&format!("{}.consider {}", self.op, rid))
            .map(drop)
    }

    /// Flag a request to be skipped
    pub fn ignore(&mut self, rid: u32) -> Result<()> {
        self.channel
            .command(&format!("{}.ignore {}", self.op, rid))
            .map(drop)
    }
}

/// Issue `<op>.queue` and parse the id list
pub(crate) fn fetch_queue(channel: &mut dyn ControlChannel, op: &str) -> Result<Vec<u32>> {
    let body = channel.command(&format!("{}.queue", op))?;
    parse_request_ids(&body)
}

/// Issue `request.metadata <rid>` and return the first block
pub(crate) fn fetch_request_metadata(
    channel: &mut dyn ControlChannel,
    rid: u32,
) -> Result<Metadata> {
    let body = channel.command(&format!("request.metadata {}", rid))?;
    parse_metadata_blocks(&body)
        .into_iter()
        .next()
        .ok_or_else(|| {
            PanelError::MalformedResponse(format!("no metadata returned for request {}", rid))
        })
}

/// Whitespace-separated request ids
pub(crate) fn parse_request_ids(text: &str) -> Result<Vec<u32>> {
    text.split_whitespace()
        .map(|token| {
            token.parse::<u32>().map_err(|_| {
                PanelError::MalformedResponse(format!("expected a request id, got `{}`", token))
            })
        })
        .collect()
}
