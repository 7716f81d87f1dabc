//! Mixer node controller
//!
//! A mixer has a fixed set of input sources. Each input reports its status
//! as `key=value` pairs and accepts select/skip/single/volume commands,
//! addressed by input index.

use crate::client::{ControlChannel, Endpoint, TcpControlClient};
use crate::error::{PanelError, Result};

/// Status of one mixer input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixerStatus {
    /// Whether the input has something to play
    pub ready: bool,
    /// Whether the input is routed into the mix
    pub selected: bool,
    /// Whether the input stops at the end of the current track
    pub single: bool,
    /// Volume as a percentage, 0..=100
    pub volume: u32,
    /// Time left on the current track, as reported by the engine
    pub remaining: String,
}

/// Controller for a `mixer` node
pub struct MixerController {
    op: String,
    channel: Box<dyn ControlChannel>,
}

impl MixerController {
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

    /// Names of the mixer's input sources, in input-index order
    pub fn inputs(&mut self) -> Result<Vec<String>> {
        let body = self.channel.command(&format!("{}.inputs", self.op))?;
        Ok(body.split_whitespace().map(str::to_string).collect())
    }

    /// Status of the input at `index`
    pub fn status(&mut self, index: usize) -> Result<MixerStatus> {
        let body = self
            .channel
            .command(&format!("{}.status {}", self.op, index))?;
        parse_mixer_status(&body)
    }

    /// Route the input into the mix (or out of it)
    pub fn select(&mut self, index: usize, enabled: bool) -> Result<()> {
        self.channel
            .command(&format!("{}.select {} {}", self.op, index, enabled))
            .map(drop)
    }

    /// Skip the input's current track
    pub fn skip(&mut self, index: usize) -> Result<()> {
        self.channel
            .command(&format!("{}.skip {}", self.op, index))
            .map(drop)
    }

    /// Stop the input at the end of the current track (or keep going)
    pub fn single(&mut self, index: usize, enabled: bool) -> Result<()> {
        self.channel
            .command(&format!("{}.single {} {}", self.op, index, enabled))
            .map(drop)
    }

    /// Set the input's volume as a percentage
    pub fn set_volume(&mut self, index: usize, percent: u32) -> Result<()> {
        self.channel
            .command(&format!("{}.volume {} {}", self.op, index, percent))
            .map(drop)
    }
}

/// Parse a status line of `key=value` pairs
///
/// `ready`, `selected` and `volume` must be present; `single` defaults to
/// false and `remaining` to the engine's undefined marker, which older
/// engines omit for silent inputs.
fn parse_mixer_status(body: &str) -> Result<MixerStatus> {
    let mut ready = None;
    let mut selected = None;
    let mut single = false;
    let mut volume = None;
    let mut remaining = None;
    for token in body.split_whitespace() {
        let (key, value) = token.split_once('=').ok_or_else(|| {
            PanelError::MalformedResponse(format!("expected key=value in mixer status, got `{}`", token))
        })?;
        match key {
            "ready" => ready = Some(parse_bool(value)?),
            "selected" => selected = Some(parse_bool(value)?),
            "single" => single = parse_bool(value)?,
            "volume" => volume = Some(parse_volume(value)?),
            "remaining" => remaining = Some(value.to_string()),
            // Engines may report extra fields; ignore them.
            _ => {}
        }
    }
    Ok(MixerStatus {
        ready: require(ready, "ready")?,
        selected: require(selected, "selected")?,
        single,
        volume: require(volume, "volume")?,
        remaining: remaining.unwrap_or_else(|| "(undef)".to_string()),
    })
}

fn require<T>(value: Option<T>, key: &str) -> Result<T> {
    value.ok_or_else(|| {
        PanelError::MalformedResponse(format!("mixer status is missing the `{}` field", key))
    })
}

fn parse_bool(value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(PanelError::MalformedResponse(format!(
            "expected a boolean, got `{}`",
            other
        ))),
    }
}

/// `<digits>%` or bare digits
fn parse_volume(value: &str) -> Result<u32> {
    value
        .trim_end_matches('%')
        .parse()
        .map_err(|_| PanelError::MalformedResponse(format!("expected a volume, got `{}`", value)))
}
