//! Node dispatch
//!
//! Maps a listing row's type tag to the matching controller. The tag set is
//! closed, so the table is an enum and a `match` rather than a runtime
//! lookup; adding a tag without handling it everywhere is a compile error.
//!
//! Dispatch is stateless per call. The one deliberately-unsupported tag,
//! `interactive`, is refused without error: no controller is built and a
//! diagnostic is logged. A tag outside the table is [`PanelError::UnknownNodeType`],
//! fatal for that row only.

use crate::client::{ControlChannel, Endpoint, TcpControlClient};
use crate::error::{PanelError, Result};
use crate::nodes::{
    EditableController, MixerController, OutputController, PlaylistController, QueueController,
};
use crate::registry::NodeRecord;
use std::str::FromStr;

/// Backend behind an `output.*` node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Icecast,
    File,
    Oss,
    Ao,
    Alsa,
    Portaudio,
    Pulseaudio,
    Dummy,
}

/// The closed set of node type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Queue,
    Editable,
    Playlist,
    Mixer,
    Output(OutputKind),
    /// Listed by the engine but deliberately not controllable here
    Interactive,
}

impl NodeType {
    /// Whether dispatch will build a controller for this tag
    pub fn is_supported(&self) -> bool {
        !matches!(self, NodeType::Interactive)
    }
}

impl FromStr for NodeType {
    type Err = PanelError;

    fn from_str(tag: &str) -> Result<Self> {
        Ok(match tag {
            "queue" => NodeType::Queue,
            "editable" => NodeType::Editable,
            "playlist" => NodeType::Playlist,
            "mixer" => NodeType::Mixer,
            "output.icecast" => NodeType::Output(OutputKind::Icecast),
            "output.file" => NodeType::Output(OutputKind::File),
            "output.oss" => NodeType::Output(OutputKind::Oss),
            "output.ao" => NodeType::Output(OutputKind::Ao),
            "output.alsa" => NodeType::Output(OutputKind::Alsa),
            "output.portaudio" => NodeType::Output(OutputKind::Portaudio),
            "output.pulseaudio" => NodeType::Output(OutputKind::Pulseaudio),
            "output.dummy" => NodeType::Output(OutputKind::Dummy),
            "interactive" => NodeType::Interactive,
            other => return Err(PanelError::UnknownNodeType(other.to_string())),
        })
    }
}

/// A dispatched controller, one variant per controllable node type
pub enum NodeController {
    Queue(QueueController),
    Editable(EditableController),
    Playlist(PlaylistController),
    Mixer(MixerController),
    Output(OutputController),
}

impl NodeController {
    /// Name of the node this controller is bound to
    pub fn name(&self) -> &str {
        match self {
            NodeController::Queue(c) => c.name(),
            NodeController::Editable(c) => c.name(),
            NodeController::Playlist(c) => c.name(),
            NodeController::Mixer(c) => c.name(),
            NodeController::Output(c) => c.name(),
        }
    }
}

/// Dispatch a listing row, opening a dedicated connection for the node
///
/// Returns `Ok(None)` for the unsupported `interactive` tag (no connection
/// is opened), `Err(UnknownNodeType)` for a tag outside the table, and a
/// controller bound to `(endpoint, name)` otherwise.
pub fn dispatch(record: &NodeRecord, endpoint: &Endpoint) -> Result<Option<NodeController>> {
    if record.kind.parse::<NodeType>()? == NodeType::Interactive {
        tracing::warn!(node = %record.name, "interactive nodes are not supported");
        return Ok(None);
    }
    let channel = TcpControlClient::connect(endpoint)?;
    dispatch_with(record, Box::new(channel))
}

/// Dispatch a listing row onto an already-open channel
///
/// The channel becomes the controller's own; same contract as [`dispatch`].
pub fn dispatch_with(
    record: &NodeRecord,
    channel: Box<dyn ControlChannel>,
) -> Result<Option<NodeController>> {
    let name = record.name.clone();
    let controller = match record.kind.parse::<NodeType>()? {
        NodeType::Interactive => {
            tracing::warn!(node = %record.name, "interactive nodes are not supported");
            return Ok(None);
        }
        NodeType::Queue => NodeController::Queue(QueueController::new(name, channel)),
        NodeType::Editable => NodeController::Editable(EditableController::new(name, channel)),
        NodeType::Playlist => NodeController::Playlist(PlaylistController::new(name, channel)),
        NodeType::Mixer => NodeController::Mixer(MixerController::new(name, channel)),
        NodeType::Output(_) => NodeController::Output(OutputController::new(name, channel)),
    };
    Ok(Some(controller))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockChannel;

    const OUTPUT_TAGS: [&str; 8] = [
        "output.icecast",
        "output.file",
        "output.oss",
        "output.ao",
        "output.alsa",
        "output.portaudio",
        "output.pulseaudio",
        "output.dummy",
    ];

    fn dispatch_tag(name: &str, tag: &str) -> Result<Option<NodeController>> {
        dispatch_with(&NodeRecord::new(name, tag), Box::new(MockChannel::new()))
    }

    #[test]
    fn test_each_tag_maps_to_its_variant() {
        assert!(matches!(
            dispatch_tag("music", "queue").unwrap(),
            Some(NodeController::Queue(_))
        ));
        assert!(matches!(
            dispatch_tag("sched", "editable").unwrap(),
            Some(NodeController::Editable(_))
        ));
        assert!(matches!(
            dispatch_tag("night", "playlist").unwrap(),
            Some(NodeController::Playlist(_))
        ));
        assert!(matches!(
            dispatch_tag("mixer", "mixer").unwrap(),
            Some(NodeController::Mixer(_))
        ));
    }

    #[test]
    fn test_all_output_tags_map_to_output() {
        for tag in OUTPUT_TAGS {
            assert!(
                matches!(
                    dispatch_tag("sink", tag).unwrap(),
                    Some(NodeController::Output(_))
                ),
                "tag {} did not dispatch to an output controller",
                tag
            );
        }
    }

    #[test]
    fn test_interactive_is_refused_without_error() {
        assert!(dispatch_tag("repl", "interactive").unwrap().is_none());
    }

    #[test]
    fn test_unknown_tag_fails() {
        match dispatch_tag("x", "bogus") {
            Err(PanelError::UnknownNodeType(tag)) => assert_eq!(tag, "bogus"),
            other => panic!("expected UnknownNodeType, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_controller_keeps_node_name() {
        let controller = dispatch_tag("music", "queue").unwrap().unwrap();
        assert_eq!(controller.name(), "music");
    }

    #[test]
    fn test_tag_parse_table() {
        assert_eq!("queue".parse::<NodeType>().unwrap(), NodeType::Queue);
        assert_eq!(
            "output.alsa".parse::<NodeType>().unwrap(),
            NodeType::Output(OutputKind::Alsa)
        );
        assert!("output.jack".parse::<NodeType>().is_err());
        assert!(!"interactive".parse::<NodeType>().unwrap().is_supported());
    }
}
