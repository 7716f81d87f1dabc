//! Node controllers
//!
//! One controller per controllable node type, each wrapping the node's slice
//! of the control protocol behind typed methods. Controllers hold their own
//! [`ControlChannel`](crate::client::ControlChannel): dropping one releases
//! its connection without touching the poll loop's.
//!
//! # Components
//!
//! - [`QueueController`] - interactive request queue (`queue` nodes)
//! - [`EditableController`] - reorderable request queue (`editable` nodes)
//! - [`PlaylistController`] - read-only playlist (`playlist` nodes)
//! - [`MixerController`] - mixing table (`mixer` nodes)
//! - [`OutputController`] - stream sink (all `output.*` nodes)
//! - [`Metadata`] - parsed request metadata shared by several controllers

pub mod editable;
pub mod metadata;
pub mod mixer;
pub mod output;
pub mod playlist;
pub mod queue;

pub use editable::EditableController;
pub use metadata::{parse_metadata_blocks, Metadata};
pub use mixer::{MixerController, MixerStatus};
pub use output::OutputController;
pub use playlist::{PlaylistController, PlaylistEntry};
pub use queue::QueueController;
