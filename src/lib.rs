//! # StreamPanel: audio-engine control panel client
//!
//! A client for the line-oriented TCP control protocol of an audio-streaming
//! engine. The engine exposes its controllable nodes over a telnet-style
//! request/response protocol; StreamPanel discovers those nodes, keeps the
//! listing fresh with a background poll worker, and hands each node to a
//! typed controller.
//!
//! ## Architecture
//!
//! - **Client**: [`client::TcpControlClient`] speaks the wire protocol
//!   behind the [`client::ControlChannel`] seam
//! - **Registry**: [`registry::parse_node_list`] turns a `list` response
//!   into ordered [`registry::NodeRecord`]s
//! - **Dispatch**: [`dispatch::dispatch`] maps each record's type tag to
//!   the matching controller variant
//! - **Controllers**: one per node type under [`nodes`], each over its own
//!   connection
//! - **Worker**: [`worker::PollWorker`] polls the listing on a dedicated
//!   connection and publishes changes over crossbeam channels
//!
//! ## Example
//!
//! ```ignore
//! use streampanel::{
//!     config::AppConfig,
//!     dispatch::{dispatch, NodeController},
//!     worker::{self, PollMessage},
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load_or_default();
//!     let endpoint = config.connection.endpoint();
//!     let (handle, _thread) = worker::spawn(&config)?;
//!
//!     while let Ok(msg) = handle.messages().recv() {
//!         if let PollMessage::Nodes(nodes) = msg {
//!             for record in &nodes {
//!                 match dispatch(record, &endpoint)? {
//!                     Some(NodeController::Output(mut output)) => {
//!                         println!("{}: on={}", record.name, output.is_on()?);
//!                     }
//!                     Some(_) => {}
//!                     None => println!("{}: unsupported", record.name),
//!                 }
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod nodes;
pub mod registry;
pub mod worker;

// Re-export commonly used types
pub use client::{ControlChannel, Endpoint, TcpControlClient};
pub use config::AppConfig;
pub use dispatch::{dispatch, dispatch_with, NodeController, NodeType, OutputKind};
pub use error::{PanelError, Result};
pub use registry::{list_nodes, parse_node_list, NodeRecord};
pub use worker::{PollCommand, PollHandle, PollMessage, PollWorker};
