//! StreamPanel - Main Entry Point
//!
//! Headless monitor for an audio-streaming engine: connects to the engine's
//! control port, polls the node listing, and logs a one-line status summary
//! per controllable node whenever the listing changes.

use anyhow::Context;
use clap::Parser;
use streampanel::{
    client::{ControlChannel, Endpoint, TcpControlClient},
    config::AppConfig,
    dispatch::{dispatch_with, NodeController},
    registry::NodeRecord,
    worker::{self, PollMessage},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "streampanel")]
#[command(about = "Headless control panel for an audio streaming engine")]
struct Cli {
    /// Engine host to connect to (overrides the config file).
    #[arg(long)]
    host: Option<String>,

    /// Engine control port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Listing poll interval in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,streampanel=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default();
    if let Some(host) = cli.host {
        config.connection.host = host;
    }
    if let Some(port) = cli.port {
        config.connection.port = port;
    }
    if let Some(interval_ms) = cli.interval_ms {
        config.poll.interval_ms = interval_ms;
    }

    let endpoint = config.connection.endpoint();
    tracing::info!(%endpoint, "connecting to engine");

    // A dedicated channel for one-shot queries, separate from the poll
    // loop's connection and from every controller's.
    let mut control = TcpControlClient::connect_with_timeout(&endpoint, config.poll.command_timeout())
        .with_context(|| format!("could not connect to {}", endpoint))?;
    match control.command("uptime") {
        Ok(uptime) => tracing::info!(uptime = %uptime, "engine is up"),
        Err(e) => tracing::warn!(error = %e, "engine did not answer `uptime`"),
    }

    let (handle, thread) = worker::spawn(&config).context("failed to start the poll worker")?;

    loop {
        match handle.messages().recv() {
            Ok(PollMessage::Nodes(nodes)) => report(&endpoint, &config, &nodes),
            Ok(PollMessage::PollError(e)) => {
                tracing::error!(error = %e, "poll loop failed");
                break;
            }
            Ok(PollMessage::Shutdown) | Err(_) => break,
        }
    }

    let _ = thread.join();
    Ok(())
}

/// Log one line per node of a fresh listing
fn report(endpoint: &Endpoint, config: &AppConfig, nodes: &[NodeRecord]) {
    tracing::info!(count = nodes.len(), "controllable nodes");
    for record in nodes {
        match summarize(endpoint, config, record) {
            Ok(summary) => {
                tracing::info!(node = %record.name, kind = %record.kind, summary = %summary);
            }
            Err(e) => {
                // Fatal for this row only; the rest of the listing still reports.
                tracing::warn!(node = %record.name, kind = %record.kind, error = %e, "could not summarize node");
            }
        }
    }
}

/// Dispatch a node on its own connection and query a one-line summary
fn summarize(
    endpoint: &Endpoint,
    config: &AppConfig,
    record: &NodeRecord,
) -> streampanel::Result<String> {
    let channel = TcpControlClient::connect_with_timeout(endpoint, config.poll.command_timeout())?;
    let controller = match dispatch_with(record, Box::new(channel))? {
        Some(controller) => controller,
        None => return Ok("unsupported".to_string()),
    };
    match controller {
        NodeController::Queue(mut queue) => {
            Ok(format!("{} queued request(s)", queue.queue()?.len()))
        }
        NodeController::Editable(mut editable) => {
            let scheduled = editable.queue()?.len();
            let pending = editable.pending_length()?;
            Ok(format!("{} request(s), {} pending", scheduled, pending))
        }
        NodeController::Playlist(mut playlist) => {
            Ok(format!("{} upcoming entries", playlist.next()?.len()))
        }
        NodeController::Mixer(mut mixer) => {
            Ok(format!("inputs: {}", mixer.inputs()?.join(", ")))
        }
        NodeController::Output(mut output) => {
            let state = if output.is_on()? { "on" } else { "off" };
            match output.remaining()? {
                Some(seconds) => Ok(format!(
                    "{}, {:02}:{:02} remaining",
                    state,
                    (seconds / 60.0) as u64,
                    (seconds % 60.0) as u64
                )),
                None => Ok(state.to_string()),
            }
        }
    }
}
