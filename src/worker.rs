//! Poll worker thread
//!
//! The worker owns a dedicated control connection and keeps the node
//! listing fresh: every tick it issues `list`, parses the response, and
//! publishes the records only when they differ from the last published
//! listing. The frontend talks to it through crossbeam channels via
//! [`PollHandle`].
//!
//! # Responsibilities
//!
//! - **Command processing**: refresh on demand, interval changes, shutdown
//! - **Listing polls**: fixed-interval `list` (default 1 s), lenient parse
//! - **Diffing**: identical listings publish nothing, so the frontend can
//!   treat every [`PollMessage::Nodes`] as a real change
//! - **Failure**: a failed poll is reported and stops the worker; there is
//!   no automatic reconnect, the shell decides what to do next
//!
//! The poll connection is never shared with node controllers, so no request
//! serialization is needed across concerns.

use crate::client::{ControlChannel, TcpControlClient};
use crate::config::AppConfig;
use crate::error::Result;
use crate::registry::{self, NodeRecord};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Shortest accepted poll interval
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Longest stretch the worker sleeps before rechecking commands
const IDLE_SLICE: Duration = Duration::from_millis(50);

/// Commands sent from the frontend to the worker
#[derive(Debug, Clone)]
pub enum PollCommand {
    /// Poll immediately instead of waiting for the next tick
    Refresh,
    /// Change the poll interval
    SetPollInterval(Duration),
    /// Stop the worker
    Shutdown,
}

/// Messages sent from the worker to the frontend
#[derive(Debug, Clone)]
pub enum PollMessage {
    /// The listing changed; full replacement, in listing order
    Nodes(Vec<NodeRecord>),
    /// A poll failed; the worker stops after sending this
    PollError(String),
    /// The worker has stopped
    Shutdown,
}

/// The worker that runs the listing poll loop
pub struct PollWorker {
    command_rx: Receiver<PollCommand>,
    message_tx: Sender<PollMessage>,
    running: Arc<AtomicBool>,
    channel: Box<dyn ControlChannel>,
    poll_interval: Duration,
    last_poll_time: Option<Instant>,
    published: Option<Vec<NodeRecord>>,
}

impl PollWorker {
    /// Create a worker over an already-connected channel
    pub fn new(
        channel: Box<dyn ControlChannel>,
        command_rx: Receiver<PollCommand>,
        message_tx: Sender<PollMessage>,
        running: Arc<AtomicBool>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            command_rx,
            message_tx,
            running,
            channel,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
            last_poll_time: None,
            published: None,
        }
    }

    /// Run the poll loop until shutdown or a poll failure
    pub fn run(&mut self) {
        tracing::info!("poll worker started");

        while self.running.load(Ordering::SeqCst) {
            self.process_commands();
            if !self.running.load(Ordering::SeqCst) {
                break;
            }
            if self.poll_due() {
                self.poll_once();
            }
            self.idle();
        }

        let _ = self.message_tx.send(PollMessage::Shutdown);
        tracing::info!("poll worker stopped");
    }

    /// Drain pending commands from the frontend
    fn process_commands(&mut self) {
        loop {
            match self.command_rx.try_recv() {
                Ok(PollCommand::Refresh) => self.last_poll_time = None,
                Ok(PollCommand::SetPollInterval(interval)) => {
                    self.poll_interval = interval.max(MIN_POLL_INTERVAL);
                }
                Ok(PollCommand::Shutdown) => {
                    self.running.store(false, Ordering::SeqCst);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.running.store(false, Ordering::SeqCst);
                    break;
                }
            }
        }
    }

    fn poll_due(&self) -> bool {
        self.last_poll_time
            .map_or(true, |t| t.elapsed() >= self.poll_interval)
    }

    /// Issue one `list`, publish on change, stop on failure
    fn poll_once(&mut self) {
        self.last_poll_time = Some(Instant::now());
        match registry::list_nodes(self.channel.as_mut()) {
            Ok(nodes) => {
                if self.published.as_ref() != Some(&nodes) {
                    tracing::debug!(count = nodes.len(), "node listing changed");
                    self.published = Some(nodes.clone());
                    let _ = self.message_tx.send(PollMessage::Nodes(nodes));
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "node listing poll failed");
                let _ = self.message_tx.send(PollMessage::PollError(e.to_string()));
                self.running.store(false, Ordering::SeqCst);
            }
        }
    }

    /// Sleep toward the next tick in short slices so commands stay prompt
    fn idle(&self) {
        let Some(last) = self.last_poll_time else {
            return;
        };
        let due_in = self.poll_interval.saturating_sub(last.elapsed());
        if !due_in.is_zero() {
            std::thread::sleep(due_in.min(IDLE_SLICE));
        }
    }
}

/// Frontend-side handle to a running poll worker
pub struct PollHandle {
    commands: Sender<PollCommand>,
    messages: Receiver<PollMessage>,
    running: Arc<AtomicBool>,
}

impl PollHandle {
    /// Ask for an immediate poll
    pub fn refresh(&self) {
        let _ = self.commands.send(PollCommand::Refresh);
    }

    /// Change the poll interval
    pub fn set_poll_interval(&self, interval: Duration) {
        let _ = self.commands.send(PollCommand::SetPollInterval(interval));
    }

    /// Stop the worker
    pub fn shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
        let _ = self.commands.send(PollCommand::Shutdown);
    }

    /// Receiver for the worker's messages
    pub fn messages(&self) -> &Receiver<PollMessage> {
        &self.messages
    }

    /// Drain whatever messages are pending right now
    pub fn drain(&self) -> Vec<PollMessage> {
        self.messages.try_iter().collect()
    }
}

/// Connect to the engine and spawn the poll worker thread
///
/// Connection failures propagate: without a control channel there is
/// nothing to poll, and the caller must surface the error and abort.
pub fn spawn(config: &AppConfig) -> Result<(PollHandle, JoinHandle<()>)> {
    let endpoint = config.connection.endpoint();
    let channel =
        TcpControlClient::connect_with_timeout(&endpoint, config.poll.command_timeout())?;
    tracing::info!(%endpoint, "poll worker connected");

    let (command_tx, command_rx) = bounded(16);
    let (message_tx, message_rx) = bounded(64);
    let running = Arc::new(AtomicBool::new(true));

    let mut worker = PollWorker::new(
        Box::new(channel),
        command_rx,
        message_tx,
        running.clone(),
        config.poll.interval(),
    );
    let handle = std::thread::Builder::new()
        .name("streampanel-poll".to_string())
        .spawn(move || worker.run())?;

    Ok((
        PollHandle {
            commands: command_tx,
            messages: message_rx,
            running,
        },
        handle,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockChannel;

    fn test_worker(
        channel: MockChannel,
    ) -> (PollWorker, Receiver<PollMessage>, Sender<PollCommand>) {
        let (command_tx, command_rx) = bounded(16);
        let (message_tx, message_rx) = bounded(16);
        let running = Arc::new(AtomicBool::new(true));
        let worker = PollWorker::new(
            Box::new(channel),
            command_rx,
            message_tx,
            running,
            Duration::from_millis(10),
        );
        (worker, message_rx, command_tx)
    }

    #[test]
    fn test_unchanged_listing_publishes_once() {
        let channel = MockChannel::new().with_response("list", "music : queue");
        let (mut worker, messages, _commands) = test_worker(channel);

        worker.poll_once();
        worker.poll_once();
        worker.poll_once();

        let published: Vec<_> = messages.try_iter().collect();
        assert_eq!(published.len(), 1);
        assert!(matches!(&published[0], PollMessage::Nodes(nodes) if nodes.len() == 1));
    }

    #[test]
    fn test_changed_listing_publishes_again() {
        let channel = MockChannel::new().with_response_sequence(
            "list",
            &["music : queue", "music : queue\nmixer : mixer"],
        );
        let (mut worker, messages, _commands) = test_worker(channel);

        worker.poll_once();
        worker.poll_once();

        let published: Vec<_> = messages.try_iter().collect();
        assert_eq!(published.len(), 2);
        assert!(matches!(&published[1], PollMessage::Nodes(nodes) if nodes.len() == 2));
    }

    #[test]
    fn test_failed_poll_reports_and_stops() {
        // "list" is unscripted, so the channel errors
        let (mut worker, messages, _commands) = test_worker(MockChannel::new());

        worker.poll_once();

        assert!(matches!(
            messages.try_recv(),
            Ok(PollMessage::PollError(_))
        ));
        assert!(!worker.running.load(Ordering::SeqCst));
    }

    #[test]
    fn test_shutdown_command() {
        let channel = MockChannel::new().with_response("list", "");
        let (mut worker, _messages, commands) = test_worker(channel);

        commands.send(PollCommand::Shutdown).unwrap();
        worker.process_commands();

        assert!(!worker.running.load(Ordering::SeqCst));
    }

    #[test]
    fn test_refresh_forces_next_poll() {
        let channel = MockChannel::new().with_response("list", "");
        let (mut worker, _messages, commands) = test_worker(channel);

        worker.poll_once();
        assert!(!worker.poll_due());

        commands.send(PollCommand::Refresh).unwrap();
        worker.process_commands();
        assert!(worker.poll_due());
    }

    #[test]
    fn test_interval_floor() {
        let channel = MockChannel::new().with_response("list", "");
        let (mut worker, _messages, commands) = test_worker(channel);

        commands
            .send(PollCommand::SetPollInterval(Duration::ZERO))
            .unwrap();
        worker.process_commands();
        assert_eq!(worker.poll_interval, MIN_POLL_INTERVAL);
    }
}
