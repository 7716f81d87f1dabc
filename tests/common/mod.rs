//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::JoinHandle;
use std::time::Duration;

use streampanel::client::Endpoint;

/// How long tests wait for worker messages
pub fn test_timeout() -> Duration {
    Duration::from_secs(2)
}

/// A scripted stand-in for the engine's control port
///
/// Accepts any number of connections, each served on its own thread with
/// the fixture's command->response script: every received line is answered
/// with the scripted body (if any) followed by the `.` terminator line.
/// Unscripted commands get an empty body. Received commands across all
/// connections are logged in arrival order.
pub struct EngineFixture {
    addr: SocketAddr,
    responses: Arc<RwLock<HashMap<String, String>>>,
    received: Arc<Mutex<Vec<String>>>,
    stop: Arc<AtomicBool>,
    accept_handle: Option<JoinHandle<()>>,
}

/// Spawn a fixture engine on an ephemeral local port
pub fn spawn_engine(script: &[(&str, &str)]) -> EngineFixture {
    let responses: HashMap<String, String> = script
        .iter()
        .map(|(cmd, body)| (cmd.to_string(), body.to_string()))
        .collect();
    let responses = Arc::new(RwLock::new(responses));
    let received = Arc::new(Mutex::new(Vec::new()));
    let stop = Arc::new(AtomicBool::new(false));

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind fixture listener");
    let addr = listener.local_addr().expect("fixture listener addr");
    listener
        .set_nonblocking(true)
        .expect("nonblocking fixture listener");

    let accept_handle = {
        let responses = responses.clone();
        let received = received.clone();
        let stop = stop.clone();
        std::thread::spawn(move || {
            while !stop.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        stream.set_nonblocking(false).expect("blocking conn");
                        let responses = responses.clone();
                        let received = received.clone();
                        std::thread::spawn(move || serve(stream, responses, received));
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        std::thread::sleep(Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        })
    };

    EngineFixture {
        addr,
        responses,
        received,
        stop,
        accept_handle: Some(accept_handle),
    }
}

/// Serve one connection until the client hangs up
fn serve(
    stream: TcpStream,
    responses: Arc<RwLock<HashMap<String, String>>>,
    received: Arc<Mutex<Vec<String>>>,
) {
    let mut reader = BufReader::new(stream.try_clone().expect("clone conn"));
    let mut writer = stream;
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let cmd = line.trim_end().to_string();
        received.lock().unwrap().push(cmd.clone());

        let body = responses.read().unwrap().get(&cmd).cloned().unwrap_or_default();
        let mut out = String::new();
        if !body.is_empty() {
            out.push_str(&body);
            if !body.ends_with('\n') {
                out.push('\n');
            }
        }
        out.push_str(".\n");
        if writer.write_all(out.as_bytes()).is_err() {
            break;
        }
    }
}

impl EngineFixture {
    /// Endpoint clients should connect to
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.addr.ip().to_string(), self.addr.port())
    }

    /// Replace the scripted body for a command
    pub fn set_response(&self, cmd: &str, body: &str) {
        self.responses
            .write()
            .unwrap()
            .insert(cmd.to_string(), body.to_string());
    }

    /// Commands received so far, across all connections
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

impl Drop for EngineFixture {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.accept_handle.take() {
            let _ = handle.join();
        }
    }
}
