// HTTP server: accept loop, routing, error mapping.
//
// One thread per connection, one request per connection. The accept
// loop polls a shutdown flag so tests can stop the server cleanly.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use inversa_analysis::Analyze;
use inversa_protocol::{ErrorBody, FunctionInput};

use crate::http::{read_request, write_response, Request};
use crate::pipeline;

const ACCEPT_POLL: Duration = Duration::from_millis(50);

pub struct Server {
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
    analyzer: Arc<dyn Analyze>,
}

impl Server {
    pub fn bind(addr: &str, analyzer: Arc<dyn Analyze>) -> io::Result<Server> {
        let listener = TcpListener::bind(addr)?;
        // Non-blocking so the accept loop can observe the shutdown flag
        listener.set_nonblocking(true)?;
        Ok(Server {
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
            analyzer,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Flag that stops the accept loop; shared with whoever needs to
    /// shut the server down.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Accept loop. Returns when the shutdown flag is set.
    pub fn run(self) -> io::Result<()> {
        while !self.shutdown.load(Ordering::SeqCst) {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    log::debug!("connection from {}", peer);
                    let analyzer = Arc::clone(&self.analyzer);
                    thread::spawn(move || handle_connection(stream, analyzer));
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

fn handle_connection(mut stream: TcpStream, analyzer: Arc<dyn Analyze>) {
    // The connection is blocking even though the listener is not
    if let Err(e) = stream.set_nonblocking(false) {
        log::warn!("failed to configure connection: {}", e);
        return;
    }

    let request = match read_request(&mut stream) {
        Ok(req) => req,
        Err(e) => {
            let body = serde_json::to_string(&ErrorBody::new(e.to_string()))
                .unwrap_or_else(|_| "{}".to_string());
            let _ = write_response(&mut stream, 400, "Bad Request", &body);
            return;
        }
    };

    let (status, reason, body) = route(&request, analyzer.as_ref());
    if let Err(e) = write_response(&mut stream, status, reason, &body) {
        log::warn!("failed to write response: {}", e);
    }
}

/// Dispatch a request to its handler. Every pipeline failure becomes a
/// 400 with a single `detail` message.
fn route(request: &Request, analyzer: &dyn Analyze) -> (u16, &'static str, String) {
    match (request.method.as_str(), request.path.as_str()) {
        // CORS preflight for any path
        ("OPTIONS", _) => (204, "No Content", String::new()),
        ("GET", "/") => (200, "OK", r#"{"message":"Backend funzionante!"}"#.to_string()),
        ("POST", "/calcolo-analisi") => calcolo_analisi(&request.body, analyzer),
        _ => (404, "Not Found", error_body("not found")),
    }
}

fn calcolo_analisi(body: &str, analyzer: &dyn Analyze) -> (u16, &'static str, String) {
    let input: FunctionInput = match serde_json::from_str(body) {
        Ok(input) => input,
        Err(e) => {
            return (
                400,
                "Bad Request",
                error_body(&format!("invalid request body: {}", e)),
            )
        }
    };

    match pipeline::run(&input.function, analyzer) {
        Ok(result) => match serde_json::to_string(&result) {
            Ok(json) => (200, "OK", json),
            Err(e) => (400, "Bad Request", error_body(&e.to_string())),
        },
        Err(e) => {
            log::info!("pipeline failed for {:?}: {}", input.function, e);
            (400, "Bad Request", error_body(&e.to_string()))
        }
    }
}

fn error_body(detail: &str) -> String {
    serde_json::to_string(&ErrorBody::new(detail)).unwrap_or_else(|_| "{}".to_string())
}
