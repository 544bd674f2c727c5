use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::process::{Command, Output};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Size of the body served by `/download`.
pub const DOWNLOAD_SIZE: usize = 64 * 1024;

pub struct ServerHandle {
    pub url: String,
    hits: Arc<AtomicUsize>,
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ServerHandle {
    /// Requests received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight HTTP server for tests.
///
/// Routes:
/// - `/zen` answers a fixed sentence.
/// - `/echo` answers a JSON description of the request.
/// - `/status/<code>` answers with that status code.
/// - `/delay/<ms>` waits before answering.
/// - `/download` answers `DOWNLOAD_SIZE` bytes.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server() -> Result<ServerHandle, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let hits = Arc::new(AtomicUsize::new(0));
    let server_hits = Arc::clone(&hits);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let hits = Arc::clone(&server_hits);
                    thread::spawn(move || handle_client(stream, &hits));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok(ServerHandle {
        url: format!("http://{}", addr),
        hits,
        shutdown: shutdown_tx,
        thread: Some(handle),
    })
}

struct ParsedRequest {
    method: String,
    path: String,
    query: String,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
}

fn read_request(stream: &TcpStream) -> Option<ParsedRequest> {
    stream.set_nonblocking(false).ok()?;
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_owned();
    let target = parts.next()?.to_owned();
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path.to_owned(), query.to_owned()),
        None => (target, String::new()),
    };

    let mut headers = BTreeMap::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_owned());
        }
    }

    let length = headers
        .get("content-length")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0_u8; length];
    reader.read_exact(&mut body).ok()?;

    Some(ParsedRequest {
        method,
        path,
        query,
        headers,
        body,
    })
}

fn handle_client(mut stream: TcpStream, hits: &AtomicUsize) {
    let Some(request) = read_request(&stream) else {
        return;
    };
    hits.fetch_add(1, Ordering::SeqCst);

    let (status, body) = route(&request);
    let head = format!(
        "HTTP/1.1 {} Test\r\nContent-Length: {}\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    if stream.write_all(head.as_bytes()).is_err() || stream.write_all(&body).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

fn route(request: &ParsedRequest) -> (u16, Vec<u8>) {
    let path = request.path.as_str();
    if path == "/zen" {
        return (200, b"Keep it logically awesome.".to_vec());
    }
    if path == "/download" {
        let body = (0..DOWNLOAD_SIZE).map(|index| (index % 251) as u8).collect();
        return (200, body);
    }
    if let Some(code) = path.strip_prefix("/status/") {
        return (code.parse().unwrap_or(500), Vec::new());
    }
    if let Some(millis) = path.strip_prefix("/delay/") {
        thread::sleep(Duration::from_millis(millis.parse().unwrap_or(0)));
        return (200, b"delayed".to_vec());
    }
    if path.starts_with("/echo") {
        let echo = serde_json::json!({
            "method": request.method,
            "path": request.path,
            "query": request.query,
            "headers": request.headers,
            "body": String::from_utf8_lossy(&request.body),
        });
        return (200, echo.to_string().into_bytes());
    }
    (404, b"not found".to_vec())
}

/// The contents served by `/download`.
pub fn download_body() -> Vec<u8> {
    (0..DOWNLOAD_SIZE).map(|index| (index % 251) as u8).collect()
}

/// Run the `moya` binary and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_moya<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = moya_bin()?;
    Command::new(bin)
        .args(args)
        .env("MOYA_LOG", "error")
        .env_remove("MOYA_TOKEN")
        .output()
        .map_err(|err| format!("run moya failed: {}", err))
}

fn moya_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_moya").map_or_else(
        || Err("CARGO_BIN_EXE_moya missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
