use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::process::{Child, Command, Output, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
    hits: Arc<AtomicU64>,
}

impl ServerHandle {
    /// Requests answered so far.
    #[must_use]
    pub fn hits(&self) -> u64 {
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

/// Spawn a lightweight HTTP server that answers every request with 200.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server() -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let hits = Arc::new(AtomicU64::new(0));
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
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}/", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
            hits,
        },
    ))
}

fn handle_client(mut stream: TcpStream, hits: &AtomicU64) {
    drop(stream.set_nonblocking(false));
    let mut buffer = [0u8; 1024];
    if stream.read(&mut buffer).is_err() {
        return;
    }
    hits.fetch_add(1, Ordering::SeqCst);
    if stream
        .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK")
        .is_err()
    {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

/// Run one of the crate's binaries and capture output.
///
/// The `STRESS_*` variables are cleared so the caller's environment cannot
/// change the run.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_bin<I, S>(bin: Option<&'static str>, args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_bin_with_env(bin, &[], args)
}

/// Like [`run_bin`], then applies `envs` on top of the cleared environment.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_bin_with_env<I, S>(
    bin: Option<&'static str>,
    envs: &[(&str, &str)],
    args: I,
) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = base_command(bin)?;
    command
        .args(args)
        .envs(envs.iter().copied())
        .output()
        .map_err(|err| format!("run {:?} failed: {}", bin, err))
}

/// Start `strike` in the background with stdin closed and output piped.
///
/// # Errors
///
/// Returns an error if the binary cannot be started.
pub fn spawn_strike<I, S>(args: I) -> Result<Child, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = option_env!("CARGO_BIN_EXE_strike");
    let mut command = base_command(bin)?;
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| format!("spawn strike failed: {}", err))
}

fn base_command(bin: Option<&'static str>) -> Result<Command, String> {
    let bin = bin.ok_or_else(|| "binary path missing at compile time.".to_owned())?;
    let mut command = Command::new(bin);
    command
        .env("RUST_LOG", "error")
        .env_remove("STRIKE_LOG")
        .env_remove("STRESS_TARGET_URL")
        .env_remove("STRESS_TOTAL_REQUESTS")
        .env_remove("STRESS_CONCURRENCY");
    Ok(command)
}

/// Run the full `strike` binary.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_strike<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_bin(option_env!("CARGO_BIN_EXE_strike"), args)
}

/// Run the `strike-lite` binary.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_strike_lite<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_bin(option_env!("CARGO_BIN_EXE_strike-lite"), args)
}

/// Value of the `Completed:` line of a text summary.
#[must_use]
pub fn completed_count(stdout: &str) -> Option<u64> {
    stdout
        .lines()
        .find_map(|line| line.trim_start().strip_prefix("Completed:"))
        .and_then(|value| value.trim().parse().ok())
}

#[must_use]
pub fn describe(output: &Output) -> String {
    format!(
        "status: {:?}\nstdout: {}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}
