//! Process Controller
//!
//! Owns the child process handle, its standard streams and its lifecycle.
//! Output is bridged to the rest of the bridge as readiness-driven
//! channels: one per stream plus a single exit notification. Input writes
//! are queued through a dedicated writer task so callers never block on
//! the child's stdin.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, watch, RwLock};
use uuid::Uuid;

use super::signals::{self, Signal};
use crate::error::{Error, Result};
use crate::models::ChildProcess;

const READ_BUF_SIZE: usize = 4096;

/// Channels exposed to the consumer of a spawned session
pub struct SessionHandle {
    /// Unique identifier for this session
    pub id: String,
    /// Raw stdout chunks, in delivery order
    pub stdout_rx: mpsc::UnboundedReceiver<Vec<u8>>,
    /// Raw stderr chunks, in delivery order
    pub stderr_rx: mpsc::UnboundedReceiver<Vec<u8>>,
    /// Exit notification; carries the exit code, delivered exactly once
    pub exit_rx: mpsc::UnboundedReceiver<i32>,
}

/// Requests handled by the monitor task that owns the child handle
enum ControlMsg {
    Stop { grace: Duration },
}

/// Handle to the spawned child process and its lifecycle
#[derive(Clone)]
pub struct ProcessController {
    session_id: String,
    record: Arc<RwLock<ChildProcess>>,
    stdin_tx: mpsc::UnboundedSender<Vec<u8>>,
    ctrl_tx: mpsc::UnboundedSender<ControlMsg>,
    exit_watch: watch::Receiver<Option<i32>>,
}

impl ProcessController {
    /// Spawn the child with piped stdio and start the I/O bridge tasks.
    ///
    /// Fails when the executable cannot be located or the process cannot
    /// be created; both are fatal to the session.
    pub async fn spawn(
        command: &str,
        args: &[String],
    ) -> Result<(ProcessController, SessionHandle)> {
        validate_command(command)?;

        let session_id = Uuid::new_v4().to_string();
        info!(
            "spawning session {}: {} {}",
            session_id,
            command,
            args.join(" ")
        );

        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::SpawnFailed {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        let pid = child.id();
        let stdin = child.stdin.take().ok_or(Error::StdioUnavailable {
            stream: "stdin".to_string(),
        })?;
        let stdout = child.stdout.take().ok_or(Error::StdioUnavailable {
            stream: "stdout".to_string(),
        })?;
        let stderr = child.stderr.take().ok_or(Error::StdioUnavailable {
            stream: "stderr".to_string(),
        })?;

        let mut record = ChildProcess::new(command.to_string(), args.to_vec());
        if let Some(pid) = pid {
            record.mark_started(pid);
        }
        let record = Arc::new(RwLock::new(record));

        let (stdout_tx, stdout_rx) = mpsc::unbounded_channel();
        let (stderr_tx, stderr_rx) = mpsc::unbounded_channel();
        let (exit_tx, exit_rx) = mpsc::unbounded_channel();
        let (stdin_tx, stdin_rx) = mpsc::unbounded_channel::<Vec<u8>>();
        let (ctrl_tx, ctrl_rx) = mpsc::unbounded_channel();
        let (exit_watch_tx, exit_watch) = watch::channel(None);

        spawn_reader(stdout, stdout_tx, "stdout");
        spawn_reader(stderr, stderr_tx, "stderr");
        spawn_writer(stdin, stdin_rx);
        spawn_monitor(child, ctrl_rx, pid, record.clone(), exit_watch_tx, exit_tx);

        let controller = ProcessController {
            session_id: session_id.clone(),
            record,
            stdin_tx,
            ctrl_tx,
            exit_watch,
        };
        let handle = SessionHandle {
            id: session_id,
            stdout_rx,
            stderr_rx,
            exit_rx,
        };
        Ok((controller, handle))
    }

    /// Session identifier
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Whether the child has not exited yet
    pub fn is_running(&self) -> bool {
        self.exit_watch.borrow().is_none()
    }

    /// Exit code, once the child has exited
    pub fn exit_code(&self) -> Option<i32> {
        *self.exit_watch.borrow()
    }

    /// Snapshot of the process bookkeeping record
    pub async fn record(&self) -> ChildProcess {
        self.record.read().await.clone()
    }

    /// Queue bytes for the child's stdin.
    ///
    /// Writes are flushed in issuance order. A write against an exited
    /// process is reported but never fatal: the caller logs and goes on.
    pub fn write(&self, data: &[u8]) -> Result<()> {
        if !self.is_running() {
            warn!("dropping {} byte write: child not running", data.len());
            return Err(Error::ProcessNotRunning);
        }
        self.stdin_tx
            .send(data.to_vec())
            .map_err(|e| Error::WriteFailed {
                reason: e.to_string(),
            })
    }

    /// Request a graceful stop, killing the child if it has not exited
    /// within `grace`. Idempotent: stopping an exited process is a no-op.
    /// Always resolves; the exit notification fires exactly once either
    /// way.
    pub async fn stop(&self, grace: Duration) -> Result<()> {
        if !self.is_running() {
            debug!("stop: child already exited");
            return Ok(());
        }
        let _ = self.ctrl_tx.send(ControlMsg::Stop { grace });

        // The monitor's graceful wait is bounded and its kill fallback is
        // unconditional, so this resolves; the slack covers kill + reap.
        let deadline = grace + Duration::from_secs(2);
        let mut exited = self.exit_watch.clone();
        // Bound to a local so the watch::Ref from wait_for is dropped
        // before `exited` goes out of scope
        let outcome = match tokio::time::timeout(deadline, exited.wait_for(|v| v.is_some())).await
        {
            Ok(Ok(_)) => Ok(()),
            // Monitor gone means the child is gone too
            Ok(Err(_)) => Ok(()),
            Err(_) => Err(Error::Other(
                "timed out waiting for child to exit".to_string(),
            )),
        };
        outcome
    }
}

/// Forward a child output stream to a chunk channel until EOF
fn spawn_reader<R>(mut stream: R, tx: mpsc::UnboundedSender<Vec<u8>>, label: &'static str)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = [0u8; READ_BUF_SIZE];
        loop {
            match stream.read(&mut buf).await {
                Ok(0) => {
                    debug!("{} reached EOF", label);
                    break;
                }
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        debug!("{} receiver dropped, stopping reader", label);
                        break;
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!("{} read error: {}", label, e);
                    break;
                }
            }
        }
    });
}

/// Drain queued input to the child's stdin, flushing each write
fn spawn_writer(
    mut stdin: tokio::process::ChildStdin,
    mut stdin_rx: mpsc::UnboundedReceiver<Vec<u8>>,
) {
    tokio::spawn(async move {
        while let Some(data) = stdin_rx.recv().await {
            if let Err(e) = stdin.write_all(&data).await {
                warn!("stdin write error: {}", e);
                break;
            }
            if let Err(e) = stdin.flush().await {
                debug!("stdin flush error: {}", e);
            }
        }
        debug!("stdin writer exiting");
    });
}

/// Own the child handle: wait for natural exit, serve stop requests, and
/// publish the exit exactly once however the race resolves
fn spawn_monitor(
    child: Child,
    ctrl_rx: mpsc::UnboundedReceiver<ControlMsg>,
    pid: Option<u32>,
    record: Arc<RwLock<ChildProcess>>,
    exit_watch_tx: watch::Sender<Option<i32>>,
    exit_tx: mpsc::UnboundedSender<i32>,
) {
    tokio::spawn(async move {
        let code = monitor(child, ctrl_rx, pid).await;
        record.write().await.mark_exited(code);
        let _ = exit_watch_tx.send(Some(code));
        let _ = exit_tx.send(code);
        info!("child exited with code {}", code);
    });
}

async fn monitor(
    mut child: Child,
    mut ctrl_rx: mpsc::UnboundedReceiver<ControlMsg>,
    pid: Option<u32>,
) -> i32 {
    loop {
        tokio::select! {
            status = child.wait() => {
                return exit_code_of(status);
            }
            msg = ctrl_rx.recv() => {
                match msg {
                    Some(ControlMsg::Stop { grace }) => {
                        if let Some(pid) = pid {
                            if let Err(e) = signals::send(pid, Signal::Terminate) {
                                warn!("graceful terminate failed: {}", e);
                            }
                        }
                        match tokio::time::timeout(grace, child.wait()).await {
                            Ok(status) => return exit_code_of(status),
                            Err(_) => {
                                warn!("child ignored {} for {:?}, killing", Signal::Terminate.as_str(), grace);
                                if let Err(e) = child.kill().await {
                                    warn!("kill failed: {}", e);
                                }
                                return exit_code_of(child.wait().await);
                            }
                        }
                    }
                    // Controller dropped; keep waiting for natural exit
                    None => return exit_code_of(child.wait().await),
                }
            }
        }
    }
}

/// Exit code of a wait result; signal-terminated children report -1
fn exit_code_of(status: std::io::Result<std::process::ExitStatus>) -> i32 {
    match status {
        Ok(s) => s.code().unwrap_or(-1),
        Err(e) => {
            warn!("wait on child failed: {}", e);
            -1
        }
    }
}

/// Check that the command names an executable we can spawn: either a path
/// with a file behind it, or a bare name found on PATH
fn validate_command(command: &str) -> Result<()> {
    let path = std::path::Path::new(command);
    if path.components().count() > 1 {
        if path.is_file() {
            return Ok(());
        }
    } else if let Some(paths) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&paths) {
            if dir.join(command).is_file() {
                return Ok(());
            }
        }
    }
    Err(Error::CommandNotFound {
        command: command.to_string(),
    })
}
