//! Session Bridge
//!
//! Wires the process controller, stream decoder, state machine and input
//! forwarder into one running session. A background task owns the decoder
//! and the machine; the `Session` handle exposes a single ordered stream
//! of display updates plus synchronous submission of user selections.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::LaunchConfig;
use crate::decoder::StreamDecoder;
use crate::error::{Error, Result};
use crate::input::{InputForwarder, Selection};
use crate::process::{ProcessController, SessionHandle};
use crate::session::{SessionStateMachine, SessionUpdate};

/// A live interactive session around one child process
pub struct Session {
    id: String,
    controller: ProcessController,
    selection_tx: mpsc::UnboundedSender<Selection>,
    updates_rx: mpsc::UnboundedReceiver<SessionUpdate>,
}

impl Session {
    /// Spawn the configured command and start the bridge loop
    pub async fn launch(config: &LaunchConfig) -> Result<Session> {
        Session::spawn(config.command(), &config.to_args()).await
    }

    /// Spawn an arbitrary command and start the bridge loop
    pub async fn spawn(command: &str, args: &[String]) -> Result<Session> {
        let (controller, handle) = ProcessController::spawn(command, args).await?;
        let forwarder = InputForwarder::new(controller.clone());

        let (selection_tx, selection_rx) = mpsc::unbounded_channel();
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();

        let id = controller.session_id().to_string();
        tokio::spawn(run_loop(handle, forwarder, selection_rx, updates_tx));

        Ok(Session {
            id,
            controller,
            selection_tx,
            updates_rx,
        })
    }

    /// Session identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the child has not exited yet
    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    /// Exit code, once the child has exited
    pub fn exit_code(&self) -> Option<i32> {
        self.controller.exit_code()
    }

    /// Validate raw user input and queue it toward the child.
    ///
    /// Rejected input never reaches the child; the error carries the
    /// offending text so the caller can surface it.
    pub fn submit(&self, raw: &str) -> Result<Selection> {
        let selection = Selection::parse(raw)?;
        self.selection_tx
            .send(selection.clone())
            .map_err(|_| Error::ProcessNotRunning)?;
        Ok(selection)
    }

    /// Next display update, in emission order. Returns `None` once the
    /// bridge loop has finished and drained.
    pub async fn next_update(&mut self) -> Option<SessionUpdate> {
        self.updates_rx.recv().await
    }

    /// Non-blocking variant of [`Session::next_update`]
    pub fn try_next_update(&mut self) -> Option<SessionUpdate> {
        self.updates_rx.try_recv().ok()
    }

    /// Gracefully stop the child, killing it after `grace`
    pub async fn stop(&self, grace: Duration) -> Result<()> {
        self.controller.stop(grace).await
    }
}

/// Drive the decoder and state machine from the child's streams until the
/// child exits and both output pipes are drained
async fn run_loop(
    mut handle: SessionHandle,
    forwarder: InputForwarder,
    mut selection_rx: mpsc::UnboundedReceiver<Selection>,
    updates_tx: mpsc::UnboundedSender<SessionUpdate>,
) {
    let mut decoder = StreamDecoder::new();
    let mut machine = SessionStateMachine::new();

    let mut stdout_open = true;
    let mut stderr_open = true;
    let mut pending_exit: Option<i32> = None;

    loop {
        tokio::select! {
            chunk = handle.stdout_rx.recv(), if stdout_open => match chunk {
                Some(data) => consume_chunk(&mut decoder, &mut machine, &updates_tx, &data),
                None => stdout_open = false,
            },
            chunk = handle.stderr_rx.recv(), if stderr_open => match chunk {
                // Progress output arrives on stderr and carries the same
                // protocol, so both streams feed one decoder
                Some(data) => consume_chunk(&mut decoder, &mut machine, &updates_tx, &data),
                None => stderr_open = false,
            },
            code = handle.exit_rx.recv(), if pending_exit.is_none() => {
                // Keep looping so output still in flight is decoded before
                // the exit is reported
                pending_exit = Some(code.unwrap_or(-1));
            }
            selection = selection_rx.recv() => match selection {
                Some(selection) => {
                    let outcome = machine.commit_selection(&selection);
                    if outcome.clear_buffer {
                        decoder.reset();
                    }
                    if let Err(e) = forwarder.forward(&selection) {
                        warn!("selection not delivered: {}", e);
                    }
                    for update in outcome.updates {
                        let _ = updates_tx.send(update);
                    }
                }
                // Session handle dropped; the child is reaped by its monitor
                None => return,
            },
        }

        if pending_exit.is_some() && !stdout_open && !stderr_open {
            break;
        }
    }

    let code = pending_exit.unwrap_or(-1);
    for update in machine.handle_exit(code) {
        let _ = updates_tx.send(update);
    }
    debug!("bridge loop finished, exit code {}", code);
}

/// Decode one raw chunk, mirror its text to the console view and apply
/// every event it completed
fn consume_chunk(
    decoder: &mut StreamDecoder,
    machine: &mut SessionStateMachine,
    updates_tx: &mpsc::UnboundedSender<SessionUpdate>,
    data: &[u8],
) {
    let before = decoder.len();
    let events = decoder.push(data);

    let text = decoder.tail_from(before);
    if !text.is_empty() {
        let _ = updates_tx.send(SessionUpdate::Output(text.to_string()));
    }

    for event in events {
        for update in machine.apply(event) {
            let _ = updates_tx.send(update);
        }
    }
}
