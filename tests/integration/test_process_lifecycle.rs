//! Integration tests for child process lifecycle: spawn, stdio bridging,
//! graceful stop and the kill fallback. All children are small `sh`
//! scripts, so these tests run anywhere with a POSIX shell.

use std::time::Duration;

use mediabridge::process::ProcessController;
use mediabridge::Error;

fn sh(script: &str) -> Vec<String> {
    vec!["-c".to_string(), script.to_string()]
}

async fn recv_text(rx: &mut tokio::sync::mpsc::UnboundedReceiver<Vec<u8>>) -> String {
    let chunk = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for output")
        .expect("stream closed");
    String::from_utf8(chunk).expect("valid utf-8")
}

#[tokio::test]
async fn test_spawn_captures_stdout_and_exit() {
    let (controller, mut handle) = ProcessController::spawn("sh", &sh("printf 'hello world'"))
        .await
        .unwrap();

    assert_eq!(recv_text(&mut handle.stdout_rx).await, "hello world");

    let code = handle.exit_rx.recv().await.expect("exit event");
    assert_eq!(code, 0);
    assert!(!controller.is_running());
}

#[tokio::test]
async fn test_stderr_is_captured_separately() {
    let (_controller, mut handle) =
        ProcessController::spawn("sh", &sh("printf 'to stderr' >&2"))
            .await
            .unwrap();

    assert_eq!(recv_text(&mut handle.stderr_rx).await, "to stderr");
}

#[tokio::test]
async fn test_stdin_reaches_the_child() {
    let (controller, mut handle) = ProcessController::spawn("sh", &sh("read line; echo \"got $line\""))
        .await
        .unwrap();

    controller.write(b"42\n").unwrap();
    assert_eq!(recv_text(&mut handle.stdout_rx).await, "got 42\n");

    let code = handle.exit_rx.recv().await.expect("exit event");
    assert_eq!(code, 0);
}

#[tokio::test]
async fn test_nonzero_exit_code_is_reported() {
    let (_controller, mut handle) = ProcessController::spawn("sh", &sh("exit 3")).await.unwrap();
    assert_eq!(handle.exit_rx.recv().await, Some(3));
}

#[tokio::test]
async fn test_missing_command_fails_to_spawn() {
    let result = ProcessController::spawn("no-such-binary-anywhere", &[]).await;
    assert!(matches!(result, Err(Error::CommandNotFound { .. })));
}

#[tokio::test]
async fn test_graceful_stop_lets_the_child_clean_up() {
    let script = "trap 'exit 7' TERM; echo ready; while :; do sleep 0.05; done";
    let (controller, mut handle) = ProcessController::spawn("sh", &sh(script)).await.unwrap();

    // Wait until the trap is installed before terminating
    assert_eq!(recv_text(&mut handle.stdout_rx).await, "ready\n");
    controller.stop(Duration::from_secs(3)).await.unwrap();

    let code = handle.exit_rx.recv().await.expect("exit event");
    assert_eq!(code, 7);
    assert!(!controller.is_running());
}

#[tokio::test]
async fn test_stubborn_child_is_killed_after_grace() {
    let script = "trap '' TERM; echo ready; while :; do sleep 0.05; done";
    let (controller, mut handle) = ProcessController::spawn("sh", &sh(script)).await.unwrap();

    // Wait until the trap is installed so the SIGTERM really is ignored
    assert_eq!(recv_text(&mut handle.stdout_rx).await, "ready\n");
    controller.stop(Duration::from_millis(300)).await.unwrap();

    // Killed by signal, so there is no real exit code
    let code = handle.exit_rx.recv().await.expect("exit event");
    assert_eq!(code, -1);
    assert!(!controller.is_running());
}

#[tokio::test]
async fn test_exit_is_published_exactly_once() {
    let (controller, mut handle) = ProcessController::spawn("sh", &sh("true")).await.unwrap();

    handle.exit_rx.recv().await.expect("exit event");

    // Redundant stops neither block nor re-publish the exit
    controller.stop(Duration::from_millis(100)).await.unwrap();
    controller.stop(Duration::from_millis(100)).await.unwrap();
    assert!(handle.exit_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_write_after_exit_is_rejected() {
    let (controller, mut handle) = ProcessController::spawn("sh", &sh("true")).await.unwrap();
    handle.exit_rx.recv().await.expect("exit event");

    assert!(matches!(
        controller.write(b"1\n"),
        Err(Error::ProcessNotRunning)
    ));
}

#[tokio::test]
async fn test_record_tracks_lifecycle() {
    let (controller, mut handle) = ProcessController::spawn("sh", &sh("exit 5")).await.unwrap();

    handle.exit_rx.recv().await.expect("exit event");
    let record = controller.record().await;
    assert!(record.has_exited());
    assert_eq!(record.exit_code, Some(5));
    assert!(!record.exited_successfully());
    assert!(record.execution_duration().is_some());
}
