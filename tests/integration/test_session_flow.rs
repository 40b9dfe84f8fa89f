//! End-to-end session flows against scripted children that speak the
//! catalog protocol: count markers, box-drawn tables and input prompts.

use std::time::Duration;

use mediabridge::models::TableFrame;
use mediabridge::session::{Session, SessionUpdate};
use tempfile::TempDir;

/// Write a shell script into a temp dir and return (dir, spawn args).
/// The dir must stay alive for the duration of the session.
fn script(dir: &TempDir, body: &str) -> Vec<String> {
    let path = dir.path().join("child.sh");
    std::fs::write(&path, body).unwrap();
    vec![path.to_string_lossy().to_string()]
}

async fn next(session: &mut Session) -> SessionUpdate {
    tokio::time::timeout(Duration::from_secs(5), session.next_update())
        .await
        .expect("timed out waiting for update")
        .expect("update stream closed")
}

#[tokio::test]
async fn test_series_flow_season_then_episode() {
    let dir = TempDir::new().unwrap();
    let args = script(
        &dir,
        "printf 'Seasons found: 2 seasons\\n'\n\
         printf 'Insert the season number: '\n\
         read season\n\
         printf 'Episodes find: 3 episodes\\n'\n\
         printf '\u{250c}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{252c}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2510}\\n'\n\
         printf '\u{2502} Index \u{2502} Name    \u{2502}\\n'\n\
         printf '\u{2502} 1     \u{2502} Pilot   \u{2502}\\n'\n\
         printf '\u{2502} 2     \u{2502} Middle  \u{2502}\\n'\n\
         printf '\u{2502} 3     \u{2502} Finale  \u{2502}\\n'\n\
         printf '\u{2514}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2534}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2518}\\n'\n\
         printf 'Insert episode index: '\n\
         read ep\n\
         printf 'Scaricato %s\\n' \"$ep\"\n",
    );

    let mut session = Session::spawn("sh", &args).await.unwrap();

    let mut season_table_shown = false;
    let mut episode_table: Option<TableFrame> = None;
    let mut transcript = String::new();
    let mut prompts = 0;
    let exit_code;

    loop {
        match next(&mut session).await {
            SessionUpdate::Output(text) => transcript.push_str(&text),
            SessionUpdate::ShowTable(frame) => {
                if frame == TableFrame::for_seasons(2) {
                    season_table_shown = true;
                } else {
                    episode_table = Some(frame);
                }
            }
            SessionUpdate::PromptReady { hint } => {
                prompts += 1;
                match prompts {
                    1 => {
                        assert!(hint.contains("stagione"));
                        session.submit("1").unwrap();
                    }
                    2 => {
                        assert!(hint.contains("episodio"));
                        session.submit("2").unwrap();
                    }
                    n => panic!("unexpected prompt #{}", n),
                }
            }
            SessionUpdate::ProcessExited { code } => {
                exit_code = code;
                break;
            }
            _ => {}
        }
    }

    assert_eq!(exit_code, 0);
    assert!(season_table_shown, "season picklist was never shown");

    let episodes = episode_table.expect("episode table was never shown");
    assert_eq!(episodes.headers, vec!["Index", "Name"]);
    assert_eq!(episodes.rows.len(), 3);
    assert_eq!(episodes.rows[0], vec!["1", "Pilot"]);

    assert!(transcript.contains("Scaricato 2"));
}

#[tokio::test]
async fn test_film_flow_prompt_only() {
    let dir = TempDir::new().unwrap();
    let args = script(
        &dir,
        "printf 'Insert the media index: '\n\
         read idx\n\
         printf 'ok %s\\n' \"$idx\"\n",
    );

    let mut session = Session::spawn("sh", &args).await.unwrap();

    let mut transcript = String::new();
    loop {
        match next(&mut session).await {
            SessionUpdate::Output(text) => transcript.push_str(&text),
            SessionUpdate::PromptReady { hint } => {
                assert!(hint.contains("media"));
                session.submit("1").unwrap();
            }
            SessionUpdate::ProcessExited { code } => {
                assert_eq!(code, 0);
                break;
            }
            _ => {}
        }
    }

    assert!(transcript.contains("ok 1"));
}

#[tokio::test]
async fn test_invalid_input_never_reaches_the_child() {
    let dir = TempDir::new().unwrap();
    let args = script(
        &dir,
        "printf 'Insert the media index: '\n\
         read idx\n\
         printf 'got %s\\n' \"$idx\"\n",
    );

    let mut session = Session::spawn("sh", &args).await.unwrap();

    let mut transcript = String::new();
    loop {
        match next(&mut session).await {
            SessionUpdate::Output(text) => transcript.push_str(&text),
            SessionUpdate::PromptReady { .. } => {
                // Rejected locally; the child keeps waiting
                assert!(session.submit("abc").is_err());
                assert!(session.submit("not a number").is_err());
                session.submit("3").unwrap();
            }
            SessionUpdate::ProcessExited { code } => {
                assert_eq!(code, 0);
                break;
            }
            _ => {}
        }
    }

    assert!(transcript.contains("got 3"));
    assert!(!transcript.contains("abc"));
}

#[tokio::test]
async fn test_wildcard_selection_hides_picklist() {
    let dir = TempDir::new().unwrap();
    let args = script(
        &dir,
        "printf 'Seasons found: 4 seasons\\n'\n\
         printf 'Insert the season number: '\n\
         read season\n\
         printf 'downloading %s\\n' \"$season\"\n",
    );

    let mut session = Session::spawn("sh", &args).await.unwrap();

    let mut hid_table = false;
    let mut transcript = String::new();
    loop {
        match next(&mut session).await {
            SessionUpdate::Output(text) => transcript.push_str(&text),
            SessionUpdate::PromptReady { .. } => session.submit("*").map(|_| ()).unwrap(),
            SessionUpdate::HideTable => hid_table = true,
            SessionUpdate::ProcessExited { .. } => break,
            _ => {}
        }
    }

    assert!(hid_table);
    assert!(transcript.contains("downloading *"));
}

#[tokio::test]
async fn test_session_stop_mid_prompt() {
    let dir = TempDir::new().unwrap();
    let args = script(
        &dir,
        "printf 'Insert the media index: '\n\
         read idx\n",
    );

    let mut session = Session::spawn("sh", &args).await.unwrap();

    // Wait until the child is blocked on stdin, then tear it down
    loop {
        if let SessionUpdate::PromptReady { .. } = next(&mut session).await {
            break;
        }
    }
    session.stop(Duration::from_millis(500)).await.unwrap();

    loop {
        if let SessionUpdate::ProcessExited { .. } = next(&mut session).await {
            break;
        }
    }
    assert!(!session.is_running());
}
