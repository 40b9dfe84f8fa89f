//! Session State Machine
//!
//! Tracks what kind of selection the child is currently soliciting and
//! turns decoder events plus user selections into display updates. The
//! machine is a pure consumer: it owns no I/O and is driven one event at
//! a time, which keeps it independently testable without any
//! presentation layer.

pub mod bridge;

pub use bridge::Session;

use crate::decoder::DecodeEvent;
use crate::input::Selection;
use crate::models::TableFrame;

/// What kind of selection the child is currently requesting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionContext {
    /// No selection pending
    #[default]
    Idle,
    /// The child announced a season tier and expects a season pick
    AwaitingSeasons,
    /// The child announced episodes and expects an episode pick
    AwaitingEpisodes,
}

/// Display updates emitted toward the GUI or test harness
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    /// Raw decoded output text, for the console view
    Output(String),
    /// Show a status message
    Status(String),
    /// Clear the status message
    ClearStatus,
    /// Show a parsed (or synthesized) table
    ShowTable(TableFrame),
    /// Hide the current table
    HideTable,
    /// The child is waiting for input; enable the input surface and
    /// scroll to the latest output
    PromptReady { hint: String },
    /// Input was forwarded or the session ended; disable the input surface
    PromptClosed,
    /// The child exited; the session context has been fully reset
    ProcessExited { code: i32 },
}

/// Result of committing a user selection
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    /// Display updates to apply
    pub updates: Vec<SessionUpdate>,
    /// Whether the decoder buffer must be cleared so the next table is
    /// unambiguously episode data
    pub clear_buffer: bool,
}

/// Two-phase interactive-selection state machine
#[derive(Debug, Default)]
pub struct SessionStateMachine {
    context: SessionContext,
    selected_season: Option<u32>,
}

impl SessionStateMachine {
    /// Create a machine in the idle state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current interaction context
    pub fn context(&self) -> SessionContext {
        self.context
    }

    /// The committed single season, if any
    pub fn selected_season(&self) -> Option<u32> {
        self.selected_season
    }

    /// Reset to the idle state. Performed at session start and on process
    /// exit so stale state never leaks into a new run.
    pub fn reset(&mut self) {
        self.context = SessionContext::Idle;
        self.selected_season = None;
    }

    /// Consume one decoder event and produce the display updates it
    /// implies
    pub fn apply(&mut self, event: DecodeEvent) -> Vec<SessionUpdate> {
        match event {
            DecodeEvent::SeasonsFound(count) => {
                debug!("seasons found: {}", count);
                self.context = SessionContext::AwaitingSeasons;
                // The child only prints a count here, so the picklist is
                // synthesized locally rather than parsed
                vec![
                    SessionUpdate::ClearStatus,
                    SessionUpdate::ShowTable(TableFrame::for_seasons(count)),
                ]
            }
            DecodeEvent::EpisodesFound(count) => {
                debug!(
                    "episodes found: {} (selected season: {:?})",
                    count, self.selected_season
                );
                self.context = SessionContext::AwaitingEpisodes;
                if self.selected_season.is_some() {
                    // The episode table for the picked season is still
                    // being rendered; a Table event will replace this
                    vec![SessionUpdate::Status("Caricamento episodi...".to_string())]
                } else {
                    vec![
                        SessionUpdate::HideTable,
                        SessionUpdate::Status(format!("Trovati {} episodi!", count)),
                    ]
                }
            }
            DecodeEvent::Table(frame) => {
                if self.context == SessionContext::AwaitingEpisodes
                    && self.selected_season.is_none()
                {
                    // Flat episode lists show only the count status; the
                    // results table stays hidden for that whole flow
                    debug!("suppressing table frame in flat episode flow");
                    return Vec::new();
                }
                if self.context == SessionContext::AwaitingSeasons {
                    // Fallback for media that print a literal season table
                    // instead of a bare count
                    debug!("table frame while awaiting seasons: treating as season tier");
                }
                vec![
                    SessionUpdate::ClearStatus,
                    SessionUpdate::ShowTable(frame),
                ]
            }
            DecodeEvent::PromptPending => {
                vec![SessionUpdate::PromptReady {
                    hint: self.prompt_hint().to_string(),
                }]
            }
        }
    }

    /// Commit a validated user selection.
    ///
    /// A single-index pick while a season is being solicited narrows the
    /// session to that season and demands a buffer clear; wildcard and
    /// range picks bypass the narrowing.
    pub fn commit_selection(&mut self, selection: &Selection) -> SubmitOutcome {
        let mut updates = vec![SessionUpdate::PromptClosed];
        let mut clear_buffer = false;

        match self.context {
            SessionContext::AwaitingSeasons => {
                if let Selection::Index(season) = selection {
                    self.selected_season = Some(*season);
                    clear_buffer = true;
                    updates.push(SessionUpdate::Status("Caricamento episodi...".to_string()));
                } else {
                    updates.push(SessionUpdate::HideTable);
                }
            }
            SessionContext::AwaitingEpisodes => {
                if !selection.is_single_index() {
                    updates.push(SessionUpdate::HideTable);
                }
            }
            SessionContext::Idle => {}
        }

        SubmitOutcome {
            updates,
            clear_buffer,
        }
    }

    /// Full reset plus the updates a process exit implies
    pub fn handle_exit(&mut self, code: i32) -> Vec<SessionUpdate> {
        self.reset();
        vec![
            SessionUpdate::PromptClosed,
            SessionUpdate::ClearStatus,
            SessionUpdate::ProcessExited { code },
        ]
    }

    /// Context-dependent placeholder for the input surface
    fn prompt_hint(&self) -> &'static str {
        match self.context {
            SessionContext::AwaitingSeasons => {
                "Inserisci il numero della stagione (es: 1, *, 1-2, 3-*)"
            }
            SessionContext::AwaitingEpisodes => {
                "Inserisci l'indice dell'episodio (es: 1, *, 1-2, 3-*)"
            }
            SessionContext::Idle => "Inserisci l'indice del media...",
        }
    }
}
