//! Selection Input Validation and Forwarding
//!
//! User decisions travel back to the child as one line per submission:
//! a 1-based index, `*` for everything, or a range (`2-5`, `3-*`).
//! Anything else is rejected before it ever reaches the child.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::process::ProcessController;

static RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)-(\d+|\*)$").expect("range pattern is valid"));

/// A validated user selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A single 1-based index
    Index(u32),
    /// `*`: select everything
    All,
    /// `a-b` or `a-*`: a bounded or open-ended range
    Range { start: u32, end: Option<u32> },
}

impl Selection {
    /// Parse and validate raw user input.
    ///
    /// Indices are 1-based, so `0` is rejected along with anything that
    /// is not one of the three accepted forms.
    pub fn parse(raw: &str) -> Result<Selection> {
        let input = raw.trim();
        let reject = || Error::InvalidSelection {
            input: raw.to_string(),
        };

        if input == "*" {
            return Ok(Selection::All);
        }

        if let Some(caps) = RANGE_RE.captures(input) {
            let start: u32 = caps[1].parse().map_err(|_| reject())?;
            if start == 0 {
                return Err(reject());
            }
            let end = match &caps[2] {
                "*" => None,
                digits => Some(digits.parse().map_err(|_| reject())?),
            };
            return Ok(Selection::Range { start, end });
        }

        match input.parse::<u32>() {
            Ok(n) if n >= 1 => Ok(Selection::Index(n)),
            _ => Err(reject()),
        }
    }

    /// Whether this is a single-index pick (narrows a season), as opposed
    /// to a bulk wildcard/range selection
    pub fn is_single_index(&self) -> bool {
        matches!(self, Selection::Index(_))
    }

    /// The command line the child expects: the literal text plus newline
    pub fn encode(&self) -> String {
        match self {
            Selection::Index(n) => format!("{}\n", n),
            Selection::All => "*\n".to_string(),
            Selection::Range { start, end: Some(end) } => format!("{}-{}\n", start, end),
            Selection::Range { start, end: None } => format!("{}-*\n", start),
        }
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let encoded = self.encode();
        write!(f, "{}", encoded.trim_end())
    }
}

/// Forwards validated selections to the child's stdin
#[derive(Clone)]
pub struct InputForwarder {
    controller: ProcessController,
}

impl InputForwarder {
    /// Create a forwarder writing through the given controller
    pub fn new(controller: ProcessController) -> Self {
        Self { controller }
    }

    /// Encode a selection and queue it on the child's stdin.
    ///
    /// A forward against a dead child is reported, logged by the caller
    /// and otherwise ignored.
    pub fn forward(&self, selection: &Selection) -> Result<()> {
        debug!("forwarding selection: {}", selection);
        self.controller.write(selection.encode().as_bytes())
    }
}
