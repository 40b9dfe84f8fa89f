//! Configuration management
//!
//! Declares the configuration structure for the bridge: how the catalog
//! script is launched, which catalog sites are known, and how sessions
//! behave. Loading and saving live in the [`loader`] module.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// How the child process is launched
    pub launch: LaunchConfig,

    /// Session behavior
    pub session: SessionConfig,

    /// Known catalog sites, in display order
    pub sites: Vec<Site>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            launch: LaunchConfig::default(),
            session: SessionConfig::default(),
            sites: default_sites(),
        }
    }
}

impl Config {
    /// Look up a site by name, case-insensitively
    pub fn site_by_name(&self, name: &str) -> Option<&Site> {
        self.sites
            .iter()
            .find(|site| site.name.eq_ignore_ascii_case(name))
    }
}

/// Child process launch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Interpreter or executable to run
    pub command: String,

    /// Script path handed to the interpreter, if any
    pub script: Option<String>,

    /// Search terms passed through as `--search`
    pub search: Option<String>,

    /// Catalog site passed through as `--site`
    pub site: Option<String>,

    /// Additional arguments appended last
    pub extra_args: Vec<String>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            command: "python".to_string(),
            script: Some("run.py".to_string()),
            search: None,
            site: None,
            extra_args: Vec::new(),
        }
    }
}

impl LaunchConfig {
    /// The executable to spawn
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The full argument vector for the spawn. Empty optional values are
    /// omitted entirely, flag and all.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(script) = &self.script {
            args.push(script.clone());
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            args.push("--search".to_string());
            args.push(search.to_string());
        }
        if let Some(site) = self.site.as_deref().filter(|s| !s.trim().is_empty()) {
            args.push("--site".to_string());
            args.push(site.to_string());
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

/// A catalog site the child can be pointed at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Position in the child's site list, 1-based
    pub index: u32,
    /// Site name as the child expects it on `--site`
    pub name: String,
    /// Country flag code for display
    pub flag: String,
}

/// Built-in site list, used when no configuration file provides one
fn default_sites() -> Vec<Site> {
    [
        ("streamingcommunity", "IT"),
        ("animeunity", "IT"),
        ("altadefinizione", "IT"),
        ("guardaserie", "IT"),
    ]
    .iter()
    .enumerate()
    .map(|(i, (name, flag))| Site {
        index: i as u32 + 1,
        name: name.to_string(),
        flag: flag.to_string(),
    })
    .collect()
}

/// Session behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Grace period for a stop request before the child is killed, in
    /// milliseconds
    pub stop_grace_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stop_grace_ms: 3000,
        }
    }
}

impl SessionConfig {
    /// Stop grace period as a duration
    pub fn stop_grace(&self) -> Duration {
        Duration::from_millis(self.stop_grace_ms)
    }
}
