//! Command-line and environment configuration.
//!
//! Every flag has an environment fallback so the token can live in the shell
//! profile instead of the command history.

use clap::Parser;
use std::time::Duration;

use crate::github::{DEFAULT_API_URL, HttpSettings};

#[derive(Debug, Clone, Parser)]
#[command(name = "ghuser-search", version, about = "Search GitHub users and browse their repositories")]
pub struct Cli {
    /// Search submitted right after startup.
    pub query: Option<String>,

    /// Personal access token sent as a bearer credential.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Base URL of the GitHub REST API.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "GHUSER_SEARCH_TIMEOUT", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Abort repository fetches of a previous search when new results arrive.
    #[arg(long, env = "GHUSER_SEARCH_CANCEL_STALE")]
    pub cancel_stale: bool,

    /// Theme file (key = #RRGGBB); created with defaults when missing.
    #[arg(long, default_value = "theme.conf")]
    pub theme: String,

    /// Keybindings file; created with defaults when missing.
    #[arg(long, default_value = "keybinds.conf")]
    pub keybinds: String,

    /// Log destination. Stdout belongs to the terminal UI.
    #[arg(long, env = "GHUSER_SEARCH_LOG", default_value = "ghuser-search.log")]
    pub log_file: String,
}

impl Cli {
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            api_url: self.api_url.clone(),
            token: self.token.clone().filter(|t| !t.trim().is_empty()),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
        }
    }
}
