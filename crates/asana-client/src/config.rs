//! Client configuration: base URL, credential, and default resource ids.
//!
//! Resolution order, later layers overriding earlier ones:
//! 1. Built-in defaults (`https://app.asana.com/api/1.0`, 30s timeout)
//! 2. TOML config file (`./.asana-mcp.toml`, then `~/.config/asana-mcp.toml`,
//!    or an explicit path)
//! 3. Environment (`ASANA_ACCESS_TOKEN`, `ASANA_PROJECT_ID`, `ASANA_WORKSPACE_ID`,
//!    `ASANA_BASE_URL`, `ASANA_TIMEOUT_MS`)
//!
//! The access token comes from `ASANA_ACCESS_TOKEN` if set, otherwise from the
//! first token file found. Without a token the config is still valid; callers
//! decide what "no credentials" means.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_BASE_URL: &str = "https://app.asana.com/api/1.0";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const ENV_ACCESS_TOKEN: &str = "ASANA_ACCESS_TOKEN";
pub const ENV_PROJECT_ID: &str = "ASANA_PROJECT_ID";
pub const ENV_WORKSPACE_ID: &str = "ASANA_WORKSPACE_ID";
pub const ENV_BASE_URL: &str = "ASANA_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "ASANA_TIMEOUT_MS";

const CONFIG_FILENAME: &str = ".asana-mcp.toml";
const GLOBAL_CONFIG_DIR: &str = ".config";
const GLOBAL_CONFIG_FILENAME: &str = "asana-mcp.toml";
const TOKEN_FILENAME: &str = "asana.token";
const GLOBAL_TOKEN_DIR: &str = "asana-mcp";

/// Raw contents of an `.asana-mcp.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    /// Path to a file holding the personal access token.
    pub token_file: Option<PathBuf>,
    pub default_project_id: Option<String>,
    pub default_workspace_id: Option<String>,
    pub timeout_ms: Option<u64>,
}

/// Where the access token was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TokenSource {
    Environment,
    File(PathBuf),
    #[default]
    Missing,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => write!(f, "environment ({ENV_ACCESS_TOKEN})"),
            Self::File(path) => write!(f, "file ({})", path.display()),
            Self::Missing => write!(f, "none"),
        }
    }
}

/// Resolved, immutable client configuration.
#[derive(Clone)]
pub struct AsanaConfig {
    pub base_url: String,
    pub access_token: Option<String>,
    pub token_source: TokenSource,
    pub default_project_id: Option<String>,
    pub default_workspace_id: Option<String>,
    pub timeout_ms: u64,
}

impl fmt::Debug for AsanaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsanaConfig")
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("token_source", &self.token_source)
            .field("default_project_id", &self.default_project_id)
            .field("default_workspace_id", &self.default_workspace_id)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl Default for AsanaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            token_source: TokenSource::Missing,
            default_project_id: None,
            default_workspace_id: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl AsanaConfig {
    /// Load from the discovered (or explicit) config file and the process environment.
    pub fn load(explicit_path: Option<&Path>) -> ClientResult<Self> {
        let file = match explicit_path {
            Some(path) => load_config_file(path)?,
            None => match find_config_file() {
                Some(path) => load_config_file(&path)?,
                None => ConfigFile::default(),
            },
        };
        let token_candidates = token_file_candidates(file.token_file.as_deref());
        Self::resolve(file, &token_candidates, |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with an environment lookup.
    ///
    /// `token_candidates` are tried in order when the environment has no token.
    pub fn resolve(
        file: ConfigFile,
        token_candidates: &[PathBuf],
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ClientResult<Self> {
        let env = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let (access_token, token_source) = match env(ENV_ACCESS_TOKEN) {
            Some(token) => (Some(token), TokenSource::Environment),
            None => match read_first_token_file(token_candidates) {
                Some((token, path)) => (Some(token), TokenSource::File(path)),
                None => (None, TokenSource::Missing),
            },
        };

        let timeout_ms = match env(ENV_TIMEOUT_MS) {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ClientError::config_error(format!("{ENV_TIMEOUT_MS}={raw:?} is not a number: {e}"))
            })?,
            None => file.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
        };

        let base_url = env(ENV_BASE_URL)
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            base_url,
            access_token,
            token_source,
            default_project_id: env(ENV_PROJECT_ID).or(file.default_project_id),
            default_workspace_id: env(ENV_WORKSPACE_ID).or(file.default_workspace_id),
            timeout_ms,
        })
    }

    /// Apply command-line overrides for the default ids.
    #[must_use]
    pub fn with_overrides(
        mut self,
        project_id: Option<String>,
        workspace_id: Option<String>,
    ) -> Self {
        if project_id.is_some() {
            self.default_project_id = project_id;
        }
        if workspace_id.is_some() {
            self.default_workspace_id = workspace_id;
        }
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Parse a config file from an explicit path.
pub fn load_config_file(path: &Path) -> ClientResult<ConfigFile> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ClientError::config_error(format!("failed to read {}: {e}", path.display()))
    })?;
    let file: ConfigFile = toml::from_str(&contents).map_err(|e| {
        ClientError::config_error(format!("failed to parse {}: {e}", path.display()))
    })?;
    debug!(path = %path.display(), "Loaded asana-mcp config");
    Ok(file)
}

/// Search for a config file in precedence order.
fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.is_file() {
        return Some(local);
    }

    let global = dirs::home_dir()?
        .join(GLOBAL_CONFIG_DIR)
        .join(GLOBAL_CONFIG_FILENAME);
    global.is_file().then_some(global)
}

/// Token file locations, most specific first.
pub fn token_file_candidates(configured: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(3);
    if let Some(path) = configured {
        candidates.push(path.to_path_buf());
    }
    candidates.push(PathBuf::from(TOKEN_FILENAME));
    if let Some(home) = dirs::home_dir() {
        candidates.push(
            home.join(GLOBAL_CONFIG_DIR)
                .join(GLOBAL_TOKEN_DIR)
                .join(TOKEN_FILENAME),
        );
    }
    candidates
}

fn read_first_token_file(candidates: &[PathBuf]) -> Option<(String, PathBuf)> {
    for path in candidates.iter().filter(|p| p.is_file()) {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    warn!(path = %path.display(), "Token file is empty, skipping");
                    continue;
                }
                return Some((token.to_string(), path.clone()));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read token file, skipping");
            }
        }
    }
    None
}
