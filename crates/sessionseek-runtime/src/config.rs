use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sessionseek_index::{IndexCapabilities, SnippetOptions};
use std::path::{Path, PathBuf};

/// Resolve the workspace data directory path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. SESSIONSEEK_PATH environment variable (with tilde expansion)
/// 3. XDG data directory (recommended default)
/// 4. ~/.sessionseek (fallback for systems without XDG)
pub fn resolve_workspace_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("SESSIONSEEK_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("sessionseek"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".sessionseek"));
    }

    Err(Error::Config(
        "Could not determine workspace path: no HOME directory or XDG data directory found"
            .to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Page size used when the caller does not pass one.
    pub sessions_per_page: i64,
    pub snippet_tokens: u32,
    pub fallback_snippet_chars: usize,
    pub tool_preview_chars: usize,
    pub highlight_open: String,
    pub highlight_close: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let snippets = SnippetOptions::default();
        Self {
            sessions_per_page: 3,
            snippet_tokens: snippets.snippet_tokens,
            fallback_snippet_chars: snippets.fallback_chars,
            tool_preview_chars: snippets.tool_preview_chars,
            highlight_open: snippets.highlight_open,
            highlight_close: snippets.highlight_close,
        }
    }
}

/// Switches for optional index primitives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub native_snippets: bool,
    pub native_rank: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            native_snippets: true,
            native_rank: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub index: IndexConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::default_path()?;
        Self::load_from(&config_path)
    }

    /// Missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(resolve_workspace_path(None)?.join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        if self.search.sessions_per_page <= 0 {
            return Err(Error::Config(format!(
                "search.sessions_per_page must be positive, got {}",
                self.search.sessions_per_page
            )));
        }
        Ok(())
    }

    pub fn capabilities(&self) -> IndexCapabilities {
        IndexCapabilities {
            native_rank: self.index.native_rank,
            native_snippet: self.index.native_snippets,
        }
    }

    pub fn snippet_options(&self) -> SnippetOptions {
        SnippetOptions {
            highlight_open: self.search.highlight_open.clone(),
            highlight_close: self.search.highlight_close.clone(),
            snippet_tokens: self.search.snippet_tokens,
            fallback_chars: self.search.fallback_snippet_chars,
            tool_preview_chars: self.search.tool_preview_chars,
        }
    }
}
