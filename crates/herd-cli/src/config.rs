use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

/// Settings for the `herd` binary, read from TOML.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HerdConfig {
    /// Where the world-state snapshot lives.
    pub state_path: PathBuf,
    /// Pretty-print JSON output.
    pub pretty_json: bool,
}

impl Default for HerdConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("herd-state.json"),
            pretty_json: false,
        }
    }
}

impl HerdConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
