use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::config::config_dir;

/// Most palettes remembered.
pub const MAX_HISTORY_SIZE: usize = 5;
/// Colors kept per remembered palette.
pub const PREVIEW_COLORS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub colors: Vec<Color>,
}

/// Recently extracted palettes, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaletteHistory {
    entries: Vec<HistoryEntry>,
}

impl PaletteHistory {
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Record a palette. Empty palettes are ignored.
    pub fn push(&mut self, palette: &[Color], timestamp: DateTime<Utc>) {
        if palette.is_empty() {
            return;
        }
        self.entries.insert(
            0,
            HistoryEntry {
                timestamp,
                colors: palette.iter().take(PREVIEW_COLORS).copied().collect(),
            },
        );
        self.entries.truncate(MAX_HISTORY_SIZE);
    }

    /// Load history from `path`; anything unreadable starts an empty history.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let loaded = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read history: {}", path.display()))
            .and_then(|content| {
                serde_json::from_str(&content)
                    .with_context(|| format!("invalid history file: {}", path.display()))
            });
        match loaded {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(error = %e, "could not load palette history");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory: {}", parent.display())
            })?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write history to {}", path.display()))
    }
}

pub fn history_path() -> PathBuf {
    config_dir().join("history.json")
}
