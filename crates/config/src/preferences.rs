//! Persisted user preferences: the colour theme and the one-time privacy
//! consent.
//!
//! Preferences are an explicit object with a load/save lifecycle: loaded once
//! at startup, written back after every mutation. A missing or unreadable file
//! never blocks startup; defaults are used instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Background/header gradients, accents and card styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub bg_gradient_start: String,
    pub bg_gradient_middle: String,
    pub bg_gradient_end: String,
    pub bg_gradient_direction: String,

    pub header_gradient_start: String,
    pub header_gradient_middle: String,
    pub header_gradient_end: String,
    pub header_gradient_direction: String,

    pub accent_primary: String,
    pub accent_secondary: String,

    pub card_background: String,
    pub card_border: String,
}

/// Names accepted by [`ThemeColors::preset`].
pub const PRESET_NAMES: [&str; 8] = [
    "default", "ocean", "sunset", "forest", "lavender", "midnight", "coral", "mint",
];

impl ThemeColors {
    #[allow(clippy::too_many_arguments)]
    fn gradient(
        bg: [&str; 3],
        header: [&str; 3],
        accent_primary: &str,
        accent_secondary: &str,
        card_background: &str,
        card_border: &str,
    ) -> Self {
        Self {
            bg_gradient_start: bg[0].into(),
            bg_gradient_middle: bg[1].into(),
            bg_gradient_end: bg[2].into(),
            bg_gradient_direction: "to bottom right".into(),
            header_gradient_start: header[0].into(),
            header_gradient_middle: header[1].into(),
            header_gradient_end: header[2].into(),
            header_gradient_direction: "to right".into(),
            accent_primary: accent_primary.into(),
            accent_secondary: accent_secondary.into(),
            card_background: card_background.into(),
            card_border: card_border.into(),
        }
    }

    /// Look up a named preset.
    pub fn preset(name: &str) -> Option<Self> {
        let theme = match name {
            "default" => Self::default(),
            "ocean" => Self::gradient(
                ["#e0f2fe", "#dbeafe", "#e0e7ff"],
                ["#0ea5e9", "#3b82f6", "#6366f1"],
                "#0284c7",
                "#0891b2",
                "#ffffff",
                "rgba(14, 165, 233, 0.2)",
            ),
            "sunset" => Self::gradient(
                ["#fff7ed", "#fed7aa", "#fecaca"],
                ["#f97316", "#fb923c", "#f87171"],
                "#ea580c",
                "#dc2626",
                "#ffffff",
                "rgba(249, 115, 22, 0.2)",
            ),
            "forest" => Self::gradient(
                ["#f0fdf4", "#dcfce7", "#d1fae5"],
                ["#22c55e", "#10b981", "#14b8a6"],
                "#16a34a",
                "#059669",
                "#ffffff",
                "rgba(34, 197, 94, 0.2)",
            ),
            "lavender" => Self::gradient(
                ["#faf5ff", "#f3e8ff", "#e9d5ff"],
                ["#a855f7", "#9333ea", "#7c3aed"],
                "#9333ea",
                "#7c3aed",
                "#ffffff",
                "rgba(168, 85, 247, 0.2)",
            ),
            "midnight" => Self::gradient(
                ["#1e1b4b", "#312e81", "#1e3a8a"],
                ["#4c1d95", "#5b21b6", "#6366f1"],
                "#8b5cf6",
                "#a78bfa",
                "rgba(255, 255, 255, 0.1)",
                "rgba(255, 255, 255, 0.2)",
            ),
            "coral" => Self::gradient(
                ["#fff1f2", "#ffe4e6", "#fce7f3"],
                ["#fb7185", "#f472b6", "#e879f9"],
                "#e11d48",
                "#db2777",
                "#ffffff",
                "rgba(251, 113, 133, 0.2)",
            ),
            "mint" => Self::gradient(
                ["#ecfdf5", "#d1fae5", "#ccfbf1"],
                ["#10b981", "#14b8a6", "#06b6d4"],
                "#059669",
                "#0d9488",
                "#ffffff",
                "rgba(16, 185, 129, 0.2)",
            ),
            _ => return None,
        };
        Some(theme)
    }

    /// Merge a partial update; absent fields keep their current value.
    pub fn apply(&mut self, patch: ThemePatch) {
        macro_rules! merge {
            ($($field:ident),*) => {
                $(if let Some(v) = patch.$field { self.$field = v; })*
            };
        }
        merge!(
            bg_gradient_start,
            bg_gradient_middle,
            bg_gradient_end,
            bg_gradient_direction,
            header_gradient_start,
            header_gradient_middle,
            header_gradient_end,
            header_gradient_direction,
            accent_primary,
            accent_secondary,
            card_background,
            card_border
        );
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self::gradient(
            ["#faf5ff", "#fce7f3", "#eff6ff"],
            ["#c084fc", "#f9a8d4", "#93c5fd"],
            "#a855f7",
            "#ec4899",
            "#ffffff",
            "rgba(0, 0, 0, 0.1)",
        )
    }
}

/// A partial theme update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemePatch {
    pub bg_gradient_start: Option<String>,
    pub bg_gradient_middle: Option<String>,
    pub bg_gradient_end: Option<String>,
    pub bg_gradient_direction: Option<String>,
    pub header_gradient_start: Option<String>,
    pub header_gradient_middle: Option<String>,
    pub header_gradient_end: Option<String>,
    pub header_gradient_direction: Option<String>,
    pub accent_primary: Option<String>,
    pub accent_secondary: Option<String>,
    pub card_background: Option<String>,
    pub card_border: Option<String>,
}

/// When the user accepted the privacy notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub granted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: ThemeColors,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent: Option<ConsentRecord>,
}

impl Preferences {
    pub fn has_consented(&self) -> bool {
        self.consent.is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("Failed to write preferences at {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Failed to serialize preferences: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// File-backed preferences.
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    current: Preferences,
}

impl PreferenceStore {
    /// Load from `path`. Missing or corrupt files yield defaults.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load preferences, using defaults");
                Preferences::default()
            }),
            Err(_) => Preferences::default(),
        };
        Self { path, current }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> &Preferences {
        &self.current
    }

    pub fn theme(&self) -> &ThemeColors {
        &self.current.theme
    }

    pub fn save(&self) -> Result<(), PreferenceError> {
        self.write(&self.current)
    }

    fn write(&self, preferences: &Preferences) -> Result<(), PreferenceError> {
        let io_err = |e: std::io::Error| PreferenceError::Io {
            path: self.path.clone(),
            reason: e.to_string(),
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(preferences)?;
        std::fs::write(&self.path, json).map_err(io_err)
    }

    /// Persist `next`, then make it current. A failed write changes nothing.
    fn commit(&mut self, next: Preferences) -> Result<(), PreferenceError> {
        self.write(&next)?;
        self.current = next;
        Ok(())
    }

    fn with_theme(&self, theme: ThemeColors) -> Preferences {
        Preferences {
            theme,
            ..self.current.clone()
        }
    }

    pub fn update_theme(&mut self, patch: ThemePatch) -> Result<(), PreferenceError> {
        let mut theme = self.current.theme.clone();
        theme.apply(patch);
        self.commit(self.with_theme(theme))
    }

    /// Switch to a named preset. Unknown names leave the theme untouched
    /// and return `Ok(false)`.
    pub fn apply_preset(&mut self, name: &str) -> Result<bool, PreferenceError> {
        let Some(theme) = ThemeColors::preset(name) else {
            return Ok(false);
        };
        self.commit(self.with_theme(theme))?;
        Ok(true)
    }

    pub fn reset_theme(&mut self) -> Result<(), PreferenceError> {
        self.commit(self.with_theme(ThemeColors::default()))
    }

    /// Record consent. Granting twice keeps the first timestamp.
    pub fn grant_consent(&mut self, now: DateTime<Utc>) -> Result<&ConsentRecord, PreferenceError> {
        if self.current.consent.is_none() {
            self.commit(Preferences {
                consent: Some(ConsentRecord { granted_at: now }),
                ..self.current.clone()
            })?;
        }
        Ok(self.current.consent.get_or_insert(ConsentRecord { granted_at: now }))
    }
}
