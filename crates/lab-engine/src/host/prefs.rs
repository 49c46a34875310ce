//! UI theme preference, persisted as a single string key.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::render::color::Color;

/// Storage key for the theme preference.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Canvas clear colour.
    pub fn background(self) -> Color {
        match self {
            Theme::Light => Color::rgb8(248, 248, 244),
            Theme::Dark => Color::rgb8(24, 26, 32),
        }
    }

    /// Default stroke and label colour.
    pub fn foreground(self) -> Color {
        match self {
            Theme::Light => Color::rgb8(40, 40, 48),
            Theme::Dark => Color::rgb8(228, 228, 236),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// String key/value storage the host persists preferences into.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Non-persistent store for headless hosts and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Stored theme, or `fallback` when nothing (or garbage) is stored.
pub fn load_theme(store: &(impl PreferenceStore + ?Sized), fallback: Theme) -> Theme {
    match store.get(THEME_KEY) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            log::warn!("ignoring stored theme: {}", e);
            fallback
        }),
        None => fallback,
    }
}

pub fn save_theme(store: &mut (impl PreferenceStore + ?Sized), theme: Theme) {
    store.set(THEME_KEY, theme.as_str());
}
