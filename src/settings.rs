//! Game settings and preferences
//!
//! Persisted in LocalStorage. The theme is a presentation concern only and is
//! never consulted by the simulation.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Visual skin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    /// Rabbit catching carrots
    #[default]
    Meadow,
    /// Hedgehog catching apples
    Orchard,
    /// Seal catching fish
    Ocean,
    /// Ship catching stars
    Space,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Meadow, Theme::Orchard, Theme::Ocean, Theme::Space];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Meadow => "Meadow",
            Theme::Orchard => "Orchard",
            Theme::Ocean => "Ocean",
            Theme::Space => "Space",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "meadow" | "rabbit" => Some(Theme::Meadow),
            "orchard" => Some(Theme::Orchard),
            "ocean" | "sea" => Some(Theme::Ocean),
            "space" => Some(Theme::Space),
            _ => None,
        }
    }

    /// Theme named by a `theme=` pair in a URL query (`?theme=ocean&x=1`)
    pub fn from_query(search: &str) -> Option<Self> {
        search
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "theme")
            .and_then(|(_, value)| Self::from_str(value))
    }

    /// CSS class applied to the play area
    pub fn css_class(&self) -> &'static str {
        match self {
            Theme::Meadow => "theme-meadow",
            Theme::Orchard => "theme-orchard",
            Theme::Ocean => "theme-ocean",
            Theme::Space => "theme-space",
        }
    }

    /// Text glyph used for falling items
    pub fn item_label(&self) -> &'static str {
        match self {
            Theme::Meadow => "🥕",
            Theme::Orchard => "🍎",
            Theme::Ocean => "🐟",
            Theme::Space => "⭐",
        }
    }
}

/// Difficulty preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    #[default]
    Classic,
    Frantic,
}

impl Preset {
    pub fn tuning(&self) -> Tuning {
        match self {
            Preset::Classic => Tuning::classic(),
            Preset::Frantic => Tuning::frantic(),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Visual skin
    pub theme: Theme,
    /// Difficulty ramp
    #[serde(default)]
    pub preset: Preset,
    /// Show the current fall speed next to the score
    #[serde(default)]
    pub show_speed: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Meadow,
            preset: Preset::Classic,
            show_speed: false,
        }
    }
}

impl Settings {
    /// Tuning for the selected preset
    pub fn tuning(&self) -> Tuning {
        self.preset.tuning()
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "carrot_catch_settings";

    /// Parse stored JSON, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Discarding stored settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No {} storage on native, using defaults", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
