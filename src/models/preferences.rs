use serde::{ Serialize, Deserialize };
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseThemeError {
    message: String,
}

impl fmt::Display for ParseThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseThemeError {}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" | "claro" => Ok(Theme::Light),
            "dark" | "oscuro" => Ok(Theme::Dark),
            "system" | "sistema" => Ok(Theme::System),
            _ =>
                Err(ParseThemeError {
                    message: format!("Invalid theme: '{}'", s),
                }),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
            Theme::System => write!(f, "system"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpansionMode {
    #[default]
    Compact,
    Expanded,
    Fullscreen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetPosition {
    #[default]
    BottomRight,
    BottomLeft,
}

/// Widget preferences. Missing fields in an older snapshot fall back to defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub theme: Theme,
    pub font_size: FontSize,
    pub notifications_enabled: bool,
    pub voice_enabled: bool,
    pub language: String,
    pub expansion_mode: ExpansionMode,
    pub position: WidgetPosition,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            font_size: FontSize::Medium,
            notifications_enabled: true,
            voice_enabled: false,
            language: "es".to_string(),
            expansion_mode: ExpansionMode::Compact,
            position: WidgetPosition::BottomRight,
        }
    }
}

/// Partial update for [`UserPreferences`]. `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PreferencesPatch {
    pub theme: Option<Theme>,
    pub font_size: Option<FontSize>,
    pub notifications_enabled: Option<bool>,
    pub voice_enabled: Option<bool>,
    pub language: Option<String>,
    pub expansion_mode: Option<ExpansionMode>,
    pub position: Option<WidgetPosition>,
}

impl UserPreferences {
    pub fn merge(&mut self, patch: PreferencesPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(font_size) = patch.font_size {
            self.font_size = font_size;
        }
        if let Some(enabled) = patch.notifications_enabled {
            self.notifications_enabled = enabled;
        }
        if let Some(enabled) = patch.voice_enabled {
            self.voice_enabled = enabled;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(mode) = patch.expansion_mode {
            self.expansion_mode = mode;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
    }
}
