use std::fs;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_correct: String,
    pub text_incorrect: String,
    pub text_incorrect_bg: String,
    pub text_pending: String,
    pub text_cursor_bg: String,
    pub text_cursor_fg: String,
    pub text_backtrack: String,
    pub text_fix: String,
    pub retype: String,
    pub stop: String,
    pub accent: String,
    pub border: String,
    pub header_bg: String,
    pub header_fg: String,
    pub error: String,
}

impl Theme {
    /// Themes are plain TOML files under `<config>/guten/themes/`.
    pub fn load(name: &str) -> Option<Self> {
        let path = dirs::config_dir()?
            .join("guten")
            .join("themes")
            .join(format!("{name}.toml"));
        let content = fs::read_to_string(&path).ok()?;
        match toml::from_str::<Theme>(&content) {
            Ok(theme) => Some(theme),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed theme");
                None
            }
        }
    }

    pub fn load_or_default(name: &str) -> Self {
        Self::load(name).unwrap_or_default()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            text_correct: "#a6e3a1".to_string(),
            text_incorrect: "#f38ba8".to_string(),
            text_incorrect_bg: "#45273a".to_string(),
            text_pending: "#585b70".to_string(),
            text_cursor_bg: "#f5e0dc".to_string(),
            text_cursor_fg: "#1e1e2e".to_string(),
            text_backtrack: "#fab387".to_string(),
            text_fix: "#f9e2af".to_string(),
            retype: "#eba0ac".to_string(),
            stop: "#f38ba8".to_string(),
            accent: "#89b4fa".to_string(),
            border: "#45475a".to_string(),
            header_bg: "#313244".to_string(),
            header_fg: "#cdd6f4".to_string(),
            error: "#f38ba8".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_correct(&self) -> Color { Self::parse_color(&self.text_correct) }
    pub fn text_incorrect(&self) -> Color { Self::parse_color(&self.text_incorrect) }
    pub fn text_incorrect_bg(&self) -> Color { Self::parse_color(&self.text_incorrect_bg) }
    pub fn text_pending(&self) -> Color { Self::parse_color(&self.text_pending) }
    pub fn text_cursor_bg(&self) -> Color { Self::parse_color(&self.text_cursor_bg) }
    pub fn text_cursor_fg(&self) -> Color { Self::parse_color(&self.text_cursor_fg) }
    pub fn text_backtrack(&self) -> Color { Self::parse_color(&self.text_backtrack) }
    pub fn text_fix(&self) -> Color { Self::parse_color(&self.text_fix) }
    pub fn retype(&self) -> Color { Self::parse_color(&self.retype) }
    pub fn stop(&self) -> Color { Self::parse_color(&self.stop) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
}
