use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::config;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub user: String,
    pub bot: String,
    pub system: String,
    pub text_dim: String,
    pub cursor_bg: String,
    pub cursor_fg: String,
    pub accent: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub timer: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // Try user themes dir
        let user_theme_path = config::config_dir()
            .join("themes")
            .join(format!("{name}.toml"));
        if let Ok(content) = fs::read_to_string(&user_theme_path) {
            match toml::from_str::<Theme>(&content) {
                Ok(theme) => return Some(theme),
                Err(e) => log::warn!("bad theme {}: {e}", user_theme_path.display()),
            }
        }

        // Try bundled themes
        let filename = format!("{name}.toml");
        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();

        if let Ok(entries) = fs::read_dir(config::config_dir().join("themes")) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) == Some("toml")
                    && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                    && !names.iter().any(|n| n == stem)
                {
                    names.push(stem.to_string());
                }
            }
        }

        names.sort();
        names
    }

    /// Name of the theme after `current` in [`available_themes`](Self::available_themes).
    pub fn next_name(current: &str) -> Option<String> {
        let themes = Self::available_themes();
        match themes.iter().position(|t| t == current) {
            Some(idx) => themes.get((idx + 1) % themes.len()).cloned(),
            None => themes.first().cloned(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("catppuccin-mocha").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            user: "#89b4fa".to_string(),
            bot: "#a6e3a1".to_string(),
            system: "#6c7086".to_string(),
            text_dim: "#585b70".to_string(),
            cursor_bg: "#f5e0dc".to_string(),
            cursor_fg: "#1e1e2e".to_string(),
            accent: "#cba6f7".to_string(),
            border: "#45475a".to_string(),
            border_focused: "#89b4fa".to_string(),
            header_bg: "#313244".to_string(),
            header_fg: "#cdd6f4".to_string(),
            timer: "#f9e2af".to_string(),
            error: "#f38ba8".to_string(),
            warning: "#fab387".to_string(),
            success: "#a6e3a1".to_string(),
        }
    }
}

impl ThemeColors {
    /// `#rrggbb` or `reset` (the terminal's own colour).
    pub fn parse_color(value: &str) -> Color {
        if value.eq_ignore_ascii_case("reset") {
            return Color::Reset;
        }
        let hex = value.trim_start_matches('#');
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
    pub fn user(&self) -> Color { Self::parse_color(&self.user) }
    pub fn bot(&self) -> Color { Self::parse_color(&self.bot) }
    pub fn system(&self) -> Color { Self::parse_color(&self.system) }
    pub fn text_dim(&self) -> Color { Self::parse_color(&self.text_dim) }
    pub fn cursor_bg(&self) -> Color { Self::parse_color(&self.cursor_bg) }
    pub fn cursor_fg(&self) -> Color { Self::parse_color(&self.cursor_fg) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn timer(&self) -> Color { Self::parse_color(&self.timer) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_themes_load() {
        for name in ["catppuccin-mocha", "catppuccin-latte", "terminal-default"] {
            let theme = Theme::load(name).unwrap_or_else(|| panic!("theme {name} should load"));
            assert_eq!(theme.name, name);
        }
    }

    #[test]
    fn test_available_themes_include_bundled() {
        let themes = Theme::available_themes();
        assert!(themes.iter().any(|t| t == "catppuccin-mocha"));
        assert!(themes.iter().any(|t| t == "catppuccin-latte"));
    }

    #[test]
    fn test_next_name_cycles() {
        let themes = Theme::available_themes();
        let last = themes.last().unwrap();
        assert_eq!(Theme::next_name(last).as_ref(), themes.first());
        assert_eq!(Theme::next_name("no-such-theme").as_ref(), themes.first());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(ThemeColors::parse_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(ThemeColors::parse_color("reset"), Color::Reset);
        assert_eq!(ThemeColors::parse_color("nope"), Color::White);
    }
}
