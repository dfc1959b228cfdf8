// Theme system for the TUI
//
// Theme loading priority:
// 1. External TOML themes from ~/.config/chat-ui/themes/<name>.toml
// 2. Bundled themes (compiled into binary)
// 3. Fallback to hardcoded default

mod bundled;
mod toml_format;

pub use toml_format::TomlTheme;

use ratatui::style::Color;
use ratatui::widgets::BorderType;
use std::path::PathBuf;

/// Complete resolved theme ready for use in the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // ─── UI Element Colors ───────────────────────────────────
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub highlight: Color, // Maps to border_focused
    pub muted: Color,
    pub selection: Color,
    pub error: Color,
    pub success: Color,
    pub card: Color,
    pub border_type: BorderType,

    // ─── Avatar Colors ───────────────────────────────────────
    pub user: Color,
    pub assistant: Color,
    pub other_role: Color,

    // ─── Markdown Colors ─────────────────────────────────────
    pub heading: Color,
    pub code_inline: Color,
    pub code_block: Color,
    pub link: Color,
    pub quote: Color,
}

impl Theme {
    /// Load theme by name
    pub fn by_name(name: &str) -> Self {
        if let Some(theme) = Self::load_external(name) {
            return theme;
        }

        let normalized = name.trim().to_lowercase();
        for bundled in bundled::BUNDLED_THEMES {
            if bundled.name == normalized {
                match TomlTheme::from_str(bundled.content) {
                    Ok(toml) => return Self::from_toml(toml),
                    Err(e) => tracing::error!("Bundled theme {} is invalid: {}", bundled.name, e),
                }
            }
        }

        tracing::warn!(
            "Unknown theme '{}', using default (bundled: {})",
            name,
            Self::bundled_names().join(", ")
        );
        Self::hardcoded_default()
    }

    /// Names of the themes compiled into the binary
    pub fn bundled_names() -> Vec<&'static str> {
        bundled::BUNDLED_THEMES.iter().map(|t| t.name).collect()
    }

    fn load_external(name: &str) -> Option<Self> {
        let path = Self::themes_dir()?.join(format!("{}.toml", name.replace(' ', "_")));
        let contents = std::fs::read_to_string(&path).ok()?;
        match TomlTheme::from_str(&contents) {
            Ok(toml) => Some(Self::from_toml(toml)),
            Err(e) => {
                tracing::warn!("Ignoring invalid theme file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Get themes directory path
    fn themes_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".config").join("chat-ui").join("themes"))
    }

    /// Parse border type string to BorderType enum
    fn parse_border_type(value: Option<&str>) -> BorderType {
        match value {
            Some("rounded") => BorderType::Rounded,
            Some("double") => BorderType::Double,
            Some("thick") => BorderType::Thick,
            _ => BorderType::Plain,
        }
    }

    /// Create theme from native TOML format
    fn from_toml(toml: TomlTheme) -> Self {
        let parse = TomlTheme::parse_color;
        let markdown = toml.markdown.as_ref();

        Self {
            name: toml.meta.name.clone(),

            background: parse(&toml.ui.background),
            foreground: parse(&toml.ui.foreground),
            border: parse(&toml.ui.border),
            highlight: parse(&toml.ui.border_focused),
            muted: parse(&toml.ui.muted),
            selection: parse(&toml.ui.selection_bg),
            error: parse(&toml.ui.error),
            success: parse(&toml.ui.success),
            card: toml
                .ui
                .card
                .as_deref()
                .map(parse)
                .unwrap_or_else(|| parse(&toml.ui.selection_bg)),
            border_type: Self::parse_border_type(toml.ui.border_type.as_deref()),

            user: parse(&toml.roles.user),
            assistant: parse(&toml.roles.assistant),
            other_role: parse(&toml.roles.other),

            heading: markdown
                .map(|m| parse(&m.heading))
                .unwrap_or_else(|| parse(&toml.ui.border_focused)),
            code_inline: markdown
                .map(|m| parse(&m.code_inline))
                .unwrap_or_else(|| parse(&toml.roles.assistant)),
            code_block: markdown
                .map(|m| parse(&m.code_block))
                .unwrap_or_else(|| parse(&toml.ui.muted)),
            link: markdown
                .map(|m| parse(&m.link))
                .unwrap_or_else(|| parse(&toml.roles.user)),
            quote: markdown
                .map(|m| parse(&m.quote))
                .unwrap_or_else(|| parse(&toml.roles.other)),
        }
    }

    /// Ultimate fallback when nothing else resolves
    fn hardcoded_default() -> Self {
        Self {
            name: "default".to_string(),
            background: Color::Reset,
            foreground: Color::Reset,
            border: Color::DarkGray,
            highlight: Color::Yellow,
            muted: Color::DarkGray,
            selection: Color::Black,
            error: Color::Red,
            success: Color::Green,
            card: Color::Black,
            border_type: BorderType::Plain,
            user: Color::Blue,
            assistant: Color::Cyan,
            other_role: Color::Magenta,
            heading: Color::Yellow,
            code_inline: Color::Cyan,
            code_block: Color::Gray,
            link: Color::Blue,
            quote: Color::Magenta,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::by_name("dark")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_themes_all_parse() {
        for bundled in bundled::BUNDLED_THEMES {
            assert!(
                TomlTheme::from_str(bundled.content).is_ok(),
                "bundled theme {} should parse",
                bundled.name
            );
        }
    }

    #[test]
    fn unknown_theme_falls_back() {
        let theme = Theme::by_name("no-such-theme-anywhere");
        assert_eq!(theme.name, "default");
    }

    #[test]
    fn terminal_theme_fills_markdown_from_roles() {
        let theme = Theme::by_name("terminal");
        assert_eq!(theme.link, Color::Blue);
        assert_eq!(theme.code_inline, Color::Cyan);
    }
}
