// TOML theme format parser
//
// Each theme defines every semantic color explicitly. External themes live
// in ~/.config/chat-ui/themes/<name>.toml; bundled ones are compiled in.
//

use ratatui::style::Color;
use serde::Deserialize;

/// Root structure for TOML theme files
#[derive(Debug, Clone, Deserialize)]
pub struct TomlTheme {
    pub meta: ThemeMeta,
    pub ui: UiColors,
    pub roles: RoleColors,
    /// Optional markdown colors (fall back to ui/roles)
    pub markdown: Option<MarkdownColors>,
}

/// Theme metadata
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeMeta {
    pub name: String,
    pub version: u32,
}

/// Base UI chrome colors
#[derive(Debug, Clone, Deserialize)]
pub struct UiColors {
    pub background: String,
    pub foreground: String,
    pub border: String,
    pub border_focused: String,
    pub muted: String,
    pub selection_bg: String,
    pub error: String,
    pub success: String,
    /// Attachment card background
    pub card: Option<String>,
    /// Optional border style: "plain", "rounded", "double", "thick" (default: plain)
    pub border_type: Option<String>,
}

/// Avatar colors per speaker role
#[derive(Debug, Clone, Deserialize)]
pub struct RoleColors {
    pub user: String,
    pub assistant: String,
    pub other: String,
}

/// Markdown element colors
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownColors {
    pub heading: String,
    pub code_inline: String,
    pub code_block: String,
    pub link: String,
    pub quote: String,
}

/// Schema version this build understands
pub const FORMAT_VERSION: u32 = 1;

/// Terminal palette indices `ansi:0` through `ansi:15`
const ANSI_PALETTE: [Color; 16] = [
    Color::Black,
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::White,
    Color::DarkGray,
    Color::LightRed,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightBlue,
    Color::LightMagenta,
    Color::LightCyan,
    Color::Gray,
];

impl TomlTheme {
    /// Parse a theme, rejecting schema versions from the future
    pub fn from_str(content: &str) -> Result<Self, String> {
        let theme: Self = toml::from_str(content).map_err(|e| e.to_string())?;
        if theme.meta.version > FORMAT_VERSION {
            return Err(format!(
                "theme format version {} is newer than {}",
                theme.meta.version, FORMAT_VERSION
            ));
        }
        Ok(theme)
    }

    /// `#RRGGBB`, `RRGGBB`, `ansi:N` or `ansi:fg`/`ansi:bg`
    ///
    /// Anything unreadable becomes white so a typo stays visible.
    pub fn parse_color(value: &str) -> Color {
        match value.strip_prefix("ansi:") {
            Some("fg" | "bg") => Color::Reset,
            Some(index) => index
                .parse::<usize>()
                .ok()
                .and_then(|i| ANSI_PALETTE.get(i).copied())
                .unwrap_or(Color::White),
            None => {
                let hex = value.trim_start_matches('#');
                if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Color::White;
                }
                match u32::from_str_radix(hex, 16) {
                    Ok(rgb) => {
                        let [_, r, g, b] = rgb.to_be_bytes();
                        Color::Rgb(r, g, b)
                    }
                    Err(_) => Color::White,
                }
            }
        }
    }
}
