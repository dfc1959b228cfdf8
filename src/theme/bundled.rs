//! Bundled TOML themes (compiled into binary)

pub struct BundledTheme {
    pub name: &'static str,
    pub content: &'static str,
}

pub const BUNDLED_THEMES: &[BundledTheme] = &[
    BundledTheme {
        name: "dark",
        content: DARK,
    },
    BundledTheme {
        name: "light",
        content: LIGHT,
    },
    BundledTheme {
        name: "terminal",
        content: TERMINAL,
    },
];

const DARK: &str = r##"
[meta]
name = "dark"
version = 1

[ui]
background = "#1f2023"
foreground = "#d8d4cf"
border = "#3a3b40"
border_focused = "#c9a66b"
muted = "#8a8279"
selection_bg = "#34322f"
error = "#c75f4a"
success = "#8fad5c"
card = "#2b2c30"
border_type = "rounded"

[roles]
user = "#6b98b8"
assistant = "#5da9a1"
other = "#a88fad"

[markdown]
heading = "#c9a66b"
code_inline = "#5da9a1"
code_block = "#8a8279"
link = "#6b98b8"
quote = "#a88fad"
"##;

const LIGHT: &str = r##"
[meta]
name = "light"
version = 1

[ui]
background = "#fafaf7"
foreground = "#2e2c29"
border = "#cfcac2"
border_focused = "#9a6b1f"
muted = "#7a746c"
selection_bg = "#ece7df"
error = "#b3402a"
success = "#4f7a2a"
card = "#f0ede7"
border_type = "rounded"

[roles]
user = "#2f6690"
assistant = "#2a7a71"
other = "#7a4f86"

[markdown]
heading = "#9a6b1f"
code_inline = "#2a7a71"
code_block = "#5c5750"
link = "#2f6690"
quote = "#7a4f86"
"##;

const TERMINAL: &str = r##"
[meta]
name = "terminal"
version = 1

[ui]
background = "ansi:bg"
foreground = "ansi:fg"
border = "ansi:8"
border_focused = "ansi:3"
muted = "ansi:8"
selection_bg = "ansi:0"
error = "ansi:1"
success = "ansi:2"
border_type = "plain"

[roles]
user = "ansi:4"
assistant = "ansi:6"
other = "ansi:5"
"##;
