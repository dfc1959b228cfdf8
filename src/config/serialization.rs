//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the config as a commented TOML file
    pub fn to_toml(&self) -> String {
        let sink = self.logging.sink_or_default();
        format!(
            r#"# chat-ui configuration

# Theme: dark, light, terminal
# Custom themes: ~/.config/chat-ui/themes/<name>.toml
theme = "{theme}"

# How long the copy action shows its check mark (milliseconds)
copy_timeout_ms = {copy_timeout}

# Redraw interval (milliseconds)
tick_rate_ms = {tick_rate}

# Width of the attachment preview drawer (percent of the terminal)
drawer_width_percent = {drawer_width}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# File logging (in addition to the in-app log buffer)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            theme = self.theme,
            copy_timeout = self.copy_timeout_ms,
            tick_rate = self.tick_rate_ms,
            drawer_width = self.drawer_width_percent,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file.is_some(),
            log_file_dir = toml_path(&sink.dir),
            log_file_rotation = sink.rotation,
            log_file_prefix = sink.prefix,
        )
    }
}

/// Forward slashes keep Windows paths valid inside a basic TOML string
fn toml_path(path: &std::path::Path) -> String {
    path.display().to_string().replace('\\', "/")
}
