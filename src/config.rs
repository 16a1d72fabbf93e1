use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use cross_xdg::BaseDirs;
use nu_ansi_term::Style;

use crate::theme::{Palette, ThemeName, parse_color};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "BFI_CONFIG";

/// Settings read from `bfi.toml`.
///
/// ```toml
/// [visual]
/// theme = "mocha"
/// output_limit = 250
///
/// [colors]
/// cursor_bg = "#89b4fa"
/// muted = "darkgray"
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub palette: Palette,
    /// Cap on the visual output log; oldest bytes are dropped past it.
    pub output_limit: Option<usize>,
}

impl Config {
    /// Load from `$BFI_CONFIG`, else `<config home>/bfi.toml`, else defaults.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        match Self::from_path(&path) {
            Ok(cfg) => {
                tracing::debug!(path = %path.display(), "config loaded");
                cfg
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "no config, using defaults");
                Self::default()
            }
        }
    }

    /// Read a config file from an explicit path.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    /// Very small hand-rolled parser: `[section]` headers and `key = value`
    /// pairs, values optionally quoted, `#` comment lines.
    pub fn parse(content: &str) -> Self {
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut section = String::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') {
                section = line[1..line.len() - 1].trim().to_string();
                continue;
            }
            if let Some((key, raw)) = line.split_once('=') {
                let raw = raw.trim();
                // Accept quoted or unquoted
                let value = raw
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .unwrap_or(raw);
                sections
                    .entry(section.clone())
                    .or_default()
                    .insert(key.trim().to_string(), value.to_string());
            }
        }

        let empty = HashMap::new();
        let visual = sections.get("visual").unwrap_or(&empty);
        let colors = sections.get("colors").unwrap_or(&empty);

        let mut cfg = Config::default();

        for (key, value) in visual {
            match key.as_str() {
                "theme" => match ThemeName::parse(value) {
                    Some(name) => cfg.palette = Palette::named(name),
                    None => tracing::warn!(theme = %value, "unknown theme"),
                },
                "output_limit" => match value.parse::<usize>() {
                    Ok(limit) => cfg.output_limit = Some(limit),
                    Err(_) => tracing::warn!(value = %value, "output_limit is not a number"),
                },
                _ => tracing::warn!(key = %key, "unknown [visual] key"),
            }
        }

        // colors apply on top of whichever theme was selected
        for (key, value) in colors {
            let Some(color) = parse_color(value) else {
                tracing::warn!(key = %key, value = %value, "unparsable color");
                continue;
            };
            let p = &mut cfg.palette;
            match key.as_str() {
                "muted" => p.muted = p.muted.fg(color),
                "cursor_fg" => p.cursor = p.cursor.fg(color),
                "cursor_bg" => p.cursor = p.cursor.on(color),
                "printable" => p.printable = p.printable.fg(color),
                "border" => p.border = Style::new().fg(color),
                "status" => p.status = p.status.fg(color),
                _ => tracing::warn!(key = %key, "unknown [colors] key"),
            }
        }

        cfg
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(explicit));
    }

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bfi.toml");
    Some(path)
}
