//! Diagram themes.
//!
//! A theme is pure presentation: colors, node shape and pen settings. It has
//! no effect on which nodes and edges are emitted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Colors and shapes used by the DOT renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Node border color
    pub color: String,
    /// Node fill color when columns are hidden
    pub fillcolor: String,
    /// Node fill color when columns are shown
    pub fillcolor_columns: String,
    /// Title row background
    pub bgcolor: String,
    /// Column text color
    pub icolor: String,
    /// Title text color
    pub tcolor: String,
    /// HTML table style (e.g. "rounded")
    pub style: String,
    /// Node shape (e.g. "Mrecord")
    pub shape: String,
    /// Edge color
    pub pencolor: String,
    /// Edge width
    pub penwidth: String,
}

/// Built-in theme names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuiltinTheme {
    #[default]
    CommonGray,
    BlueNavy,
    GrayBox,
}

impl BuiltinTheme {
    pub const ALL: [BuiltinTheme; 3] = [
        BuiltinTheme::CommonGray,
        BuiltinTheme::BlueNavy,
        BuiltinTheme::GrayBox,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            BuiltinTheme::CommonGray => "Common gray",
            BuiltinTheme::BlueNavy => "Blue navy",
            BuiltinTheme::GrayBox => "Gray box",
        }
    }

    pub fn theme(self) -> Theme {
        match self {
            BuiltinTheme::CommonGray => Theme::new(
                "#6c6c6c", "#e0e0e0", "#f5f5f5", "#e0e0e0", "#000000", "#000000", "rounded",
                "Mrecord", "#696969", "1",
            ),
            BuiltinTheme::BlueNavy => Theme::new(
                "#1a5282", "#1a5282", "#ffffff", "#1a5282", "#000000", "#ffffff", "rounded",
                "Mrecord", "#0078d7", "2",
            ),
            BuiltinTheme::GrayBox => Theme::new(
                "#6c6c6c", "#e0e0e0", "#f5f5f5", "#e0e0e0", "#000000", "#000000", "rounded",
                "record", "#696969", "1",
            ),
        }
    }
}

impl FromStr for BuiltinTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match normalized.as_str() {
            "commongray" | "gray" | "default" => Ok(BuiltinTheme::CommonGray),
            "bluenavy" | "navy" | "blue" => Ok(BuiltinTheme::BlueNavy),
            "graybox" | "box" => Ok(BuiltinTheme::GrayBox),
            _ => Err(format!(
                "Unknown theme: {}. Valid options: common-gray, blue-navy, gray-box",
                s
            )),
        }
    }
}

impl fmt::Display for BuiltinTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Theme {
    #[allow(clippy::too_many_arguments)]
    fn new(
        color: &str,
        fillcolor: &str,
        fillcolor_columns: &str,
        bgcolor: &str,
        icolor: &str,
        tcolor: &str,
        style: &str,
        shape: &str,
        pencolor: &str,
        penwidth: &str,
    ) -> Self {
        Self {
            color: color.to_string(),
            fillcolor: fillcolor.to_string(),
            fillcolor_columns: fillcolor_columns.to_string(),
            bgcolor: bgcolor.to_string(),
            icolor: icolor.to_string(),
            tcolor: tcolor.to_string(),
            style: style.to_string(),
            shape: shape.to_string(),
            pencolor: pencolor.to_string(),
            penwidth: penwidth.to_string(),
        }
    }

    /// Load a theme from a YAML or JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let theme = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(theme)
    }
}

impl Default for Theme {
    fn default() -> Self {
        BuiltinTheme::default().theme()
    }
}
