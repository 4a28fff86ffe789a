use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Row count above which construction skips the consistency check on
/// untrusted entries (a warning is logged instead).
pub const DEFAULT_VALIDATION_ROW_LIMIT: usize = 20000;

/// Central configuration for building and rendering ragged arrays.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RaggedConfig {
    /// Check that untrusted entries are uniformly rows or uniformly scalars.
    pub error_checking: bool,
    /// Inputs with more rows than this are not checked.
    pub validation_row_limit: usize,
    pub render_style: RenderStyle,
}

impl RaggedConfig {
    pub fn new(error_checking: bool, validation_row_limit: usize) -> Self {
        Self {
            error_checking,
            validation_row_limit,
            render_style: RenderStyle::default(),
        }
    }

    pub fn unchecked() -> Self {
        Self {
            error_checking: false,
            ..Self::default()
        }
    }
}

impl Default for RaggedConfig {
    fn default() -> Self {
        Self {
            error_checking: true,
            validation_row_limit: DEFAULT_VALIDATION_ROW_LIMIT,
            render_style: RenderStyle::default(),
        }
    }
}

/// Textual rendering modes. Both share the same row formatting and differ
/// only in header, footer and indentation.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenderStyle {
    /// `RaggedArray([ ... ])`, six-space indentation.
    #[default]
    Debug,
    /// `[ ... ]`, one-space indentation.
    Plain,
}

impl FromStr for RenderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" | "repr" => Ok(RenderStyle::Debug),
            "plain" | "str" => Ok(RenderStyle::Plain),
            _ => Err(format!(
                "Unknown render style: {}. Expected one of 'debug', 'repr', 'plain' or 'str'",
                s
            )),
        }
    }
}
