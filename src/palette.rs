//! Deterministic color palette
//!
//! Characters without an explicit `color=` kwarg and identified routes both
//! receive a palette color chosen by a rolling hash of a stable key, so
//! colors survive re-analysis and stay identical across ports of the
//! engine. A custom palette can be loaded from a TOML file.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing palette files
#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("Failed to read palette file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse palette TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Palette contains no colors")]
    Empty,
}

/// The fixed default palette: 18 visually distinct 6-digit hex colors.
pub const DEFAULT_COLORS: [&str; 18] = [
    "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4",
    "#46f0f0", "#f032e6", "#bcf60c", "#fabebe", "#008080", "#e6beff",
    "#9a6324", "#fffac8", "#800000", "#aaffc3", "#808000", "#ffd8b1",
];

/// An ordered list of hex colors with hash-based stable assignment.
#[derive(Debug, Clone)]
pub struct Palette {
    /// Optional name for the palette
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Hex color values in index order
    pub colors: Vec<String>,
}

/// TOML structure for deserializing palettes
#[derive(Deserialize)]
struct TomlPalette {
    metadata: Option<TomlMetadata>,
    colors: Vec<String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

impl Palette {
    /// Load a palette from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, PaletteError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a palette from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, PaletteError> {
        let parsed: TomlPalette = toml::from_str(content)?;
        if parsed.colors.is_empty() {
            return Err(PaletteError::Empty);
        }

        Ok(Palette {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            colors: parsed.colors,
        })
    }

    /// Pick the palette color for a key via the rolling hash.
    pub fn color_for(&self, key: &str) -> &str {
        &self.colors[hash_index(key, self.colors.len())]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Classic rolling string hash: `h = code + ((h << 5) - h)` over UTF-16
/// code units, reduced to a palette index with `|h| mod modulus`.
///
/// The arithmetic wraps at 32 bits so the indices match ports of the engine
/// in languages with 32-bit integer semantics.
pub fn hash_index(key: &str, modulus: usize) -> usize {
    let mut h: i32 = 0;
    for unit in key.encode_utf16() {
        h = (unit as i32).wrapping_add((h << 5).wrapping_sub(h));
    }
    h.unsigned_abs() as usize % modulus
}
