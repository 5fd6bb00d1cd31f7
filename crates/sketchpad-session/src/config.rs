//! Editor configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Loaded from an explicit path, else from
//! `$XDG_CONFIG_HOME/sketchpad/config.json`, else defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use sketchpad_core::document::{DEFAULT_BACKGROUND, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use sketchpad_core::style::COLOR_HISTORY_CAP;
use sketchpad_geometry::sketchy::DEFAULT_ROUGHNESS;
use sketchpad_geometry::ZoomLimits;

use crate::history::DEFAULT_HISTORY_CAP;

/// Per-tool freehand parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeProfile {
    /// Applied to the current stroke width
    pub width_multiplier: f64,
    /// How strongly pressure thins the stroke (outline tools only)
    pub thinning: f64,
    /// Derive pressure from speed instead of the device
    pub simulate_pressure: bool,
}

impl StrokeProfile {
    pub const PENCIL: Self = Self { width_multiplier: 2.0, thinning: 0.5, simulate_pressure: true };
    pub const PEN: Self = Self { width_multiplier: 2.0, thinning: 0.7, simulate_pressure: false };
    pub const BRUSH: Self = Self { width_multiplier: 3.0, thinning: 0.5, simulate_pressure: true };
    pub const ERASER: Self = Self { width_multiplier: 4.0, thinning: 0.5, simulate_pressure: true };

    fn merged(self, overrides: ProfileOverrides) -> Self {
        Self {
            width_multiplier: overrides.width_multiplier.unwrap_or(self.width_multiplier),
            thinning: overrides.thinning.unwrap_or(self.thinning),
            simulate_pressure: overrides.simulate_pressure.unwrap_or(self.simulate_pressure),
        }
    }
}

/// A profile as written in a config file; absent fields keep the tool's own
/// defaults
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProfileOverrides {
    width_multiplier: Option<f64>,
    thinning: Option<f64>,
    simulate_pressure: Option<bool>,
}

macro_rules! profile_field {
    ($name:ident, $base:expr) => {
        fn $name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<StrokeProfile, D::Error> {
            ProfileOverrides::deserialize(deserializer).map(|o| $base.merged(o))
        }
    };
}

profile_field!(pencil_profile, StrokeProfile::PENCIL);
profile_field!(pen_profile, StrokeProfile::PEN);
profile_field!(brush_profile, StrokeProfile::BRUSH);
profile_field!(eraser_profile, StrokeProfile::ERASER);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub history_cap: usize,
    pub color_history_cap: usize,
    pub zoom: ZoomLimits,
    /// Wheel zoom factor is `wheel_zoom_base ^ delta_y`
    pub wheel_zoom_base: f64,
    /// Inserted images are scaled down to fit this share of the document
    pub image_fit_ratio: f64,
    pub sketch_roughness: f64,
    /// Pointer hit slop in screen pixels
    pub hit_tolerance: f64,
    pub duplicate_offset: f64,
    /// Star inner radius as a share of the outer radius
    pub star_inner_ratio: f64,
    pub stroke_smoothing: f64,
    pub stroke_streamline: f64,
    #[serde(deserialize_with = "pencil_profile")]
    pub pencil: StrokeProfile,
    #[serde(deserialize_with = "pen_profile")]
    pub pen: StrokeProfile,
    #[serde(deserialize_with = "brush_profile")]
    pub brush: StrokeProfile,
    #[serde(deserialize_with = "eraser_profile")]
    pub eraser: StrokeProfile,
    pub document_width: u32,
    pub document_height: u32,
    pub background: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_cap: DEFAULT_HISTORY_CAP,
            color_history_cap: COLOR_HISTORY_CAP,
            zoom: ZoomLimits::default(),
            wheel_zoom_base: 0.999,
            image_fit_ratio: 0.8,
            sketch_roughness: DEFAULT_ROUGHNESS,
            hit_tolerance: 4.0,
            duplicate_offset: 10.0,
            star_inner_ratio: 0.45,
            stroke_smoothing: 0.5,
            stroke_streamline: 0.5,
            pencil: StrokeProfile::PENCIL,
            pen: StrokeProfile::PEN,
            brush: StrokeProfile::BRUSH,
            eraser: StrokeProfile::ERASER,
            document_width: DEFAULT_WIDTH,
            document_height: DEFAULT_HEIGHT,
            background: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

impl EditorConfig {
    /// `$XDG_CONFIG_HOME/sketchpad/config.json`, falling back to `~/.config`
    pub fn default_path() -> Option<PathBuf> {
        let config_dir = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
        Some(config_dir.join("sketchpad").join("config.json"))
    }

    /// Parse a config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// An explicit path must load; the default location silently falls back
    /// to defaults when missing or broken.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        let Some(path) = Self::default_path().filter(|p| p.exists()) else {
            return Ok(Self::default());
        };
        match Self::load_from(&path) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "ignoring default config");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"history_cap": 5, "pen": {{"thinning": 0.9}}}}"#).unwrap();
        let config = EditorConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.history_cap, 5);
        assert_eq!(config.pen.thinning, 0.9);
        assert_eq!(config.image_fit_ratio, 0.8);
    }

    #[test]
    fn partial_profile_keeps_the_tools_own_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"pen": {{"thinning": 0.9}}, "eraser": {{"simulate_pressure": false}}}}"#).unwrap();
        let config = EditorConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.pen.width_multiplier, 2.0);
        assert!(!config.pen.simulate_pressure);
        assert_eq!(config.pen.thinning, 0.9);
        assert_eq!(config.eraser.width_multiplier, 4.0);
        assert!(!config.eraser.simulate_pressure);
        assert_eq!(config.pencil, StrokeProfile::PENCIL);
    }

    #[test]
    fn defaults_survive_a_serialize_round_trip() {
        let json = serde_json::to_string(&EditorConfig::default()).unwrap();
        let back: EditorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EditorConfig::default());
    }

    #[test]
    fn explicit_broken_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(EditorConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(EditorConfig::load(Some(&dir.path().join("nope.json"))).is_err());
    }
}
