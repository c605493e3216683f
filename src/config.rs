use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::aggregate::DEFAULT_OTHER_THRESHOLD;
use crate::data::dashboard::ViewOptions;

/// Range of the dot-size slider.
pub const DOT_SIZE_RANGE: std::ops::RangeInclusive<u32> = 1..=20;

// ---------------------------------------------------------------------------
// Settings – display knobs, optionally read from a JSON file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial slider position.
    pub default_dot_size: u32,
    /// Slider value → dot radius in metres.
    pub dot_scale: f64,
    pub map_zoom: f64,
    /// Share below which a category is folded into "other".
    pub other_threshold: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_dot_size: 7,
            dot_scale: 5.0,
            map_zoom: 10.0,
            other_threshold: DEFAULT_OTHER_THRESHOLD,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&text)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            DOT_SIZE_RANGE.contains(&self.default_dot_size),
            "default_dot_size must be between {} and {}, got {}",
            DOT_SIZE_RANGE.start(),
            DOT_SIZE_RANGE.end(),
            self.default_dot_size
        );
        ensure!(
            self.dot_scale > 0.0,
            "dot_scale must be positive, got {}",
            self.dot_scale
        );
        ensure!(
            self.map_zoom > 0.0,
            "map_zoom must be positive, got {}",
            self.map_zoom
        );
        ensure!(
            (0.0..1.0).contains(&self.other_threshold),
            "other_threshold must be in [0, 1), got {}",
            self.other_threshold
        );
        Ok(())
    }

    pub fn view_options(&self, dot_size: u32) -> ViewOptions {
        ViewOptions {
            dot_radius: f64::from(dot_size) * self.dot_scale,
            zoom: self.map_zoom,
            other_threshold: self.other_threshold,
        }
    }
}
