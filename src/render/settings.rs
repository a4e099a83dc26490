use serde::Deserialize;

use crate::error::RenderError;

/// Output and sampling settings shared by every job of a batch.
///
/// The resolution must be exactly 2:1, as equirectangular images cover
/// 360° horizontally and 180° vertically.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub samples: u32,
    pub denoise: bool,
    pub min_bounces: u32,
    pub max_bounces: u32,
    /// JPEG quality, 1 to 100.
    pub jpeg_quality: u8,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 4096,
            height: 2048,
            samples: 128,
            denoise: true,
            min_bounces: 3,
            max_bounces: 8,
            jpeg_quality: 90,
        }
    }
}

impl RenderSettings {
    /// Returns a copy at `width × width/2`.
    #[must_use]
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self.height = width / 2;
        self
    }

    /// Checks the settings before any job is submitted.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidSettings`] for a zero or non-2:1
    /// resolution, zero samples, inverted bounce limits, or a quality outside
    /// 1..=100.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidSettings("resolution must be non-zero".into()));
        }
        if u64::from(self.width) != 2 * u64::from(self.height) {
            return Err(RenderError::InvalidSettings(format!(
                "equirectangular output needs a 2:1 resolution, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples == 0 {
            return Err(RenderError::InvalidSettings("samples must be at least 1".into()));
        }
        if self.min_bounces > self.max_bounces {
            return Err(RenderError::InvalidSettings(format!(
                "min bounces {} exceed max bounces {}",
                self.min_bounces, self.max_bounces
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(RenderError::InvalidSettings(format!(
                "jpeg quality {} outside 1..=100",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}
