//! Pan/zoom transform and overview synchronization for a fixed-size image.
//!
//! The engine works purely on logical image coordinates. A host renderer feeds
//! it pointer, wheel and button events in viewport-local pixels and reads back
//! a [`Transform`] (translate-then-scale, origin top-left) plus the
//! [`OverviewRect`] marking the visible region on the overview panel.

mod engine;
mod overview;
mod pan;
mod state;
mod zoom;

pub use engine::{ViewportEngine, ViewportSnapshot};
pub use overview::{OverviewRect, OverviewSync, SizeProvider, indicator_rect};
pub use pan::{DragSession, PanController};
pub use state::{Transform, ViewportState};
pub use zoom::{ZoomController, ZoomDirection};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conditions that leave the viewport unchanged.
///
/// None of these are fatal: the engine logs them and carries on with the
/// previous state.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ViewportError {
    #[error("invalid zoom factor or wheel delta: {0}")]
    InvalidZoomFactor(f64),
    #[error("degenerate measurement {width}x{height}")]
    DegenerateMeasurement { width: f64, height: f64 },
    #[error("drag already in progress")]
    InvalidDragStart,
    #[error("no drag in progress")]
    NotDragging,
    #[error("non-finite pointer position ({x}, {y})")]
    NonFinitePointer { x: f64, y: f64 },
}

/// Errors found while validating a [`ViewportConfig`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("min_zoom must be positive, got {0}")]
    NonPositiveMinZoom(f64),
    #[error("min_zoom {min} is greater than max_zoom {max}")]
    InvertedZoomRange { min: f64, max: f64 },
    #[error("zoom range [{min}, {max}] does not contain 1.0")]
    ZoomRangeExcludesIdentity { min: f64, max: f64 },
    #[error("{field} must be greater than 1, got {value}")]
    FactorTooSmall { field: &'static str, value: f64 },
    #[error("min_indicator_size must not be negative, got {0}")]
    NegativeIndicatorSize(f64),
}

/// Tunables for zoom limits, zoom steps and the overview indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Multiplier applied per wheel notch
    pub wheel_factor: f64,
    /// Multiplier applied per zoom button press
    pub button_factor: f64,
    /// Smallest indicator edge on the overview panel, in pixels
    pub min_indicator_size: f64,
    /// Indicator shown until the panels have been measured
    pub initial_indicator: OverviewRect,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.5,
            max_zoom: 5.0,
            wheel_factor: 1.1,
            button_factor: 1.2,
            min_indicator_size: 10.0,
            initial_indicator: OverviewRect {
                x: 0.0,
                y: 0.0,
                width: 40.0,
                height: 20.0,
            },
        }
    }
}

impl ViewportConfig {
    /// Checks the config, returning it unchanged when usable.
    pub fn validate(self) -> Result<Self, ConfigError> {
        for (field, value) in [
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("wheel_factor", self.wheel_factor),
            ("button_factor", self.button_factor),
            ("min_indicator_size", self.min_indicator_size),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        if self.min_zoom <= 0.0 {
            return Err(ConfigError::NonPositiveMinZoom(self.min_zoom));
        }
        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::InvertedZoomRange {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        // Reset always lands on zoom 1.
        if !(self.min_zoom..=self.max_zoom).contains(&1.0) {
            return Err(ConfigError::ZoomRangeExcludesIdentity {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        for (field, value) in [
            ("wheel_factor", self.wheel_factor),
            ("button_factor", self.button_factor),
        ] {
            if value <= 1.0 {
                return Err(ConfigError::FactorTooSmall { field, value });
            }
        }
        if self.min_indicator_size < 0.0 {
            return Err(ConfigError::NegativeIndicatorSize(
                self.min_indicator_size,
            ));
        }

        Ok(self)
    }

    /// Clamps `zoom` into `[min_zoom, max_zoom]`.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }
}
