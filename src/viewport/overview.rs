use kurbo::{Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

use super::ViewportError;
use super::state::ViewportState;

/// Measures the host's panels. Implemented by the renderer.
pub trait SizeProvider {
    /// Size of the main viewport, in pixels.
    fn container_size(&self) -> Size;
    /// Size of the overview panel, in pixels.
    fn overview_panel_size(&self) -> Size;
}

/// Indicator rectangle in overview-panel pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverviewRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl OverviewRect {
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

fn is_measured(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}

/// Clamps a position to `[0, panel - min_size]`, preferring 0 when the panel
/// is smaller than `min_size`. Never returns `-0.0`.
fn clamp_position(value: f64, panel: f64, min_size: f64) -> f64 {
    let value = value.min(panel - min_size);
    if value > 0.0 { value } else { 0.0 }
}

/// Clamps an extent to `[0, panel]`. The indicator may shrink below
/// `min_size` so it never over-reports the visible area.
fn clamp_extent(value: f64, panel: f64) -> f64 {
    let value = value.min(panel);
    if value > 0.0 { value } else { 0.0 }
}

/// Where the visible part of the image sits on the overview panel.
///
/// Returns `None` when the panel or the image has a zero (or non-finite)
/// dimension; callers keep their previous rectangle in that case.
pub fn indicator_rect(
    offset: Vec2,
    zoom: f64,
    image_size: Size,
    container: Size,
    panel: Size,
    min_indicator_size: f64,
) -> Option<OverviewRect> {
    if !is_measured(panel) || !is_measured(image_size) || !zoom.is_finite() || zoom <= 0.0 {
        return None;
    }

    let scale_x = panel.width / image_size.width;
    let scale_y = panel.height / image_size.height;

    let x = (-offset.x / zoom) * scale_x;
    let y = (-offset.y / zoom) * scale_y;
    let width = (container.width / zoom) * scale_x;
    let height = (container.height / zoom) * scale_y;

    if ![x, y, width, height].iter().all(|v| v.is_finite()) {
        return None;
    }

    Some(OverviewRect {
        x: clamp_position(x, panel.width, min_indicator_size),
        y: clamp_position(y, panel.height, min_indicator_size),
        width: clamp_extent(width, panel.width),
        height: clamp_extent(height, panel.height),
    })
}

/// Keeps the overview indicator in step with the viewport.
///
/// Holds the last measured container and panel sizes and the last derived
/// rectangle. Unmeasured panels leave the previous rectangle in place.
#[derive(Debug, Clone)]
pub struct OverviewSync {
    container: Size,
    panel: Size,
    min_indicator_size: f64,
    rect: OverviewRect,
}

impl OverviewSync {
    pub fn new(initial: OverviewRect, min_indicator_size: f64) -> Self {
        Self {
            container: Size::ZERO,
            panel: Size::ZERO,
            min_indicator_size,
            rect: initial,
        }
    }

    pub fn rect(&self) -> OverviewRect {
        self.rect
    }

    /// Records new sizes. Returns whether anything changed.
    pub fn measure(&mut self, container: Size, panel: Size) -> bool {
        if self.container == container && self.panel == panel {
            return false;
        }
        self.container = container;
        self.panel = panel;
        true
    }

    /// Re-derives the rectangle from `state` and the last measured sizes.
    pub fn refresh(&mut self, state: &ViewportState) -> Result<OverviewRect, ViewportError> {
        let rect = indicator_rect(
            state.offset(),
            state.zoom(),
            state.image_size(),
            self.container,
            self.panel,
            self.min_indicator_size,
        )
        .ok_or(ViewportError::DegenerateMeasurement {
            width: self.panel.width,
            height: self.panel.height,
        })?;

        self.rect = rect;
        Ok(rect)
    }
}
