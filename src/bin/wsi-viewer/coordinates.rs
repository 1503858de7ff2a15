//! Conversions between the engine's viewport-local geometry and egui screen space.

use eframe::egui;

/// Converts a screen position to viewport-local coordinates.
pub fn screen_to_local(viewport_rect: egui::Rect, pos: egui::Pos2) -> kurbo::Point {
    let local = pos - viewport_rect.min;
    kurbo::Point::new(f64::from(local.x), f64::from(local.y))
}

/// Converts a rectangle local to `viewport_rect` (the viewport or the
/// overview panel) to a screen rectangle.
pub fn local_to_screen(viewport_rect: egui::Rect, rect: kurbo::Rect) -> egui::Rect {
    egui::Rect::from_min_max(
        viewport_rect.min + egui::vec2(rect.x0 as f32, rect.y0 as f32),
        viewport_rect.min + egui::vec2(rect.x1 as f32, rect.y1 as f32),
    )
}

/// Converts an egui size to a kurbo size.
pub fn to_size(size: egui::Vec2) -> kurbo::Size {
    kurbo::Size::new(f64::from(size.x), f64::from(size.y))
}
