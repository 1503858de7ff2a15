//! Color constants for viewport overlays and UI elements.

use eframe::egui::Color32;

// Viewport background and placeholder image
pub const VIEWPORT_BG: Color32 = Color32::from_rgb(229, 231, 235);
pub const PLACEHOLDER_FILL: Color32 = Color32::from_rgb(236, 200, 205);
pub const PLACEHOLDER_STROKE: Color32 = Color32::from_rgb(190, 120, 130);

// Detection boxes
pub const DETECTION_STROKE: Color32 = Color32::from_rgb(220, 38, 38);
pub const DETECTION_LABEL: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 230);
pub const DETECTION_LABEL_SHADOW: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 180);

// Overview indicator
pub const INDICATOR_FILL: Color32 = Color32::from_rgba_premultiplied(30, 64, 175, 40);
pub const INDICATOR_STROKE: Color32 = Color32::from_rgb(37, 99, 235);

// Floating badges over the viewport
pub const BADGE_FILL: Color32 = Color32::from_rgba_premultiplied(191, 191, 191, 191);
