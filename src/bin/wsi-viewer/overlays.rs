//! Overlay visibility settings and drawing functions for detection boxes.

use crate::colors;
use crate::constants::LABEL_MIN_ZOOM;
use crate::coordinates::local_to_screen;
use eframe::egui;
use wsi_viewer::DetectionBox;
use wsi_viewer::viewport::ViewportState;

/// Controls visibility of the detection overlays.
#[derive(Clone, Copy)]
pub struct OverlayVisibility {
    pub detections: bool,
    pub labels: bool,
}

impl Default for OverlayVisibility {
    fn default() -> Self {
        Self {
            detections: true,
            labels: false,
        }
    }
}

/// Draws detection boxes through the viewport transform.
pub fn draw_detections(
    ui: &mut egui::Ui,
    viewport_rect: egui::Rect,
    state: &ViewportState,
    detections: &[DetectionBox],
    overlays: OverlayVisibility,
) {
    let painter = ui.painter();
    let zoom = state.zoom();
    let stroke_width = (1.5 * zoom as f32).clamp(1.0, 3.0);

    for detection in detections {
        let rect = local_to_screen(viewport_rect, state.image_rect_to_view(detection.rect()));

        if !viewport_rect.expand(20.0).intersects(rect) {
            continue;
        }

        painter.rect_stroke(
            rect,
            2.0,
            egui::Stroke::new(stroke_width, colors::DETECTION_STROKE),
            egui::StrokeKind::Outside,
        );

        if overlays.labels && zoom >= LABEL_MIN_ZOOM {
            let font_size = (5.0 * zoom as f32).clamp(9.0, 16.0);
            let font_id = egui::FontId::proportional(font_size);
            let text_pos = rect.center_top() + egui::vec2(0.0, -3.0);

            painter.text(
                text_pos + egui::vec2(1.0, 1.0),
                egui::Align2::CENTER_BOTTOM,
                &detection.label,
                font_id.clone(),
                colors::DETECTION_LABEL_SHADOW,
            );
            painter.text(
                text_pos,
                egui::Align2::CENTER_BOTTOM,
                &detection.label,
                font_id,
                colors::DETECTION_LABEL,
            );
        }
    }
}
