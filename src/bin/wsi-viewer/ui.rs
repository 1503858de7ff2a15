//! UI rendering methods for the WSI viewer.

use crate::WsiViewerApp;
use crate::colors;
use crate::constants::{
    OVERVIEW_PANEL_HEIGHT, OVERVIEW_SIDEBAR_WIDTH, SIDEBAR_WIDTH, TABLE_ROW_HEIGHT,
};
use crate::coordinates::{local_to_screen, screen_to_local};
use crate::overlays::draw_detections;
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use wsi_viewer::CellCategory;

/// Texture coordinates covering the whole image.
fn full_uv() -> egui::Rect {
    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0))
}

impl WsiViewerApp {
    /// Handles keyboard shortcuts for zoom and overlay toggles.
    pub fn handle_keyboard_input(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals) {
                self.engine.zoom_in_button();
            }
            if i.key_pressed(egui::Key::Minus) {
                self.engine.zoom_out_button();
            }
            if i.key_pressed(egui::Key::Num0) {
                self.engine.reset();
            }
            if i.key_pressed(egui::Key::D) {
                self.overlays.detections = !self.overlays.detections;
            }
            if i.key_pressed(egui::Key::L) {
                self.overlays.labels = !self.overlays.labels;
            }
        });
    }

    /// Renders the left sidebar with the cell count tables.
    pub fn show_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("cell_counts")
            .exact_width(SIDEBAR_WIDTH)
            .resizable(false)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for category in CellCategory::ALL {
                        ui.add_space(4.0);
                        ui.heading(category.title());
                        ui.separator();
                        self.show_category_table(ui, category);
                        ui.add_space(12.0);
                    }
                });
            });
    }

    /// Renders one category table; clicking a selectable row switches the cell type.
    fn show_category_table(&mut self, ui: &mut egui::Ui, category: CellCategory) {
        let Some(table) = self.catalog.table(category) else {
            ui.label("No data");
            return;
        };
        let selectable = category.is_selectable();
        let selected = self
            .engine
            .selection()
            .filter(|(c, _)| *c == category)
            .map(|(_, name)| name.to_owned());
        let mut clicked: Option<String> = None;

        ui.push_id(category.title(), |ui| {
            let mut builder = TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .column(Column::remainder())
                .column(Column::auto().at_least(60.0));
            if selectable {
                builder = builder
                    .column(Column::auto().at_least(80.0))
                    .sense(egui::Sense::click());
            }

            builder
                .header(TABLE_ROW_HEIGHT, |mut header| {
                    header.col(|_| {});
                    if selectable {
                        header.col(|ui| {
                            ui.strong("Count");
                        });
                        header.col(|ui| {
                            ui.strong("Percentage");
                        });
                    } else {
                        header.col(|_| {});
                    }
                })
                .body(|mut body| {
                    for row in &table.rows {
                        body.row(TABLE_ROW_HEIGHT, |mut table_row| {
                            let is_selected = selected.as_deref() == Some(row.name.as_str());
                            table_row.set_selected(is_selected);
                            table_row.col(|ui| {
                                ui.label(&row.name);
                            });
                            table_row.col(|ui| {
                                ui.label(row.count.to_string());
                            });
                            if selectable {
                                table_row.col(|ui| {
                                    ui.label(row.percentage_label().unwrap_or_default());
                                });
                                if table_row.response().clicked() {
                                    clicked = Some(row.name.clone());
                                }
                            }
                        });
                    }
                });
        });

        if let Some(name) = clicked {
            log::info!("Selected {}: {name}", category.title());
            self.engine.select_category(category, name);
        }
    }

    /// Renders the right sidebar: overview map and patient info.
    pub fn show_overview_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("overview")
            .exact_width(OVERVIEW_SIDEBAR_WIDTH)
            .resizable(false)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("WSI");
                    ui.label("Zoomed out view (Hub)");
                });
                ui.add_space(8.0);

                let (panel_rect, _) = ui.allocate_exact_size(
                    egui::vec2(ui.available_width(), OVERVIEW_PANEL_HEIGHT),
                    egui::Sense::hover(),
                );
                self.panel_sizes.overview = panel_rect.size();
                self.paint_overview(ui, panel_rect);

                ui.add_space(12.0);
                self.show_patient_info(ui);
            });
    }

    /// Paints the whole image into the overview panel plus the view indicator.
    fn paint_overview(&self, ui: &egui::Ui, panel_rect: egui::Rect) {
        let painter = ui.painter_at(panel_rect);

        match self.get_texture(self.current_image()) {
            Some(texture) => {
                painter.image(texture.id(), panel_rect, full_uv(), egui::Color32::WHITE);
            }
            None => {
                painter.rect_filled(panel_rect, 0.0, colors::PLACEHOLDER_FILL);
            }
        }

        let indicator = local_to_screen(panel_rect, self.engine.overview_rect().to_rect());
        painter.rect_filled(indicator, 0.0, colors::INDICATOR_FILL);
        painter.rect_stroke(
            indicator,
            0.0,
            egui::Stroke::new(2.0, colors::INDICATOR_STROKE),
            egui::StrokeKind::Inside,
        );
        painter.rect_stroke(
            panel_rect,
            0.0,
            egui::Stroke::new(1.0, egui::Color32::GRAY),
            egui::StrokeKind::Inside,
        );
    }

    fn show_patient_info(&self, ui: &mut egui::Ui) {
        let record = &self.catalog.record;

        egui::Frame::group(ui.style()).show(ui, |ui| {
            egui::Grid::new("patient_info")
                .num_columns(2)
                .spacing([24.0, 6.0])
                .show(ui, |ui| {
                    ui.strong("Patient ID");
                    ui.label(&record.patient_id);
                    ui.end_row();

                    ui.strong("Sample");
                    ui.label(&record.sample_type);
                    ui.end_row();

                    ui.strong("Date");
                    ui.label(&record.date);
                    ui.end_row();

                    if let Some(filename) = &record.filename {
                        ui.strong("File");
                        ui.label(filename);
                        ui.end_row();
                    }
                });
        });
    }

    /// Renders the zoom controls below the viewport.
    pub fn show_zoom_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("zoom_bar").show(ctx, |ui| {
            let zoom = self.engine.state().zoom();
            let config = *self.engine.config();
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(zoom > config.min_zoom, egui::Button::new("Zoom out"))
                    .on_hover_text("Zoom out (-)")
                    .clicked()
                {
                    self.engine.zoom_out_button();
                }
                ui.label(format!("{}%", self.engine.zoom_percent()));
                if ui
                    .add_enabled(zoom < config.max_zoom, egui::Button::new("Zoom in"))
                    .on_hover_text("Zoom in (+)")
                    .clicked()
                {
                    self.engine.zoom_in_button();
                }
                if ui.button("Reset").on_hover_text("Reset view (0)").clicked() {
                    self.engine.reset();
                }

                ui.separator();
                ui.checkbox(&mut self.overlays.detections, "Detections");
                ui.checkbox(&mut self.overlays.labels, "Labels");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!(
                        "{} detections",
                        self.catalog.record.detection_results.len()
                    ));
                });
            });
        });
    }

    /// Renders the central panel containing the zoomable viewport.
    pub fn show_central_panel(&mut self, ctx: &egui::Context) {
        self.show_zoom_bar(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.show_viewport(ui);
            });
    }

    /// Feeds pointer input to the engine and paints the image through its transform.
    fn show_viewport(&mut self, ui: &mut egui::Ui) {
        let (viewport_rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::drag());
        self.panel_sizes.viewport = viewport_rect.size();

        self.handle_pointer_input(ui, viewport_rect, &response);

        ui.set_clip_rect(viewport_rect);
        let painter = ui.painter();
        painter.rect_filled(viewport_rect, 0.0, colors::VIEWPORT_BG);

        let state = self.engine.state();
        let image_rect = local_to_screen(viewport_rect, state.image_bounds_in_view());
        match self.get_texture(self.current_image()) {
            Some(texture) => {
                painter.image(texture.id(), image_rect, full_uv(), egui::Color32::WHITE);
            }
            None => {
                painter.rect_filled(image_rect, 0.0, colors::PLACEHOLDER_FILL);
                painter.rect_stroke(
                    image_rect,
                    0.0,
                    egui::Stroke::new(1.0, colors::PLACEHOLDER_STROKE),
                    egui::StrokeKind::Inside,
                );
            }
        }

        if self.overlays.detections {
            draw_detections(
                ui,
                viewport_rect,
                state,
                &self.catalog.record.detection_results,
                self.overlays,
            );
        }

        if let Some((category, name)) = self.engine.selection() {
            draw_badge(
                ui,
                viewport_rect.left_top() + egui::vec2(16.0, 16.0),
                egui::Align2::LEFT_TOP,
                format!("{}: {name}", category.title()),
            );
        }
        draw_badge(
            ui,
            viewport_rect.center_top() + egui::vec2(0.0, 16.0),
            egui::Align2::CENTER_TOP,
            "WSI Zoomed IN View".to_owned(),
        );
        draw_badge(
            ui,
            viewport_rect.right_bottom() - egui::vec2(16.0, 16.0),
            egui::Align2::RIGHT_BOTTOM,
            "Use mouse wheel to zoom in/out".to_owned(),
        );

        if self.engine.is_dragging() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        } else if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Move);
        }
    }

    /// Translates egui pointer state into engine events, in arrival order.
    fn handle_pointer_input(
        &mut self,
        ui: &egui::Ui,
        viewport_rect: egui::Rect,
        response: &egui::Response,
    ) {
        let (hover_pos, press_origin, scroll_delta) = ui.input(|i| {
            (
                i.pointer.hover_pos(),
                i.pointer.press_origin(),
                i.raw_scroll_delta.y,
            )
        });
        let inside = hover_pos.is_some_and(|p| viewport_rect.contains(p));

        if response.drag_started()
            && let Some(origin) = press_origin
        {
            let p = screen_to_local(viewport_rect, origin);
            self.engine.on_pointer_down(p.x, p.y);
        }

        if self.engine.is_dragging() && !inside {
            self.engine.on_pointer_leave();
        }

        if response.dragged()
            && let Some(pos) = response.interact_pointer_pos()
        {
            let p = screen_to_local(viewport_rect, pos);
            self.engine.on_pointer_move(p.x, p.y);
        }

        if response.drag_stopped() {
            self.engine.on_pointer_up();
        }

        // egui reports scrolling up as a positive delta; wheel deltas are the opposite.
        if scroll_delta != 0.0
            && let Some(pos) = hover_pos.filter(|_| inside)
        {
            let p = screen_to_local(viewport_rect, pos);
            self.engine.on_wheel(-f64::from(scroll_delta), p.x, p.y);
        }
    }
}

/// Draws a small text label on a translucent background.
fn draw_badge(ui: &egui::Ui, anchor: egui::Pos2, align: egui::Align2, text: String) {
    let painter = ui.painter();
    let text_color = egui::Color32::from_gray(40);
    let galley = painter.layout_no_wrap(text, egui::FontId::proportional(14.0), text_color);
    let text_rect = align.anchor_size(anchor, galley.size());

    painter.rect_filled(text_rect.expand(6.0), 4.0, colors::BADGE_FILL);
    painter.galley(text_rect.min, galley, text_color);
}
