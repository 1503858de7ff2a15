use kurbo::{Point, Size};
use log::{debug, trace};

use super::overview::{OverviewRect, OverviewSync, SizeProvider};
use super::pan::PanController;
use super::state::{Transform, ViewportState};
use super::zoom::{ZoomController, ZoomDirection};
use super::{ViewportConfig, ViewportError};
use crate::CellCategory;

/// Everything a renderer reads for one frame, taken after a complete event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSnapshot {
    pub transform: Transform,
    pub overview: OverviewRect,
    pub dragging: bool,
}

/// Pan/zoom state machine behind the viewer's input handlers.
///
/// Each handler runs to completion and re-derives the overview indicator
/// before returning, so readers only ever see fully applied events. Rejected
/// events (nested drag starts, zero wheel deltas, unmeasured panels) are
/// logged and leave the state untouched.
#[derive(Debug, Clone)]
pub struct ViewportEngine {
    state: ViewportState,
    pan: PanController,
    zoom: ZoomController,
    overview: OverviewSync,
    selection: Option<(CellCategory, String)>,
}

impl ViewportEngine {
    /// Creates an engine for an image of `image_size` logical pixels.
    pub fn new(image_size: Size, config: ViewportConfig) -> Self {
        Self {
            state: ViewportState::new(image_size),
            pan: PanController::default(),
            zoom: ZoomController::new(config),
            overview: OverviewSync::new(config.initial_indicator, config.min_indicator_size),
            selection: None,
        }
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn config(&self) -> &ViewportConfig {
        self.zoom.config()
    }

    pub fn transform(&self) -> Transform {
        self.state.transform()
    }

    pub fn overview_rect(&self) -> OverviewRect {
        self.overview.rect()
    }

    pub fn is_dragging(&self) -> bool {
        self.pan.is_dragging()
    }

    pub fn selection(&self) -> Option<(CellCategory, &str)> {
        self.selection
            .as_ref()
            .map(|(category, label)| (*category, label.as_str()))
    }

    /// Zoom as a whole percentage for display.
    pub fn zoom_percent(&self) -> u32 {
        // Zoom is clamped to a small positive range, so the cast cannot overflow.
        (self.state.zoom() * 100.0).round() as u32
    }

    pub fn snapshot(&self) -> ViewportSnapshot {
        ViewportSnapshot {
            transform: self.transform(),
            overview: self.overview_rect(),
            dragging: self.is_dragging(),
        }
    }

    pub fn on_pointer_down(&mut self, x: f64, y: f64) {
        let result = self.pan.begin(Point::new(x, y), &self.state);
        self.settle("pointer down", result);
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        if !self.pan.is_dragging() {
            return;
        }
        let result = self.pan.update(Point::new(x, y), &mut self.state);
        self.settle("pointer move", result);
    }

    pub fn on_pointer_up(&mut self) {
        let result = self.pan.end();
        self.settle("pointer up", result);
    }

    /// Leaving the viewport ends the drag exactly like releasing the pointer.
    pub fn on_pointer_leave(&mut self) {
        if self.pan.is_dragging() {
            self.on_pointer_up();
        }
    }

    pub fn on_wheel(&mut self, delta_y: f64, cursor_x: f64, cursor_y: f64) {
        let result = self
            .zoom
            .wheel(&mut self.state, delta_y, Point::new(cursor_x, cursor_y));
        self.settle("wheel", result);
    }

    pub fn zoom_in_button(&mut self) {
        let result = self.zoom.step(&mut self.state, ZoomDirection::In);
        self.settle("zoom in", result);
    }

    pub fn zoom_out_button(&mut self) {
        let result = self.zoom.step(&mut self.state, ZoomDirection::Out);
        self.settle("zoom out", result);
    }

    /// Switches the displayed cell type and resets the view, aborting any drag.
    ///
    /// The reset happens even when the same cell type is selected again.
    pub fn select_category(&mut self, category: CellCategory, label: impl Into<String>) {
        let label = label.into();
        debug!("Selected {}: {label}, resetting view", category.title());
        self.selection = Some((category, label));
        self.reset();
    }

    /// Zoom 1, offset zero, no drag.
    pub fn reset(&mut self) {
        self.pan.cancel();
        self.state.reset();
        self.settle("reset", Ok(()));
    }

    pub fn measure_containers(&mut self, viewport: Size, overview_panel: Size) {
        if self.overview.measure(viewport, overview_panel) {
            trace!("Measured viewport {viewport:?}, overview panel {overview_panel:?}");
            self.settle("measure", Ok(()));
        }
    }

    pub fn measure_from(&mut self, sizes: &impl SizeProvider) {
        self.measure_containers(sizes.container_size(), sizes.overview_panel_size());
    }

    /// Logs a rejected event, or refreshes the overview after an applied one.
    fn settle(&mut self, event: &str, result: Result<(), ViewportError>) {
        if let Err(err) = result {
            debug!("Ignored {event}: {err}");
            return;
        }

        match self.overview.refresh(&self.state) {
            Ok(rect) => trace!(
                "{event}: offset ({:.2}, {:.2}), zoom {:.3}, overview {rect:?}",
                self.state.offset().x,
                self.state.offset().y,
                self.state.zoom()
            ),
            Err(err) => trace!("{event}: overview kept ({err})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;

    struct FixedSizes {
        container: Size,
        panel: Size,
    }

    impl SizeProvider for FixedSizes {
        fn container_size(&self) -> Size {
            self.container
        }

        fn overview_panel_size(&self) -> Size {
            self.panel
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual} (diff: {diff})");
    }

    fn engine() -> ViewportEngine {
        ViewportEngine::new(Size::new(1024.0, 512.0), ViewportConfig::default())
    }

    #[test]
    fn wheel_scenario() {
        let mut engine = engine();

        engine.on_wheel(-100.0, 500.0, 300.0);

        let transform = engine.transform();
        assert_close(transform.zoom, 1.1);
        assert_close(transform.offset.x, -50.0);
        assert_close(transform.offset.y, -30.0);
        assert_eq!(engine.zoom_percent(), 110);
    }

    #[test]
    fn zoom_out_button_scenario() {
        let mut engine = engine();
        engine.on_pointer_down(0.0, 0.0);
        engine.on_pointer_move(-30.0, 12.0);
        engine.on_pointer_up();

        engine.zoom_out_button();

        assert_close(engine.transform().zoom, 1.0 / 1.2);
        assert_eq!(engine.transform().offset, Vec2::new(-30.0, 12.0));
        assert_eq!(engine.zoom_percent(), 83);
    }

    #[test]
    fn overview_scenario() {
        // A doubling button step reaches zoom 2 without moving the offset.
        let config = ViewportConfig {
            button_factor: 2.0,
            ..Default::default()
        };
        let mut engine = ViewportEngine::new(Size::new(1024.0, 512.0), config);
        engine.measure_containers(Size::new(800.0, 600.0), Size::new(200.0, 100.0));
        engine.zoom_in_button();
        engine.on_pointer_down(0.0, 0.0);
        engine.on_pointer_move(-100.0, -50.0);
        engine.on_pointer_up();
        assert_eq!(engine.transform().zoom, 2.0);
        assert_eq!(engine.transform().offset, Vec2::new(-100.0, -50.0));

        let rect = engine.overview_rect();
        assert_close(rect.x, 9.765625);
        assert_close(rect.y, 4.8828125);
        assert_close(rect.width, 78.125);
        assert_close(rect.height, 58.59375);
    }

    #[test]
    fn zoom_buttons_ignore_negative_factor() {
        let config = ViewportConfig {
            button_factor: -1.0,
            ..Default::default()
        };
        let mut engine = ViewportEngine::new(Size::new(1024.0, 512.0), config);
        assert_eq!(engine.config().button_factor, -1.0);
        engine.on_wheel(-1.0, 0.0, 0.0);
        let before = engine.snapshot();

        engine.zoom_in_button();
        engine.zoom_out_button();

        assert_eq!(engine.snapshot(), before);
        assert_close(engine.transform().zoom, 1.1);
    }

    #[test]
    fn overview_follows_every_mutation() {
        let mut engine = engine();
        engine.measure_from(&FixedSizes {
            container: Size::new(800.0, 600.0),
            panel: Size::new(200.0, 100.0),
        });
        let initial = engine.overview_rect();
        assert_close(initial.width, 156.25);

        engine.on_pointer_down(10.0, 10.0);
        engine.on_pointer_move(-90.0, 10.0);
        assert_close(engine.overview_rect().x, 100.0 * 200.0 / 1024.0);

        engine.on_wheel(-1.0, 0.0, 0.0);
        assert!(engine.overview_rect().width < initial.width);
    }

    #[test]
    fn overview_waits_for_measurement() {
        let mut engine = engine();
        let initial = engine.overview_rect();
        assert_eq!(initial, ViewportConfig::default().initial_indicator);

        engine.on_wheel(-1.0, 100.0, 100.0);
        assert_eq!(engine.overview_rect(), initial);

        engine.measure_containers(Size::new(800.0, 600.0), Size::new(0.0, 140.0));
        assert_eq!(engine.overview_rect(), initial);
    }

    #[test]
    fn select_category_resets_mid_drag() {
        let mut engine = engine();
        engine.on_wheel(-1.0, 320.0, 200.0);
        engine.on_pointer_down(100.0, 100.0);
        engine.on_pointer_move(250.0, 20.0);
        assert!(engine.is_dragging());

        engine.select_category(CellCategory::Wbc, "Monocyte");

        assert_eq!(engine.transform(), Transform::IDENTITY);
        assert!(!engine.is_dragging());
        assert_eq!(engine.selection(), Some((CellCategory::Wbc, "Monocyte")));

        // Late move events from the aborted drag change nothing.
        engine.on_pointer_move(400.0, 400.0);
        assert_eq!(engine.transform(), Transform::IDENTITY);

        // Selecting the same cell type again still resets.
        engine.zoom_in_button();
        engine.select_category(CellCategory::Wbc, "Monocyte");
        assert_eq!(engine.transform(), Transform::IDENTITY);
    }

    #[test]
    fn pointer_leave_ends_drag() {
        let mut engine = engine();
        engine.on_pointer_down(50.0, 50.0);
        engine.on_pointer_move(80.0, 60.0);

        engine.on_pointer_leave();

        assert!(!engine.is_dragging());
        engine.on_pointer_move(500.0, 500.0);
        assert_eq!(engine.transform().offset, Vec2::new(30.0, 10.0));
    }

    #[test]
    fn nested_pointer_down_keeps_session() {
        let mut engine = engine();
        engine.on_pointer_down(50.0, 50.0);
        engine.on_pointer_down(0.0, 0.0);
        engine.on_pointer_move(60.0, 70.0);

        assert_eq!(engine.transform().offset, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn pan_round_trip_through_engine() {
        let mut engine = engine();
        engine.on_wheel(-1.0, 200.0, 100.0);
        let before = engine.transform();

        engine.on_pointer_down(300.0, 300.0);
        engine.on_pointer_move(120.0, 420.0);
        engine.on_pointer_move(300.0, 300.0);
        engine.on_pointer_up();

        assert_close(engine.transform().offset.x, before.offset.x);
        assert_close(engine.transform().offset.y, before.offset.y);
        assert_eq!(engine.transform().zoom, before.zoom);
    }

    #[test]
    fn snapshot_reflects_last_event() {
        let mut engine = engine();
        engine.measure_containers(Size::new(800.0, 600.0), Size::new(200.0, 100.0));
        engine.on_pointer_down(0.0, 0.0);

        let snapshot = engine.snapshot();
        assert!(snapshot.dragging);
        assert_eq!(snapshot.transform, engine.transform());
        assert_eq!(snapshot.overview, engine.overview_rect());
    }
}
