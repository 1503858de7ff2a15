use kurbo::Point;

use super::ViewportError;
use super::state::ViewportState;
use super::ViewportConfig;

/// Which way a zoom intent goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Wheel convention: negative delta (scrolling up) zooms in.
    ///
    /// A zero or non-finite delta carries no direction, so it is ignored rather
    /// than treated as a zoom out.
    pub fn from_wheel_delta(delta_y: f64) -> Option<Self> {
        if delta_y < 0.0 {
            Some(Self::In)
        } else if delta_y > 0.0 {
            Some(Self::Out)
        } else {
            None
        }
    }
}

/// Converts wheel and button intents into zoom changes.
///
/// Wheel zoom is anchored on the cursor: the image point under the cursor
/// stays under it. Button zoom has no cursor and only rescales, leaving the
/// offset alone, so repeated button presses drift the content towards or away
/// from the viewport origin.
#[derive(Debug, Clone)]
pub struct ZoomController {
    config: ViewportConfig,
}

impl ZoomController {
    pub fn new(config: ViewportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Cursor-anchored zoom for a wheel event at viewport-local `cursor`.
    pub fn wheel(
        &self,
        state: &mut ViewportState,
        delta_y: f64,
        cursor: Point,
    ) -> Result<(), ViewportError> {
        let direction = ZoomDirection::from_wheel_delta(delta_y)
            .ok_or(ViewportError::InvalidZoomFactor(delta_y))?;
        let factor = match direction {
            ZoomDirection::In => self.config.wheel_factor,
            ZoomDirection::Out => self.config.wheel_factor.recip(),
        };
        self.zoom_about(state, factor, cursor)
    }

    /// Zoom button press: rescale only, offset unchanged.
    pub fn step(
        &self,
        state: &mut ViewportState,
        direction: ZoomDirection,
    ) -> Result<(), ViewportError> {
        let factor = self.config.button_factor;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ViewportError::InvalidZoomFactor(factor));
        }

        let new_zoom = match direction {
            ZoomDirection::In => state.zoom() * factor,
            ZoomDirection::Out => state.zoom() / factor,
        };
        state.apply(state.offset(), self.config.clamp_zoom(new_zoom));
        Ok(())
    }

    /// Multiplies the zoom by `factor`, keeping the image point under `anchor` fixed.
    pub fn zoom_about(
        &self,
        state: &mut ViewportState,
        factor: f64,
        anchor: Point,
    ) -> Result<(), ViewportError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ViewportError::InvalidZoomFactor(factor));
        }
        if !anchor.x.is_finite() || !anchor.y.is_finite() {
            return Err(ViewportError::NonFinitePointer {
                x: anchor.x,
                y: anchor.y,
            });
        }

        let new_zoom = self.config.clamp_zoom(state.zoom() * factor);
        let anchor_image = state.view_to_image(anchor);
        let new_offset = anchor.to_vec2() - anchor_image.to_vec2() * new_zoom;

        state.apply(new_offset, new_zoom);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Size, Vec2};

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual} (diff: {diff})");
    }

    fn fresh_state() -> ViewportState {
        ViewportState::new(Size::new(1024.0, 512.0))
    }

    fn controller() -> ZoomController {
        ZoomController::new(ViewportConfig::default())
    }

    #[test]
    fn wheel_up_zooms_in_around_cursor() {
        let mut state = fresh_state();

        controller()
            .wheel(&mut state, -100.0, Point::new(500.0, 300.0))
            .unwrap();

        assert_close(state.zoom(), 1.1);
        assert_close(state.offset().x, -50.0);
        assert_close(state.offset().y, -30.0);
    }

    #[test]
    fn wheel_keeps_point_under_cursor() {
        let zoom = controller();
        let mut state = fresh_state();
        state.apply(Vec2::new(-137.0, 42.5), 1.7);

        for (delta, cursor) in [
            (-120.0, Point::new(512.0, 256.0)),
            (53.0, Point::new(13.0, 601.0)),
            (-1.0, Point::new(-20.0, 80.0)),
            (400.0, Point::new(799.0, 0.0)),
        ] {
            let before = state.view_to_image(cursor);
            zoom.wheel(&mut state, delta, cursor).unwrap();
            let after = state.view_to_image(cursor);
            assert!(
                (before - after).hypot() < 1e-9,
                "anchor moved from {before:?} to {after:?}"
            );
        }
    }

    #[test]
    fn wheel_at_limit_clamps_and_keeps_anchor() {
        let zoom = controller();
        let mut state = fresh_state();
        state.apply(Vec2::new(10.0, 20.0), 4.9);
        let cursor = Point::new(300.0, 200.0);
        let before = state.view_to_image(cursor);

        zoom.wheel(&mut state, -1.0, cursor).unwrap();
        assert_eq!(state.zoom(), 5.0);
        zoom.wheel(&mut state, -1.0, cursor).unwrap();
        assert_eq!(state.zoom(), 5.0);

        let after = state.view_to_image(cursor);
        assert_close(after.x, before.x);
        assert_close(after.y, before.y);
    }

    #[test]
    fn zero_or_nan_delta_is_ignored() {
        let zoom = controller();
        let mut state = fresh_state();
        state.apply(Vec2::new(3.0, 4.0), 2.0);
        let before = state.clone();

        assert_eq!(
            zoom.wheel(&mut state, 0.0, Point::new(1.0, 1.0)),
            Err(ViewportError::InvalidZoomFactor(0.0))
        );
        assert!(zoom.wheel(&mut state, f64::NAN, Point::new(1.0, 1.0)).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn invalid_factors_are_ignored() {
        let zoom = controller();
        let mut state = fresh_state();
        let before = state.clone();

        for factor in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            assert!(zoom.zoom_about(&mut state, factor, Point::ZERO).is_err());
        }
        assert_eq!(state, before);
    }

    #[test]
    fn button_zoom_leaves_offset() {
        let zoom = controller();
        let mut state = fresh_state();
        state.apply(Vec2::new(-64.0, 12.0), 1.0);

        zoom.step(&mut state, ZoomDirection::Out).unwrap();

        assert_close(state.zoom(), 1.0 / 1.2);
        assert_eq!(state.offset(), Vec2::new(-64.0, 12.0));

        zoom.step(&mut state, ZoomDirection::In).unwrap();
        zoom.step(&mut state, ZoomDirection::In).unwrap();
        assert_close(state.zoom(), 1.2);
        assert_eq!(state.offset(), Vec2::new(-64.0, 12.0));
    }

    #[test]
    fn button_zoom_rejects_bad_factor() {
        let mut state = fresh_state();
        state.apply(Vec2::new(-50.0, -30.0), 1.1);
        let before = state.clone();

        for button_factor in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
            let zoom = ZoomController::new(ViewportConfig {
                button_factor,
                ..Default::default()
            });
            assert!(zoom.step(&mut state, ZoomDirection::In).is_err());
            assert!(zoom.step(&mut state, ZoomDirection::Out).is_err());
        }
        assert_eq!(state, before);
    }

    #[test]
    fn zoom_stays_in_range_for_any_sequence() {
        let zoom = controller();
        let mut state = fresh_state();
        let config = ViewportConfig::default();

        for i in 0..200 {
            match i % 7 {
                0 | 1 | 2 => zoom
                    .wheel(&mut state, -3.0, Point::new(i as f64, 7.0))
                    .unwrap(),
                3 => zoom.step(&mut state, ZoomDirection::In).unwrap(),
                4 => zoom.step(&mut state, ZoomDirection::Out).unwrap(),
                _ => zoom
                    .wheel(&mut state, 9.0, Point::new(50.0, i as f64))
                    .unwrap(),
            }
            assert!(
                (config.min_zoom..=config.max_zoom).contains(&state.zoom()),
                "zoom {} escaped range at step {i}",
                state.zoom()
            );
        }

        for _ in 0..100 {
            zoom.step(&mut state, ZoomDirection::Out).unwrap();
        }
        assert_eq!(state.zoom(), config.min_zoom);
    }

    #[test]
    fn wheel_direction_convention() {
        assert_eq!(ZoomDirection::from_wheel_delta(-1.0), Some(ZoomDirection::In));
        assert_eq!(ZoomDirection::from_wheel_delta(250.0), Some(ZoomDirection::Out));
        assert_eq!(ZoomDirection::from_wheel_delta(0.0), None);
        assert_eq!(ZoomDirection::from_wheel_delta(f64::NAN), None);
    }
}
