use kurbo::Point;

use super::ViewportError;
use super::state::ViewportState;

/// One pan gesture, from pointer-down to pointer-up or pointer-leave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Pointer position minus offset at drag start
    anchor: Point,
}

impl DragSession {
    pub fn anchor(&self) -> Point {
        self.anchor
    }
}

/// Turns a pointer drag into absolute offset updates.
///
/// `Idle -> Dragging -> Idle`. Every move recomputes the offset from the
/// anchor captured at drag start, so dropped or reordered move events never
/// let the offset drift away from the pointer.
#[derive(Debug, Clone, Default)]
pub struct PanController {
    session: Option<DragSession>,
}

fn check_finite(pointer: Point) -> Result<(), ViewportError> {
    if pointer.x.is_finite() && pointer.y.is_finite() {
        Ok(())
    } else {
        Err(ViewportError::NonFinitePointer {
            x: pointer.x,
            y: pointer.y,
        })
    }
}

impl PanController {
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<DragSession> {
        self.session
    }

    /// Starts a drag at `pointer`. A second begin while dragging is ignored and
    /// the running session continues.
    pub fn begin(&mut self, pointer: Point, state: &ViewportState) -> Result<(), ViewportError> {
        if self.session.is_some() {
            return Err(ViewportError::InvalidDragStart);
        }
        check_finite(pointer)?;

        self.session = Some(DragSession {
            anchor: pointer - state.offset(),
        });
        Ok(())
    }

    /// Moves the image so the anchor stays under `pointer`.
    pub fn update(&self, pointer: Point, state: &mut ViewportState) -> Result<(), ViewportError> {
        let session = self.session.ok_or(ViewportError::NotDragging)?;
        check_finite(pointer)?;

        state.set_offset(pointer - session.anchor);
        Ok(())
    }

    /// Ends the drag; the offset keeps its last value.
    pub fn end(&mut self) -> Result<(), ViewportError> {
        self.session
            .take()
            .map(|_| ())
            .ok_or(ViewportError::NotDragging)
    }

    /// Drops any running session without reporting.
    pub fn cancel(&mut self) {
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Size, Vec2};

    fn state_at(offset: Vec2) -> ViewportState {
        let mut state = ViewportState::new(Size::new(1024.0, 512.0));
        state.set_offset(offset);
        state
    }

    #[test]
    fn begin_captures_anchor() {
        let state = state_at(Vec2::new(20.0, 10.0));
        let mut pan = PanController::default();

        pan.begin(Point::new(100.0, 50.0), &state).unwrap();

        assert!(pan.is_dragging());
        assert_eq!(pan.session().unwrap().anchor(), Point::new(80.0, 40.0));
    }

    #[test]
    fn update_is_absolute() {
        let mut state = state_at(Vec2::new(20.0, 10.0));
        let mut pan = PanController::default();
        pan.begin(Point::new(100.0, 50.0), &state).unwrap();

        pan.update(Point::new(130.0, 45.0), &mut state).unwrap();
        assert_eq!(state.offset(), Vec2::new(50.0, 5.0));

        // Skipping intermediate moves lands on the same offset.
        pan.update(Point::new(160.0, 90.0), &mut state).unwrap();
        pan.update(Point::new(130.0, 45.0), &mut state).unwrap();
        assert_eq!(state.offset(), Vec2::new(50.0, 5.0));
    }

    #[test]
    fn drag_round_trip_restores_offset() {
        let mut state = state_at(Vec2::new(-37.5, 12.25));
        let before = state.offset();
        let mut pan = PanController::default();

        pan.begin(Point::new(200.0, 150.0), &state).unwrap();
        pan.update(Point::new(260.0, 90.0), &mut state).unwrap();
        pan.update(Point::new(200.0, 150.0), &mut state).unwrap();

        assert_eq!(state.offset(), before);
    }

    #[test]
    fn nested_begin_is_rejected() {
        let mut state = state_at(Vec2::ZERO);
        let mut pan = PanController::default();
        pan.begin(Point::new(10.0, 10.0), &state).unwrap();

        assert_eq!(
            pan.begin(Point::new(500.0, 500.0), &state),
            Err(ViewportError::InvalidDragStart)
        );

        // The original anchor is still in effect.
        pan.update(Point::new(20.0, 30.0), &mut state).unwrap();
        assert_eq!(state.offset(), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn update_and_end_require_drag() {
        let mut state = state_at(Vec2::new(5.0, 5.0));
        let mut pan = PanController::default();

        assert_eq!(
            pan.update(Point::new(10.0, 10.0), &mut state),
            Err(ViewportError::NotDragging)
        );
        assert_eq!(pan.end(), Err(ViewportError::NotDragging));
        assert_eq!(state.offset(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn end_keeps_offset() {
        let mut state = state_at(Vec2::ZERO);
        let mut pan = PanController::default();
        pan.begin(Point::new(0.0, 0.0), &state).unwrap();
        pan.update(Point::new(-40.0, 25.0), &mut state).unwrap();

        pan.end().unwrap();

        assert!(!pan.is_dragging());
        assert_eq!(state.offset(), Vec2::new(-40.0, 25.0));
    }

    #[test]
    fn non_finite_pointer_is_ignored() {
        let mut state = state_at(Vec2::ZERO);
        let mut pan = PanController::default();

        assert!(matches!(
            pan.begin(Point::new(f64::NAN, 0.0), &state),
            Err(ViewportError::NonFinitePointer { .. })
        ));
        assert!(!pan.is_dragging());

        pan.begin(Point::new(0.0, 0.0), &state).unwrap();
        assert!(pan.update(Point::new(f64::INFINITY, 3.0), &mut state).is_err());
        assert_eq!(state.offset(), Vec2::ZERO);
    }
}
