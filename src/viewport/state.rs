use kurbo::{Affine, Point, Rect, Size, Vec2};

/// The pan/zoom pair a renderer applies to the image.
///
/// Applied as translate-then-scale with a top-left origin: an image point `p`
/// lands at `offset + p * zoom` in viewport-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub offset: Vec2,
    pub zoom: f64,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        offset: Vec2::ZERO,
        zoom: 1.0,
    };

    pub fn to_affine(self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }
}

/// Current pan offset and zoom factor over an image of fixed size.
///
/// The offset is unbounded; the image may be panned fully out of view. The
/// zoom is kept inside the configured range by the zoom controller, which is
/// the only writer besides [`ViewportState::reset`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    offset: Vec2,
    zoom: f64,
    image_size: Size,
}

impl ViewportState {
    pub fn new(image_size: Size) -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            image_size,
        }
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn image_size(&self) -> Size {
        self.image_size
    }

    pub fn transform(&self) -> Transform {
        Transform {
            offset: self.offset,
            zoom: self.zoom,
        }
    }

    /// Back to zoom 1 with the image origin at the viewport origin.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }

    pub(crate) fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// Replaces offset and zoom together.
    pub(crate) fn apply(&mut self, offset: Vec2, zoom: f64) {
        self.offset = offset;
        self.zoom = zoom;
    }

    /// Maps a viewport-local point to image space.
    pub fn view_to_image(&self, point: Point) -> Point {
        ((point.to_vec2() - self.offset) / self.zoom).to_point()
    }

    /// Maps an image-space point to viewport-local pixels.
    pub fn image_to_view(&self, point: Point) -> Point {
        (point.to_vec2() * self.zoom + self.offset).to_point()
    }

    /// Maps an image-space rectangle (such as a detection box) to viewport-local pixels.
    pub fn image_rect_to_view(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.image_to_view(Point::new(rect.x0, rect.y0)),
            self.image_to_view(Point::new(rect.x1, rect.y1)),
        )
    }

    /// The whole image in viewport-local pixels.
    pub fn image_bounds_in_view(&self) -> Rect {
        self.image_rect_to_view(self.image_size.to_rect())
    }
}
