/// Width of the cell count sidebar in pixels.
pub const SIDEBAR_WIDTH: f32 = 300.0;

/// Width of the overview sidebar in pixels.
pub const OVERVIEW_SIDEBAR_WIDTH: f32 = 300.0;

/// Height of the overview panel in pixels.
pub const OVERVIEW_PANEL_HEIGHT: f32 = 140.0;

/// Height of a table row in the cell count tables.
pub const TABLE_ROW_HEIGHT: f32 = 22.0;

/// Zoom level at which detection labels become readable.
pub const LABEL_MIN_ZOOM: f64 = 2.0;
