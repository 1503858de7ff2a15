use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod viewport;

pub use viewport::{
    ConfigError, OverviewRect, SizeProvider, Transform, ViewportConfig, ViewportEngine,
    ViewportError, ViewportSnapshot,
};

/// Top-level group of cell types shown in the sidebar tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellCategory {
    Rbc,
    Wbc,
    Platelets,
}

impl CellCategory {
    /// Categories in sidebar order.
    pub const ALL: [Self; 3] = [Self::Rbc, Self::Wbc, Self::Platelets];

    /// Heading used for the category's table and the viewport badge.
    pub fn title(self) -> &'static str {
        match self {
            Self::Rbc => "RBC",
            Self::Wbc => "WBC",
            Self::Platelets => "Platelets",
        }
    }

    /// Whether clicking a row of this category selects a cell type.
    pub fn is_selectable(self) -> bool {
        !matches!(self, Self::Platelets)
    }
}

/// A single row of a cell count table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellCount {
    /// Cell type name (e.g., "Burr Cells", "Lymphocyte")
    pub name: String,
    pub count: u32,
    /// Share of the category in percent, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    /// Image file shown when this row is selected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CellCount {
    /// Formats the percentage column, e.g. `67%` or `0.12%`.
    pub fn percentage_label(&self) -> Option<String> {
        self.percentage.map(|p| format!("{p}%"))
    }
}

/// All rows of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    pub category: CellCategory,
    pub rows: Vec<CellCount>,
}

/// Errors produced while decoding a detection tuple.
#[derive(Error, Debug, PartialEq)]
pub enum DetectionError {
    #[error("detection '{label}' has non-finite coordinates")]
    NonFinite { label: String },
    #[error("detection '{label}' has inverted corners ({x1}, {y1}) -> ({x2}, {y2})")]
    InvertedCorners {
        label: String,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
}

/// Wire form of a detection: `[x1, y1, x2, y2, label]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDetection(pub f64, pub f64, pub f64, pub f64, pub String);

/// An annotation rectangle in image-space coordinates.
///
/// Detection boxes live in the same coordinate space as the full-resolution
/// image, so a renderer maps them through the viewport transform exactly like
/// the image itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDetection", into = "RawDetection")]
pub struct DetectionBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
}

impl DetectionBox {
    /// The box as an image-space rectangle.
    pub fn rect(&self) -> kurbo::Rect {
        kurbo::Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

impl TryFrom<RawDetection> for DetectionBox {
    type Error = DetectionError;

    fn try_from(raw: RawDetection) -> Result<Self, Self::Error> {
        let RawDetection(x1, y1, x2, y2, label) = raw;

        if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            return Err(DetectionError::NonFinite { label });
        }
        if x2 < x1 || y2 < y1 {
            return Err(DetectionError::InvertedCorners {
                label,
                x1,
                y1,
                x2,
                y2,
            });
        }

        Ok(Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
            label,
        })
    }
}

impl From<DetectionBox> for RawDetection {
    fn from(detection: DetectionBox) -> Self {
        Self(
            detection.x,
            detection.y,
            detection.x + detection.width,
            detection.y + detection.height,
            detection.label,
        )
    }
}

/// Per-sample metadata and detection results supplied by the data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub id: u32,
    pub patient_id: String,
    pub sample_type: String,
    /// Acquisition date as reported by the provider (e.g., "2024-12-09")
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default)]
    pub detection_results: Vec<DetectionBox>,
}

/// Everything the viewer needs to display one sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Logical size of the full-resolution image [width, height]
    pub image_size: [f64; 2],
    /// Image shown when the selected row has none of its own
    pub default_image: String,
    #[serde(default)]
    pub viewport: ViewportConfig,
    pub tables: Vec<CategoryTable>,
    pub record: SampleRecord,
}

impl Catalog {
    pub fn image_size(&self) -> kurbo::Size {
        kurbo::Size::new(self.image_size[0], self.image_size[1])
    }

    pub fn table(&self, category: CellCategory) -> Option<&CategoryTable> {
        self.tables.iter().find(|t| t.category == category)
    }

    fn row(&self, category: CellCategory, name: &str) -> Option<&CellCount> {
        self.table(category)?.rows.iter().find(|r| r.name == name)
    }

    /// Whether `name` is a row of a selectable category.
    pub fn is_selectable(&self, category: CellCategory, name: &str) -> bool {
        category.is_selectable() && self.row(category, name).is_some()
    }

    /// Image for the selected row, falling back to the default image.
    pub fn image_for(&self, category: CellCategory, name: &str) -> &str {
        self.row(category, name)
            .and_then(|r| r.image.as_deref())
            .unwrap_or(&self.default_image)
    }

    /// First row of the first selectable table.
    pub fn initial_selection(&self) -> Option<(CellCategory, String)> {
        self.tables
            .iter()
            .filter(|t| t.category.is_selectable())
            .find_map(|t| t.rows.first().map(|r| (t.category, r.name.clone())))
    }

    /// All distinct images referenced by the catalog.
    pub fn image_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = std::iter::once(self.default_image.as_str())
            .chain(
                self.tables
                    .iter()
                    .flat_map(|t| t.rows.iter())
                    .filter_map(|r| r.image.as_deref()),
            )
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}
