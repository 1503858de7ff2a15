//! Catalog embedding and sample data loading.

use rust_embed::RustEmbed;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use thiserror::Error;
use wsi_viewer::{Catalog, SampleRecord};

/// Embeds the bundled catalog from the assets/ directory into the binary.
#[derive(RustEmbed)]
#[folder = "assets/"]
pub struct Assets;

const CATALOG_FILE: &str = "catalog.ron";

/// Errors that can occur when loading the sample catalog.
#[derive(Error, Debug)]
pub enum CatalogLoadError {
    #[error("catalog.ron not found in embedded assets")]
    CatalogNotFound,
    #[error("failed to read catalog '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid UTF-8 in catalog: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("failed to parse catalog: {0}")]
    ParseError(#[from] ron::de::SpannedError),
}

/// Errors that can occur when loading a sample record.
#[derive(Error, Debug)]
pub enum RecordLoadError {
    #[error("failed to read record '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse record '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Errors that can occur when loading and decoding images.
#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error("failed to open image '{path}': {source}")]
    Open {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Decoded image data ready for texture creation.
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// State of an image being loaded asynchronously.
pub enum AssetLoadState {
    /// Image is being decoded in a background thread.
    Loading(mpsc::Receiver<Result<DecodedImage, ImageLoadError>>),
    /// Texture has been created and lives in the texture cache.
    Ready,
    /// Loading failed; stores the error message (already displayed via toast).
    Error(String),
}

/// Loads and decodes an image from disk.
pub fn load_and_decode_image(path: &Path) -> Result<DecodedImage, ImageLoadError> {
    let img = image::open(path).map_err(|source| ImageLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(DecodedImage {
        pixels: rgba.into_raw(),
        width,
        height,
    })
}

/// Loads the catalog from `path`, or the bundled one when no path is given.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogLoadError> {
    let ron_string = match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?,
        None => {
            let file = Assets::get(CATALOG_FILE).ok_or(CatalogLoadError::CatalogNotFound)?;
            std::str::from_utf8(&file.data)?.to_owned()
        }
    };

    let catalog: Catalog = ron::from_str(&ron_string)?;
    log::info!(
        "Loaded catalog: {} tables, {} detections",
        catalog.tables.len(),
        catalog.record.detection_results.len()
    );
    Ok(catalog)
}

/// Loads a JSON sample record (patient data and detection results).
pub fn load_record(path: &Path) -> Result<SampleRecord, RecordLoadError> {
    let json = std::fs::read_to_string(path).map_err(|source| RecordLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| RecordLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
