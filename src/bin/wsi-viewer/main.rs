#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod assets;
mod colors;
mod constants;
mod coordinates;
mod overlays;
mod ui;

use assets::{AssetLoadState, load_and_decode_image, load_catalog, load_record};
use clap::Parser;
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use overlays::OverlayVisibility;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use wsi_viewer::viewport::SizeProvider;
use wsi_viewer::{Catalog, CellCategory, ViewportConfig, ViewportEngine};

/// Key under which the last selected cell type is persisted.
const SELECTION_KEY: &str = "selection";

/// Whole-slide image viewer with a synchronized overview map.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// RON catalog to use instead of the bundled sample
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// JSON sample record with detection results
    #[arg(long)]
    record: Option<PathBuf>,

    /// Directory containing the images named in the catalog
    #[arg(long)]
    image_dir: Option<PathBuf>,

    /// Minimum zoom factor
    #[arg(long)]
    min_zoom: Option<f64>,

    /// Maximum zoom factor
    #[arg(long)]
    max_zoom: Option<f64>,
}

/// Last measured panel sizes, fed to the engine once per frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanelSizes {
    pub viewport: egui::Vec2,
    pub overview: egui::Vec2,
}

impl SizeProvider for PanelSizes {
    fn container_size(&self) -> kurbo::Size {
        coordinates::to_size(self.viewport)
    }

    fn overview_panel_size(&self) -> kurbo::Size {
        coordinates::to_size(self.overview)
    }
}

/// Main application state for the WSI viewer.
pub struct WsiViewerApp {
    catalog: Catalog,
    engine: ViewportEngine,
    panel_sizes: PanelSizes,
    overlays: OverlayVisibility,
    asset_cache: HashMap<String, AssetLoadState>,
    texture_cache: HashMap<String, TextureHandle>,
    toasts: Toasts,
}

impl WsiViewerApp {
    fn new(cc: &eframe::CreationContext<'_>, cli: Cli) -> Self {
        let mut toasts = Toasts::new()
            .anchor(egui::Align2::RIGHT_TOP, (-10.0, 10.0))
            .direction(egui::Direction::TopDown);

        let mut catalog = match load_catalog(cli.catalog.as_deref()) {
            Ok(catalog) => catalog,
            Err(err) => {
                log::error!("{err}");
                add_error_toast(&mut toasts, err.to_string());
                load_catalog(None).expect("Failed to parse bundled catalog")
            }
        };

        if let Some(path) = cli.record.as_deref() {
            match load_record(path) {
                Ok(record) => {
                    log::info!(
                        "Loaded {} detections for patient {}",
                        record.detection_results.len(),
                        record.patient_id
                    );
                    catalog.record = record;
                }
                Err(err) => {
                    log::error!("{err}");
                    add_error_toast(&mut toasts, err.to_string());
                }
            }
        }

        let config = viewport_config(&catalog, &cli, &mut toasts);
        let mut engine = ViewportEngine::new(catalog.image_size(), config);

        let persisted: Option<(CellCategory, String)> =
            cc.storage.and_then(|s| eframe::get_value(s, SELECTION_KEY));
        let selection = persisted
            .filter(|(category, name)| catalog.is_selectable(*category, name))
            .or_else(|| catalog.initial_selection());
        if let Some((category, name)) = selection {
            engine.select_category(category, name);
        }

        // Preload all sample images in background threads
        let mut asset_cache = HashMap::new();
        if let Some(dir) = cli.image_dir {
            for name in catalog.image_names() {
                let (tx, rx) = mpsc::channel();
                let ctx = cc.egui_ctx.clone();
                let path = dir.join(name);

                thread::spawn(move || {
                    let result = load_and_decode_image(&path);
                    let _ = tx.send(result);
                    ctx.request_repaint();
                });

                asset_cache.insert(name.to_string(), AssetLoadState::Loading(rx));
            }
        } else {
            log::info!("No --image-dir given, showing placeholders");
        }

        Self {
            catalog,
            engine,
            panel_sizes: PanelSizes::default(),
            overlays: OverlayVisibility::default(),
            asset_cache,
            texture_cache: HashMap::new(),
            toasts,
        }
    }

    /// Image for the current selection.
    fn current_image(&self) -> &str {
        match self.engine.selection() {
            Some((category, name)) => self.catalog.image_for(category, name),
            None => &self.catalog.default_image,
        }
    }

    /// Polls all loading assets and creates textures for ready ones.
    fn poll_all_assets(&mut self, ctx: &egui::Context) {
        let mut errors: Vec<String> = Vec::new();

        for (name, state) in &mut self.asset_cache {
            let AssetLoadState::Loading(rx) = state else {
                continue;
            };
            let next = match rx.try_recv() {
                Ok(Ok(decoded)) => {
                    let image = ColorImage::from_rgba_unmultiplied(
                        [decoded.width as usize, decoded.height as usize],
                        &decoded.pixels,
                    );
                    let texture = ctx.load_texture(name, image, TextureOptions::LINEAR);
                    self.texture_cache.insert(name.clone(), texture);
                    log::info!("Loaded image {name} ({}x{})", decoded.width, decoded.height);
                    AssetLoadState::Ready
                }
                Ok(Err(err)) => {
                    let msg = err.to_string();
                    errors.push(msg.clone());
                    AssetLoadState::Error(msg)
                }
                Err(mpsc::TryRecvError::Disconnected) => {
                    let msg = format!("{name}: channel disconnected");
                    errors.push(msg.clone());
                    AssetLoadState::Error(msg)
                }
                Err(mpsc::TryRecvError::Empty) => continue,
            };
            *state = next;
        }

        // Show toasts for any errors that occurred
        for err in errors {
            log::warn!("{err}");
            add_error_toast(&mut self.toasts, err);
        }
    }

    fn get_texture(&self, name: &str) -> Option<&TextureHandle> {
        self.texture_cache.get(name)
    }
}

impl eframe::App for WsiViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_all_assets(ctx);
        self.handle_keyboard_input(ctx);

        self.show_sidebar(ctx);
        self.show_overview_panel(ctx);
        self.show_central_panel(ctx);

        self.engine.measure_from(&self.panel_sizes);

        // Show toasts
        self.toasts.show(ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Some((category, name)) = self.engine.selection() {
            eframe::set_value(storage, SELECTION_KEY, &(category, name.to_string()));
        }
    }
}

fn add_error_toast(toasts: &mut Toasts, text: String) {
    toasts.add(Toast {
        kind: ToastKind::Error,
        text: text.into(),
        options: ToastOptions::default()
            .duration_in_seconds(8.0)
            .show_icon(true),
        ..Default::default()
    });
}

/// Catalog viewport settings with command-line overrides, falling back to defaults if invalid.
fn viewport_config(catalog: &Catalog, cli: &Cli, toasts: &mut Toasts) -> ViewportConfig {
    let mut config = catalog.viewport;
    if let Some(min_zoom) = cli.min_zoom {
        config.min_zoom = min_zoom;
    }
    if let Some(max_zoom) = cli.max_zoom {
        config.max_zoom = max_zoom;
    }

    config.validate().unwrap_or_else(|err| {
        let msg = format!("Invalid viewport settings: {err}");
        log::error!("{msg}");
        add_error_toast(toasts, msg);
        ViewportConfig::default()
    })
}

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1440.0, 810.0])
            .with_min_inner_size([960.0, 600.0])
            .with_title("WSI Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "WSI Viewer",
        options,
        Box::new(|cc| Ok(Box::new(WsiViewerApp::new(cc, cli)))),
    )
}
