//! Main window: owns the upload session, the prediction worker and the
//! preview texture, and routes each frame to the active panel.

mod results;
mod settings;
mod theme;
mod upload;

use anyhow::{Context, Result};
use eframe::{App, Frame, egui};
use genre_core::{HttpPredictor, PredictionWorker, PreviewKey, Settings, Theme, UploadSession};
use std::path::PathBuf;
use std::sync::Arc;

const PREVIEW_MAX_SIDE: u32 = 640;
const APP_VERSION: &str = env!("POSTER_GENRE_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Panel {
    Predict,
    Settings,
}

/// Texture for the staged poster. Replacing it drops the old texture.
struct Preview {
    key: PreviewKey,
    texture: Option<egui::TextureHandle>,
}

pub struct UiApp {
    session: UploadSession,
    worker: PredictionWorker,
    settings: Settings,
    settings_path: Option<PathBuf>,
    preview: Option<Preview>,
    panel: Panel,
    status: String,
    applied_theme: Option<Theme>,
    // Settings form state, applied on demand.
    endpoint_input: String,
    timeout_enabled: bool,
    timeout_secs: u64,
}

impl UiApp {
    pub fn new(settings: Settings, settings_path: Option<PathBuf>) -> Result<Self> {
        let predictor = HttpPredictor::from_settings_or_default(&settings)
            .context("cannot build prediction client")?;
        tracing::info!(endpoint = %predictor.endpoint(), "Prediction client ready");

        Ok(Self {
            session: UploadSession::new(),
            worker: PredictionWorker::new(Arc::new(predictor)),
            endpoint_input: settings.endpoint.base_url.clone(),
            timeout_enabled: settings.request_timeout_secs.is_some(),
            timeout_secs: settings.request_timeout_secs.unwrap_or(60),
            settings,
            settings_path,
            preview: None,
            panel: Panel::Predict,
            status: String::new(),
            applied_theme: None,
        })
    }

    fn poll_worker(&mut self) {
        for completion in self.worker.drain() {
            self.session.complete(completion);
        }
    }

    /// Keeps the preview texture in step with the staged poster.
    fn sync_preview(&mut self, ctx: &egui::Context) {
        let Some(selected) = self.session.selected() else {
            self.preview = None;
            return;
        };
        let key = selected.preview_key();
        if self.preview.as_ref().is_some_and(|p| p.key == key) {
            return;
        }
        let texture = match selected.decode_preview(PREVIEW_MAX_SIDE) {
            Ok(rgba) => {
                let (w, h) = rgba.dimensions();
                let size = [w as usize, h as usize];
                let pixels = rgba.into_raw();
                let color = egui::ColorImage::from_rgba_unmultiplied(size, &pixels);
                let name = format!("preview:{}", key.as_u64());
                Some(ctx.load_texture(name, color, egui::TextureOptions::LINEAR))
            }
            Err(e) => {
                tracing::warn!("Failed to build preview: {e:#}");
                None
            }
        };
        self.preview = Some(Preview { key, texture });
    }

    fn apply_theme(&mut self, ctx: &egui::Context) {
        if self.applied_theme != Some(self.settings.theme) {
            theme::apply(ctx, self.settings.theme);
            self.applied_theme = Some(self.settings.theme);
        }
    }

    fn persist_settings(&self) -> Result<PathBuf> {
        let path = self
            .settings_path
            .clone()
            .context("no configuration directory available")?;
        self.settings
            .save(&path)
            .with_context(|| format!("cannot save settings to {}", path.display()))?;
        Ok(path)
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("🎬 Movie Poster Genre Predictor");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.selectable_value(&mut self.panel, Panel::Settings, "Settings");
                ui.selectable_value(&mut self.panel, Panel::Predict, "Predict");
            });
        });
        ui.label("Upload a movie poster and the model will predict its genre");
        if !self.status.is_empty() {
            ui.small(&self.status);
        }
    }
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.apply_theme(ctx);
        self.poll_worker();
        self.handle_file_drag(ctx);
        self.sync_preview(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.add_space(6.0);
            self.render_header(ui);
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small("Genre inference runs on a remote service");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.small(format!("v{APP_VERSION}"));
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| match self.panel {
                    Panel::Predict => {
                        self.render_upload_section(ui);
                        ui.add_space(12.0);
                        self.render_results(ui);
                    }
                    Panel::Settings => self.render_settings_panel(ui),
                });
        });
    }
}
