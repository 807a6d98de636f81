//! Settings panel rendering for theme, prediction endpoint and timeout.

use super::{APP_VERSION, Panel, UiApp};
use eframe::egui;
use genre_core::settings::ENDPOINT_ENV;
use genre_core::{HttpPredictor, Theme};
use std::sync::Arc;

impl UiApp {
    /// Renders the settings screen. Theme changes apply immediately; endpoint
    /// and timeout changes apply when confirmed.
    pub(super) fn render_settings_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Settings");
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label("Theme");
            let mut selected = self.settings.theme;
            egui::ComboBox::from_id_salt("theme-select")
                .selected_text(selected.label())
                .show_ui(ui, |ui| {
                    for theme in Theme::ALL {
                        ui.selectable_value(&mut selected, theme, theme.label());
                    }
                });
            if selected != self.settings.theme {
                self.settings.theme = selected;
                self.status = match self.persist_settings() {
                    Ok(_) => "Theme updated.".to_string(),
                    Err(e) => {
                        tracing::warn!("{e:#}");
                        "Theme updated for this session only.".to_string()
                    }
                };
            }
        });

        ui.add_space(12.0);
        ui.separator();
        ui.add_space(6.0);
        ui.label("Prediction service");
        ui.horizontal(|ui| {
            ui.label("Base URL");
            ui.add(
                egui::TextEdit::singleline(&mut self.endpoint_input)
                    .hint_text(genre_core::settings::DEFAULT_BASE_URL)
                    .desired_width(f32::INFINITY),
            );
        });
        ui.small(format!(
            "Posters are sent to <base URL>{}",
            self.settings.endpoint.path
        ));
        if let Some(base_url) = &self.settings.session_override {
            ui.small(format!(
                "{ENDPOINT_ENV} overrides the base URL with {base_url} until Apply or restart."
            ));
        }
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.checkbox(&mut self.timeout_enabled, "Give up after");
            ui.add_enabled(
                self.timeout_enabled,
                egui::DragValue::new(&mut self.timeout_secs)
                    .range(1..=600)
                    .suffix(" s"),
            );
        });
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("Apply").clicked() {
                self.apply_endpoint_settings();
            }
            if ui.button("Reset to default").clicked() {
                self.endpoint_input = genre_core::settings::DEFAULT_BASE_URL.to_string();
                self.timeout_enabled = false;
            }
        });

        ui.add_space(16.0);
        ui.separator();
        ui.add_space(6.0);
        ui.heading("Versions");
        ui.label(format!("App version: {APP_VERSION}"));
        match self.settings.endpoint_url() {
            Ok(url) => ui.label(format!("Endpoint: {url}")),
            Err(e) => ui.label(format!("Endpoint: {e}")),
        };
    }

    fn apply_endpoint_settings(&mut self) {
        let mut next = self.settings.clone();
        next.endpoint.base_url = self.endpoint_input.trim().to_string();
        next.request_timeout_secs = self.timeout_enabled.then_some(self.timeout_secs);
        next.session_override = None;

        let predictor = match HttpPredictor::from_settings(&next) {
            Ok(predictor) => predictor,
            Err(e) => {
                tracing::warn!("Endpoint settings rejected: {e}");
                self.status = format!("Endpoint not applied: {e}");
                return;
            }
        };
        tracing::info!(endpoint = %predictor.endpoint(), "Prediction endpoint changed");
        self.worker.set_predictor(Arc::new(predictor));
        self.settings = next;
        self.status = match self.persist_settings() {
            Ok(path) => format!("Settings saved to {}", path.display()),
            Err(e) => {
                tracing::warn!("{e:#}");
                "Settings applied for this session only.".to_string()
            }
        };
        self.panel = Panel::Predict;
    }
}
