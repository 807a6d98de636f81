//! Poster intake: drop zone, file picker, preview and the submit control.

use super::{UiApp, theme};
use eframe::egui;
use genre_core::{DragEvent, ImageSource, image_extensions};
use rfd::FileDialog;
use std::path::PathBuf;

const PREVIEW_HEIGHT: f32 = 360.0;

/// Translates egui's per-frame file hover/drop state into drag events.
pub(super) fn drag_event(was_active: bool, hovering: bool, dropped: bool) -> Option<DragEvent> {
    match (dropped, hovering, was_active) {
        (true, _, _) => Some(DragEvent::Drop),
        (false, true, false) => Some(DragEvent::Enter),
        (false, true, true) => Some(DragEvent::Over),
        (false, false, true) => Some(DragEvent::Leave),
        (false, false, false) => None,
    }
}

impl UiApp {
    pub(super) fn handle_file_drag(&mut self, ctx: &egui::Context) {
        let (hovering, dropped, paths) = ctx.input(|i| {
            let paths: Vec<PathBuf> = i
                .raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect();
            (
                !i.raw.hovered_files.is_empty(),
                !i.raw.dropped_files.is_empty(),
                paths,
            )
        });
        match drag_event(self.session.drag_active(), hovering, dropped) {
            Some(DragEvent::Drop) => {
                if paths.is_empty() {
                    tracing::debug!("Drop without a file path ignored");
                }
                if let Some(Err(err)) = self.session.drop_files(paths) {
                    tracing::debug!("Drop refused: {err}");
                }
                self.panel = super::Panel::Predict;
            }
            Some(event) => self.session.on_drag(event),
            None => {}
        }
    }

    fn pick_file(&mut self) {
        let extensions: Vec<&str> = image_extensions().collect();
        let Some(path) = FileDialog::new()
            .add_filter("Images", &extensions)
            .pick_file()
        else {
            return;
        };
        if let Err(err) = self.session.select_path(&path, ImageSource::Picker) {
            tracing::debug!("Pick refused: {err}");
        }
    }

    fn submit(&mut self, ctx: &egui::Context) {
        match self.session.begin_submission() {
            Ok(submission) => {
                let ctx = ctx.clone();
                self.worker.spawn(submission, move || ctx.request_repaint());
            }
            Err(err) => tracing::debug!("Submission not started: {err}"),
        }
    }

    pub(super) fn render_upload_section(&mut self, ui: &mut egui::Ui) {
        let palette = theme::palette(self.settings.theme);
        let stroke_color = if self.session.drag_active() {
            palette.drop_active
        } else {
            palette.drop_idle
        };
        let in_flight = self.session.is_in_flight();
        let mut pick = false;

        egui::Frame::group(ui.style())
            .stroke(egui::Stroke::new(2.0, stroke_color))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.add_space(12.0);
                    match self.session.selected() {
                        None => {
                            ui.label(egui::RichText::new("⬆").size(40.0));
                            ui.label("Drag & drop a movie poster here or");
                            pick = ui.button("Browse Files").clicked();
                        }
                        Some(selected) => {
                            match self.preview.as_ref().and_then(|p| p.texture.as_ref()) {
                                Some(texture) => {
                                    ui.add(
                                        egui::Image::from_texture(
                                            egui::load::SizedTexture::from_handle(texture),
                                        )
                                        .max_height(PREVIEW_HEIGHT)
                                        .corner_radius(6.0),
                                    );
                                }
                                None => {
                                    ui.label(egui::RichText::new("🖼").size(40.0));
                                }
                            }
                            ui.small(selected.file_name());
                            if in_flight {
                                ui.horizontal(|ui| {
                                    ui.spinner();
                                    ui.label("Scanning poster...");
                                });
                            }
                            pick = ui.small_button("Change Image").clicked();
                        }
                    }
                    ui.add_space(12.0);
                });
            });
        if pick {
            self.pick_file();
        }

        if let Some(message) = self.session.error() {
            ui.add_space(8.0);
            ui.colored_label(palette.error, format!("⚠ {message}"));
        }

        ui.add_space(8.0);
        let label = if in_flight {
            "Analyzing..."
        } else {
            "Predict Genre"
        };
        let button = egui::Button::new(egui::RichText::new(label).strong())
            .min_size(egui::vec2(ui.available_width(), 32.0));
        if ui.add_enabled(self.session.can_submit(), button).clicked() {
            let ctx = ui.ctx().clone();
            self.submit(&ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(false, true, false, Some(DragEvent::Enter))]
    #[case(true, true, false, Some(DragEvent::Over))]
    #[case(true, false, false, Some(DragEvent::Leave))]
    #[case(true, false, true, Some(DragEvent::Drop))]
    #[case(false, false, true, Some(DragEvent::Drop))]
    #[case(false, false, false, None)]
    fn frame_state_maps_to_drag_events(
        #[case] was_active: bool,
        #[case] hovering: bool,
        #[case] dropped: bool,
        #[case] expected: Option<DragEvent>,
    ) {
        assert_eq!(drag_event(was_active, hovering, dropped), expected);
    }
}
