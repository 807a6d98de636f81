use super::theme::Palette;
use super::{UiApp, theme};
use eframe::egui;
use genre_core::{GenreBar, ResultView};

const LABEL_WIDTH: f32 = 110.0;
const PERCENT_WIDTH: f32 = 56.0;

impl UiApp {
    pub(super) fn render_results(&self, ui: &mut egui::Ui) {
        let Some(result) = self.session.result() else {
            return;
        };
        let view = ResultView::from_result(result);
        let palette = theme::palette(self.settings.theme);

        ui.heading("Predicted Genres");
        if let Some(message) = &view.message {
            ui.small(message);
        }
        ui.add_space(6.0);
        for (rank, bar) in view.top.iter().enumerate() {
            ui.label(egui::RichText::new(format!("#{}", rank + 1)).weak());
            bar_row(ui, bar, &palette, 22.0);
            ui.add_space(4.0);
        }

        if let Some(distribution) = &view.distribution {
            ui.add_space(10.0);
            egui::CollapsingHeader::new("All Genre Probabilities")
                .default_open(true)
                .show(ui, |ui| {
                    for bar in distribution {
                        bar_row(ui, bar, &palette, 12.0);
                    }
                });
        }
    }
}

fn bar_row(ui: &mut egui::Ui, bar: &GenreBar, palette: &Palette, height: f32) {
    ui.horizontal(|ui| {
        ui.add_sized(
            [LABEL_WIDTH, height],
            egui::Label::new(bar.label.as_str()).truncate(),
        );
        let width = (ui.available_width() - PERCENT_WIDTH).max(40.0);
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover());
        let painter = ui.painter();
        painter.rect_filled(rect, 4.0, palette.track);
        let mut filled = rect;
        filled.set_width(rect.width() * bar.fill);
        if filled.width() > 0.0 {
            painter.rect_filled(filled, 4.0, palette.accent);
        }
        ui.label(egui::RichText::new(bar.percent.as_str()).monospace());
    });
}
