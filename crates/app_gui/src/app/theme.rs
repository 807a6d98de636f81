use eframe::egui::{self, Color32};
use genre_core::Theme;

/// Colours used by the upload and result panels.
#[derive(Debug, Clone, Copy)]
pub(super) struct Palette {
    pub accent: Color32,
    pub track: Color32,
    pub error: Color32,
    pub drop_idle: Color32,
    pub drop_active: Color32,
}

pub(super) fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            accent: Color32::from_rgb(229, 9, 20),
            track: Color32::from_gray(48),
            error: Color32::from_rgb(255, 107, 107),
            drop_idle: Color32::from_gray(80),
            drop_active: Color32::from_rgb(229, 9, 20),
        },
        Theme::Light => Palette {
            accent: Color32::from_rgb(37, 99, 235),
            track: Color32::from_gray(220),
            error: Color32::from_rgb(185, 28, 28),
            drop_idle: Color32::from_gray(170),
            drop_active: Color32::from_rgb(37, 99, 235),
        },
    }
}

pub(super) fn apply(ctx: &egui::Context, theme: Theme) {
    let visuals = match theme {
        Theme::Dark => egui::Visuals::dark(),
        Theme::Light => egui::Visuals::light(),
    };
    ctx.set_visuals(visuals);
}
