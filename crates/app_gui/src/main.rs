mod app;

use app::UiApp;
use directories_next::ProjectDirs;
use eframe::{NativeOptions, egui};
use genre_core::Settings;
use genre_core::settings::{ENDPOINT_ENV, SETTINGS_FILE};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();

    let settings_path = settings_path();
    let mut settings = match settings_path.as_deref() {
        Some(path) => Settings::load_or_default(path),
        None => {
            tracing::warn!("No configuration directory available; settings will not persist");
            Settings::default()
        }
    };
    settings.apply_endpoint_override(std::env::var(ENDPOINT_ENV).ok().as_deref());

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([720.0, 880.0])
        .with_min_inner_size([480.0, 560.0])
        .with_drag_and_drop(true);
    let options = NativeOptions {
        viewport,
        ..Default::default()
    };
    if let Err(e) = eframe::run_native(
        "Movie Poster Genre Predictor",
        options,
        Box::new(move |_cc| {
            let app = UiApp::new(settings, settings_path)?;
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(Box::new(app))
        }),
    ) {
        eprintln!("Application stopped with error: {e}");
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "PosterGenre", "PosterGenre")
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}
