mod app;
mod display;
mod marker;
mod panel;
mod ui;

use app::HighlightApp;

fn main() -> eframe::Result<()> {
    let native_options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(1100.0, 750.0)),
        min_window_size: Some(egui::vec2(700.0, 500.0)),
        ..Default::default()
    };

    eframe::run_native(
        "Highlight Panel",
        native_options,
        Box::new(|cc| Box::new(HighlightApp::new(cc))),
    )
}
