use clock_room::app::RoomApp;
use eframe::NativeOptions;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "clock_room=info".into()),
        )
        .init();

    let native_options = NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Clock Room",
        native_options,
        Box::new(|_cc| Ok(Box::new(RoomApp::new()))),
    )
}
