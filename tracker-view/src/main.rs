//! Application entry point for the attractor-tracking viewer.
//!
//! This binary sets up logging and eframe/egui and delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod scenes;
mod viewer;

use viewer::Viewer;

/// Starts the native eframe application.
///
/// Logging goes through `env_logger` at `info` level unless `RUST_LOG`
/// says otherwise.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop, or
///   the initial scene configuration is rejected.
fn main() -> eframe::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Attractor Tracking",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new()?))),
    )
}
