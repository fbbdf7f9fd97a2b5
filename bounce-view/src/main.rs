//! Application entry point for the quadtree bouncing-body viewer.
//!
//! This binary sets up logging and eframe/egui and delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod viewer;

use bounce_core::config::Config;
use viewer::Viewer;

/// Starts the native eframe application.
///
/// Opens a resizable 800x800 window titled `"Quadtree Bounce"`. All UI
/// state and rendering are handled by [`Viewer`].
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop,
///   or the default configuration is rejected.
fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .without_time()
        .init();

    let viewer = Viewer::new(Config::default())
        .map_err(|err| eframe::Error::AppCreation(Box::new(err)))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 800.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Quadtree Bounce",
        options,
        Box::new(move |_cc| Ok(Box::new(viewer))),
    )
}
