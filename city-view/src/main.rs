//! Binary entry point for the mini city viewer.
//!
//! Everything interactive lives in [`Viewer`]; this file only configures
//! the native window and hands control to eframe.

mod viewer;

use viewer::Viewer;

/// Launches the native viewer window.
///
/// The window opens large enough to fit the default city plus the side
/// panel. Returns an `Err` when eframe cannot create the native window
/// or its event loop.
fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Mini City",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new()))),
    )
}
