//! CLI output formatting
//!
//! Provides human-readable terminal display for draws, deliveries and
//! roster diagnostics.

pub mod display;

pub use display::render_delivery_report;
pub use display::render_diagnostic_report;
pub use display::render_draw_summary;
