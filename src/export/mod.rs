//! Report export
//!
//! - HTML: a printable report document, rendered then shared
//! - CSV: the visible expenses, spreadsheet-compatible

pub mod csv;
pub mod html;

pub use csv::export_expenses_csv;
pub use html::{render, render_html, share, ReportDocument};
