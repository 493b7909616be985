//! # ticket-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building for 80mm/58mm receipt printers
//! - Windows-1252 code page encoding (euro sign, accented Latin text)
//! - Raster graphics embedding (QR codes, logos)
//! - Windows spooler printing (driver printers)
//!
//! Business logic (WHAT to print) stays in application code: receipt
//! composition and dispatch policy live in the `receipts` crate.
//!
//! ## Example
//!
//! ```ignore
//! use ticket_printer::{EscPosBuilder, Printer, WindowsPrinter};
//!
//! // Build ESC/POS content
//! let mut builder = EscPosBuilder::new(48);
//! builder.center();
//! builder.double_size();
//! builder.line("TICKET DE VENTA");
//! builder.reset_size();
//! builder.left();
//! builder.line_lr("TOTAL", "€23.50");
//! builder.cut_feed(4);
//!
//! // Send to the spooler
//! let printer = WindowsPrinter::new("EPSON TM-T20III");
//! printer.print(&builder.build()).await?;
//! ```

mod encoding;
mod error;
mod escpos;
mod printer;

// Re-exports
pub use encoding::{convert_to_cp1252, cp1252_width, pad_cp1252, to_cp1252, truncate_cp1252};
pub use error::{PrintError, PrintResult};
pub use escpos::EscPosBuilder;
pub use printer::Printer;

#[cfg(windows)]
pub use printer::WindowsPrinter;
