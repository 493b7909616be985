//! Flow configuration
//!
//! Environment-sourced values are resolved once and passed explicitly into
//! the composer/dispatcher, so the flow stays testable with fixed inputs.
//!
//! # Environment variables
//!
//! | Variable | Default | Purpose |
//! |----------|---------|---------|
//! | FRONTEND_URL | http://localhost:5173 | Base URL embedded in the ticket QR |
//! | TICKET_PRINTER_NAME | (system default) | Output device name |
//! | TICKET_OUTPUT_DIR | OS temp dir | Where ticket files are written |
//! | MERCHANT_NAME | Electrónica Rivas | Header: merchant name |
//! | MERCHANT_ADDRESS | C/ Mayor 12, 28801 Alcalá de Henares | Header: address |
//! | MERCHANT_TAX_ID | B86420975 | Header: tax id |
//! | MERCHANT_PHONE | 918 880 123 | Header: phone |

use std::env;
use std::path::PathBuf;

/// Merchant identity printed in the ticket header
#[derive(Debug, Clone)]
pub struct Merchant {
    pub name: String,
    pub address: String,
    pub tax_id: String,
    pub phone: String,
}

impl Merchant {
    fn from_env() -> Self {
        Self {
            name: env::var("MERCHANT_NAME").unwrap_or_else(|_| "Electrónica Rivas".into()),
            address: env::var("MERCHANT_ADDRESS")
                .unwrap_or_else(|_| "C/ Mayor 12, 28801 Alcalá de Henares".into()),
            tax_id: env::var("MERCHANT_TAX_ID").unwrap_or_else(|_| "B86420975".into()),
            phone: env::var("MERCHANT_PHONE").unwrap_or_else(|_| "918 880 123".into()),
        }
    }
}

impl Default for Merchant {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Ticket flow configuration
#[derive(Debug, Clone)]
pub struct TicketConfig {
    /// Storefront base URL, embedded in the order lookup QR
    pub frontend_url: String,
    /// Output device name; `None` selects the system default
    pub printer_name: Option<String>,
    /// Directory ticket files are written to
    pub output_dir: PathBuf,
    /// Merchant header fields
    pub merchant: Merchant,
}

impl TicketConfig {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
            printer_name: env::var("TICKET_PRINTER_NAME")
                .ok()
                .filter(|name| !name.is_empty()),
            output_dir: env::var("TICKET_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            merchant: Merchant::from_env(),
        }
    }

    /// Override frontend URL and output directory
    ///
    /// Commonly used in tests.
    pub fn with_overrides(
        frontend_url: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        let mut config = Self::from_env();
        config.frontend_url = frontend_url.into();
        config.output_dir = output_dir.into();
        config.printer_name = None;
        config
    }
}

impl Default for TicketConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
