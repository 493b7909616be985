//! Error types for the ticket flow
//!
//! Composition and persistence errors are fatal to the call and bubble up.
//! Dispatch failures are not errors at this level: they are downgraded to a
//! `DispatchStatus` so the caller still gets the saved document path.

use thiserror::Error;

/// Ticket flow error types
#[derive(Debug, Error)]
pub enum TicketError {
    /// Order fields prevent composing a ticket
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// QR encoding failed; no partial document is produced
    #[error("QR encoding failed: {0}")]
    Qr(#[from] qrcode::types::QrError),

    /// Ticket file persistence failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ticket flow operations
pub type TicketResult<T> = Result<T, TicketError>;
