//! # receipts
//!
//! Order-receipt composition and best-effort print dispatch for the
//! storefront. Invoked once per completed order, after persistence:
//!
//! ```text
//! Order record → composer (+ QR) → ESC/POS bytes → save → dispatch outcome
//! ```
//!
//! Printing mechanics (ESC/POS building, code pages, spooler access) live
//! in the `ticket-printer` crate; this crate decides WHAT a ticket says and
//! what happens to it.
//!
//! Error policy: composition and persistence errors are fatal and bubble
//! up; a physical dispatch failure is downgraded — the ticket file is
//! retained and its path reported, so "document produced" counts as success
//! for the caller.

pub mod compose;
pub mod config;
pub mod dispatch;
mod error;
pub mod order;
pub mod qr;

pub use compose::TicketRenderer;
pub use config::{Merchant, TicketConfig};
pub use dispatch::{DispatchOutcome, DispatchStatus, save_and_dispatch};
pub use error::{TicketError, TicketResult};
pub use order::{Order, OrderItem};

use tracing::{info, instrument};

/// Compose, persist and best-effort print a ticket for a completed order
///
/// Returns the saved file path and the dispatch state. See the crate docs
/// for the error policy.
#[instrument(skip(order, config), fields(order_id = %order.id))]
pub async fn print_order_ticket(
    order: &Order,
    config: &TicketConfig,
) -> TicketResult<DispatchOutcome> {
    let document = TicketRenderer::new(config).render(order)?;
    let outcome = save_and_dispatch(&order.short_code(), &document, config).await?;
    info!(
        path = %outcome.path.display(),
        printed = outcome.printed(),
        "ticket flow finished"
    );
    Ok(outcome)
}
