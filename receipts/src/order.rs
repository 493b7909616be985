//! Order model
//!
//! Orders are owned by the storefront persistence layer; this flow only
//! reads them. The shapes mirror what the order-creation handler supplies
//! once persistence has succeeded.

use serde::{Deserialize, Serialize};

/// One product or service entry within an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    /// Unit price in currency units
    pub price: f64,
    pub quantity: i32,
    /// Service entries switch the ticket title and enable the warranty block
    #[serde(default)]
    pub is_service: bool,
}

impl OrderItem {
    /// Line total: unit price times quantity
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Customer purchase record with line items and delivery/contact metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Opaque identifier; the first 8 characters are the human-facing code
    pub id: String,
    /// Creation timestamp, unix millis
    pub created_at: i64,
    pub delivery_address: Option<String>,
    pub phone: Option<String>,
    pub note: Option<String>,
    pub payment_method: Option<String>,
    /// Total amount in currency units
    pub total: Option<f64>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Human-facing short code: first 8 characters of the id
    pub fn short_code(&self) -> String {
        self.id.chars().take(8).collect()
    }
}
