//! Ticket composer
//!
//! Renders an order into a fixed-layout 80mm ESC/POS document. The block
//! order and the conditional sections are a fixed contract: the output is a
//! physical, customer-facing artifact.

use chrono_tz::Tz;
use ticket_printer::{EscPosBuilder, pad_cp1252};
use tracing::instrument;

use crate::config::TicketConfig;
use crate::error::{TicketError, TicketResult};
use crate::order::Order;
use crate::qr;

/// 80mm paper, standard font
const PAPER_WIDTH: usize = 48;

/// Item table columns: name / quantity / line amount
const COL_NAME: usize = 28;
const COL_QTY: usize = 5;
const COL_AMOUNT: usize = 13;

/// Names longer than this are shortened for the table
const NAME_DISPLAY_MAX: usize = 25;
const NAME_TRUNCATE_AT: usize = 22;

/// Ticket composer
///
/// Stateless apart from configuration; rendering never mutates the order.
pub struct TicketRenderer<'a> {
    config: &'a TicketConfig,
    width: usize,
    timezone: Tz,
}

impl<'a> TicketRenderer<'a> {
    /// Create a renderer with the default 80mm width and business timezone
    pub fn new(config: &'a TicketConfig) -> Self {
        Self {
            config,
            width: PAPER_WIDTH,
            timezone: chrono_tz::Europe::Madrid,
        }
    }

    /// Render an order to ESC/POS bytes
    ///
    /// Fails fast on QR encoding problems; no partial document is emitted.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub fn render(&self, order: &Order) -> TicketResult<Vec<u8>> {
        if order.id.is_empty() {
            return Err(TicketError::InvalidOrder("order id is empty".to_string()));
        }

        // Encode the lookup QR before any layout work
        let code = qr::order_qr(&self.config.frontend_url, &order.id)?;

        let has_service = order.items.iter().any(|item| item.is_service);
        let mut b = EscPosBuilder::new(self.width);

        // Merchant header
        let merchant = &self.config.merchant;
        b.center();
        b.bold();
        b.double_size();
        b.line(&merchant.name);
        b.reset_size();
        b.bold_off();
        b.line(&merchant.address);
        b.line(&format!("NIF: {}", merchant.tax_id));
        b.line(&format!("Tel: {}", merchant.phone));
        b.left();
        b.sep_double();

        // Title + order metadata
        b.bold();
        if has_service {
            b.line("JUSTIFICANTE DE REPARACION");
        } else {
            b.line("TICKET DE VENTA");
        }
        b.bold_off();
        b.line_lr(
            &format!("Num: {}", order.short_code()),
            &format_timestamp(order.created_at, self.timezone),
        );

        // Customer block
        let address = order
            .delivery_address
            .as_deref()
            .unwrap_or("Recogida en tienda");
        b.line(&format!("Envío: {}", address));
        if let Some(phone) = &order.phone {
            b.line(&format!("Tel: {}", phone));
        }
        b.sep_double();

        // Item table
        b.line(&format!(
            "{}{}{}",
            pad_cp1252("ARTICULO", COL_NAME, false),
            pad_cp1252("CANT", COL_QTY, true),
            pad_cp1252("IMPORTE", COL_AMOUNT, true),
        ));
        b.sep_single();
        for item in &order.items {
            let qty = format!("{}x", item.quantity);
            let amount = format!("€{:.2}", item.line_total());
            b.line(&format!(
                "{}{}{}",
                pad_cp1252(&display_name(&item.name), COL_NAME, false),
                pad_cp1252(&qty, COL_QTY, true),
                pad_cp1252(&amount, COL_AMOUNT, true),
            ));
        }
        b.sep_double();

        // Total
        b.bold();
        b.double_height();
        b.line(&format!("TOTAL: €{:.2}", order.total.unwrap_or(0.0)));
        b.reset_size();
        b.bold_off();
        b.line("IVA INCLUIDO");
        b.newline();

        // Payment method
        let payment = order.payment_method.as_deref().unwrap_or("No especificado");
        b.line(&format!("Pago: {}", payment));

        // Warranty block, repair tickets only
        if has_service {
            b.newline();
            b.line("Garantía de 6 meses en reparaciones.");
            b.line("Presente este justificante para");
            b.line("cualquier reclamación.");
        }

        // Order lookup QR
        b.newline();
        b.center();
        b.image(&code);

        // Footer
        b.newline();
        b.line("¡Gracias por su compra!");
        b.cut_feed(4);

        Ok(b.build())
    }
}

/// Shorten long item names for the table
///
/// Names over 25 characters become the first 22 plus an ellipsis marker;
/// shorter names are unchanged.
fn display_name(name: &str) -> String {
    if name.chars().count() > NAME_DISPLAY_MAX {
        let head: String = name.chars().take(NAME_TRUNCATE_AT).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

/// Format unix millis as dd/mm/yyyy HH:MM in the given timezone
fn format_timestamp(millis: i64, tz: Tz) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&tz).format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| "--/--/---- --:--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderItem;
    use ticket_printer::to_cp1252;

    fn test_config() -> TicketConfig {
        TicketConfig::with_overrides("https://shop.example", std::env::temp_dir())
    }

    fn test_order() -> Order {
        Order {
            id: "abc12345-6789-dead-beef-000000000000".to_string(),
            created_at: 1705933935000, // 2024-01-22 14:32:15 UTC, 15:32 Madrid
            delivery_address: Some("Av. de la Paz 3, Madrid".to_string()),
            phone: Some("600 111 222".to_string()),
            note: None,
            payment_method: Some("Tarjeta".to_string()),
            total: Some(23.5),
            items: vec![OrderItem {
                name: "Leche".to_string(),
                price: 1.5,
                quantity: 2,
                is_service: false,
            }],
        }
    }

    /// Search rendered bytes for text as the printer will receive it
    fn contains(data: &[u8], text: &str) -> bool {
        let needle = to_cp1252(text);
        data.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_render_worked_example() {
        let config = test_config();
        let order = test_order();
        let data = TicketRenderer::new(&config).render(&order).unwrap();

        assert!(!data.is_empty());
        assert!(contains(&data, "TOTAL: €23.50"));
        assert!(contains(&data, "2x"));
        assert!(contains(&data, "€3.00"));
        assert!(contains(&data, "Num: abc12345"));
    }

    #[test]
    fn test_render_does_not_mutate_order() {
        let config = test_config();
        let order = test_order();
        let before = order.clone();

        TicketRenderer::new(&config).render(&order).unwrap();
        assert_eq!(order, before);
    }

    #[test]
    fn test_missing_total_renders_zero() {
        let config = test_config();
        let mut order = test_order();
        order.total = None;

        let data = TicketRenderer::new(&config).render(&order).unwrap();
        assert!(contains(&data, "TOTAL: €0.00"));
    }

    #[test]
    fn test_long_names_are_shortened() {
        let config = test_config();
        let mut order = test_order();
        order.items[0].name = "Reparación de pantalla iPhone 13 Pro Max".to_string();

        let data = TicketRenderer::new(&config).render(&order).unwrap();
        assert!(contains(&data, "Reparación de pantalla..."));
        assert!(!contains(&data, "iPhone 13 Pro Max"));
    }

    #[test]
    fn test_short_names_unchanged() {
        // Exactly 25 characters stays as is
        let name = "Cargador USB-C 65W GaN 3m";
        assert_eq!(name.chars().count(), 25);

        let config = test_config();
        let mut order = test_order();
        order.items[0].name = name.to_string();

        let data = TicketRenderer::new(&config).render(&order).unwrap();
        assert!(contains(&data, name));
        assert!(!contains(&data, "..."));
    }

    #[test]
    fn test_sales_ticket_has_no_warranty_block() {
        let config = test_config();
        let order = test_order();
        let data = TicketRenderer::new(&config).render(&order).unwrap();

        assert!(contains(&data, "TICKET DE VENTA"));
        assert!(!contains(&data, "JUSTIFICANTE DE REPARACION"));
        assert!(!contains(&data, "Garantía de 6 meses"));
    }

    #[test]
    fn test_service_item_switches_title_and_warranty() {
        let config = test_config();
        let mut order = test_order();
        order.items.push(OrderItem {
            name: "Cambio de batería".to_string(),
            price: 49.0,
            quantity: 1,
            is_service: true,
        });

        let data = TicketRenderer::new(&config).render(&order).unwrap();
        assert!(contains(&data, "JUSTIFICANTE DE REPARACION"));
        assert!(!contains(&data, "TICKET DE VENTA"));
        assert!(contains(&data, "Garantía de 6 meses en reparaciones."));
    }

    #[test]
    fn test_fallback_labels() {
        let config = test_config();
        let mut order = test_order();
        order.delivery_address = None;
        order.payment_method = None;

        let data = TicketRenderer::new(&config).render(&order).unwrap();
        assert!(contains(&data, "Envío: Recogida en tienda"));
        assert!(contains(&data, "Pago: No especificado"));
    }

    #[test]
    fn test_localized_timestamp() {
        let config = test_config();
        let order = test_order();
        let data = TicketRenderer::new(&config).render(&order).unwrap();

        // 2024-01-22 14:32:15 UTC is 15:32 in Madrid
        assert!(contains(&data, "22/01/2024 15:32"));
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let config = test_config();
        let mut order = test_order();
        order.id = String::new();

        let err = TicketRenderer::new(&config).render(&order).unwrap_err();
        assert!(matches!(err, TicketError::InvalidOrder(_)));
    }

    #[test]
    fn test_display_name_boundaries() {
        let long = "a".repeat(26);
        assert_eq!(display_name(&long), format!("{}...", "a".repeat(22)));
        let exact = "a".repeat(25);
        assert_eq!(display_name(&exact), exact);
    }
}
