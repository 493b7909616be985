//! Order lookup QR code
//!
//! Encodes `<frontend-base>/?order=<id>` at the highest error-correction
//! level so the code stays scannable after thermal print degradation.

use image::{GrayImage, Luma};
use qrcode::{EcLevel, QrCode};

use crate::error::TicketResult;

/// Minimum raster edge in printer dots
const MIN_EDGE: u32 = 300;

/// Build the lookup URL embedded in the code
pub fn order_url(frontend_url: &str, order_id: &str) -> String {
    format!("{}/?order={}", frontend_url.trim_end_matches('/'), order_id)
}

/// Render the order lookup QR as a square black-on-white raster
///
/// Encoding failure aborts composition; no placeholder image is produced.
pub fn order_qr(frontend_url: &str, order_id: &str) -> TicketResult<GrayImage> {
    let url = order_url(frontend_url, order_id);
    let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::H)?;

    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_EDGE, MIN_EDGE)
        .dark_color(Luma([0u8]))
        .light_color(Luma([255u8]))
        .build();

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_url() {
        assert_eq!(
            order_url("https://shop.example", "abc12345-6789"),
            "https://shop.example/?order=abc12345-6789"
        );
    }

    #[test]
    fn test_order_url_trims_trailing_slash() {
        assert_eq!(
            order_url("https://shop.example/", "abc"),
            "https://shop.example/?order=abc"
        );
    }

    #[test]
    fn test_qr_is_square_and_monochrome() {
        let img = order_qr("https://shop.example", "abc12345-6789-dead-beef").unwrap();

        assert_eq!(img.width(), img.height());
        assert!(img.width() >= MIN_EDGE);

        // Pure black-on-white: every pixel is one of the two extremes
        assert!(img.pixels().all(|p| p[0] == 0 || p[0] == 255));
        assert!(img.pixels().any(|p| p[0] == 0));
        assert!(img.pixels().any(|p| p[0] == 255));
    }
}
