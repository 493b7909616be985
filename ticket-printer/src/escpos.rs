//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data.

use crate::encoding::{convert_to_cp1252, cp1252_width};

/// ESC/POS command builder
///
/// Builds ESC/POS byte sequences for thermal receipt printers.
/// All text is converted to the Windows-1252 code page on `build()`.
pub struct EscPosBuilder {
    buf: Vec<u8>,
    width: usize,
}

impl EscPosBuilder {
    /// Create a new builder with the specified paper width in characters
    ///
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(width: usize) -> Self {
        let mut buf = Vec::with_capacity(4096);
        // Initialize printer (ESC @)
        buf.extend_from_slice(&[0x1B, 0x40]);
        Self { buf, width }
    }

    /// Get the configured paper width
    pub fn width(&self) -> usize {
        self.width
    }

    // === Text Output ===

    /// Write raw text (re-encoded on build)
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Write empty line
    pub fn newline(&mut self) -> &mut Self {
        self.buf.push(b'\n');
        self
    }

    /// Write multiple empty lines
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        // ESC d n - Print and feed n lines
        self.buf.extend_from_slice(&[0x1B, 0x64, lines]);
        self
    }

    // === Alignment ===

    /// Align text to center
    pub fn center(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x01]);
        self
    }

    /// Align text to left (default)
    pub fn left(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x00]);
        self
    }

    // === Text Style ===

    /// Enable bold text
    pub fn bold(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x01]);
        self
    }

    /// Disable bold text
    pub fn bold_off(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, 0x00]);
        self
    }

    /// Double width and height
    pub fn double_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x11]);
        self
    }

    /// Double height only
    pub fn double_height(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x01]);
        self
    }

    /// Reset to normal size
    pub fn reset_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x21, 0x00]);
        self
    }

    // === Separators ===

    /// Print a line of '=' characters
    pub fn sep_double(&mut self) -> &mut Self {
        self.line(&"=".repeat(self.width))
    }

    /// Print a line of '-' characters
    pub fn sep_single(&mut self) -> &mut Self {
        self.line(&"-".repeat(self.width))
    }

    // === Layout Helpers ===

    /// Print left and right text on the same line
    ///
    /// Left text is left-aligned, right text is right-aligned,
    /// with spaces filling the gap.
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let lw = cp1252_width(left);
        let rw = cp1252_width(right);

        if lw + rw >= self.width {
            // Too long, just print with space
            self.text(left);
            self.text(" ");
            self.line(right);
        } else {
            let spaces = self.width - lw - rw;
            self.text(left);
            self.text(&" ".repeat(spaces));
            self.line(right);
        }
        self
    }

    // === Raster Graphics ===

    /// Embed a grayscale image as GS v 0 raster graphics
    ///
    /// The image is resized to fit the printable width (384 dots) if wider,
    /// then thresholded to 1-bit monochrome (luma < 128 prints black).
    #[cfg(feature = "image")]
    pub fn image(&mut self, img: &image::GrayImage) -> &mut Self {
        // Printable width on 58mm/80mm heads
        const MAX_DOTS: u32 = 384;

        let resized;
        let img = if img.width() > MAX_DOTS {
            let ratio = MAX_DOTS as f64 / img.width() as f64;
            let new_h = (img.height() as f64 * ratio) as u32;
            resized = image::imageops::resize(
                img,
                MAX_DOTS,
                new_h,
                image::imageops::FilterType::Nearest,
            );
            &resized
        } else {
            img
        };

        let (w, h) = img.dimensions();
        let x_bytes = w.div_ceil(8);

        // GS v 0 m xL xH yL yH
        self.buf.extend_from_slice(&[0x1D, 0x76, 0x30, 0x00]);
        self.buf.push(x_bytes as u8);
        self.buf.push((x_bytes >> 8) as u8);
        self.buf.push(h as u8);
        self.buf.push((h >> 8) as u8);

        for y in 0..h {
            for x_byte in 0..x_bytes {
                let mut byte = 0u8;
                for bit in 0..8 {
                    let x = x_byte * 8 + bit;
                    if x < w && img.get_pixel(x, y)[0] < 128 {
                        byte |= 1 << (7 - bit);
                    }
                }
                self.buf.push(byte);
            }
        }

        self.buf.push(0x0A);
        self
    }

    // === Paper Control ===

    /// Cut paper (full cut)
    pub fn cut(&mut self) -> &mut Self {
        // GS V 0 - Full cut
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x00]);
        self
    }

    /// Full cut with feed — feeds n lines then cuts.
    /// Uses GS V 66 n, which lets the printer manage cutter-to-head distance.
    pub fn cut_feed(&mut self, lines: u8) -> &mut Self {
        // GS V 66 n - Full cut after feeding n lines
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x42, lines]);
        self
    }

    // === Build ===

    /// Build the final byte buffer with Windows-1252 encoding
    ///
    /// This converts all UTF-8 text to the printer code page while
    /// preserving ESC/POS commands and raster payloads.
    pub fn build(self) -> Vec<u8> {
        convert_to_cp1252(&self.buf)
    }

    /// Build without code page conversion (for debugging or ASCII-only content)
    pub fn build_raw(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new(48)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_basic() {
        let mut b = EscPosBuilder::new(32);
        b.center()
            .double_size()
            .line("TICKET")
            .reset_size()
            .left()
            .line("contenido");

        let data = b.build_raw();
        assert!(!data.is_empty());
        // Starts with INIT
        assert_eq!(&data[..2], &[0x1B, 0x40]);
    }

    #[test]
    fn test_line_lr() {
        let mut b = EscPosBuilder::new(20);
        b.line_lr("TOTAL", "9.99");

        let s = String::from_utf8_lossy(&b.build_raw()).to_string();
        assert!(s.contains("TOTAL"));
        assert!(s.contains("9.99"));
        // Right side ends the line
        assert!(s.contains("9.99\n"));
    }

    #[test]
    fn test_separators() {
        let mut b = EscPosBuilder::new(10);
        b.sep_double();

        let s = String::from_utf8_lossy(&b.build_raw()).to_string();
        assert!(s.contains("=========="));
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_image_raster_header() {
        // 16x8 all-black image -> 2 bytes per row, 8 rows
        let img = image::GrayImage::from_pixel(16, 8, image::Luma([0u8]));
        let mut b = EscPosBuilder::new(48);
        b.image(&img);

        let data = b.build_raw();
        let pos = data
            .windows(3)
            .position(|w| w == [0x1D, 0x76, 0x30])
            .expect("raster header present");
        // xL = 2, xH = 0, yL = 8, yH = 0
        assert_eq!(&data[pos + 4..pos + 8], &[2, 0, 8, 0]);
        // All-black payload
        assert!(data[pos + 8..pos + 8 + 16].iter().all(|&b| b == 0xFF));
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_image_resizes_to_head_width() {
        let img = image::GrayImage::from_pixel(800, 100, image::Luma([255u8]));
        let mut b = EscPosBuilder::new(48);
        b.image(&img);

        let data = b.build_raw();
        let pos = data
            .windows(3)
            .position(|w| w == [0x1D, 0x76, 0x30])
            .expect("raster header present");
        let x_bytes = data[pos + 4] as usize | ((data[pos + 5] as usize) << 8);
        // 384 dots = 48 bytes per row
        assert_eq!(x_bytes, 48);
    }
}
