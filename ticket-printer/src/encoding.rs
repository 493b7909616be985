//! Windows-1252 encoding utilities for European receipt printers
//!
//! Receipt printers render Latin text through a single-byte code page.
//! This module targets WPC1252 (`ESC t 16` on Epson-compatible firmware),
//! which covers the euro sign and accented Spanish text. It provides:
//! - Byte-width calculation, truncation and padding for column layout
//! - Converting a UTF-8 command stream to Windows-1252 while preserving
//!   ESC/POS commands and raster payloads

use tracing::instrument;

// ESC t 16 - select WPC1252 character code table
const SELECT_CP1252: [u8; 3] = [0x1B, 0x74, 16];

/// Get the Windows-1252 byte width of a string
///
/// Every representable character is a single byte; unmappable characters
/// are replaced and may widen the result.
pub fn cp1252_width(s: &str) -> usize {
    let (cow, _, _) = encoding_rs::WINDOWS_1252.encode(s);
    cow.len()
}

/// Encode plain text (no ESC/POS commands) to Windows-1252
pub fn to_cp1252(s: &str) -> Vec<u8> {
    let (cow, _, _) = encoding_rs::WINDOWS_1252.encode(s);
    cow.into_owned()
}

/// Truncate a string to fit within a Windows-1252 byte width
pub fn truncate_cp1252(s: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut result = String::new();
    for c in s.chars() {
        let s_char = c.to_string();
        let (cow, _, _) = encoding_rs::WINDOWS_1252.encode(&s_char);
        let char_len = cow.len();

        if width + char_len > max_width {
            break;
        }
        result.push(c);
        width += char_len;
    }
    result
}

/// Pad a string to a specific Windows-1252 byte width
///
/// If the string is longer than the width, it will be truncated.
pub fn pad_cp1252(s: &str, width: usize, align_right: bool) -> String {
    let current_width = cp1252_width(s);
    if current_width >= width {
        return truncate_cp1252(s, width);
    }
    let spaces = width - current_width;
    if align_right {
        format!("{}{}", " ".repeat(spaces), s)
    } else {
        format!("{}{}", s, " ".repeat(spaces))
    }
}

/// Convert mixed UTF-8 content (with ESC/POS commands) to Windows-1252
///
/// ASCII bytes (0x00-0x7F) pass through exactly as is, which protects
/// ESC/POS commands from being corrupted. Bytes >= 0x80 are treated as
/// UTF-8 sequences and re-encoded to Windows-1252.
///
/// Also handles:
/// - Re-selecting the code page after an INIT command (ESC @)
/// - Raster payloads (GS v 0): image data is not text and is copied verbatim
#[instrument(skip(bytes))]
pub fn convert_to_cp1252(bytes: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(bytes.len() + 16);

    // Select the code page at the start
    result.extend_from_slice(&SELECT_CP1252);

    let mut buffer = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        // INIT command (ESC @ = 0x1B 0x40) resets the code table,
        // so re-select it right after
        if b == 0x1B && i + 1 < bytes.len() && bytes[i + 1] == 0x40 {
            flush_buffer(&mut buffer, &mut result);

            result.push(0x1B);
            result.push(0x40);
            result.extend_from_slice(&SELECT_CP1252);

            i += 2;
            continue;
        }

        // Raster block (GS v 0 = 0x1D 0x76 0x30 m xL xH yL yH <data>):
        // the payload is bitmap data, not text
        if b == 0x1D && i + 7 < bytes.len() && bytes[i + 1] == 0x76 && bytes[i + 2] == 0x30 {
            flush_buffer(&mut buffer, &mut result);

            let x_bytes = bytes[i + 4] as usize | ((bytes[i + 5] as usize) << 8);
            let y_dots = bytes[i + 6] as usize | ((bytes[i + 7] as usize) << 8);
            let end = (i + 8 + x_bytes * y_dots).min(bytes.len());

            result.extend_from_slice(&bytes[i..end]);
            i = end;
            continue;
        }

        if b < 128 {
            // ASCII byte (command or ASCII text)
            flush_buffer(&mut buffer, &mut result);
            result.push(b);
        } else {
            // Non-ASCII byte (part of a UTF-8 sequence)
            buffer.push(b);
        }
        i += 1;
    }

    // Flush remaining buffer
    flush_buffer(&mut buffer, &mut result);

    result
}

/// Flush the non-ASCII buffer, converting UTF-8 to Windows-1252
fn flush_buffer(buffer: &mut Vec<u8>, result: &mut Vec<u8>) {
    if buffer.is_empty() {
        return;
    }

    let s = String::from_utf8_lossy(buffer);
    let (encoded, _, _) = encoding_rs::WINDOWS_1252.encode(&s);
    result.extend_from_slice(&encoded);
    buffer.clear();
}
