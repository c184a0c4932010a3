//! Shared helpers for decoding sub-package text and converting the
//! space-separated attribute values used throughout the format.

use std::borrow::Cow;

/// Decode sub-package bytes to a string.
///
/// Tries UTF-8 first (handles BOM automatically via encoding_rs), then falls
/// back to Windows-1252 so that packages produced by legacy tooling still
/// load. Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Parse a numeric attribute value. Returns `None` for anything that is not
/// a finite number.
pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse a boolean attribute value.
///
/// When `default` is true, anything but the literal `"false"` counts as true
/// (matching how the format omits attributes that hold their default).
pub fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value {
        Some(v) if default => v != "false",
        Some(v) => v == "true",
        None => default,
    }
}

/// Parse a space-separated list of numbers, skipping non-numeric tokens.
pub fn parse_number_list(value: &str) -> Vec<f64> {
    value.split_whitespace().filter_map(parse_number).collect()
}

/// Format a number the way the format writes them: no trailing `.0`, full
/// precision otherwise. Negative zero (a common residue of composing
/// rotation matrices) collapses to plain zero.
pub fn fmt_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

/// Format a space-separated list of numbers.
pub fn fmt_number_list(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| fmt_number(*v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract image dimensions from raw image data.
///
/// Supports PNG, JPEG, and GIF by parsing header bytes. Returns
/// `(width, height)` or `None` if the format is unrecognized.
pub fn extract_image_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 24 {
        return None;
    }

    // PNG: width/height at bytes 16-23 in IHDR chunk
    if data[0] == 0x89 && data[1] == 0x50 && data[2] == 0x4E && data[3] == 0x47 {
        let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
        let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
        return Some((width, height));
    }

    // JPEG: parse SOF markers
    if data[0] == 0xFF && data[1] == 0xD8 {
        return extract_jpeg_dimensions(data);
    }

    // GIF: width/height at bytes 6-9 (little-endian)
    if data[0] == 0x47 && data[1] == 0x49 && data[2] == 0x46 {
        let width = u16::from_le_bytes([data[6], data[7]]) as u32;
        let height = u16::from_le_bytes([data[8], data[9]]) as u32;
        return Some((width, height));
    }

    None
}

/// Extract dimensions from JPEG data by parsing SOF markers.
fn extract_jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let mut i = 2;
    while i + 4 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }

        let marker = data[i + 1];

        // SOF markers (Start of Frame) - various encoding types
        if matches!(
            marker,
            0xC0 | 0xC1
                | 0xC2
                | 0xC3
                | 0xC5
                | 0xC6
                | 0xC7
                | 0xC9
                | 0xCA
                | 0xCB
                | 0xCD
                | 0xCE
                | 0xCF
        ) && i + 9 < data.len()
        {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Some((width, height));
        }

        // Skip to next marker
        if i + 3 < data.len() {
            let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
            i += 2 + length;
        } else {
            break;
        }
    }
    None
}
