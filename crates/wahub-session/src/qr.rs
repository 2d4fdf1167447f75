// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! QR payload rendering for browser display.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use qrcode::QrCode;
use qrcode::render::svg;

use wahub_core::error::WahubError;

/// Renders a raw QR payload into an inline SVG data URL.
pub fn render_data_url(payload: &str) -> Result<String, WahubError> {
    let code = QrCode::new(payload.as_bytes())
        .map_err(|e| WahubError::Internal(format!("qr encode failed: {e}")))?;
    let image = code
        .render::<svg::Color<'_>>()
        .min_dimensions(256, 256)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();
    Ok(format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(image.as_bytes())
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_inline_svg_data_url() {
        let url = render_data_url("2@abcdef,ghijkl,mnopqr").unwrap();
        assert!(url.starts_with("data:image/svg+xml;base64,"));

        let encoded = url.trim_start_matches("data:image/svg+xml;base64,");
        let decoded = STANDARD.decode(encoded).unwrap();
        let svg_text = String::from_utf8(decoded).unwrap();
        assert!(svg_text.contains("<svg"));
    }

    #[test]
    fn distinct_payloads_render_distinct_images() {
        let a = render_data_url("payload-a").unwrap();
        let b = render_data_url("payload-b").unwrap();
        assert_ne!(a, b);
    }
}
