//! QR code for the public voting link.

use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageFormat, Luma};
use qrcode::render::unicode;
use qrcode::{EcLevel, QrCode};

pub const DEFAULT_QR_FILE: &str = "livevote-qr.png";

const PNG_MIN_SIZE: u32 = 360;

fn encode(url: &str) -> Result<QrCode> {
    QrCode::with_error_correction_level(url.as_bytes(), EcLevel::H)
        .with_context(|| format!("Failed to encode QR code for {}", url))
}

/// Renders the code with half-block characters, light modules on dark.
pub fn terminal(url: &str) -> Result<String> {
    Ok(encode(url)?
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}

/// Writes the code as a PNG, for printing or projecting.
pub fn save_png(url: &str, path: &Path) -> Result<()> {
    let image = encode(url)?
        .render::<Luma<u8>>()
        .min_dimensions(PNG_MIN_SIZE, PNG_MIN_SIZE)
        .build();
    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("QR code saved to {}", path.display());
    Ok(())
}
