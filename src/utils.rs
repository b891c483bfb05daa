//! Utility functions

use crate::constants::APP_NAME;
use std::path::PathBuf;

// Square viewBox, for window/taskbar icons
pub const ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><rect width="64" height="64" rx="12" fill="#09090b"/><rect x="12" y="34" width="10" height="18" rx="2" fill="#fff"/><rect x="27" y="22" width="10" height="30" rx="2" fill="#2dd4bf"/><rect x="42" y="12" width="10" height="40" rx="2" fill="#fff"/></svg>"##;

/// Rasterize the icon SVG to a square RGBA image. None if the SVG fails to render.
pub fn rasterize_icon(size: u32) -> Option<(Vec<u8>, u32, u32)> {
    let tree = resvg::usvg::Tree::from_str(ICON_SVG, &resvg::usvg::Options::default()).ok()?;
    let scale = size as f32 / tree.size().width();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size)?;
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Some((premul_to_straight(&pixmap), size, size))
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// Get the app data directory (settings, logs)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Parse an account id typed into a form field
pub fn parse_account_id(input: &str) -> Result<u64, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Account id is required".into());
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| format!("'{}' is not a valid account id", trimmed))
}

/// Parse a decimal quantity (amount, volume, price) typed into a form field.
/// Sign is not checked here; the backend decides what it accepts.
pub fn parse_decimal(label: &str, input: &str) -> Result<f64, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(format!("{} is required", label));
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("'{}' is not a valid {}", trimmed, label.to_lowercase())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_parsing() {
        assert_eq!(parse_account_id(" 42 "), Ok(42));
        assert!(parse_account_id("").is_err());
        assert!(parse_account_id("-1").is_err());
        assert!(parse_account_id("abc").is_err());
    }

    #[test]
    fn decimal_parsing() {
        assert_eq!(parse_decimal("Amount", "1000"), Ok(1000.0));
        assert_eq!(parse_decimal("Price", " 1.1 "), Ok(1.1));
        assert_eq!(parse_decimal("Amount", "-5"), Ok(-5.0));
        assert_eq!(parse_decimal("Amount", ""), Err("Amount is required".to_string()));
        assert_eq!(
            parse_decimal("Volume", "ten"),
            Err("'ten' is not a valid volume".to_string())
        );
        assert!(parse_decimal("Amount", "inf").is_err());
        assert!(parse_decimal("Amount", "NaN").is_err());
    }

    #[test]
    fn icon_rasterizes_to_requested_size() {
        let (pixels, w, h) = rasterize_icon(32).unwrap();
        assert_eq!((w, h), (32, 32));
        assert_eq!(pixels.len(), 32 * 32 * 4);
    }
}
