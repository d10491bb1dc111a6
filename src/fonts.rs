//! Hangul font setup shared by the egui UI and the PNG renderer.
//! egui's bundled fonts and plotters' family lookup have no Hangul glyphs,
//! so one font file is loaded at startup and installed in both.

use egui::{FontData, FontDefinitions, FontFamily};
use plotters::style::{register_font, FontStyle};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Family name the font is registered under in both backends.
pub const HANGUL_FONT: &str = "hangul";

/// Read the font at `path` and register it for static charts.
///
/// Returns the bytes for the UI font setup, or `None` when the file is
/// missing or not a usable font. Text then falls back to egui's defaults.
pub fn load(path: &Path) -> Option<&'static [u8]> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Hangul font not loaded; Korean text will not render"
            );
            return None;
        }
    };

    // Both backends keep the font for the rest of the process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    if let Err(_) = register_font(HANGUL_FONT, FontStyle::Normal, bytes) {
        warn!(path = %path.display(), "Invalid font file");
        return None;
    }

    info!(path = %path.display(), "Loaded Hangul font");
    Some(bytes)
}

/// egui's default fonts with the Hangul font appended as a fallback to
/// both families.
pub fn definitions(bytes: &'static [u8]) -> FontDefinitions {
    let mut fonts = FontDefinitions::default();
    fonts
        .font_data
        .insert(HANGUL_FONT.to_owned(), Arc::new(FontData::from_static(bytes)));

    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(HANGUL_FONT.to_owned());
    }
    fonts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hangul_font_is_fallback_in_both_families() {
        let defaults = FontDefinitions::default();
        let fonts = definitions(b"font bytes");

        assert!(fonts.font_data.contains_key(HANGUL_FONT));
        for family in [FontFamily::Proportional, FontFamily::Monospace] {
            let names = &fonts.families[&family];
            assert_eq!(names.last().map(String::as_str), Some(HANGUL_FONT));
            // Latin text keeps egui's primary font
            assert_eq!(names.first(), defaults.families[&family].first());
        }
    }

    #[test]
    fn test_missing_font_file() {
        assert!(load(Path::new("no/such/font.ttf")).is_none());
    }

    #[test]
    fn test_invalid_font_file() {
        let path = std::env::temp_dir().join(format!("not_a_font_{}.ttf", std::process::id()));
        std::fs::write(&path, b"definitely not a font").unwrap();

        let loaded = load(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(loaded.is_none());
    }
}
