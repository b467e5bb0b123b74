//! # Font Management
//!
//! The templates only use the Helvetica family from the 14 standard PDF
//! fonts, which need no embedding. Measuring a string is a table lookup
//! against the AFM widths in [`metrics`].

pub mod metrics;

pub use metrics::StandardFontMetrics;

/// The standard PDF fonts the templates draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }

    pub fn metrics(&self) -> StandardFontMetrics {
        match self {
            Self::Helvetica => StandardFontMetrics::HELVETICA,
            Self::HelveticaBold => StandardFontMetrics::HELVETICA_BOLD,
        }
    }

    /// Width of `text` set in this font at `font_size`, in points.
    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        self.metrics().measure_string(text, font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helvetica_space() {
        let w = StandardFont::Helvetica.metrics().char_width(' ', 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn test_bold_wider() {
        let regular = StandardFont::Helvetica.measure_string("Registration", 10.0);
        let bold = StandardFont::HelveticaBold.measure_string("Registration", 10.0);
        assert!(bold > regular, "Bold should be wider than regular");
    }

    #[test]
    fn test_measure_known_string() {
        // H=722 e=556 l=222 l=222 o=556 -> 2278 units
        let w = StandardFont::Helvetica.measure_string("Hello", 10.0);
        assert!((w - 22.78).abs() < 0.001);
    }

    #[test]
    fn test_bullet_and_unknown_chars() {
        let m = StandardFont::Helvetica.metrics();
        assert_eq!(m.advance('\u{2022}'), 350);
        assert_eq!(m.advance('\u{4E2D}'), 556);
    }
}
