//! Advance widths for the Helvetica family, taken from the Adobe AFM files
//! (units per 1000 em).

/// Widths for printable ASCII, 0x20 through 0x7E.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

/// Metrics for one standard font face.
#[derive(Debug, Clone, Copy)]
pub struct StandardFontMetrics {
    ascii: &'static [u16; 95],
    bold: bool,
}

impl StandardFontMetrics {
    pub const HELVETICA: StandardFontMetrics = StandardFontMetrics {
        ascii: &HELVETICA_ASCII,
        bold: false,
    };
    pub const HELVETICA_BOLD: StandardFontMetrics = StandardFontMetrics {
        ascii: &HELVETICA_BOLD_ASCII,
        bold: true,
    };

    /// Cap height in 1/1000 em, used to centre text vertically in cells.
    pub const CAP_HEIGHT: f64 = 718.0;

    /// Advance width of `ch` in 1/1000 em.
    pub fn advance(&self, ch: char) -> u16 {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) {
            return self.ascii[(cp - 0x20) as usize];
        }
        match ch {
            '\u{2022}' => 350,                            // bullet
            '\u{2013}' | '\u{00A3}' | '\u{20AC}' => 556, // en dash, pound, euro
            '\u{2014}' => 1000,                           // em dash
            '\u{2018}' | '\u{2019}' => {
                if self.bold {
                    278
                } else {
                    222
                }
            }
            '\u{201C}' | '\u{201D}' => {
                if self.bold {
                    500
                } else {
                    333
                }
            }
            '\u{00A0}' => 278,
            _ => 556,
        }
    }

    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        self.advance(ch) as f64 * font_size / 1000.0
    }

    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        let units: u32 = text.chars().map(|ch| self.advance(ch) as u32).sum();
        units as f64 * font_size / 1000.0
    }
}
