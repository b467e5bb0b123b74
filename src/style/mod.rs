//! # Style System
//!
//! Colours, text styles and table styles for the document templates.
//!
//! Table styling is declarative: a [`TableStyle`] starts from a small base
//! (font size, padding, grid) and carries an ordered list of [`StyleRule`]s.
//! Each rule names the rows and columns it targets and patches only the
//! properties it sets. Variants of a style are made by appending rules, never
//! by editing an existing rule in place, so no template depends on where a
//! rule sits in the list.

use serde::{Deserialize, Serialize};

use crate::font::StandardFont;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Parse `#rgb` or `#rrggbb`. Unparseable channels read as 0.
    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let (r, g, b) = match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).unwrap_or(0);
                (r, g, b)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                (r, g, b)
            }
            _ => (0, 0, 0),
        };
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
}

/// Font, size and colour for a run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: StandardFont,
    pub size: f64,
    pub color: Color,
}

impl TextStyle {
    pub fn regular(size: f64) -> Self {
        Self {
            font: StandardFont::Helvetica,
            size,
            color: Color::BLACK,
        }
    }

    pub fn bold(size: f64) -> Self {
        Self {
            font: StandardFont::HelveticaBold,
            size,
            color: Color::BLACK,
        }
    }
}

/// Edge values (top, right, bottom, left) used for cell padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Which rows a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSelector {
    All,
    /// Row 0.
    Header,
    /// Every row after the header.
    Body,
    Row(usize),
    /// The final row.
    Last,
}

impl RowSelector {
    pub fn matches(&self, row: usize, row_count: usize) -> bool {
        match *self {
            RowSelector::All => true,
            RowSelector::Header => row == 0,
            RowSelector::Body => row >= 1,
            RowSelector::Row(i) => row == i,
            RowSelector::Last => row_count > 0 && row == row_count - 1,
        }
    }
}

/// Which columns a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSelector {
    All,
    Col(usize),
    /// This column and every one to its right.
    From(usize),
}

impl ColumnSelector {
    pub fn matches(&self, col: usize) -> bool {
        match *self {
            ColumnSelector::All => true,
            ColumnSelector::Col(i) => col == i,
            ColumnSelector::From(i) => col >= i,
        }
    }
}

/// A partial cell style. Unset fields leave the underlying value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellPatch {
    pub bold: Option<bool>,
    pub background: Option<Color>,
    pub align: Option<TextAlign>,
}

impl CellPatch {
    pub fn bold() -> Self {
        Self {
            bold: Some(true),
            ..Default::default()
        }
    }

    pub fn align(align: TextAlign) -> Self {
        Self {
            align: Some(align),
            ..Default::default()
        }
    }

    pub fn background(color: Color) -> Self {
        Self {
            background: Some(color),
            ..Default::default()
        }
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleRule {
    pub rows: RowSelector,
    pub cols: ColumnSelector,
    pub patch: CellPatch,
}

/// Fully resolved style of one table cell. Cell text is always black.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellStyle {
    pub bold: bool,
    pub background: Option<Color>,
    pub align: TextAlign,
}

impl CellStyle {
    fn apply(&mut self, patch: &CellPatch) {
        if let Some(bold) = patch.bold {
            self.bold = bold;
        }
        if let Some(bg) = patch.background {
            self.background = Some(bg);
        }
        if let Some(align) = patch.align {
            self.align = align;
        }
    }

    pub fn text_style(&self, size: f64) -> TextStyle {
        if self.bold {
            TextStyle::bold(size)
        } else {
            TextStyle::regular(size)
        }
    }
}

/// Grid stroke drawn on every cell edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub width: f64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    pub font_size: f64,
    pub padding: Edges,
    pub grid: Option<GridLine>,
    pub rules: Vec<StyleRule>,
}

impl TableStyle {
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            padding: Edges::symmetric(3.0, 6.0),
            grid: None,
            rules: Vec::new(),
        }
    }

    pub fn padding(mut self, padding: Edges) -> Self {
        self.padding = padding;
        self
    }

    pub fn grid(mut self, width: f64, color: Color) -> Self {
        self.grid = Some(GridLine { width, color });
        self
    }

    /// Append a rule. It takes precedence over every rule added before it.
    pub fn rule(mut self, rows: RowSelector, cols: ColumnSelector, patch: CellPatch) -> Self {
        self.rules.push(StyleRule { rows, cols, patch });
        self
    }

    /// Resolve the style of cell (`row`, `col`) in a table of `row_count` rows.
    pub fn cell_style(&self, row: usize, col: usize, row_count: usize) -> CellStyle {
        let mut style = CellStyle::default();
        for rule in &self.rules {
            if rule.rows.matches(row, row_count) && rule.cols.matches(col) {
                style.apply(&rule.patch);
            }
        }
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parses_short_and_long_forms() {
        let c = Color::hex("#cccccc");
        assert!((c.r - 0.8).abs() < 0.001);
        let short = Color::hex("#ccc");
        assert_eq!(c, short);
        assert_eq!(Color::hex("nonsense"), Color::BLACK);
    }

    #[test]
    fn test_later_rules_win() {
        let style = TableStyle::new(8.5)
            .rule(RowSelector::Body, ColumnSelector::From(1), CellPatch::align(TextAlign::Right))
            .rule(RowSelector::Body, ColumnSelector::From(1), CellPatch::align(TextAlign::Center));
        assert_eq!(style.cell_style(1, 2, 3).align, TextAlign::Center);
        assert_eq!(style.cell_style(1, 0, 3).align, TextAlign::Left);
    }

    #[test]
    fn test_header_and_last_row_selectors() {
        let style = TableStyle::new(9.0)
            .rule(RowSelector::Header, ColumnSelector::All, CellPatch::bold())
            .rule(RowSelector::Last, ColumnSelector::All, CellPatch::background(Color::WHITE));
        assert!(style.cell_style(0, 3, 4).bold);
        assert!(!style.cell_style(1, 3, 4).bold);
        assert_eq!(style.cell_style(3, 0, 4).background, Some(Color::WHITE));
        assert_eq!(style.cell_style(2, 0, 4).background, None);
    }

    #[test]
    fn test_patch_only_touches_set_fields() {
        let style = TableStyle::new(9.0)
            .rule(RowSelector::All, ColumnSelector::All, CellPatch::bold().with_background(Color::WHITE))
            .rule(RowSelector::All, ColumnSelector::Col(1), CellPatch::align(TextAlign::Right));
        let cell = style.cell_style(0, 1, 1);
        assert!(cell.bold);
        assert_eq!(cell.background, Some(Color::WHITE));
        assert_eq!(cell.align, TextAlign::Right);
    }
}
