//! # Table Layout
//!
//! Tables are measured once, when [`Table::measure`] turns them into a
//! [`TableBlock`]. Row heights come from the caller when given (blank
//! write-in tables), otherwise from the tallest cell in the row: each cell
//! needs one line per `\n`-separated segment at 1.2× the font size, plus the
//! style's vertical padding.
//!
//! Drawing happens in three passes so later layers sit on top: cell
//! backgrounds, grid lines, then text.

use crate::font::StandardFontMetrics;
use crate::style::{TableStyle, TextAlign};

use super::{Block, Canvas};

/// Line height of cell text, as a multiple of the font size.
const CELL_LEADING: f64 = 1.2;

#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<Vec<String>>,
    col_widths: Vec<f64>,
    row_heights: Option<Vec<f64>>,
    style: TableStyle,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>, col_widths: Vec<f64>, style: TableStyle) -> Self {
        Self {
            rows,
            col_widths,
            row_heights: None,
            style,
        }
    }

    /// Use fixed row heights instead of measuring the cells.
    pub fn with_row_heights(mut self, heights: Vec<f64>) -> Self {
        self.row_heights = Some(heights);
        self
    }

    pub fn measure(self) -> TableBlock {
        let heights: Vec<f64> = match &self.row_heights {
            Some(fixed) => (0..self.rows.len())
                .map(|i| fixed.get(i).copied().unwrap_or_else(|| self.natural_row_height(i)))
                .collect(),
            None => (0..self.rows.len()).map(|i| self.natural_row_height(i)).collect(),
        };
        let height = heights.iter().sum();
        TableBlock {
            table: self,
            heights,
            height,
        }
    }

    fn natural_row_height(&self, row: usize) -> f64 {
        let lines = self.rows[row]
            .iter()
            .map(|cell| line_count(cell))
            .max()
            .unwrap_or(1);
        lines as f64 * CELL_LEADING * self.style.font_size + self.style.padding.vertical()
    }
}

fn line_count(cell: &str) -> usize {
    cell.split('\n').count().max(1)
}

/// A table with every row height decided.
#[derive(Debug, Clone)]
pub struct TableBlock {
    table: Table,
    heights: Vec<f64>,
    height: f64,
}

impl TableBlock {
    pub fn row_heights(&self) -> &[f64] {
        &self.heights
    }

    pub fn row_count(&self) -> usize {
        self.table.rows.len()
    }

    pub fn width(&self) -> f64 {
        self.table.col_widths.iter().sum()
    }

    /// (x offset, width) of every column.
    fn columns(&self) -> Vec<(f64, f64)> {
        let mut x = 0.0;
        self.table
            .col_widths
            .iter()
            .map(|&w| {
                let col = (x, w);
                x += w;
                col
            })
            .collect()
    }

    /// y of each row's bottom edge, top row first.
    fn row_bottoms(&self, y_bottom: f64) -> Vec<f64> {
        let mut top = y_bottom + self.height;
        self.heights
            .iter()
            .map(|&h| {
                top -= h;
                top
            })
            .collect()
    }
}

impl Block for TableBlock {
    fn height(&self) -> f64 {
        self.height
    }

    fn draw_on(&self, canvas: &mut Canvas, x: f64, y_bottom: f64) {
        let style = &self.table.style;
        let row_count = self.row_count();
        let columns = self.columns();
        let bottoms = self.row_bottoms(y_bottom);

        for (r, &row_bottom) in bottoms.iter().enumerate() {
            for (c, &(cx, cw)) in columns.iter().enumerate() {
                if let Some(bg) = style.cell_style(r, c, row_count).background {
                    canvas.fill_rect(x + cx, row_bottom, cw, self.heights[r], bg);
                }
            }
        }

        if let Some(grid) = style.grid {
            let width = self.width();
            let top = y_bottom + self.height;
            canvas.line(x, top, x + width, top, grid.width, grid.color);
            for &row_bottom in &bottoms {
                canvas.line(x, row_bottom, x + width, row_bottom, grid.width, grid.color);
            }
            canvas.line(x, y_bottom, x, top, grid.width, grid.color);
            for &(cx, cw) in &columns {
                canvas.line(x + cx + cw, y_bottom, x + cx + cw, top, grid.width, grid.color);
            }
        }

        let size = style.font_size;
        let cap = StandardFontMetrics::CAP_HEIGHT * size / 1000.0;
        let leading = CELL_LEADING * size;
        for (r, &row_bottom) in bottoms.iter().enumerate() {
            let row_h = self.heights[r];
            for (c, &(cx, cw)) in columns.iter().enumerate() {
                let Some(text) = self.table.rows[r].get(c) else {
                    continue;
                };
                if text.is_empty() {
                    continue;
                }
                let cell = style.cell_style(r, c, row_count);
                let text_style = cell.text_style(size);

                let lines: Vec<&str> = text.split('\n').collect();
                let block_h = (lines.len() - 1) as f64 * leading + cap;
                let mut baseline = row_bottom + (row_h + block_h) / 2.0 - cap;

                let left = x + cx + style.padding.left;
                let right = x + cx + cw - style.padding.right;
                for line in lines {
                    match cell.align {
                        TextAlign::Left => canvas.draw_string(left, baseline, line, text_style),
                        TextAlign::Right => canvas.draw_right_string(right, baseline, line, text_style),
                        TextAlign::Center => {
                            canvas.draw_centred_string((left + right) / 2.0, baseline, line, text_style)
                        }
                    }
                    baseline -= leading;
                }
            }
        }
    }
}
