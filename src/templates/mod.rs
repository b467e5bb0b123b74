//! # Document Templates
//!
//! One assembler per document kind, each a fixed sequence of content blocks
//! pushed through a [`PageFlow`]. The blocks the kinds have in common live
//! here: the vehicle summary, the priced line-item tables, the work
//! description, and the terms-and-totals footer.

pub mod estimate;
pub mod header;
pub mod invoice;
pub mod jobsheet;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{AssetConfig, RenderConfig};
use crate::error::DocError;
use crate::image_loader::LoadedImage;
use crate::layout::paragraph::{Paragraph, ParagraphBlock};
use crate::layout::table::{Table, TableBlock};
use crate::layout::{Block, Canvas, PageFlow, RenderedDocument};
use crate::model::validate::check_required;
use crate::model::{DocumentKind, LineItem, ResolvedTotals, Vehicle};
use crate::style::{CellPatch, Color, ColumnSelector, Edges, RowSelector, TableStyle, TextAlign, TextStyle};

pub use header::{CompanyHeader, JobSheetHeader};

pub(crate) const HEADER_BG: &str = "#d9d9d9";
pub(crate) const BORDER_COLOR: &str = "#cccccc";
pub(crate) const TOTAL_HIGHLIGHT: &str = "#e8e8e8";

const VEHICLE_COL_RATIOS: [f64; 5] = [0.18, 0.15, 0.22, 0.28, 0.17];
const LINE_ITEM_COL_RATIOS: [f64; 5] = [0.52, 0.10, 0.14, 0.10, 0.14];

/// Gap between the vehicle section and the work description.
pub(crate) const VEHICLE_GAP: f64 = 30.0;

pub(crate) const TERMS_LINES: [&str; 6] = [
    "I agree to pay for all work and parts required for the repairs described above at your",
    "retail charge. It is understood that any estimate given is provisional and all repairs are",
    "undertaken on a cash basis unless prior arrangements for credit have been approved.",
    "Any additional work found to be necessary must be authorised by myself prior to",
    "commencement.  All goods shall remain the property of the seller until paid for in full.",
    "I have read and accept your terms and conditions.",
];

pub(crate) const STATUTORY_RIGHTS: &str =
    "Nothing herein is designed to nor will it affect a customers statutory rights";

/// Validate `data` for `kind`, decode it, and lay it out.
pub fn render(kind: DocumentKind, data: &Value, config: &RenderConfig) -> Result<RenderedDocument, DocError> {
    check_required(kind, data)?;
    let document = match kind {
        DocumentKind::Invoice => invoice::render(&decode(kind, data)?, config),
        DocumentKind::Estimate => estimate::render(&decode(kind, data)?, config),
        DocumentKind::JobSheet => jobsheet::render(&decode(kind, data)?, config),
    };
    log::debug!(
        "laid out {} with {} page(s), {} block(s)",
        kind,
        document.page_count(),
        document.blocks.len()
    );
    Ok(document)
}

fn decode<T: DeserializeOwned>(kind: DocumentKind, data: &Value) -> Result<T, DocError> {
    serde_json::from_value(data.clone()).map_err(|source| DocError::InvalidRecord { kind, source })
}

/// Images used by a template, looked up once per render.
#[derive(Debug, Clone, Default)]
pub(crate) struct Assets {
    pub logo: Option<Arc<LoadedImage>>,
    pub diagram: Option<Arc<LoadedImage>>,
}

impl Assets {
    pub fn load(config: &AssetConfig) -> Self {
        let locator = config.locator();
        Self {
            logo: locator.load(&config.logo),
            diagram: locator.load(&config.diagram),
        }
    }
}

/// Table with the shared grid and the given font size and padding.
fn grid_style(font_size: f64, vertical_padding: f64) -> TableStyle {
    TableStyle::new(font_size)
        .padding(Edges::symmetric(vertical_padding, 6.0))
        .grid(0.5, Color::hex(BORDER_COLOR))
}

/// Shaded bold header row, left-aligned description column, right-aligned
/// figures.
pub(crate) fn data_table_style() -> TableStyle {
    grid_style(8.5, 3.0)
        .rule(
            RowSelector::Header,
            ColumnSelector::All,
            CellPatch::align(TextAlign::Center)
                .with_bold(true)
                .with_background(Color::hex(HEADER_BG)),
        )
        .rule(RowSelector::Body, ColumnSelector::From(1), CellPatch::align(TextAlign::Right))
        .rule(RowSelector::Body, ColumnSelector::Col(0), CellPatch::align(TextAlign::Left))
}

fn vehicle_table_style() -> TableStyle {
    let label = CellPatch::bold().with_background(Color::hex(HEADER_BG));
    let value = CellPatch::background(Color::WHITE);
    grid_style(8.0, 2.0)
        .rule(RowSelector::All, ColumnSelector::All, CellPatch::align(TextAlign::Center))
        .rule(RowSelector::Row(0), ColumnSelector::All, label)
        .rule(RowSelector::Row(2), ColumnSelector::All, label)
        .rule(RowSelector::Row(1), ColumnSelector::All, value)
        .rule(RowSelector::Row(3), ColumnSelector::All, value)
}

pub(crate) fn col_widths(content_width: f64, ratios: &[f64]) -> Vec<f64> {
    ratios.iter().map(|r| content_width * r).collect()
}

pub(crate) fn vehicle_table(v: &Vehicle, content_width: f64) -> TableBlock {
    let rows = vec![
        cells(&["Registration", "Make", "Model", "Chassis Number", "Mileage"]),
        vec![
            v.reg.clone(),
            v.make.clone(),
            v.model.clone(),
            v.chassis.clone(),
            v.mileage.to_string(),
        ],
        cells(&["Engine No", "Engine Code", "Engine CC", "Date Reg", "Colour"]),
        vec![
            v.engine_no.clone(),
            v.engine_code.clone(),
            v.engine_cc.to_string(),
            v.date_reg.clone(),
            v.colour.clone(),
        ],
    ];
    Table::new(rows, col_widths(content_width, &VEHICLE_COL_RATIOS), vehicle_table_style()).measure()
}

pub(crate) fn cells(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

/// Two decimals, or blank when absent or zero.
pub(crate) fn money(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 => format!("{:.2}", v),
        _ => String::new(),
    }
}

/// Labour or parts table: Description / Qty / Unit / D / Sub Total.
pub(crate) fn line_item_table(heading: &str, items: &[LineItem], content_width: f64) -> TableBlock {
    let mut rows = vec![cells(&[heading, "Qty", "Unit", "D", "Sub Total"])];
    rows.extend(items.iter().map(|item| {
        vec![
            item.description.clone(),
            item.qty.to_string(),
            money(item.unit),
            item.d.to_string(),
            money(item.subtotal),
        ]
    }));
    Table::new(rows, col_widths(content_width, &LINE_ITEM_COL_RATIOS), data_table_style()).measure()
}

/// Optional underlined title followed by one line per work item. Each line
/// is room-checked on its own, so a long list flows onto as many pages as
/// it needs.
pub(crate) fn work_description(flow: &mut PageFlow<'_>, title: Option<&str>, items: &[String], prefix: &str) {
    let left = flow.canvas().geometry().left();
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        flow.text_run("work_title", 20.0, 16.0, |canvas, y| {
            let style = TextStyle::bold(10.0);
            let tw = canvas.string_width(title, style.font, style.size);
            canvas.draw_string(left, y, title, style);
            canvas.line(left, y - 2.0, left + tw, y - 2.0, 0.5, Color::BLACK);
        });
    }
    for item in items {
        flow.text_run("work_item", 14.0, 13.0, |canvas, y| {
            canvas.draw_string(left, y, &format!("{}{}", prefix, item), TextStyle::regular(9.0));
        });
    }
    flow.advance(10.0);
}

/// How a totals row is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Emphasis {
    Plain,
    Bold,
    /// Bold on the highlight fill; the grand total.
    Highlight,
}

pub(crate) struct TotalsRow {
    pub label: String,
    pub value: f64,
    pub emphasis: Emphasis,
}

impl TotalsRow {
    pub fn new(label: impl Into<String>, value: f64, emphasis: Emphasis) -> Self {
        Self {
            label: label.into(),
            value,
            emphasis,
        }
    }
}

/// Labour, Parts, SubTotal and VAT rows common to invoices and estimates.
pub(crate) fn base_totals_rows(t: &ResolvedTotals) -> Vec<TotalsRow> {
    vec![
        TotalsRow::new("Labour", t.labour, Emphasis::Plain),
        TotalsRow::new("Parts", t.parts, Emphasis::Plain),
        TotalsRow::new("SubTotal", t.subtotal, Emphasis::Bold),
        TotalsRow::new(t.vat_label(), t.vat, Emphasis::Plain),
    ]
}

fn totals_table(rows: &[TotalsRow], content_width: f64) -> TableBlock {
    let mut style = TableStyle::new(9.0)
        .padding(Edges::symmetric(3.0, 6.0))
        .grid(0.5, Color::hex(BORDER_COLOR))
        .rule(RowSelector::All, ColumnSelector::Col(1), CellPatch::align(TextAlign::Right));
    for (i, row) in rows.iter().enumerate() {
        style = match row.emphasis {
            Emphasis::Plain => style,
            Emphasis::Bold => style.rule(RowSelector::Row(i), ColumnSelector::All, CellPatch::bold()),
            Emphasis::Highlight => style.rule(
                RowSelector::Row(i),
                ColumnSelector::All,
                CellPatch::bold().with_background(Color::hex(TOTAL_HIGHLIGHT)),
            ),
        };
    }
    let body = rows
        .iter()
        .map(|r| vec![r.label.clone(), format!("{:.2}", r.value)])
        .collect();
    Table::new(body, col_widths(content_width, &[0.20, 0.15]), style).measure()
}

/// Terms paragraph on the left, signature line under it, totals table on
/// the right. Placed as one block.
pub(crate) struct TotalsFooter {
    terms: ParagraphBlock,
    totals: TableBlock,
    content_width: f64,
}

impl TotalsFooter {
    pub const SIGNATURE: &'static str = "Signed ________________    Date ________________";

    /// `terms_ratio` is the share of the content width the terms may use.
    pub fn new(rows: &[TotalsRow], terms_ratio: f64, content_width: f64) -> Self {
        let terms = Paragraph::new(7.0, 9.0)
            .text(&TERMS_LINES.join(" "))
            .line_break()
            .bold(STATUTORY_RIGHTS)
            .wrap(content_width * terms_ratio);
        Self {
            terms,
            totals: totals_table(rows, content_width),
            content_width,
        }
    }
}

impl Block for TotalsFooter {
    fn height(&self) -> f64 {
        self.totals.height().max(self.terms.height() + 15.0)
    }

    fn draw_on(&self, canvas: &mut Canvas, x: f64, y_bottom: f64) {
        let top = y_bottom + self.height();
        let tc_h = self.terms.height();
        self.terms.draw_on(canvas, x, top - tc_h);
        canvas.draw_string(x, top - tc_h - 12.0, Self::SIGNATURE, TextStyle::regular(7.0));
        let totals_x = x + self.content_width - self.totals.width();
        self.totals.draw_on(canvas, totals_x, top - self.totals.height());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageGeometry;
    use crate::layout::DrawCommand;
    use crate::model::{Scalar, Totals};

    #[test]
    fn test_money_blank_for_missing_or_zero() {
        assert_eq!(money(Some(11.95)), "11.95");
        assert_eq!(money(Some(140.0)), "140.00");
        assert_eq!(money(Some(0.0)), "");
        assert_eq!(money(None), "");
    }

    #[test]
    fn test_data_style_aligns_figures_right() {
        let style = data_table_style();
        assert_eq!(style.cell_style(0, 3, 4).align, TextAlign::Center);
        assert!(style.cell_style(0, 0, 4).bold);
        assert_eq!(style.cell_style(2, 0, 4).align, TextAlign::Left);
        assert_eq!(style.cell_style(2, 4, 4).align, TextAlign::Right);
        assert_eq!(style.cell_style(2, 4, 4).background, None);
    }

    #[test]
    fn test_vehicle_table_has_four_rows() {
        let v = Vehicle {
            reg: "ST67 WKY".into(),
            make: "Hyundai".into(),
            model: "Ioniq".into(),
            chassis: "KMHC851CVJU066654".into(),
            mileage: Scalar::from("76720"),
            engine_no: "G4LEHU531668".into(),
            engine_code: "G4LE".into(),
            engine_cc: Scalar::Int(1580),
            date_reg: "14/02/2018".into(),
            colour: "Blue".into(),
        };
        let t = vehicle_table(&v, 535.28);
        assert_eq!(t.row_count(), 4);
        // 8pt at 1.2 leading plus 2 + 2 padding
        assert!((t.height() - 4.0 * 13.6).abs() < 1e-9);
        assert!((t.width() - 535.28).abs() < 1e-9);
    }

    #[test]
    fn test_footer_height_is_taller_of_terms_and_totals() {
        let totals = Totals {
            labour: 140.0,
            parts: 64.95,
            ..Default::default()
        }
        .resolve(false);
        let mut rows = base_totals_rows(&totals);
        rows.push(TotalsRow::new("Total", totals.total, Emphasis::Highlight));
        let footer = TotalsFooter::new(&rows, 0.50, 535.28);
        let expected = footer.totals.height().max(footer.terms.height() + 15.0);
        assert_eq!(footer.height(), expected);
        assert!(footer.terms.line_count() >= 2);
    }

    #[test]
    fn test_footer_totals_sit_at_right_edge() {
        let totals = Totals::default().resolve(false);
        let mut rows = base_totals_rows(&totals);
        rows.push(TotalsRow::new("Estimate Total", totals.total, Emphasis::Highlight));
        let footer = TotalsFooter::new(&rows, 0.55, 500.0);
        let mut canvas = Canvas::new(PageGeometry::default());
        footer.draw_on(&mut canvas, 30.0, 100.0);
        let highlight = canvas
            .current_elements()
            .iter()
            .filter_map(|e| match e {
                DrawCommand::Rect { x, width, fill: Some(c), .. } if *c == Color::hex(TOTAL_HIGHLIGHT) => {
                    Some(x + width)
                }
                _ => None,
            })
            .fold(0.0_f64, f64::max);
        assert!((highlight - 530.0).abs() < 1e-9);
    }
}
