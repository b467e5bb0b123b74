//! Job sheet: the workshop's copy. No prices; blank labour and parts tables
//! to fill in by hand, the car diagram for marking damage, and the customer
//! sign-off.

use crate::config::RenderConfig;
use crate::layout::table::{Table, TableBlock};
use crate::layout::{Canvas, ImageBlock, PageFlow, RenderedDocument};
use crate::model::{JobSheetRecord, Metadata, OilSpec};
use crate::style::{CellPatch, Color, ColumnSelector, Edges, RowSelector, TableStyle, TextAlign, TextStyle};

use super::{cells, col_widths, vehicle_table, Assets, JobSheetHeader, BORDER_COLOR, HEADER_BG, STATUTORY_RIGHTS, TERMS_LINES, VEHICLE_GAP};

const DIAGRAM_RATIO: f64 = 0.28;
/// Room the diagram needs below itself so it is not stranded at the foot of
/// a page without the sign-off.
const DIAGRAM_RESERVE: f64 = 80.0;
const HEADER_ROW_HEIGHT: f64 = 20.0;
const BLANK_ROW_HEIGHT: f64 = 22.0;
const TERMS_STEP: f64 = 9.0;
/// Terms lines, the statutory line and the signature.
const TERMS_ROOM: f64 = TERMS_LINES.len() as f64 * TERMS_STEP + 25.0;
const SIGNATURE: &str = "Signed ________________          Date ________________";

pub fn render(record: &JobSheetRecord, config: &RenderConfig) -> RenderedDocument {
    let geometry = config.page;
    let assets = Assets::load(&config.assets);
    let header = JobSheetHeader::new(&record.customer, &record.doc);
    let left = geometry.left();
    let pw = geometry.content_width();

    let mut flow = PageFlow::start(Canvas::new(geometry), Some(&header));

    flow.place("vehicle", &vehicle_table(&record.vehicle, pw), left, 0.0);
    flow.advance(VEHICLE_GAP);

    let text = TextStyle::regular(9.0);
    for line in &record.work_description {
        flow.text_run("description", 14.0, 13.0, |canvas, y| canvas.draw_string(left, y, line, text));
    }
    flow.advance(2.0);
    for spec in &record.oil_specs {
        let line = oil_spec_line(spec);
        flow.text_run("oil_spec", 14.0, 13.0, |canvas, y| canvas.draw_string(left, y, &line, text));
    }
    flow.advance(4.0);

    let labour = blank_table(&["Labour", "Tech", "Qty", "Done"], &[0.64, 0.12, 0.12, 0.12], record.labour_rows, pw);
    flow.place("labour", &labour, left, 8.0);
    let parts = blank_table(&["Parts", "Part No.", "Done"], &[0.64, 0.24, 0.12], record.parts_rows, pw);
    flow.place("parts", &parts, left, 6.0);

    if let Some(diagram) = &assets.diagram {
        let block = ImageBlock::with_width(diagram.clone(), pw * DIAGRAM_RATIO);
        flow.place_reserving("diagram", &block, left, DIAGRAM_RESERVE, 6.0);
    }

    // Checked for room once; the lines below are drawn without further breaks.
    flow.text_run("terms", TERMS_ROOM, TERMS_LINES.len() as f64 * TERMS_STEP + 12.0, |canvas, y| {
        let mut y = y;
        for line in TERMS_LINES {
            canvas.draw_string(left, y, line, TextStyle::regular(7.0));
            y -= TERMS_STEP;
        }
        canvas.draw_string(left, y, STATUTORY_RIGHTS, TextStyle::bold(7.0));
        y -= 12.0;
        canvas.draw_string(left, y, SIGNATURE, TextStyle::regular(7.5));
    });

    flow.finish().with_metadata(Metadata {
        title: Some(format!("Job Sheet {}", record.doc.reference)),
        author: None,
        subject: Some(format!("Vehicle {}", record.vehicle.reg)),
    })
}

fn oil_spec_line(spec: &OilSpec) -> String {
    format!(
        "All Temperatures    {}    {}    {}",
        spec.viscosity, spec.fiat_ref, spec.category
    )
}

/// Header row plus `rows` empty write-in rows. Zero rows leaves just the
/// header.
fn blank_table(headings: &[&str], ratios: &[f64], rows: usize, pw: f64) -> TableBlock {
    let style = TableStyle::new(8.5)
        .padding(Edges::symmetric(3.0, 6.0))
        .grid(0.5, Color::hex(BORDER_COLOR))
        .rule(
            RowSelector::Header,
            ColumnSelector::All,
            CellPatch::align(TextAlign::Center)
                .with_bold(true)
                .with_background(Color::hex(HEADER_BG)),
        )
        .rule(RowSelector::Body, ColumnSelector::All, CellPatch::align(TextAlign::Center))
        .rule(RowSelector::Body, ColumnSelector::Col(0), CellPatch::align(TextAlign::Left));

    let mut body = vec![cells(headings)];
    body.extend(std::iter::repeat(vec![String::new(); headings.len()]).take(rows));
    let mut heights = vec![HEADER_ROW_HEIGHT];
    heights.extend(std::iter::repeat(BLANK_ROW_HEIGHT).take(rows));

    Table::new(body, col_widths(pw, ratios), style)
        .with_row_heights(heights)
        .measure()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Block;

    #[test]
    fn test_blank_table_heights() {
        let t = blank_table(&["Labour", "Tech", "Qty", "Done"], &[0.64, 0.12, 0.12, 0.12], 5, 535.28);
        assert_eq!(t.row_count(), 6);
        assert_eq!(t.height(), 20.0 + 5.0 * 22.0);
    }

    #[test]
    fn test_zero_rows_leaves_header_only() {
        let t = blank_table(&["Parts", "Part No.", "Done"], &[0.64, 0.24, 0.12], 0, 535.28);
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.height(), 20.0);
    }

    #[test]
    fn test_oil_spec_line_format() {
        let spec = OilSpec {
            viscosity: "-Vinjb97403=5w-40".into(),
            fiat_ref: "Fiat 9.55535-S2,".into(),
            category: "Sm/C3".into(),
        };
        assert_eq!(
            oil_spec_line(&spec),
            "All Temperatures    -Vinjb97403=5w-40    Fiat 9.55535-S2,    Sm/C3"
        );
    }

    #[test]
    fn test_terms_room_covers_lines_and_signature() {
        assert_eq!(TERMS_ROOM, 79.0);
    }
}
