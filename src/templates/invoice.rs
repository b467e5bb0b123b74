//! Invoice: company header, vehicle, work done, MOT, labour, parts, then
//! the terms and totals footer.

use crate::config::RenderConfig;
use crate::layout::table::{Table, TableBlock};
use crate::layout::{Canvas, PageFlow, RenderedDocument};
use crate::model::{InvoiceRecord, Metadata, MotItem};
use crate::style::{CellPatch, ColumnSelector, RowSelector, TextAlign};

use super::{
    base_totals_rows, cells, col_widths, data_table_style, line_item_table, vehicle_table,
    work_description, Assets, CompanyHeader, Emphasis, TotalsFooter, TotalsRow, VEHICLE_GAP,
};

const TERMS_RATIO: f64 = 0.50;

pub fn render(record: &InvoiceRecord, config: &RenderConfig) -> RenderedDocument {
    let geometry = config.page;
    let assets = Assets::load(&config.assets);
    let header = company_header(record, &assets);
    let left = geometry.left();
    let pw = geometry.content_width();

    let mut flow = PageFlow::start(Canvas::new(geometry), Some(&header));

    flow.place("vehicle", &vehicle_table(&record.vehicle, pw), left, 0.0);
    flow.advance(VEHICLE_GAP);

    work_description(&mut flow, record.work_title.as_deref(), &record.work_items, "- ");

    if !record.mot.is_empty() {
        flow.place("mot", &mot_table(&record.mot, pw), left, 8.0);
    }
    flow.place("labour", &line_item_table("Labour", &record.labour, pw), left, 8.0);
    flow.place("parts", &line_item_table("Parts", &record.parts, pw), left, 15.0);

    let footer = TotalsFooter::new(&totals_rows(record), TERMS_RATIO, pw);
    flow.place("footer", &footer, left, 0.0);

    flow.finish().with_metadata(Metadata {
        title: Some(format!("Invoice {}", record.invoice.number)),
        author: Some(record.company.name.clone()),
        subject: Some(format!("Vehicle {}", record.vehicle.reg)),
    })
}

pub(crate) fn company_header<'a>(record: &'a InvoiceRecord, assets: &Assets) -> CompanyHeader<'a> {
    let inv = &record.invoice;
    let details = vec![
        ("Invoice Date:", inv.invoice_date.to_string()),
        ("Account No:", inv.account_no.to_string()),
        ("Order Ref:", inv.order_ref.to_string()),
        ("Date of Work:", inv.date_of_work.to_string()),
        ("Payment Date:", inv.payment_date.to_string()),
        ("Payment Method:", inv.payment_method.to_string()),
    ];
    CompanyHeader::new(
        &record.company,
        &record.customer,
        "Invoice",
        inv.number.to_string(),
        details,
        assets.logo.clone(),
    )
}

/// Data table with the Qty and Status columns centred.
fn mot_table(items: &[MotItem], pw: f64) -> TableBlock {
    let style = data_table_style().rule(
        RowSelector::Body,
        ColumnSelector::From(1),
        CellPatch::align(TextAlign::Center),
    );
    let mut rows = vec![cells(&["MOT", "Qty", "Status"])];
    rows.extend(
        items
            .iter()
            .map(|m| vec![m.description.clone(), m.qty.to_string(), m.status.to_string()]),
    );
    Table::new(rows, col_widths(pw, &[0.72, 0.14, 0.14]), style).measure()
}

fn totals_rows(record: &InvoiceRecord) -> Vec<TotalsRow> {
    let totals = record.totals.resolve(true);
    let mut rows = base_totals_rows(&totals);
    if let Some(mot) = totals.mot {
        rows.push(TotalsRow::new("MOT", mot, Emphasis::Plain));
    }
    rows.push(TotalsRow::new("Total", totals.total, Emphasis::Highlight));
    if let Some(balance) = totals.balance {
        rows.push(TotalsRow::new("Balance", balance, Emphasis::Plain));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Totals;

    fn record(totals: Totals) -> InvoiceRecord {
        let json = serde_json::json!({
            "company": { "name": "ELI MOTORS LIMITED", "address_line1": "49 VICTORIA ROAD",
                         "phone": "020 8203 6449", "website": "www.elimotors.co.uk", "vat": "330 9339 65" },
            "customer": { "name": "Hendon United Synagogue", "address_lines": ["18 Raleigh Close"] },
            "invoice": { "number": "89973" },
            "vehicle": { "reg": "ST67 WKY", "make": "Hyundai", "model": "Ioniq", "chassis": "K",
                         "engine_no": "G4", "engine_code": "G4LE", "engine_cc": 1580,
                         "date_reg": "14/02/2018", "colour": "Blue" },
        });
        let mut record: InvoiceRecord = serde_json::from_value(json).unwrap();
        record.totals = totals;
        record
    }

    #[test]
    fn test_totals_rows_include_mot_and_balance_when_present() {
        let r = record(Totals {
            labour: 140.0,
            parts: 64.95,
            mot: Some(45.0),
            balance: Some(290.94),
            ..Default::default()
        });
        let labels: Vec<String> = totals_rows(&r).into_iter().map(|row| row.label).collect();
        assert_eq!(
            labels,
            vec!["Labour", "Parts", "SubTotal", "VAT (20%)", "MOT", "Total", "Balance"]
        );
    }

    #[test]
    fn test_totals_rows_without_optional_rows() {
        let r = record(Totals {
            labour: 10.0,
            ..Default::default()
        });
        let rows = totals_rows(&r);
        assert_eq!(rows.len(), 5);
        let last = rows.last().unwrap();
        assert_eq!(last.label, "Total");
        assert_eq!(last.emphasis, Emphasis::Highlight);
    }

    #[test]
    fn test_mot_table_centres_qty_and_status() {
        let items = vec![MotItem {
            description: "Carry Out Mot Test".into(),
            qty: crate::model::Scalar::Int(1),
            status: crate::model::Scalar::default(),
        }];
        let t = mot_table(&items, 535.28);
        assert_eq!(t.row_count(), 2);
        let style = data_table_style().rule(
            RowSelector::Body,
            ColumnSelector::From(1),
            CellPatch::align(TextAlign::Center),
        );
        assert_eq!(style.cell_style(1, 1, 2).align, TextAlign::Center);
        assert_eq!(style.cell_style(1, 0, 2).align, TextAlign::Left);
    }
}
