//! Estimate: like an invoice, with the car diagram under the vehicle table,
//! bulleted work items, no MOT, and an "Estimate Total".

use crate::config::RenderConfig;
use crate::layout::{Canvas, ImageBlock, PageFlow, RenderedDocument};
use crate::model::{EstimateRecord, Metadata};

use super::{
    base_totals_rows, line_item_table, vehicle_table, work_description, Assets, CompanyHeader,
    Emphasis, TotalsFooter, TotalsRow, VEHICLE_GAP,
};

const TERMS_RATIO: f64 = 0.55;
const DIAGRAM_RATIO: f64 = 0.48;

pub fn render(record: &EstimateRecord, config: &RenderConfig) -> RenderedDocument {
    let geometry = config.page;
    let assets = Assets::load(&config.assets);
    let header = company_header(record, &assets);
    let left = geometry.left();
    let pw = geometry.content_width();

    let mut flow = PageFlow::start(Canvas::new(geometry), Some(&header));

    flow.place("vehicle", &vehicle_table(&record.vehicle, pw), left, 0.0);
    if let Some(diagram) = &assets.diagram {
        flow.advance(6.0);
        let block = ImageBlock::with_width(diagram.clone(), pw * DIAGRAM_RATIO);
        flow.place("diagram", &block, left, 0.0);
    }
    flow.advance(VEHICLE_GAP);

    work_description(&mut flow, record.work_title.as_deref(), &record.work_items, "\u{2022}   ");

    flow.place("labour", &line_item_table("Labour", &record.labour, pw), left, 8.0);
    flow.place("parts", &line_item_table("Parts", &record.parts, pw), left, 15.0);

    let totals = record.totals.resolve(false);
    let mut rows = base_totals_rows(&totals);
    rows.push(TotalsRow::new("Estimate Total", totals.total, Emphasis::Highlight));
    let footer = TotalsFooter::new(&rows, TERMS_RATIO, pw);
    flow.place("footer", &footer, left, 0.0);

    flow.finish().with_metadata(Metadata {
        title: Some(format!("Estimate {}", record.estimate.number)),
        author: Some(record.company.name.clone()),
        subject: Some(format!("Vehicle {}", record.vehicle.reg)),
    })
}

pub(crate) fn company_header<'a>(record: &'a EstimateRecord, assets: &Assets) -> CompanyHeader<'a> {
    let est = &record.estimate;
    let details = vec![
        ("Estimate Date:", est.date.to_string()),
        ("Account No:", est.account_no.to_string()),
        ("Order Ref:", est.order_ref.to_string()),
        ("Estimate Valid to:", est.valid_to.to_string()),
    ];
    CompanyHeader::new(
        &record.company,
        &record.customer,
        "Estimate",
        est.number.to_string(),
        details,
        assets.logo.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::DrawCommand;
    use crate::samples;

    fn record() -> EstimateRecord {
        let request = samples::request(crate::model::DocumentKind::Estimate);
        serde_json::from_value(request.data).unwrap()
    }

    fn no_assets() -> RenderConfig {
        let mut config = RenderConfig::default();
        config.assets.search_dirs.clear();
        config
    }

    #[test]
    fn test_items_are_bulleted() {
        let doc = render(&record(), &no_assets());
        let bullets = doc
            .pages
            .iter()
            .flat_map(|p| p.elements.iter())
            .filter(|e| matches!(e, DrawCommand::Text { text, .. } if text.starts_with("\u{2022}   ")))
            .count();
        assert_eq!(bullets, record().work_items.len());
    }

    #[test]
    fn test_no_diagram_block_without_asset() {
        let doc = render(&record(), &no_assets());
        assert_eq!(doc.blocks_named("diagram").count(), 0);
        let vehicle = doc.blocks_named("vehicle").next().unwrap();
        let title = doc.blocks_named("work_title").next().unwrap();
        assert!((vehicle.top - vehicle.height - VEHICLE_GAP - title.top).abs() < 1e-9);
    }

    #[test]
    fn test_diagram_sits_under_vehicle_table() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("car_diagram.png"), crate::image_loader::png_bytes(355, 274)).unwrap();
        let mut config = no_assets();
        config.assets.search_dirs.push(dir.path().to_path_buf());

        let doc = render(&record(), &config);
        let vehicle = doc.blocks_named("vehicle").next().unwrap();
        let diagram = doc.blocks_named("diagram").next().unwrap();
        assert!((vehicle.top - vehicle.height - 6.0 - diagram.top).abs() < 1e-9);
        let expected_h = config.page.content_width() * DIAGRAM_RATIO * 274.0 / 355.0;
        assert!((diagram.height - expected_h).abs() < 1e-9);
    }
}
