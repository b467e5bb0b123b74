//! Sample requests for each document kind, printed by `motordocs --example`
//! and used throughout the tests.

use serde_json::{json, Value};

use crate::model::{DocumentKind, RenderRequest};

fn company() -> Value {
    json!({
        "name": "ELI MOTORS LIMITED",
        "address_line1": "49 VICTORIA ROAD, HENDON, LONDON, NW4 2RP",
        "phone": "020 8203 6449, Sales 07950 250970",
        "website": "www.elimotors.co.uk",
        "vat": "330 9339 65"
    })
}

fn invoice() -> Value {
    json!({
        "company": company(),
        "customer": {
            "name": "Hendon United Synagogue",
            "address_lines": ["18 Raleigh Close", "Hendon", "London", "NW4 2TA"],
            "mobile": "07977202780"
        },
        "invoice": {
            "number": "89973",
            "invoice_date": "",
            "account_no": "HEN025",
            "order_ref": "",
            "date_of_work": "04/02/2026",
            "payment_date": "",
            "payment_method": ""
        },
        "vehicle": {
            "reg": "ST67 WKY", "make": "Hyundai", "model": "Ioniq Premium Se Hev",
            "chassis": "Kmhc851cvju066654", "mileage": "76720",
            "engine_no": "G4LEHU531668", "engine_code": "G4LE", "engine_cc": 1580,
            "date_reg": "14/02/2018", "colour": "Blue"
        },
        "work_title": "Carried Out A Small Service",
        "work_items": [
            "Replaced Engine Oil And Filter.",
            "Topped Up All Under Bonnet Levels.",
            "Checked External Lighting Operation.",
            "Checked Front And Rear Brake Condition. Adjusted Tyre Pressure's.",
            "Carried Out Road Test (See Report For Any Defects Found)."
        ],
        "mot": [
            { "description": "Carry Out Mot Test", "qty": 1, "status": "" }
        ],
        "labour": [
            { "description": "", "qty": 1, "unit": 140.00, "d": "", "subtotal": 140.00 }
        ],
        "parts": [
            { "description": "Engine Oil", "qty": 4, "unit": 11.95, "d": "", "subtotal": 47.80 },
            { "description": "Oilfilter", "qty": 1, "unit": 10.90, "d": "", "subtotal": 10.90 },
            { "description": "Sundries + Ppe +Solvent", "qty": 1, "unit": 4.50, "d": "", "subtotal": 4.50 },
            { "description": "Seal", "qty": 1, "unit": 1.75, "d": "", "subtotal": 1.75 }
        ],
        "totals": {
            "labour": 140.00, "parts": 64.95, "subtotal": 204.95,
            "vat_rate": 20, "vat": 40.99, "mot": 45.00,
            "total": 290.94, "balance": 290.94
        }
    })
}

fn estimate() -> Value {
    json!({
        "company": company(),
        "customer": {
            "name": "Mr Sassoon",
            "address_lines": ["5 Holmbrook Drive", "London", "NW42LT"],
            "tel": "02082025738"
        },
        "estimate": {
            "number": 6036,
            "date": "05/01/2026",
            "account_no": "SAS010",
            "order_ref": "",
            "valid_to": "04/02/2026"
        },
        "vehicle": {
            "reg": "LD13 KLO", "make": "Ford", "model": "Focus Zetec",
            "chassis": "Wf0kxxgcbkdp46303", "mileage": "",
            "engine_no": "DP46303", "engine_code": "PNDA", "engine_cc": 1596,
            "date_reg": "20/06/2013", "colour": "Black"
        },
        "work_title": "Investigate Loss Of Power Steering + Estimate",
        "work_items": [
            "Investigated Reported Loss Of Power Steering Following Impact",
            "Confirmed Power Steering Pipe Had Snapped Due To The Force Of The Collision",
            "Replaced Power Steering Fluid Container",
            "Refilled System With Correct Oil And Checked For Leaks",
            "Removed Damaged Rear Bumper Assembly",
            "Drilled Out Reverse Parking Sensors From Old Bumper And Transferred To New Bumper",
            "Supplied And Fitted New Rear Bumper Assembly (Pre-Painted From Manufacturer \u{2013} No Paint Required)",
            "Replaced Rear Bumper Lower Skirting",
            "Replaced Rear Bumper Enforcer",
            "Replaced Rear Bumper Corner Brackets (Nearside And Offside)",
            "Replaced Offside Rear Fog Lamp",
            "Reassembled Rear Bumper And All Listed Components",
            "Checked Sensor Operation, Alignment, And Fixings",
            "Final Inspection And Functionality Checks Completed"
        ],
        "labour": [
            { "description": "Body Work Labour", "qty": 1, "unit": 280.00, "d": "", "subtotal": 280.00 }
        ],
        "parts": [
            { "description": "Rear Bumper Assembly", "qty": 1, "unit": 480.98, "d": "", "subtotal": 480.98 },
            { "description": "Lower Bumper Skirting", "qty": 1, "unit": 98.76, "d": "", "subtotal": 98.76 },
            { "description": "Offside Rear Fog Lamp", "qty": 1, "unit": 18.58, "d": "", "subtotal": 18.58 },
            { "description": "Rear Bumper Corner Brackets Nearside And Offside", "qty": 2, "unit": 37.44, "d": "", "subtotal": 74.88 },
            { "description": "Power Steering Container", "qty": 1, "unit": 36.13, "d": "", "subtotal": 36.13 },
            { "description": "5/30 Oil", "qty": 1, "unit": 15.89, "d": "", "subtotal": 15.89 },
            { "description": "Rear Bumper Enforcer", "qty": 1, "unit": 128.09, "d": "", "subtotal": 128.09 },
            { "description": "Valet To Prepare Vehicle", "qty": 1, "unit": 25.00, "d": "", "subtotal": 25.00 }
        ],
        "totals": {
            "labour": 280.00, "parts": 878.31, "subtotal": 1158.31,
            "vat_rate": 20, "vat": 231.68, "total": 1389.99
        }
    })
}

fn jobsheet() -> Value {
    json!({
        "customer": {
            "name": "Mr Marc Ressel",
            "address_lines": ["13 Inglis Way", "London", "NW7 1FJ"],
            "mobile": "07376200273"
        },
        "doc": {
            "reference": "JS 92379",
            "account_no": "RES002",
            "order_ref": "",
            "receive_date": "10/02/2026",
            "due_date": "10/02/2026",
            "status": "~",
            "technician": ""
        },
        "vehicle": {
            "reg": "YM14 NFL", "make": "Fiat", "model": "500 Lounge Dualogic",
            "chassis": "Zfa3120000j231253", "mileage": "",
            "engine_no": "0905801", "engine_code": "169A4000", "engine_cc": 1242,
            "date_reg": "01/08/2014", "colour": "Black"
        },
        "work_description": [
            "Carry Out Mot", "", "Carry Out Small Service", "", "2.9 Litres"
        ],
        "oil_specs": [
            { "viscosity": "-Vinjb97403=5w-40", "fiat_ref": "Fiat 9.55535-S2,", "category": "Sm/C3" },
            { "viscosity": "Vinjb97404-=0w-20", "fiat_ref": "Fiat 9.55535-Dm1,", "category": "Sm/C5" }
        ],
        "labour_rows": 5,
        "parts_rows": 5
    })
}

/// A complete request for `kind`, writing to `<tmp>/<kind>_output.pdf`.
pub fn request(kind: DocumentKind) -> RenderRequest {
    let data = match kind {
        DocumentKind::Invoice => invoice(),
        DocumentKind::Estimate => estimate(),
        DocumentKind::JobSheet => jobsheet(),
    };
    RenderRequest {
        kind: kind.as_str().to_string(),
        data,
        output_file: std::env::temp_dir().join(format!("{}_output.pdf", kind)),
    }
}

/// [`request`] as pretty-printed JSON, ready to pipe back into the CLI.
pub fn request_json(kind: DocumentKind) -> String {
    serde_json::to_string_pretty(&request(kind)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EstimateRecord, InvoiceRecord, JobSheetRecord};

    #[test]
    fn test_samples_decode_into_records() {
        let inv: InvoiceRecord = serde_json::from_value(request(DocumentKind::Invoice).data).unwrap();
        assert_eq!(inv.work_items.len(), 5);
        assert_eq!(inv.parts.len(), 4);

        let est: EstimateRecord = serde_json::from_value(request(DocumentKind::Estimate).data).unwrap();
        assert_eq!(est.work_items.len(), 14);
        assert_eq!(est.estimate.number.to_string(), "6036");

        let js: JobSheetRecord = serde_json::from_value(request(DocumentKind::JobSheet).data).unwrap();
        assert_eq!(js.oil_specs.len(), 2);
        assert_eq!((js.labour_rows, js.parts_rows), (5, 5));
    }

    #[test]
    fn test_request_json_parses_back() {
        let text = request_json(DocumentKind::JobSheet);
        let parsed: RenderRequest = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.kind, "jobsheet");
        assert!(parsed.output_file.ends_with("jobsheet_output.pdf"));
    }
}
