//! Required-field checks run before any drawing starts.
//!
//! serde would reject a record with a missing field too, but its message
//! names neither the document kind nor the full path of the field. Each kind
//! lists its required paths here; `[]` marks an array whose every element
//! must carry the rest of the path. An absent array is fine (line-item lists
//! are optional), an element without the field is not.

use serde_json::Value;

use super::DocumentKind;
use crate::error::DocError;

const VEHICLE: &[&str] = &[
    "vehicle.reg",
    "vehicle.make",
    "vehicle.model",
    "vehicle.chassis",
    "vehicle.engine_no",
    "vehicle.engine_code",
    "vehicle.engine_cc",
    "vehicle.date_reg",
    "vehicle.colour",
];

const COMPANY_AND_CUSTOMER: &[&str] = &[
    "company.name",
    "company.address_line1",
    "company.phone",
    "company.website",
    "company.vat",
    "customer.name",
    "customer.address_lines",
];

const LINE_ITEMS: &[&str] = &["labour[].description", "parts[].description"];

const INVOICE: &[&str] = &["invoice.number", "mot[].description"];

const ESTIMATE: &[&str] = &[
    "estimate.number",
    "estimate.date",
    "estimate.account_no",
    "estimate.valid_to",
];

const JOB_SHEET: &[&str] = &[
    "customer.name",
    "customer.address_lines",
    "doc.reference",
    "doc.account_no",
    "doc.receive_date",
    "doc.due_date",
];

/// All required paths for a document kind, in the order they are checked.
pub fn required_fields(kind: DocumentKind) -> Vec<&'static str> {
    let groups: &[&[&str]] = match kind {
        DocumentKind::Invoice => &[COMPANY_AND_CUSTOMER, INVOICE, VEHICLE, LINE_ITEMS],
        DocumentKind::Estimate => &[COMPANY_AND_CUSTOMER, ESTIMATE, VEHICLE, LINE_ITEMS],
        DocumentKind::JobSheet => &[JOB_SHEET, VEHICLE],
    };
    groups.iter().flat_map(|g| g.iter().copied()).collect()
}

/// Fail with [`DocError::MissingField`] on the first required path the
/// record does not carry.
pub fn check_required(kind: DocumentKind, data: &Value) -> Result<(), DocError> {
    for path in required_fields(kind) {
        let segments: Vec<&str> = path.split('.').collect();
        if let Some(field) = find_missing(data, &segments, String::new()) {
            return Err(DocError::MissingField { kind, field });
        }
    }
    Ok(())
}

/// Walk `segments` from `value`; return the dotted path of the first
/// missing field, if any.
fn find_missing(value: &Value, segments: &[&str], prefix: String) -> Option<String> {
    let (head, rest) = match segments.split_first() {
        Some(split) => split,
        None => return None,
    };

    let join = |name: &str| {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", prefix, name)
        }
    };

    if let Some(name) = head.strip_suffix("[]") {
        return match value.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => items.iter().enumerate().find_map(|(i, item)| {
                find_missing(item, rest, format!("{}[{}]", join(name), i))
            }),
            // Wrong type: leave it to serde to report.
            Some(_) => None,
        };
    }

    match value.get(head) {
        None | Some(Value::Null) => Some(join(head)),
        Some(child) => find_missing(child, rest, join(head)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vehicle() -> Value {
        json!({
            "reg": "ST67 WKY", "make": "Hyundai", "model": "Ioniq",
            "chassis": "KMH", "engine_no": "G4LE", "engine_code": "G4LE",
            "engine_cc": 1580, "date_reg": "14/02/2018", "colour": "Blue"
        })
    }

    #[test]
    fn test_complete_job_sheet_passes() {
        let data = json!({
            "customer": { "name": "Mr Ressel", "address_lines": [] },
            "doc": { "reference": "JS 1", "account_no": "RES002",
                     "receive_date": "10/02/2026", "due_date": "10/02/2026" },
            "vehicle": vehicle(),
        });
        assert!(check_required(DocumentKind::JobSheet, &data).is_ok());
    }

    #[test]
    fn test_missing_nested_field_reports_dotted_path() {
        let mut v = vehicle();
        v.as_object_mut().unwrap().remove("reg");
        let data = json!({
            "customer": { "name": "A", "address_lines": [] },
            "doc": { "reference": "JS 1", "account_no": "X",
                     "receive_date": "", "due_date": "" },
            "vehicle": v,
        });
        match check_required(DocumentKind::JobSheet, &data) {
            Err(DocError::MissingField { kind, field }) => {
                assert_eq!(kind, DocumentKind::JobSheet);
                assert_eq!(field, "vehicle.reg");
            }
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_parent_object_reported() {
        let data = json!({ "customer": { "name": "A", "address_lines": [] } });
        match check_required(DocumentKind::JobSheet, &data) {
            Err(DocError::MissingField { field, .. }) => assert_eq!(field, "doc"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_null_counts_as_missing() {
        let data = json!({ "invoice": { "number": null } });
        let missing = find_missing(&data, &["invoice", "number"], String::new());
        assert_eq!(missing.as_deref(), Some("invoice.number"));
    }

    #[test]
    fn test_array_elements_are_indexed() {
        let data = json!({
            "parts": [ { "description": "Oil" }, { "description": "Filter" }, { "qty": 1 } ]
        });
        let missing = find_missing(&data, &["parts[]", "description"], String::new());
        assert_eq!(missing.as_deref(), Some("parts[2].description"));
    }

    #[test]
    fn test_absent_array_is_not_missing() {
        let data = json!({});
        assert_eq!(find_missing(&data, &["mot[]", "description"], String::new()), None);
    }
}
