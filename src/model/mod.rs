//! # Document Model
//!
//! The input records for the three document kinds the workshop prints:
//! invoices, estimates and job sheets. Records arrive as JSON (usually from
//! the front-end's render request) and are consumed by exactly one render.
//! Nothing in here is mutated while a document is drawn.
//!
//! Free-form identity values (document numbers, dates, quantities) are held
//! as [`Scalar`] because the front-end sends numbers and strings
//! interchangeably; they are only ever displayed.

pub mod validate;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DocError;

/// Which template a record is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Invoice,
    Estimate,
    #[serde(rename = "jobsheet")]
    JobSheet,
}

impl DocumentKind {
    /// The request discriminator for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::Estimate => "estimate",
            DocumentKind::JobSheet => "jobsheet",
        }
    }

    /// Human-readable title used in PDF metadata and log lines.
    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "Invoice",
            DocumentKind::Estimate => "Estimate",
            DocumentKind::JobSheet => "Job Sheet",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invoice" => Ok(DocumentKind::Invoice),
            "estimate" => Ok(DocumentKind::Estimate),
            "jobsheet" => Ok(DocumentKind::JobSheet),
            other => Err(DocError::UnknownKind(other.to_string())),
        }
    }
}

/// A display-only value that may arrive as a string, a number, or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Empty,
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::Text(String::new())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Int(i) => write!(f, "{}", i),
            // Whole floats keep their ".0", e.g. a quantity of 1.0.
            Scalar::Float(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{:.1}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Empty => Ok(()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

/// The workshop printing the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub address_line1: String,
    pub phone: String,
    pub website: String,
    pub vat: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub address_lines: Vec<String>,
    #[serde(default)]
    pub tel: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Customer {
    /// Contact lines in print order. Empty numbers are skipped.
    pub fn contact_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (label, value) in [
            ("Tel", &self.tel),
            ("Mobile", &self.mobile),
            ("Tel", &self.phone),
        ] {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                lines.push(format!("{}: {}", label, v));
            }
        }
        lines
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub reg: String,
    pub make: String,
    pub model: String,
    pub chassis: String,
    #[serde(default)]
    pub mileage: Scalar,
    pub engine_no: String,
    pub engine_code: String,
    pub engine_cc: Scalar,
    pub date_reg: String,
    pub colour: String,
}

/// A priced labour or parts row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    #[serde(default)]
    pub qty: Scalar,
    #[serde(default)]
    pub unit: Option<f64>,
    /// Discount marker column.
    #[serde(default)]
    pub d: Scalar,
    #[serde(default)]
    pub subtotal: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotItem {
    pub description: String,
    #[serde(default)]
    pub qty: Scalar,
    #[serde(default)]
    pub status: Scalar,
}

/// Money totals as sent by the front-end. Any derived field left out is
/// computed by [`Totals::resolve`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Totals {
    #[serde(default)]
    pub labour: f64,
    #[serde(default)]
    pub parts: f64,
    #[serde(default)]
    pub subtotal: Option<f64>,
    #[serde(default = "default_vat_rate")]
    pub vat_rate: f64,
    #[serde(default)]
    pub vat: Option<f64>,
    #[serde(default)]
    pub mot: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub balance: Option<f64>,
}

fn default_vat_rate() -> f64 {
    20.0
}

impl Default for Totals {
    fn default() -> Self {
        Self {
            labour: 0.0,
            parts: 0.0,
            subtotal: None,
            vat_rate: default_vat_rate(),
            vat: None,
            mot: None,
            total: None,
            balance: None,
        }
    }
}

/// Totals with every printed figure filled in and rounded to pence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTotals {
    pub labour: f64,
    pub parts: f64,
    pub subtotal: f64,
    pub vat_rate: f64,
    pub vat: f64,
    pub mot: Option<f64>,
    pub total: f64,
    pub balance: Option<f64>,
}

/// Round half away from zero to two decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl Totals {
    /// Fill in subtotal, VAT and total where the record left them out.
    /// `include_mot` is false for estimates, which never bill an MOT.
    pub fn resolve(&self, include_mot: bool) -> ResolvedTotals {
        let mot = if include_mot { self.mot.map(round2) } else { None };
        let subtotal = round2(self.subtotal.unwrap_or(self.labour + self.parts));
        let vat = round2(self.vat.unwrap_or(subtotal * self.vat_rate / 100.0));
        let total = round2(
            self.total
                .unwrap_or(subtotal + vat + mot.unwrap_or(0.0)),
        );
        ResolvedTotals {
            labour: round2(self.labour),
            parts: round2(self.parts),
            subtotal,
            vat_rate: self.vat_rate,
            vat,
            mot,
            total,
            balance: self.balance.map(round2),
        }
    }
}

impl ResolvedTotals {
    /// The VAT row label, e.g. `VAT (20%)` or `VAT (17.5%)`.
    pub fn vat_label(&self) -> String {
        if self.vat_rate.fract() == 0.0 {
            format!("VAT ({:.0}%)", self.vat_rate)
        } else {
            format!("VAT ({}%)", self.vat_rate)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceIdentity {
    pub number: Scalar,
    #[serde(default)]
    pub invoice_date: Scalar,
    #[serde(default)]
    pub account_no: Scalar,
    #[serde(default)]
    pub order_ref: Scalar,
    #[serde(default)]
    pub date_of_work: Scalar,
    #[serde(default)]
    pub payment_date: Scalar,
    #[serde(default)]
    pub payment_method: Scalar,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateIdentity {
    pub number: Scalar,
    pub date: Scalar,
    pub account_no: Scalar,
    #[serde(default)]
    pub order_ref: Scalar,
    pub valid_to: Scalar,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSheetIdentity {
    pub reference: Scalar,
    pub account_no: Scalar,
    #[serde(default)]
    pub order_ref: Scalar,
    pub receive_date: Scalar,
    pub due_date: Scalar,
    #[serde(default)]
    pub status: Scalar,
    #[serde(default)]
    pub technician: Scalar,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub company: Company,
    pub customer: Customer,
    pub invoice: InvoiceIdentity,
    pub vehicle: Vehicle,
    #[serde(default)]
    pub work_title: Option<String>,
    #[serde(default)]
    pub work_items: Vec<String>,
    #[serde(default)]
    pub mot: Vec<MotItem>,
    #[serde(default)]
    pub labour: Vec<LineItem>,
    #[serde(default)]
    pub parts: Vec<LineItem>,
    #[serde(default)]
    pub totals: Totals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateRecord {
    pub company: Company,
    pub customer: Customer,
    pub estimate: EstimateIdentity,
    pub vehicle: Vehicle,
    #[serde(default)]
    pub work_title: Option<String>,
    #[serde(default)]
    pub work_items: Vec<String>,
    #[serde(default)]
    pub labour: Vec<LineItem>,
    #[serde(default)]
    pub parts: Vec<LineItem>,
    #[serde(default)]
    pub totals: Totals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OilSpec {
    #[serde(default)]
    pub viscosity: String,
    #[serde(default)]
    pub fiat_ref: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSheetRecord {
    pub customer: Customer,
    pub doc: JobSheetIdentity,
    pub vehicle: Vehicle,
    #[serde(default)]
    pub work_description: Vec<String>,
    #[serde(default)]
    pub oil_specs: Vec<OilSpec>,
    #[serde(default = "default_blank_rows", deserialize_with = "blank_rows")]
    pub labour_rows: usize,
    #[serde(default = "default_blank_rows", deserialize_with = "blank_rows")]
    pub parts_rows: usize,
}

/// Most blank rows a job sheet table may ask for; more would not fit on an
/// A4 page under the header.
pub const MAX_BLANK_ROWS: usize = 25;

fn default_blank_rows() -> usize {
    5
}

fn blank_rows<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let rows = usize::deserialize(deserializer)?;
    if rows > MAX_BLANK_ROWS {
        return Err(serde::de::Error::custom(format!(
            "{} blank rows requested, at most {} fit on a page",
            rows, MAX_BLANK_ROWS
        )));
    }
    Ok(rows)
}

/// Document metadata embedded in the PDF Info dictionary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

/// One render request as read from the front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderRequest {
    /// `invoice`, `estimate` or `jobsheet`. Kept as a string so an unknown
    /// kind is reported as such rather than as a schema mismatch.
    #[serde(rename = "type")]
    pub kind: String,
    pub data: serde_json::Value,
    #[serde(rename = "outputFile", default = "default_output_file")]
    pub output_file: PathBuf,
}

fn default_output_file() -> PathBuf {
    std::env::temp_dir().join("output.pdf")
}

/// The single JSON line written back for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RenderResponse {
    Success { success: bool, path: String },
    Failure { error: String },
}

impl RenderResponse {
    pub fn success(path: &std::path::Path) -> Self {
        RenderResponse::Success {
            success: true,
            path: path.display().to_string(),
        }
    }

    pub fn failure(err: &DocError) -> Self {
        RenderResponse::Failure {
            error: err.to_string(),
        }
    }
}
