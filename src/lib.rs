//! # motordocs
//!
//! Invoice, estimate and job sheet PDFs for a vehicle repair workshop.
//!
//! Each document is drawn onto an owned canvas page by page. Before any
//! block (a table, a line of text, an image, the totals footer) is drawn,
//! its height is known and checked against the bottom margin; if it does
//! not fit, the page is finished, a new one is started and the document's
//! full header is drawn again on it. Nothing is ever split or overlaps the
//! bottom margin.
//!
//! ## Architecture
//!
//! ```text
//! Request JSON
//!       ↓
//!   [model]      - records, required-field validation
//!       ↓
//!   [templates]  - headers and per-kind assemblers
//!       ↓
//!   [layout]     - canvas, measured blocks, page breaks
//!       ↓
//!   [pdf]        - serialize to PDF bytes
//!       ↓
//!   outputFile   - written atomically
//! ```

pub mod config;
pub mod error;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod samples;
pub mod style;
pub mod templates;

use std::io::Write;
use std::path::{Path, PathBuf};

use config::RenderConfig;
use error::DocError;
use layout::RenderedDocument;
use model::{DocumentKind, RenderRequest, RenderResponse};
use pdf::PdfWriter;

/// Validate `data` against `kind` and lay it out. No bytes are produced.
pub fn render(
    kind: DocumentKind,
    data: &serde_json::Value,
    config: &RenderConfig,
) -> Result<RenderedDocument, DocError> {
    templates::render(kind, data, config)
}

/// Render straight to PDF bytes.
pub fn render_pdf(
    kind: DocumentKind,
    data: &serde_json::Value,
    config: &RenderConfig,
) -> Result<Vec<u8>, DocError> {
    let doc = render(kind, data, config)?;
    Ok(PdfWriter::new().write(&doc.pages, &doc.metadata))
}

/// Write `bytes` to `path` through a temporary file in the same directory,
/// so the destination only ever holds a complete document.
pub fn write_document(bytes: &[u8], path: &Path) -> Result<(), DocError> {
    let io_err = |source: std::io::Error| DocError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.flush().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Run one request end to end and return the written path.
pub fn process(json: &str, config: &RenderConfig) -> Result<PathBuf, DocError> {
    let request: RenderRequest = serde_json::from_str(json)?;
    let kind: DocumentKind = request.kind.parse()?;

    let bytes = render_pdf(kind, &request.data, config)?;
    write_document(&bytes, &request.output_file)?;

    log::info!(
        "{} PDF saved to: {}",
        kind.title(),
        request.output_file.display()
    );
    Ok(request.output_file)
}

/// [`process`], folded into the acknowledgement written back to the caller.
pub fn handle_request(json: &str, config: &RenderConfig) -> RenderResponse {
    match process(json, config) {
        Ok(path) => RenderResponse::success(&path),
        Err(e) => {
            log::error!("{}", e);
            RenderResponse::failure(&e)
        }
    }
}
