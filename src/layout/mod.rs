//! # Page-Aware Layout
//!
//! Documents are drawn straight onto pages of known size. There is no
//! infinite canvas that gets sliced afterwards: every content block is
//! measured first, the page-break controller decides whether it fits below
//! the cursor, and only then is it drawn. A block is never split.
//!
//! 1. Draw the header on page one; its return value is the cursor.
//! 2. Measure the next block (its height is fixed from here on).
//! 3. Ask [`page_break::ensure_room`] for a cursor with that much room.
//!    If the page is full it is finalized, a new one opened, and the
//!    header redrawn.
//! 4. Draw the block with its top at the cursor, move the cursor down by
//!    its height plus the gap that follows it.
//!
//! Coordinates are PDF user space: origin at the bottom-left corner, y
//! grows upward, so the cursor *decreases* as content flows down the page.

pub mod page_break;
pub mod paragraph;
pub mod table;

use std::sync::Arc;

use serde::Serialize;

use crate::config::PageGeometry;
use crate::font::StandardFont;
use crate::image_loader::LoadedImage;
use crate::model::Metadata;
use crate::style::{Color, TextStyle};

pub use page_break::{ensure_room, needs_new_page, HeaderRenderer};

/// One drawing operation, in page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A single line of text with its baseline starting at (`x`, `y`).
    Text {
        x: f64,
        y: f64,
        text: String,
        font: StandardFont,
        size: f64,
        color: Color,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        color: Color,
    },
    /// Rectangle with its lower-left corner at (`x`, `y`).
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Color>,
        /// Stroke colour and line width.
        stroke: Option<(Color, f64)>,
    },
    /// Image scaled into the box with its lower-left corner at (`x`, `y`).
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        image: Arc<LoadedImage>,
    },
}

/// A finished page ready for PDF serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPage {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<DrawCommand>,
}

/// Where a block ended up. Kept for tests and debugging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedBlock {
    pub name: String,
    /// Zero-based page index.
    pub page: usize,
    /// y of the block's top edge (or baseline, for text lines).
    pub top: f64,
    pub height: f64,
}

/// The output of one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub pages: Vec<LayoutPage>,
    pub blocks: Vec<PlacedBlock>,
    pub metadata: Metadata,
}

impl RenderedDocument {
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every placement recorded under `name`, in drawing order.
    pub fn blocks_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a PlacedBlock> + 'a {
        self.blocks.iter().filter(move |b| b.name == name)
    }
}

/// The drawing surface for one render call.
///
/// A canvas owns every page it has produced so far plus the commands of the
/// page in progress. It is created per render and handed down the call chain
/// by `&mut`; nothing else can draw on it while a document is being built.
#[derive(Debug)]
pub struct Canvas {
    geometry: PageGeometry,
    pages: Vec<LayoutPage>,
    current: Vec<DrawCommand>,
    blocks: Vec<PlacedBlock>,
}

impl Canvas {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            current: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Zero-based index of the page being drawn.
    pub fn page_index(&self) -> usize {
        self.pages.len()
    }

    /// Commands drawn so far on the page in progress.
    pub fn current_elements(&self) -> &[DrawCommand] {
        &self.current
    }

    pub fn string_width(&self, text: &str, font: StandardFont, size: f64) -> f64 {
        font.measure_string(text, size)
    }

    pub fn draw_string(&mut self, x: f64, y: f64, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        self.current.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
            font: style.font,
            size: style.size,
            color: style.color,
        });
    }

    /// Draw `text` so that it ends at `x`.
    pub fn draw_right_string(&mut self, x: f64, y: f64, text: &str, style: TextStyle) {
        let w = self.string_width(text, style.font, style.size);
        self.draw_string(x - w, y, text, style);
    }

    /// Draw `text` centred on `x`.
    pub fn draw_centred_string(&mut self, x: f64, y: f64, text: &str, style: TextStyle) {
        let w = self.string_width(text, style.font, style.size);
        self.draw_string(x - w / 2.0, y, text, style);
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Color) {
        self.current.push(DrawCommand::Line {
            x1,
            y1,
            x2,
            y2,
            width,
            color,
        });
    }

    pub fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color, line_width: f64) {
        self.current.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            fill: None,
            stroke: Some((color, line_width)),
        });
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.current.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            fill: Some(color),
            stroke: None,
        });
    }

    pub fn draw_image(&mut self, x: f64, y: f64, width: f64, height: f64, image: Arc<LoadedImage>) {
        self.current.push(DrawCommand::Image {
            x,
            y,
            width,
            height,
            image,
        });
    }

    /// Finalize the page in progress and open a blank one.
    pub fn show_page(&mut self) {
        let elements = std::mem::take(&mut self.current);
        self.pages.push(LayoutPage {
            width: self.geometry.width(),
            height: self.geometry.height(),
            elements,
        });
    }

    pub fn record_block(&mut self, name: &str, top: f64, height: f64) {
        let page = self.page_index();
        self.blocks.push(PlacedBlock {
            name: name.to_string(),
            page,
            top,
            height,
        });
    }

    /// Close the last page and hand over everything drawn. An untouched
    /// trailing page is dropped unless it would be the only one.
    pub fn finish(mut self) -> RenderedDocument {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.show_page();
        }
        RenderedDocument {
            pages: self.pages,
            blocks: self.blocks,
            metadata: Metadata::default(),
        }
    }
}

/// A measured unit of content.
///
/// `height()` is fixed when the block is built and must not change before
/// it is drawn; the page-break decision is made against that value.
pub trait Block {
    fn height(&self) -> f64;

    /// Draw with the block's lower-left corner at (`x`, `y_bottom`).
    fn draw_on(&self, canvas: &mut Canvas, x: f64, y_bottom: f64);
}

/// An image drawn at a fixed size.
#[derive(Debug, Clone)]
pub struct ImageBlock {
    image: Arc<LoadedImage>,
    width: f64,
    height: f64,
}

impl ImageBlock {
    /// Size the image to `width`, keeping its intrinsic aspect ratio.
    pub fn with_width(image: Arc<LoadedImage>, width: f64) -> Self {
        let height = width * image.aspect_ratio();
        Self { image, width, height }
    }
}

impl Block for ImageBlock {
    fn height(&self) -> f64 {
        self.height
    }

    fn draw_on(&self, canvas: &mut Canvas, x: f64, y_bottom: f64) {
        canvas.draw_image(x, y_bottom, self.width, self.height, Arc::clone(&self.image));
    }
}

/// Threads the page cursor through one document.
///
/// The flow owns the canvas for the whole render. Every placement goes
/// through [`ensure_room`], so the header is redrawn on each page the flow
/// opens.
pub struct PageFlow<'h> {
    canvas: Canvas,
    header: Option<&'h dyn HeaderRenderer>,
    y: f64,
}

impl<'h> PageFlow<'h> {
    /// Start a document: draw the header on the first page and put the
    /// cursor below it. Without a header the cursor starts at the fallback
    /// top.
    pub fn start(mut canvas: Canvas, header: Option<&'h dyn HeaderRenderer>) -> Self {
        let y = match header {
            Some(h) => h.draw_header(&mut canvas),
            None => canvas.geometry().fallback_y(),
        };
        Self { canvas, header, y }
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Move the cursor down by `dy`.
    pub fn advance(&mut self, dy: f64) {
        self.y -= dy;
    }

    pub fn canvas(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// Make sure `needed` points fit below the cursor, breaking the page if
    /// they don't. Returns the (possibly reset) cursor.
    pub fn ensure_room(&mut self, needed: f64) -> f64 {
        self.y = ensure_room(&mut self.canvas, self.header, self.y, needed);
        self.y
    }

    /// Place `block` with its top at the cursor, then move the cursor past
    /// it and the trailing `gap`.
    pub fn place(&mut self, name: &str, block: &dyn Block, x: f64, gap: f64) {
        self.place_reserving(name, block, x, 0.0, gap);
    }

    /// Like [`place`](Self::place), but the page must also have `reserve`
    /// points left beneath the block.
    pub fn place_reserving(&mut self, name: &str, block: &dyn Block, x: f64, reserve: f64, gap: f64) {
        let h = block.height();
        let top = self.ensure_room(h + reserve);
        block.draw_on(&mut self.canvas, x, top - h);
        self.canvas.record_block(name, top, h);
        self.y = top - h - gap;
    }

    /// Draw a run of text at the cursor after checking for `needed` points
    /// of room, then advance by `advance`. `draw` receives the baseline.
    pub fn text_run<F>(&mut self, name: &str, needed: f64, advance: f64, draw: F)
    where
        F: FnOnce(&mut Canvas, f64),
    {
        let y = self.ensure_room(needed);
        draw(&mut self.canvas, y);
        self.canvas.record_block(name, y, advance);
        self.y = y - advance;
    }

    pub fn finish(self) -> RenderedDocument {
        self.canvas.finish()
    }
}
