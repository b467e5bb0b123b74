//! # Page Break Decisions
//!
//! One rule decides every break: a block of height `h` does not fit below
//! cursor `y` when `y - h` would drop under the bottom margin. Landing
//! exactly on the margin still fits.
//!
//! The controller keeps no state of its own. Everything it needs comes in
//! through its arguments and the new cursor goes out as its return value.

use super::Canvas;

/// Draws the fixed header block of a document kind.
///
/// Called once for the first page and again for every page opened by
/// [`ensure_room`]. Implementations must draw the same thing every time and
/// return the y just below the lowest element they drew, which becomes the
/// cursor for the page's content.
pub trait HeaderRenderer {
    fn draw_header(&self, canvas: &mut Canvas) -> f64;
}

/// True when a block of height `needed` placed at `y` would cross the
/// bottom margin.
pub fn needs_new_page(y: f64, needed: f64, bottom_margin: f64) -> bool {
    y - needed < bottom_margin
}

/// Return a cursor with at least `needed` points of room above the bottom
/// margin.
///
/// If `y` already has the room it is returned unchanged. Otherwise the
/// current page is finalized, a new one is opened, the header (when there is
/// one) is drawn on it, and the header's content top is returned. Without a
/// header the cursor restarts at the configured fallback top.
pub fn ensure_room(
    canvas: &mut Canvas,
    header: Option<&dyn HeaderRenderer>,
    y: f64,
    needed: f64,
) -> f64 {
    let geometry = *canvas.geometry();
    if !needs_new_page(y, needed, geometry.bottom_margin) {
        return y;
    }

    canvas.show_page();
    let top = match header {
        Some(h) => h.draw_header(canvas),
        None => geometry.fallback_y(),
    };
    log::debug!(
        "page break before {:.1}pt block at y={:.2}; page {} starts at y={:.2}",
        needed,
        y,
        canvas.page_index() + 1,
        top
    );
    top
}
