//! Word-wrapped paragraphs of regular and bold text.
//!
//! Break opportunities come from UAX#14 via `unicode-linebreak`; lines are
//! filled greedily. Trailing spaces at the end of a line do not count
//! against the width. A single word wider than the line gets a line of its
//! own rather than being broken.

use std::ops::Range;

use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::font::StandardFont;
use crate::style::{Color, TextStyle};

use super::{Block, Canvas};

#[derive(Debug, Clone, PartialEq)]
enum Inline {
    Text { text: String, font: StandardFont },
    Break,
}

/// Paragraph content before it has a width.
#[derive(Debug, Clone)]
pub struct Paragraph {
    inlines: Vec<Inline>,
    size: f64,
    leading: f64,
}

impl Paragraph {
    pub fn new(size: f64, leading: f64) -> Self {
        Self {
            inlines: Vec::new(),
            size,
            leading,
        }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.inlines.push(Inline::Text {
            text: text.to_string(),
            font: StandardFont::Helvetica,
        });
        self
    }

    pub fn bold(mut self, text: &str) -> Self {
        self.inlines.push(Inline::Text {
            text: text.to_string(),
            font: StandardFont::HelveticaBold,
        });
        self
    }

    /// Forced line break.
    pub fn line_break(mut self) -> Self {
        self.inlines.push(Inline::Break);
        self
    }

    /// Wrap to `width`. The result's height is final.
    pub fn wrap(&self, width: f64) -> ParagraphBlock {
        let mut lines = Vec::new();
        for segment in self.segments() {
            wrap_segment(&segment, width, self.size, &mut lines);
        }
        ParagraphBlock {
            lines,
            size: self.size,
            leading: self.leading,
            color: Color::BLACK,
        }
    }

    /// Text runs between forced breaks. A break at the very end does not
    /// open an empty segment.
    fn segments(&self) -> Vec<Vec<(&str, StandardFont)>> {
        let mut segments = vec![Vec::new()];
        for (i, inline) in self.inlines.iter().enumerate() {
            match inline {
                Inline::Text { text, font } => {
                    if let Some(last) = segments.last_mut() {
                        last.push((text.as_str(), *font));
                    }
                }
                Inline::Break if i + 1 < self.inlines.len() => segments.push(Vec::new()),
                Inline::Break => {}
            }
        }
        segments
    }
}

/// A run of one font within a wrapped line.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub font: StandardFont,
    /// Offset from the line's start.
    pub x_offset: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub runs: Vec<Run>,
    pub width: f64,
}

fn wrap_segment(parts: &[(&str, StandardFont)], width: f64, size: f64, out: &mut Vec<Line>) {
    let mut text = String::new();
    let mut fonts: Vec<(usize, StandardFont)> = Vec::new();
    for (t, font) in parts {
        fonts.push((text.len(), *font));
        text.push_str(t);
    }
    if text.is_empty() {
        out.push(Line {
            runs: Vec::new(),
            width: 0.0,
        });
        return;
    }

    let font_at = |byte: usize| -> StandardFont {
        fonts
            .iter()
            .rev()
            .find(|(start, _)| *start <= byte)
            .map(|(_, f)| *f)
            .unwrap_or(StandardFont::Helvetica)
    };
    let measure = |range: Range<usize>| -> f64 {
        text[range.clone()]
            .char_indices()
            .map(|(i, ch)| font_at(range.start + i).metrics().char_width(ch, size))
            .sum()
    };
    let trim_end = |range: &Range<usize>| -> usize { range.start + text[range.clone()].trim_end().len() };

    let mut current: Option<(Range<usize>, f64)> = None;
    let mut prev = 0;
    for (idx, opportunity) in linebreaks(&text) {
        let piece = prev..idx;
        prev = idx;
        if piece.is_empty() {
            continue;
        }
        let piece_w = measure(piece.clone());
        let piece_ink = measure(piece.start..trim_end(&piece));

        current = Some(match current.take() {
            None => (piece, piece_w),
            Some((line, line_w)) if line_w + piece_ink <= width => (line.start..piece.end, line_w + piece_w),
            Some((line, _)) => {
                out.push(build_line(&text, line, &font_at, &measure, &trim_end));
                (piece, piece_w)
            }
        });

        if opportunity == BreakOpportunity::Mandatory && idx < text.len() {
            if let Some((line, _)) = current.take() {
                out.push(build_line(&text, line, &font_at, &measure, &trim_end));
            }
        }
    }
    if let Some((line, _)) = current {
        out.push(build_line(&text, line, &font_at, &measure, &trim_end));
    }
}

fn build_line(
    text: &str,
    range: Range<usize>,
    font_at: &dyn Fn(usize) -> StandardFont,
    measure: &dyn Fn(Range<usize>) -> f64,
    trim_end: &dyn Fn(&Range<usize>) -> usize,
) -> Line {
    let end = trim_end(&range);
    let mut runs: Vec<Run> = Vec::new();
    let mut run_start = range.start;
    let mut x = 0.0;
    for (i, _) in text[range.start..end].char_indices() {
        let byte = range.start + i;
        if byte > run_start && font_at(byte) != font_at(run_start) {
            runs.push(Run {
                text: text[run_start..byte].to_string(),
                font: font_at(run_start),
                x_offset: x,
            });
            x += measure(run_start..byte);
            run_start = byte;
        }
    }
    if end > run_start {
        runs.push(Run {
            text: text[run_start..end].to_string(),
            font: font_at(run_start),
            x_offset: x,
        });
        x += measure(run_start..end);
    }
    Line { runs, width: x }
}

/// A wrapped paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphBlock {
    lines: Vec<Line>,
    size: f64,
    leading: f64,
    color: Color,
}

impl ParagraphBlock {
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

impl Block for ParagraphBlock {
    fn height(&self) -> f64 {
        self.lines.len() as f64 * self.leading
    }

    fn draw_on(&self, canvas: &mut Canvas, x: f64, y_bottom: f64) {
        let mut baseline = y_bottom + self.height() - self.size;
        for line in &self.lines {
            for run in &line.runs {
                let style = TextStyle {
                    font: run.font,
                    size: self.size,
                    color: self.color,
                };
                canvas.draw_string(x + run.x_offset, baseline, &run.text, style);
            }
            baseline -= self.leading;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.runs.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn test_short_text_is_one_line() {
        let p = Paragraph::new(7.0, 9.0).text("I have read and accept your terms.").wrap(500.0);
        assert_eq!(p.line_count(), 1);
        assert_eq!(p.height(), 9.0);
    }

    #[test]
    fn test_wraps_at_word_boundaries() {
        let p = Paragraph::new(10.0, 12.0).text("alpha beta gamma delta").wrap(60.0);
        assert!(p.line_count() > 1);
        for line in p.lines() {
            let text = line_text(line);
            assert!(!text.ends_with(' '), "trailing space kept in {:?}", text);
            assert!(line.width <= 60.0 || !text.contains(' '));
        }
        let joined: Vec<String> = p.lines().iter().map(line_text).collect();
        assert_eq!(joined.join(" "), "alpha beta gamma delta");
    }

    #[test]
    fn test_forced_break_and_bold_run() {
        let p = Paragraph::new(7.0, 9.0)
            .text("Terms apply.")
            .line_break()
            .bold("Statutory rights unaffected")
            .wrap(400.0);
        assert_eq!(p.line_count(), 2);
        assert_eq!(p.lines()[1].runs[0].font, StandardFont::HelveticaBold);
        assert_eq!(p.lines()[0].runs[0].font, StandardFont::Helvetica);
    }

    #[test]
    fn test_trailing_break_adds_no_line() {
        let p = Paragraph::new(7.0, 9.0).text("one").line_break().wrap(400.0);
        assert_eq!(p.line_count(), 1);
    }

    #[test]
    fn test_mixed_fonts_on_one_line() {
        let p = Paragraph::new(10.0, 12.0).text("Total ").bold("due").wrap(400.0);
        let runs = &p.lines()[0].runs;
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].text, "due");
        let expected = StandardFont::Helvetica.measure_string("Total ", 10.0);
        assert!((runs[1].x_offset - expected).abs() < 1e-9);
    }

    #[test]
    fn test_first_baseline_sits_one_size_below_top() {
        use crate::config::PageGeometry;
        use crate::layout::DrawCommand;

        let p = Paragraph::new(7.0, 9.0).text("a").line_break().text("b").wrap(100.0);
        let mut canvas = Canvas::new(PageGeometry::default());
        p.draw_on(&mut canvas, 30.0, 100.0);
        let ys: Vec<f64> = canvas
            .current_elements()
            .iter()
            .filter_map(|e| match e {
                DrawCommand::Text { y, .. } => Some(*y),
                _ => None,
            })
            .collect();
        assert_eq!(ys, vec![111.0, 102.0]);
    }
}
