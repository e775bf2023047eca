//! Layout analysis for PDF pages.
//!
//! Content-stream text operators become positioned spans, spans on one
//! baseline become lines, and lines separated by extra spacing, a font
//! change or an indent become paragraphs. Each line is one [`TextBlock`];
//! the page text joins lines with `\n` and paragraphs with a blank line.

use crate::error::Result;
use crate::model::{BoundingBox, PageText, TextBlock, DEFAULT_FONT_SIZE};

use super::backend::{ContentOp, PageId, PdfBackend, PdfValue};

/// Leading used by `T*`, `'` and `"` when no `TL` was set.
const DEFAULT_LEADING: f32 = 12.0;
/// TJ adjustments beyond this many thousandths of an em insert a space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;
/// Average glyph width as a share of the font size.
const GLYPH_WIDTH_RATIO: f32 = 0.5;

/// A run of text at one position with one font size.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    /// Left edge
    pub x: f32,
    /// Baseline
    pub y: f32,
    /// Estimated advance width
    pub width: f32,
    pub font_size: f32,
}

impl TextSpan {
    /// Create a span; the width is estimated from the glyph count.
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        let text = text.into();
        let width = text.chars().count() as f32 * font_size * GLYPH_WIDTH_RATIO;
        Self {
            text,
            x,
            y,
            width,
            font_size,
        }
    }

    fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Spans sharing a baseline, left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub spans: Vec<TextSpan>,
    pub y: f32,
    pub x: f32,
    /// Size weighted by span length
    pub font_size: f32,
}

impl TextLine {
    /// Build a line from spans in any order.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.total_cmp(&b.x));

        let total_chars: usize = spans.iter().map(|s| s.text.chars().count()).sum();
        let weighted: f32 = spans
            .iter()
            .map(|s| s.font_size * s.text.chars().count() as f32)
            .sum();
        let font_size = match (total_chars, spans.first()) {
            (0, Some(first)) => first.font_size,
            (0, None) => DEFAULT_FONT_SIZE,
            _ => weighted / total_chars as f32,
        };
        let (x, y) = spans.first().map_or((0.0, 0.0), |s| (s.x, s.y));

        Self {
            spans,
            y,
            x,
            font_size,
        }
    }

    /// Span texts joined with single spaces.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The line as a [`TextBlock`] on `page`.
    pub fn to_block(&self, page: u32) -> TextBlock {
        let right = self
            .spans
            .iter()
            .map(TextSpan::right)
            .fold(self.x, f32::max);
        let top = self
            .spans
            .iter()
            .map(|s| s.y + s.font_size)
            .fold(self.y, f32::max);
        TextBlock::new(
            self.text(),
            page,
            self.spans.iter().map(|s| s.font_size).collect(),
            BoundingBox::new(self.x, self.y, right, top),
        )
    }
}

/// Text state while walking a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    // Start of the current line, moved by Td/TD/T*
    line_e: f32,
    line_f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
            leading: DEFAULT_LEADING,
        }
    }
}

impl TextMatrix {
    fn begin_text(&mut self) {
        let leading = self.leading;
        *self = Self {
            leading,
            ..Self::default()
        };
    }

    fn set(&mut self, m: [f32; 6]) {
        [self.a, self.b, self.c, self.d, self.e, self.f] = m;
        self.line_e = self.e;
        self.line_f = self.f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    /// Move the pen past a shown string.
    fn advance(&mut self, width: f32) {
        self.e += width * self.a;
        self.f += width * self.b;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Turns page content streams into [`PageText`].
pub struct LayoutAnalyzer<'a> {
    backend: &'a dyn PdfBackend,
}

impl<'a> LayoutAnalyzer<'a> {
    /// Create an analyzer reading through `backend`.
    pub fn new(backend: &'a dyn PdfBackend) -> Self {
        Self { backend }
    }

    /// Decode one page into its lines and plain text.
    pub fn page_text(&self, number: u32, page_id: PageId) -> Result<PageText> {
        let spans = self.page_spans(page_id)?;
        Ok(build_page(number, spans))
    }

    /// Positioned text spans of a page.
    pub fn page_spans(&self, page_id: PageId) -> Result<Vec<TextSpan>> {
        let content = self.backend.page_content(page_id)?;
        let ops = self.backend.decode_content(&content)?;
        Ok(self.interpret(page_id, &ops))
    }

    fn interpret(&self, page_id: PageId, ops: &[ContentOp]) -> Vec<TextSpan> {
        let mut spans = Vec::new();
        let mut font_name: Vec<u8> = Vec::new();
        let mut font_size = DEFAULT_FONT_SIZE;
        let mut tm = TextMatrix::default();
        let mut in_text = false;

        for op in ops {
            match op.operator.as_str() {
                "BT" => {
                    in_text = true;
                    tm.begin_text();
                }
                "ET" => in_text = false,
                "Tf" => {
                    if let Some(PdfValue::Name(name)) = op.operands.first() {
                        font_name = name.clone();
                    }
                    font_size = op.number(1).unwrap_or(DEFAULT_FONT_SIZE);
                }
                "TL" => tm.leading = op.number(0).unwrap_or(DEFAULT_LEADING),
                "Td" => tm.translate(op.number(0).unwrap_or(0.0), op.number(1).unwrap_or(0.0)),
                "TD" => {
                    let ty = op.number(1).unwrap_or(0.0);
                    tm.leading = -ty;
                    tm.translate(op.number(0).unwrap_or(0.0), ty);
                }
                "Tm" if op.operands.len() >= 6 => {
                    let mut m = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
                    for (i, slot) in m.iter_mut().enumerate() {
                        if let Some(n) = op.number(i) {
                            *slot = n;
                        }
                    }
                    tm.set(m);
                }
                "T*" => tm.next_line(),
                "Tj" | "TJ" | "'" | "\"" if in_text => {
                    if matches!(op.operator.as_str(), "'" | "\"") {
                        tm.next_line();
                    }
                    let text = self.shown_text(page_id, &font_name, op);
                    if text.trim().is_empty() {
                        continue;
                    }
                    let (x, y) = tm.position();
                    let span = TextSpan::new(text, x, y, font_size * tm.scale());
                    tm.advance(span.width / tm.scale().max(f32::EPSILON));
                    spans.push(span);
                }
                _ => {}
            }
        }

        spans
    }

    /// The string shown by a `Tj`, `TJ`, `'` or `"` operation.
    fn shown_text(&self, page_id: PageId, font_name: &[u8], op: &ContentOp) -> String {
        let decode = |bytes: &[u8]| self.backend.decode_text(page_id, font_name, bytes);
        match op.operator.as_str() {
            "TJ" => {
                let Some(PdfValue::Array(items)) = op.operands.first() else {
                    return String::new();
                };
                let mut combined = String::new();
                for item in items {
                    match item {
                        PdfValue::Str(bytes) => combined.push_str(&decode(bytes)),
                        other => {
                            // Large negative kerning stands for a word space
                            let adjustment = -other.as_number().unwrap_or(0.0);
                            if adjustment > TJ_SPACE_THRESHOLD
                                && !combined.is_empty()
                                && !combined.ends_with(' ')
                            {
                                combined.push(' ');
                            }
                        }
                    }
                }
                combined
            }
            "\"" => match op.operands.get(2) {
                Some(PdfValue::Str(bytes)) => decode(bytes),
                _ => String::new(),
            },
            _ => match op.operands.first() {
                Some(PdfValue::Str(bytes)) => decode(bytes),
                _ => String::new(),
            },
        }
    }
}

/// Lines and text of a page from its spans.
pub fn build_page(number: u32, spans: Vec<TextSpan>) -> PageText {
    let lines = group_spans_into_lines(spans);
    let paragraphs = group_lines_into_paragraphs(&lines);

    let text = paragraphs
        .iter()
        .map(|paragraph| {
            paragraph
                .iter()
                .map(|line| line.text())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    let blocks = lines
        .iter()
        .map(|line| line.to_block(number))
        .filter(|block| !block.text.is_empty())
        .collect();

    PageText::new(number, text, blocks)
}

/// Group spans by baseline, top to bottom.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<TextLine> {
    // PDF y grows upwards
    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then_with(|| a.x.total_cmp(&b.x)));

    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * 0.3;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        lines.push(TextLine::from_spans(current));
    }

    lines
}

/// Split lines into paragraphs at large gaps, font size changes and
/// indentation changes.
pub fn group_lines_into_paragraphs(lines: &[TextLine]) -> Vec<&[TextLine]> {
    if lines.is_empty() {
        return Vec::new();
    }

    let avg_spacing = average_line_spacing(lines);
    let mut paragraphs = Vec::new();
    let mut start = 0;
    for i in 1..lines.len() {
        if starts_paragraph(&lines[i - 1], &lines[i], avg_spacing) {
            paragraphs.push(&lines[start..i]);
            start = i;
        }
    }
    paragraphs.push(&lines[start..]);
    paragraphs
}

fn average_line_spacing(lines: &[TextLine]) -> f32 {
    let spacings: Vec<f32> = lines
        .windows(2)
        .map(|w| (w[0].y - w[1].y).abs())
        .filter(|s| *s > 0.1)
        .collect();
    if spacings.is_empty() {
        return DEFAULT_LEADING;
    }
    spacings.iter().sum::<f32>() / spacings.len() as f32
}

fn starts_paragraph(prev: &TextLine, curr: &TextLine, avg_spacing: f32) -> bool {
    (prev.y - curr.y).abs() > avg_spacing * 1.5
        || (prev.font_size - curr.font_size).abs() > 1.0
        || (prev.x - curr.x).abs() > 20.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, x: f32, y: f32, size: f32) -> TextSpan {
        TextSpan::new(text, x, y, size)
    }

    #[test]
    fn test_spans_grouped_by_baseline() {
        let lines = group_spans_into_lines(vec![
            span("Soup", 140.0, 700.0, 12.0),
            span("Lentil", 72.0, 700.5, 12.0),
            span("Rinse well.", 72.0, 686.0, 12.0),
        ]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Lentil Soup");
        assert_eq!(lines[1].text(), "Rinse well.");
    }

    #[test]
    fn test_line_font_size_is_weighted() {
        let line = TextLine::from_spans(vec![
            span("AB", 0.0, 0.0, 20.0),
            span("CDEFGHIJ", 30.0, 0.0, 10.0),
        ]);
        assert!((line.font_size - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_block_carries_span_sizes() {
        let line = TextLine::from_spans(vec![
            span("Lentil", 72.0, 700.0, 18.0),
            span("Soup", 130.0, 700.0, 16.0),
        ]);
        let block = line.to_block(3);
        assert_eq!(block.page, 3);
        assert_eq!(block.font_sizes, vec![18.0, 16.0]);
        assert_eq!(block.max_size, 18.0);
        assert_eq!(block.bbox.x0, 72.0);
    }

    #[test]
    fn test_paragraph_breaks() {
        let spans = vec![
            span("Lentil Soup", 72.0, 720.0, 18.0),
            span("Rinse the lentils.", 72.0, 690.0, 12.0),
            span("Simmer for 25 minutes.", 72.0, 676.0, 12.0),
            span("Serve warm.", 72.0, 662.0, 12.0),
            span("Variations", 72.0, 610.0, 12.0),
        ];
        let page = build_page(1, spans);
        assert_eq!(
            page.text,
            "Lentil Soup\n\nRinse the lentils.\nSimmer for 25 minutes.\nServe warm.\n\nVariations"
        );
        assert_eq!(page.blocks.len(), 5);
        assert_eq!(page.number, 1);
    }

    #[test]
    fn test_empty_page() {
        let page = build_page(2, vec![]);
        assert!(page.text.is_empty());
        assert!(page.blocks.is_empty());
    }

    #[test]
    fn test_text_matrix_moves() {
        let mut tm = TextMatrix::default();
        tm.set([2.0, 0.0, 0.0, 2.0, 50.0, 700.0]);
        tm.translate(10.0, -6.0);
        assert_eq!(tm.position(), (70.0, 688.0));
        tm.advance(5.0);
        assert_eq!(tm.position(), (80.0, 688.0));
        tm.next_line();
        // back to the line start, one leading down
        assert_eq!(tm.position(), (70.0, 664.0));
        assert_eq!(tm.scale(), 2.0);
    }
}
