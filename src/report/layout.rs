//! Flow layout of report content onto fixed-size pages.
//!
//! Content is a flat list of [`Flowable`]s placed top to bottom inside the
//! page frame. A flowable that does not fit on the current page moves to a
//! new one; table rows split across pages and repeat the header row.

use super::metrics::{text_width, wrap_text};
use super::style::{Alignment, Color, FontFace, PageGeometry, ParagraphStyle, TableStyle};

/// A unit of flowing report content.
#[derive(Debug, Clone, PartialEq)]
pub enum Flowable {
    Paragraph {
        text: String,
        style: ParagraphStyle,
    },
    Spacer(f32),
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
        style: TableStyle,
    },
    PageBreak,
}

/// A positioned drawing primitive in PDF user space (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        face: FontFace,
        size: f32,
        color: Color,
        text: String,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        line_width: f32,
        color: Color,
    },
}

/// Drawing operations for one output page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub ops: Vec<DrawOp>,
}

impl LaidOutPage {
    /// Text drawn on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

struct Cursor {
    geometry: PageGeometry,
    pages: Vec<LaidOutPage>,
    y: f32,
}

impl Cursor {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![LaidOutPage::default()],
            y: geometry.frame_top(),
        }
    }

    fn at_top(&self) -> bool {
        self.y >= self.geometry.frame_top()
    }

    fn fits(&self, height: f32) -> bool {
        self.y - height >= self.geometry.frame_bottom()
    }

    fn new_page(&mut self) {
        self.pages.push(LaidOutPage::default());
        self.y = self.geometry.frame_top();
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn paragraph(&mut self, text: &str, style: &ParagraphStyle) {
        let frame_width = self.geometry.frame_width();
        let lines = wrap_text(text, style.face, style.size, frame_width);
        if lines.is_empty() {
            return;
        }

        // Keep a paragraph together unless it is taller than a whole frame.
        let height = lines.len() as f32 * style.leading;
        let frame_height = self.geometry.frame_top() - self.geometry.frame_bottom();
        if !self.at_top() && !self.fits(style.space_before + height) && height <= frame_height {
            self.new_page();
        }
        if !self.at_top() {
            self.y -= style.space_before;
        }

        let left = self.geometry.margin;
        for line in lines {
            if !self.at_top() && !self.fits(style.leading) {
                self.new_page();
            }
            let baseline = self.y - style.size;
            let x = match style.alignment {
                Alignment::Left => left,
                Alignment::Center => {
                    left + (frame_width - text_width(&line, style.face, style.size)) / 2.0
                }
            };
            self.push(DrawOp::Text {
                x,
                y: baseline,
                face: style.face,
                size: style.size,
                color: Color::BLACK,
                text: line,
            });
            self.y -= style.leading;
        }
        self.y -= style.space_after;
    }

    fn spacer(&mut self, height: f32) {
        if self.at_top() {
            return;
        }
        if self.fits(height) {
            self.y -= height;
        } else {
            self.new_page();
        }
    }

    fn table(&mut self, header: &[String], rows: &[Vec<String>], style: &TableStyle) {
        let widths = column_widths(header, rows, style);
        let total: f32 = widths.iter().sum();
        let frame_width = self.geometry.frame_width();
        let left = self.geometry.margin + ((frame_width - total) / 2.0).max(0.0);

        let header_height = style.header_height();
        let body_height = style.body_height();

        if !self.at_top() && !self.fits(header_height + body_height) {
            self.new_page();
        }
        self.table_row(left, &widths, header, style, true);

        for row in rows {
            if !self.fits(body_height) {
                self.new_page();
                self.table_row(left, &widths, header, style, true);
            }
            self.table_row(left, &widths, row, style, false);
        }
    }

    fn table_row(
        &mut self,
        left: f32,
        widths: &[f32],
        cells: &[String],
        style: &TableStyle,
        is_header: bool,
    ) {
        let (height, face, background, text_color) = if is_header {
            (
                style.header_height(),
                style.header_face,
                style.header_background,
                style.header_text,
            )
        } else {
            (
                style.body_height(),
                style.body_face,
                style.body_background,
                style.body_text,
            )
        };
        let total: f32 = widths.iter().sum();
        let bottom = self.y - height;

        self.push(DrawOp::FillRect {
            x: left,
            y: bottom,
            width: total,
            height,
            color: background,
        });

        let baseline = self.y - style.padding_top - style.font_size;
        let mut x = left;
        for (width, cell) in widths.iter().zip(cells) {
            self.push(DrawOp::StrokeRect {
                x,
                y: bottom,
                width: *width,
                height,
                line_width: style.grid_width,
                color: style.grid_color,
            });
            let text_x = x + (width - text_width(cell, face, style.font_size)) / 2.0;
            self.push(DrawOp::Text {
                x: text_x,
                y: baseline,
                face,
                size: style.font_size,
                color: text_color,
                text: cell.clone(),
            });
            x += width;
        }

        self.y = bottom;
    }

    fn page_break(&mut self) {
        if !self.at_top() {
            self.new_page();
        }
    }
}

/// Widest cell per column plus horizontal padding.
pub fn column_widths(header: &[String], rows: &[Vec<String>], style: &TableStyle) -> Vec<f32> {
    let mut widths: Vec<f32> = header
        .iter()
        .map(|h| text_width(h, style.header_face, style.font_size))
        .collect();

    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let w = text_width(cell, style.body_face, style.font_size);
            match widths.get_mut(i) {
                Some(current) => *current = current.max(w),
                None => widths.push(w),
            }
        }
    }

    widths
        .into_iter()
        .map(|w| w + 2.0 * style.padding_x)
        .collect()
}

/// Place flowables onto pages. Always returns at least one page.
pub fn layout(flowables: &[Flowable], geometry: PageGeometry) -> Vec<LaidOutPage> {
    let mut cursor = Cursor::new(geometry);

    for flowable in flowables {
        match flowable {
            Flowable::Paragraph { text, style } => cursor.paragraph(text, style),
            Flowable::Spacer(height) => cursor.spacer(*height),
            Flowable::Table {
                header,
                rows,
                style,
            } => cursor.table(header, rows, style),
            Flowable::PageBreak => cursor.page_break(),
        }
    }

    // A trailing break leaves an empty page behind.
    if cursor.pages.len() > 1 && cursor.pages.last().is_some_and(|p| p.ops.is_empty()) {
        cursor.pages.pop();
    }

    cursor.pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str) -> Flowable {
        Flowable::Paragraph {
            text: text.to_string(),
            style: ParagraphStyle::NORMAL,
        }
    }

    fn table(rows: usize) -> Flowable {
        Flowable::Table {
            header: vec!["Week of".to_string(), "Monday".to_string()],
            rows: (0..rows)
                .map(|i| vec![format!("week {}", i), "Y | N".to_string()])
                .collect(),
            style: TableStyle::CHECKLIST,
        }
    }

    #[test]
    fn test_empty_layout_has_one_page() {
        let pages = layout(&[], PageGeometry::LETTER);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].ops.is_empty());
    }

    #[test]
    fn test_page_break_starts_new_page() {
        let pages = layout(
            &[para("one"), Flowable::PageBreak, para("two")],
            PageGeometry::LETTER,
        );
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].texts().collect::<Vec<_>>(), ["one"]);
        assert_eq!(pages[1].texts().collect::<Vec<_>>(), ["two"]);
    }

    #[test]
    fn test_trailing_page_break_adds_no_blank_page() {
        let pages = layout(&[para("one"), Flowable::PageBreak], PageGeometry::LETTER);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_first_baseline_below_frame_top() {
        let pages = layout(&[para("one")], PageGeometry::LETTER);
        match &pages[0].ops[0] {
            DrawOp::Text { x, y, .. } => {
                assert_eq!(*x, 72.0);
                assert_eq!(*y, 710.0);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_long_table_splits_and_repeats_header() {
        // 648pt frame: 27pt header + 18pt rows -> 34 rows on the first page.
        let pages = layout(&[table(50)], PageGeometry::LETTER);
        assert_eq!(pages.len(), 2);

        let headers = pages
            .iter()
            .map(|p| p.texts().filter(|t| *t == "Week of").count())
            .collect::<Vec<_>>();
        assert_eq!(headers, [1, 1]);

        let body_rows: usize = pages
            .iter()
            .map(|p| p.texts().filter(|t| t.starts_with("week ")).count())
            .sum();
        assert_eq!(body_rows, 50);
    }

    #[test]
    fn test_table_is_centred() {
        let pages = layout(&[table(1)], PageGeometry::LETTER);
        let style = TableStyle::CHECKLIST;
        let header = vec!["Week of".to_string(), "Monday".to_string()];
        let rows = vec![vec!["week 0".to_string(), "Y | N".to_string()]];
        let total: f32 = column_widths(&header, &rows, &style).iter().sum();

        match &pages[0].ops[0] {
            DrawOp::FillRect { x, width, .. } => {
                assert!((x - (72.0 + (468.0 - total) / 2.0)).abs() < 1e-3);
                assert!((width - total).abs() < 1e-3);
            }
            other => panic!("expected header background, got {:?}", other),
        }
    }

    #[test]
    fn test_column_widths_include_padding() {
        let style = TableStyle::CHECKLIST;
        let widths = column_widths(&["ab".to_string()], &[vec!["abcd".to_string()]], &style);
        let expected = text_width("abcd", FontFace::Helvetica, 10.0) + 12.0;
        assert_eq!(widths.len(), 1);
        assert!((widths[0] - expected).abs() < 1e-4);
    }
}
