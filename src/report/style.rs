//! Fixed typography and table styling for tracking sheets.

/// An RGB colour with components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const GREY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const WHITE_SMOKE: Color = Color::rgb(0.9608, 0.9608, 0.9608);
    pub const BEIGE: Color = Color::rgb(0.9608, 0.9608, 0.8627);
}

/// The two standard PDF fonts used by reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Helvetica,
    HelveticaBold,
}

impl FontFace {
    /// Resource name used in page content streams.
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontFace::Helvetica => "F1",
            FontFace::HelveticaBold => "F2",
        }
    }

    /// PostScript base font name.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontFace::Helvetica => "Helvetica",
            FontFace::HelveticaBold => "Helvetica-Bold",
        }
    }
}

/// Horizontal placement of paragraph lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
}

/// Paragraph style (font, size, leading, spacing in points).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphStyle {
    pub face: FontFace,
    pub size: f32,
    pub leading: f32,
    pub alignment: Alignment,
    pub space_before: f32,
    pub space_after: f32,
}

impl ParagraphStyle {
    /// Report title: bold, centred.
    pub const TITLE: ParagraphStyle = ParagraphStyle {
        face: FontFace::HelveticaBold,
        size: 18.0,
        leading: 22.0,
        alignment: Alignment::Center,
        space_before: 0.0,
        space_after: 6.0,
    };

    /// Body text.
    pub const NORMAL: ParagraphStyle = ParagraphStyle {
        face: FontFace::Helvetica,
        size: 10.0,
        leading: 12.0,
        alignment: Alignment::Left,
        space_before: 0.0,
        space_after: 0.0,
    };

    /// "Competency:" heading.
    pub const HEADING1: ParagraphStyle = ParagraphStyle {
        face: FontFace::HelveticaBold,
        size: 18.0,
        leading: 22.0,
        alignment: Alignment::Left,
        space_before: 0.0,
        space_after: 6.0,
    };

    /// "Goal:" heading.
    pub const HEADING2: ParagraphStyle = ParagraphStyle {
        face: FontFace::HelveticaBold,
        size: 14.0,
        leading: 18.0,
        alignment: Alignment::Left,
        space_before: 12.0,
        space_after: 6.0,
    };
}

/// Checklist table styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStyle {
    pub header_face: FontFace,
    pub body_face: FontFace,
    pub font_size: f32,
    pub leading: f32,
    pub header_background: Color,
    pub header_text: Color,
    pub body_background: Color,
    pub body_text: Color,
    pub grid_color: Color,
    pub grid_width: f32,
    pub padding_x: f32,
    pub padding_top: f32,
    pub padding_bottom: f32,
    pub header_padding_bottom: f32,
}

impl TableStyle {
    /// Grey header with white-smoke bold text, beige body, black grid, centred cells.
    pub const CHECKLIST: TableStyle = TableStyle {
        header_face: FontFace::HelveticaBold,
        body_face: FontFace::Helvetica,
        font_size: 10.0,
        leading: 12.0,
        header_background: Color::GREY,
        header_text: Color::WHITE_SMOKE,
        body_background: Color::BEIGE,
        body_text: Color::BLACK,
        grid_color: Color::BLACK,
        grid_width: 1.0,
        padding_x: 6.0,
        padding_top: 3.0,
        padding_bottom: 3.0,
        header_padding_bottom: 12.0,
    };

    /// Height of the header row.
    pub fn header_height(&self) -> f32 {
        self.padding_top + self.leading + self.header_padding_bottom
    }

    /// Height of a body row.
    pub fn body_height(&self) -> f32 {
        self.padding_top + self.leading + self.padding_bottom
    }
}

/// US Letter page geometry in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    pub const LETTER: PageGeometry = PageGeometry {
        width: 612.0,
        height: 792.0,
        margin: 72.0,
    };

    pub fn frame_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn frame_top(&self) -> f32 {
        self.height - self.margin
    }

    pub fn frame_bottom(&self) -> f32 {
        self.margin
    }
}
