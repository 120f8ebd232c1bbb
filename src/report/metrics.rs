//! Helvetica glyph widths and word wrapping.
//!
//! Widths are the standard AFM advance widths in 1/1000 em for every glyph
//! [`encode_win_ansi`](super::encode_win_ansi) can emit: ASCII, Latin-1 and
//! the Windows-1252 punctuation it maps. Anything else is drawn as `?` and
//! measured as one.

use super::style::FontFace;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

// U+00A0..=U+00FF
#[rustfmt::skip]
const HELVETICA_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
const HELVETICA_BOLD_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

fn punctuation_width(face: FontFace, c: char) -> Option<u16> {
    let bold = face == FontFace::HelveticaBold;
    let width = match c {
        '\u{20ac}' => 556,
        '\u{2026}' | '\u{2014}' => 1000,
        '\u{2018}' | '\u{2019}' => {
            if bold {
                278
            } else {
                222
            }
        }
        '\u{201c}' | '\u{201d}' => {
            if bold {
                500
            } else {
                333
            }
        }
        '\u{2022}' => 350,
        '\u{2013}' => 556,
        _ => return None,
    };
    Some(width)
}

fn glyph_width(face: FontFace, c: char) -> u16 {
    let (ascii, latin1) = match face {
        FontFace::Helvetica => (&HELVETICA, &HELVETICA_LATIN1),
        FontFace::HelveticaBold => (&HELVETICA_BOLD, &HELVETICA_BOLD_LATIN1),
    };
    match c {
        ' '..='~' => ascii[c as usize - 0x20],
        '\u{a0}'..='\u{ff}' => latin1[c as usize - 0xa0],
        _ => punctuation_width(face, c).unwrap_or(ascii[usize::from(b'?') - 0x20]),
    }
}

fn char_width(c: char, face: FontFace, size: f32) -> f32 {
    f32::from(glyph_width(face, c)) * size / 1000.0
}

/// Width of `text` in points at `size`.
pub fn text_width(text: &str, face: FontFace, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(face, c))).sum();
    units as f32 * size / 1000.0
}

/// Greedy word wrap to `max_width` points.
///
/// Words wider than a line are broken between characters. Empty text yields
/// no lines.
pub fn wrap_text(text: &str, face: FontFace, size: f32, max_width: f32) -> Vec<String> {
    let space = text_width(" ", face, size);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0;

    for word in text.split_whitespace() {
        let width = text_width(word, face, size);
        if !current.is_empty() && current_width + space + width > max_width {
            lines.push(std::mem::take(&mut current));
            current_width = 0.0;
        }

        if width > max_width {
            // `current` is empty here; the last piece stays open for the next word.
            for c in word.chars() {
                let w = char_width(c, face, size);
                if !current.is_empty() && current_width + w > max_width {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(c);
                current_width += w;
            }
            continue;
        }

        if !current.is_empty() {
            current.push(' ');
            current_width += space;
        }
        current.push_str(word);
        current_width += width;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
