/*
 *  text/layout.rs
 *
 *  ili9486-gfx - pixels, fonts and datums for dumb TFT panels
 *  (c) 2020-26 Stuart Hunter
 *
 *  String metrics and datum anchoring
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use embedded_graphics::prelude::Point;

use crate::font::{builtin, ActiveFont};

/// Anchor of a string's box relative to the draw coordinates.
///
/// A 3x3 grid: the index is `row * 3 + column`, rows being top, middle and
/// bottom (baseline for GFX fonts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Datum {
    #[default]
    TopLeft = 0,
    TopCentre = 1,
    TopRight = 2,
    MiddleLeft = 3,
    MiddleCentre = 4,
    MiddleRight = 5,
    BottomLeft = 6,
    BottomCentre = 7,
    BottomRight = 8,
}

impl Datum {
    /// Numeric datum (TL_DATUM = 0 .. BR_DATUM = 8); out of range is top-left
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => Datum::TopCentre,
            2 => Datum::TopRight,
            3 => Datum::MiddleLeft,
            4 => Datum::MiddleCentre,
            5 => Datum::MiddleRight,
            6 => Datum::BottomLeft,
            7 => Datum::BottomCentre,
            8 => Datum::BottomRight,
            _ => Datum::TopLeft,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// 0 left, 1 centre, 2 right
    fn column(self) -> u8 {
        self.index() % 3
    }

    /// 0 top, 1 middle, 2 bottom
    fn row(self) -> u8 {
        self.index() / 3
    }
}

/// Scaled extent of a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextMetrics {
    /// Sum of the advances
    pub width: i32,
    /// Top of the tallest glyph to bottom of the deepest
    pub height: i32,
    /// Baseline to top of the tallest glyph
    pub ascent: i32,
}

/// Measure `text` in `font` at `size`.
///
/// The built-in font is a fixed 6x8 cell per byte. For GFX fonts only
/// characters the font covers count; a string with none of them measures
/// as zero.
pub fn measure(text: &str, font: ActiveFont, size: i32) -> TextMetrics {
    let size = size.max(1);
    match font {
        ActiveFont::Builtin => {
            let height = builtin::LINE_HEIGHT * size;
            TextMetrics {
                width: text.len() as i32 * builtin::ADVANCE * size,
                height,
                ascent: height,
            }
        }
        ActiveFont::Gfx(font) => {
            let mut width = 0;
            let mut extent: Option<(i32, i32)> = None;
            for glyph in text.bytes().filter_map(|c| font.glyph(c)) {
                width += glyph.x_advance as i32 * size;
                let top = glyph.y_offset as i32;
                let bottom = top + glyph.height as i32;
                extent = Some(match extent {
                    Some((min_y, max_y)) => (min_y.min(top), max_y.max(bottom)),
                    None => (top, bottom),
                });
            }
            let Some((min_y, max_y)) = extent else {
                return TextMetrics::default();
            };
            TextMetrics {
                width,
                height: (max_y - min_y) * size,
                ascent: -min_y * size,
            }
        }
    }
}

/// Move `origin` from the datum point to where drawing starts.
///
/// The result is the cursor for the first glyph: its top-left cell for the
/// built-in font, its baseline origin for GFX fonts.
pub fn anchor(origin: Point, metrics: &TextMetrics, datum: Datum, font: ActiveFont) -> Point {
    let mut at = origin;

    match datum.column() {
        1 => at.x -= metrics.width / 2,
        2 => at.x -= metrics.width,
        _ => {}
    }

    match (datum.row(), font) {
        (0, ActiveFont::Gfx(_)) => at.y += metrics.ascent,
        (1, ActiveFont::Gfx(_)) => at.y += metrics.ascent - metrics.height / 2,
        (1, ActiveFont::Builtin) => at.y += metrics.height / 2,
        // builtin glyphs already hang from the top; bottom is left alone
        // for both fonts (baseline for GFX)
        _ => {}
    }
    at
}
