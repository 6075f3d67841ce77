/*
 *  font/mod.rs
 *
 *  ili9486-gfx - pixels, fonts and datums for dumb TFT panels
 *  (c) 2020-26 Stuart Hunter
 *
 *  Font model - GFX glyph tables, active font and the slot registry
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

use log::debug;

use crate::display::error::DisplayError;

pub mod builtin;

/// Number of user registrable font slots
pub const USER_SLOTS: usize = 4;

/// One glyph of a GFX (Adafruit format) font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GfxGlyph {
    /// Byte offset of the first row in the font bitmap
    pub bitmap_offset: u16,
    pub width: u8,
    pub height: u8,
    /// Cursor advance after this glyph
    pub x_advance: u8,
    /// Cursor to upper-left corner of the bitmap
    pub x_offset: i8,
    pub y_offset: i8,
}

impl GfxGlyph {
    pub const fn new(
        bitmap_offset: u16,
        width: u8,
        height: u8,
        x_advance: u8,
        x_offset: i8,
        y_offset: i8,
    ) -> Self {
        Self { bitmap_offset, width, height, x_advance, x_offset, y_offset }
    }
}

/// A variable width bitmap font covering `first..=last`.
///
/// Glyph bitmaps are MSB first and packed row after row with no padding
/// between rows; only the start of a glyph is byte aligned. The y offsets
/// are relative to the baseline, so they are usually negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GfxFont {
    pub bitmap: &'static [u8],
    pub glyphs: &'static [GfxGlyph],
    pub first: u8,
    pub last: u8,
    /// Newline distance
    pub y_advance: u8,
}

impl GfxFont {
    pub fn contains(&self, c: u8) -> bool {
        (self.first..=self.last).contains(&c)
    }

    /// Glyph for `c`, or `None` outside the font's range
    pub fn glyph(&self, c: u8) -> Option<&'static GfxGlyph> {
        if !self.contains(c) {
            return None;
        }
        self.glyphs.get((c - self.first) as usize)
    }
}

/// The font glyphs are drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveFont {
    #[default]
    Builtin,
    Gfx(&'static GfxFont),
}

impl ActiveFont {
    /// Unscaled newline distance
    pub fn line_advance(&self) -> i32 {
        match self {
            ActiveFont::Builtin => builtin::LINE_HEIGHT,
            ActiveFont::Gfx(font) => font.y_advance as i32,
        }
    }
}

impl From<Option<&'static GfxFont>> for ActiveFont {
    fn from(font: Option<&'static GfxFont>) -> Self {
        font.map_or(ActiveFont::Builtin, ActiveFont::Gfx)
    }
}

/// Font selector for the one-shot string calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontSlot {
    /// Whatever the session has active
    #[default]
    Current,
    /// The built-in 5x7 font
    Builtin,
    /// A registered user font (0..=3); empty slots fall back to builtin
    User(u8),
}

impl FontSlot {
    /// Legacy numeric selector: 0 current, 1 builtin, 2..=5 user slots.
    /// Anything else selects the built-in font.
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => FontSlot::Current,
            2..=5 => FontSlot::User(index - 2),
            _ => FontSlot::Builtin,
        }
    }
}

/// User font table behind [`FontSlot::User`]
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    slots: [Option<&'static GfxFont>; USER_SLOTS],
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill (or with `None`, clear) a user slot
    pub fn register(&mut self, slot: FontSlot, font: Option<&'static GfxFont>) -> Result<(), DisplayError> {
        let FontSlot::User(index) = slot else {
            return Err(DisplayError::InvalidFontSlot(slot));
        };
        let entry = self
            .slots
            .get_mut(index as usize)
            .ok_or(DisplayError::InvalidFontSlot(slot))?;
        *entry = font;
        debug!("Font slot {} {}", index, if font.is_some() { "registered" } else { "cleared" });
        Ok(())
    }

    /// Font registered in user slot `index`
    pub fn get(&self, index: u8) -> Option<&'static GfxFont> {
        self.slots.get(index as usize).copied().flatten()
    }

    /// Turn a selector into a font, given what the session has active
    pub fn resolve(&self, slot: FontSlot, current: ActiveFont) -> ActiveFont {
        match slot {
            FontSlot::Current => current,
            FontSlot::Builtin => ActiveFont::Builtin,
            FontSlot::User(index) => match self.get(index) {
                Some(font) => ActiveFont::Gfx(font),
                None => {
                    debug!("Font slot {} empty, using builtin", index);
                    ActiveFont::Builtin
                }
            },
        }
    }
}

/// Small GFX font for tests: covers 'I'..='O', only I, K and O have ink.
#[cfg(test)]
pub(crate) mod test_font {
    use super::{GfxFont, GfxGlyph};

    static BITMAP: [u8; 11] = [
        0xFF, 0xC0, // I: 1x10 solid bar
        0xBA, 0x80, // K: 3x3, rows 101 110 101
        0x69, 0x99, 0x99, 0x99, 0x99, 0x99, 0x96, // O: 4x14 ring
    ];

    static GLYPHS: [GfxGlyph; 7] = [
        GfxGlyph::new(0, 1, 10, 3, 1, -10),  // I
        GfxGlyph::new(0, 0, 0, 4, 0, 0),     // J
        GfxGlyph::new(2, 3, 3, 5, 0, -10),   // K
        GfxGlyph::new(0, 0, 0, 4, 0, 0),     // L
        GfxGlyph::new(0, 0, 0, 4, 0, 0),     // M
        GfxGlyph::new(0, 0, 0, 4, 0, 0),     // N
        GfxGlyph::new(4, 4, 14, 6, 1, -10),  // O
    ];

    pub static FONT: GfxFont = GfxFont {
        bitmap: &BITMAP,
        glyphs: &GLYPHS,
        first: b'I',
        last: b'O',
        y_advance: 16,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_indices() {
        assert_eq!(FontSlot::from_index(0), FontSlot::Current);
        assert_eq!(FontSlot::from_index(1), FontSlot::Builtin);
        assert_eq!(FontSlot::from_index(2), FontSlot::User(0));
        assert_eq!(FontSlot::from_index(5), FontSlot::User(3));
        assert_eq!(FontSlot::from_index(6), FontSlot::Builtin);
        assert_eq!(FontSlot::from_index(255), FontSlot::Builtin);
    }

    #[test]
    fn test_registry_resolution() {
        let mut registry = FontRegistry::new();
        let font = &test_font::FONT;

        assert_eq!(registry.resolve(FontSlot::User(1), ActiveFont::Gfx(font)), ActiveFont::Builtin);
        registry.register(FontSlot::User(1), Some(font)).unwrap();
        assert_eq!(registry.resolve(FontSlot::User(1), ActiveFont::Builtin), ActiveFont::Gfx(font));
        assert_eq!(registry.resolve(FontSlot::Current, ActiveFont::Gfx(font)), ActiveFont::Gfx(font));
        assert_eq!(registry.resolve(FontSlot::Builtin, ActiveFont::Gfx(font)), ActiveFont::Builtin);

        registry.register(FontSlot::User(1), None).unwrap();
        assert_eq!(registry.get(1), None);
    }

    #[test]
    fn test_registry_rejects_non_user_slots() {
        let mut registry = FontRegistry::new();
        assert!(matches!(
            registry.register(FontSlot::User(4), None),
            Err(DisplayError::InvalidFontSlot(FontSlot::User(4)))
        ));
        assert!(registry.register(FontSlot::Current, Some(&test_font::FONT)).is_err());
        assert!(registry.register(FontSlot::Builtin, None).is_err());
    }

    #[test]
    fn test_glyph_lookup() {
        let font = &test_font::FONT;
        assert_eq!(font.glyph(b'K').map(|g| g.x_advance), Some(5));
        assert!(font.glyph(b'H').is_none());
        assert!(font.glyph(b'P').is_none());
        assert_eq!(ActiveFont::Gfx(font).line_advance(), 16);
        assert_eq!(ActiveFont::Builtin.line_advance(), 8);
        assert_eq!(ActiveFont::from(None), ActiveFont::Builtin);
    }
}
