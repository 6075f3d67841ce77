/*
 *  text/mod.rs
 *
 *  ili9486-gfx - pixels, fonts and datums for dumb TFT panels
 *  (c) 2020-26 Stuart Hunter
 *
 *  Text state and the streaming renderer
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

use crate::display::color::Color;
use crate::display::traits::RasterTarget;
use crate::font::{builtin, ActiveFont};

pub mod glyph;
pub mod layout;

pub use layout::{anchor, measure, Datum, TextMetrics};

/// Everything a glyph needs to be drawn, fixed for one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub font: ActiveFont,
    /// Scale factor, >= 1
    pub size: i32,
    pub fg: Color,
    /// Background painted behind glyphs; `None` is transparent
    pub bg: Option<Color>,
}

impl RenderContext {
    /// Scaled cursor step for `c`, `None` when the font skips it
    pub fn advance(&self, c: u8) -> Option<i32> {
        match self.font {
            ActiveFont::Builtin => Some(builtin::ADVANCE * self.size),
            ActiveFont::Gfx(font) => font.glyph(c).map(|g| g.x_advance as i32 * self.size),
        }
    }

    /// Carriage return plus line feed
    pub fn newline(&self, cursor: &mut Point) {
        cursor.x = 0;
        cursor.y += self.font.line_advance() * self.size;
    }
}

/// Session text state used by `print`/`println`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextState {
    pub cursor: Point,
    pub fg: Color,
    pub bg: Color,
    /// Paint `bg` behind glyphs
    pub use_bg: bool,
    size: u8,
    pub font: ActiveFont,
    pub datum: Datum,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            cursor: Point::zero(),
            fg: Color::WHITE,
            bg: Color::BLACK,
            use_bg: false,
            size: 1,
            font: ActiveFont::Builtin,
            datum: Datum::TopLeft,
        }
    }
}

impl TextState {
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Zero is treated as 1
    pub fn set_size(&mut self, size: u8) {
        self.size = size.max(1);
    }

    /// Foreground only, background off
    pub fn set_color(&mut self, fg: Color) {
        self.fg = fg;
        self.use_bg = false;
    }

    /// Foreground and background, background on
    pub fn set_colors(&mut self, fg: Color, bg: Color) {
        self.fg = fg;
        self.bg = bg;
        self.use_bg = true;
    }

    /// Snapshot for drawing in the active font
    pub fn context(&self) -> RenderContext {
        self.context_with(self.font)
    }

    /// Snapshot for drawing in `font`, everything else from the session
    pub fn context_with(&self, font: ActiveFont) -> RenderContext {
        RenderContext {
            font,
            size: self.size as i32,
            fg: self.fg,
            bg: self.use_bg.then_some(self.bg),
        }
    }
}

/// Stream `text` from `cursor`, leaving the cursor after the last glyph.
///
/// `'\n'` returns to x = 0 and drops one scaled line. Characters a GFX
/// font does not cover are skipped without moving the cursor.
pub fn render<T>(target: &mut T, ctx: &RenderContext, cursor: &mut Point, text: &str) -> Result<(), T::Error>
where
    T: RasterTarget + ?Sized,
{
    for c in text.bytes() {
        if c == b'\n' {
            ctx.newline(cursor);
            continue;
        }
        let Some(advance) = ctx.advance(c) else {
            continue;
        };
        glyph::draw_char(target, ctx, cursor.x, cursor.y, c)?;
        cursor.x += advance;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::traits::tests::Canvas;
    use crate::font::test_font::FONT;

    #[test]
    fn test_state_defaults_and_clamp() {
        let mut state = TextState::default();
        assert_eq!(state.size(), 1);
        assert_eq!(state.context().bg, None);
        state.set_size(0);
        assert_eq!(state.size(), 1);
        state.set_size(4);
        assert_eq!(state.context().size, 4);
    }

    #[test]
    fn test_colour_setters_toggle_background() {
        let mut state = TextState::default();
        state.set_colors(Color::RED, Color::BLUE);
        assert_eq!(state.context().bg, Some(Color::BLUE));
        state.set_color(Color::GREEN);
        assert_eq!(state.context().bg, None);
        assert_eq!(state.bg, Color::BLUE);
    }

    #[test]
    fn test_builtin_cursor_walk() {
        let mut state = TextState::default();
        state.set_size(2);
        let ctx = state.context();
        let mut canvas = Canvas::new(320, 480);
        let mut cursor = Point::new(10, 5);

        render(&mut canvas, &ctx, &mut cursor, "AB").unwrap();
        assert_eq!(cursor, Point::new(10 + 24, 5));

        render(&mut canvas, &ctx, &mut cursor, "\nC").unwrap();
        assert_eq!(cursor, Point::new(12, 21));
    }

    #[test]
    fn test_gfx_skips_uncovered() {
        let ctx = RenderContext { font: ActiveFont::Gfx(&FONT), size: 1, fg: Color::WHITE, bg: None };
        let mut canvas = Canvas::new(320, 480);
        let mut cursor = Point::new(0, 40);

        render(&mut canvas, &ctx, &mut cursor, "O?K").unwrap();
        assert_eq!(cursor.x, 11);

        render(&mut canvas, &ctx, &mut cursor, "\n").unwrap();
        assert_eq!(cursor, Point::new(0, 56));
    }
}
