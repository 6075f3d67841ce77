/*
 *  text/glyph.rs
 *
 *  ili9486-gfx - pixels, fonts and datums for dumb TFT panels
 *  (c) 2020-26 Stuart Hunter
 *
 *  Glyph rasterizer for the built-in and GFX fonts
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

use crate::display::bits::Bits;
use crate::display::traits::RasterTarget;
use crate::font::{builtin, ActiveFont, GfxFont, GfxGlyph};
use crate::text::RenderContext;

/// Draw one character with its cursor at `(x, y)`.
///
/// For the built-in font the cursor is the top-left of the cell; for GFX
/// fonts it is the baseline origin. GFX characters the font does not
/// cover draw nothing.
pub fn draw_char<T>(target: &mut T, ctx: &RenderContext, x: i32, y: i32, c: u8) -> Result<(), T::Error>
where
    T: RasterTarget + ?Sized,
{
    match ctx.font {
        ActiveFont::Builtin => draw_builtin_char(target, ctx, x, y, c),
        ActiveFont::Gfx(font) => match font.glyph(c) {
            Some(glyph) => draw_gfx_char(target, ctx, font, glyph, x, y),
            None => Ok(()),
        },
    }
}

/// 5x8 cell, column by column, bit 0 at the top
pub fn draw_builtin_char<T>(target: &mut T, ctx: &RenderContext, x: i32, y: i32, c: u8) -> Result<(), T::Error>
where
    T: RasterTarget + ?Sized,
{
    let size = ctx.size;
    for (i, column) in builtin::glyph(c).iter().enumerate() {
        let i = i as i32;
        for j in 0..builtin::GLYPH_HEIGHT {
            let color = if (column >> j) & 1 != 0 {
                ctx.fg
            } else if let Some(bg) = ctx.bg {
                bg
            } else {
                continue;
            };
            if size == 1 {
                target.draw_pixel(x + i, y + j, color)?;
            } else {
                target.fill_rect(x + i * size, y + j * size, size, size, color)?;
            }
        }
    }
    Ok(())
}

/// GFX glyph at baseline origin `(x, y)`.
///
/// Unscaled glyphs go out as horizontal runs of set bits, one fill per run,
/// over a box pre-filled with the background when there is one. Scaled
/// glyphs are drawn as one `size x size` block per source pixel.
pub fn draw_gfx_char<T>(
    target: &mut T,
    ctx: &RenderContext,
    font: &GfxFont,
    glyph: &GfxGlyph,
    x: i32,
    y: i32,
) -> Result<(), T::Error>
where
    T: RasterTarget + ?Sized,
{
    let (w, h) = (glyph.width as i32, glyph.height as i32);
    let (xo, yo) = (glyph.x_offset as i32, glyph.y_offset as i32);
    let mut bits = Bits::new(font.bitmap, glyph.bitmap_offset as usize);

    if ctx.size == 1 {
        if let Some(bg) = ctx.bg {
            target.fill_rect(x + xo, y + yo, w, h, bg)?;
        }
        for row in 0..h {
            for run in bits.runs(w as usize).filter(|run| run.set) {
                target.fill_rect(x + xo + run.start, y + yo + row, run.len, 1, ctx.fg)?;
            }
        }
        return Ok(());
    }

    let size = ctx.size;
    for row in 0..h {
        for col in 0..w {
            let color = if bits.next() == Some(true) {
                ctx.fg
            } else if let Some(bg) = ctx.bg {
                bg
            } else {
                continue;
            };
            target.fill_rect(x + (xo + col) * size, y + (yo + row) * size, size, size, color)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::color::Color;
    use crate::display::traits::tests::Canvas;
    use crate::font::test_font::FONT;
    use std::collections::BTreeSet;

    fn ctx(font: ActiveFont, size: i32, bg: Option<Color>) -> RenderContext {
        RenderContext { font, size, fg: Color::WHITE, bg }
    }

    /// Pixel by pixel reference for a GFX glyph at size 1
    fn naive_gfx(glyph: &GfxGlyph, x: i32, y: i32) -> BTreeSet<(i32, i32)> {
        let mut bits = Bits::new(FONT.bitmap, glyph.bitmap_offset as usize);
        let mut out = BTreeSet::new();
        for row in 0..glyph.height as i32 {
            for col in 0..glyph.width as i32 {
                if bits.next() == Some(true) {
                    out.insert((x + glyph.x_offset as i32 + col, y + glyph.y_offset as i32 + row));
                }
            }
        }
        out
    }

    #[test]
    fn test_runs_match_per_pixel() {
        let ctx = ctx(ActiveFont::Gfx(&FONT), 1, None);
        for c in [b'I', b'K', b'O'] {
            let mut canvas = Canvas::new(64, 64);
            draw_char(&mut canvas, &ctx, 10, 30, c).unwrap();
            let drawn: BTreeSet<_> = canvas.points().into_iter().collect();
            assert_eq!(drawn, naive_gfx(FONT.glyph(c).unwrap(), 10, 30), "glyph {}", c as char);
            assert_eq!(canvas.pixel_writes, 0);
        }
    }

    #[test]
    fn test_ring_uses_runs() {
        // O: top and bottom rows are one run each, the 12 middle rows two
        let mut canvas = Canvas::new(64, 64);
        draw_char(&mut canvas, &ctx(ActiveFont::Gfx(&FONT), 1, None), 10, 30, b'O').unwrap();
        assert_eq!(canvas.fills.len(), 2 + 12 * 2);
        assert_eq!(canvas.fills[0], (12, 20, 2, 1));
    }

    #[test]
    fn test_gfx_background_box_first() {
        let mut canvas = Canvas::new(64, 64);
        draw_char(&mut canvas, &ctx(ActiveFont::Gfx(&FONT), 1, Some(Color::BLUE)), 10, 30, b'K').unwrap();
        assert_eq!(canvas.fills[0], (10, 20, 3, 3));
        assert_eq!(canvas.points_of(Color::WHITE).len(), 6);
        assert_eq!(canvas.points_of(Color::BLUE), vec![(11, 20), (11, 22), (12, 21)]);
    }

    #[test]
    fn test_gfx_scaled_blocks() {
        let mut canvas = Canvas::new(64, 64);
        draw_char(&mut canvas, &ctx(ActiveFont::Gfx(&FONT), 2, None), 10, 30, b'K').unwrap();
        assert_eq!(canvas.fills.len(), 6);
        assert!(canvas.fills.iter().all(|&(_, _, w, h)| w == 2 && h == 2));
        // top-left bit at (xo, yo) = (0, -10) scaled
        assert_eq!(canvas.fills[0], (10, 10, 2, 2));
        assert_eq!(canvas.points().len(), 6 * 4);
    }

    #[test]
    fn test_gfx_scaled_paints_background_blocks() {
        let mut canvas = Canvas::new(64, 64);
        draw_char(&mut canvas, &ctx(ActiveFont::Gfx(&FONT), 2, Some(Color::BLUE)), 10, 30, b'K').unwrap();
        // 3x3 cell: six set bits, three clear
        assert_eq!(canvas.fills.len(), 9);
        assert_eq!(canvas.points_of(Color::WHITE).len(), 6 * 4);
        assert_eq!(canvas.points_of(Color::BLUE).len(), 3 * 4);
        // row 0 is 101: the middle block is background
        assert_eq!(canvas.pixels.get(&(12, 10)), Some(&Color::BLUE));
        assert_eq!(canvas.pixels.get(&(14, 11)), Some(&Color::WHITE));
    }

    #[test]
    fn test_gfx_out_of_range_draws_nothing() {
        let mut canvas = Canvas::new(64, 64);
        draw_char(&mut canvas, &ctx(ActiveFont::Gfx(&FONT), 1, Some(Color::BLUE)), 10, 30, b'A').unwrap();
        assert!(canvas.fills.is_empty());
    }

    #[test]
    fn test_builtin_pixels() {
        let mut canvas = Canvas::new(64, 64);
        draw_char(&mut canvas, &ctx(ActiveFont::Builtin, 1, None), 0, 0, b'!').unwrap();
        // '!' is column 2 = 0x5F: rows 0..=4 and 6
        assert_eq!(canvas.points(), vec![(2, 0), (2, 1), (2, 2), (2, 3), (2, 4), (2, 6)]);
        assert_eq!(canvas.pixel_writes, 6);

        let mut opaque = Canvas::new(64, 64);
        draw_char(&mut opaque, &ctx(ActiveFont::Builtin, 1, Some(Color::BLUE)), 0, 0, b'!').unwrap();
        assert_eq!(opaque.pixel_writes, 40);
    }

    #[test]
    fn test_builtin_scaled_and_fallback() {
        let mut canvas = Canvas::new(64, 64);
        draw_char(&mut canvas, &ctx(ActiveFont::Builtin, 3, None), 0, 0, b'!').unwrap();
        assert_eq!(canvas.fills.len(), 6);
        assert_eq!(canvas.fills[0], (6, 0, 3, 3));

        // unmapped byte renders the (blank) space glyph
        let mut blank = Canvas::new(64, 64);
        draw_char(&mut blank, &ctx(ActiveFont::Builtin, 1, Some(Color::BLUE)), 0, 0, 0x07).unwrap();
        assert_eq!(blank.points_of(Color::BLUE).len(), 40);
        assert!(blank.points_of(Color::WHITE).is_empty());
    }

    #[test]
    fn test_builtin_scaled_paints_background_blocks() {
        let mut canvas = Canvas::new(64, 64);
        draw_char(&mut canvas, &ctx(ActiveFont::Builtin, 2, Some(Color::BLUE)), 0, 0, b'!').unwrap();
        assert_eq!(canvas.fills.len(), 5 * 8);
        assert!(canvas.fills.iter().all(|&(_, _, w, h)| w == 2 && h == 2));
        assert_eq!(canvas.points_of(Color::WHITE).len(), 6 * 4);
        assert_eq!(canvas.points_of(Color::BLUE).len(), 34 * 4);
        assert_eq!(canvas.pixels.get(&(4, 0)), Some(&Color::WHITE));
        // row 5 of the '!' column is the gap above the dot
        assert_eq!(canvas.pixels.get(&(5, 11)), Some(&Color::BLUE));
        assert_eq!(canvas.pixels.get(&(0, 0)), Some(&Color::BLUE));
    }
}
