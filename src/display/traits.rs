/*
 *  display/traits.rs
 *
 *  ili9486-gfx - pixels, fonts and datums for dumb TFT panels
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definitions: controller lifecycle and the primitive rasterizer
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

use embedded_hal::delay::DelayNs;

use crate::display::bits::Bits;
use crate::display::color::Color;
use crate::display::error::DisplayError;
use crate::display::geometry::{PanelGeometry, Rotation};

/// Controller lifecycle - every panel driver implements this
///
/// Drawing lives in [`RasterTarget`]; this trait only covers bringing the
/// controller up and orienting it.
pub trait DisplayDriver {
    /// Current logical geometry (depends on rotation)
    fn geometry(&self) -> PanelGeometry;

    /// Returns the display dimensions as (width, height)
    fn dimensions(&self) -> (u32, u32) {
        let geometry = self.geometry();
        (geometry.width() as u32, geometry.height() as u32)
    }

    /// Run the controller power-up sequence and clear the panel
    fn init(&mut self, delay: &mut dyn DelayNs) -> Result<(), DisplayError>;

    /// Reissue the memory access control byte and swap width/height
    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DisplayError>;
}

/// The primitive rasterizer.
///
/// Implementors supply a bounds-checked pixel write and a clipped solid
/// fill; everything else is built on those two. Anything covering more
/// than one pixel goes through [`fill_rect`](RasterTarget::fill_rect) so
/// bulk writes share the block fill path.
///
/// Coordinates are signed panel pixels. Nothing here fails on geometry:
/// off-panel work is skipped or truncated. `Err` only ever comes from the bus.
pub trait RasterTarget {
    type Error;

    /// Logical (width, height)
    fn size(&self) -> (u16, u16);

    /// Write one pixel; silently ignored outside the panel
    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) -> Result<(), Self::Error>;

    /// Fill a rectangle, clipped to the panel
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) -> Result<(), Self::Error>;

    fn fill_screen(&mut self, color: Color) -> Result<(), Self::Error> {
        let (width, height) = self.size();
        self.fill_rect(0, 0, width as i32, height as i32, color)
    }

    fn draw_hline(&mut self, x: i32, y: i32, w: i32, color: Color) -> Result<(), Self::Error> {
        self.fill_rect(x, y, w, 1, color)
    }

    fn draw_vline(&mut self, x: i32, y: i32, h: i32, color: Color) -> Result<(), Self::Error> {
        self.fill_rect(x, y, 1, h, color)
    }

    /// Bresenham line.
    ///
    /// Steep lines are walked along y. Endpoints are put in ascending order
    /// first so `a -> b` and `b -> a` cover the same pixels, and pixels that
    /// share a scanline (or column, when steep) go out as one span. The walk
    /// only visits the part of the major axis that lies on the panel.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) -> Result<(), Self::Error> {
        let (x0, y0, x1, y1) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);
        if y0 == y1 {
            return span_row(self, x0.min(x1), y0, (x1 - x0).abs() + 1, color);
        }
        if x0 == x1 {
            return span_column(self, x0, y0.min(y1), (y1 - y0).abs() + 1, color);
        }

        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        let (mut x0, mut y0, mut x1, mut y1) = if steep {
            (y0, x0, y1, x1)
        } else {
            (x0, y0, x1, y1)
        };
        if x0 > x1 {
            core::mem::swap(&mut x0, &mut x1);
            core::mem::swap(&mut y0, &mut y1);
        }

        let (width, height) = self.size();
        let limit = i64::from(if steep { height } else { width });
        let end = x1.min(limit - 1);
        if end < x0.max(0) {
            return Ok(());
        }

        let dx = x1 - x0;
        let dy = (y1 - y0).abs();
        let ystep = if y0 < y1 { 1 } else { -1 };
        let mut err = dx / 2;
        let mut y = y0;
        let mut x = x0;

        if x < 0 {
            // skip the off-panel head: after k steps err has lost k * dy and
            // gained dx once per minor step, always landing in 0..dx
            let k = -x as i128;
            let over = k * dy as i128 - err as i128;
            let steps = if over <= 0 { 0 } else { (over + dx as i128 - 1) / dx as i128 };
            err = (err as i128 - k * dy as i128 + steps * dx as i128) as i64;
            y += steps as i64 * ystep;
            x = 0;
        }

        let mut run_start = x;
        while x <= end {
            err -= dy;
            if err < 0 || x == end {
                let len = (x - run_start + 1) as i32;
                if steep {
                    self.draw_vline(saturate(y), run_start as i32, len, color)?;
                } else {
                    self.draw_hline(run_start as i32, saturate(y), len, color)?;
                }
                run_start = x + 1;
                if err < 0 {
                    y += ystep;
                    err += dx;
                }
            }
            x += 1;
        }
        Ok(())
    }

    /// Rectangle outline as four lines meeting at the corners
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) -> Result<(), Self::Error> {
        if w <= 0 || h <= 0 {
            return Ok(());
        }
        let right = saturate(x as i64 + w as i64 - 1);
        let bottom = saturate(y as i64 + h as i64 - 1);
        self.draw_line(x, y, right, y, color)?;
        self.draw_line(right, y, right, bottom, color)?;
        self.draw_line(right, bottom, x, bottom, color)?;
        self.draw_line(x, bottom, x, y, color)
    }

    /// Midpoint circle outline
    fn draw_circle(&mut self, x0: i32, y0: i32, r: i32, color: Color) -> Result<(), Self::Error> {
        if r < 0 {
            return Ok(());
        }
        let (width, height) = self.size();
        let (cx, cy, r) = (x0 as i64, y0 as i64, r as i64);
        if misses_panel(cx, cy, r, width, height) {
            return Ok(());
        }

        let mut f = 1 - r;
        let mut dd_f_x = 1;
        let mut dd_f_y = -2 * r;
        let (mut x, mut y) = (0, r);

        for (px, py) in [(cx, cy + r), (cx, cy - r), (cx + r, cy), (cx - r, cy)] {
            self.draw_pixel(saturate(px), saturate(py), color)?;
        }

        while x < y {
            if f >= 0 {
                y -= 1;
                dd_f_y += 2;
                f += dd_f_y;
            }
            x += 1;
            dd_f_x += 2;
            f += dd_f_x;

            for (px, py) in [
                (cx + x, cy + y),
                (cx - x, cy + y),
                (cx + x, cy - y),
                (cx - x, cy - y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx + y, cy - x),
                (cx - y, cy - x),
            ] {
                self.draw_pixel(saturate(px), saturate(py), color)?;
            }
            // later points sit at least x either side of the centre
            if cx - x < 0 && cx + x >= width as i64 {
                break;
            }
        }
        Ok(())
    }

    /// Filled circle from vertical spans
    ///
    /// One centre column, then four mirrored columns per midpoint step.
    fn fill_circle(&mut self, x0: i32, y0: i32, r: i32, color: Color) -> Result<(), Self::Error> {
        if r < 0 {
            return Ok(());
        }
        let (width, height) = self.size();
        let (cx, cy, r) = (x0 as i64, y0 as i64, r as i64);
        if misses_panel(cx, cy, r, width, height) {
            return Ok(());
        }
        span_column(self, cx, cy - r, 2 * r + 1, color)?;

        let mut f = 1 - r;
        let mut dd_f_x = 1;
        let mut dd_f_y = -2 * r;
        let (mut x, mut y) = (0, r);

        while x < y {
            if f >= 0 {
                y -= 1;
                dd_f_y += 2;
                f += dd_f_y;
            }
            x += 1;
            dd_f_x += 2;
            f += dd_f_x;

            span_column(self, cx + x, cy - y, 2 * y + 1, color)?;
            span_column(self, cx - x, cy - y, 2 * y + 1, color)?;
            span_column(self, cx + y, cy - x, 2 * x + 1, color)?;
            span_column(self, cx - y, cy - x, 2 * x + 1, color)?;
            if cx - x < 0 && cx + x >= width as i64 {
                break;
            }
        }
        Ok(())
    }

    /// Blit a 1-bit bitmap, MSB first, each row padded to a whole byte.
    ///
    /// Clear bits are transparent unless `bg` is given. Equal bits along a
    /// row are sent as one span.
    fn draw_bitmap(
        &mut self,
        x: i32,
        y: i32,
        bitmap: &[u8],
        w: i32,
        h: i32,
        fg: Color,
        bg: Option<Color>,
    ) -> Result<(), Self::Error> {
        if w <= 0 || h <= 0 {
            return Ok(());
        }
        let byte_width = (w as usize).div_ceil(8);

        for row in 0..h {
            let mut bits = Bits::new(bitmap, row as usize * byte_width);
            for run in bits.runs(w as usize) {
                let color = match (run.set, bg) {
                    (true, _) => fg,
                    (false, Some(bg)) => bg,
                    (false, None) => continue,
                };
                self.draw_hline(x.saturating_add(run.start), y.saturating_add(row), run.len, color)?;
            }
        }
        Ok(())
    }
}

/// Narrow a coordinate; anything that saturates is off the panel either way
fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Intersect `start..start + len` with `0..limit`
fn clip_span(start: i64, len: i64, limit: u16) -> (i32, i32) {
    let lo = start.max(0);
    let hi = start.saturating_add(len).min(limit as i64);
    if hi <= lo { (0, 0) } else { (lo as i32, (hi - lo) as i32) }
}

fn misses_panel(cx: i64, cy: i64, r: i64, width: u16, height: u16) -> bool {
    cx + r < 0 || cy + r < 0 || cx - r >= width as i64 || cy - r >= height as i64
}

fn span_row<T>(target: &mut T, x: i64, y: i64, len: i64, color: Color) -> Result<(), T::Error>
where
    T: RasterTarget + ?Sized,
{
    let (width, _) = target.size();
    match clip_span(x, len, width) {
        (_, 0) => Ok(()),
        (x, len) => target.draw_hline(x, saturate(y), len, color),
    }
}

fn span_column<T>(target: &mut T, x: i64, y: i64, len: i64, color: Color) -> Result<(), T::Error>
where
    T: RasterTarget + ?Sized,
{
    let (_, height) = target.size();
    match clip_span(y, len, height) {
        (_, 0) => Ok(()),
        (y, len) => target.draw_vline(saturate(x), y, len, color),
    }
}
