/*
 *  lib.rs
 *
 *  ili9486-gfx - pixels, fonts and datums for dumb TFT panels
 *  (c) 2020-26 Stuart Hunter
 *
 *  Library root: display driver, fonts and text layout
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

//! Driver for ILI9486 class TFT controllers on a write-only serial bus.
//!
//! There is no framebuffer. Every primitive is clipped to the panel, turned
//! into a controller window and streamed straight out over the bus:
//!
//! ```text
//! text layout -> glyph rasterizer -> primitives / block fill -> window -> bus
//! ```
//!
//! The bus is anything implementing
//! [`display_interface::WriteOnlyDataCommand`]; [`SpiInterface`] wraps an
//! `embedded-hal` SPI device plus D/C pin and [`MockInterface`] simulates the
//! controller memory for tests.

pub mod display;
pub mod font;
pub mod text;

pub use display::{
    Color, DisplayDriver, DisplayError, Ili9486, MockInterface, PanelGeometry, RasterTarget,
    Rotation, SpiInterface, Window,
};
pub use font::{ActiveFont, FontRegistry, FontSlot, GfxFont, GfxGlyph};
pub use text::{Datum, TextMetrics};

/// Everything needed to draw, in one import.
pub mod prelude {
    pub use crate::display::{Color, DisplayDriver, Ili9486, RasterTarget, Rotation};
    pub use crate::font::{FontSlot, GfxFont, GfxGlyph};
    pub use crate::text::Datum;
}
