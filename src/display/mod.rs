/*
 *  display/mod.rs
 *
 *  ili9486-gfx - pixels, fonts and datums for dumb TFT panels
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem - addressing, clipping, primitives and bus drivers
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

// Core trait definitions
pub mod traits;
pub mod error;
pub mod color;
pub mod geometry;

// Bit unpacking shared by bitmaps and glyphs
pub mod bits;

// Chunked solid fills and the addressed panel
pub mod fill;
pub mod panel;

// Controller driver and bus adapters
pub mod drivers;

// Re-exports for convenience
pub use traits::{DisplayDriver, RasterTarget};
pub use error::DisplayError;
pub use color::Color;
pub use geometry::{PanelGeometry, Rotation, Window};
pub use fill::BlockFill;
pub use panel::Panel;
pub use drivers::ili9486::Ili9486;
pub use drivers::mock::{MockBusState, MockInterface};
pub use drivers::spi::SpiInterface;
