/*
 *  display/fill.rs
 *
 *  ili9486-gfx - pixels, fonts and datums for dumb TFT panels
 *  (c) 2020-26 Stuart Hunter
 *
 *  Block fill engine - solid colour streams from a reusable chunk
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

use display_interface::{DataFormat, WriteOnlyDataCommand};

use crate::display::color::Color;
use crate::display::error::DisplayError;

/// Chunk size in bytes (512 pixels)
pub const CHUNK_BYTES: usize = 1024;

/// Streams one colour into the open window.
///
/// The chunk is filled with the colour pattern once and then sent as many
/// times as needed, so peak memory is the chunk regardless of the area.
#[derive(Debug, Clone)]
pub struct BlockFill {
    chunk: [u8; CHUNK_BYTES],
    pattern: Option<Color>,
}

impl Default for BlockFill {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockFill {
    pub const fn new() -> Self {
        Self { chunk: [0; CHUNK_BYTES], pattern: None }
    }

    fn prime(&mut self, color: Color) {
        if self.pattern == Some(color) {
            return;
        }
        let [hi, lo] = color.to_be_bytes();
        for pair in self.chunk.chunks_exact_mut(2) {
            pair[0] = hi;
            pair[1] = lo;
        }
        self.pattern = Some(color);
    }

    /// Send `pixels * 2` bytes of `color` as data
    pub fn fill<DI>(&mut self, di: &mut DI, color: Color, pixels: u32) -> Result<(), DisplayError>
    where
        DI: WriteOnlyDataCommand,
    {
        self.prime(color);

        let mut remaining = pixels as usize * 2;
        while remaining >= CHUNK_BYTES {
            di.send_data(DataFormat::U8(&self.chunk))?;
            remaining -= CHUNK_BYTES;
        }
        if remaining > 0 {
            di.send_data(DataFormat::U8(&self.chunk[..remaining]))?;
        }
        Ok(())
    }
}
