/*
 *  display/panel.rs
 *
 *  ili9486-gfx - pixels, fonts and datums for dumb TFT panels
 *  (c) 2020-26 Stuart Hunter
 *
 *  Addressed panel - window setup, pixel writes and clipped fills
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
use crate::display::fill::BlockFill;
use crate::display::geometry::{PanelGeometry, Rotation, Window};
use crate::display::traits::RasterTarget;

/// ILI9486 command set used by the driver
pub mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A; // Column address set
    pub const PASET: u8 = 0x2B; // Page (row) address set
    pub const RAMWR: u8 = 0x2C; // Memory write
    pub const MADCTL: u8 = 0x36; // Memory access control
    pub const PIXFMT: u8 = 0x3A; // Pixel format
}

/// The addressing and clipping layer.
///
/// Owns the bus, the logical geometry and the fill chunk. Every write opens
/// its own window; nothing about the previous window is assumed.
pub struct Panel<DI> {
    di: DI,
    geometry: PanelGeometry,
    fill: BlockFill,
}

impl<DI> Panel<DI>
where
    DI: WriteOnlyDataCommand,
{
    pub fn new(di: DI) -> Self {
        Self {
            di,
            geometry: PanelGeometry::default(),
            fill: BlockFill::new(),
        }
    }

    pub fn geometry(&self) -> PanelGeometry {
        self.geometry
    }

    /// Send a command byte followed by its parameters (if any)
    pub fn command(&mut self, command: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.di.send_commands(DataFormat::U8(&[command]))?;
        if !params.is_empty() {
            self.di.send_data(DataFormat::U8(params))?;
        }
        Ok(())
    }

    /// Re-issue MADCTL and swap the logical width/height
    pub fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DisplayError> {
        self.command(cmd::MADCTL, &[rotation.madctl()])?;
        self.geometry = PanelGeometry::new(rotation);
        Ok(())
    }

    /// Back to the power-on orientation without touching the controller
    pub(crate) fn reset_geometry(&mut self) {
        self.geometry = PanelGeometry::default();
    }

    /// Address `window` and open a pixel stream into it
    pub fn set_window(&mut self, window: Window) -> Result<(), DisplayError> {
        let [x0h, x0l] = window.x0.to_be_bytes();
        let [x1h, x1l] = window.x1.to_be_bytes();
        let [y0h, y0l] = window.y0.to_be_bytes();
        let [y1h, y1l] = window.y1.to_be_bytes();

        self.command(cmd::CASET, &[x0h, x0l, x1h, x1l])?;
        self.command(cmd::PASET, &[y0h, y0l, y1h, y1l])?;
        self.command(cmd::RAMWR, &[])
    }

    /// Give the bus back
    pub fn release(self) -> DI {
        self.di
    }
}

impl<DI> RasterTarget for Panel<DI>
where
    DI: WriteOnlyDataCommand,
{
    type Error = DisplayError;

    fn size(&self) -> (u16, u16) {
        (self.geometry.width(), self.geometry.height())
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) -> Result<(), DisplayError> {
        if !self.geometry.contains(x, y) {
            return Ok(());
        }
        let (x, y) = (x as u16, y as u16);
        self.set_window(Window { x0: x, y0: y, x1: x, y1: y })?;
        self.di.send_data(DataFormat::U8(&color.to_be_bytes()))?;
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) -> Result<(), DisplayError> {
        let Some(window) = self.geometry.clip(x, y, w, h) else {
            return Ok(());
        };
        self.set_window(window)?;
        self.fill.fill(&mut self.di, color, window.area())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::drivers::mock::MockInterface;

    fn panel() -> (Panel<MockInterface>, std::sync::Arc<std::sync::Mutex<crate::display::MockBusState>>) {
        let bus = MockInterface::new();
        let state = bus.state();
        (Panel::new(bus), state)
    }

    #[test]
    fn test_window_encoding() {
        let (mut panel, state) = panel();
        panel.set_window(Window { x0: 0x0102, y0: 3, x1: 0x0140, y1: 0x01DF }).unwrap();

        let state = state.lock().unwrap();
        assert_eq!(state.commands, vec![cmd::CASET, cmd::PASET, cmd::RAMWR]);
        assert_eq!(state.params, vec![
            vec![0x01, 0x02, 0x01, 0x40],
            vec![0x00, 0x03, 0x01, 0xDF],
        ]);
    }

    #[test]
    fn test_pixel_out_of_bounds_is_silent() {
        let (mut panel, state) = panel();
        panel.draw_pixel(320, 0, Color::RED).unwrap();
        panel.draw_pixel(-1, 5, Color::RED).unwrap();
        panel.draw_pixel(5, 480, Color::RED).unwrap();
        assert!(state.lock().unwrap().commands.is_empty());

        panel.draw_pixel(319, 479, Color::RED).unwrap();
        let state = state.lock().unwrap();
        assert_eq!(state.windows, vec![Window { x0: 319, y0: 479, x1: 319, y1: 479 }]);
        assert_eq!(state.pixel(319, 479), Some(Color::RED));
    }

    #[test]
    fn test_fill_rect_truncated_column() {
        let (mut panel, state) = panel();
        panel.fill_rect(319, 0, 10, 10, Color::GREEN).unwrap();

        let state = state.lock().unwrap();
        assert_eq!(state.windows, vec![Window { x0: 319, y0: 0, x1: 319, y1: 9 }]);
        assert_eq!(state.data_bytes, 20);
        assert_eq!(state.pixel(319, 9), Some(Color::GREEN));
        assert_eq!(state.written_count(), 10);
    }

    #[test]
    fn test_rotation_reissues_madctl() {
        let (mut panel, state) = panel();
        panel.set_rotation(Rotation::Landscape).unwrap();
        assert_eq!(panel.size(), (480, 320));
        {
            let state = state.lock().unwrap();
            assert_eq!(state.commands, vec![cmd::MADCTL]);
            assert_eq!(state.madctl, Some(0x28));
        }

        panel.fill_rect(470, 0, 20, 1, Color::WHITE).unwrap();
        let state = state.lock().unwrap();
        assert_eq!(state.windows.last(), Some(&Window { x0: 470, y0: 0, x1: 479, y1: 0 }));
    }
}
