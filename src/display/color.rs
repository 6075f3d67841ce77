/*
 *  display/color.rs
 *
 *  ili9486-gfx - pixels, fonts and datums for dumb TFT panels
 *  (c) 2020-26 Stuart Hunter
 *
 *  Packed RGB565 colour, the only pixel format the panel speaks
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

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::{RawData, RawU16};

/// 16-bit colour, 5 bits red, 6 bits green, 5 bits blue
///
/// Sent on the wire high byte first. Packing from 8-bit channels drops the
/// low bits (3 for red and blue, 2 for green) with no rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(u16);

impl Color {
    pub const BLACK: Color = Color(0x0000);
    pub const WHITE: Color = Color(0xFFFF);
    pub const RED: Color = Color(0xF800);
    pub const GREEN: Color = Color(0x07E0);
    pub const BLUE: Color = Color(0x001F);
    pub const CYAN: Color = Color(0x07FF);
    pub const MAGENTA: Color = Color(0xF81F);
    pub const YELLOW: Color = Color(0xFFE0);
    pub const ORANGE: Color = Color(0xFD20);
    pub const GREENYELLOW: Color = Color(0xAFE5);
    pub const DARKGREY: Color = Color(0x7BEF);
    pub const LIGHTGREY: Color = Color(0xC618);

    /// Pack 8-bit channels into RGB565
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color((((r & 0xF8) as u16) << 8) | (((g & 0xFC) as u16) << 3) | ((b >> 3) as u16))
    }

    pub const fn from_raw(raw: u16) -> Self {
        Color(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Wire order: high byte first
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// Expand back to 8-bit channels (the dropped low bits read as zero)
    pub const fn components(self) -> (u8, u8, u8) {
        let r = ((self.0 >> 8) & 0xF8) as u8;
        let g = ((self.0 >> 3) & 0xFC) as u8;
        let b = ((self.0 << 3) & 0xF8) as u8;
        (r, g, b)
    }
}

impl From<u16> for Color {
    fn from(raw: u16) -> Self {
        Color(raw)
    }
}

impl From<Color> for u16 {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl From<Rgb565> for Color {
    fn from(color: Rgb565) -> Self {
        Color(RawU16::from(color).into_inner())
    }
}

impl From<Color> for Rgb565 {
    fn from(color: Color) -> Self {
        Rgb565::from(RawU16::new(color.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::pixelcolor::RgbColor;

    #[test]
    fn test_pack_truncates() {
        assert_eq!(Color::new(248, 0, 0), Color::RED);
        assert_eq!(Color::new(255, 0, 0), Color::RED);
        assert_eq!(Color::new(255, 0, 0).raw(), 0xF800);
        assert_eq!(Color::new(0, 255, 0), Color::GREEN);
        assert_eq!(Color::new(0, 0, 255), Color::BLUE);
        assert_eq!(Color::new(255, 255, 255), Color::WHITE);
        assert_eq!(Color::new(7, 3, 7), Color::BLACK);
    }

    #[test]
    fn test_repack_is_stable() {
        for &(r, g, b) in &[(12, 200, 99), (255, 128, 1), (0, 3, 250), (77, 77, 77)] {
            let packed = Color::new(r, g, b);
            let (r2, g2, b2) = packed.components();
            assert_eq!(Color::new(r2, g2, b2), packed);
        }
    }

    #[test]
    fn test_wire_order() {
        assert_eq!(Color::ORANGE.to_be_bytes(), [0xFD, 0x20]);
    }

    #[test]
    fn test_rgb565_conversion() {
        let eg: Rgb565 = Color::RED.into();
        assert_eq!(eg, Rgb565::RED);
        assert_eq!(Color::from(Rgb565::CYAN), Color::CYAN);
        assert_eq!(Color::from(Rgb565::new(31, 0, 31)), Color::MAGENTA);
    }
}
