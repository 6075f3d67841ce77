/*
 *  display/geometry.rs
 *
 *  ili9486-gfx - pixels, fonts and datums for dumb TFT panels
 *  (c) 2020-26 Stuart Hunter
 *
 *  Panel geometry, rotation and window clipping
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

/// Native (portrait) panel width
pub const NATIVE_WIDTH: u16 = 320;

/// Native (portrait) panel height
pub const NATIVE_HEIGHT: u16 = 480;

/// Panel orientation, in quarter turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Portrait,
    Landscape,
    PortraitFlipped,
    LandscapeFlipped,
}

impl Rotation {
    /// Any index is accepted, only `index % 4` matters
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Rotation::Portrait,
            1 => Rotation::Landscape,
            2 => Rotation::PortraitFlipped,
            _ => Rotation::LandscapeFlipped,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn is_landscape(self) -> bool {
        matches!(self, Rotation::Landscape | Rotation::LandscapeFlipped)
    }

    /// Memory access control byte (MY/MX/MV mirroring plus BGR bit)
    pub fn madctl(self) -> u8 {
        match self {
            Rotation::Portrait => 0x48,
            Rotation::Landscape => 0x28,
            Rotation::PortraitFlipped => 0x88,
            Rotation::LandscapeFlipped => 0xE8,
        }
    }
}

/// Inclusive controller window `(x0, y0)..=(x1, y1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl Window {
    pub fn width(&self) -> u16 {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> u16 {
        self.y1 - self.y0 + 1
    }

    /// Number of pixels the controller expects after RAMWR
    pub fn area(&self) -> u32 {
        self.width() as u32 * self.height() as u32
    }
}

/// Current logical width/height, derived from the rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelGeometry {
    width: u16,
    height: u16,
    rotation: Rotation,
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self::new(Rotation::Portrait)
    }
}

impl PanelGeometry {
    pub fn new(rotation: Rotation) -> Self {
        let (width, height) = if rotation.is_landscape() {
            (NATIVE_HEIGHT, NATIVE_WIDTH)
        } else {
            (NATIVE_WIDTH, NATIVE_HEIGHT)
        };
        Self { width, height, rotation }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    /// Clip a logical rectangle to the panel.
    ///
    /// Origins at or past the right/bottom edge skip the request. Anything
    /// hanging over an edge is truncated, never wrapped.
    pub fn clip(&self, x: i32, y: i32, w: i32, h: i32) -> Option<Window> {
        if w <= 0 || h <= 0 {
            return None;
        }
        let (width, height) = (self.width as i32, self.height as i32);
        if x >= width || y >= height {
            return None;
        }

        let (mut x, mut y, mut w, mut h) = (x, y, w, h);
        if x < 0 {
            w = w.saturating_add(x);
            x = 0;
        }
        if y < 0 {
            h = h.saturating_add(y);
            y = 0;
        }
        if w <= 0 || h <= 0 {
            return None;
        }

        let w = w.min(width - x);
        let h = h.min(height - y);
        Some(Window {
            x0: x as u16,
            y0: y as u16,
            x1: (x + w - 1) as u16,
            y1: (y + h - 1) as u16,
        })
    }
}
