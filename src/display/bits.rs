/*
 *  display/bits.rs
 *
 *  ili9486-gfx - pixels, fonts and datums for dumb TFT panels
 *  (c) 2020-26 Stuart Hunter
 *
 *  MSB-first bit cursor and horizontal run scanner for 1-bit bitmaps
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

/// Reads a packed bitmap one bit at a time, most significant bit first.
///
/// Reads past the end of the data yield clear bits.
#[derive(Debug, Clone)]
pub struct Bits<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Bits<'a> {
    /// Start reading at byte `offset`
    pub fn new(data: &'a [u8], offset: usize) -> Self {
        Self { data, pos: offset * 8 }
    }

    pub fn peek(&self) -> bool {
        self.data
            .get(self.pos / 8)
            .map(|byte| byte & (0x80 >> (self.pos % 8)) != 0)
            .unwrap_or(false)
    }

    /// Iterate maximal runs over the next `width` bits
    pub fn runs(&mut self, width: usize) -> Runs<'_, 'a> {
        Runs { bits: self, width, col: 0 }
    }
}

impl Iterator for Bits<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let bit = self.peek();
        self.pos += 1;
        Some(bit)
    }
}

/// A maximal stretch of equal bits within one scanline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub start: i32,
    pub len: i32,
    pub set: bool,
}

/// Runs of one scanline; consumes exactly `width` bits from the cursor
#[derive(Debug)]
pub struct Runs<'b, 'a> {
    bits: &'b mut Bits<'a>,
    width: usize,
    col: usize,
}

impl Iterator for Runs<'_, '_> {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        if self.col >= self.width {
            return None;
        }
        let start = self.col;
        let set = self.bits.next().unwrap_or(false);
        self.col += 1;
        while self.col < self.width && self.bits.peek() == set {
            self.bits.next();
            self.col += 1;
        }
        Some(Run { start: start as i32, len: (self.col - start) as i32, set })
    }
}

impl Drop for Runs<'_, '_> {
    // a partially consumed scanline still advances the cursor to the next row
    fn drop(&mut self) {
        while self.col < self.width {
            self.bits.next();
            self.col += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first() {
        let bits: Vec<bool> = Bits::new(&[0b1010_0000], 0).take(4).collect();
        assert_eq!(bits, vec![true, false, true, false]);
    }

    #[test]
    fn test_runs_cross_byte_boundary() {
        // 0000_0111 1100_0000 -> 5 clear, 5 set, 6 clear
        let mut bits = Bits::new(&[0x07, 0xC0], 0);
        let runs: Vec<Run> = bits.runs(16).collect();
        assert_eq!(runs, vec![
            Run { start: 0, len: 5, set: false },
            Run { start: 5, len: 5, set: true },
            Run { start: 10, len: 6, set: false },
        ]);
    }

    #[test]
    fn test_rows_are_tightly_packed() {
        // two 3-bit rows: 101 then 110
        let mut bits = Bits::new(&[0b1011_1000], 0);
        let first: Vec<Run> = bits.runs(3).filter(|r| r.set).collect();
        let second: Vec<Run> = bits.runs(3).filter(|r| r.set).collect();
        assert_eq!(first.len(), 2);
        assert_eq!(second, vec![Run { start: 0, len: 2, set: true }]);
    }

    #[test]
    fn test_dropped_runs_skip_row() {
        let mut bits = Bits::new(&[0xF0, 0xFF], 0);
        {
            let mut runs = bits.runs(8);
            runs.next();
        }
        assert!(bits.peek());
        let runs: Vec<Run> = bits.runs(8).collect();
        assert_eq!(runs, vec![Run { start: 0, len: 8, set: true }]);
    }

    #[test]
    fn test_offset_and_overrun() {
        let mut bits = Bits::new(&[0x00, 0x80], 1);
        assert_eq!(bits.next(), Some(true));
        assert_eq!(bits.nth(20), Some(false));
    }
}
