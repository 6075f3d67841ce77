/*
 *  display/drivers/mock.rs
 *
 *  ili9486-gfx - pixels, fonts and datums for dumb TFT panels
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock bus that decodes the controller protocol for testing without hardware
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

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use display_interface::{DataFormat, DisplayError as InterfaceError, WriteOnlyDataCommand};

use crate::display::color::Color;
use crate::display::geometry::{NATIVE_HEIGHT, Window};
use crate::display::panel::cmd;

/// Square simulated GRAM, big enough for either orientation
const MEMORY_SIDE: usize = NATIVE_HEIGHT as usize;

/// Mock bus adapter for testing
///
/// This adapter simulates the controller without requiring hardware. It's
/// useful for:
/// - Unit tests
/// - Integration tests
/// - Development without a panel attached
///
/// Window commands are decoded and the pixel stream is written into a
/// simulated memory in logical coordinates (MADCTL is recorded, not applied).
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MockInterface {
    state: Arc<Mutex<MockBusState>>,
}

#[derive(Debug, Clone, Copy)]
struct Stream {
    window: Window,
    x: u16,
    y: u16,
    done: bool,
}

/// Everything the mock has seen (shared for inspection in tests)
#[derive(Debug)]
pub struct MockBusState {
    /// Every command byte in order
    pub commands: Vec<u8>,

    /// Parameter bytes of each parameterised command (CASET, PASET, MADCTL, PIXFMT)
    pub params: Vec<Vec<u8>>,

    /// Every window opened by RAMWR
    pub windows: Vec<Window>,

    /// Number of non-parameter data transfers
    pub data_writes: usize,

    /// Total non-parameter data bytes
    pub data_bytes: usize,

    /// Last MADCTL value
    pub madctl: Option<u8>,

    /// Simulate failures (for error testing)
    pub simulate_bus_failure: bool,

    memory: Vec<u16>,
    written: Vec<bool>,
    column: (u16, u16),
    page: (u16, u16),
    last_command: Option<u8>,
    stream: Option<Stream>,
    pending_high: Option<u8>,
}

impl Default for MockBusState {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            params: Vec::new(),
            windows: Vec::new(),
            data_writes: 0,
            data_bytes: 0,
            madctl: None,
            simulate_bus_failure: false,
            memory: vec![0; MEMORY_SIDE * MEMORY_SIDE],
            written: vec![false; MEMORY_SIDE * MEMORY_SIDE],
            column: (0, 0),
            page: (0, 0),
            last_command: None,
            stream: None,
            pending_high: None,
        }
    }
}

fn takes_params(command: u8) -> bool {
    matches!(command, cmd::CASET | cmd::PASET | cmd::MADCTL | cmd::PIXFMT)
}

fn be16(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

impl MockBusState {
    fn index(x: u16, y: u16) -> Option<usize> {
        let (x, y) = (x as usize, y as usize);
        (x < MEMORY_SIDE && y < MEMORY_SIDE).then_some(y * MEMORY_SIDE + x)
    }

    /// Colour last streamed to `(x, y)`, if the pixel was ever written
    pub fn pixel(&self, x: u16, y: u16) -> Option<Color> {
        let i = Self::index(x, y)?;
        self.written[i].then(|| Color::from_raw(self.memory[i]))
    }

    pub fn was_written(&self, x: u16, y: u16) -> bool {
        Self::index(x, y).is_some_and(|i| self.written[i])
    }

    pub fn written_count(&self) -> usize {
        self.written.iter().filter(|&&w| w).count()
    }

    /// Coordinates of every written pixel
    pub fn written_pixels(&self) -> BTreeSet<(u16, u16)> {
        self.pixels_where(|_| true)
    }

    /// Coordinates of every written pixel holding `color`
    pub fn pixels_of(&self, color: Color) -> BTreeSet<(u16, u16)> {
        self.pixels_where(|c| c == color.raw())
    }

    fn pixels_where(&self, keep: impl Fn(u16) -> bool) -> BTreeSet<(u16, u16)> {
        self.written
            .iter()
            .enumerate()
            .filter(|&(i, &w)| w && keep(self.memory[i]))
            .map(|(i, _)| ((i % MEMORY_SIDE) as u16, (i / MEMORY_SIDE) as u16))
            .collect()
    }

    /// Forget the transfer log and written flags, keep memory contents
    pub fn clear_log(&mut self) {
        self.commands.clear();
        self.params.clear();
        self.windows.clear();
        self.data_writes = 0;
        self.data_bytes = 0;
        self.written.fill(false);
    }

    fn on_command(&mut self, command: u8) {
        self.commands.push(command);
        self.last_command = Some(command);
        self.stream = None;
        self.pending_high = None;

        if takes_params(command) {
            self.params.push(Vec::new());
        }
        if command == cmd::RAMWR {
            let window = Window {
                x0: self.column.0,
                x1: self.column.1,
                y0: self.page.0,
                y1: self.page.1,
            };
            self.windows.push(window);
            self.stream = Some(Stream { window, x: window.x0, y: window.y0, done: false });
        }
    }

    fn on_data(&mut self, bytes: &[u8]) {
        match self.last_command {
            Some(command) if takes_params(command) => self.on_params(command, bytes),
            _ => {
                self.data_writes += 1;
                self.data_bytes += bytes.len();
                for &byte in bytes {
                    self.on_pixel_byte(byte);
                }
            }
        }
    }

    fn on_params(&mut self, command: u8, bytes: &[u8]) {
        let Some(params) = self.params.last_mut() else {
            return;
        };
        params.extend_from_slice(bytes);
        let params = params.clone();

        match command {
            cmd::CASET if params.len() >= 4 => self.column = (be16(&params[0..2]), be16(&params[2..4])),
            cmd::PASET if params.len() >= 4 => self.page = (be16(&params[0..2]), be16(&params[2..4])),
            cmd::MADCTL => self.madctl = params.last().copied(),
            _ => {}
        }
    }

    fn on_pixel_byte(&mut self, byte: u8) {
        let Some(high) = self.pending_high.take() else {
            self.pending_high = Some(byte);
            return;
        };
        let Some(stream) = self.stream.as_mut() else {
            return;
        };
        if stream.done {
            return;
        }

        let (x, y) = (stream.x, stream.y);
        if stream.x >= stream.window.x1 {
            stream.x = stream.window.x0;
            if stream.y >= stream.window.y1 {
                stream.done = true;
            } else {
                stream.y += 1;
            }
        } else {
            stream.x += 1;
        }

        if let Some(i) = Self::index(x, y) {
            self.memory[i] = u16::from_be_bytes([high, byte]);
            self.written[i] = true;
        }
    }
}

impl MockInterface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockBusState>> {
        Arc::clone(&self.state)
    }

    fn lock(&self) -> MutexGuard<'_, MockBusState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn collect_bytes(format: DataFormat<'_>) -> Result<Vec<u8>, InterfaceError> {
    match format {
        DataFormat::U8(bytes) => Ok(bytes.to_vec()),
        DataFormat::U16BE(words) => Ok(words.iter().flat_map(|w| w.to_be_bytes()).collect()),
        DataFormat::U8Iter(iter) => Ok(iter.collect()),
        DataFormat::U16BEIter(iter) => Ok(iter.flat_map(|w| w.to_be_bytes()).collect()),
        _ => Err(InterfaceError::DataFormatNotImplemented),
    }
}

impl WriteOnlyDataCommand for MockInterface {
    fn send_commands(&mut self, cmds: DataFormat<'_>) -> Result<(), InterfaceError> {
        let bytes = collect_bytes(cmds)?;
        let mut state = self.lock();
        if state.simulate_bus_failure {
            return Err(InterfaceError::BusWriteError);
        }
        for byte in bytes {
            state.on_command(byte);
        }
        Ok(())
    }

    fn send_data(&mut self, buf: DataFormat<'_>) -> Result<(), InterfaceError> {
        let bytes = collect_bytes(buf)?;
        let mut state = self.lock();
        if state.simulate_bus_failure {
            return Err(InterfaceError::BusWriteError);
        }
        state.on_data(&bytes);
        Ok(())
    }
}
