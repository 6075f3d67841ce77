/*
 *  display/drivers/spi.rs
 *
 *  ili9486-gfx - pixels, fonts and datums for dumb TFT panels
 *  (c) 2020-26 Stuart Hunter
 *
 *  4-wire SPI bus adapter: command/data framing on a D/C pin
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

use display_interface::{DataFormat, DisplayError as InterfaceError, WriteOnlyDataCommand};
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

/// Staging size for word and iterator formats
const STAGE_BYTES: usize = 64;

/// SPI bus adapter
///
/// D/C low for commands, high for data. Chip select belongs to the
/// `SpiDevice` and is toggled around every transfer by the HAL.
pub struct SpiInterface<SPI, DC> {
    spi: SPI,
    dc: DC,
}

impl<SPI, DC> SpiInterface<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self { spi, dc }
    }

    /// Hand back the SPI device and D/C pin
    pub fn release(self) -> (SPI, DC) {
        (self.spi, self.dc)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), InterfaceError> {
        self.spi.write(bytes).map_err(|_| InterfaceError::BusWriteError)
    }

    fn write_words(&mut self, words: impl Iterator<Item = u16>) -> Result<(), InterfaceError> {
        self.write_staged(words.flat_map(u16::to_be_bytes))
    }

    fn write_staged(&mut self, bytes: impl Iterator<Item = u8>) -> Result<(), InterfaceError> {
        let mut stage = [0u8; STAGE_BYTES];
        let mut len = 0;
        for byte in bytes {
            stage[len] = byte;
            len += 1;
            if len == STAGE_BYTES {
                self.write_bytes(&stage)?;
                len = 0;
            }
        }
        if len > 0 {
            self.write_bytes(&stage[..len])?;
        }
        Ok(())
    }

    fn write(&mut self, format: DataFormat<'_>) -> Result<(), InterfaceError> {
        match format {
            DataFormat::U8(bytes) => self.write_bytes(bytes),
            DataFormat::U16BE(words) => self.write_words(words.iter().copied()),
            DataFormat::U8Iter(iter) => self.write_staged(iter),
            DataFormat::U16BEIter(iter) => self.write_words(iter),
            _ => Err(InterfaceError::DataFormatNotImplemented),
        }
    }
}

impl<SPI, DC> WriteOnlyDataCommand for SpiInterface<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    fn send_commands(&mut self, cmds: DataFormat<'_>) -> Result<(), InterfaceError> {
        self.dc.set_low().map_err(|_| InterfaceError::DCError)?;
        self.write(cmds)
    }

    fn send_data(&mut self, buf: DataFormat<'_>) -> Result<(), InterfaceError> {
        self.dc.set_high().map_err(|_| InterfaceError::DCError)?;
        self.write(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType as PinErrorType;
    use embedded_hal::spi::{ErrorType as SpiErrorType, Operation};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Dc(bool),
        Write(Vec<u8>),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct LogSpi(Log);
    struct LogPin(Log);

    impl SpiErrorType for LogSpi {
        type Error = Infallible;
    }

    impl SpiDevice for LogSpi {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.0.borrow_mut().push(Event::Write(bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    impl PinErrorType for LogPin {
        type Error = Infallible;
    }

    impl OutputPin for LogPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().push(Event::Dc(false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().push(Event::Dc(true));
            Ok(())
        }
    }

    fn interface() -> (SpiInterface<LogSpi, LogPin>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        (SpiInterface::new(LogSpi(log.clone()), LogPin(log.clone())), log)
    }

    #[test]
    fn test_command_then_data_framing() {
        let (mut di, log) = interface();
        di.send_commands(DataFormat::U8(&[0x2A])).unwrap();
        di.send_data(DataFormat::U8(&[0x00, 0x01])).unwrap();

        assert_eq!(*log.borrow(), vec![
            Event::Dc(false),
            Event::Write(vec![0x2A]),
            Event::Dc(true),
            Event::Write(vec![0x00, 0x01]),
        ]);
    }

    #[test]
    fn test_words_go_out_big_endian() {
        let (mut di, log) = interface();
        let mut words = [0xF800u16, 0x07E0];
        di.send_data(DataFormat::U16BE(&mut words)).unwrap();

        assert_eq!(log.borrow()[1], Event::Write(vec![0xF8, 0x00, 0x07, 0xE0]));
    }

    #[test]
    fn test_iterator_is_staged() {
        let (mut di, log) = interface();
        let mut bytes = (0..100u8).into_iter();
        di.send_data(DataFormat::U8Iter(&mut bytes)).unwrap();

        let log = log.borrow();
        assert_eq!(log.len(), 3);
        assert!(matches!(&log[1], Event::Write(b) if b.len() == STAGE_BYTES));
        assert!(matches!(&log[2], Event::Write(b) if b.len() == 36));
    }
}
