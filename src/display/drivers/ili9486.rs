/*
 *  display/drivers/ili9486.rs
 *
 *  ili9486-gfx - pixels, fonts and datums for dumb TFT panels
 *  (c) 2020-26 Stuart Hunter
 *
 *  ILI9486 driver - init, rotation, drawing and text
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

use core::fmt;

use display_interface::WriteOnlyDataCommand;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::display::color::Color;
use crate::display::error::DisplayError;
use crate::display::geometry::{PanelGeometry, Rotation};
use crate::display::panel::{cmd, Panel};
use crate::display::traits::{DisplayDriver, RasterTarget};
use crate::font::{ActiveFont, FontRegistry, FontSlot, GfxFont};
use crate::text::{self, Datum, TextMetrics, TextState};

use log::{debug, info};

/// 16 bits per pixel, for both the RGB and MCU interfaces
const COLMOD_RGB565: u8 = 0x55;

/// MADCTL written by init: BGR bit only
const MADCTL_INIT: u8 = 0x08;

/// ILI9486 TFT driver
///
/// Owns the bus adapter, the text session and the user font table. All
/// drawing is immediate: each call addresses a window and streams pixels.
pub struct Ili9486<DI> {
    panel: Panel<DI>,
    text: TextState,
    fonts: FontRegistry,
}

impl<DI> Ili9486<DI>
where
    DI: WriteOnlyDataCommand,
{
    /// Wrap a bus adapter; nothing is sent until [`init`](Self::init)
    pub fn new(di: DI) -> Self {
        Self {
            panel: Panel::new(di),
            text: TextState::default(),
            fonts: FontRegistry::new(),
        }
    }

    /// Pulse the reset line: low 20 ms, then high and 150 ms to settle
    pub fn hard_reset<RST, D>(&mut self, rst: &mut RST, delay: &mut D) -> Result<(), DisplayError>
    where
        RST: OutputPin,
        D: DelayNs + ?Sized,
    {
        debug!("Hardware reset");
        rst.set_low().map_err(|_| DisplayError::ResetPin)?;
        delay.delay_ms(20);
        rst.set_high().map_err(|_| DisplayError::ResetPin)?;
        delay.delay_ms(150);
        Ok(())
    }

    /// Power-up sequence, then clear to black.
    ///
    /// Leaves the panel in portrait; reapply any rotation afterwards.
    pub fn init(&mut self, delay: &mut dyn DelayNs) -> Result<(), DisplayError> {
        info!("Initializing ILI9486");

        self.panel.command(cmd::SWRESET, &[])?;
        delay.delay_ms(120);

        self.panel.command(cmd::SLPOUT, &[])?;
        delay.delay_ms(120);

        self.panel.command(cmd::PIXFMT, &[COLMOD_RGB565])?;
        self.panel.command(cmd::MADCTL, &[MADCTL_INIT])?;
        self.panel.reset_geometry();

        self.panel.command(cmd::DISPON, &[])?;
        delay.delay_ms(50);

        self.panel.fill_screen(Color::BLACK)?;

        info!("ILI9486 initialized successfully ({}x{})", self.width(), self.height());
        Ok(())
    }

    pub fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DisplayError> {
        self.panel.set_rotation(rotation)?;
        debug!("Rotation {:?} -> {}x{}", rotation, self.width(), self.height());
        Ok(())
    }

    pub fn rotation(&self) -> Rotation {
        self.panel.geometry().rotation()
    }

    pub fn width(&self) -> u16 {
        self.panel.geometry().width()
    }

    pub fn height(&self) -> u16 {
        self.panel.geometry().height()
    }

    /// Pack 8-bit channels, dropping the low bits
    pub fn color565(r: u8, g: u8, b: u8) -> Color {
        Color::new(r, g, b)
    }

    // text session

    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.text.cursor = Point::new(x, y);
    }

    pub fn cursor(&self) -> Point {
        self.text.cursor
    }

    /// Transparent text in `fg`
    pub fn set_text_color(&mut self, fg: Color) {
        self.text.set_color(fg);
    }

    /// Opaque text: `fg` on `bg`
    pub fn set_text_color_bg(&mut self, fg: Color, bg: Color) {
        self.text.set_colors(fg, bg);
    }

    /// Scale factor; 0 is taken as 1
    pub fn set_text_size(&mut self, size: u8) {
        self.text.set_size(size);
    }

    pub fn text_size(&self) -> u8 {
        self.text.size()
    }

    pub fn set_text_datum(&mut self, datum: Datum) {
        self.text.datum = datum;
    }

    pub fn text_datum(&self) -> Datum {
        self.text.datum
    }

    /// Select a GFX font for the session, `None` for the built-in font
    pub fn set_free_font(&mut self, font: Option<&'static GfxFont>) {
        self.text.font = ActiveFont::from(font);
    }

    pub fn active_font(&self) -> ActiveFont {
        self.text.font
    }

    /// Register (or clear) a user font slot for the one-shot string calls
    pub fn set_font_slot(&mut self, slot: FontSlot, font: Option<&'static GfxFont>) -> Result<(), DisplayError> {
        self.fonts.register(slot, font)
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    /// Draw at the session cursor and move it along
    pub fn print(&mut self, s: &str) -> Result<(), DisplayError> {
        let ctx = self.text.context();
        let mut cursor = self.text.cursor;
        let result = text::render(&mut self.panel, &ctx, &mut cursor, s);
        self.text.cursor = cursor;
        result
    }

    /// [`print`](Self::print) then a newline
    pub fn println(&mut self, s: &str) -> Result<(), DisplayError> {
        self.print(s)?;
        self.text.context().newline(&mut self.text.cursor);
        Ok(())
    }

    /// Metrics of `s` in the font `slot` resolves to, at the session size
    pub fn text_metrics(&self, s: &str, slot: FontSlot) -> TextMetrics {
        let font = self.fonts.resolve(slot, self.text.font);
        text::measure(s, font, self.text.size() as i32)
    }

    /// Draw `s` anchored at `(x, y)` by the session datum.
    ///
    /// The session cursor and font are left alone. Returns the scaled
    /// advance width of the string.
    pub fn draw_string(&mut self, s: &str, x: i32, y: i32, slot: FontSlot) -> Result<i32, DisplayError> {
        let font = self.fonts.resolve(slot, self.text.font);
        let ctx = self.text.context_with(font);
        let metrics = text::measure(s, font, ctx.size);
        let mut cursor = text::anchor(Point::new(x, y), &metrics, self.text.datum, font);

        text::render(&mut self.panel, &ctx, &mut cursor, s)?;
        Ok(metrics.width)
    }

    /// [`draw_string`](Self::draw_string) with `x` moved left by half the width
    pub fn draw_centre_string(&mut self, s: &str, x: i32, y: i32, slot: FontSlot) -> Result<i32, DisplayError> {
        let width = self.text_metrics(s, slot).width;
        self.draw_string(s, x - width / 2, y, slot)
    }

    /// Hand the bus adapter back
    pub fn release(self) -> DI {
        self.panel.release()
    }
}

impl<DI> RasterTarget for Ili9486<DI>
where
    DI: WriteOnlyDataCommand,
{
    type Error = DisplayError;

    fn size(&self) -> (u16, u16) {
        self.panel.size()
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) -> Result<(), DisplayError> {
        self.panel.draw_pixel(x, y, color)
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) -> Result<(), DisplayError> {
        self.panel.fill_rect(x, y, w, h, color)
    }
}

impl<DI> DisplayDriver for Ili9486<DI>
where
    DI: WriteOnlyDataCommand,
{
    fn geometry(&self) -> PanelGeometry {
        self.panel.geometry()
    }

    fn init(&mut self, delay: &mut dyn DelayNs) -> Result<(), DisplayError> {
        Ili9486::init(self, delay)
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DisplayError> {
        Ili9486::set_rotation(self, rotation)
    }
}

// embedded-graphics drawables render straight to the panel
impl<DI> DrawTarget for Ili9486<DI>
where
    DI: WriteOnlyDataCommand,
{
    type Color = Rgb565;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.panel.draw_pixel(point.x, point.y, color.into())?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let w = i32::try_from(area.size.width).unwrap_or(i32::MAX);
        let h = i32::try_from(area.size.height).unwrap_or(i32::MAX);
        self.panel.fill_rect(area.top_left.x, area.top_left.y, w, h, color.into())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.panel.fill_screen(color.into())
    }
}

impl<DI> OriginDimensions for Ili9486<DI>
where
    DI: WriteOnlyDataCommand,
{
    fn size(&self) -> Size {
        Size::new(self.width() as u32, self.height() as u32)
    }
}

// write!/writeln! through the session cursor, for numbers and the like
impl<DI> fmt::Write for Ili9486<DI>
where
    DI: WriteOnlyDataCommand,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.print(s).map_err(|_| fmt::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::drivers::mock::{MockBusState, MockInterface};
    use crate::display::geometry::Window;
    use crate::font::test_font::FONT;
    use core::convert::Infallible;
    use core::fmt::Write;
    use embedded_graphics::primitives::PrimitiveStyle;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct CountingDelay {
        ns: u64,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.ns += ns as u64;
        }
    }

    #[derive(Default)]
    struct ResetPin {
        levels: Vec<bool>,
    }

    impl embedded_hal::digital::ErrorType for ResetPin {
        type Error = Infallible;
    }

    impl OutputPin for ResetPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.levels.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.levels.push(true);
            Ok(())
        }
    }

    fn driver() -> (Ili9486<MockInterface>, Arc<Mutex<MockBusState>>) {
        let bus = MockInterface::new();
        let state = bus.state();
        (Ili9486::new(bus), state)
    }

    #[test]
    fn test_init_sequence() {
        let (mut display, state) = driver();
        let mut delay = CountingDelay::default();
        display.init(&mut delay).unwrap();

        let state = state.lock().unwrap();
        assert_eq!(&state.commands[..5], &[cmd::SWRESET, cmd::SLPOUT, cmd::PIXFMT, cmd::MADCTL, cmd::DISPON]);
        assert_eq!(state.params[0], vec![COLMOD_RGB565]);
        assert_eq!(state.madctl, Some(MADCTL_INIT));
        assert_eq!(state.windows, vec![Window { x0: 0, y0: 0, x1: 319, y1: 479 }]);
        assert_eq!(state.written_count(), 320 * 480);
        assert_eq!(state.pixel(200, 400), Some(Color::BLACK));
        assert_eq!(delay.ns, 290_000_000);
    }

    #[test]
    fn test_hard_reset_pulse() {
        let (mut display, state) = driver();
        let mut pin = ResetPin::default();
        let mut delay = CountingDelay::default();
        display.hard_reset(&mut pin, &mut delay).unwrap();

        assert_eq!(pin.levels, vec![false, true]);
        assert_eq!(delay.ns, 170_000_000);
        assert!(state.lock().unwrap().commands.is_empty());
    }

    #[test]
    fn test_rotation_swaps_dimensions() {
        let (mut display, state) = driver();
        for (index, madctl, size) in [(1, 0x28, (480, 320)), (2, 0x88, (320, 480)), (3, 0xE8, (480, 320))] {
            display.set_rotation(Rotation::from_index(index)).unwrap();
            assert_eq!((display.width(), display.height()), size);
            assert_eq!(state.lock().unwrap().madctl, Some(madctl));
        }
        assert_eq!(display.dimensions(), (480, 320));
    }

    #[test]
    fn test_print_advances_cursor() {
        let (mut display, _state) = driver();
        display.set_cursor(4, 4);
        display.print("Hi").unwrap();
        assert_eq!(display.cursor(), Point::new(16, 4));

        display.set_text_size(2);
        display.println("!").unwrap();
        assert_eq!(display.cursor(), Point::new(0, 20));
    }

    #[test]
    fn test_fmt_write_prints_numbers() {
        let (mut display, state) = driver();
        display.set_text_color_bg(Color::YELLOW, Color::BLUE);
        write!(display, "{}", 42).unwrap();
        assert_eq!(display.cursor(), Point::new(12, 0));
        // two opaque 5x8 cells
        assert_eq!(state.lock().unwrap().written_count(), 80);
    }

    #[test]
    fn test_draw_string_leaves_session_alone() {
        let (mut display, _state) = driver();
        display.set_cursor(7, 9);
        display.set_free_font(Some(&FONT));
        display.set_text_size(2);

        let width = display.draw_string("AB", 100, 100, FontSlot::Builtin).unwrap();
        assert_eq!(width, 24);
        assert_eq!(display.cursor(), Point::new(7, 9));
        assert_eq!(display.active_font(), ActiveFont::Gfx(&FONT));
        assert_eq!(display.text_size(), 2);
    }

    #[test]
    fn test_font_slots_fall_back_to_builtin() {
        let (mut display, _state) = driver();
        assert_eq!(display.draw_string("OK", 0, 0, FontSlot::User(0)).unwrap(), 12);

        display.set_font_slot(FontSlot::User(0), Some(&FONT)).unwrap();
        assert_eq!(display.draw_string("OK", 0, 20, FontSlot::User(0)).unwrap(), 11);
        assert_eq!(display.draw_string("OK", 0, 20, FontSlot::from_index(9)).unwrap(), 12);
        assert!(display.set_font_slot(FontSlot::User(7), Some(&FONT)).is_err());
    }

    #[test]
    fn test_centre_string_shifts_half_width() {
        let (mut display, state) = driver();
        let width = display.draw_centre_string("AB", 100, 10, FontSlot::Builtin).unwrap();
        assert_eq!(width, 12);

        // 'A' column 0 is 0x7E: first lit pixel at (94, 11)
        let state = state.lock().unwrap();
        assert_eq!(state.pixel(94, 11), Some(Color::WHITE));
        assert!(!state.was_written(93, 11));
    }

    #[test]
    fn test_embedded_graphics_fill_is_one_window() {
        let (mut display, state) = driver();
        Rectangle::new(Point::new(310, 470), Size::new(20, 20))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
            .draw(&mut display)
            .unwrap();

        let state = state.lock().unwrap();
        assert_eq!(state.windows, vec![Window { x0: 310, y0: 470, x1: 319, y1: 479 }]);
        assert_eq!(state.pixel(319, 479), Some(Color::RED));
    }

    #[test]
    fn test_bus_errors_propagate() {
        let (mut display, state) = driver();
        state.lock().unwrap().simulate_bus_failure = true;
        assert!(matches!(
            display.fill_rect(0, 0, 4, 4, Color::RED),
            Err(DisplayError::Interface(_))
        ));
        assert!(write!(display, "x").is_err());
    }
}
