/*
 *  main.rs
 *
 *  ili9486-gfx - pixels, fonts and datums for dumb TFT panels
 *  (c) 2020-26 Stuart Hunter
 *
 *  Demo: bring up a panel on spidev + sysfs GPIO and draw a test card
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

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

use std::fmt::Write as _;

use anyhow::{anyhow, Context, Result};
use display_interface::WriteOnlyDataCommand;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyleBuilder};
use embedded_hal::delay::DelayNs;
use env_logger::Env;
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::sysfs_gpio::Direction;
use linux_embedded_hal::{Delay, SpidevDevice, SysfsPin};
use log::{debug, info};

use ili9486_gfx::prelude::*;
use ili9486_gfx::SpiInterface;

mod config;

/// Export a sysfs GPIO and make it an output
fn output_pin(number: u64) -> Result<SysfsPin> {
    let pin = SysfsPin::new(number);
    pin.export().with_context(|| format!("exporting GPIO{number}"))?;
    pin.set_direction(Direction::Out)
        .with_context(|| format!("setting GPIO{number} to output"))?;
    Ok(pin)
}

/// Datum labels around a crosshair, one per grid position
fn draw_datums<DI>(display: &mut Ili9486<DI>, cx: i32, cy: i32) -> Result<()>
where
    DI: WriteOnlyDataCommand,
{
    display.draw_line(cx - 60, cy, cx + 60, cy, Color::DARKGREY)?;
    display.draw_line(cx, cy - 40, cx, cy + 40, Color::DARKGREY)?;

    let labels = ["TL", "TC", "TR", "ML", "MC", "MR", "BL", "BC", "BR"];
    for (index, label) in labels.iter().enumerate() {
        let dx = (index % 3) as i32 * 50 - 50;
        let dy = (index / 3) as i32 * 30 - 30;
        display.set_text_datum(Datum::from_index(index as u8));
        display.fill_circle(cx + dx, cy + dy, 2, Color::RED)?;
        display.draw_string(label, cx + dx, cy + dy, FontSlot::Builtin)?;
    }
    display.set_text_datum(Datum::TopLeft);
    Ok(())
}

fn draw_test_card<DI>(display: &mut Ili9486<DI>) -> Result<()>
where
    DI: WriteOnlyDataCommand,
{
    let (width, height) = (display.width() as i32, display.height() as i32);
    debug!("Test card {}x{}", width, height);

    display.fill_screen(Color::BLACK)?;
    display.draw_rect(0, 0, width, height, Color::WHITE)?;

    // colour bars
    let bars = [
        Color::WHITE, Color::YELLOW, Color::CYAN, Color::GREEN,
        Color::MAGENTA, Color::RED, Color::BLUE, Color::BLACK,
    ];
    let bar_w = (width - 20) / bars.len() as i32;
    for (i, color) in bars.iter().enumerate() {
        display.fill_rect(10 + i as i32 * bar_w, 30, bar_w, 40, *color)?;
    }

    display.set_text_size(2);
    display.set_text_color(Color::ORANGE);
    display.set_text_datum(Datum::TopCentre);
    display.draw_string("ILI9486", width / 2, 6, FontSlot::Builtin)?;
    display.set_text_size(1);

    // circles, one through embedded-graphics
    display.draw_circle(60, 130, 40, Color::GREENYELLOW)?;
    display.fill_circle(60, 130, 20, Color::BLUE)?;
    Circle::with_center(Point::new(width - 60, 130), 61)
        .into_styled(
            PrimitiveStyleBuilder::new()
                .stroke_color(Rgb565::WHITE)
                .stroke_width(3)
                .fill_color(Color::DARKGREY.into())
                .build(),
        )
        .draw(display)?;

    // fan of lines
    for step in 0..=8 {
        let x = 10 + step * (width - 20) / 8;
        display.draw_line(width / 2, 190, x, 260, Color::LIGHTGREY)?;
    }

    draw_datums(display, width / 2, height - 120)?;

    display.set_text_color(Color::WHITE);
    display.set_cursor(10, 280);
    display.println("Hello from Rust")?;
    display.set_text_color_bg(Color::BLACK, Color::YELLOW);
    display.println(" opaque text ")?;
    Ok(())
}

fn main() -> Result<()> {
    let cfg = config::load()?;

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level.as_deref().unwrap_or("info")))
        .format_timestamp_secs()
        .init();

    info!("{} v.{} built {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let panel = cfg.display_or_default();
    info!("Opening {} at {} Hz (DC GPIO{}, RST {:?})",
          panel.spi_device(), panel.spi_hz(), panel.dc_pin(), panel.rst_pin);

    let mut spi = SpidevDevice::open(panel.spi_device())
        .map_err(|e| anyhow!("opening {}: {:?}", panel.spi_device(), e))?;
    let options = SpidevOptions::new()
        .bits_per_word(8)
        .max_speed_hz(panel.spi_hz())
        .mode(SpiModeFlags::SPI_MODE_0)
        .build();
    spi.0.configure(&options).context("configuring SPI")?;

    let dc = output_pin(panel.dc_pin())?;
    let mut delay = Delay;
    let mut display = Ili9486::new(SpiInterface::new(spi, dc));

    if let Some(number) = panel.rst_pin {
        let mut rst = output_pin(number)?;
        display.hard_reset(&mut rst, &mut delay)?;
    }
    display.init(&mut delay)?;
    display.set_rotation(Rotation::from_index(panel.rotation()))?;

    draw_test_card(&mut display)?;

    // live counter, opaque so each frame overwrites the last
    display.set_text_size(3);
    display.set_text_color_bg(Color::GREEN, Color::BLACK);
    for count in 0..=100 {
        display.set_cursor(10, display.height() as i32 - 40);
        write!(display, "{count:>3}").map_err(|_| anyhow!("text write failed"))?;
        delay.delay_ms(50);
    }

    info!("Done");
    Ok(())
}
