#![cfg_attr(not(test), no_std)]

/// This is a driver for the MAX6952 4-digit 5x7 dot matrix alphanumeric LED display controller.
/// It supports up to 16 daisy-chained chips sharing one SPI bus and one chip select line.
/// Every chip in the chain gets the same opcode in a single chip select window, so the register
/// writes here are broadcasts; digit data is fanned out per chip by ordering the bytes.
/// see https://www.analog.com/media/en/technical-documentation/data-sheets/MAX6952.pdf
use core::result::Result;
#[macro_use]
mod fmt;
pub mod layout;
pub mod marquee;
pub mod registers;
use embedded_hal_1::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiBus;

pub use layout::{
    Alignment, DIGITS_PER_DEVICE, DisplayBuffer, MAX_DEVICES, MAX_TEXT_LENGTH, build_buffer,
};
pub use marquee::{Marquee, MarqueeMode, ScrollDirection, StagedText};
pub use registers::{Command, Plane};

use registers::config;

/// Pause after chip select goes high before the next frame
const SETTLE_MS: u32 = 1;

/// How long all segments stay lit during the start-up self test
const DISPLAY_TEST_MS: u32 = 1000;

#[derive(Debug)]
pub enum Error<SpiError, PinError> {
    /// SPI communication error
    Spi(SpiError),
    /// CS output pin error
    Pin(PinError),
    /// payload length should be the max text length (4 bytes per device)
    InvalidPayloadLength,
}

/// Clamps a requested chain length into `1..=MAX_DEVICES`
pub fn clamp_device_count(num_devices: i32) -> usize {
    num_devices.clamp(1, MAX_DEVICES as i32) as usize
}

pub struct MAX6952<'a, CS, D> {
    cs: &'a mut CS,
    delay: D,
    num_devices: usize,
}

/// the spi bus is passed into every call so that it can be shared with other devices
impl<'a, CS, D, PinError> MAX6952<'a, CS, D>
where
    CS: OutputPin<Error = PinError>,
    D: DelayNs,
{
    /// `num_devices` is clamped to 1..=16. Nothing is sent until `init` is called
    pub fn new(cs: &'a mut CS, delay: D, num_devices: i32) -> Self {
        let num_devices = clamp_device_count(num_devices);
        debug!("max6952 chain of {} devices", num_devices);
        MAX6952 {
            cs,
            delay,
            num_devices,
        }
    }

    /// Enables all four digits, clears the display and lights every segment for a second
    /// so the operator can see that all chips respond
    pub async fn init<B>(&mut self, spi: &mut B) -> Result<(), Error<B::Error, PinError>>
    where
        B: SpiBus,
    {
        debug!("init");
        self.write_command_all(spi, Command::ScanLimit, registers::SCAN_ALL_DIGITS)
            .await?;
        self.clear_all(spi).await?;
        self.display_test(spi, true).await?;
        self.delay.delay_ms(DISPLAY_TEST_MS).await;
        self.display_test(spi, false).await
    }

    /// Gets the number of devices after clamping the value passed to new
    pub fn get_num_devices(&self) -> usize {
        self.num_devices
    }

    /// Number of characters the whole chain can show at once
    pub fn max_text_length(&self) -> usize {
        self.num_devices * DIGITS_PER_DEVICE
    }

    /// Gives back the delay provider
    pub fn release(self) -> D {
        self.delay
    }

    /// Write command to all chips
    pub async fn write_command_all<B>(
        &mut self,
        spi: &mut B,
        command: Command,
        data: u8,
    ) -> Result<(), Error<B::Error, PinError>>
    where
        B: SpiBus,
    {
        self.write_raw_all(spi, command as u8, data).await
    }

    /// Write the same register and data to every chip in one chip select window,
    /// then wait for the chips to settle
    pub async fn write_raw_all<B>(
        &mut self,
        spi: &mut B,
        register: u8,
        data: u8,
    ) -> Result<(), Error<B::Error, PinError>>
    where
        B: SpiBus,
    {
        trace!("write {=u8:#x} <- {=u8:#x}", register, data);
        self.cs.set_low().map_err(Error::Pin)?;
        for _ in 0..self.num_devices {
            self.shift_out(spi, register, data).await?;
        }
        self.latch(spi).await
    }

    /// Power down (`true`) or normal operation (`false`)
    pub async fn shutdown<B>(&mut self, spi: &mut B, on: bool) -> Result<(), Error<B::Error, PinError>>
    where
        B: SpiBus,
    {
        debug!("shutdown {}", on);
        let data = if on { config::SHUTDOWN } else { config::ACTIVE };
        self.write_command_all(spi, Command::Configuration, data).await
    }

    /// Same brightness for all digits, clamped to 1..=15
    pub async fn set_intensity<B>(
        &mut self,
        spi: &mut B,
        intensity: i32,
    ) -> Result<(), Error<B::Error, PinError>>
    where
        B: SpiBus,
    {
        self.set_digit_intensities(spi, [intensity; DIGITS_PER_DEVICE])
            .await
    }

    /// Brightness per digit position (digit 0 first), each clamped to 1..=15.
    /// The same four levels apply to every chip in the chain
    pub async fn set_digit_intensities<B>(
        &mut self,
        spi: &mut B,
        levels: [i32; DIGITS_PER_DEVICE],
    ) -> Result<(), Error<B::Error, PinError>>
    where
        B: SpiBus,
    {
        let [d0, d1, d2, d3] = levels;
        debug!("intensity {} {} {} {}", d0, d1, d2, d3);
        self.write_command_all(spi, Command::Intensity10, registers::pack_intensity(d0, d1))
            .await?;
        self.write_command_all(spi, Command::Intensity32, registers::pack_intensity(d2, d3))
            .await
    }

    /// Lights (or stops lighting) every segment regardless of the digit data
    pub async fn display_test<B>(
        &mut self,
        spi: &mut B,
        on: bool,
    ) -> Result<(), Error<B::Error, PinError>>
    where
        B: SpiBus,
    {
        self.write_command_all(spi, Command::DisplayTest, on as u8)
            .await
    }

    /// Clear the digit data of both planes on all chips
    pub async fn clear_all<B>(&mut self, spi: &mut B) -> Result<(), Error<B::Error, PinError>>
    where
        B: SpiBus,
    {
        debug!("clear");
        self.write_command_all(spi, Command::Configuration, config::CLEAR_DIGIT_DATA)
            .await
    }

    /// Show `text` on both planes, no blinking
    pub async fn set_text<B>(
        &mut self,
        spi: &mut B,
        text: impl AsRef<[u8]>,
        alignment: Alignment,
    ) -> Result<(), Error<B::Error, PinError>>
    where
        B: SpiBus,
    {
        debug!("set text {}", alignment);
        self.clear_all(spi).await?;
        self.write_command_all(
            spi,
            Command::Configuration,
            config::ACTIVE | config::BLINK_RATE | config::BLINK_TIMING_SYNC,
        )
        .await?;

        let buffer = build_buffer(text.as_ref(), self.max_text_length(), alignment);
        self.write_plane(spi, Plane::Both, &buffer).await
    }

    /// Show `text` on plane 0 only and turn on the global blink so the display alternates
    /// between the text and whatever plane 1 holds (blank after a clear).
    /// `_speed` is not used, the blink rate is set by the chip
    pub async fn set_text_blink<B>(
        &mut self,
        spi: &mut B,
        text: impl AsRef<[u8]>,
        _speed: u32,
        alignment: Alignment,
    ) -> Result<(), Error<B::Error, PinError>>
    where
        B: SpiBus,
    {
        debug!("set text blink {}", alignment);
        self.write_command_all(spi, Command::Configuration, config::ACTIVE | config::BLINK_ENABLE)
            .await?;

        let buffer = build_buffer(text.as_ref(), self.max_text_length(), alignment);
        self.write_plane(spi, Plane::P0, &buffer).await
    }

    /// Alternate between two texts: `first` goes to plane 0, `second` to plane 1 and the
    /// global blink flips between them
    pub async fn set_text_alternate<B>(
        &mut self,
        spi: &mut B,
        first: impl AsRef<[u8]>,
        second: impl AsRef<[u8]>,
        alignment: Alignment,
    ) -> Result<(), Error<B::Error, PinError>>
    where
        B: SpiBus,
    {
        debug!("set text alternate {}", alignment);
        self.write_command_all(spi, Command::Configuration, config::ACTIVE | config::BLINK_ENABLE)
            .await?;

        let capacity = self.max_text_length();
        let buffer = build_buffer(first.as_ref(), capacity, alignment);
        self.write_plane(spi, Plane::P0, &buffer).await?;
        let buffer = build_buffer(second.as_ref(), capacity, alignment);
        self.write_plane(spi, Plane::P1, &buffer).await
    }

    /// Scroll `text` across the display, pausing `speed` milliseconds between frames.
    /// Returns when the last frame has been shown
    pub async fn set_text_marquee<B>(
        &mut self,
        spi: &mut B,
        text: impl AsRef<[u8]>,
        speed: u32,
        mode: MarqueeMode,
        direction: ScrollDirection,
    ) -> Result<(), Error<B::Error, PinError>>
    where
        B: SpiBus,
    {
        let mut marquee = self.begin_marquee(spi, text.as_ref(), mode, direction).await?;
        while self.write_marquee_frame(spi, &mut marquee).await? {
            self.delay.delay_ms(speed).await;
        }
        Ok(())
    }

    /// Clears the display and sets up a marquee for `text` without showing any frame yet.
    /// Call `write_marquee_frame` on every tick to play it
    pub async fn begin_marquee<'t, B>(
        &mut self,
        spi: &mut B,
        text: &'t [u8],
        mode: MarqueeMode,
        direction: ScrollDirection,
    ) -> Result<Marquee<'t>, Error<B::Error, PinError>>
    where
        B: SpiBus,
    {
        debug!("marquee {} {}", mode, direction);
        self.clear_all(spi).await?;
        self.write_command_all(spi, Command::Configuration, config::ACTIVE)
            .await?;
        Ok(Marquee::new(text, self.max_text_length(), mode, direction))
    }

    /// Shows the next frame of `marquee`. Returns false, without writing anything, once
    /// the marquee has finished
    pub async fn write_marquee_frame<B>(
        &mut self,
        spi: &mut B,
        marquee: &mut Marquee<'_>,
    ) -> Result<bool, Error<B::Error, PinError>>
    where
        B: SpiBus,
    {
        match marquee.advance() {
            Some(frame) => {
                self.write_plane(spi, Plane::Both, &frame).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Write a prepared buffer of exactly `max_text_length` bytes to both planes
    pub async fn write_display<B>(
        &mut self,
        spi: &mut B,
        buffer: &[u8],
    ) -> Result<(), Error<B::Error, PinError>>
    where
        B: SpiBus,
    {
        self.write_plane(spi, Plane::Both, buffer).await
    }

    /// Payload should have 4 bytes per device in it, byte `(j - 1) * 4 + d` is digit `d` of
    /// chip `j`. One chip select window per digit, highest digit first
    pub async fn write_plane<B>(
        &mut self,
        spi: &mut B,
        plane: Plane,
        buffer: &[u8],
    ) -> Result<(), Error<B::Error, PinError>>
    where
        B: SpiBus,
    {
        if buffer.len() != self.max_text_length() {
            return Err(Error::InvalidPayloadLength);
        }

        for digit in (0..DIGITS_PER_DEVICE).rev() {
            let register = plane.digit_register(digit as u8);
            self.cs.set_low().map_err(Error::Pin)?;

            // the last chip in the chain has to be written first because the bytes are
            // pushed through all the chips before it
            for device in (0..self.num_devices).rev() {
                let data = buffer[device * DIGITS_PER_DEVICE + digit];
                self.shift_out(spi, register, data).await?;
            }

            self.latch(spi).await?;
        }

        Ok(())
    }

    /// Ends a chip select window. The chips take the data on the rising edge
    async fn latch<B>(&mut self, spi: &mut B) -> Result<(), Error<B::Error, PinError>>
    where
        B: SpiBus,
    {
        spi.flush().await.map_err(Error::Spi)?;
        self.cs.set_high().map_err(Error::Pin)?;
        self.delay.delay_ms(SETTLE_MS).await;
        Ok(())
    }

    /// sends one opcode and data pair to the spi bus
    async fn shift_out<B>(
        &mut self,
        spi: &mut B,
        register: u8,
        data: u8,
    ) -> Result<(), Error<B::Error, PinError>>
    where
        B: SpiBus,
    {
        spi.write(&[register, data]).await.map_err(Error::Spi)
    }
}
