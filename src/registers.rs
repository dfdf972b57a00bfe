/// Register addresses of the MAX6952 that are written as a single broadcast to every chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Noop = 0x00,
    /// Intensity of digit 0 (low nibble) and digit 1 (high nibble)
    Intensity10 = 0x01,
    /// Intensity of digit 2 (low nibble) and digit 3 (high nibble)
    Intensity32 = 0x02,
    ScanLimit = 0x03,
    Configuration = 0x04,
    UserDefinedFonts = 0x05,
    DisplayTest = 0x07,
}

/// Each chip has two digit planes that the hardware blink alternates between.
/// The register for digit `d` of a plane is `plane as u8 + d`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Plane {
    P0 = 0x20,
    P1 = 0x40,
    /// Writes plane 0 and plane 1 with the same data
    Both = 0x60,
}

impl Plane {
    pub fn digit_register(self, digit: u8) -> u8 {
        self as u8 + digit
    }
}

/// Bits of the configuration register
pub mod config {
    /// S = 0
    pub const SHUTDOWN: u8 = 0b0000_0000;
    /// S = 1
    pub const ACTIVE: u8 = 0b0000_0001;
    /// B, blink rate select
    pub const BLINK_RATE: u8 = 0b0000_0100;
    /// E, global blink enable
    pub const BLINK_ENABLE: u8 = 0b0000_1000;
    /// T, global blink timing synchronization
    pub const BLINK_TIMING_SYNC: u8 = 0b0001_0000;
    /// R, clears the digit data of both planes
    pub const CLEAR_DIGIT_DATA: u8 = 0b0010_0000;
    /// P, blink phase readback
    pub const BLINK_PHASE_READBACK: u8 = 0b1000_0000;
}

/// Scan limit value that enables all four digits
pub const SCAN_ALL_DIGITS: u8 = 0x01;

/// Lowest and highest intensity accepted by the driver
pub const MIN_INTENSITY: i32 = 1;
pub const MAX_INTENSITY: i32 = 15;

/// Clamps a brightness level into `MIN_INTENSITY..=MAX_INTENSITY`
pub fn clamp_intensity(level: i32) -> u8 {
    level.clamp(MIN_INTENSITY, MAX_INTENSITY) as u8
}

/// Packs two digit intensities into one intensity register value
pub fn pack_intensity(low: i32, high: i32) -> u8 {
    (clamp_intensity(high) << 4) | clamp_intensity(low)
}
