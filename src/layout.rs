use heapless::Vec;

/// Number of digits driven by a single MAX6952
pub const DIGITS_PER_DEVICE: usize = 4;

/// Maximum number of daisy-chained chips
pub const MAX_DEVICES: usize = 16;

/// Maximum number of characters across a full chain
pub const MAX_TEXT_LENGTH: usize = MAX_DEVICES * DIGITS_PER_DEVICE;

/// One byte per character cell. Byte `(j - 1) * 4 + d` ends up in digit `d` of chip `j`
pub type DisplayBuffer = Vec<u8, MAX_TEXT_LENGTH>;

/// Character used for padding
pub const BLANK: u8 = b' ';

/// Where text shorter than the display is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alignment {
    #[default]
    Left,
    Right,
    Center,
}

impl From<u8> for Alignment {
    /// 0 = left, 1 = right, 2 = center. Anything else is left aligned
    fn from(value: u8) -> Self {
        match value {
            1 => Alignment::Right,
            2 => Alignment::Center,
            _ => Alignment::Left,
        }
    }
}

/// Lays out `text` in a buffer of exactly `capacity` bytes.
///
/// Text that does not fit is truncated to its first `capacity` bytes, shorter text is padded
/// with blanks according to `alignment`. For centered text with an odd amount of padding the
/// extra blank goes after the text. `capacity` is capped at `MAX_TEXT_LENGTH`.
pub fn build_buffer(text: &[u8], capacity: usize, alignment: Alignment) -> DisplayBuffer {
    let capacity = capacity.min(MAX_TEXT_LENGTH);
    let text = &text[..text.len().min(capacity)];
    let pad_total = capacity - text.len();

    let pad_front = match alignment {
        Alignment::Left => 0,
        Alignment::Right => pad_total,
        Alignment::Center => pad_total / 2,
    };

    let mut buffer = DisplayBuffer::new();
    buffer.extend(
        core::iter::repeat_n(BLANK, pad_front)
            .chain(text.iter().copied())
            .chain(core::iter::repeat_n(BLANK, pad_total - pad_front)),
    );
    buffer
}
