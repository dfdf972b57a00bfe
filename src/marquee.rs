//! Scrolling text.
//!
//! The text is staged between two blank margins and a display-sized window slides over it.
//! A [`Marquee`] produces one window per call to [`Marquee::advance`] so the caller decides
//! the timing and can stop at any frame. [`crate::MAX6952::set_text_marquee`] simply plays
//! every frame with a fixed pause in between.

use crate::layout::{BLANK, DisplayBuffer, MAX_TEXT_LENGTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MarqueeMode {
    /// Text scrolls in from one side and out the other
    #[default]
    Classic,
    /// Text moves from one edge of the display to the other and back.
    /// Only possible when the text fits on the display
    Bounce,
}

impl From<u8> for MarqueeMode {
    /// 0 = classic, 1 = bounce. Anything else is classic
    fn from(value: u8) -> Self {
        match value {
            1 => MarqueeMode::Bounce,
            _ => MarqueeMode::Classic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollDirection {
    LeftToRight,
    /// The usual ticker direction, text enters on the right
    #[default]
    RightToLeft,
}

impl From<u8> for ScrollDirection {
    /// 0 = left to right, anything else right to left
    fn from(value: u8) -> Self {
        match value {
            0 => ScrollDirection::LeftToRight,
            _ => ScrollDirection::RightToLeft,
        }
    }
}

/// `margin` blanks, the text, then `margin` blanks again.
/// Bytes are computed on the fly so nothing of size `2 * margin + text.len()` is ever allocated
#[derive(Debug, Clone, Copy)]
pub struct StagedText<'t> {
    text: &'t [u8],
    margin: usize,
}

impl<'t> StagedText<'t> {
    pub fn new(text: &'t [u8], margin: usize) -> Self {
        StagedText { text, margin }
    }

    pub fn len(&self) -> usize {
        2 * self.margin + self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn margin(&self) -> usize {
        self.margin
    }

    /// Byte at `index`, blank outside of the text
    pub fn byte_at(&self, index: usize) -> u8 {
        index
            .checked_sub(self.margin)
            .and_then(|i| self.text.get(i))
            .copied()
            .unwrap_or(BLANK)
    }

    /// The `width` bytes starting at `offset`
    pub fn window(&self, offset: usize, width: usize) -> DisplayBuffer {
        let mut buffer = DisplayBuffer::new();
        buffer.extend((offset..offset + width.min(MAX_TEXT_LENGTH)).map(|i| self.byte_at(i)));
        buffer
    }
}

/// Frame by frame marquee animation over a display of `capacity` characters
#[derive(Debug, Clone)]
pub struct Marquee<'t> {
    staged: StagedText<'t>,
    capacity: usize,
    mode: MarqueeMode,
    direction: ScrollDirection,
    frame: usize,
    frame_count: usize,
}

impl<'t> Marquee<'t> {
    /// Bounce falls back to classic when the text is longer than the display
    pub fn new(
        text: &'t [u8],
        capacity: usize,
        mode: MarqueeMode,
        direction: ScrollDirection,
    ) -> Self {
        let capacity = capacity.clamp(1, MAX_TEXT_LENGTH);
        let mode = if mode == MarqueeMode::Bounce && text.len() > capacity {
            warn!("text too long to bounce, using classic marquee");
            MarqueeMode::Classic
        } else {
            mode
        };

        let (staged, frame_count) = match mode {
            MarqueeMode::Classic => {
                let staged = StagedText::new(text, capacity);
                (staged, staged.len() - capacity + 1)
            }
            MarqueeMode::Bounce => {
                let margin = capacity - text.len();
                (StagedText::new(text, margin), 2 * margin)
            }
        };

        Marquee {
            staged,
            capacity,
            mode,
            direction,
            frame: 0,
            frame_count,
        }
    }

    /// The mode actually used, after the bounce fallback
    pub fn mode(&self) -> MarqueeMode {
        self.mode
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    pub fn staged(&self) -> &StagedText<'t> {
        &self.staged
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn remaining(&self) -> usize {
        self.frame_count - self.frame
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.frame_count
    }

    /// Start over from the first frame
    pub fn rewind(&mut self) {
        self.frame = 0;
    }

    /// Window offset into the staged text for `frame`.
    ///
    /// Classic covers every offset from 0 to `staged.len() - capacity` exactly once. Bounce
    /// goes to the far edge and back without showing the turning frame twice and stops one
    /// short of the start, so replaying it loops smoothly. `frame` must be below `frame_count`.
    fn offset_at(&self, frame: usize) -> usize {
        let last = self.staged.len() - self.capacity;
        match (self.mode, self.direction) {
            (MarqueeMode::Classic, ScrollDirection::RightToLeft) => frame,
            (MarqueeMode::Classic, ScrollDirection::LeftToRight) => last - frame,
            (MarqueeMode::Bounce, ScrollDirection::RightToLeft) => {
                if frame < last {
                    frame
                } else {
                    2 * last - frame
                }
            }
            (MarqueeMode::Bounce, ScrollDirection::LeftToRight) => {
                if frame < last {
                    last - frame
                } else {
                    frame - last
                }
            }
        }
    }

    /// Offsets of all frames in play order
    pub fn offsets(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.frame_count).map(|frame| self.offset_at(frame))
    }

    /// Next window to display, `None` once the animation is done
    pub fn advance(&mut self) -> Option<DisplayBuffer> {
        if self.is_finished() {
            return None;
        }

        let offset = self.offset_at(self.frame);
        self.frame += 1;
        trace!("marquee frame {} offset {}", self.frame, offset);
        Some(self.staged.window(offset, self.capacity))
    }
}

impl Iterator for Marquee<'_> {
    type Item = DisplayBuffer;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}
