//! Word-wrapped text boxes
//!
//! A box has a position, a target line height, and an optional width. The
//! line height picks the font; the width turns on greedy word wrapping.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_4X6, FONT_6X10, FONT_9X15};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use heapless::String;

/// Longest text a box holds (bytes)
pub const MAX_TEXT_LEN: usize = 128;

/// Horizontal placement of each wrapped line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Text area drawn in a single monospace font
#[derive(Debug, Clone)]
pub struct TextBox {
    origin: Point,
    line_height: u32,
    /// 0 = no wrapping
    width: u32,
    align: Align,
    font: &'static MonoFont<'static>,
    text: String<MAX_TEXT_LEN>,
}

impl TextBox {
    pub fn new(origin: Point, line_height: u32, width: u32, align: Align) -> Self {
        Self {
            origin,
            line_height,
            width,
            align,
            font: font_for_height(line_height),
            text: String::new(),
        }
    }

    /// Replace the text, truncating on a character boundary
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        for ch in text.chars() {
            if self.text.push(ch).is_err() {
                break;
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_align(&mut self, align: Align) {
        self.align = align;
    }

    /// Width of one character cell (px)
    fn advance(&self) -> u32 {
        self.font.character_size.width + self.font.character_spacing
    }

    /// Characters that fit on one line, or `usize::MAX` when unwrapped
    pub fn columns(&self) -> usize {
        if self.width == 0 {
            usize::MAX
        } else {
            (self.width / self.advance()).max(1) as usize
        }
    }

    /// Wrapped lines, top to bottom
    pub fn lines(&self) -> WordWrap<'_> {
        WordWrap::new(&self.text, self.columns())
    }

    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let style = MonoTextStyle::new(self.font, BinaryColor::On);
        let mut y = self.origin.y;
        for line in self.lines() {
            let used = line.chars().count() as u32 * self.advance();
            let slack = self.width.saturating_sub(used) as i32;
            let x = self.origin.x
                + match self.align {
                    Align::Left => 0,
                    Align::Center => slack / 2,
                    Align::Right => slack,
                };
            Text::with_baseline(line, Point::new(x, y), style, Baseline::Top).draw(target)?;
            y += self.line_height as i32;
        }
        Ok(())
    }
}

/// Pick the largest built-in font that fits a line height
pub fn font_for_height(line_height: u32) -> &'static MonoFont<'static> {
    match line_height {
        0..=9 => &FONT_4X6,
        10..=14 => &FONT_6X10,
        15..=21 => &FONT_9X15,
        _ => &FONT_10X20,
    }
}

/// Greedy word wrapper over a borrowed string
///
/// Words are split on spaces. A word longer than a whole line gets a line of
/// its own and overflows rather than being broken.
#[derive(Debug, Clone)]
pub struct WordWrap<'a> {
    rest: &'a str,
    columns: usize,
}

impl<'a> WordWrap<'a> {
    pub fn new(text: &'a str, columns: usize) -> Self {
        Self {
            rest: text.trim_matches(' '),
            columns,
        }
    }
}

impl<'a> Iterator for WordWrap<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        let mut end = 0;
        let mut used = 0;
        for word in self.rest.split(' ').filter(|w| !w.is_empty()) {
            let len = word.chars().count();
            let start = word.as_ptr() as usize - self.rest.as_ptr() as usize;
            let needed = if used == 0 { len } else { start - end + len };
            if used > 0 && used + needed > self.columns {
                break;
            }
            used += needed;
            end = start + word.len();
        }

        let line = &self.rest[..end];
        self.rest = self.rest[end..].trim_start_matches(' ');
        Some(line)
    }
}
