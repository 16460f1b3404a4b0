//! Face screen
//!
//! Composes the full 128x64 picture: both eyes, plus either the status line
//! at the top or the caption of the playing step at the bottom.
//!
//! A notice (boot progress, a lost host link) temporarily takes over the
//! status line. The playback controller keeps writing its own status
//! underneath, which comes back as soon as the notice is cleared.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use jumbo_core::face::EyeFrame;
use jumbo_core::traits::StatusSink;

use crate::eye::EyeRenderer;
use crate::text::{Align, TextBox};

/// Panel width (px)
pub const SCREEN_WIDTH: u32 = 128;

/// Panel height (px)
pub const SCREEN_HEIGHT: u32 = 64;

/// Line height used by the status and caption boxes (px)
const LINE_HEIGHT: u32 = 12;

/// Top edge of the caption box (px)
const CAPTION_Y: i32 = 50;

/// Screen contents outside the eyes
#[derive(Clone)]
pub struct FaceScreen {
    status: TextBox,
    notice: TextBox,
    notice_shown: bool,
    caption: TextBox,
    renderer: EyeRenderer,
    /// Whether text changed since the last draw
    dirty: bool,
    /// Eyes and playing flag of the last frame drawn by `render`
    last: Option<([EyeFrame; 2], bool)>,
}

impl Default for FaceScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceScreen {
    pub fn new() -> Self {
        Self {
            status: TextBox::new(Point::zero(), LINE_HEIGHT, SCREEN_WIDTH, Align::Center),
            notice: TextBox::new(Point::zero(), LINE_HEIGHT, SCREEN_WIDTH, Align::Center),
            notice_shown: false,
            caption: TextBox::new(
                Point::new(0, CAPTION_Y),
                LINE_HEIGHT,
                SCREEN_WIDTH,
                Align::Left,
            ),
            renderer: EyeRenderer,
            dirty: true,
            last: None,
        }
    }

    /// Status set by the controller, ignoring any notice
    pub fn status(&self) -> &str {
        self.status.text()
    }

    /// Active notice, if any
    pub fn notice(&self) -> Option<&str> {
        self.notice_shown.then(|| self.notice.text())
    }

    /// Cover the status line with `text` until [`FaceScreen::clear_notice`]
    pub fn show_notice(&mut self, text: &str) {
        if self.notice() != Some(text) {
            self.notice.set_text(text);
            self.notice_shown = true;
            self.dirty = true;
        }
    }

    pub fn clear_notice(&mut self) {
        if self.notice_shown {
            self.notice_shown = false;
            self.dirty = true;
        }
    }

    pub fn caption(&self) -> &str {
        self.caption.text()
    }

    /// Check if text changed since the last draw
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark text as drawn
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Draw a whole frame
    ///
    /// The caption replaces the status line while a step is playing.
    pub fn draw<D>(&self, eyes: &[EyeFrame], playing: bool, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        target.clear(BinaryColor::Off)?;
        for eye in eyes {
            self.renderer.draw(eye, target)?;
        }
        if playing {
            self.caption.draw(target)
        } else if self.notice_shown {
            self.notice.draw(target)
        } else {
            self.status.draw(target)
        }
    }

    /// Draw only if something visible changed since the last call
    ///
    /// Returns whether the target was touched, so the caller knows whether
    /// the panel needs flushing.
    pub fn render<D>(
        &mut self,
        eyes: &[EyeFrame; 2],
        playing: bool,
        target: &mut D,
    ) -> Result<bool, D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let frame = (*eyes, playing);
        if !self.dirty && self.last == Some(frame) {
            return Ok(false);
        }
        self.draw(eyes, playing, target)?;
        self.last = Some(frame);
        self.mark_clean();
        Ok(true)
    }
}

impl StatusSink for FaceScreen {
    fn show_status(&mut self, text: &str) {
        if self.status.text() != text {
            self.status.set_text(text);
            self.dirty = true;
        }
    }

    fn show_caption(&mut self, text: &str) {
        if self.caption.text() != text {
            self.caption.set_text(text);
            self.dirty = true;
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FaceScreen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "FaceScreen[status={}, caption={}]",
            self.status.text(),
            self.caption.text()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FrameBuffer;
    use jumbo_core::config::FaceConfig;
    use jumbo_core::face::Eye;

    fn sleeping_eyes() -> [EyeFrame; 2] {
        let cfg = FaceConfig::default();
        let mut left = Eye::new(cfg.layout.left, cfg.blink, cfg.layout.gaze_margin);
        let mut right = Eye::new(cfg.layout.right, cfg.blink, cfg.layout.gaze_margin);
        left.tick(0);
        right.tick(0);
        [left.frame(), right.frame()]
    }

    fn lit_rows(fb: &FrameBuffer, rows: core::ops::Range<i32>) -> usize {
        rows.flat_map(|y| (0..SCREEN_WIDTH as i32).map(move |x| (x, y)))
            .filter(|&(x, y)| fb.is_on(x, y))
            .count()
    }

    #[test]
    fn test_status_tracks_dirty() {
        let mut screen = FaceScreen::new();
        screen.mark_clean();
        screen.show_status("Sleeping...");
        assert!(screen.is_dirty());
        assert_eq!(screen.status(), "Sleeping...");

        screen.mark_clean();
        screen.show_status("Sleeping...");
        assert!(!screen.is_dirty());
    }

    #[test]
    fn test_status_shown_when_idle() {
        let mut screen = FaceScreen::new();
        screen.show_status("Booting...");
        screen.show_caption("hello");
        let mut fb = FrameBuffer::new();
        screen.draw(&sleeping_eyes(), false, &mut fb).unwrap();

        assert!(lit_rows(&fb, 0..LINE_HEIGHT as i32) > 0);
        assert_eq!(lit_rows(&fb, CAPTION_Y..SCREEN_HEIGHT as i32), 0);
    }

    #[test]
    fn test_caption_shown_while_playing() {
        let mut screen = FaceScreen::new();
        screen.show_status("Booting...");
        screen.show_caption("hello");
        let mut fb = FrameBuffer::new();
        screen.draw(&sleeping_eyes(), true, &mut fb).unwrap();

        assert_eq!(lit_rows(&fb, 0..LINE_HEIGHT as i32), 0);
        assert!(lit_rows(&fb, CAPTION_Y..SCREEN_HEIGHT as i32) > 0);
    }

    #[test]
    fn test_notice_covers_status_until_cleared() {
        let mut screen = FaceScreen::new();
        screen.show_status("Sleeping...");
        screen.show_notice("Host lost!");
        assert_eq!(screen.notice(), Some("Host lost!"));
        assert_eq!(screen.status(), "Sleeping...");

        let mut with_notice = FrameBuffer::new();
        screen.draw(&sleeping_eyes(), false, &mut with_notice).unwrap();

        screen.clear_notice();
        assert_eq!(screen.notice(), None);
        let mut plain = FrameBuffer::new();
        screen.draw(&sleeping_eyes(), false, &mut plain).unwrap();

        let mut reference = FaceScreen::new();
        reference.show_status("Sleeping...");
        let mut expected = FrameBuffer::new();
        reference.draw(&sleeping_eyes(), false, &mut expected).unwrap();
        assert!(plain == expected);
        assert!(with_notice != expected);
    }

    #[test]
    fn test_render_skips_unchanged_frames() {
        let mut screen = FaceScreen::new();
        let eyes = sleeping_eyes();
        let mut fb = FrameBuffer::new();
        assert!(screen.render(&eyes, false, &mut fb).unwrap());
        assert!(!screen.render(&eyes, false, &mut fb).unwrap());

        // Text change
        screen.show_status("Sleeping...");
        assert!(screen.render(&eyes, false, &mut fb).unwrap());
        assert!(!screen.render(&eyes, false, &mut fb).unwrap());

        // Playing flag swaps status for caption
        assert!(screen.render(&eyes, true, &mut fb).unwrap());

        // Eye movement
        let mut moved = eyes;
        moved[0].blink_percent = 0.5;
        assert!(screen.render(&moved, true, &mut fb).unwrap());

        // Setting the same notice twice is not a change
        screen.show_notice("Host lost!");
        assert!(screen.render(&moved, true, &mut fb).unwrap());
        screen.show_notice("Host lost!");
        assert!(!screen.render(&moved, true, &mut fb).unwrap());
    }

    #[test]
    fn test_draw_clears_previous_frame() {
        let screen = FaceScreen::new();
        let mut fb = FrameBuffer::new();
        fb.fill(true);
        screen.draw(&[], false, &mut fb).unwrap();
        assert_eq!(fb.lit(), 0);
    }
}
