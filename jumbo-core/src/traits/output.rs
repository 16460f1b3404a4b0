//! Output collaborator traits

/// Fire-and-forget tone output
pub trait ToneDriver {
    /// Sound a tone for `duration_ms`
    ///
    /// Must return immediately; the driver turns the tone off on its own.
    fn play_tone(&mut self, duration_ms: u32);
}

/// Destination for the plain-text lines shown under the eyes
pub trait StatusSink {
    /// Device status ("Sleeping...", boot progress, ...)
    fn show_status(&mut self, text: &str);

    /// Caption of the step being played
    fn show_caption(&mut self, text: &str);
}

impl<T: ToneDriver + ?Sized> ToneDriver for &mut T {
    fn play_tone(&mut self, duration_ms: u32) {
        (**self).play_tone(duration_ms);
    }
}

impl<T: StatusSink + ?Sized> StatusSink for &mut T {
    fn show_status(&mut self, text: &str) {
        (**self).show_status(text);
    }

    fn show_caption(&mut self, text: &str) {
        (**self).show_caption(text);
    }
}
