//! Step playback controller
//!
//! Owns both eye engines and walks the sequence queue one step at a time.
//! A step stays at the head of the queue while it plays and is only popped
//! once its display time has run out. With nothing queued the face drifts
//! back to sleep.

use rand::{Rng, RngCore};

use crate::config::{FaceConfig, PlaybackConfig};
use crate::face::{Expression, Eye, EyeFrame, Point};
use crate::sequence::{SequenceQueue, SequenceStep};
use crate::traits::{StatusSink, ToneDriver};

/// Status shown while waiting for the first frame
pub const BOOT_STATUS: &str = "Booting...";

/// Status shown whenever the face goes to sleep
pub const IDLE_STATUS: &str = "Sleeping...";

/// Status shown when leaving standby
pub const RESUME_STATUS: &str = "Resuming...";

/// Something notable that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackEvent {
    /// A new step began with this expression
    Started(Expression),
    /// The current step ran out and was popped; nothing else changed
    Finished,
    /// Queue is empty and the face started falling asleep
    Slept,
}

/// Drives both eyes from the sequence queue
pub struct PlaybackController<R> {
    left: Eye,
    right: Eye,
    config: PlaybackConfig,
    rng: R,

    current: Option<SequenceStep>,
    playing: bool,
    step_start_ms: u32,
    display_ms: u32,
}

impl<R: RngCore> PlaybackController<R> {
    /// Create a controller with both eyes asleep
    pub fn new(config: &FaceConfig, rng: R) -> Self {
        let layout = &config.layout;
        Self {
            left: Eye::new(layout.left, config.blink, layout.gaze_margin),
            right: Eye::new(layout.right, config.blink, layout.gaze_margin),
            config: config.playback,
            rng,
            current: None,
            playing: false,
            step_start_ms: 0,
            display_ms: 0,
        }
    }

    /// Report the boot status before the first tick
    pub fn begin<S: StatusSink + ?Sized>(&mut self, sink: &mut S) {
        sink.show_status(BOOT_STATUS);
    }

    /// Advance playback and both eyes to `now_ms`
    pub fn tick<O>(
        &mut self,
        now_ms: u32,
        queue: &mut SequenceQueue,
        out: &mut O,
    ) -> Option<PlaybackEvent>
    where
        O: ToneDriver + StatusSink + ?Sized,
    {
        let mut event = None;

        if self.playing && now_ms.wrapping_sub(self.step_start_ms) >= self.display_ms {
            self.playing = false;
            self.current = None;
            queue.pop();
            event = Some(PlaybackEvent::Finished);
        }

        if !self.playing {
            if let Some(step) = queue.peek() {
                let expression = self.start_step(step.clone(), now_ms, out);
                event = Some(PlaybackEvent::Started(expression));
            } else if !self.left.expression().is_sleep() {
                self.set_expression(Expression::Sleep, self.config.idle_morph_ms, now_ms);
                out.show_status(IDLE_STATUS);
                event = Some(PlaybackEvent::Slept);
            }
        }

        if !self.left.expression().is_sleep()
            && self.rng.gen_bool(self.config.blink_probability())
        {
            self.left.trigger_blink(now_ms);
            self.right.trigger_blink(now_ms);
        }

        self.left.tick(now_ms);
        self.right.tick(now_ms);

        event
    }

    fn start_step<O>(&mut self, step: SequenceStep, now_ms: u32, out: &mut O) -> Expression
    where
        O: ToneDriver + StatusSink + ?Sized,
    {
        let expression = step.resolve_expression(self.config.fallback);

        self.playing = true;
        self.step_start_ms = now_ms;
        self.display_ms = step.display_ms();
        self.set_expression(expression, self.config.step_morph_ms, now_ms);

        out.show_caption(&step.caption);
        let tone_ms = step.tone_ms();
        if tone_ms > 0 {
            out.play_tone(tone_ms);
        }

        self.current = Some(step);
        expression
    }

    /// Shut both eyes immediately
    ///
    /// Playback state is left alone: a step that is playing keeps its clock
    /// running and finishes normally once ticking resumes.
    pub fn force_sleep<S: StatusSink + ?Sized>(&mut self, now_ms: u32, sink: &mut S) {
        self.set_expression(Expression::Sleep, 0, now_ms);
        sink.show_status(IDLE_STATUS);
    }

    /// Report that ticking is about to resume
    pub fn resume<S: StatusSink + ?Sized>(&mut self, sink: &mut S) {
        sink.show_status(RESUME_STATUS);
    }

    /// Morph both eyes to `expression` over `duration_ms`
    pub fn set_expression(&mut self, expression: Expression, duration_ms: u32, now_ms: u32) {
        self.left.set_expression(expression, duration_ms, now_ms);
        self.right.set_expression(expression, duration_ms, now_ms);
    }

    /// Point both pupils at a screen position
    pub fn look_at(&mut self, target: Point) {
        self.left.set_gaze(target);
        self.right.set_gaze(target);
    }

    /// Render snapshots, left eye first
    pub fn frames(&self) -> [EyeFrame; 2] {
        [self.left.frame(), self.right.frame()]
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Step currently on screen
    pub fn current_step(&self) -> Option<&SequenceStep> {
        self.current.as_ref()
    }

    pub fn left(&self) -> &Eye {
        &self.left
    }

    pub fn right(&self) -> &Eye {
        &self.right
    }
}
