//! Sequence step
//!
//! One timed unit of behavior: an expression, a caption, an optional tone,
//! and how long to show it all.

use heapless::String;

use crate::face::Expression;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum expression name length (bytes)
pub const MAX_EXPRESSION_LEN: usize = 16;

/// Maximum caption length (bytes)
pub const MAX_CAPTION_LEN: usize = 96;

/// A step waiting in, or taken from, the sequence queue
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SequenceStep {
    /// Expression name, resolved at playback time
    pub expression: String<MAX_EXPRESSION_LEN>,
    /// Caption shown while the step plays
    pub caption: String<MAX_CAPTION_LEN>,
    /// Tone length in seconds (0 = silent)
    pub tone_s: f32,
    /// How long the step stays up, in seconds
    pub display_s: f32,
}

impl SequenceStep {
    /// Build a step, truncating text that does not fit
    pub fn new(expression: &str, caption: &str, tone_s: f32, display_s: f32) -> Self {
        Self {
            expression: truncated(expression),
            caption: truncated(caption),
            tone_s,
            display_s,
        }
    }

    /// Resolve the expression name, using `fallback` for unknown names
    pub fn resolve_expression(&self, fallback: Expression) -> Expression {
        Expression::resolve(&self.expression, fallback)
    }

    /// Tone length in milliseconds (0 = no tone)
    pub fn tone_ms(&self) -> u32 {
        seconds_to_ms(self.tone_s)
    }

    /// Display time in milliseconds
    pub fn display_ms(&self) -> u32 {
        seconds_to_ms(self.display_s)
    }
}

/// Convert seconds to milliseconds, treating negative or NaN as zero
fn seconds_to_ms(seconds: f32) -> u32 {
    if seconds.is_nan() || seconds <= 0.0 {
        return 0;
    }
    // Float-to-int casts saturate, so huge values pin at u32::MAX
    (seconds * 1000.0) as u32
}

/// Copy as many whole characters of `text` as fit
fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_step() {
        let step = SequenceStep::new("happy", "hi", 0.0, 2.0);
        assert_eq!(step.expression.as_str(), "happy");
        assert_eq!(step.caption.as_str(), "hi");
        assert_eq!(step.tone_ms(), 0);
        assert_eq!(step.display_ms(), 2000);
    }

    #[test]
    fn test_tone_ms() {
        let step = SequenceStep::new("sad", "", 0.25, 1.0);
        assert_eq!(step.tone_ms(), 250);
    }

    #[test]
    fn test_bad_durations_become_zero() {
        let step = SequenceStep::new("sad", "", -1.0, f32::NAN);
        assert_eq!(step.tone_ms(), 0);
        assert_eq!(step.display_ms(), 0);

        let huge = SequenceStep::new("sad", "", 0.0, 1.0e12);
        assert_eq!(huge.display_ms(), u32::MAX);
    }

    #[test]
    fn test_long_text_truncated() {
        let name = "an-expression-name-that-is-far-too-long";
        let step = SequenceStep::new(name, "", 0.0, 1.0);
        assert_eq!(step.expression.len(), MAX_EXPRESSION_LEN);
        assert_eq!(step.expression.as_str(), &name[..MAX_EXPRESSION_LEN]);
    }

    #[test]
    fn test_truncation_keeps_char_boundaries() {
        // 15 ASCII bytes + a 2-byte char would overflow 16
        let step = SequenceStep::new("aaaaaaaaaaaaaaaé", "", 0.0, 1.0);
        assert_eq!(step.expression.as_str(), "aaaaaaaaaaaaaaa");
    }

    #[test]
    fn test_resolve_expression() {
        let step = SequenceStep::new("Shocked", "", 0.0, 1.0);
        assert_eq!(step.resolve_expression(Expression::Angry), Expression::Shocked);

        let unknown = SequenceStep::new("confused", "", 0.0, 1.0);
        assert_eq!(unknown.resolve_expression(Expression::Calm), Expression::Calm);
    }
}
