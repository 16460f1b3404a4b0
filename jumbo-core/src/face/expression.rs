//! Expression table
//!
//! Maps each named expression to exactly one target eyelid parameter set.

use super::params::EyelidParams;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Named eye expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expression {
    /// Top lid slants down toward the nose
    Angry,
    /// Crescent squint, cheeks pushed up
    Happy,
    /// Lids pulled back, pupil constricted
    Shocked,
    /// Outer corners droop, inner brow raised
    Sad,
    /// Relaxed lids, slightly lowered top
    Calm,
    /// Eyes closed; holds the blink state machine shut
    Sleep,
}

impl Expression {
    /// Every expression, in table order
    pub const ALL: [Expression; 6] = [
        Expression::Angry,
        Expression::Happy,
        Expression::Shocked,
        Expression::Sad,
        Expression::Calm,
        Expression::Sleep,
    ];

    /// Target eyelid parameters for this expression
    pub const fn params(self) -> EyelidParams {
        match self {
            Expression::Angry => EyelidParams::new(-0.8, 0.2, 1.2, 1.2, 1.0),
            Expression::Happy => EyelidParams::new(-0.5, -0.5, 0.1, 0.1, 1.0),
            Expression::Shocked => EyelidParams::new(-1.2, -1.2, 1.2, 1.2, 0.5),
            Expression::Sad => EyelidParams::new(0.5, -0.8, 0.5, 0.8, 1.0),
            Expression::Calm => EyelidParams::new(-0.1, -0.1, 0.8, 0.8, 1.0),
            Expression::Sleep => EyelidParams::new(1.0, 1.0, 1.0, 1.0, 1.0),
        }
    }

    /// Lowercase name as used in sequence steps
    pub const fn name(self) -> &'static str {
        match self {
            Expression::Angry => "angry",
            Expression::Happy => "happy",
            Expression::Shocked => "shocked",
            Expression::Sad => "sad",
            Expression::Calm => "calm",
            Expression::Sleep => "sleep",
        }
    }

    /// Look up an expression by name (ASCII case-insensitive, surrounding
    /// whitespace ignored)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.name().eq_ignore_ascii_case(name))
    }

    /// Resolve a name, mapping anything unrecognised to `fallback`
    pub fn resolve(name: &str, fallback: Expression) -> Self {
        Self::from_name(name).unwrap_or(fallback)
    }

    /// Check if this is the sleep expression
    pub const fn is_sleep(self) -> bool {
        matches!(self, Expression::Sleep)
    }
}

/// Target eyelid parameters for `expression`
pub const fn params_for(expression: Expression) -> EyelidParams {
    expression.params()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_expression_has_finite_params() {
        for expr in Expression::ALL {
            assert!(params_for(expr).is_finite(), "{:?}", expr);
        }
    }

    #[test]
    fn test_shocked_constricts_pupil() {
        assert_eq!(Expression::Shocked.params().pupil_scale, 0.5);
        assert_eq!(Expression::Calm.params().pupil_scale, 1.0);
    }

    #[test]
    fn test_sleep_closes_lids() {
        let p = Expression::Sleep.params();
        assert_eq!(p.to_array(), [1.0; 5]);
    }

    #[test]
    fn test_name_roundtrip() {
        for expr in Expression::ALL {
            assert_eq!(Expression::from_name(expr.name()), Some(expr));
        }
    }

    #[test]
    fn test_from_name_ignores_case_and_padding() {
        assert_eq!(Expression::from_name("HAPPY"), Some(Expression::Happy));
        assert_eq!(Expression::from_name("  Sad "), Some(Expression::Sad));
        assert_eq!(Expression::from_name("grumpy"), None);
        assert_eq!(Expression::from_name(""), None);
    }

    #[test]
    fn test_resolve_uses_fallback() {
        assert_eq!(
            Expression::resolve("grumpy", Expression::Angry),
            Expression::Angry
        );
        assert_eq!(
            Expression::resolve("grumpy", Expression::Calm),
            Expression::Calm
        );
        assert_eq!(
            Expression::resolve("shocked", Expression::Calm),
            Expression::Shocked
        );
    }

    #[test]
    fn test_only_sleep_is_sleep() {
        for expr in Expression::ALL {
            assert_eq!(expr.is_sleep(), expr == Expression::Sleep);
        }
    }
}
