//! Easing curves supplied by content authors.

use bevy::math::curve::Curve;
use bevy::math::curve::UnevenSampleAutoCurve;
use bevy::math::curve::easing::EaseFunction;

use crate::error::TransitionError;

/// A scalar curve sampled over `[0, 1]`.
///
/// Either one of Bevy's easing functions or a keyframed curve (linear between
/// keys), the equivalent of a hand-authored animation curve.
#[derive(Clone, Debug)]
pub enum TransitionCurve {
    Ease(EaseFunction),
    Keyframes(UnevenSampleAutoCurve<f32>),
}

impl TransitionCurve {
    pub const fn linear() -> Self { Self::Ease(EaseFunction::Linear) }

    /// Builds a keyframed curve from `(time, value)` pairs.
    pub fn keyframes(keys: impl IntoIterator<Item = (f32, f32)>) -> Result<Self, TransitionError> {
        UnevenSampleAutoCurve::new(keys)
            .map(Self::Keyframes)
            .map_err(|e| TransitionError::InvalidCurve(e.to_string()))
    }

    /// Evaluates the curve. Both the parameter and the result are clamped to `[0, 1]`.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = clamp01(t);
        let value = match self {
            Self::Ease(ease) => ease.sample_clamped(t),
            Self::Keyframes(curve) => curve.sample_clamped(t),
        };
        clamp01(value)
    }
}

impl Default for TransitionCurve {
    fn default() -> Self { Self::linear() }
}

impl From<EaseFunction> for TransitionCurve {
    fn from(ease: EaseFunction) -> Self { Self::Ease(ease) }
}

/// Clamps to `[0, 1]`, mapping NaN to 0.
pub fn clamp01(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_is_identity_inside_unit_interval() {
        let curve = TransitionCurve::linear();
        assert!((curve.evaluate(0.25) - 0.25).abs() < 1e-6);
        assert!((curve.evaluate(0.75) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn parameter_is_clamped() {
        let curve = TransitionCurve::linear();
        assert_eq!(curve.evaluate(-3.0), 0.0);
        assert_eq!(curve.evaluate(7.5), 1.0);
        assert_eq!(curve.evaluate(f32::NAN), 0.0);
    }

    #[test]
    fn overshooting_ease_is_clamped() {
        let curve = TransitionCurve::from(EaseFunction::BackOut);
        for i in 0..=100 {
            let value = curve.evaluate(i as f32 / 100.0);
            assert!((0.0..=1.0).contains(&value), "value {value} out of range");
        }
    }

    #[test]
    fn keyframes_interpolate_linearly() {
        let curve = TransitionCurve::keyframes([(0.0, 0.0), (0.5, 0.8), (1.0, 1.0)])
            .expect("valid keys");
        assert!((curve.evaluate(0.25) - 0.4).abs() < 1e-5);
        assert!((curve.evaluate(0.75) - 0.9).abs() < 1e-5);
    }

    #[test]
    fn keyframes_need_two_keys() {
        assert!(TransitionCurve::keyframes([(0.0, 1.0)]).is_err());
    }
}
