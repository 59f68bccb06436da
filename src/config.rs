//! Timing, placement and curve settings for transitions.

use bevy::math::curve::easing::EaseFunction;
use bevy::prelude::*;

use crate::components::SceneKind;
use crate::curve::TransitionCurve;
use crate::zoom::ZoomCurves;
use crate::zoom::ZoomStyle;

/// Durations and display placement. All durations are in milliseconds.
#[derive(Resource, Reflect, Debug, Clone)]
#[reflect(Resource)]
pub struct TransitionConfig {
    /// Where the first view is placed.
    pub display_anchor: Vec3,
    /// Scale of the display volume the first view is fitted to.
    pub display_scale:            f32,
    pub galaxy_fade_out_ms:       f32,
    pub solar_system_fade_out_ms: f32,
    pub planet_fade_out_ms:       f32,
    pub poi_fade_out_ms:          f32,
    pub poi_fade_in_ms:           f32,
    /// Fade-in of the incoming view's content.
    pub opening_fade_ms:      f32,
    pub zoom_out_ms:          f32,
    pub zoom_in_ms:           f32,
    pub simultaneous_zoom_ms: f32,
    /// Disable `PanOrbitCamera` input while views are moving.
    pub gate_camera_input: bool,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            display_anchor:           Vec3::ZERO,
            display_scale:            1.0,
            galaxy_fade_out_ms:       1500.0,
            solar_system_fade_out_ms: 1000.0,
            planet_fade_out_ms:       800.0,
            poi_fade_out_ms:          500.0,
            poi_fade_in_ms:           600.0,
            opening_fade_ms:          1500.0,
            zoom_out_ms:              2000.0,
            zoom_in_ms:               2000.0,
            simultaneous_zoom_ms:     3000.0,
            gate_camera_input:        true,
        }
    }
}

impl TransitionConfig {
    /// Fade-out duration of an outgoing view.
    pub const fn fade_out_ms(&self, kind: SceneKind) -> f32 {
        match kind {
            SceneKind::Galaxy => self.galaxy_fade_out_ms,
            SceneKind::SolarSystem => self.solar_system_fade_out_ms,
            SceneKind::Planet => self.planet_fade_out_ms,
        }
    }

    /// A config with every duration set to `ms`. Handy for tests and tools.
    pub fn with_uniform_duration(ms: f32) -> Self {
        Self {
            galaxy_fade_out_ms: ms,
            solar_system_fade_out_ms: ms,
            planet_fade_out_ms: ms,
            poi_fade_out_ms: ms,
            poi_fade_in_ms: ms,
            opening_fade_ms: ms,
            zoom_out_ms: ms,
            zoom_in_ms: ms,
            simultaneous_zoom_ms: ms,
            ..default()
        }
    }
}

/// Curves used by transitions. Replace the resource to author different motion.
#[derive(Resource, Debug, Clone)]
pub struct TransitionCurves {
    pub position: TransitionCurve,
    pub rotation: TransitionCurve,
    pub scale:    TransitionCurve,
    /// Pivot glide used when a single-planet view is involved.
    pub extra_position:       TransitionCurve,
    pub fade_out:             TransitionCurve,
    pub poi_fade:             TransitionCurve,
    pub galaxy_opening:       TransitionCurve,
    pub solar_system_opening: TransitionCurve,
    pub planet_opening:       TransitionCurve,
}

impl Default for TransitionCurves {
    fn default() -> Self {
        Self {
            position:             EaseFunction::SmoothStep.into(),
            rotation:             EaseFunction::CubicInOut.into(),
            scale:                EaseFunction::ExponentialInOut.into(),
            extra_position:       EaseFunction::QuadraticInOut.into(),
            fade_out:             TransitionCurve::linear(),
            poi_fade:             EaseFunction::QuadraticOut.into(),
            galaxy_opening:       EaseFunction::SineIn.into(),
            solar_system_opening: EaseFunction::QuadraticIn.into(),
            planet_opening:       EaseFunction::CubicIn.into(),
        }
    }
}

impl TransitionCurves {
    /// Every curve linear.
    pub fn linear() -> Self {
        let linear = TransitionCurve::linear();
        Self {
            position:             linear.clone(),
            rotation:             linear.clone(),
            scale:                linear.clone(),
            extra_position:       linear.clone(),
            fade_out:             linear.clone(),
            poi_fade:             linear.clone(),
            galaxy_opening:       linear.clone(),
            solar_system_opening: linear.clone(),
            planet_opening:       linear,
        }
    }

    /// Opening fade-in curve for an incoming view.
    pub const fn opening(&self, kind: SceneKind) -> &TransitionCurve {
        match kind {
            SceneKind::Galaxy => &self.galaxy_opening,
            SceneKind::SolarSystem => &self.solar_system_opening,
            SceneKind::Planet => &self.planet_opening,
        }
    }

    pub fn zoom(&self, style: ZoomStyle) -> ZoomCurves<'_> {
        ZoomCurves {
            position:       &self.position,
            rotation:       &self.rotation,
            scale:          &self.scale,
            extra_position: (style == ZoomStyle::SimultaneousGlide).then_some(&self.extra_position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_out_duration_depends_on_kind() {
        let config = TransitionConfig::default();
        assert_eq!(config.fade_out_ms(SceneKind::Galaxy), config.galaxy_fade_out_ms);
        assert_eq!(config.fade_out_ms(SceneKind::Planet), config.planet_fade_out_ms);
    }

    #[test]
    fn only_glide_gets_extra_position_curve() {
        let curves = TransitionCurves::default();
        assert!(curves.zoom(ZoomStyle::Simultaneous).extra_position.is_none());
        assert!(curves.zoom(ZoomStyle::Split).extra_position.is_none());
        assert!(
            curves
                .zoom(ZoomStyle::SimultaneousGlide)
                .extra_position
                .is_some()
        );
    }
}
