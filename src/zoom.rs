//! Zoom choreography between two overlapping views.
//!
//! The outgoing view rotates and scales around its focus while the incoming view
//! starts aligned to that focus and grows back to its rest pose. Everything is
//! captured once in `ZoomChoreographer::init`; the step functions then only
//! sample curves and write root transforms.
//!
//! View roots are expected to be top-level entities, so their `Transform` is also
//! their world pose.

use bevy::prelude::*;

use crate::components::SceneKind;
use crate::curve::TransitionCurve;
use crate::focus::FocusGeometry;
use crate::focus::pivot_preserving_translation;

/// How the two halves of a zoom are scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum ZoomStyle {
    /// Zoom-out runs to completion, then zoom-in.
    Split,
    /// Both views animate together around a fixed pivot.
    Simultaneous,
    /// Both views animate together and the pivot glides to the incoming focus.
    SimultaneousGlide,
}

impl ZoomStyle {
    pub fn select(previous: Option<SceneKind>, next: SceneKind) -> Self {
        let involves = |kind| previous == Some(kind) || next == kind;
        if involves(SceneKind::Galaxy) {
            Self::Split
        } else if involves(SceneKind::Planet) {
            Self::SimultaneousGlide
        } else {
            Self::Simultaneous
        }
    }
}

/// Curves sampled by the zoom steps.
#[derive(Clone, Copy, Debug)]
pub struct ZoomCurves<'a> {
    pub position:       &'a TransitionCurve,
    pub rotation:       &'a TransitionCurve,
    pub scale:          &'a TransitionCurve,
    /// Drives the pivot glide of `step_simultaneous`. `None` keeps the pivot fixed.
    pub extra_position: Option<&'a TransitionCurve>,
}

/// Everything derived from the two focus geometries at the start of a zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomPlan {
    /// `next world radius / previous world radius`.
    pub scalar:            f32,
    pub prev_start:        Transform,
    pub prev_end_rotation: Quat,
    /// Previous focus centre in previous-root local units.
    pub prev_pivot_local:  Vec3,
    /// Previous focus centre in world space at the start.
    pub pivot_world:       Vec3,
    /// Next focus centre in next-root local units.
    pub next_pivot_local:  Vec3,
    /// Next focus centre in world space once the next view is at rest.
    pub next_pivot_rest:   Vec3,
    pub next_start:        Transform,
    pub next_rest:         Transform,
}

impl ZoomPlan {
    pub fn new(next: &FocusGeometry, previous: &FocusGeometry) -> Self {
        let scalar = next.world_radius() / previous.world_radius();

        let prev_focus_rotation = previous.focus_world().rotation;
        let next_focus_rest_rotation = next.focus_world().rotation;

        let prev_end_rotation =
            (next_focus_rest_rotation * previous.focus_local.rotation.inverse()).normalize();
        let next_start_rotation =
            (prev_focus_rotation * next.focus_local.rotation.inverse()).normalize();
        let next_start_scale = next.root.scale / scalar;

        let pivot_world = previous.focus_center();
        let next_pivot_local = next.focus_local.translation;
        let next_start = Transform {
            translation: pivot_preserving_translation(
                next_pivot_local,
                next_start_rotation,
                next_start_scale,
                pivot_world,
            ),
            rotation:    next_start_rotation,
            scale:       next_start_scale,
        };

        Self {
            scalar,
            prev_start: previous.root,
            prev_end_rotation,
            prev_pivot_local: previous.focus_local.translation,
            pivot_world,
            next_pivot_local,
            next_pivot_rest: next.focus_center(),
            next_start,
            next_rest: next.root,
        }
    }

    fn prev_pose(&self, rotation_t: f32, scale_t: f32, pivot: Vec3) -> Transform {
        let rotation = self.prev_start.rotation.slerp(self.prev_end_rotation, rotation_t);
        let scale = self.prev_start.scale * (1.0 + (self.scalar - 1.0) * scale_t);
        Transform {
            translation: pivot_preserving_translation(self.prev_pivot_local, rotation, scale, pivot),
            rotation,
            scale,
        }
    }

    fn next_rotation_scale(&self, rotation_t: f32, scale_t: f32) -> (Quat, Vec3) {
        let rotation = self.next_start.rotation.slerp(self.next_rest.rotation, rotation_t);
        let scale = self.next_start.scale.lerp(self.next_rest.scale, scale_t);
        (rotation, scale)
    }
}

/// Drives the root transforms of the outgoing and incoming views.
#[derive(Clone, Debug, Default)]
pub struct ZoomChoreographer {
    plan:          Option<ZoomPlan>,
    out_elapsed:   f32,
    in_elapsed:    f32,
    zoom_out_done: bool,
    zoom_in_done:  bool,
}

impl ZoomChoreographer {
    /// Captures the plan. With either geometry missing there is nothing to
    /// animate and both halves are done right away.
    pub fn init(next: Option<&FocusGeometry>, previous: Option<&FocusGeometry>) -> Self {
        match (next, previous) {
            (Some(next), Some(previous)) => {
                let plan = ZoomPlan::new(next, previous);
                debug!(
                    "Zoom plan: scalar {:.4}, pivot {:?}",
                    plan.scalar, plan.pivot_world
                );
                Self {
                    plan: Some(plan),
                    ..default()
                }
            },
            _ => {
                debug!("Zoom skipped: missing focus geometry");
                Self {
                    zoom_out_done: true,
                    zoom_in_done: true,
                    ..default()
                }
            },
        }
    }

    pub const fn plan(&self) -> Option<&ZoomPlan> { self.plan.as_ref() }

    pub const fn zoom_out_done(&self) -> bool { self.zoom_out_done }

    pub const fn zoom_in_done(&self) -> bool { self.zoom_in_done }

    pub const fn is_done(&self) -> bool { self.zoom_out_done && self.zoom_in_done }

    /// Rotates and scales the outgoing root around its focus.
    pub fn step_zoom_out(
        &mut self,
        dt_ms: f32,
        duration_ms: f32,
        rotation: &TransitionCurve,
        scale: &TransitionCurve,
        prev_root: Option<&mut Transform>,
    ) {
        if self.zoom_out_done {
            return;
        }
        let (Some(plan), Some(prev_root)) = (self.plan.as_ref(), prev_root) else {
            self.zoom_out_done = true;
            return;
        };

        self.out_elapsed = advance(self.out_elapsed, dt_ms, duration_ms);
        *prev_root = plan.prev_pose(
            rotation.evaluate(self.out_elapsed),
            scale.evaluate(self.out_elapsed),
            plan.pivot_world,
        );

        if self.out_elapsed >= 1.0 {
            self.zoom_out_done = true;
        }
    }

    /// Rotates, scales and moves the incoming root from its aligned start pose
    /// to its rest pose.
    pub fn step_zoom_in(
        &mut self,
        dt_ms: f32,
        duration_ms: f32,
        curves: ZoomCurves,
        next_root: Option<&mut Transform>,
    ) {
        if self.zoom_in_done {
            return;
        }
        let (Some(plan), Some(next_root)) = (self.plan.as_ref(), next_root) else {
            self.zoom_in_done = true;
            return;
        };

        self.in_elapsed = advance(self.in_elapsed, dt_ms, duration_ms);
        let t = self.in_elapsed;
        let (rotation, scale) =
            plan.next_rotation_scale(curves.rotation.evaluate(t), curves.scale.evaluate(t));
        *next_root = Transform {
            translation: plan
                .next_start
                .translation
                .lerp(plan.next_rest.translation, curves.position.evaluate(t)),
            rotation,
            scale,
        };

        if t >= 1.0 {
            self.zoom_in_done = true;
        }
    }

    /// Animates both roots in one tick loop, each pinned to a shared pivot.
    ///
    /// The outgoing focus stays on the pivot. The incoming focus moves from the
    /// pivot to its rest position along `curves.position`. With
    /// `curves.extra_position` the pivot itself glides toward the incoming rest
    /// focus.
    pub fn step_simultaneous(
        &mut self,
        dt_ms: f32,
        duration_ms: f32,
        curves: ZoomCurves,
        prev_root: Option<&mut Transform>,
        next_root: Option<&mut Transform>,
    ) {
        if self.is_done() {
            return;
        }
        let Some(plan) = self.plan.as_ref() else {
            self.zoom_out_done = true;
            self.zoom_in_done = true;
            return;
        };

        self.out_elapsed = advance(self.out_elapsed, dt_ms, duration_ms);
        self.in_elapsed = self.out_elapsed;
        let t = self.out_elapsed;
        let rotation_t = curves.rotation.evaluate(t);
        let scale_t = curves.scale.evaluate(t);
        let glide = curves.extra_position.map_or(0.0, |curve| curve.evaluate(t));
        let pivot = plan.pivot_world.lerp(plan.next_pivot_rest, glide);

        match prev_root {
            Some(prev_root) => *prev_root = plan.prev_pose(rotation_t, scale_t, pivot),
            None => self.zoom_out_done = true,
        }

        match next_root {
            Some(next_root) => {
                let (rotation, scale) = plan.next_rotation_scale(rotation_t, scale_t);
                let focus = pivot.lerp(plan.next_pivot_rest, curves.position.evaluate(t));
                *next_root = Transform {
                    translation: pivot_preserving_translation(
                        plan.next_pivot_local,
                        rotation,
                        scale,
                        focus,
                    ),
                    rotation,
                    scale,
                };
            },
            None => self.zoom_in_done = true,
        }

        if t >= 1.0 {
            self.zoom_out_done = true;
            self.zoom_in_done = true;
        }
    }
}

fn advance(elapsed: f32, dt_ms: f32, duration_ms: f32) -> f32 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (elapsed + dt_ms / duration_ms).min(1.0)
}
