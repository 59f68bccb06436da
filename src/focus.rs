//! Focus geometry and the pivot math used to align two views.
//!
//! Every view carries one focus sphere. During a transition the outgoing view
//! is rotated and scaled around its focus while the incoming view grows out of
//! it, so both focus spheres must be expressed in comparable terms: a world
//! pose for the view root plus the focus pose relative to that root.

use bevy::prelude::*;

use crate::view_stack::ViewId;

/// Focus description of one view, captured at the start of a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusGeometry {
    /// World pose of the view root.
    pub root:             Transform,
    /// Pose of the focus relative to the view root.
    pub focus_local:      Transform,
    /// Radius of the focus sphere in the focus entity's local units.
    pub focus_radius:     f32,
    pub is_single_planet: bool,
}

impl FocusGeometry {
    /// Returns `None` unless `focus_radius` is finite and positive.
    pub fn new(
        root: Transform,
        focus_local: Transform,
        focus_radius: f32,
        is_single_planet: bool,
    ) -> Option<Self> {
        (focus_radius.is_finite() && focus_radius > 0.0).then_some(Self {
            root,
            focus_local,
            focus_radius,
            is_single_planet,
        })
    }

    /// World pose of the focus.
    pub fn focus_world(&self) -> Transform { self.root.mul_transform(self.focus_local) }

    /// World position of the focus centre.
    pub fn focus_center(&self) -> Vec3 { self.root.transform_point(self.focus_local.translation) }

    /// Radius in world units, using the largest axis of the accumulated scale.
    pub fn world_radius(&self) -> f32 { self.focus_radius * lossy_scale(self.focus_world().scale) }

    /// Offset from the focus centre to `world_point`, expressed in root-local units.
    pub fn world_to_local_delta(&self, world_point: Vec3) -> Vec3 {
        let delta = world_point - self.focus_center();
        (self.root.rotation.inverse() * delta) / self.root.scale
    }
}

/// `next radius / previous radius`, both in world units.
pub fn scalar_ratio(previous: &FocusGeometry, next: &FocusGeometry) -> f32 {
    next.world_radius() / previous.world_radius()
}

/// Largest absolute component of a scale.
pub fn lossy_scale(scale: Vec3) -> f32 { scale.abs().max_element() }

/// Composes local transforms walking down a parent chain.
///
/// `chain` is ordered from the outermost ancestor to the entity itself. The
/// rotation is accumulated explicitly link by link rather than read back from a
/// composed global matrix.
pub fn accumulate_chain(chain: impl IntoIterator<Item = Transform>) -> Transform {
    chain
        .into_iter()
        .fold(Transform::IDENTITY, |acc, local| acc.mul_transform(local))
}

/// Root translation that keeps `pivot_local` at `pivot_world` after the root
/// takes `rotation` and `scale`.
pub fn pivot_preserving_translation(
    pivot_local: Vec3,
    rotation: Quat,
    scale: Vec3,
    pivot_world: Vec3,
) -> Vec3 {
    // Move the pivot to the origin, apply rotation and scale, move it back.
    let compensated = -pivot_local;
    let transformed = rotation * (scale * compensated);
    pivot_world + transformed
}

/// Uniform scale of an incoming view so it fills the same display volume as
/// the outgoing one.
pub fn fit_to_display(
    outgoing_scale: f32,
    outgoing_content_scale: f32,
    incoming_content_scale: f32,
) -> f32 {
    if outgoing_content_scale.abs() <= f32::EPSILON {
        return outgoing_scale * incoming_content_scale;
    }
    outgoing_scale / outgoing_content_scale * incoming_content_scale
}

/// A `PlanetLink` found inside a view, with its geometry.
#[derive(Clone, Copy, Debug)]
pub struct LinkedFocus<'a> {
    pub view:     &'a ViewId,
    pub geometry: FocusGeometry,
}

/// Picks the focus a view should use for a transition against `other`.
///
/// When the other side is a single-planet view, the planet object in this view
/// that links to it becomes the focus. Otherwise, or when no such link exists,
/// the view's own focus collider is used.
pub fn resolve_effective_focus<'a>(
    own_focus: Option<FocusGeometry>,
    links: impl IntoIterator<Item = LinkedFocus<'a>>,
    other_view: &ViewId,
    other_is_single_planet: bool,
) -> Option<FocusGeometry> {
    if !other_is_single_planet {
        return own_focus;
    }
    match links.into_iter().find(|link| link.view == other_view) {
        Some(link) => Some(link.geometry),
        None => {
            warn!("No planet link to single-planet view {other_view}, using the view's own focus");
            own_focus
        },
    }
}
