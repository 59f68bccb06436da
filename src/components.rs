//! Components describing view content for the transition system.

use bevy::prelude::*;

use crate::view_stack::ViewId;

/// Broad category of a view. Selects fade durations, opening curves and the
/// zoom style of a transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect)]
pub enum SceneKind {
    Galaxy,
    #[default]
    SolarSystem,
    /// A single planet shown in isolation.
    Planet,
}

/// Root entity of a loaded view. Inserted by the view loader.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct ViewRoot {
    pub view:          ViewId,
    pub kind:          SceneKind,
    /// Authored size of the content relative to the display volume.
    pub content_scale: f32,
}

impl ViewRoot {
    pub fn new(view: impl Into<ViewId>, kind: SceneKind) -> Self {
        Self {
            view: view.into(),
            kind,
            content_scale: 1.0,
        }
    }

    pub const fn with_content_scale(mut self, content_scale: f32) -> Self {
        self.content_scale = content_scale;
        self
    }

    pub fn is_single_planet(&self) -> bool { self.kind == SceneKind::Planet }
}

/// Sphere a view zooms, rotates and scales around during a transition.
/// The sphere is centred on the entity's origin; `radius` is in local units.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct FocusCollider {
    pub radius: f32,
}

/// An object inside a view that leads into a single-planet view, e.g. Earth
/// inside the solar system. Replaces the view's `FocusCollider` when the other
/// side of the transition is the linked single-planet view.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct PlanetLink {
    pub view:   ViewId,
    pub radius: f32,
}

/// Point of interest. Faded separately from the rest of the view.
#[derive(Component, Reflect, Debug, Default, Clone, Copy)]
#[reflect(Component)]
pub struct Poi;

/// Opacity driven by the fade controller. Applied to materials by
/// `sync_material_alpha` when the `materials` feature is enabled.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct TransitionAlpha(pub f32);

impl Default for TransitionAlpha {
    fn default() -> Self { Self(1.0) }
}

/// Pointer raycast gate. Pointer handling should ignore entities whose
/// `Interactable` is disabled.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub struct Interactable {
    pub enabled: bool,
}

impl Default for Interactable {
    fn default() -> Self { Self { enabled: true } }
}

/// Spins an entity around a local axis. Paused while a transition owns the
/// view's transforms.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct RotationDriver {
    pub axis:               Vec3,
    pub radians_per_second: f32,
    pub enabled:            bool,
}

impl RotationDriver {
    pub const fn new(axis: Vec3, radians_per_second: f32) -> Self {
        Self {
            axis,
            radians_per_second,
            enabled: true,
        }
    }
}
