// bevy_view_transition
// Choreographed transitions between content views:
// - View history with forward / back navigation
// - Zoom choreography aligning two views around a shared focus sphere
// - Batched opacity fades with lifecycle events
// - Input gating while a transition owns the view transforms

use bevy::prelude::*;

mod choreography;
mod components;
mod config;
mod curve;
mod error;
mod events;
mod fade;
mod focus;
mod interaction;
mod loader;
mod observers;
pub mod prelude;
mod support;
mod transition;
mod view_stack;
#[cfg(feature = "visualization")]
mod visualization;
mod zoom;

// Public API - Events
pub use events::FadeEnd;
pub use events::LoadNextView;
pub use events::LoadPreviousView;
pub use events::TransitionBegin;
pub use events::TransitionEnd;
pub use events::ViewLoaded;
pub use events::ViewUnloaded;
pub use events::ZoomInEnd;
pub use events::ZoomOutEnd;

// Public API - Components
pub use components::FocusCollider;
pub use components::Interactable;
pub use components::PlanetLink;
pub use components::Poi;
pub use components::RotationDriver;
pub use components::SceneKind;
pub use components::TransitionAlpha;
pub use components::ViewRoot;

// Public API - Resources
pub use config::TransitionConfig;
pub use config::TransitionCurves;
pub use fade::FadeController;
pub use loader::ViewLoader;
pub use transition::TransitionManager;
pub use view_stack::ViewStack;

// Public API - Core types
pub use curve::TransitionCurve;
pub use error::NavigationRejected;
pub use error::TransitionError;
pub use fade::FadeBatchId;
pub use fade::FadeCategory;
pub use fade::FadeKind;
pub use fade::FadeTarget;
pub use focus::FocusGeometry;
pub use interaction::InteractionStash;
pub use loader::ViewBlueprint;
pub use transition::Episode;
pub use transition::NavigationDirection;
pub use transition::TransitionPhase;
pub use transition::TransitionStep;
pub use transition::ViewSlot;
pub use view_stack::ViewId;
pub use zoom::ZoomChoreographer;
pub use zoom::ZoomCurves;
pub use zoom::ZoomPlan;
pub use zoom::ZoomStyle;

// Public API - Math helpers
pub use focus::fit_to_display;
pub use focus::pivot_preserving_translation;
pub use focus::resolve_effective_focus;
pub use focus::scalar_ratio;

// Public API - System params
pub use support::ViewScenes;

// Public API - Plugins and gizmo groups
#[cfg(feature = "visualization")]
pub use visualization::FocusGizmo;
#[cfg(feature = "visualization")]
pub use visualization::FocusGizmoConfig;
#[cfg(feature = "visualization")]
pub use visualization::FocusGizmoPlugin;

// Internal - used by plugin, not for external use
use choreography::drive_transition;
use fade::advance_fades;
#[cfg(feature = "materials")]
use fade::sync_material_alpha;
use interaction::spin_rotation_drivers;
use loader::load_requested_views;
use observers::{on_load_next_view, on_load_previous_view, on_view_loaded};

/// Plugin that adds view navigation and transition choreography
pub struct ViewTransitionPlugin;

impl Plugin for ViewTransitionPlugin {
    fn build(&self, app: &mut App) {
        app
            // Register observers for navigation and loading
            .add_observer(on_load_next_view)
            .add_observer(on_load_previous_view)
            .add_observer(on_view_loaded)
            // Add systems
            .add_systems(
                Update,
                (
                    load_requested_views,
                    drive_transition,
                    advance_fades,
                    spin_rotation_drivers,
                )
                    .chain(),
            )
            // Initialize resources
            .init_resource::<TransitionConfig>()
            .init_resource::<TransitionCurves>()
            .init_resource::<TransitionManager>()
            .init_resource::<FadeController>()
            .init_resource::<ViewLoader>()
            .init_resource::<ViewStack>();

        #[cfg(feature = "materials")]
        app.add_systems(Update, sync_material_alpha.after(advance_fades));
    }
}
