//! Convenient re-exports for common types

pub use crate::ViewTransitionPlugin;
pub use crate::components::FocusCollider;
pub use crate::components::Interactable;
pub use crate::components::PlanetLink;
pub use crate::components::Poi;
pub use crate::components::RotationDriver;
pub use crate::components::SceneKind;
pub use crate::components::TransitionAlpha;
pub use crate::components::ViewRoot;
pub use crate::config::TransitionConfig;
pub use crate::config::TransitionCurves;
pub use crate::curve::TransitionCurve;
pub use crate::events::LoadNextView;
pub use crate::events::LoadPreviousView;
pub use crate::events::TransitionBegin;
pub use crate::events::TransitionEnd;
pub use crate::events::ViewLoaded;
pub use crate::events::ViewUnloaded;
pub use crate::loader::ViewLoader;
pub use crate::transition::NavigationDirection;
pub use crate::transition::TransitionManager;
pub use crate::view_stack::ViewId;
pub use crate::view_stack::ViewStack;
#[cfg(feature = "visualization")]
pub use crate::visualization::FocusGizmo;
#[cfg(feature = "visualization")]
pub use crate::visualization::FocusGizmoPlugin;
