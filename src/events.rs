//! Navigation requests and lifecycle events.

use bevy::prelude::*;

use crate::fade::FadeBatchId;
use crate::transition::NavigationDirection;
use crate::view_stack::ViewId;

// ============================================================================
// Requests
// ============================================================================

/// Navigate forward to `view`.
///
/// Rejected with a warning while another transition is in progress. Triggering
/// it for a view that was never registered with `ViewLoader` is an error.
#[derive(Event, Reflect, Debug, Clone)]
#[reflect(Event, FromReflect)]
pub struct LoadNextView {
    pub view:          ViewId,
    /// Push `view` onto the `ViewStack` so it can be returned to.
    pub keep_on_stack: bool,
}

impl LoadNextView {
    pub fn new(view: impl Into<ViewId>) -> Self {
        Self {
            view:          view.into(),
            keep_on_stack: true,
        }
    }

    pub const fn without_history(mut self) -> Self {
        self.keep_on_stack = false;
        self
    }
}

/// Navigate back to the view below the top of the `ViewStack`.
#[derive(Event, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Event, FromReflect)]
pub struct LoadPreviousView;

// ============================================================================
// View lifecycle
// ============================================================================

/// Fired once per load, after the view hierarchy exists.
#[derive(EntityEvent, Reflect, Debug, Clone)]
#[reflect(Event, FromReflect)]
pub struct ViewLoaded {
    #[event_target]
    pub root: Entity,
    pub view: ViewId,
}

/// Fired when an outgoing view is despawned.
#[derive(Event, Reflect, Debug, Clone)]
#[reflect(Event, FromReflect)]
pub struct ViewUnloaded {
    pub view: ViewId,
    pub root: Entity,
}

// ============================================================================
// Transition lifecycle
// ============================================================================

/// Fired when preparation of an episode is complete and the zoom starts.
#[derive(Event, Reflect, Debug, Clone)]
#[reflect(Event, FromReflect)]
pub struct TransitionBegin {
    pub from:      Option<ViewId>,
    pub to:        ViewId,
    pub direction: NavigationDirection,
}

#[derive(Event, Reflect, Debug, Clone)]
#[reflect(Event, FromReflect)]
pub struct ZoomOutEnd {
    pub view: Option<ViewId>,
}

#[derive(Event, Reflect, Debug, Clone)]
#[reflect(Event, FromReflect)]
pub struct ZoomInEnd {
    pub view: ViewId,
}

/// Fired when the episode is over and navigation is accepted again.
#[derive(Event, Reflect, Debug, Clone)]
#[reflect(Event, FromReflect)]
pub struct TransitionEnd {
    pub view:      ViewId,
    pub direction: NavigationDirection,
}

/// Fired once per fade batch, including batches that had no targets.
#[derive(Event, Reflect, Debug, Clone, Copy)]
#[reflect(Event, FromReflect)]
pub struct FadeEnd {
    pub batch: FadeBatchId,
}
