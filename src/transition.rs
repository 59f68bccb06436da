//! Navigation state machine.
//!
//! `TransitionManager` owns the phase of the current episode and the bookkeeping
//! around it. Observers move it from `Idle` to `AwaitingLoad` and on to
//! `Transitioning`; `drive_transition` walks the steps and returns it to `Idle`.

use bevy::prelude::*;

use crate::error::NavigationRejected;
use crate::fade::FadeBatchId;
use crate::interaction::InteractionStash;
use crate::view_stack::ViewId;
use crate::view_stack::ViewStack;
use crate::zoom::ZoomChoreographer;
use crate::zoom::ZoomStyle;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum NavigationDirection {
    #[default]
    Forward,
    Backward,
}

/// Where a running episode is in its sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionStep {
    /// Zoom-out has not finished yet.
    Zooming,
    /// Outgoing view is gone; waiting for the zoom-in.
    AwaitingZoomIn,
    /// Incoming POIs are fading in.
    RevealingPoi { batch: FadeBatchId },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TransitionPhase {
    #[default]
    Idle,
    AwaitingLoad {
        view: ViewId,
    },
    Transitioning(TransitionStep),
}

/// A loaded view taking part in an episode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewSlot {
    pub view: ViewId,
    pub root: Entity,
}

/// Per-episode data, created when the incoming view has loaded.
#[derive(Clone, Debug)]
pub struct Episode {
    pub outgoing: Option<ViewSlot>,
    pub incoming: ViewSlot,
    pub zoom:     ZoomChoreographer,
    pub style:    ZoomStyle,
    /// Incoming view and camera flags to put back as the episode ends.
    pub stash:    InteractionStash,
}

#[derive(Resource, Debug, Default)]
pub struct TransitionManager {
    phase:         TransitionPhase,
    direction:     NavigationDirection,
    previous_view: Option<ViewId>,
    current_view:  Option<ViewId>,
    current_root:  Option<Entity>,
    episode:       Option<Episode>,
}

impl TransitionManager {
    pub const fn phase(&self) -> &TransitionPhase { &self.phase }

    pub const fn direction(&self) -> NavigationDirection { self.direction }

    pub const fn previous_view(&self) -> Option<&ViewId> { self.previous_view.as_ref() }

    pub const fn current_view(&self) -> Option<&ViewId> { self.current_view.as_ref() }

    /// Root entity of the view currently on display.
    pub const fn current_root(&self) -> Option<Entity> { self.current_root }

    pub const fn is_idle(&self) -> bool { matches!(self.phase, TransitionPhase::Idle) }

    pub const fn is_transitioning(&self) -> bool {
        matches!(self.phase, TransitionPhase::Transitioning(_))
    }

    pub const fn episode(&self) -> Option<&Episode> { self.episode.as_ref() }

    pub const fn episode_mut(&mut self) -> Option<&mut Episode> { self.episode.as_mut() }

    /// Accepts a forward navigation to `view`.
    pub fn begin_next(
        &mut self,
        view: ViewId,
        keep_on_stack: bool,
        stack: &mut ViewStack,
    ) -> Result<(), NavigationRejected> {
        if !self.is_idle() {
            return Err(NavigationRejected::Busy);
        }
        self.previous_view = self.current_view.clone();
        if keep_on_stack {
            stack.push(view.clone());
        }
        self.direction = NavigationDirection::Forward;
        self.phase = TransitionPhase::AwaitingLoad { view };
        Ok(())
    }

    /// Accepts a backward navigation. Pops the stack and returns the view to load.
    pub fn begin_previous(&mut self, stack: &mut ViewStack) -> Result<ViewId, NavigationRejected> {
        if !self.is_idle() {
            return Err(NavigationRejected::Busy);
        }
        if !stack.has_previous() {
            return Err(NavigationRejected::NoPreviousView);
        }
        stack.pop();
        let view = stack.peek().cloned().ok_or(NavigationRejected::NoPreviousView)?;

        self.previous_view = self.current_view.clone();
        self.direction = NavigationDirection::Backward;
        self.phase = TransitionPhase::AwaitingLoad { view: view.clone() };
        Ok(view)
    }

    /// Moves from `AwaitingLoad` to `Transitioning` when `view` is the one being
    /// waited on. Returns `false` for loads that are not part of an episode.
    pub fn on_loaded(&mut self, view: &ViewId, root: Entity) -> bool {
        match &self.phase {
            TransitionPhase::AwaitingLoad { view: awaited } if awaited == view => {},
            _ => return false,
        }
        self.current_view = Some(view.clone());
        self.current_root = Some(root);
        self.phase = TransitionPhase::Transitioning(TransitionStep::Zooming);
        true
    }

    pub fn start_episode(&mut self, episode: Episode) { self.episode = Some(episode); }

    pub fn set_step(&mut self, step: TransitionStep) {
        if self.is_transitioning() {
            self.phase = TransitionPhase::Transitioning(step);
        }
    }

    /// Ends the episode and returns to `Idle`.
    pub fn finish(&mut self) -> Option<Episode> {
        self.phase = TransitionPhase::Idle;
        self.episode.take()
    }
}
