//! Error types for view loading and navigation.

use thiserror::Error;

use crate::view_stack::ViewId;

/// Hard failures. Nothing downstream can proceed without the view's content.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("view '{0}' is not registered with the view loader")]
    UnknownView(ViewId),

    #[error("invalid transition curve: {0}")]
    InvalidCurve(String),
}

/// Reasons a navigation request is dropped. These are logged, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationRejected {
    #[error("a transition is already in progress")]
    Busy,

    #[error("there is no previous view to return to")]
    NoPreviousView,
}
