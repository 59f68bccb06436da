//! Navigable history of loaded views.

use std::collections::HashSet;
use std::fmt;

use bevy::prelude::*;

/// Identifier of a loadable content view ("galaxy", "solar_system", "earth", ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Reflect)]
pub struct ViewId(pub String);

impl ViewId {
    pub fn new(name: impl Into<String>) -> Self { Self(name.into()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for ViewId {
    fn from(name: &str) -> Self { Self(name.to_owned()) }
}

impl From<String> for ViewId {
    fn from(name: String) -> Self { Self(name) }
}

/// Last-in-first-out history of views.
///
/// The top entry is the view currently on display. Going back is only possible
/// while there is an entry below it, so `has_previous` requires a depth of two.
/// Views marked as intro views never enter the history.
#[derive(Resource, Debug, Default, Clone)]
pub struct ViewStack {
    views: Vec<ViewId>,
    intro: HashSet<ViewId>,
}

impl ViewStack {
    pub fn new() -> Self { Self::default() }

    /// Marks `view` as an intro view; pushes of it are ignored from now on.
    pub fn mark_intro(&mut self, view: impl Into<ViewId>) { self.intro.insert(view.into()); }

    pub fn is_intro(&self, view: &ViewId) -> bool { self.intro.contains(view) }

    /// Appends `view` unless it is an intro view. Returns whether it was pushed.
    pub fn push(&mut self, view: ViewId) -> bool {
        if self.intro.contains(&view) {
            debug!("ViewStack: intro view {view} kept out of history");
            return false;
        }
        self.views.push(view);
        true
    }

    pub fn pop(&mut self) -> Option<ViewId> { self.views.pop() }

    pub fn peek(&self) -> Option<&ViewId> { self.views.last() }

    /// The entry below the top, without popping.
    pub fn peek_previous(&self) -> Option<&ViewId> {
        self.views.len().checked_sub(2).and_then(|i| self.views.get(i))
    }

    pub fn has_previous(&self) -> bool { self.views.len() >= 2 }

    pub fn len(&self) -> usize { self.views.len() }

    pub fn is_empty(&self) -> bool { self.views.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &ViewId> { self.views.iter() }

    pub fn clear(&mut self) { self.views.clear(); }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(names: &[&str]) -> ViewStack {
        let mut stack = ViewStack::new();
        for name in names {
            stack.push(ViewId::from(*name));
        }
        stack
    }

    #[test]
    fn has_previous_requires_two_entries() {
        let mut stack = ViewStack::new();
        assert!(!stack.has_previous());
        stack.push("galaxy".into());
        assert!(!stack.has_previous());
        stack.push("solar_system".into());
        assert!(stack.has_previous());
        stack.pop();
        assert!(!stack.has_previous());
    }

    #[test]
    fn peek_previous_leaves_top_in_place() {
        let stack = stack_of(&["galaxy", "solar_system", "earth"]);
        assert_eq!(stack.peek_previous(), Some(&ViewId::from("solar_system")));
        assert_eq!(stack.peek(), Some(&ViewId::from("earth")));
        assert_eq!(stack.len(), 3);
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut stack = ViewStack::new();
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.peek_previous(), None);
    }

    #[test]
    fn intro_views_stay_out_of_history() {
        let mut stack = ViewStack::new();
        stack.mark_intro("intro");
        assert!(!stack.push("intro".into()));
        assert!(stack.push("galaxy".into()));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.peek(), Some(&ViewId::from("galaxy")));
    }

    #[test]
    fn pop_returns_entries_last_in_first_out() {
        let mut stack = stack_of(&["a", "b", "c"]);
        assert_eq!(stack.pop(), Some(ViewId::from("c")));
        assert_eq!(stack.pop(), Some(ViewId::from("b")));
        assert_eq!(stack.iter().count(), 1);
    }
}
