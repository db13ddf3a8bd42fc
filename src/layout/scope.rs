//! Recording state: nested constraint groups, priority and identifier scopes
//!
//! The stacks live in a [`ScopeStack`] owned by the [`Layout`] context.
//! Every push hands back a guard that dereferences to the layout and pops
//! its entry when dropped, so an early `?` or a panic inside client code
//! leaves the stacks exactly as they were before the scope opened.

use std::ops::{Deref, DerefMut};

use tracing::{trace, warn};

use crate::constraint::{Constraint, ConstraintRef, Priority};
use crate::error::LayoutError;
use crate::host::LayoutHost;

use super::Layout;

/// Constraints captured by one recording scope, in creation order
#[derive(Debug, Default, Clone)]
pub struct ConstraintGroup {
    constraints: Vec<ConstraintRef>,
}

impl ConstraintGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `constraint` unless the group already holds it
    pub fn push(&mut self, constraint: ConstraintRef) {
        if !self.contains(&constraint) {
            self.constraints.push(constraint);
        }
    }

    pub fn extend(&mut self, constraints: impl IntoIterator<Item = ConstraintRef>) {
        for constraint in constraints {
            self.push(constraint);
        }
    }

    pub fn contains(&self, constraint: &ConstraintRef) -> bool {
        self.constraints
            .iter()
            .any(|held| ConstraintRef::ptr_eq(held, constraint))
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConstraintRef> {
        self.constraints.iter()
    }

    pub fn into_constraints(self) -> Vec<ConstraintRef> {
        self.constraints
    }
}

/// The batching state machine
///
/// Idle when every stack is empty; recording while the group stack is
/// non-empty. Constraints are deferred iff recording and not installing.
#[derive(Debug, Default)]
pub struct ScopeStack {
    groups: Vec<ConstraintGroup>,
    priorities: Vec<Priority>,
    identifiers: Vec<String>,
    installing: bool,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_group(&mut self) {
        self.groups.push(ConstraintGroup::new());
        trace!(depth = self.groups.len(), "recording scope opened");
    }

    pub fn end_group(&mut self) -> Result<ConstraintGroup, LayoutError> {
        let group = self.groups.pop().ok_or_else(|| {
            LayoutError::scope_misuse("end_group", "no recording scope is open")
        })?;
        trace!(
            depth = self.groups.len(),
            captured = group.len(),
            "recording scope closed"
        );
        Ok(group)
    }

    /// The innermost open group, the one new constraints are appended to
    pub fn current_group(&mut self) -> Option<&mut ConstraintGroup> {
        self.groups.last_mut()
    }

    /// Number of open recording scopes
    pub fn depth(&self) -> usize {
        self.groups.len()
    }

    pub fn push_priority(&mut self, priority: Priority) {
        self.priorities.push(priority);
    }

    pub fn pop_priority(&mut self) -> Result<Priority, LayoutError> {
        self.priorities
            .pop()
            .ok_or_else(|| LayoutError::scope_misuse("pop_priority", "no priority scope is open"))
    }

    /// Top of the priority stack, or required outside any priority scope
    pub fn current_priority(&self) -> Priority {
        self.priorities.last().copied().unwrap_or(Priority::REQUIRED)
    }

    pub fn in_priority_scope(&self) -> bool {
        !self.priorities.is_empty()
    }

    pub fn push_identifier(&mut self, identifier: impl Into<String>) {
        self.identifiers.push(identifier.into());
    }

    pub fn pop_identifier(&mut self) -> Result<String, LayoutError> {
        self.identifiers.pop().ok_or_else(|| {
            LayoutError::scope_misuse("pop_identifier", "no identifier scope is open")
        })
    }

    pub fn current_identifier(&self) -> Option<&str> {
        self.identifiers.last().map(String::as_str)
    }

    /// Stamp the active priority and identifier onto a constraint.
    ///
    /// Runs when the constraint reaches the installer, not when it is
    /// created, so the scopes open at install time win.
    pub fn apply_scope_state(&self, constraint: &Constraint) {
        if let Some(priority) = self.priorities.last() {
            constraint.set_priority(*priority);
        }
        if let Some(identifier) = self.identifiers.last() {
            constraint.identify(identifier.clone());
        }
    }

    pub fn should_defer(&self) -> bool {
        !self.groups.is_empty() && !self.installing
    }

    pub fn is_installing(&self) -> bool {
        self.installing
    }

    /// Returns the previous value so nested flushes can restore it
    pub(crate) fn set_installing(&mut self, installing: bool) -> bool {
        std::mem::replace(&mut self.installing, installing)
    }

    /// True when no scope of any kind is open
    pub fn is_idle(&self) -> bool {
        self.groups.is_empty()
            && self.priorities.is_empty()
            && self.identifiers.is_empty()
            && !self.installing
    }
}

/// An open recording scope. Dropping it without [`finish`](Self::finish)
/// discards whatever it captured.
pub struct RecordingScope<'a, H: LayoutHost> {
    layout: &'a mut Layout<H>,
    finished: bool,
}

impl<'a, H: LayoutHost> RecordingScope<'a, H> {
    pub(crate) fn open(layout: &'a mut Layout<H>) -> Self {
        layout.scope.begin_group();
        Self {
            layout,
            finished: false,
        }
    }

    /// Close the scope and take the captured constraints
    pub fn finish(mut self) -> Result<ConstraintGroup, LayoutError> {
        self.finished = true;
        self.layout.scope.end_group()
    }
}

impl<H: LayoutHost> Deref for RecordingScope<'_, H> {
    type Target = Layout<H>;

    fn deref(&self) -> &Layout<H> {
        self.layout
    }
}

impl<H: LayoutHost> DerefMut for RecordingScope<'_, H> {
    fn deref_mut(&mut self) -> &mut Layout<H> {
        self.layout
    }
}

impl<H: LayoutHost> Drop for RecordingScope<'_, H> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Ok(group) = self.layout.scope.end_group() {
            warn!(
                discarded = group.len(),
                "recording scope closed early; captured constraints were not installed"
            );
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ScopeKind {
    Priority,
    Identifier,
    Installing { previous: bool },
}

/// An open priority, identifier or installing scope
pub struct ScopeGuard<'a, H: LayoutHost> {
    layout: &'a mut Layout<H>,
    kind: ScopeKind,
}

impl<'a, H: LayoutHost> ScopeGuard<'a, H> {
    pub(crate) fn priority(layout: &'a mut Layout<H>, priority: Priority) -> Self {
        layout.scope.push_priority(priority);
        Self {
            layout,
            kind: ScopeKind::Priority,
        }
    }

    pub(crate) fn identifier(layout: &'a mut Layout<H>, identifier: String) -> Self {
        layout.scope.push_identifier(identifier);
        Self {
            layout,
            kind: ScopeKind::Identifier,
        }
    }

    pub(crate) fn installing(layout: &'a mut Layout<H>) -> Self {
        let previous = layout.scope.set_installing(true);
        Self {
            layout,
            kind: ScopeKind::Installing { previous },
        }
    }
}

impl<H: LayoutHost> Deref for ScopeGuard<'_, H> {
    type Target = Layout<H>;

    fn deref(&self) -> &Layout<H> {
        self.layout
    }
}

impl<H: LayoutHost> DerefMut for ScopeGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut Layout<H> {
        self.layout
    }
}

impl<H: LayoutHost> Drop for ScopeGuard<'_, H> {
    fn drop(&mut self) {
        let scope = &mut self.layout.scope;
        match self.kind {
            ScopeKind::Priority => {
                let _ = scope.pop_priority();
            }
            ScopeKind::Identifier => {
                let _ = scope.pop_identifier();
            }
            ScopeKind::Installing { previous } => {
                scope.set_installing(previous);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Attribute;
    use crate::constraint::{Anchor, Relation};
    use crate::types::ItemId;

    fn width(constant: f64) -> Constraint {
        Constraint::size(
            Anchor::new(ItemId(1), Attribute::Width),
            Relation::Equal,
            constant,
        )
    }

    #[test]
    fn test_idle_by_default() {
        let scope = ScopeStack::new();
        assert!(scope.is_idle());
        assert!(!scope.should_defer());
        assert_eq!(scope.current_priority(), Priority::REQUIRED);
        assert_eq!(scope.current_identifier(), None);
    }

    #[test]
    fn test_groups_nest() {
        let mut scope = ScopeStack::new();
        scope.begin_group();
        scope.begin_group();
        assert_eq!(scope.depth(), 2);
        assert!(scope.should_defer());

        scope.current_group().unwrap().push(std::rc::Rc::new(width(1.0)));
        assert_eq!(scope.end_group().unwrap().len(), 1);
        assert!(scope.end_group().unwrap().is_empty());
        assert!(scope.is_idle());
    }

    #[test]
    fn test_group_holds_each_constraint_once() {
        let mut group = ConstraintGroup::new();
        let c = std::rc::Rc::new(width(1.0));
        group.push(c.clone());
        group.extend([c.clone(), std::rc::Rc::new(width(1.0))]);
        assert_eq!(group.len(), 2);
        assert!(group.contains(&c));
    }

    #[test]
    fn test_end_group_without_begin() {
        let mut scope = ScopeStack::new();
        let err = scope.end_group().unwrap_err();
        assert!(matches!(err, LayoutError::ScopeMisuse { operation: "end_group", .. }));
    }

    #[test]
    fn test_installing_disables_deferral() {
        let mut scope = ScopeStack::new();
        scope.begin_group();
        let previous = scope.set_installing(true);
        assert!(!previous);
        assert!(!scope.should_defer());
        scope.set_installing(previous);
        assert!(scope.should_defer());
    }

    #[test]
    fn test_apply_scope_state_uses_top() {
        let mut scope = ScopeStack::new();
        scope.push_priority(Priority::DEFAULT_HIGH);
        scope.push_priority(Priority::DEFAULT_LOW);
        scope.push_identifier("outer");
        scope.push_identifier("inner");

        let c = width(10.0);
        scope.apply_scope_state(&c);
        assert_eq!(c.priority(), Priority::DEFAULT_LOW);
        assert_eq!(c.identifier().as_deref(), Some("inner"));
    }

    #[test]
    fn test_apply_scope_state_outside_scopes_keeps_fields() {
        let scope = ScopeStack::new();
        let c = width(10.0);
        c.set_priority(Priority::FITTING_SIZE).identify("mine");
        scope.apply_scope_state(&c);
        assert_eq!(c.priority(), Priority::FITTING_SIZE);
        assert_eq!(c.identifier().as_deref(), Some("mine"));
    }

    #[test]
    fn test_pop_empty_stacks() {
        let mut scope = ScopeStack::new();
        assert!(scope.pop_priority().is_err());
        assert!(scope.pop_identifier().is_err());
    }
}
