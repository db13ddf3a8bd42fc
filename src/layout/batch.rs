//! Installing constraints: the defer-or-activate chokepoint and the
//! batching entry points built on it

use tracing::{debug, trace};

use crate::attribute::Axis;
use crate::constraint::{ConstraintRef, Priority};
use crate::error::LayoutError;
use crate::host::LayoutHost;
use crate::types::ItemId;

use super::array::ConstraintSliceExt;
use super::scope::{RecordingScope, ScopeGuard};
use super::Layout;

impl<H: LayoutHost> Layout<H> {
    /// Open a recording scope; constraints installed through the returned
    /// guard are captured instead of activated.
    pub fn begin_group(&mut self) -> RecordingScope<'_, H> {
        RecordingScope::open(self)
    }

    pub fn push_priority(&mut self, priority: Priority) -> ScopeGuard<'_, H> {
        ScopeGuard::priority(self, priority)
    }

    pub fn push_identifier(&mut self, identifier: impl Into<String>) -> ScopeGuard<'_, H> {
        ScopeGuard::identifier(self, identifier.into())
    }

    /// Stamp scope state onto `constraint`, then defer it into the current
    /// group or hand it to the host.
    pub fn install(&mut self, constraint: &ConstraintRef) -> Result<(), LayoutError> {
        self.scope.apply_scope_state(constraint);
        if self.scope.should_defer() {
            if let Some(group) = self.scope.current_group() {
                group.push(constraint.clone());
            }
            trace!(%constraint, "deferred");
            return Ok(());
        }
        self.activate(std::slice::from_ref(constraint))
    }

    /// Like [`install`](Self::install) for a batch: one `activate_all`
    /// call when not deferring.
    pub fn install_all(&mut self, constraints: &[ConstraintRef]) -> Result<(), LayoutError> {
        for constraint in constraints {
            self.scope.apply_scope_state(constraint);
        }
        if self.scope.should_defer() {
            if let Some(group) = self.scope.current_group() {
                group.extend(constraints.iter().cloned());
            }
            trace!(count = constraints.len(), "deferred batch");
            return Ok(());
        }
        self.activate(constraints)
    }

    /// Hand constraints that are not active yet to the host, each at most once
    fn activate(&mut self, constraints: &[ConstraintRef]) -> Result<(), LayoutError> {
        let mut pending: Vec<ConstraintRef> = Vec::with_capacity(constraints.len());
        for constraint in constraints.iter().filter(|c| !c.is_active()) {
            if !pending.iter().any(|p| ConstraintRef::ptr_eq(p, constraint)) {
                pending.push(constraint.clone());
            }
        }
        if pending.is_empty() {
            return Ok(());
        }
        self.host.activate_all(&pending)?;
        for constraint in &pending {
            constraint.set_active(true);
        }
        debug!(count = pending.len(), "activated constraints");
        Ok(())
    }

    /// Run `body` inside a recording scope and return what it created,
    /// without activating anything.
    pub fn record_without_installing<F>(&mut self, body: F) -> Result<Vec<ConstraintRef>, LayoutError>
    where
        F: FnOnce(&mut Self) -> Result<(), LayoutError>,
    {
        let mut recording = self.begin_group();
        body(&mut *recording)?;
        Ok(recording.finish()?.into_constraints())
    }

    /// Record `body`, then activate everything it created in one flush.
    ///
    /// The flush bypasses deferral even when this call is itself nested
    /// inside an outer recording scope.
    pub fn create_and_install<F>(&mut self, body: F) -> Result<Vec<ConstraintRef>, LayoutError>
    where
        F: FnOnce(&mut Self) -> Result<(), LayoutError>,
    {
        let created = self.record_without_installing(body)?;
        let mut installing = ScopeGuard::installing(self);
        installing.install_all(&created)?;
        debug!(count = created.len(), "batch installed");
        Ok(created)
    }

    /// Record `body`, stamp `identifier` on the result if given, and
    /// install it with the usual deferral rule.
    pub fn install_constraints<F>(
        &mut self,
        identifier: Option<&str>,
        body: F,
    ) -> Result<Vec<ConstraintRef>, LayoutError>
    where
        F: FnOnce(&mut Self) -> Result<(), LayoutError>,
    {
        let created = self.record_without_installing(body)?;
        if let Some(identifier) = identifier {
            created.identify_all(identifier);
        }
        self.install_all(&created)?;
        Ok(created)
    }

    /// Every constraint installed inside `body` gets `priority`
    pub fn with_priority<T>(&mut self, priority: Priority, body: impl FnOnce(&mut Self) -> T) -> T {
        let mut scope = self.push_priority(priority);
        body(&mut *scope)
    }

    /// Every constraint installed inside `body` gets `identifier`
    pub fn with_identifier<T>(
        &mut self,
        identifier: impl Into<String>,
        body: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let mut scope = self.push_identifier(identifier);
        body(&mut *scope)
    }

    /// Set the item's compression resistance along `axis` to the current
    /// scope priority. Only valid inside [`with_priority`](Self::with_priority).
    pub fn set_compression_resistance(&mut self, item: ItemId, axis: Axis) -> Result<(), LayoutError> {
        let priority = self.scoped_priority("set_compression_resistance")?;
        self.host.set_translates_frame(item, false);
        self.host
            .set_compression_resistance(item, axis.orientation(), priority)
    }

    /// Set the item's hugging priority along `axis` to the current scope
    /// priority. Only valid inside [`with_priority`](Self::with_priority).
    pub fn set_hugging_priority(&mut self, item: ItemId, axis: Axis) -> Result<(), LayoutError> {
        let priority = self.scoped_priority("set_hugging_priority")?;
        self.host.set_translates_frame(item, false);
        self.host
            .set_hugging_priority(item, axis.orientation(), priority)
    }

    fn scoped_priority(&self, operation: &'static str) -> Result<Priority, LayoutError> {
        if !self.scope.in_priority_scope() {
            return Err(LayoutError::scope_misuse(
                operation,
                "only valid inside a with_priority scope",
            ));
        }
        Ok(self.scope.current_priority())
    }
}
