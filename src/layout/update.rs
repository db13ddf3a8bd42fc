//! Updating a container's constraints in place
//!
//! Re-declaring a layout should not tear down and rebuild constraints that
//! only differ by their constant. The declarations are recorded, matched
//! against what the container already has, and only the leftovers are
//! installed.

use tracing::{debug, warn};

use crate::constraint::{structurally_equivalent, ConstraintRef};
use crate::error::LayoutError;
use crate::host::LayoutHost;
use crate::types::ItemId;

use super::array::ConstraintSliceExt;
use super::Layout;

/// What an update did to the container
#[derive(Debug, Default, Clone)]
pub struct UpdateOutcome {
    /// Existing constraints that received a new constant, in declaration order
    pub updated: Vec<ConstraintRef>,
    /// Declared constraints with no existing match, now installed
    pub installed: Vec<ConstraintRef>,
}

impl<H: LayoutHost> Layout<H> {
    /// Reconcile the constraints declared in `body` with the ones
    /// `container` already owns.
    ///
    /// A declaration that is structurally equivalent to an existing
    /// constraint only moves that constraint's constant; the first match in
    /// host order wins. Everything else is installed as new. If installing
    /// fails, every moved constant is put back before the error returns.
    pub fn update<F>(&mut self, container: ItemId, body: F) -> Result<UpdateOutcome, LayoutError>
    where
        F: FnOnce(&mut Self) -> Result<(), LayoutError>,
    {
        self.reconcile(container, None, body)
    }

    /// Like [`update`](Self::update), also stamping `identifier` onto both
    /// the updated and the newly installed constraints
    pub fn update_identified<F>(
        &mut self,
        container: ItemId,
        identifier: &str,
        body: F,
    ) -> Result<UpdateOutcome, LayoutError>
    where
        F: FnOnce(&mut Self) -> Result<(), LayoutError>,
    {
        self.reconcile(container, Some(identifier), body)
    }

    fn reconcile<F>(
        &mut self,
        container: ItemId,
        identifier: Option<&str>,
        body: F,
    ) -> Result<UpdateOutcome, LayoutError>
    where
        F: FnOnce(&mut Self) -> Result<(), LayoutError>,
    {
        let declared = self.record_without_installing(body)?;
        let existing = self.host.current_constraints(container);

        let mut outcome = UpdateOutcome::default();
        let mut previous = Vec::new();
        let mut keep = Vec::new();
        if let Err(e) = self.apply_matches(
            &existing,
            declared,
            identifier,
            &mut outcome,
            &mut previous,
            &mut keep,
        ) {
            self.restore(previous);
            return Err(e);
        }

        if let Some(identifier) = identifier {
            keep.identify_all(identifier);
        }
        if let Err(e) = self.install_all(&keep) {
            self.restore(previous);
            return Err(e);
        }
        outcome.installed = keep;

        debug!(
            %container,
            existing = existing.len(),
            updated = outcome.updated.len(),
            installed = outcome.installed.len(),
            "constraints updated"
        );
        Ok(outcome)
    }

    /// Move the constants of matched constraints, remembering what each
    /// one looked like before so a later failure can put it back
    fn apply_matches(
        &mut self,
        existing: &[ConstraintRef],
        declared: Vec<ConstraintRef>,
        identifier: Option<&str>,
        outcome: &mut UpdateOutcome,
        previous: &mut Vec<(ConstraintRef, f64, Option<String>)>,
        keep: &mut Vec<ConstraintRef>,
    ) -> Result<(), LayoutError> {
        for constraint in declared {
            let matched = existing
                .iter()
                .find(|candidate| structurally_equivalent(candidate, &constraint));
            match matched {
                Some(matched) => {
                    let before = (matched.clone(), matched.constant(), matched.identifier());
                    self.host.set_constant(matched, constraint.constant())?;
                    previous.push(before);
                    if let Some(identifier) = identifier {
                        matched.identify(identifier);
                    }
                    outcome.updated.push(matched.clone());
                }
                None => keep.push(constraint),
            }
        }
        Ok(())
    }

    /// Undo moved constants, latest first
    fn restore(&mut self, previous: Vec<(ConstraintRef, f64, Option<String>)>) {
        for (constraint, constant, identifier) in previous.into_iter().rev() {
            if let Err(e) = self.host.set_constant(&constraint, constant) {
                warn!(%constraint, "failed to restore constant: {}", e);
            }
            constraint.replace_identifier(identifier);
        }
    }
}
