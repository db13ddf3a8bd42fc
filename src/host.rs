//! The capability contract a host toolkit provides to the builder
//!
//! The builder never solves anything. It asks the host for an item's
//! container, hands constraints over for activation, and reads back the
//! constraints a container currently owns when reconciling an update.

use crate::attribute::Orientation;
use crate::constraint::{ConstraintRef, Priority};
use crate::error::LayoutError;
use crate::types::ItemId;

pub trait LayoutHost {
    /// The item's superview-equivalent container, if it has one
    fn container_of(&self, item: ItemId) -> Option<ItemId>;

    /// Toggle the legacy "translate frame into constraints" behavior
    fn set_translates_frame(&mut self, item: ItemId, translates: bool);

    /// Make the constraint participate in layout
    fn activate(&mut self, constraint: &ConstraintRef) -> Result<(), LayoutError>;

    /// Stop the constraint from participating in layout
    fn deactivate(&mut self, constraint: &ConstraintRef);

    fn activate_all(&mut self, constraints: &[ConstraintRef]) -> Result<(), LayoutError> {
        for constraint in constraints {
            self.activate(constraint)?;
        }
        Ok(())
    }

    fn deactivate_all(&mut self, constraints: &[ConstraintRef]) {
        for constraint in constraints {
            self.deactivate(constraint);
        }
    }

    /// Active constraints owned by `container`, in the host's order
    fn current_constraints(&self, container: ItemId) -> Vec<ConstraintRef>;

    /// Change the constant of a constraint, which may already be active
    fn set_constant(&mut self, constraint: &ConstraintRef, constant: f64) -> Result<(), LayoutError> {
        constraint.set_constant(constant);
        Ok(())
    }

    fn set_compression_resistance(
        &mut self,
        item: ItemId,
        orientation: Orientation,
        priority: Priority,
    ) -> Result<(), LayoutError>;

    fn set_hugging_priority(
        &mut self,
        item: ItemId,
        orientation: Orientation,
        priority: Priority,
    ) -> Result<(), LayoutError>;
}
