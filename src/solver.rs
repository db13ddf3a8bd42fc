//! Constraint solver integration
//!
//! This module wraps the kasuari Cassowary solver: it translates
//! [`Constraint`] records into the solver's format, keeps track of which
//! solver constraint backs which record so they can be removed or
//! re-seated, and extracts solved frames.

use std::collections::HashMap;

use kasuari::{
    Expression, Solver as KasuariSolver, Strength, Variable as KasuariVariable,
    WeightedRelation::{self, *},
};
use thiserror::Error;
use tracing::trace;

use crate::attribute::{Attribute, Orientation};
use crate::constraint::{Constraint, ConstraintRef, Priority, Relation};
use crate::types::{Frame, Insets, ItemId, LayoutDirection};

/// Base properties every item gets a solver variable for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutProperty {
    X,
    Y,
    Width,
    Height,
}

/// A variable in the constraint system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutVariable {
    pub item: ItemId,
    pub property: LayoutProperty,
}

impl LayoutVariable {
    pub fn new(item: ItemId, property: LayoutProperty) -> Self {
        Self { item, property }
    }
}

/// Errors from the constraint solver
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("unsatisfiable constraint {constraint}: {reason}")]
    Unsatisfiable { constraint: String, reason: String },

    #[error("items {first} and {second} have no common ancestor")]
    NoCommonAncestor { first: ItemId, second: ItemId },

    #[error("unknown item {item}")]
    UnknownItem { item: ItemId },

    #[error("internal solver error: {0}")]
    Internal(String),
}

/// Solver constraints that do not correspond to a user constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InternalKey {
    /// Fixed frame of a root item
    Frame(ItemId),
    /// Intrinsic content size along one orientation
    Intrinsic(ItemId, Orientation),
}

/// Map a layout priority onto the solver's strength buckets
pub fn strength_for(priority: Priority) -> Strength {
    if priority.is_required() {
        Strength::REQUIRED
    } else if priority >= Priority::DEFAULT_HIGH {
        Strength::STRONG
    } else if priority >= Priority::DEFAULT_LOW {
        Strength::MEDIUM
    } else {
        Strength::WEAK
    }
}

/// Wrapper around the kasuari solver
pub struct ConstraintSolver {
    solver: KasuariSolver,
    direction: LayoutDirection,
    /// Maps our variables to kasuari variables
    variables: HashMap<LayoutVariable, KasuariVariable>,
    /// Installed user constraints and the solver constraint backing each
    installed: Vec<(ConstraintRef, kasuari::Constraint)>,
    internal: HashMap<InternalKey, Vec<kasuari::Constraint>>,
    /// Last known value of every variable; kasuari only reports changes
    values: HashMap<LayoutVariable, f64>,
}

impl std::fmt::Debug for ConstraintSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintSolver")
            .field("direction", &self.direction)
            .field("variables", &self.variables)
            .field("installed", &self.installed)
            .field("internal", &self.internal)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

fn is_directional(attribute: Attribute) -> bool {
    matches!(
        attribute,
        Attribute::Leading
            | Attribute::Trailing
            | Attribute::LeadingMargin
            | Attribute::TrailingMargin
    )
}

impl ConstraintSolver {
    pub fn new(direction: LayoutDirection) -> Self {
        Self {
            solver: KasuariSolver::new(),
            direction,
            variables: HashMap::new(),
            installed: Vec::new(),
            internal: HashMap::new(),
            values: HashMap::new(),
        }
    }

    fn var(&mut self, item: ItemId, property: LayoutProperty) -> KasuariVariable {
        *self
            .variables
            .entry(LayoutVariable::new(item, property))
            .or_insert_with(KasuariVariable::new)
    }

    /// Build the solver expression for one attribute of an item
    fn expression(&mut self, item: ItemId, attribute: Attribute, margins: Insets) -> Expression {
        let x = self.var(item, LayoutProperty::X);
        let y = self.var(item, LayoutProperty::Y);
        let width = self.var(item, LayoutProperty::Width);
        let height = self.var(item, LayoutProperty::Height);
        let rtl = self.direction == LayoutDirection::RightToLeft;

        match attribute {
            Attribute::Left => x.into(),
            Attribute::Right => x + width,
            Attribute::Top => y.into(),
            Attribute::Bottom | Attribute::Baseline | Attribute::LastBaseline => y + height,
            // no font metrics here: the first baseline sits on the top edge
            Attribute::FirstBaseline => y.into(),
            Attribute::Leading if rtl => x + width,
            Attribute::Leading => x.into(),
            Attribute::Trailing if rtl => x.into(),
            Attribute::Trailing => x + width,
            Attribute::Width => width.into(),
            Attribute::Height => height.into(),
            Attribute::CenterX => x + width * 0.5,
            Attribute::CenterY => y + height * 0.5,
            Attribute::LeftMargin => Expression::from(x) + margins.left,
            Attribute::RightMargin => (x + width) - margins.right,
            Attribute::TopMargin => Expression::from(y) + margins.top,
            Attribute::BottomMargin => (y + height) - margins.bottom,
            Attribute::LeadingMargin if rtl => (x + width) - margins.right,
            Attribute::LeadingMargin => Expression::from(x) + margins.left,
            Attribute::TrailingMargin if rtl => Expression::from(x) + margins.left,
            Attribute::TrailingMargin => (x + width) - margins.right,
            Attribute::CenterXWithinMargins => {
                (x + width * 0.5) + (margins.left - margins.right) * 0.5
            }
            Attribute::CenterYWithinMargins => {
                (y + height * 0.5) + (margins.top - margins.bottom) * 0.5
            }
        }
    }

    /// Translate a record into a kasuari constraint
    fn translate(
        &mut self,
        constraint: &Constraint,
        constant: f64,
        margins: &dyn Fn(ItemId) -> Insets,
    ) -> kasuari::Constraint {
        let first = constraint.first();
        let mut lhs = self.expression(first.item, first.attribute, margins(first.item));
        // leading/trailing offsets run right-to-left: mirror both sides
        let sign = if self.direction == LayoutDirection::RightToLeft && is_directional(first.attribute) {
            -1.0
        } else {
            1.0
        };
        lhs = lhs * sign;
        let strength = strength_for(constraint.priority());
        let relation: WeightedRelation = match constraint.relation() {
            Relation::Equal => EQ(strength),
            Relation::LessOrEqual => LE(strength),
            Relation::GreaterOrEqual => GE(strength),
        };

        match constraint.second() {
            Some(second) => {
                let rhs = self.expression(second.item, second.attribute, margins(second.item)) * sign;
                lhs | relation | constraint.multiplier() * rhs + constant
            }
            None => lhs | relation | constant,
        }
    }

    /// Convert a kasuari error to a SolverError with context
    fn convert_kasuari_error(e: kasuari::AddConstraintError, constraint: &Constraint) -> SolverError {
        match e {
            kasuari::AddConstraintError::UnsatisfiableConstraint => SolverError::Unsatisfiable {
                constraint: constraint.to_string(),
                reason: "conflicts with existing required constraints".to_string(),
            },
            kasuari::AddConstraintError::DuplicateConstraint => {
                SolverError::Internal(format!("duplicate constraint: {}", constraint))
            }
            kasuari::AddConstraintError::InternalSolverError(msg) => {
                SolverError::Internal(format!("{} while adding {}", msg, constraint))
            }
        }
    }

    /// Add a user constraint to the solver
    pub fn add_constraint(
        &mut self,
        constraint: &ConstraintRef,
        margins: &dyn Fn(ItemId) -> Insets,
    ) -> Result<(), SolverError> {
        let translated = self.translate(constraint, constraint.constant(), margins);
        self.solver
            .add_constraint(translated.clone())
            .map_err(|e| Self::convert_kasuari_error(e, constraint))?;
        trace!(%constraint, "added to solver");
        self.installed.push((constraint.clone(), translated));
        Ok(())
    }

    /// Remove a user constraint from the solver
    pub fn remove_constraint(&mut self, constraint: &ConstraintRef) -> Result<(), SolverError> {
        let position = self
            .installed
            .iter()
            .position(|(installed, _)| ConstraintRef::ptr_eq(installed, constraint))
            .ok_or_else(|| SolverError::Internal(format!("{} is not installed", constraint)))?;
        let (_, translated) = self.installed.remove(position);
        self.solver
            .remove_constraint(&translated)
            .map_err(|e| SolverError::Internal(format!("failed to remove {}: {:?}", constraint, e)))?;
        trace!(%constraint, "removed from solver");
        Ok(())
    }

    /// Re-seat an installed constraint with a new constant.
    ///
    /// kasuari constraints are immutable, so the old one is swapped for a
    /// new one. On failure the old constant stays in effect.
    pub fn replace_constant(
        &mut self,
        constraint: &ConstraintRef,
        constant: f64,
        margins: &dyn Fn(ItemId) -> Insets,
    ) -> Result<(), SolverError> {
        let Some(position) = self
            .installed
            .iter()
            .position(|(installed, _)| ConstraintRef::ptr_eq(installed, constraint))
        else {
            constraint.set_constant(constant);
            return Ok(());
        };

        let old = self.installed[position].1.clone();
        self.solver
            .remove_constraint(&old)
            .map_err(|e| SolverError::Internal(format!("failed to remove {}: {:?}", constraint, e)))?;

        let replacement = self.translate(constraint, constant, margins);
        match self.solver.add_constraint(replacement.clone()) {
            Ok(()) => {
                constraint.set_constant(constant);
                self.installed[position].1 = replacement;
                Ok(())
            }
            Err(e) => {
                let error = Self::convert_kasuari_error(e, constraint);
                self.solver.add_constraint(old).map_err(|e| {
                    SolverError::Internal(format!("failed to restore {}: {:?}", constraint, e))
                })?;
                Err(error)
            }
        }
    }

    /// Replace the internal constraints stored under `key`
    fn set_internal(
        &mut self,
        key: InternalKey,
        constraints: Vec<kasuari::Constraint>,
    ) -> Result<(), SolverError> {
        if let Some(previous) = self.internal.remove(&key) {
            for constraint in &previous {
                self.solver.remove_constraint(constraint).map_err(|e| {
                    SolverError::Internal(format!("failed to remove {:?} constraint: {:?}", key, e))
                })?;
            }
        }
        for constraint in &constraints {
            self.solver
                .add_constraint(constraint.clone())
                .map_err(|e| SolverError::Internal(format!("{:?}: {:?}", key, e)))?;
        }
        self.internal.insert(key, constraints);
        Ok(())
    }

    /// Pin an item to a fixed frame with required strength
    pub fn fix_frame(&mut self, item: ItemId, frame: Frame) -> Result<(), SolverError> {
        let x = self.var(item, LayoutProperty::X);
        let y = self.var(item, LayoutProperty::Y);
        let width = self.var(item, LayoutProperty::Width);
        let height = self.var(item, LayoutProperty::Height);
        self.set_internal(
            InternalKey::Frame(item),
            vec![
                x | EQ(Strength::REQUIRED) | frame.x,
                y | EQ(Strength::REQUIRED) | frame.y,
                width | EQ(Strength::REQUIRED) | frame.width,
                height | EQ(Strength::REQUIRED) | frame.height,
            ],
        )
    }

    /// Intrinsic content size along one orientation: the item resists
    /// shrinking below `extent` at `compression` and growing past it at
    /// `hugging`.
    pub fn set_intrinsic(
        &mut self,
        item: ItemId,
        orientation: Orientation,
        extent: f64,
        compression: Priority,
        hugging: Priority,
    ) -> Result<(), SolverError> {
        let property = match orientation {
            Orientation::Horizontal => LayoutProperty::Width,
            Orientation::Vertical => LayoutProperty::Height,
        };
        let var = self.var(item, property);
        self.set_internal(
            InternalKey::Intrinsic(item, orientation),
            vec![
                var | GE(strength_for(compression)) | extent,
                var | LE(strength_for(hugging)) | extent,
            ],
        )
    }

    pub fn installed_count(&self) -> usize {
        self.installed.len()
    }

    /// Pull pending changes out of kasuari and return the solved frame
    pub fn frame(&mut self, item: ItemId) -> Frame {
        self.refresh();
        let value = |property| {
            self.values
                .get(&LayoutVariable::new(item, property))
                .copied()
                .unwrap_or(0.0)
        };
        Frame::new(
            value(LayoutProperty::X),
            value(LayoutProperty::Y),
            value(LayoutProperty::Width),
            value(LayoutProperty::Height),
        )
    }

    fn refresh(&mut self) {
        let changes = self.solver.fetch_changes();
        for (kvar, value) in changes {
            // Find our variable for this kasuari variable
            for (our_var, &k) in &self.variables {
                if k == *kvar {
                    self.values.insert(*our_var, *value);
                    break;
                }
            }
        }
    }
}
