//! The constraint record and its structural comparison

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde::Deserialize;

use crate::attribute::Attribute;
use crate::types::{trim_float, ItemId};

/// A constraint shared between the builder, pending groups and the host.
///
/// Identity matters: the reconciler updates existing constraints in place,
/// and `Rc::ptr_eq` is how callers observe that.
pub type ConstraintRef = Rc<Constraint>;

/// Relation between the two sides of a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    #[default]
    Equal,
    LessOrEqual,
    GreaterOrEqual,
}

impl Relation {
    /// Swap the inequalities, keep equality
    pub fn flipped(&self) -> Relation {
        match self {
            Relation::Equal => Relation::Equal,
            Relation::LessOrEqual => Relation::GreaterOrEqual,
            Relation::GreaterOrEqual => Relation::LessOrEqual,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Relation::Equal => "==",
            Relation::LessOrEqual => "<=",
            Relation::GreaterOrEqual => ">=",
        }
    }
}

/// Layout priority in `1..=1000`; 1000 means required
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize)]
#[serde(from = "f32")]
pub struct Priority(f32);

impl Priority {
    pub const REQUIRED: Priority = Priority(1000.0);
    pub const DEFAULT_HIGH: Priority = Priority(750.0);
    pub const DRAG_THAT_CAN_RESIZE_WINDOW: Priority = Priority(510.0);
    pub const WINDOW_SIZE_STAY_PUT: Priority = Priority(500.0);
    pub const DRAG_THAT_CANNOT_RESIZE_WINDOW: Priority = Priority(490.0);
    pub const DEFAULT_LOW: Priority = Priority(250.0);
    pub const FITTING_SIZE: Priority = Priority(50.0);

    /// Create a priority, clamped into the valid range
    pub fn new(value: f32) -> Self {
        Priority(value.clamp(1.0, 1000.0))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    pub fn is_required(&self) -> bool {
        *self == Priority::REQUIRED
    }

    /// Human-readable name for the well-known levels
    pub fn label(&self) -> Option<&'static str> {
        match self.0 {
            v if v == 1000.0 => Some("required"),
            v if v == 750.0 => Some("high"),
            v if v == 510.0 => Some("drag can resize window"),
            v if v == 500.0 => Some("window size stay put"),
            v if v == 490.0 => Some("drag cannot resize window"),
            v if v == 250.0 => Some("low"),
            v if v == 50.0 => Some("fitting size"),
            _ => None,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::REQUIRED
    }
}

impl From<f32> for Priority {
    fn from(value: f32) -> Self {
        Priority::new(value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) => f.write_str(label),
            None => write!(f, "{}", self.0),
        }
    }
}

/// One side of a constraint: an item and one of its attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    pub item: ItemId,
    pub attribute: Attribute,
}

impl Anchor {
    pub fn new(item: ItemId, attribute: Attribute) -> Self {
        Self { item, attribute }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.item, self.attribute)
    }
}

/// `first <relation> multiplier * second + constant`
///
/// Endpoints, relation and multiplier are fixed at creation. Constant,
/// priority, identifier and the active flag change afterwards.
#[derive(Debug)]
pub struct Constraint {
    first: Anchor,
    relation: Relation,
    second: Option<Anchor>,
    multiplier: f64,
    constant: Cell<f64>,
    priority: Cell<Priority>,
    identifier: RefCell<Option<String>>,
    active: Cell<bool>,
}

impl Constraint {
    pub fn new(
        first: Anchor,
        relation: Relation,
        second: Option<Anchor>,
        multiplier: f64,
        constant: f64,
    ) -> Self {
        Self {
            first,
            relation,
            second,
            multiplier,
            constant: Cell::new(constant),
            priority: Cell::new(Priority::REQUIRED),
            identifier: RefCell::new(None),
            active: Cell::new(false),
        }
    }

    /// Constant-size constraint: no second endpoint, multiplier 0
    pub fn size(first: Anchor, relation: Relation, constant: f64) -> Self {
        Self::new(first, relation, None, 0.0, constant)
    }

    pub fn first(&self) -> Anchor {
        self.first
    }

    pub fn second(&self) -> Option<Anchor> {
        self.second
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn constant(&self) -> f64 {
        self.constant.get()
    }

    /// Writes the field only. Installed constraints should go through
    /// `LayoutHost::set_constant` so the solver sees the change.
    pub fn set_constant(&self, constant: f64) {
        self.constant.set(constant);
    }

    pub fn priority(&self) -> Priority {
        self.priority.get()
    }

    pub fn set_priority(&self, priority: Priority) -> &Self {
        self.priority.set(priority);
        self
    }

    pub fn identifier(&self) -> Option<String> {
        self.identifier.borrow().clone()
    }

    pub fn identify(&self, identifier: impl Into<String>) -> &Self {
        *self.identifier.borrow_mut() = Some(identifier.into());
        self
    }

    pub(crate) fn replace_identifier(&self, identifier: Option<String>) {
        *self.identifier.borrow_mut() = identifier;
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub(crate) fn set_active(&self, active: bool) {
        self.active.set(active);
    }

    /// Items this constraint relates
    pub fn items(&self) -> impl Iterator<Item = ItemId> + '_ {
        std::iter::once(self.first.item).chain(self.second.map(|s| s.item))
    }
}

/// Same endpoints, relation, priority and multiplier. The constant is
/// deliberately not compared: it is the field an update moves.
pub fn structurally_equivalent(a: &Constraint, b: &Constraint) -> bool {
    a.first.item == b.first.item
        && a.second.map(|s| s.item) == b.second.map(|s| s.item)
        && a.first.attribute == b.first.attribute
        && a.second.map(|s| s.attribute) == b.second.map(|s| s.attribute)
        && a.relation == b.relation
        && a.priority() == b.priority()
        && a.multiplier == b.multiplier
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<Constraint")?;
        if let Some(identifier) = self.identifier.borrow().as_deref() {
            write!(f, ":{}", identifier)?;
        }
        write!(f, " {} {}", self.first, self.relation.symbol())?;
        let constant = self.constant();
        match &self.second {
            Some(second) => {
                write!(f, " {}", second)?;
                if self.multiplier != 1.0 {
                    write!(f, " * {}", trim_float(self.multiplier))?;
                }
                let sign = if constant < 0.0 { "-" } else { "+" };
                write!(f, " {} {}", sign, trim_float(constant.abs()))?;
            }
            None => write!(f, " {}", trim_float(constant))?,
        }
        let priority = self.priority();
        if !priority.is_required() {
            write!(f, " ^{}", priority)?;
        }
        f.write_str(">")
    }
}
