//! In-memory item hierarchy solved by kasuari
//!
//! `Canvas` is the reference [`LayoutHost`]: it knows which item contains
//! which, stores installed constraints on the nearest common ancestor of
//! their endpoints (the way view toolkits do), and feeds everything into a
//! [`ConstraintSolver`] to produce frames.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::attribute::Orientation;
use crate::constraint::{ConstraintRef, Priority};
use crate::error::LayoutError;
use crate::host::LayoutHost;
use crate::layout::LayoutConfig;
use crate::solver::{ConstraintSolver, SolverError};
use crate::types::{Frame, Insets, ItemId, Size};

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<ItemId>,
    translates_frame: bool,
    margins: Insets,
    intrinsic: Option<Size>,
    compression: [Priority; 2],
    hugging: [Priority; 2],
}

impl Node {
    fn new(name: String, parent: Option<ItemId>, margins: Insets) -> Self {
        Self {
            name,
            parent,
            translates_frame: true,
            margins,
            intrinsic: None,
            compression: [Priority::DEFAULT_HIGH; 2],
            hugging: [Priority::DEFAULT_LOW; 2],
        }
    }
}

fn slot(orientation: Orientation) -> usize {
    match orientation {
        Orientation::Horizontal => 0,
        Orientation::Vertical => 1,
    }
}

/// A tree of items with a fixed-size root
#[derive(Debug)]
pub struct Canvas {
    nodes: Vec<Node>,
    /// Active constraints per owning item, in activation order
    owned: HashMap<ItemId, Vec<ConstraintRef>>,
    solver: ConstraintSolver,
    default_margins: Insets,
}

impl Canvas {
    /// Create a canvas whose root item has the given size at the origin
    pub fn new(size: Size, config: &LayoutConfig) -> Result<Self, SolverError> {
        let mut canvas = Self {
            nodes: vec![Node::new("root".to_string(), None, config.default_margins)],
            owned: HashMap::new(),
            solver: ConstraintSolver::new(config.direction),
            default_margins: config.default_margins,
        };
        canvas
            .solver
            .fix_frame(canvas.root(), Frame::new(0.0, 0.0, size.width, size.height))?;
        Ok(canvas)
    }

    pub fn root(&self) -> ItemId {
        ItemId(0)
    }

    /// Add an item as a child of `parent`
    pub fn add_item(&mut self, name: impl Into<String>, parent: ItemId) -> Result<ItemId, SolverError> {
        self.node(parent)?;
        Ok(self.push_node(name.into(), Some(parent)))
    }

    /// Add an item that is not part of the hierarchy (no container)
    pub fn add_detached(&mut self, name: impl Into<String>) -> ItemId {
        self.push_node(name.into(), None)
    }

    fn push_node(&mut self, name: String, parent: Option<ItemId>) -> ItemId {
        let id = ItemId(self.nodes.len());
        self.nodes.push(Node::new(name, parent, self.default_margins));
        id
    }

    fn node(&self, item: ItemId) -> Result<&Node, SolverError> {
        self.nodes.get(item.0).ok_or(SolverError::UnknownItem { item })
    }

    fn node_mut(&mut self, item: ItemId) -> Result<&mut Node, SolverError> {
        self.nodes
            .get_mut(item.0)
            .ok_or(SolverError::UnknownItem { item })
    }

    pub fn item_named(&self, name: &str) -> Option<ItemId> {
        self.nodes.iter().position(|n| n.name == name).map(ItemId)
    }

    pub fn name(&self, item: ItemId) -> Option<&str> {
        self.nodes.get(item.0).map(|n| n.name.as_str())
    }

    /// Items in creation order
    pub fn items(&self) -> impl Iterator<Item = ItemId> {
        (0..self.nodes.len()).map(ItemId)
    }

    pub fn translates_frame(&self, item: ItemId) -> Option<bool> {
        self.nodes.get(item.0).map(|n| n.translates_frame)
    }

    pub fn set_margins(&mut self, item: ItemId, margins: Insets) -> Result<(), SolverError> {
        self.node_mut(item)?.margins = margins;
        Ok(())
    }

    /// Give the item a natural size that hugging / compression act on
    pub fn set_intrinsic_size(&mut self, item: ItemId, size: Size) -> Result<(), SolverError> {
        self.node_mut(item)?.intrinsic = Some(size);
        self.sync_intrinsic(item, Orientation::Horizontal)?;
        self.sync_intrinsic(item, Orientation::Vertical)
    }

    pub fn compression_resistance(&self, item: ItemId, orientation: Orientation) -> Option<Priority> {
        self.nodes.get(item.0).map(|n| n.compression[slot(orientation)])
    }

    pub fn hugging_priority(&self, item: ItemId, orientation: Orientation) -> Option<Priority> {
        self.nodes.get(item.0).map(|n| n.hugging[slot(orientation)])
    }

    fn sync_intrinsic(&mut self, item: ItemId, orientation: Orientation) -> Result<(), SolverError> {
        let node = self.node(item)?;
        let Some(size) = node.intrinsic else {
            return Ok(());
        };
        let extent = match orientation {
            Orientation::Horizontal => size.width,
            Orientation::Vertical => size.height,
        };
        let compression = node.compression[slot(orientation)];
        let hugging = node.hugging[slot(orientation)];
        self.solver
            .set_intrinsic(item, orientation, extent, compression, hugging)
    }

    fn ancestors(&self, item: ItemId) -> Vec<ItemId> {
        let mut chain = vec![item];
        let mut current = item;
        while let Some(parent) = self.nodes.get(current.0).and_then(|n| n.parent) {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// The item a constraint is installed on: the nearest common ancestor
    /// of its endpoints, or the item itself for size constraints.
    fn owner_of(&self, constraint: &ConstraintRef) -> Result<ItemId, SolverError> {
        let first = constraint.first().item;
        self.node(first)?;
        let Some(second) = constraint.second().map(|s| s.item) else {
            return Ok(first);
        };
        self.node(second)?;
        let first_chain = self.ancestors(first);
        self.ancestors(second)
            .into_iter()
            .find(|candidate| first_chain.contains(candidate))
            .ok_or(SolverError::NoCommonAncestor { first, second })
    }

    fn add_to_solver(&mut self, constraint: &ConstraintRef) -> Result<ItemId, SolverError> {
        let owner = self.owner_of(constraint)?;
        let nodes = &self.nodes;
        let margins = |item: ItemId| nodes.get(item.0).map(|n| n.margins).unwrap_or_default();
        self.solver.add_constraint(constraint, &margins)?;
        self.owned.entry(owner).or_default().push(constraint.clone());
        Ok(owner)
    }

    /// Number of active user constraints on the whole canvas
    pub fn active_constraint_count(&self) -> usize {
        self.owned.values().map(Vec::len).sum()
    }

    /// Every active constraint, grouped by owner in item order
    pub fn all_constraints(&self) -> Vec<ConstraintRef> {
        self.items()
            .flat_map(|item| self.current_constraints(item))
            .collect()
    }

    /// Solved frame of one item
    pub fn frame(&mut self, item: ItemId) -> Frame {
        self.solver.frame(item)
    }

    /// Solved frames of every item, in creation order
    pub fn frames(&mut self) -> Vec<(String, Frame)> {
        let items: Vec<ItemId> = self.items().collect();
        items
            .into_iter()
            .map(|item| {
                let frame = self.solver.frame(item);
                (self.nodes[item.0].name.clone(), frame)
            })
            .collect()
    }

    /// A constraint description using item names instead of handles
    pub fn describe(&self, constraint: &ConstraintRef) -> String {
        let mut description = constraint.to_string();
        let mut items: Vec<ItemId> = constraint.items().collect();
        // longer handles first so "#1" never clobbers "#12"
        items.sort_by_key(|item| std::cmp::Reverse(item.0));
        for item in items {
            if let Some(name) = self.name(item) {
                description = description.replace(&item.to_string(), name);
            }
        }
        description
    }
}

impl LayoutHost for Canvas {
    fn container_of(&self, item: ItemId) -> Option<ItemId> {
        self.nodes.get(item.0).and_then(|n| n.parent)
    }

    fn set_translates_frame(&mut self, item: ItemId, translates: bool) {
        if let Some(node) = self.nodes.get_mut(item.0) {
            node.translates_frame = translates;
        }
    }

    fn activate(&mut self, constraint: &ConstraintRef) -> Result<(), LayoutError> {
        self.add_to_solver(constraint)?;
        Ok(())
    }

    /// All or nothing: on failure the constraints added so far are rolled back
    fn activate_all(&mut self, constraints: &[ConstraintRef]) -> Result<(), LayoutError> {
        for (index, constraint) in constraints.iter().enumerate() {
            if let Err(e) = self.add_to_solver(constraint) {
                for added in &constraints[..index] {
                    self.deactivate(added);
                }
                return Err(e.into());
            }
        }
        debug!(count = constraints.len(), "canvas activated constraints");
        Ok(())
    }

    fn deactivate(&mut self, constraint: &ConstraintRef) {
        for list in self.owned.values_mut() {
            list.retain(|c| !ConstraintRef::ptr_eq(c, constraint));
        }
        if let Err(e) = self.solver.remove_constraint(constraint) {
            warn!("failed to deactivate {}: {}", constraint, e);
        }
    }

    fn current_constraints(&self, container: ItemId) -> Vec<ConstraintRef> {
        self.owned.get(&container).cloned().unwrap_or_default()
    }

    fn set_constant(&mut self, constraint: &ConstraintRef, constant: f64) -> Result<(), LayoutError> {
        let nodes = &self.nodes;
        let margins = |item: ItemId| nodes.get(item.0).map(|n| n.margins).unwrap_or_default();
        self.solver.replace_constant(constraint, constant, &margins)?;
        Ok(())
    }

    fn set_compression_resistance(
        &mut self,
        item: ItemId,
        orientation: Orientation,
        priority: Priority,
    ) -> Result<(), LayoutError> {
        self.node_mut(item)?.compression[slot(orientation)] = priority;
        self.sync_intrinsic(item, orientation)?;
        Ok(())
    }

    fn set_hugging_priority(
        &mut self,
        item: ItemId,
        orientation: Orientation,
        priority: Priority,
    ) -> Result<(), LayoutError> {
        self.node_mut(item)?.hugging[slot(orientation)] = priority;
        self.sync_intrinsic(item, orientation)?;
        Ok(())
    }
}
