//! Builder operations that produce single constraints
//!
//! Every operation resolves its attributes through the configured
//! [`AttributeMap`](crate::attribute::AttributeMap), builds one
//! [`Constraint`] and routes it through [`Layout::install`].

use std::rc::Rc;

use crate::attribute::{Alignment, Attribute, Axis, Dimension, Edge};
use crate::constraint::{Anchor, Constraint, ConstraintRef, Relation};
use crate::error::LayoutError;
use crate::host::LayoutHost;
use crate::types::{Insets, ItemId, Size};

use super::Layout;

/// Bottom, right and trailing insets point the other way
fn invert_for_edge(edge: Edge, inset: f64, relation: Relation) -> (f64, Relation) {
    if edge.is_trailing_sense() {
        (-inset, relation.flipped())
    } else {
        (inset, relation)
    }
}

/// `Left` pins as leading and `Right` as trailing, the way the
/// multi-edge helpers always have
fn fold_edges(edges: &[Edge], insets: Insets) -> Vec<(Edge, f64)> {
    let mut folded = Vec::new();
    if edges.contains(&Edge::Top) {
        folded.push((Edge::Top, insets.top));
    }
    if edges.contains(&Edge::Leading) || edges.contains(&Edge::Left) {
        folded.push((Edge::Leading, insets.left));
    }
    if edges.contains(&Edge::Bottom) {
        folded.push((Edge::Bottom, insets.bottom));
    }
    if edges.contains(&Edge::Trailing) || edges.contains(&Edge::Right) {
        folded.push((Edge::Trailing, insets.right));
    }
    folded
}

impl<H: LayoutHost> Layout<H> {
    /// `item.attribute <relation> other.other_attribute + offset`
    pub fn constrain(
        &mut self,
        item: ItemId,
        attribute: Attribute,
        relation: Relation,
        other: ItemId,
        other_attribute: Attribute,
        offset: f64,
    ) -> Result<ConstraintRef, LayoutError> {
        self.build(item, attribute, relation, Some((other, other_attribute)), 1.0, offset)
    }

    /// `item.attribute <relation> other.other_attribute * multiplier`
    pub fn constrain_with_multiplier(
        &mut self,
        item: ItemId,
        attribute: Attribute,
        other: ItemId,
        other_attribute: Attribute,
        multiplier: f64,
        relation: Relation,
    ) -> Result<ConstraintRef, LayoutError> {
        self.build(
            item,
            attribute,
            relation,
            Some((other, other_attribute)),
            multiplier,
            0.0,
        )
    }

    fn build(
        &mut self,
        item: ItemId,
        attribute: Attribute,
        relation: Relation,
        second: Option<(ItemId, Attribute)>,
        multiplier: f64,
        constant: f64,
    ) -> Result<ConstraintRef, LayoutError> {
        let first = Anchor::new(item, self.attributes.resolve(attribute)?);
        let constraint = match second {
            Some((other, other_attribute)) => {
                let second = Anchor::new(other, self.attributes.resolve(other_attribute)?);
                Constraint::new(first, relation, Some(second), multiplier, constant)
            }
            None => Constraint::size(first, relation, constant),
        };
        self.host.set_translates_frame(item, false);

        let constraint = Rc::new(constraint);
        self.install(&constraint)?;
        Ok(constraint)
    }

    fn container(&self, item: ItemId) -> Result<ItemId, LayoutError> {
        self.host
            .container_of(item)
            .ok_or_else(|| LayoutError::missing_container(item))
    }

    /// Opt the item into constraint-based layout
    pub fn configure_for_layout(&mut self, item: ItemId) {
        self.host.set_translates_frame(item, false);
    }

    pub fn pin_edge(
        &mut self,
        item: ItemId,
        edge: Edge,
        to_edge: Edge,
        other: ItemId,
        offset: f64,
        relation: Relation,
    ) -> Result<ConstraintRef, LayoutError> {
        self.constrain(item, edge.attribute(), relation, other, to_edge.attribute(), offset)
    }

    pub fn pin_top_to_bottom(
        &mut self,
        item: ItemId,
        other: ItemId,
        offset: f64,
        relation: Relation,
    ) -> Result<ConstraintRef, LayoutError> {
        self.pin_edge(item, Edge::Top, Edge::Bottom, other, offset, relation)
    }

    pub fn pin_leading_to_trailing(
        &mut self,
        item: ItemId,
        other: ItemId,
        offset: f64,
        relation: Relation,
    ) -> Result<ConstraintRef, LayoutError> {
        self.pin_edge(item, Edge::Leading, Edge::Trailing, other, offset, relation)
    }

    /// Pin an edge to the same edge of the container, inset by `inset`.
    ///
    /// For bottom, right and trailing the inset is negated and an
    /// inequality flipped, so a positive inset always moves the edge inwards.
    /// Leaves the item's frame-translation flag enabled.
    pub fn pin_edge_to_superview(
        &mut self,
        item: ItemId,
        edge: Edge,
        inset: f64,
        relation: Relation,
    ) -> Result<ConstraintRef, LayoutError> {
        let container = self.container(item)?;
        let (offset, relation) = invert_for_edge(edge, inset, relation);
        let constraint = self.pin_edge(item, edge, edge, container, offset, relation)?;
        self.host.set_translates_frame(item, true);
        Ok(constraint)
    }

    /// Pin several edges to the container. Constraints come back in
    /// top, leading, bottom, trailing order.
    pub fn pin_edges_to_superview(
        &mut self,
        item: ItemId,
        edges: &[Edge],
        insets: Insets,
    ) -> Result<Vec<ConstraintRef>, LayoutError> {
        LayoutError::require_count("pin_edges_to_superview", 1, edges.len())?;
        fold_edges(edges, insets)
            .into_iter()
            .map(|(edge, inset)| self.pin_edge_to_superview(item, edge, inset, Relation::Equal))
            .collect()
    }

    pub fn pin_sides_to_superview(
        &mut self,
        item: ItemId,
        insets: Insets,
    ) -> Result<Vec<ConstraintRef>, LayoutError> {
        self.pin_edges_to_superview(item, &[Edge::Leading, Edge::Trailing], insets)
    }

    pub fn pin_top_and_bottom_to_superview(
        &mut self,
        item: ItemId,
        insets: Insets,
    ) -> Result<Vec<ConstraintRef>, LayoutError> {
        self.pin_edges_to_superview(item, &[Edge::Top, Edge::Bottom], insets)
    }

    /// Pin an edge to the matching margin of the container. Only the
    /// relation is inverted; the offset is always zero.
    pub fn pin_edge_to_superview_margin(
        &mut self,
        item: ItemId,
        edge: Edge,
        relation: Relation,
    ) -> Result<ConstraintRef, LayoutError> {
        let container = self.container(item)?;
        let (_, relation) = invert_for_edge(edge, 0.0, relation);
        self.constrain(
            item,
            edge.attribute(),
            relation,
            container,
            edge.margin().attribute(),
            0.0,
        )
    }

    pub fn pin_edges_to_superview_margins(
        &mut self,
        item: ItemId,
        edges: &[Edge],
    ) -> Result<Vec<ConstraintRef>, LayoutError> {
        LayoutError::require_count("pin_edges_to_superview_margins", 1, edges.len())?;
        fold_edges(edges, Insets::zero())
            .into_iter()
            .map(|(edge, _)| self.pin_edge_to_superview_margin(item, edge, Relation::Equal))
            .collect()
    }

    pub fn align_axis(
        &mut self,
        item: ItemId,
        axis: Axis,
        other: ItemId,
        offset: f64,
    ) -> Result<ConstraintRef, LayoutError> {
        self.constrain(item, axis.attribute(), Relation::Equal, other, axis.attribute(), offset)
    }

    pub fn align_axis_with_multiplier(
        &mut self,
        item: ItemId,
        axis: Axis,
        other: ItemId,
        multiplier: f64,
    ) -> Result<ConstraintRef, LayoutError> {
        self.constrain_with_multiplier(
            item,
            axis.attribute(),
            other,
            axis.attribute(),
            multiplier,
            Relation::Equal,
        )
    }

    pub fn align_axis_to_superview(
        &mut self,
        item: ItemId,
        axis: Axis,
    ) -> Result<ConstraintRef, LayoutError> {
        let container = self.container(item)?;
        self.align_axis(item, axis, container, 0.0)
    }

    /// Align a center line with the container's center within its margins.
    /// Baselines have no margin axis.
    pub fn align_axis_to_superview_margin(
        &mut self,
        item: ItemId,
        axis: Axis,
    ) -> Result<ConstraintRef, LayoutError> {
        let container = self.container(item)?;
        let margin_attribute = axis.margin_attribute()?;
        self.constrain(
            item,
            axis.attribute(),
            Relation::Equal,
            container,
            margin_attribute,
            0.0,
        )
    }

    pub fn center_in_superview(&mut self, item: ItemId) -> Result<Vec<ConstraintRef>, LayoutError> {
        Ok(vec![
            self.align_axis_to_superview(item, Axis::Horizontal)?,
            self.align_axis_to_superview(item, Axis::Vertical)?,
        ])
    }

    pub fn center_in_superview_margins(
        &mut self,
        item: ItemId,
    ) -> Result<Vec<ConstraintRef>, LayoutError> {
        Ok(vec![
            self.align_axis_to_superview_margin(item, Axis::Horizontal)?,
            self.align_axis_to_superview_margin(item, Axis::Vertical)?,
        ])
    }

    pub fn match_dimension(
        &mut self,
        item: ItemId,
        dimension: Dimension,
        to_dimension: Dimension,
        other: ItemId,
        offset: f64,
        relation: Relation,
    ) -> Result<ConstraintRef, LayoutError> {
        self.constrain(
            item,
            dimension.attribute(),
            relation,
            other,
            to_dimension.attribute(),
            offset,
        )
    }

    pub fn match_same_dimension(
        &mut self,
        item: ItemId,
        dimension: Dimension,
        other: ItemId,
        offset: f64,
        relation: Relation,
    ) -> Result<ConstraintRef, LayoutError> {
        self.match_dimension(item, dimension, dimension, other, offset, relation)
    }

    /// A size constraint: no second endpoint, multiplier 0, constant `size`
    pub fn set_dimension(
        &mut self,
        item: ItemId,
        dimension: Dimension,
        size: f64,
        relation: Relation,
    ) -> Result<ConstraintRef, LayoutError> {
        self.build(item, dimension.attribute(), relation, None, 0.0, size)
    }

    pub fn set_dimensions(&mut self, item: ItemId, size: Size) -> Result<Vec<ConstraintRef>, LayoutError> {
        Ok(vec![
            self.set_dimension(item, Dimension::Width, size.width, Relation::Equal)?,
            self.set_dimension(item, Dimension::Height, size.height, Relation::Equal)?,
        ])
    }

    /// Line `item` up with `to` as one step of a distribution along
    /// `for_axis`. Items distributed along the vertical axis can only be
    /// aligned by x-based alignments, and the other way round.
    pub fn align(
        &mut self,
        item: ItemId,
        alignment: Alignment,
        to: ItemId,
        for_axis: Axis,
    ) -> Result<ConstraintRef, LayoutError> {
        let distributing_vertically = for_axis == Axis::Vertical;
        if alignment.is_for_vertical_axis() != distributing_vertically {
            let direction = if distributing_vertically {
                "vertically"
            } else {
                "horizontally"
            };
            return Err(LayoutError::invalid_combination(
                alignment.attribute().name(),
                format!("cannot align items that are distributed {direction} with this alignment"),
            ));
        }
        let attribute = alignment.attribute();
        self.constrain(item, attribute, Relation::Equal, to, attribute, 0.0)
    }
}
