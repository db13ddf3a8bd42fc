//! Bulk operations over constraint slices and item slices

use tracing::debug;

use crate::attribute::{Alignment, Axis, Dimension, Edge};
use crate::constraint::{ConstraintRef, Priority, Relation};
use crate::error::LayoutError;
use crate::host::LayoutHost;
use crate::types::{ItemId, Size};

use super::Layout;

/// In-place edits over a batch of constraints
pub trait ConstraintSliceExt {
    fn identify_all(&self, identifier: &str);
    fn set_priority_all(&self, priority: Priority);
}

impl ConstraintSliceExt for [ConstraintRef] {
    fn identify_all(&self, identifier: &str) {
        for constraint in self {
            constraint.identify(identifier);
        }
    }

    fn set_priority_all(&self, priority: Priority) {
        for constraint in self {
            constraint.set_priority(priority);
        }
    }
}

impl<H: LayoutHost> Layout<H> {
    pub fn remove(&mut self, constraint: &ConstraintRef) {
        self.remove_all(std::slice::from_ref(constraint));
    }

    /// Deactivate immediately, even inside a recording scope
    pub fn remove_all(&mut self, constraints: &[ConstraintRef]) {
        let active: Vec<ConstraintRef> = constraints
            .iter()
            .filter(|c| c.is_active())
            .cloned()
            .collect();
        if active.is_empty() {
            return;
        }
        self.host.deactivate_all(&active);
        for constraint in &active {
            constraint.set_active(false);
        }
        debug!(count = active.len(), "deactivated constraints");
    }

    /// Chain `edge` of every item to the same edge of the item before it
    pub fn align_views_to_edge(
        &mut self,
        items: &[ItemId],
        edge: Edge,
    ) -> Result<Vec<ConstraintRef>, LayoutError> {
        LayoutError::require_count("align_views_to_edge", 2, items.len())?;
        items
            .windows(2)
            .map(|pair| self.pin_edge(pair[1], edge, edge, pair[0], 0.0, Relation::Equal))
            .collect()
    }

    pub fn align_views_to_axis(
        &mut self,
        items: &[ItemId],
        axis: Axis,
    ) -> Result<Vec<ConstraintRef>, LayoutError> {
        LayoutError::require_count("align_views_to_axis", 2, items.len())?;
        items
            .windows(2)
            .map(|pair| self.align_axis(pair[1], axis, pair[0], 0.0))
            .collect()
    }

    pub fn match_views_dimension(
        &mut self,
        items: &[ItemId],
        dimension: Dimension,
    ) -> Result<Vec<ConstraintRef>, LayoutError> {
        LayoutError::require_count("match_views_dimension", 2, items.len())?;
        items
            .windows(2)
            .map(|pair| self.match_same_dimension(pair[1], dimension, pair[0], 0.0, Relation::Equal))
            .collect()
    }

    pub fn set_views_dimension(
        &mut self,
        items: &[ItemId],
        dimension: Dimension,
        size: f64,
    ) -> Result<Vec<ConstraintRef>, LayoutError> {
        LayoutError::require_count("set_views_dimension", 2, items.len())?;
        items
            .iter()
            .map(|&item| self.set_dimension(item, dimension, size, Relation::Equal))
            .collect()
    }

    /// Widths for every item, then heights
    pub fn set_views_dimensions(
        &mut self,
        items: &[ItemId],
        size: Size,
    ) -> Result<Vec<ConstraintRef>, LayoutError> {
        let mut constraints = self.set_views_dimension(items, Dimension::Width, size.width)?;
        constraints.extend(self.set_views_dimension(items, Dimension::Height, size.height)?);
        Ok(constraints)
    }

    /// Lay items out one after another along `axis` with fixed `spacing`.
    ///
    /// The first and last items are pinned to the container, inset by
    /// `spacing` when `inset_spacing` is set and flush otherwise. Each
    /// following item is aligned to its predecessor by `alignment` and,
    /// with `match_sizes`, given the same length along the axis.
    pub fn distribute_views(
        &mut self,
        items: &[ItemId],
        axis: Axis,
        alignment: Alignment,
        spacing: f64,
        inset_spacing: bool,
        match_sizes: bool,
    ) -> Result<Vec<ConstraintRef>, LayoutError> {
        LayoutError::require_count("distribute_views", 2, items.len())?;
        let (dimension, first_edge, last_edge) = match axis {
            Axis::Horizontal | Axis::Baseline | Axis::FirstBaseline => {
                (Dimension::Width, Edge::Leading, Edge::Trailing)
            }
            Axis::Vertical => (Dimension::Height, Edge::Top, Edge::Bottom),
            Axis::LastBaseline => {
                return Err(LayoutError::invalid_combination(
                    axis.attribute().name(),
                    "items cannot be distributed along the last baseline",
                ))
            }
        };
        let edge_inset = if inset_spacing { spacing } else { 0.0 };

        let mut constraints = Vec::new();
        let mut previous: Option<ItemId> = None;
        for &item in items {
            self.configure_for_layout(item);
            match previous {
                Some(previous) => {
                    constraints.push(self.pin_edge(
                        item,
                        first_edge,
                        last_edge,
                        previous,
                        spacing,
                        Relation::Equal,
                    )?);
                    if match_sizes {
                        constraints.push(self.match_same_dimension(
                            item,
                            dimension,
                            previous,
                            0.0,
                            Relation::Equal,
                        )?);
                    }
                    constraints.push(self.align(item, alignment, previous, axis)?);
                }
                None => {
                    constraints.push(self.pin_edge_to_superview(
                        item,
                        first_edge,
                        edge_inset,
                        Relation::Equal,
                    )?);
                }
            }
            previous = Some(item);
        }
        if let Some(last) = previous {
            constraints.push(self.pin_edge_to_superview(
                last,
                last_edge,
                edge_inset,
                Relation::Equal,
            )?);
        }
        Ok(constraints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::layout::LayoutConfig;
    use pretty_assertions::assert_eq;

    fn layout_with_items(count: usize) -> (Layout<Canvas>, Vec<ItemId>) {
        let config = LayoutConfig::default();
        let mut canvas = Canvas::new(Size::new(300.0, 100.0), &config).unwrap();
        let root = canvas.root();
        let items = (0..count)
            .map(|i| canvas.add_item(format!("item{i}"), root).unwrap())
            .collect();
        (Layout::new(canvas, config), items)
    }

    #[test]
    fn test_identify_and_prioritize_all() {
        let (mut layout, items) = layout_with_items(2);
        let constraints = layout
            .record_without_installing(|layout| {
                layout.set_views_dimension(&items, Dimension::Width, 10.0)?;
                Ok(())
            })
            .unwrap();

        constraints.identify_all("widths");
        constraints.set_priority_all(Priority::DEFAULT_LOW);
        for c in &constraints {
            assert_eq!(c.identifier().as_deref(), Some("widths"));
            assert_eq!(c.priority(), Priority::DEFAULT_LOW);
        }
    }

    #[test]
    fn test_minimum_two_items() {
        let (mut layout, items) = layout_with_items(1);
        let err = layout.align_views_to_axis(&items, Axis::Vertical).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::EmptyInput { operation: "align_views_to_axis", required: 2, found: 1 }
        ));
        let err = layout
            .distribute_views(&[], Axis::Horizontal, Alignment::Top, 8.0, true, true)
            .unwrap_err();
        assert!(matches!(err, LayoutError::EmptyInput { found: 0, .. }));
        assert_eq!(layout.host().active_constraint_count(), 0);
    }

    #[test]
    fn test_chain_pairs_neighbours() {
        let (mut layout, items) = layout_with_items(3);
        let constraints = layout.align_views_to_edge(&items, Edge::Top).unwrap();
        let pairs: Vec<(ItemId, Option<ItemId>)> = constraints
            .iter()
            .map(|c| (c.first().item, c.second().map(|s| s.item)))
            .collect();
        assert_eq!(pairs, vec![(items[1], Some(items[0])), (items[2], Some(items[1]))]);
    }

    #[test]
    fn test_distribute_horizontally() {
        let (mut layout, items) = layout_with_items(3);
        let constraints = layout
            .distribute_views(&items, Axis::Horizontal, Alignment::Top, 10.0, true, true)
            .unwrap();
        // leading pin, 2 x (spacing, size, alignment), trailing pin
        assert_eq!(constraints.len(), 8);
        layout.pin_edge_to_superview(items[0], Edge::Top, 0.0, Relation::Equal).unwrap();
        layout.set_dimension(items[0], Dimension::Height, 20.0, Relation::Equal).unwrap();

        let canvas = layout.host_mut();
        let spans: Vec<(f64, f64)> = items
            .iter()
            .map(|&i| {
                let frame = canvas.frame(i);
                (round(frame.x), round(frame.width))
            })
            .collect();
        assert_eq!(
            spans,
            vec![(10.0, 86.667), (106.667, 86.667), (203.333, 86.667)]
        );
        assert_eq!(canvas.frame(items[2]).y, 0.0);
    }

    fn round(value: f64) -> f64 {
        (value * 1000.0).round() / 1000.0
    }

    #[test]
    fn test_distribute_along_last_baseline() {
        let (mut layout, items) = layout_with_items(2);
        let err = layout
            .distribute_views(&items, Axis::LastBaseline, Alignment::Top, 0.0, false, false)
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidAttributeCombination { .. }));
    }

    #[test]
    fn test_remove_all_is_immediate() {
        let (mut layout, items) = layout_with_items(2);
        let installed = layout
            .set_views_dimensions(&items, Size::new(10.0, 10.0))
            .unwrap();
        assert_eq!(layout.host().active_constraint_count(), 4);

        let mut recording = layout.begin_group();
        recording.remove_all(&installed);
        assert_eq!(recording.host().active_constraint_count(), 0);
        let group = recording.finish().unwrap();
        assert!(group.is_empty());
        assert!(installed.iter().all(|c| !c.is_active()));
    }
}
