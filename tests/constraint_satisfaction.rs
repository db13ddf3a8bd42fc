//! Integration tests verifying that solved frames satisfy every required
//! constraint that was installed. These do not check a particular layout;
//! they check that what the host reports agrees with what was declared.

use autopin::{
    Alignment, Attribute, Axis, Canvas, ConstraintRef, Dimension, Edge, Frame, Insets, ItemId,
    Layout, LayoutConfig, Relation, Size,
};

const TOLERANCE: f64 = 0.01;

fn value(frame: Frame, attribute: Attribute) -> f64 {
    match attribute {
        Attribute::Left | Attribute::Leading => frame.x,
        Attribute::Right | Attribute::Trailing => frame.right(),
        Attribute::Top => frame.y,
        Attribute::Bottom | Attribute::Baseline | Attribute::LastBaseline => frame.bottom(),
        Attribute::Width => frame.width,
        Attribute::Height => frame.height,
        Attribute::CenterX => frame.x + frame.width / 2.0,
        Attribute::CenterY => frame.y + frame.height / 2.0,
        other => panic!("attribute {} not used in these tests", other),
    }
}

fn assert_satisfied(layout: &mut Layout<Canvas>) {
    let constraints: Vec<ConstraintRef> = layout.host().all_constraints();
    let canvas = layout.host_mut();
    for c in constraints.iter().filter(|c| c.priority().is_required()) {
        let first = c.first();
        let lhs = value(canvas.frame(first.item), first.attribute);
        let rhs = match c.second() {
            Some(second) => {
                c.multiplier() * value(canvas.frame(second.item), second.attribute) + c.constant()
            }
            None => c.constant(),
        };
        let holds = match c.relation() {
            Relation::Equal => (lhs - rhs).abs() < TOLERANCE,
            Relation::LessOrEqual => lhs <= rhs + TOLERANCE,
            Relation::GreaterOrEqual => lhs + TOLERANCE >= rhs,
        };
        assert!(holds, "{} not satisfied: {} vs {}", c, lhs, rhs);
    }
}

fn setup(names: &[&str]) -> (Layout<Canvas>, Vec<ItemId>) {
    let config = LayoutConfig::default();
    let mut canvas = Canvas::new(Size::new(400.0, 300.0), &config).unwrap();
    let root = canvas.root();
    let items = names
        .iter()
        .map(|name| canvas.add_item(*name, root).unwrap())
        .collect();
    (Layout::new(canvas, config), items)
}

#[test]
fn test_column_of_cards() {
    let (mut layout, items) = setup(&["a", "b", "c"]);
    layout
        .create_and_install(|layout| {
            layout.distribute_views(&items, Axis::Vertical, Alignment::Leading, 12.0, true, true)?;
            layout.pin_edge_to_superview(items[0], Edge::Leading, 20.0, Relation::Equal)?;
            layout.match_views_dimension(&items, Dimension::Width)?;
            layout.set_dimension(items[0], Dimension::Width, 150.0, Relation::Equal)?;
            Ok(())
        })
        .unwrap();

    assert_satisfied(&mut layout);
    let canvas = layout.host_mut();
    let last = canvas.frame(items[2]);
    assert!((last.bottom() - 288.0).abs() < TOLERANCE);
    assert!((last.x - 20.0).abs() < TOLERANCE);
}

#[test]
fn test_inequalities_and_centering() {
    let (mut layout, items) = setup(&["panel", "button"]);
    let (panel, button) = (items[0], items[1]);
    layout
        .create_and_install(|layout| {
            layout.pin_edges_to_superview(panel, &[Edge::Top, Edge::Leading], Insets::uniform(16.0))?;
            layout.set_dimension(panel, Dimension::Width, 200.0, Relation::GreaterOrEqual)?;
            layout.set_dimension(panel, Dimension::Height, 120.0, Relation::Equal)?;
            layout.pin_edge_to_superview(panel, Edge::Trailing, 16.0, Relation::GreaterOrEqual)?;
            layout.align_axis(button, Axis::Vertical, panel, 0.0)?;
            layout.pin_top_to_bottom(button, panel, 8.0, Relation::Equal)?;
            layout.set_dimensions(button, Size::new(80.0, 30.0))?;
            Ok(())
        })
        .unwrap();

    assert_satisfied(&mut layout);
}

#[test]
fn test_multiplier_constraints() {
    let (mut layout, items) = setup(&["half", "quarter"]);
    layout
        .create_and_install(|layout| {
            for &item in &items {
                layout.pin_edges_to_superview(item, &[Edge::Top, Edge::Leading], Insets::zero())?;
                layout.set_dimension(item, Dimension::Height, 10.0, Relation::Equal)?;
            }
            let root = layout.host().root();
            layout.constrain_with_multiplier(
                items[0],
                Attribute::Width,
                root,
                Attribute::Width,
                0.5,
                Relation::Equal,
            )?;
            layout.constrain_with_multiplier(
                items[1],
                Attribute::Width,
                items[0],
                Attribute::Width,
                0.5,
                Relation::Equal,
            )?;
            Ok(())
        })
        .unwrap();

    assert_satisfied(&mut layout);
    let quarter = layout.host_mut().frame(items[1]);
    assert!((quarter.width - 100.0).abs() < TOLERANCE);
}
