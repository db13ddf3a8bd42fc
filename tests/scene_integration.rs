//! End-to-end tests: scene files in, solved frames out

use autopin::{
    solve_scene, LayoutConfig, LayoutDirection, LayoutError, Scene, SceneError,
};
use insta::assert_snapshot;

fn render(frames: &[(String, autopin::Frame)]) -> String {
    frames
        .iter()
        .map(|(name, frame)| format!("{} {}", name, frame))
        .collect::<Vec<_>>()
        .join("\n")
}

const TOOLBAR: &str = r#"
[canvas]
width = 300
height = 200

[[view]]
name = "bar"

[[view]]
name = "a"
parent = "bar"

[[view]]
name = "b"
parent = "bar"

[[view]]
name = "c"
parent = "bar"

[[constraint]]
op = "pin_edges_to_superview"
view = "bar"
edges = ["top", "leading", "trailing"]

[[constraint]]
op = "set_dimension"
view = "bar"
dimension = "height"
size = 40

[[constraint]]
op = "distribute"
views = ["a", "b", "c"]
axis = "horizontal"
alignment = "top"
spacing = 10

[[constraint]]
op = "pin_to_superview"
view = "a"
edge = "top"
inset = 5

[[constraint]]
op = "set_dimension"
view = "a"
dimension = "height"
size = 30
"#;

#[test]
fn test_distributed_toolbar() {
    let frames = solve_scene(TOOLBAR, &LayoutConfig::default()).unwrap();
    assert_snapshot!(render(&frames[..3]), @r"
    root 0 0 300 200
    bar 0 0 300 40
    a 10 5 86.667 30
    ");
    let x: Vec<String> = frames[3..]
        .iter()
        .map(|(name, frame)| format!("{} {}", name, autopin::Frame::new(frame.x, frame.y, frame.width, 0.0)))
        .collect();
    assert_snapshot!(x.join("\n"), @r"
    b 106.667 5 86.667 0
    c 203.333 5 86.667 0
    ");
}

#[test]
fn test_right_to_left_mirrors_leading() {
    let scene = r#"
    [canvas]
    width = 200
    height = 100

    [[view]]
    name = "badge"

    [[constraint]]
    op = "pin_to_superview"
    view = "badge"
    edge = "leading"
    inset = 10

    [[constraint]]
    op = "pin_to_superview"
    view = "badge"
    edge = "top"
    inset = 10

    [[constraint]]
    op = "set_dimension"
    view = "badge"
    dimension = "width"
    size = 50

    [[constraint]]
    op = "set_dimension"
    view = "badge"
    dimension = "height"
    size = 20
    "#;

    let ltr = solve_scene(scene, &LayoutConfig::default()).unwrap();
    let rtl = solve_scene(
        scene,
        &LayoutConfig::new().with_direction(LayoutDirection::RightToLeft),
    )
    .unwrap();

    assert_snapshot!(format!("{}\n{}", ltr[1].1, rtl[1].1), @r"
    10 10 50 20
    140 10 50 20
    ");
}

#[test]
fn test_priorities_from_scene() {
    // the weak width loses against the required pins
    let frames = solve_scene(
        r#"
        [canvas]
        width = 100
        height = 100

        [[view]]
        name = "fill"

        [[constraint]]
        op = "pin_edges_to_superview"
        view = "fill"
        insets = { top = 10, left = 10, bottom = 10, right = 10 }

        [[constraint]]
        op = "set_dimension"
        view = "fill"
        dimension = "width"
        size = 30
        priority = 100
        "#,
        &LayoutConfig::default(),
    )
    .unwrap();
    assert_snapshot!(frames[1].1.to_string(), @"10 10 80 80");
}

#[test]
fn test_intrinsic_size_and_hugging() {
    let frames = solve_scene(
        r#"
        [[view]]
        name = "label"
        intrinsic = { width = 64, height = 18 }

        [[constraint]]
        op = "center_in_superview"
        view = "label"
        "#,
        &LayoutConfig::default(),
    )
    .unwrap();
    assert_snapshot!(frames[1].1.to_string(), @"128 231 64 18");
}

#[test]
fn test_update_scene_moves_constants() {
    let base = Scene::from_toml_str(
        r#"
        [[view]]
        name = "card"

        [[constraint]]
        op = "pin_to_superview"
        view = "card"
        edge = "top"
        inset = 10

        [[constraint]]
        op = "pin_to_superview"
        view = "card"
        edge = "leading"
        inset = 5
        "#,
    )
    .unwrap();
    let update = Scene::from_toml_str(
        r#"
        [[view]]
        name = "card"

        [[constraint]]
        op = "pin_to_superview"
        view = "card"
        edge = "top"
        inset = 20

        [[constraint]]
        op = "pin_to_superview"
        view = "card"
        edge = "leading"
        inset = 5
        "#,
    )
    .unwrap();

    let mut layout = base.build(&LayoutConfig::default()).unwrap();
    let root = layout.host().root();
    let outcome = update.update(&mut layout, root).unwrap();

    assert_eq!(outcome.updated.len(), 2);
    assert!(outcome.installed.is_empty());
    assert_eq!(layout.host().active_constraint_count(), 2);

    let card = layout.host().item_named("card").unwrap();
    let frame = layout.host_mut().frame(card);
    assert_eq!((frame.x, frame.y), (5.0, 20.0));
}

#[test]
fn test_describe_uses_view_names() {
    let scene = Scene::from_toml_str(
        r#"
        [[view]]
        name = "footer"

        [[constraint]]
        op = "pin_to_superview"
        view = "footer"
        edge = "bottom"
        inset = 8
        priority = 750
        identifier = "footer"
        "#,
    )
    .unwrap();
    let layout = scene.build(&LayoutConfig::default()).unwrap();
    let canvas = layout.host();
    let described: Vec<String> = canvas
        .all_constraints()
        .iter()
        .map(|c| canvas.describe(c))
        .collect();
    assert_snapshot!(described.join("\n"), @"<Constraint:footer footer.bottom == root.bottom - 8 ^high>");
}

#[test]
fn test_layout_errors_surface_through_scenes() {
    let err = solve_scene(
        r#"
        [[view]]
        name = "a"

        [[view]]
        name = "b"

        [[constraint]]
        op = "distribute"
        views = ["a", "b"]
        axis = "last_baseline"
        alignment = "top"
        "#,
        &LayoutConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SceneError::Layout(LayoutError::InvalidAttributeCombination { .. })
    ));
}

const STACKED: &str = r#"
[[view]]
name = "panel"

[[view]]
name = "a"
parent = "panel"

[[view]]
name = "b"
parent = "panel"

[[constraint]]
op = "pin_edges_to_superview"
view = "panel"

[[constraint]]
op = "pin_to_superview"
view = "a"
edge = "top"

[[constraint]]
op = "set_dimension"
view = "a"
dimension = "height"
size = 20

[[constraint]]
op = "pin_edge"
view = "b"
edge = "top"
to_edge = "bottom"
to = "a"
offset = 8
"#;

const RESTACKED: &str = r#"
[[view]]
name = "a"

[[view]]
name = "b"

[[constraint]]
op = "pin_edge"
view = "b"
edge = "top"
to_edge = "bottom"
to = "a"
offset = 16
"#;

#[test]
fn test_update_named_container_reconciles_sibling_constraints() {
    let mut layout = Scene::from_toml_str(STACKED)
        .unwrap()
        .build(&LayoutConfig::default())
        .unwrap();
    let update = Scene::from_toml_str(RESTACKED).unwrap();

    let outcome = update.update_named(&mut layout, Some("panel")).unwrap();
    assert_eq!(outcome.updated.len(), 1);
    assert!(outcome.installed.is_empty());

    let b = layout.host().item_named("b").unwrap();
    assert_eq!(layout.host_mut().frame(b).y, 36.0);
}

#[test]
fn test_update_against_the_root_misses_nested_constraints() {
    let mut layout = Scene::from_toml_str(STACKED)
        .unwrap()
        .build(&LayoutConfig::default())
        .unwrap();
    let update = Scene::from_toml_str(RESTACKED).unwrap();

    let err = update.update_named(&mut layout, None).unwrap_err();
    assert!(matches!(err, SceneError::Layout(LayoutError::Solver(_))));

    let err = update.update_named(&mut layout, Some("ghost")).unwrap_err();
    assert!(matches!(err, SceneError::UnknownView(ref name) if name == "ghost"));
}
