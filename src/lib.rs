//! Autopin - constraint declaration helpers over a constraint-based layout host
//!
//! Constraints are declared through a [`Layout`] context. Declarations made
//! inside a recording scope are captured instead of activated, priority and
//! identifier scopes stamp every constraint that reaches the installer, and
//! [`Layout::update`] re-declares a layout by moving constants of matching
//! constraints instead of rebuilding them.
//!
//! # Example
//!
//! ```rust
//! use autopin::{Canvas, Edge, Layout, LayoutConfig, Relation, Size};
//!
//! let config = LayoutConfig::default();
//! let mut canvas = Canvas::new(Size::new(320.0, 480.0), &config).unwrap();
//! let child = canvas.add_item("child", canvas.root()).unwrap();
//! let mut layout = Layout::new(canvas, config);
//!
//! layout
//!     .create_and_install(|layout| {
//!         layout.pin_edge_to_superview(child, Edge::Top, 10.0, Relation::Equal)?;
//!         layout.pin_edge_to_superview(child, Edge::Leading, 5.0, Relation::Equal)?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let frame = layout.host_mut().frame(child);
//! assert_eq!((frame.x, frame.y), (5.0, 10.0));
//! ```

pub mod attribute;
pub mod canvas;
pub mod constraint;
pub mod error;
pub mod host;
pub mod layout;
pub mod scene;
pub mod solver;
pub mod types;

pub use attribute::{Alignment, Attribute, AttributeMap, Axis, Dimension, Edge, Margin, Orientation, Platform};
pub use canvas::Canvas;
pub use constraint::{structurally_equivalent, Anchor, Constraint, ConstraintRef, Priority, Relation};
pub use error::LayoutError;
pub use host::LayoutHost;
pub use layout::{
    ConfigError, ConstraintGroup, ConstraintSliceExt, Layout, LayoutConfig, RecordingScope,
    ScopeGuard, ScopeStack, UpdateOutcome,
};
pub use scene::{Scene, SceneError};
pub use solver::SolverError;
pub use types::{Frame, Insets, ItemId, LayoutDirection, Size};

/// Parse a scene, install it and return the solved frame of every item
pub fn solve_scene(source: &str, config: &LayoutConfig) -> Result<Vec<(String, Frame)>, SceneError> {
    let scene = Scene::from_toml_str(source)?;
    let mut layout = scene.build(config)?;
    Ok(layout.host_mut().frames())
}
