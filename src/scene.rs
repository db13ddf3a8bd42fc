//! TOML scene descriptions
//!
//! A scene lists items and the constraint declarations that lay them out:
//!
//! ```toml
//! [canvas]
//! width = 320
//! height = 480
//!
//! [[view]]
//! name = "header"
//!
//! [[constraint]]
//! op = "pin_edges_to_superview"
//! view = "header"
//! edges = ["top", "leading", "trailing"]
//! insets = { top = 8, left = 8, right = 8 }
//!
//! [[constraint]]
//! op = "set_dimension"
//! view = "header"
//! dimension = "height"
//! size = 44
//! priority = 750
//! ```
//!
//! Declarations name items; they are resolved against the canvas before
//! anything is installed, so an unknown name never leaves a half-applied
//! scene behind.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::attribute::{Alignment, Axis, Dimension, Edge};
use crate::canvas::Canvas;
use crate::constraint::{ConstraintRef, Priority, Relation};
use crate::error::LayoutError;
use crate::host::LayoutHost;
use crate::layout::{Layout, LayoutConfig, UpdateOutcome};
use crate::solver::SolverError;
use crate::types::{Insets, ItemId, Size};

/// Errors that can occur when loading or applying a scene
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse scene TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("unknown view '{0}'")]
    UnknownView(String),
    #[error("view '{0}' is declared twice")]
    DuplicateView(String),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Solver(#[from] SolverError),
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasSpec {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self {
            width: 320.0,
            height: 480.0,
        }
    }
}

/// One item of the scene. Items without a parent live in the root.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewSpec {
    pub name: String,
    pub parent: Option<String>,
    pub intrinsic: Option<Size>,
    pub margins: Option<Insets>,
}

/// A constraint declaration, optionally wrapped in priority and
/// identifier scopes
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConstraintSpec {
    #[serde(flatten)]
    pub op: Operation,
    pub priority: Option<Priority>,
    pub identifier: Option<String>,
}

fn default_edges() -> Vec<Edge> {
    vec![Edge::Top, Edge::Bottom, Edge::Leading, Edge::Trailing]
}

fn yes() -> bool {
    true
}

/// A builder call. `V` names items: strings as written in the file, item
/// handles once resolved.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation<V = String> {
    PinToSuperview {
        view: V,
        edge: Edge,
        #[serde(default)]
        inset: f64,
        #[serde(default)]
        relation: Relation,
    },
    PinEdgesToSuperview {
        view: V,
        #[serde(default = "default_edges")]
        edges: Vec<Edge>,
        #[serde(default)]
        insets: Insets,
    },
    PinEdge {
        view: V,
        edge: Edge,
        to_edge: Edge,
        to: V,
        #[serde(default)]
        offset: f64,
        #[serde(default)]
        relation: Relation,
    },
    AlignAxis {
        view: V,
        axis: Axis,
        to: V,
        #[serde(default)]
        offset: f64,
    },
    AlignToSuperviewAxis {
        view: V,
        axis: Axis,
    },
    CenterInSuperview {
        view: V,
    },
    MatchDimension {
        view: V,
        dimension: Dimension,
        to_dimension: Option<Dimension>,
        to: V,
        #[serde(default)]
        offset: f64,
        #[serde(default)]
        relation: Relation,
    },
    SetDimension {
        view: V,
        dimension: Dimension,
        size: f64,
        #[serde(default)]
        relation: Relation,
    },
    Distribute {
        views: Vec<V>,
        axis: Axis,
        alignment: Alignment,
        #[serde(default)]
        spacing: f64,
        #[serde(default = "yes")]
        inset_spacing: bool,
        #[serde(default = "yes")]
        match_sizes: bool,
    },
}

impl Operation<String> {
    fn resolve(&self, canvas: &Canvas) -> Result<Operation<ItemId>, SceneError> {
        let item = |name: &String| {
            canvas
                .item_named(name)
                .ok_or_else(|| SceneError::UnknownView(name.clone()))
        };
        Ok(match self {
            Operation::PinToSuperview {
                view,
                edge,
                inset,
                relation,
            } => Operation::PinToSuperview {
                view: item(view)?,
                edge: *edge,
                inset: *inset,
                relation: *relation,
            },
            Operation::PinEdgesToSuperview {
                view,
                edges,
                insets,
            } => Operation::PinEdgesToSuperview {
                view: item(view)?,
                edges: edges.clone(),
                insets: *insets,
            },
            Operation::PinEdge {
                view,
                edge,
                to_edge,
                to,
                offset,
                relation,
            } => Operation::PinEdge {
                view: item(view)?,
                edge: *edge,
                to_edge: *to_edge,
                to: item(to)?,
                offset: *offset,
                relation: *relation,
            },
            Operation::AlignAxis {
                view,
                axis,
                to,
                offset,
            } => Operation::AlignAxis {
                view: item(view)?,
                axis: *axis,
                to: item(to)?,
                offset: *offset,
            },
            Operation::AlignToSuperviewAxis { view, axis } => Operation::AlignToSuperviewAxis {
                view: item(view)?,
                axis: *axis,
            },
            Operation::CenterInSuperview { view } => Operation::CenterInSuperview {
                view: item(view)?,
            },
            Operation::MatchDimension {
                view,
                dimension,
                to_dimension,
                to,
                offset,
                relation,
            } => Operation::MatchDimension {
                view: item(view)?,
                dimension: *dimension,
                to_dimension: *to_dimension,
                to: item(to)?,
                offset: *offset,
                relation: *relation,
            },
            Operation::SetDimension {
                view,
                dimension,
                size,
                relation,
            } => Operation::SetDimension {
                view: item(view)?,
                dimension: *dimension,
                size: *size,
                relation: *relation,
            },
            Operation::Distribute {
                views,
                axis,
                alignment,
                spacing,
                inset_spacing,
                match_sizes,
            } => Operation::Distribute {
                views: views.iter().map(item).collect::<Result<_, _>>()?,
                axis: *axis,
                alignment: *alignment,
                spacing: *spacing,
                inset_spacing: *inset_spacing,
                match_sizes: *match_sizes,
            },
        })
    }
}

impl Operation<ItemId> {
    fn apply<H: LayoutHost>(&self, layout: &mut Layout<H>) -> Result<(), LayoutError> {
        match self {
            Operation::PinToSuperview {
                view,
                edge,
                inset,
                relation,
            } => {
                layout.pin_edge_to_superview(*view, *edge, *inset, *relation)?;
            }
            Operation::PinEdgesToSuperview {
                view,
                edges,
                insets,
            } => {
                layout.pin_edges_to_superview(*view, edges, *insets)?;
            }
            Operation::PinEdge {
                view,
                edge,
                to_edge,
                to,
                offset,
                relation,
            } => {
                layout.pin_edge(*view, *edge, *to_edge, *to, *offset, *relation)?;
            }
            Operation::AlignAxis {
                view,
                axis,
                to,
                offset,
            } => {
                layout.align_axis(*view, *axis, *to, *offset)?;
            }
            Operation::AlignToSuperviewAxis { view, axis } => {
                layout.align_axis_to_superview(*view, *axis)?;
            }
            Operation::CenterInSuperview { view } => {
                layout.center_in_superview(*view)?;
            }
            Operation::MatchDimension {
                view,
                dimension,
                to_dimension,
                to,
                offset,
                relation,
            } => {
                let to_dimension = to_dimension.unwrap_or(*dimension);
                layout.match_dimension(*view, *dimension, to_dimension, *to, *offset, *relation)?;
            }
            Operation::SetDimension {
                view,
                dimension,
                size,
                relation,
            } => {
                layout.set_dimension(*view, *dimension, *size, *relation)?;
            }
            Operation::Distribute {
                views,
                axis,
                alignment,
                spacing,
                inset_spacing,
                match_sizes,
            } => {
                layout.distribute_views(
                    views,
                    *axis,
                    *alignment,
                    *spacing,
                    *inset_spacing,
                    *match_sizes,
                )?;
            }
        }
        Ok(())
    }
}

/// A declaration with its item names resolved
struct Declaration {
    op: Operation<ItemId>,
    priority: Option<Priority>,
    identifier: Option<String>,
}

impl Declaration {
    fn apply<H: LayoutHost>(&self, layout: &mut Layout<H>) -> Result<(), LayoutError> {
        let op = |layout: &mut Layout<H>| self.op.apply(layout);
        match (self.priority, self.identifier.as_deref()) {
            (Some(priority), Some(identifier)) => {
                layout.with_priority(priority, |layout| layout.with_identifier(identifier, op))
            }
            (Some(priority), None) => layout.with_priority(priority, op),
            (None, Some(identifier)) => layout.with_identifier(identifier, op),
            (None, None) => op(layout),
        }
    }
}

/// A parsed scene file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub canvas: CanvasSpec,
    #[serde(rename = "view")]
    pub views: Vec<ViewSpec>,
    #[serde(rename = "constraint")]
    pub constraints: Vec<ConstraintSpec>,
}

impl Scene {
    /// Load a scene from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(content)?)
    }

    /// Create a canvas with the scene's items and install its constraints
    /// in one batch
    pub fn build(&self, config: &LayoutConfig) -> Result<Layout<Canvas>, SceneError> {
        let size = Size::new(self.canvas.width, self.canvas.height);
        let mut layout = Layout::new(Canvas::new(size, config)?, config.clone());
        let installed = self.install(&mut layout)?;
        info!(
            views = self.views.len(),
            constraints = installed.len(),
            "scene installed"
        );
        Ok(layout)
    }

    /// Add the scene's items, then install all its declarations with
    /// `create_and_install`
    pub fn install(&self, layout: &mut Layout<Canvas>) -> Result<Vec<ConstraintRef>, SceneError> {
        self.add_views(layout.host_mut(), false)?;
        let declarations = self.resolve(layout.host())?;
        let installed = layout.create_and_install(|layout| {
            declarations
                .iter()
                .try_for_each(|declaration| declaration.apply(layout))
        })?;
        Ok(installed)
    }

    /// Re-declare the scene's constraints against `container` through
    /// [`Layout::update`]. Items that already exist are reused.
    pub fn update(
        &self,
        layout: &mut Layout<Canvas>,
        container: ItemId,
    ) -> Result<UpdateOutcome, SceneError> {
        self.add_views(layout.host_mut(), true)?;
        let declarations = self.resolve(layout.host())?;
        let outcome = layout.update(container, |layout| {
            declarations
                .iter()
                .try_for_each(|declaration| declaration.apply(layout))
        })?;
        Ok(outcome)
    }

    /// [`update`](Self::update) against the item called `container`, or
    /// the root when no name is given
    pub fn update_named(
        &self,
        layout: &mut Layout<Canvas>,
        container: Option<&str>,
    ) -> Result<UpdateOutcome, SceneError> {
        let canvas = layout.host();
        let container = match container {
            Some(name) => canvas
                .item_named(name)
                .ok_or_else(|| SceneError::UnknownView(name.to_string()))?,
            None => canvas.root(),
        };
        self.update(layout, container)
    }

    fn add_views(&self, canvas: &mut Canvas, reuse_existing: bool) -> Result<(), SceneError> {
        let mut seen = HashSet::new();
        for view in &self.views {
            if !seen.insert(view.name.as_str()) {
                return Err(SceneError::DuplicateView(view.name.clone()));
            }
            let item = match canvas.item_named(&view.name) {
                Some(existing) if reuse_existing => existing,
                Some(_) => return Err(SceneError::DuplicateView(view.name.clone())),
                None => {
                    let parent = match &view.parent {
                        Some(parent) => canvas
                            .item_named(parent)
                            .ok_or_else(|| SceneError::UnknownView(parent.clone()))?,
                        None => canvas.root(),
                    };
                    canvas.add_item(view.name.clone(), parent)?
                }
            };
            if let Some(margins) = view.margins {
                canvas.set_margins(item, margins)?;
            }
            if let Some(intrinsic) = view.intrinsic {
                canvas.set_intrinsic_size(item, intrinsic)?;
            }
            debug!(name = %view.name, %item, "view ready");
        }
        Ok(())
    }

    fn resolve(&self, canvas: &Canvas) -> Result<Vec<Declaration>, SceneError> {
        self.constraints
            .iter()
            .map(|spec| {
                Ok(Declaration {
                    op: spec.op.resolve(canvas)?,
                    priority: spec.priority,
                    identifier: spec.identifier.clone(),
                })
            })
            .collect()
    }
}
