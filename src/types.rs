//! Core value types shared by the builder and the hosts

use std::fmt;

use serde::Deserialize;

/// Opaque handle to a layout item (a view, a layout guide, ...)
///
/// Hosts hand these out; the builder only compares them by identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub usize);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Insets applied to each edge of a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Insets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Insets {
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Same inset on every edge
    pub fn uniform(inset: f64) -> Self {
        Self::new(inset, inset, inset, inset)
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

/// A width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Solved rectangle of an item, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            trim_float(self.x),
            trim_float(self.y),
            trim_float(self.width),
            trim_float(self.height)
        )
    }
}

/// Format a float without a trailing `.0`, rounding solver noise away
pub(crate) fn trim_float(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // -0.0 prints as "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

/// Direction used to resolve leading/trailing attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_edges() {
        let frame = Frame::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(frame.right(), 110.0);
        assert_eq!(frame.bottom(), 70.0);
    }

    #[test]
    fn test_frame_display_trims_noise() {
        let frame = Frame::new(8.0000001, -0.0, 12.5, 300.0);
        assert_eq!(frame.to_string(), "8 0 12.5 300");
    }

    #[test]
    fn test_item_display() {
        assert_eq!(ItemId(3).to_string(), "#3");
    }
}
