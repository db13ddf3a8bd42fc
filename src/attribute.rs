//! Semantic layout attributes and their mapping to native attributes
//!
//! Client code speaks in edges, axes, margins, alignments and dimensions.
//! Each of those maps onto a native [`Attribute`], the identifier a host
//! solver understands. Which attributes exist depends on the [`Platform`]
//! profile: margin-relative attributes and the first baseline are only
//! available on the touch profile.

use std::fmt;

use serde::Deserialize;

use crate::error::LayoutError;

/// Native attribute identifiers understood by a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Left,
    Right,
    Top,
    Bottom,
    Leading,
    Trailing,
    Width,
    Height,
    CenterX,
    CenterY,
    Baseline,
    FirstBaseline,
    LastBaseline,
    LeftMargin,
    RightMargin,
    TopMargin,
    BottomMargin,
    LeadingMargin,
    TrailingMargin,
    CenterXWithinMargins,
    CenterYWithinMargins,
}

impl Attribute {
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Left => "left",
            Attribute::Right => "right",
            Attribute::Top => "top",
            Attribute::Bottom => "bottom",
            Attribute::Leading => "leading",
            Attribute::Trailing => "trailing",
            Attribute::Width => "width",
            Attribute::Height => "height",
            Attribute::CenterX => "centerX",
            Attribute::CenterY => "centerY",
            Attribute::Baseline => "baseline",
            Attribute::FirstBaseline => "firstBaseline",
            Attribute::LastBaseline => "lastBaseline",
            Attribute::LeftMargin => "leftMargin",
            Attribute::RightMargin => "rightMargin",
            Attribute::TopMargin => "topMargin",
            Attribute::BottomMargin => "bottomMargin",
            Attribute::LeadingMargin => "leadingMargin",
            Attribute::TrailingMargin => "trailingMargin",
            Attribute::CenterXWithinMargins => "centerXWithinMargins",
            Attribute::CenterYWithinMargins => "centerYWithinMargins",
        }
    }

    /// Whether the attribute is measured relative to the item's layout margins
    pub fn is_margin(&self) -> bool {
        matches!(
            self,
            Attribute::LeftMargin
                | Attribute::RightMargin
                | Attribute::TopMargin
                | Attribute::BottomMargin
                | Attribute::LeadingMargin
                | Attribute::TrailingMargin
                | Attribute::CenterXWithinMargins
                | Attribute::CenterYWithinMargins
        )
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capability profile of the host toolkit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Touch toolkits: layout margins and first baseline are available
    #[default]
    Touch,
    /// Desktop toolkits: no margin attributes, no first baseline
    Desktop,
}

impl Platform {
    pub fn supports_margins(&self) -> bool {
        matches!(self, Platform::Touch)
    }

    pub fn supports_first_baseline(&self) -> bool {
        matches!(self, Platform::Touch)
    }
}

/// Resolves attributes against a platform profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeMap {
    platform: Platform,
}

impl AttributeMap {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Check that `attribute` exists on the configured platform
    pub fn resolve(&self, attribute: Attribute) -> Result<Attribute, LayoutError> {
        if attribute.is_margin() && !self.platform.supports_margins() {
            return Err(LayoutError::invalid_combination(
                attribute.name(),
                "margin attributes are not available on the desktop profile",
            ));
        }
        if attribute == Attribute::FirstBaseline && !self.platform.supports_first_baseline() {
            return Err(LayoutError::invalid_combination(
                attribute.name(),
                "the first baseline is not available on the desktop profile",
            ));
        }
        Ok(attribute)
    }
}

/// Orientation handed to hugging and compression-resistance setters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// An edge of an item's rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
    Leading,
    Trailing,
}

impl Edge {
    pub fn attribute(&self) -> Attribute {
        match self {
            Edge::Left => Attribute::Left,
            Edge::Right => Attribute::Right,
            Edge::Top => Attribute::Top,
            Edge::Bottom => Attribute::Bottom,
            Edge::Leading => Attribute::Leading,
            Edge::Trailing => Attribute::Trailing,
        }
    }

    /// The margin running along this edge
    pub fn margin(&self) -> Margin {
        match self {
            Edge::Left => Margin::Left,
            Edge::Right => Margin::Right,
            Edge::Top => Margin::Top,
            Edge::Bottom => Margin::Bottom,
            Edge::Leading => Margin::Leading,
            Edge::Trailing => Margin::Trailing,
        }
    }

    /// Bottom, right and trailing grow towards smaller insets: an inset from
    /// the container has to be expressed as a negative offset.
    pub fn is_trailing_sense(&self) -> bool {
        matches!(self, Edge::Bottom | Edge::Right | Edge::Trailing)
    }
}

/// A layout margin of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Margin {
    Left,
    Right,
    Top,
    Bottom,
    Leading,
    Trailing,
}

impl Margin {
    pub fn attribute(&self) -> Attribute {
        match self {
            Margin::Left => Attribute::LeftMargin,
            Margin::Right => Attribute::RightMargin,
            Margin::Top => Attribute::TopMargin,
            Margin::Bottom => Attribute::BottomMargin,
            Margin::Leading => Attribute::LeadingMargin,
            Margin::Trailing => Attribute::TrailingMargin,
        }
    }
}

/// A line through an item: its centers or one of its baselines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// The vertical center line (center x)
    Vertical,
    /// The horizontal center line (center y)
    Horizontal,
    Baseline,
    FirstBaseline,
    LastBaseline,
}

impl Axis {
    pub fn attribute(&self) -> Attribute {
        match self {
            Axis::Vertical => Attribute::CenterX,
            Axis::Horizontal => Attribute::CenterY,
            Axis::Baseline => Attribute::Baseline,
            Axis::FirstBaseline => Attribute::FirstBaseline,
            Axis::LastBaseline => Attribute::LastBaseline,
        }
    }

    /// The center line measured within the item's margins.
    ///
    /// Baselines have no margin counterpart.
    pub fn margin_attribute(&self) -> Result<Attribute, LayoutError> {
        match self {
            Axis::Vertical => Ok(Attribute::CenterXWithinMargins),
            Axis::Horizontal => Ok(Attribute::CenterYWithinMargins),
            Axis::Baseline | Axis::FirstBaseline | Axis::LastBaseline => {
                Err(LayoutError::invalid_combination(
                    self.attribute().name(),
                    "baseline axes do not have corresponding margin axis attributes",
                ))
            }
        }
    }

    /// Orientation used for hugging / compression resistance
    pub fn orientation(&self) -> Orientation {
        match self {
            Axis::Vertical => Orientation::Vertical,
            Axis::Horizontal | Axis::Baseline | Axis::FirstBaseline | Axis::LastBaseline => {
                Orientation::Horizontal
            }
        }
    }
}

/// How items in a distribution are aligned to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Vertical,
    Horizontal,
    Baseline,
    FirstBaseline,
    Top,
    Left,
    Bottom,
    Right,
    Leading,
    Trailing,
}

impl Alignment {
    pub fn attribute(&self) -> Attribute {
        match self {
            Alignment::Vertical => Attribute::CenterX,
            Alignment::Horizontal => Attribute::CenterY,
            Alignment::Baseline => Attribute::Baseline,
            Alignment::FirstBaseline => Attribute::FirstBaseline,
            Alignment::Top => Attribute::Top,
            Alignment::Left => Attribute::Left,
            Alignment::Bottom => Attribute::Bottom,
            Alignment::Right => Attribute::Right,
            Alignment::Leading => Attribute::Leading,
            Alignment::Trailing => Attribute::Trailing,
        }
    }

    /// Alignments that line items up across a vertical distribution
    /// (x-based); the rest only make sense for horizontal distributions.
    pub fn is_for_vertical_axis(&self) -> bool {
        matches!(
            self,
            Alignment::Vertical
                | Alignment::Left
                | Alignment::Right
                | Alignment::Leading
                | Alignment::Trailing
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Width,
    Height,
}

impl Dimension {
    pub fn attribute(&self) -> Attribute {
        match self {
            Dimension::Width => Attribute::Width,
            Dimension::Height => Attribute::Height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_mapping() {
        assert_eq!(Edge::Leading.attribute(), Attribute::Leading);
        assert_eq!(Edge::Bottom.margin().attribute(), Attribute::BottomMargin);
        assert!(Edge::Trailing.is_trailing_sense());
        assert!(!Edge::Top.is_trailing_sense());
    }

    #[test]
    fn test_axis_mapping() {
        assert_eq!(Axis::Vertical.attribute(), Attribute::CenterX);
        assert_eq!(Axis::Horizontal.attribute(), Attribute::CenterY);
        assert_eq!(
            Axis::Vertical.margin_attribute().unwrap(),
            Attribute::CenterXWithinMargins
        );
    }

    #[test]
    fn test_baseline_has_no_margin_axis() {
        let err = Axis::Baseline.margin_attribute().unwrap_err();
        assert!(matches!(err, LayoutError::InvalidAttributeCombination { .. }));
        assert!(err.to_string().contains("baseline"));
    }

    #[test]
    fn test_desktop_rejects_margins() {
        let map = AttributeMap::new(Platform::Desktop);
        assert!(map.resolve(Attribute::TopMargin).is_err());
        assert!(map.resolve(Attribute::FirstBaseline).is_err());
        assert_eq!(map.resolve(Attribute::Top).unwrap(), Attribute::Top);
    }

    #[test]
    fn test_touch_accepts_margins() {
        let map = AttributeMap::new(Platform::Touch);
        assert_eq!(
            map.resolve(Attribute::LeadingMargin).unwrap(),
            Attribute::LeadingMargin
        );
    }

    #[test]
    fn test_alignment_axis_split() {
        assert!(Alignment::Leading.is_for_vertical_axis());
        assert!(!Alignment::Top.is_for_vertical_axis());
        assert!(!Alignment::Baseline.is_for_vertical_axis());
    }
}
