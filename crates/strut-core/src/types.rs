//! Core value types for constraint layout.

use std::fmt;

use glam::IVec2;

/// Stable identity of a layout box.
///
/// Ids are handed out by the host (usually through `LayoutTree::next_id`)
/// and never reused within a tree, so they double as map keys and as the
/// self-reference test for constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxId(pub u64);

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// x / width
    Horizontal,
    /// y / height
    Vertical,
}

impl Axis {
    /// Pick the component of a vector that lies on this axis.
    pub fn of(self, v: IVec2) -> i32 {
        match self {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }
}

/// The role an attribute plays on its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Leading or top edge
    Start,
    /// Trailing or bottom edge
    End,
    /// Center line
    Center,
    /// Width or height
    Size,
}

impl Anchor {
    /// Fraction of the extent this anchor sits at, measured from the origin.
    ///
    /// Only meaningful for edge and center anchors.
    pub fn fraction(self) -> f64 {
        match self {
            Anchor::Start => 0.0,
            Anchor::Center => 0.5,
            Anchor::End | Anchor::Size => 1.0,
        }
    }
}

/// The part of a box's geometry a constraint reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attribute {
    Leading,
    Trailing,
    Top,
    Bottom,
    Width,
    Height,
    CenterX,
    CenterY,
}

impl Attribute {
    /// Every attribute in processing order.
    pub const ALL: [Attribute; 8] = [
        Attribute::Leading,
        Attribute::Trailing,
        Attribute::Top,
        Attribute::Bottom,
        Attribute::Width,
        Attribute::Height,
        Attribute::CenterX,
        Attribute::CenterY,
    ];

    /// Axis the attribute lives on.
    pub fn axis(self) -> Axis {
        match self {
            Attribute::Leading | Attribute::Trailing | Attribute::Width | Attribute::CenterX => {
                Axis::Horizontal
            }
            Attribute::Top | Attribute::Bottom | Attribute::Height | Attribute::CenterY => {
                Axis::Vertical
            }
        }
    }

    /// Role of the attribute on its axis.
    pub fn anchor(self) -> Anchor {
        match self {
            Attribute::Leading | Attribute::Top => Anchor::Start,
            Attribute::Trailing | Attribute::Bottom => Anchor::End,
            Attribute::CenterX | Attribute::CenterY => Anchor::Center,
            Attribute::Width | Attribute::Height => Anchor::Size,
        }
    }

    /// The attribute with the given role on the given axis.
    pub fn from_parts(axis: Axis, anchor: Anchor) -> Attribute {
        match (axis, anchor) {
            (Axis::Horizontal, Anchor::Start) => Attribute::Leading,
            (Axis::Horizontal, Anchor::End) => Attribute::Trailing,
            (Axis::Horizontal, Anchor::Center) => Attribute::CenterX,
            (Axis::Horizontal, Anchor::Size) => Attribute::Width,
            (Axis::Vertical, Anchor::Start) => Attribute::Top,
            (Axis::Vertical, Anchor::End) => Attribute::Bottom,
            (Axis::Vertical, Anchor::Center) => Attribute::CenterY,
            (Axis::Vertical, Anchor::Size) => Attribute::Height,
        }
    }

    /// Whether this is `width` or `height`.
    pub fn is_size(self) -> bool {
        self.anchor() == Anchor::Size
    }

    /// Position in the per-box processing order.
    ///
    /// Edges come first so spans can be derived from them, sizes next, and
    /// centers last because they branch on what is already known.
    pub fn precedence(self) -> u8 {
        match self {
            Attribute::Leading => 0,
            Attribute::Trailing => 1,
            Attribute::Top => 2,
            Attribute::Bottom => 3,
            Attribute::Width => 4,
            Attribute::Height => 5,
            Attribute::CenterX => 6,
            Attribute::CenterY => 7,
        }
    }

    /// Lower-camel name, as written in constraint descriptions.
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Leading => "leading",
            Attribute::Trailing => "trailing",
            Attribute::Top => "top",
            Attribute::Bottom => "bottom",
            Attribute::Width => "width",
            Attribute::Height => "height",
            Attribute::CenterX => "centerX",
            Attribute::CenterY => "centerY",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Comparator between the two sides of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    LessThanOrEqual,
    #[default]
    Equal,
    GreaterThanOrEqual,
}

impl Relation {
    /// Clamp a resolved size against a preferred size.
    ///
    /// `>=` keeps the larger of the two, `<=` the smaller, `==` the value.
    pub fn clamp(self, value: i32, preferred: i32) -> i32 {
        match self {
            Relation::Equal => value,
            Relation::GreaterThanOrEqual => value.max(preferred),
            Relation::LessThanOrEqual => value.min(preferred),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Relation::LessThanOrEqual => "<=",
            Relation::Equal => "==",
            Relation::GreaterThanOrEqual => ">=",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Priority attached to constraints and box resistances.
///
/// Stored and reported, but the resolver applies every constraint with the
/// same weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutPriority(pub u16);

impl LayoutPriority {
    pub const REQUIRED: LayoutPriority = LayoutPriority(1000);
    pub const DEFAULT_HIGH: LayoutPriority = LayoutPriority(750);
    pub const DEFAULT_LOW: LayoutPriority = LayoutPriority(250);
}

impl Default for LayoutPriority {
    fn default() -> Self {
        Self::REQUIRED
    }
}

/// Per-axis priorities of a box (compression resistance, content hugging).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisPriorities {
    pub horizontal: LayoutPriority,
    pub vertical: LayoutPriority,
}

impl AxisPriorities {
    pub const fn uniform(priority: LayoutPriority) -> Self {
        Self {
            horizontal: priority,
            vertical: priority,
        }
    }

    pub fn on(&self, axis: Axis) -> LayoutPriority {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }
}

/// Integer bounds of a box, relative to its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    /// Create bounds with position and size.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn position(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }

    /// Right edge (x + width).
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (y + height).
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Origin on an axis.
    pub fn origin(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Extent (width or height) on an axis.
    pub fn extent(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Far edge on an axis.
    pub fn end(&self, axis: Axis) -> i32 {
        self.origin(axis).saturating_add(self.extent(axis))
    }

    pub fn set_origin(&mut self, axis: Axis, value: i32) {
        match axis {
            Axis::Horizontal => self.x = value,
            Axis::Vertical => self.y = value,
        }
    }

    pub fn set_extent(&mut self, axis: Axis, value: i32) {
        match axis {
            Axis::Horizontal => self.width = value,
            Axis::Vertical => self.height = value,
        }
    }

    /// Check if a point is inside the bounds.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Same size, shifted by an offset.
    pub fn translate(&self, offset: IVec2) -> Bounds {
        Bounds::new(
            self.x.saturating_add(offset.x),
            self.y.saturating_add(offset.y),
            self.width,
            self.height,
        )
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}x{})", self.x, self.y, self.width, self.height)
    }
}
