//! The constraint value type.
//!
//! A constraint is one linear equation
//!
//! ```text
//! primary.attribute <relation> secondary.attribute × multiplier + constant
//! ```
//!
//! owned by a container and resolved during that container's pass.

use std::fmt;

use strut_core::{Attribute, BoxId, LayoutPriority, Relation};

/// A linear relationship between an attribute of one box and an attribute
/// of another box (or a constant).
///
/// The boxes, attributes and relation are fixed at construction. The
/// multiplier and constant are plain fields so a host can retune an
/// existing constraint between passes.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    primary: BoxId,
    attribute: Attribute,
    relation: Relation,
    secondary: Option<BoxId>,
    secondary_attribute: Attribute,
    pub multiplier: f64,
    pub constant: i32,
    /// Carried for reporting; every constraint is applied with equal weight.
    pub priority: LayoutPriority,
}

impl Constraint {
    /// Build a constraint from the full 7-tuple.
    pub fn new(
        primary: BoxId,
        attribute: Attribute,
        relation: Relation,
        secondary: impl Into<Option<BoxId>>,
        secondary_attribute: Attribute,
        multiplier: f64,
        constant: i32,
    ) -> Self {
        Self {
            primary,
            attribute,
            relation,
            secondary: secondary.into(),
            secondary_attribute,
            multiplier,
            constant,
            priority: LayoutPriority::REQUIRED,
        }
    }

    /// `primary.attribute <relation> constant`, with no secondary box.
    ///
    /// Only valid for `width` and `height`; anything else is rejected when
    /// the pass runs.
    pub fn size(primary: BoxId, attribute: Attribute, relation: Relation, constant: i32) -> Self {
        Self::new(primary, attribute, relation, None, attribute, 1.0, constant)
    }

    /// `primary.attribute == secondary.secondary_attribute + constant`.
    pub fn equal(
        primary: BoxId,
        attribute: Attribute,
        secondary: BoxId,
        secondary_attribute: Attribute,
        constant: i32,
    ) -> Self {
        Self::new(
            primary,
            attribute,
            Relation::Equal,
            secondary,
            secondary_attribute,
            1.0,
            constant,
        )
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: LayoutPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn primary(&self) -> BoxId {
        self.primary
    }

    pub fn attribute(&self) -> Attribute {
        self.attribute
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn secondary(&self) -> Option<BoxId> {
        self.secondary
    }

    pub fn secondary_attribute(&self) -> Attribute {
        self.secondary_attribute
    }

    /// Whether the constraint mentions `id` on either side.
    pub fn references(&self, id: BoxId) -> bool {
        self.primary == id || self.secondary == Some(id)
    }

    /// Render with custom box labels (e.g. debug names from the host tree).
    pub fn display_with<F>(&self, label: F) -> ConstraintDisplay<'_, F>
    where
        F: Fn(BoxId) -> String,
    {
        ConstraintDisplay {
            constraint: self,
            label,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.display_with(|id| id.to_string()).fmt(f)
    }
}

/// Display adapter returned by [`Constraint::display_with`].
pub struct ConstraintDisplay<'a, F> {
    constraint: &'a Constraint,
    label: F,
}

impl<F> fmt::Display for ConstraintDisplay<'_, F>
where
    F: Fn(BoxId) -> String,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.constraint;
        let secondary = match c.secondary {
            Some(id) => (self.label)(id),
            None => "∅".to_string(),
        };
        write!(
            f,
            "{}.{} {} {}.{} × {:?} ",
            (self.label)(c.primary),
            c.attribute,
            c.relation,
            secondary,
            c.secondary_attribute,
            c.multiplier,
        )?;
        if c.constant < 0 {
            write!(f, "- {}", c.constant.unsigned_abs())?;
        } else {
            write!(f, "+ {}", c.constant)?;
        }
        if c.priority != LayoutPriority::REQUIRED {
            write!(f, " @{}", c.priority.0)?;
        }
        Ok(())
    }
}
