//! Grouping a container's constraints by box and fixing their order.

use indexmap::IndexMap;
use smallvec::SmallVec;
use strut_core::{BoxId, LayoutError};

use crate::constraint::Constraint;

/// Constraints of one box, in insertion order until [`order_constraints`]
/// sorts them.
pub type ConstraintList<'a> = SmallVec<[&'a Constraint; 8]>;

/// Iterator over the boxes of a [`ConstraintGroups`].
pub type Boxes<'g, 'a> = std::iter::Copied<indexmap::map::Keys<'g, BoxId, ConstraintList<'a>>>;

/// A container's constraint list partitioned by primary box.
///
/// Boxes keep the order in which they first appear in the container's
/// list, which is also the order they are resolved in.
#[derive(Debug, Clone, Default)]
pub struct ConstraintGroups<'a> {
    groups: IndexMap<BoxId, ConstraintList<'a>>,
}

/// Partition a flat constraint list by primary box.
pub fn group_by_primary(constraints: &[Constraint]) -> ConstraintGroups<'_> {
    let mut groups: IndexMap<BoxId, ConstraintList<'_>> = IndexMap::new();
    for constraint in constraints {
        groups.entry(constraint.primary()).or_default().push(constraint);
    }
    ConstraintGroups { groups }
}

impl<'a> ConstraintGroups<'a> {
    /// Number of distinct boxes.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn contains(&self, id: BoxId) -> bool {
        self.groups.contains_key(&id)
    }

    /// Constraints for one box.
    pub fn get(&self, id: BoxId) -> Option<&[&'a Constraint]> {
        self.groups.get(&id).map(|list| list.as_slice())
    }

    /// Boxes in resolution order.
    pub fn boxes(&self) -> Boxes<'_, 'a> {
        self.groups.keys().copied()
    }

    /// Children that own no constraint at all.
    pub fn unconstrained(&self, children: &[BoxId]) -> Vec<BoxId> {
        children
            .iter()
            .copied()
            .filter(|child| !self.groups.contains_key(child))
            .collect()
    }

    /// Drain the groups in resolution order.
    pub fn into_groups(self) -> impl Iterator<Item = (BoxId, ConstraintList<'a>)> {
        self.groups.into_iter()
    }
}

/// Sort one box's constraints into processing order.
///
/// Order is `leading, trailing, top, bottom, width, height, centerX,
/// centerY`. Two constraints on the same attribute leave the box without a
/// well-defined position, which is reported as a fatal error.
pub fn order_constraints(subject: BoxId, list: &mut [&Constraint]) -> Result<(), LayoutError> {
    list.sort_by_key(|c| c.attribute().precedence());

    if let Some(pair) = list
        .windows(2)
        .find(|pair| pair[0].attribute() == pair[1].attribute())
    {
        return Err(LayoutError::DuplicateAttribute {
            subject,
            attribute: pair[0].attribute(),
        });
    }

    Ok(())
}
