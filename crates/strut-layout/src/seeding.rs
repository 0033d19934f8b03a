//! Preferred-size seeding.
//!
//! A dimension no constraint determines starts the pass at the box's
//! preferred size, so centers and single edges have a span to work with.

use smallvec::SmallVec;
use strut_constraint::Constraint;
use strut_core::{Anchor, Attribute, Axis, BoxId};

use crate::arena::PassArena;

/// Axes on which none of `constraints` determines the box's extent.
///
/// An extent is determined by a size constraint or by constraints on both
/// edges of the axis.
pub fn unconstrained_axes(constraints: &[&Constraint]) -> SmallVec<[Axis; 2]> {
    let has = |axis: Axis, anchor: Anchor| {
        let attribute = Attribute::from_parts(axis, anchor);
        constraints.iter().any(|c| c.attribute() == attribute)
    };

    [Axis::Horizontal, Axis::Vertical]
        .into_iter()
        .filter(|&axis| !(has(axis, Anchor::Size) || (has(axis, Anchor::Start) && has(axis, Anchor::End))))
        .collect()
}

/// Seed every undetermined dimension of `id` from its preferred size.
pub(crate) fn seed_preferred_size(arena: &mut PassArena<'_>, id: BoxId, constraints: &[&Constraint]) {
    for axis in unconstrained_axes(constraints) {
        tracing::trace!(box_id = %id, ?axis, "seeding extent from preferred size");
        arena.seed_extent(id, axis);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use strut_core::{Bounds, Relation};

    use crate::compute::{BoxGeometry, PassInput};

    const ROOT: BoxId = BoxId(0);
    const CHILD: BoxId = BoxId(1);

    fn pin(attribute: Attribute) -> Constraint {
        Constraint::equal(CHILD, attribute, ROOT, attribute, 0)
    }

    #[test]
    fn test_both_edges_determine_extent() {
        let constraints = [pin(Attribute::Leading), pin(Attribute::Trailing), pin(Attribute::Top)];
        let refs: Vec<&Constraint> = constraints.iter().collect();
        assert_eq!(unconstrained_axes(&refs).as_slice(), &[Axis::Vertical]);
    }

    #[test]
    fn test_size_constraint_determines_extent() {
        let constraints = [
            Constraint::size(CHILD, Attribute::Height, Relation::Equal, 20),
            pin(Attribute::CenterX),
        ];
        let refs: Vec<&Constraint> = constraints.iter().collect();
        assert_eq!(unconstrained_axes(&refs).as_slice(), &[Axis::Horizontal]);
    }

    #[test]
    fn test_seed_writes_preferred_size() {
        let children = [BoxGeometry::new(CHILD, Bounds::new(3, 4, 1, 1), IVec2::new(120, 30))];
        let input = PassInput {
            container: ROOT,
            container_name: None,
            container_size: IVec2::new(400, 300),
            children: &children,
            constraints: &[],
        };
        let mut arena = PassArena::new(&input);

        let constraints = [pin(Attribute::Leading)];
        let refs: Vec<&Constraint> = constraints.iter().collect();
        seed_preferred_size(&mut arena, CHILD, &refs);

        assert_eq!(arena.bounds(CHILD), Some(Bounds::new(3, 4, 120, 30)));
        assert!(arena.extent_known(CHILD, Axis::Horizontal));
        assert!(arena.extent_known(CHILD, Axis::Vertical));
    }
}
