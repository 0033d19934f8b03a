//! Working state of a single layout pass.
//!
//! Every read and write the resolver makes goes through [`PassArena`], keyed
//! by box id. Besides the working bounds, each record tracks which
//! attributes were resolved in this pass and which dimensions were seeded
//! from the preferred size, so "partially resolved, then cross-referenced"
//! is an explicit state rather than a side effect on shared boxes.

use glam::IVec2;
use indexmap::IndexMap;
use strut_constraint::Constraint;
use strut_core::{Anchor, Attribute, Axis, Bounds, BoxId};

use crate::compute::{BoxGeometry, PassInput};

/// Set of attributes, one bit per attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct AttributeSet(u8);

impl AttributeSet {
    fn bit(attribute: Attribute) -> u8 {
        1 << attribute.precedence()
    }

    pub fn insert(&mut self, attribute: Attribute) {
        self.0 |= Self::bit(attribute);
    }

    pub fn contains(self, attribute: Attribute) -> bool {
        self.0 & Self::bit(attribute) != 0
    }

    pub fn has(self, axis: Axis, anchor: Anchor) -> bool {
        self.contains(Attribute::from_parts(axis, anchor))
    }

    /// How many attributes on `axis` are in the set.
    pub fn count_on(self, axis: Axis) -> usize {
        Attribute::ALL
            .iter()
            .filter(|a| a.axis() == axis && self.contains(**a))
            .count()
    }

    /// Whether the extent on `axis` follows from the attributes in the set:
    /// a size, or any two of start, end and center.
    pub fn determines_extent(self, axis: Axis) -> bool {
        let positions = [Anchor::Start, Anchor::End, Anchor::Center]
            .into_iter()
            .filter(|&anchor| self.has(axis, anchor))
            .count();
        self.has(axis, Anchor::Size) || positions >= 2
    }
}

/// One box as seen by the pass.
#[derive(Debug, Clone)]
pub(crate) struct BoxRecord<'a> {
    pub name: Option<&'a str>,
    pub bounds: Bounds,
    pub preferred: IVec2,
    /// Attributes applied so far in this pass
    pub resolved: AttributeSet,
    /// `Width`/`Height` bits for dimensions taken from the preferred size
    pub seeded: AttributeSet,
}

impl<'a> BoxRecord<'a> {
    fn from_geometry(geometry: &BoxGeometry<'a>) -> Self {
        Self {
            name: geometry.name,
            bounds: geometry.bounds,
            preferred: geometry.preferred_size,
            resolved: AttributeSet::default(),
            seeded: AttributeSet::default(),
        }
    }
}

/// Working arena for one container pass.
#[derive(Debug, Clone)]
pub(crate) struct PassArena<'a> {
    container: BoxId,
    container_name: Option<&'a str>,
    frame: IVec2,
    records: IndexMap<BoxId, BoxRecord<'a>>,
}

impl<'a> PassArena<'a> {
    pub fn new(input: &PassInput<'a>) -> Self {
        let records = input
            .children
            .iter()
            .map(|child| (child.id, BoxRecord::from_geometry(child)))
            .collect();
        Self {
            container: input.container,
            container_name: input.container_name,
            frame: input.container_size,
            records,
        }
    }

    pub fn container(&self) -> BoxId {
        self.container
    }

    /// Size of the container's local frame, whose origin is (0, 0).
    pub fn frame(&self) -> IVec2 {
        self.frame
    }

    pub fn contains(&self, id: BoxId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn record(&self, id: BoxId) -> Option<&BoxRecord<'a>> {
        self.records.get(&id)
    }

    pub fn record_mut(&mut self, id: BoxId) -> Option<&mut BoxRecord<'a>> {
        self.records.get_mut(&id)
    }

    pub fn bounds(&self, id: BoxId) -> Option<Bounds> {
        self.records.get(&id).map(|r| r.bounds)
    }

    /// Whether the box's extent on `axis` is known in this pass, either
    /// resolved from constraints or seeded from the preferred size.
    pub fn extent_known(&self, id: BoxId, axis: Axis) -> bool {
        self.records.get(&id).is_some_and(|r| {
            r.resolved.determines_extent(axis)
                || r.seeded.has(axis, Anchor::Size)
        })
    }

    /// Replace the extent on `axis` with the preferred size and remember it.
    pub fn seed_extent(&mut self, id: BoxId, axis: Axis) {
        if let Some(record) = self.records.get_mut(&id) {
            record.bounds.set_extent(axis, axis.of(record.preferred));
            record.seeded.insert(Attribute::from_parts(axis, Anchor::Size));
        }
    }

    /// `name#id`, or just `#id` for anonymous boxes.
    pub fn label(&self, id: BoxId) -> String {
        let name = if id == self.container {
            self.container_name
        } else {
            self.records.get(&id).and_then(|r| r.name)
        };
        match name {
            Some(name) => format!("{name}{id}"),
            None => id.to_string(),
        }
    }

    /// Render a constraint with this pass's box labels.
    pub fn describe(&self, constraint: &Constraint) -> String {
        constraint.display_with(|id| self.label(id)).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_set() {
        let mut set = AttributeSet::default();
        set.insert(Attribute::Leading);
        set.insert(Attribute::CenterY);

        assert!(set.contains(Attribute::Leading));
        assert!(set.has(Axis::Vertical, Anchor::Center));
        assert!(!set.contains(Attribute::Trailing));
        assert_eq!(set.count_on(Axis::Horizontal), 1);
        assert!(!set.determines_extent(Axis::Horizontal));

        set.insert(Attribute::Trailing);
        assert!(set.determines_extent(Axis::Horizontal));
        assert_eq!(set.count_on(Axis::Horizontal), 2);

        assert!(!set.determines_extent(Axis::Vertical));
        set.insert(Attribute::Top);
        assert!(set.determines_extent(Axis::Vertical));
    }

    #[test]
    fn test_seed_and_label() {
        let children = [
            BoxGeometry::new(BoxId(1), Bounds::new(5, 5, 0, 0), IVec2::new(80, 24)).with_name("title"),
            BoxGeometry::new(BoxId(2), Bounds::default(), IVec2::new(10, 10)),
        ];
        let input = PassInput {
            container: BoxId(0),
            container_name: Some("root"),
            container_size: IVec2::new(300, 200),
            children: &children,
            constraints: &[],
        };
        let mut arena = PassArena::new(&input);

        assert!(!arena.extent_known(BoxId(1), Axis::Horizontal));
        arena.seed_extent(BoxId(1), Axis::Horizontal);
        assert!(arena.extent_known(BoxId(1), Axis::Horizontal));
        assert_eq!(arena.bounds(BoxId(1)), Some(Bounds::new(5, 5, 80, 0)));

        assert_eq!(arena.label(BoxId(0)), "root#0");
        assert_eq!(arena.label(BoxId(1)), "title#1");
        assert_eq!(arena.label(BoxId(2)), "#2");
        assert_eq!(arena.frame(), IVec2::new(300, 200));
    }
}
