//! Layout tree data structures.
//!
//! The tree owns every box of a layout: leaves with a preferred size, and
//! containers that additionally own their children and the constraints
//! positioning those children.

use std::collections::HashMap;

use glam::IVec2;
use strut_constraint::Constraint;
use strut_core::{AxisPriorities, Bounds, BoxId, LayoutError, LayoutPriority};

/// Container-only state.
#[derive(Debug, Clone, Default)]
pub struct ContainerData {
    /// Direct children, in insertion order
    pub children: Vec<BoxId>,
    pub(crate) constraints: Vec<Constraint>,
    /// (max x + width, max y + height) over the children of the last pass
    pub calculated_size: IVec2,
    /// Report the calculated size as the preferred size to the parent scope
    pub fits_content: bool,
}

/// Whether a box can own children.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Leaf,
    Container(ContainerData),
}

/// A box in the layout tree.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    /// Unique ID for this node
    pub id: BoxId,
    /// Optional name for diagnostics
    pub name: Option<String>,
    /// Computed bounds (position relative to parent)
    pub bounds: Bounds,
    /// Absolute bounds, filled by [`LayoutTree::compute_absolute_bounds`]
    pub absolute_bounds: Bounds,
    /// Intrinsic size supplied by the host
    pub preferred_size: IVec2,
    /// Stored and reported; not enforced by the resolver
    pub compression_resistance: AxisPriorities,
    /// Stored and reported; not enforced by the resolver
    pub content_hugging: AxisPriorities,
    /// Parent node ID (None for root)
    pub parent: Option<BoxId>,
    pub kind: NodeKind,
    /// Cleared when the box is excluded from its container's pass
    pub visible: bool,
}

impl LayoutNode {
    /// Create a leaf box.
    pub fn new(id: BoxId) -> Self {
        Self {
            id,
            name: None,
            bounds: Bounds::default(),
            absolute_bounds: Bounds::default(),
            preferred_size: IVec2::ZERO,
            compression_resistance: AxisPriorities::uniform(LayoutPriority::DEFAULT_LOW),
            content_hugging: AxisPriorities::uniform(LayoutPriority::DEFAULT_HIGH),
            parent: None,
            kind: NodeKind::Leaf,
            visible: true,
        }
    }

    /// Create an empty container box.
    pub fn container(id: BoxId) -> Self {
        Self {
            kind: NodeKind::Container(ContainerData::default()),
            ..Self::new(id)
        }
    }

    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the bounds.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the preferred size.
    pub fn with_preferred_size(mut self, width: i32, height: i32) -> Self {
        self.preferred_size = IVec2::new(width, height);
        self
    }

    pub fn with_compression_resistance(mut self, priorities: AxisPriorities) -> Self {
        self.compression_resistance = priorities;
        self
    }

    pub fn with_content_hugging(mut self, priorities: AxisPriorities) -> Self {
        self.content_hugging = priorities;
        self
    }

    /// Let a container report its calculated size as its preferred size.
    /// No effect on leaves.
    pub fn fitting_content(mut self) -> Self {
        if let NodeKind::Container(data) = &mut self.kind {
            data.fits_content = true;
        }
        self
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Container(_))
    }

    pub fn container_data(&self) -> Option<&ContainerData> {
        match &self.kind {
            NodeKind::Container(data) => Some(data),
            NodeKind::Leaf => None,
        }
    }

    pub fn container_data_mut(&mut self) -> Option<&mut ContainerData> {
        match &mut self.kind {
            NodeKind::Container(data) => Some(data),
            NodeKind::Leaf => None,
        }
    }

    /// Preferred size as seen by the parent's pass.
    pub fn effective_preferred_size(&self) -> IVec2 {
        match &self.kind {
            NodeKind::Container(data) if data.fits_content => data.calculated_size,
            _ => self.preferred_size,
        }
    }
}

/// The complete box tree.
#[derive(Debug, Clone)]
pub struct LayoutTree {
    /// All nodes in the tree, indexed by ID
    pub(crate) nodes: HashMap<BoxId, LayoutNode>,
    /// Root node IDs (top-level boxes)
    pub(crate) roots: Vec<BoxId>,
    /// Counter for generating unique IDs
    next_id: u64,
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTree {
    /// Create an empty layout tree.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            roots: Vec::new(),
            next_id: 0,
        }
    }

    /// Generate a new unique box ID.
    pub fn next_id(&mut self) -> BoxId {
        let id = BoxId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a root node.
    pub fn add_root(&mut self, node: LayoutNode) -> BoxId {
        let id = node.id;
        self.nodes.insert(id, node);
        self.roots.push(id);
        id
    }

    /// Add a child node to a container.
    pub fn add_child(&mut self, parent_id: BoxId, mut node: LayoutNode) -> Result<BoxId, LayoutError> {
        self.container_mut(parent_id)?.children.push(node.id);

        let id = node.id;
        node.parent = Some(parent_id);
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Get a node by ID.
    pub fn get(&self, id: BoxId) -> Option<&LayoutNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: BoxId) -> Option<&mut LayoutNode> {
        self.nodes.get_mut(&id)
    }

    /// Get the root nodes.
    pub fn roots(&self) -> &[BoxId] {
        &self.roots
    }

    /// Iterate over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.values()
    }

    /// Get children of a node.
    pub fn children(&self, id: BoxId) -> impl Iterator<Item = &LayoutNode> {
        self.nodes
            .get(&id)
            .and_then(LayoutNode::container_data)
            .into_iter()
            .flat_map(|data| data.children.iter())
            .filter_map(|child_id| self.nodes.get(child_id))
    }

    pub(crate) fn container(&self, id: BoxId) -> Result<&ContainerData, LayoutError> {
        self.nodes
            .get(&id)
            .ok_or(LayoutError::UnknownBox(id))?
            .container_data()
            .ok_or(LayoutError::NotAContainer(id))
    }

    pub(crate) fn container_mut(&mut self, id: BoxId) -> Result<&mut ContainerData, LayoutError> {
        self.nodes
            .get_mut(&id)
            .ok_or(LayoutError::UnknownBox(id))?
            .container_data_mut()
            .ok_or(LayoutError::NotAContainer(id))
    }

    /// Attach a constraint to the container whose children it positions.
    pub fn add_constraint(&mut self, container: BoxId, constraint: Constraint) -> Result<(), LayoutError> {
        self.container_mut(container)?.constraints.push(constraint);
        Ok(())
    }

    /// Attach several constraints, keeping their order.
    pub fn add_constraints(
        &mut self,
        container: BoxId,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Result<(), LayoutError> {
        self.container_mut(container)?.constraints.extend(constraints);
        Ok(())
    }

    /// The container's constraint list, in insertion order.
    pub fn constraints(&self, container: BoxId) -> Result<&[Constraint], LayoutError> {
        Ok(&self.container(container)?.constraints)
    }

    /// Mutable access for retuning multipliers and constants between passes.
    pub fn constraints_mut(&mut self, container: BoxId) -> Result<&mut [Constraint], LayoutError> {
        Ok(&mut self.container_mut(container)?.constraints)
    }

    /// Remove the first constraint equal to `constraint`. Returns whether one
    /// was found.
    pub fn remove_constraint(&mut self, container: BoxId, constraint: &Constraint) -> Result<bool, LayoutError> {
        let constraints = &mut self.container_mut(container)?.constraints;
        match constraints.iter().position(|c| c == constraint) {
            Some(index) => {
                constraints.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove_all_constraints(&mut self, container: BoxId) -> Result<(), LayoutError> {
        self.container_mut(container)?.constraints.clear();
        Ok(())
    }

    /// Drop every constraint of `container` that mentions `target`. Returns
    /// how many were removed.
    pub fn remove_constraints_for(&mut self, container: BoxId, target: BoxId) -> Result<usize, LayoutError> {
        let constraints = &mut self.container_mut(container)?.constraints;
        let before = constraints.len();
        constraints.retain(|c| !c.references(target));
        Ok(before - constraints.len())
    }

    /// Detach a box and its subtree.
    ///
    /// Constraints in the parent that mention the box are removed with it.
    pub fn remove(&mut self, id: BoxId) -> Result<LayoutNode, LayoutError> {
        let parent = self.nodes.get(&id).ok_or(LayoutError::UnknownBox(id))?.parent;

        match parent.and_then(|p| self.nodes.get_mut(&p)).and_then(LayoutNode::container_data_mut) {
            Some(data) => {
                data.children.retain(|child| *child != id);
                data.constraints.retain(|c| !c.references(id));
            }
            None => self.roots.retain(|root| *root != id),
        }

        let mut stack: Vec<BoxId> = self.children(id).map(|child| child.id).collect();
        while let Some(next) = stack.pop() {
            stack.extend(self.children(next).map(|child| child.id));
            self.nodes.remove(&next);
        }

        let mut node = self.nodes.remove(&id).ok_or(LayoutError::UnknownBox(id))?;
        node.parent = None;
        Ok(node)
    }

    /// Calculated size of a container after its last pass.
    pub fn calculated_size(&self, container: BoxId) -> Result<IVec2, LayoutError> {
        Ok(self.container(container)?.calculated_size)
    }

    /// Compute absolute bounds for all nodes.
    pub fn compute_absolute_bounds(&mut self) {
        for root_id in self.roots.clone() {
            self.compute_absolute_bounds_recursive(root_id, IVec2::ZERO);
        }
    }

    fn compute_absolute_bounds_recursive(&mut self, id: BoxId, parent_origin: IVec2) {
        let (origin, children) = {
            let node = match self.nodes.get_mut(&id) {
                Some(n) => n,
                None => return,
            };
            node.absolute_bounds = node.bounds.translate(parent_origin);
            let children = node
                .container_data()
                .map(|data| data.children.clone())
                .unwrap_or_default();
            (node.absolute_bounds.position(), children)
        };

        for child_id in children {
            self.compute_absolute_bounds_recursive(child_id, origin);
        }
    }

    /// Find the topmost visible box at a point (in absolute coordinates).
    pub fn hit_test(&self, x: i32, y: i32) -> Option<BoxId> {
        // Last root is on top
        for &root_id in self.roots.iter().rev() {
            if let Some(hit) = self.hit_test_recursive(root_id, x, y) {
                return Some(hit);
            }
        }
        None
    }

    fn hit_test_recursive(&self, id: BoxId, x: i32, y: i32) -> Option<BoxId> {
        let node = self.nodes.get(&id)?;

        if !node.visible || !node.absolute_bounds.contains(x, y) {
            return None;
        }

        if let Some(data) = node.container_data() {
            for &child_id in data.children.iter().rev() {
                if let Some(hit) = self.hit_test_recursive(child_id, x, y) {
                    return Some(hit);
                }
            }
        }

        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strut_core::{Attribute, Axis, Relation};

    fn two_level_tree() -> (LayoutTree, BoxId, BoxId) {
        let mut tree = LayoutTree::new();

        let root_id = tree.next_id();
        let root = LayoutNode::container(root_id)
            .with_name("root")
            .with_bounds(Bounds::new(0, 0, 800, 600));
        tree.add_root(root);

        let child_id = tree.next_id();
        let child = LayoutNode::new(child_id)
            .with_name("child")
            .with_bounds(Bounds::new(100, 100, 200, 100));
        tree.add_child(root_id, child).unwrap();

        (tree, root_id, child_id)
    }

    #[test]
    fn test_layout_tree() {
        let (mut tree, root_id, child_id) = two_level_tree();

        let panel_id = tree.next_id();
        let panel = LayoutNode::container(panel_id).with_bounds(Bounds::new(10, 10, 50, 50));
        tree.add_child(root_id, panel).unwrap();
        let inner_id = tree.next_id();
        tree.add_child(panel_id, LayoutNode::new(inner_id).with_bounds(Bounds::new(5, 7, 1, 1)))
            .unwrap();

        tree.compute_absolute_bounds();

        assert_eq!(tree.get(child_id).unwrap().absolute_bounds, Bounds::new(100, 100, 200, 100));
        assert_eq!(tree.get(inner_id).unwrap().absolute_bounds, Bounds::new(15, 17, 1, 1));
        assert_eq!(tree.children(root_id).count(), 2);
        assert_eq!(tree.get(inner_id).unwrap().parent, Some(panel_id));
    }

    #[test]
    fn test_hit_test() {
        let (mut tree, root_id, child_id) = two_level_tree();
        tree.compute_absolute_bounds();

        // Hit child
        assert_eq!(tree.hit_test(150, 150), Some(child_id));
        // Hit root (outside child)
        assert_eq!(tree.hit_test(50, 50), Some(root_id));
        // Miss everything
        assert_eq!(tree.hit_test(1000, 1000), None);

        tree.get_mut(child_id).unwrap().visible = false;
        assert_eq!(tree.hit_test(150, 150), Some(root_id));
    }

    #[test]
    fn test_leaf_cannot_own_children() {
        let (mut tree, _, child_id) = two_level_tree();
        let orphan = tree.next_id();
        let err = tree.add_child(child_id, LayoutNode::new(orphan)).unwrap_err();
        assert_eq!(err, LayoutError::NotAContainer(child_id));
        assert!(tree.get(orphan).is_none());

        let err = tree
            .add_constraint(BoxId(99), Constraint::size(child_id, Attribute::Width, Relation::Equal, 1))
            .unwrap_err();
        assert_eq!(err, LayoutError::UnknownBox(BoxId(99)));
    }

    #[test]
    fn test_constraint_maintenance() {
        let (mut tree, root_id, child_id) = two_level_tree();
        let other = tree.next_id();
        tree.add_child(root_id, LayoutNode::new(other)).unwrap();

        let width = Constraint::size(child_id, Attribute::Width, Relation::Equal, 40);
        let below = Constraint::equal(other, Attribute::Top, child_id, Attribute::Bottom, 4);
        let leading = Constraint::equal(other, Attribute::Leading, root_id, Attribute::Leading, 0);
        tree.add_constraints(root_id, [width.clone(), below, leading.clone()]).unwrap();

        assert!(tree.remove_constraint(root_id, &width).unwrap());
        assert!(!tree.remove_constraint(root_id, &width).unwrap());
        assert_eq!(tree.remove_constraints_for(root_id, child_id).unwrap(), 1);
        assert_eq!(tree.constraints(root_id).unwrap(), &[leading]);

        tree.constraints_mut(root_id).unwrap()[0].constant = 12;
        assert_eq!(tree.constraints(root_id).unwrap()[0].constant, 12);

        tree.remove_all_constraints(root_id).unwrap();
        assert!(tree.constraints(root_id).unwrap().is_empty());
    }

    #[test]
    fn test_remove_drops_subtree_and_references() {
        let (mut tree, root_id, child_id) = two_level_tree();
        let panel = tree.next_id();
        tree.add_child(root_id, LayoutNode::container(panel)).unwrap();
        let inner = tree.next_id();
        tree.add_child(panel, LayoutNode::new(inner)).unwrap();

        tree.add_constraints(
            root_id,
            [
                Constraint::equal(panel, Attribute::Top, child_id, Attribute::Bottom, 0),
                Constraint::equal(child_id, Attribute::Top, root_id, Attribute::Top, 0),
            ],
        )
        .unwrap();

        let removed = tree.remove(panel).unwrap();
        assert_eq!(removed.id, panel);
        assert!(removed.parent.is_none());
        assert!(tree.get(inner).is_none());
        assert_eq!(tree.children(root_id).count(), 1);
        assert_eq!(tree.constraints(root_id).unwrap().len(), 1);

        tree.remove(root_id).unwrap();
        assert!(tree.roots().is_empty());
        assert_eq!(tree.remove(root_id).unwrap_err(), LayoutError::UnknownBox(root_id));
    }

    #[test]
    fn test_fitting_content_reports_calculated_size() {
        let mut node = LayoutNode::container(BoxId(3))
            .with_preferred_size(10, 10)
            .fitting_content();
        assert_eq!(node.effective_preferred_size(), IVec2::ZERO);

        node.container_data_mut().unwrap().calculated_size = IVec2::new(120, 48);
        assert_eq!(node.effective_preferred_size(), IVec2::new(120, 48));

        let leaf = LayoutNode::new(BoxId(4)).with_preferred_size(10, 10).fitting_content();
        assert_eq!(leaf.effective_preferred_size(), IVec2::new(10, 10));
        assert_eq!(leaf.compression_resistance.on(Axis::Horizontal), LayoutPriority(250));
        assert_eq!(leaf.content_hugging.on(Axis::Vertical), LayoutPriority(750));
    }
}
