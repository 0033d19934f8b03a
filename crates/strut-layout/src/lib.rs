//! Constraint layout resolution for box trees.
//!
//! This crate computes integer bounds for the children of each container
//! from the container's list of linear constraints.
//!
//! # Architecture
//!
//! 1. **Grouping**: constraints are partitioned by the box they position and
//!    sorted into attribute precedence order (see `strut-constraint`)
//! 2. **Seeding**: dimensions no constraint determines start at the box's
//!    preferred size
//! 3. **Resolution**: each constraint is turned into a value and written into
//!    the box's working bounds; cross-dimension size couplings wait until
//!    their source is known
//! 4. **Driving**: a tree pass resolves each container, stores its
//!    calculated size and recurses into nested containers
//!
//! # Example
//!
//! ```
//! use strut_constraint::Constraint;
//! use strut_core::{Attribute, Bounds, Relation};
//! use strut_layout::{LayoutNode, LayoutOptions, LayoutTree};
//!
//! let mut tree = LayoutTree::new();
//! let root = tree.next_id();
//! tree.add_root(LayoutNode::container(root).with_bounds(Bounds::new(0, 0, 300, 200)));
//! let button = tree.next_id();
//! tree.add_child(root, LayoutNode::new(button).with_preferred_size(80, 24))?;
//!
//! tree.add_constraints(
//!     root,
//!     [
//!         Constraint::equal(button, Attribute::Trailing, root, Attribute::Trailing, -10),
//!         Constraint::equal(button, Attribute::Bottom, root, Attribute::Bottom, -10),
//!         Constraint::size(button, Attribute::Width, Relation::GreaterThanOrEqual, 60),
//!     ],
//! )?;
//!
//! let report = tree.layout(root, &LayoutOptions::default())?;
//! assert!(report.diagnostics.is_empty());
//! assert_eq!(tree.get(button).unwrap().bounds, Bounds::new(210, 166, 80, 24));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod arena;
mod compute;
mod resolver;
mod seeding;
mod tree;

pub use compute::{resolve, BoxGeometry, LayoutAborted, LayoutOptions, LayoutReport, PassAborted, PassInput, Resolution};
pub use seeding::unconstrained_axes;
pub use tree::{ContainerData, LayoutNode, LayoutTree, NodeKind};
