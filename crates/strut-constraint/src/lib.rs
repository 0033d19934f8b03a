//! Constraint model for the strut layout engine.
//!
//! This crate implements:
//! - The [`Constraint`] value type and its textual rendering
//! - Partitioning of a container's constraints by box
//! - The fixed per-box attribute processing order

mod constraint;
mod ordering;

pub use constraint::{Constraint, ConstraintDisplay};
pub use ordering::{group_by_primary, order_constraints, Boxes, ConstraintGroups, ConstraintList};
