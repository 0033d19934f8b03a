//! Core types for the strut constraint layout engine.
//!
//! This crate provides the vocabulary shared by the other strut crates:
//! - Box identity and integer bounds
//! - Layout attributes, relations and priorities
//! - Diagnostics and error types

pub mod diagnostics;
pub mod errors;
pub mod types;

pub use diagnostics::*;
pub use errors::*;
pub use types::*;
