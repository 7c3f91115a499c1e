//! # Relation Model
//!
//! Records and views that cross every boundary: store ↔ classifier ↔ page ↔ caller.
//!
//! Design rule: no locking, no registry access here.
//! This module is pure data plus the per-axis merge rules.

pub mod relation_type;
pub mod relation;
pub mod neighbour;
pub mod file;

pub use relation_type::RelationType;
pub use relation::{Axis, AxisState, Definitions, Relation};
pub use neighbour::{Neighbour, RelationToPage};
pub use file::{FileHandle, MARKDOWN_EXTENSION};
