//! Resolved views handed to callers.

use serde::{Deserialize, Serialize};

use super::{Axis, RelationType};
use crate::page::PageRef;

/// A classified neighbour: the target page plus the axis-specific provenance
/// and definitions of the lens it was listed under.
#[derive(Debug, Clone)]
pub struct Neighbour {
    pub page: PageRef,
    pub relation_type: Option<RelationType>,
    pub type_definition: Option<String>,
}

impl Neighbour {
    pub fn path(&self) -> &str {
        self.page.path()
    }
}

/// Single-label answer of `Page::get_relation_to_page`.
///
/// The `Friend` fall-through may carry `relation_type: None` when the record
/// never had a friend axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationToPage {
    pub kind: Axis,
    pub relation_type: Option<RelationType>,
    pub type_definition: Option<String>,
}
