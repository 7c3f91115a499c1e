//! Provenance of a relation: authored or inferred.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a relation came from.
///
/// `Defined` strictly dominates `Inferred`: merging never demotes a
/// `Defined` axis, and a `Defined` fact always promotes an `Inferred` one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RelationType {
    /// Explicitly authored in the page's content or metadata.
    Defined,
    /// Derived from the symmetric counterpart of another page's relation.
    Inferred,
}

impl RelationType {
    /// Monotonic merge of a new fact into the current state of one axis.
    ///
    /// The first write (`current == None`) takes the new type as-is.
    pub fn merge(current: Option<RelationType>, new: RelationType) -> RelationType {
        match current {
            Some(RelationType::Defined) => RelationType::Defined,
            Some(RelationType::Inferred) => match new {
                RelationType::Defined => RelationType::Defined,
                RelationType::Inferred => RelationType::Inferred,
            },
            None => new,
        }
    }

    pub fn is_defined(self) -> bool {
        self == RelationType::Defined
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelationType::Defined => "DEFINED",
            RelationType::Inferred => "INFERRED",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
