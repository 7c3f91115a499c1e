//! Relation: the merged raw signal record between an owner page and one neighbour.

use std::fmt;
use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::RelationType;
use crate::page::{Page, PageRef};

/// One of the three independent relation axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Parent,
    Child,
    Friend,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Parent, Axis::Child, Axis::Friend];

    /// The axis the target page records for the same link.
    pub fn inverse(self) -> Axis {
        match self {
            Axis::Parent => Axis::Child,
            Axis::Child => Axis::Parent,
            Axis::Friend => Axis::Friend,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::Parent => "parent",
            Axis::Child => "child",
            Axis::Friend => "friend",
        })
    }
}

/// Accumulated free-text definitions for one axis.
///
/// Distinct entries are kept in the order they were first recorded and
/// rendered joined with `", "`. Empty strings are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definitions(SmallVec<[String; 2]>);

impl Definitions {
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    pub fn push(&mut self, definition: Option<&str>) {
        let Some(definition) = definition.filter(|d| !d.is_empty()) else {
            return;
        };
        if !self.0.iter().any(|d| d == definition) {
            self.0.push(definition.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// `None` when nothing was ever recorded.
    pub fn joined(&self) -> Option<String> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.join(", "))
        }
    }
}

/// Raw state of one axis: flag, provenance and definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisState {
    pub present: bool,
    pub relation_type: Option<RelationType>,
    pub definition: Definitions,
}

impl AxisState {
    /// Set the flag, merge the type monotonically, accumulate the definition.
    pub fn record(&mut self, relation_type: RelationType, definition: Option<&str>) {
        self.present = true;
        self.relation_type = Some(RelationType::merge(self.relation_type, relation_type));
        self.definition.push(definition);
    }

    /// `present` with the given provenance.
    pub fn is(&self, relation_type: RelationType) -> bool {
        self.present && self.relation_type == Some(relation_type)
    }
}

/// The record stored in an owner's neighbour map, keyed by neighbour path.
///
/// Several axes may be present at once; `classify` resolves them.
#[derive(Debug, Clone)]
pub struct Relation {
    /// Non-owning handle to the neighbour page.
    pub target: Weak<Page>,
    pub parent: AxisState,
    pub child: AxisState,
    pub friend: AxisState,
}

impl Relation {
    /// Empty record: no axis present.
    pub fn new(target: Weak<Page>) -> Self {
        Self {
            target,
            parent: AxisState {
                present: false,
                relation_type: None,
                definition: Definitions::new(),
            },
            child: AxisState {
                present: false,
                relation_type: None,
                definition: Definitions::new(),
            },
            friend: AxisState {
                present: false,
                relation_type: None,
                definition: Definitions::new(),
            },
        }
    }

    pub fn to(target: &PageRef) -> Self {
        Self::new(Arc::downgrade(target))
    }

    pub fn with(mut self, axis: Axis, relation_type: RelationType, definition: Option<&str>) -> Self {
        self.upsert(axis, relation_type, definition);
        self
    }

    pub fn axis(&self, axis: Axis) -> &AxisState {
        match axis {
            Axis::Parent => &self.parent,
            Axis::Child => &self.child,
            Axis::Friend => &self.friend,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisState {
        match axis {
            Axis::Parent => &mut self.parent,
            Axis::Child => &mut self.child,
            Axis::Friend => &mut self.friend,
        }
    }

    /// Merge one fact into the given axis; other axes are untouched.
    pub fn upsert(&mut self, axis: Axis, relation_type: RelationType, definition: Option<&str>) {
        self.axis_mut(axis).record(relation_type, definition);
    }

    /// The neighbour page, if it is still alive.
    pub fn target(&self) -> Option<PageRef> {
        self.target.upgrade()
    }
}
