//! Relation classifier: pure rules resolving a raw `Relation` into a kind.
//!
//! Each lens (child, parent, friend) is evaluated independently. A DEFINED
//! signal on any axis blocks inferred classifications everywhere; an
//! INFERRED result needs a clean single-direction inferred signal. Mutual
//! inferred parent+child with nothing defined collapses to an inferred
//! friend.

use crate::model::{Axis, Relation, RelationType};

/// The five raw signals the rules are written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelationVector {
    /// Inferred parent.
    pub pi: bool,
    /// Defined parent.
    pub pd: bool,
    /// Inferred child.
    pub ci: bool,
    /// Defined child.
    pub cd: bool,
    /// Friend flag. Any explicit friend edge counts, whatever its provenance.
    pub fd: bool,
}

impl RelationVector {
    pub fn of(relation: &Relation) -> Self {
        Self {
            pi: relation.parent.is(RelationType::Inferred),
            pd: relation.parent.is(RelationType::Defined),
            ci: relation.child.is(RelationType::Inferred),
            cd: relation.child.is(RelationType::Defined),
            fd: relation.friend.present,
        }
    }

    pub fn child(self) -> Option<RelationType> {
        let RelationVector { pi, pd, ci, cd, fd } = self;
        if cd && !pd && !fd {
            Some(RelationType::Defined)
        } else if !pi && !pd && ci && !cd && !fd {
            Some(RelationType::Inferred)
        } else {
            None
        }
    }

    pub fn parent(self) -> Option<RelationType> {
        let RelationVector { pi, pd, ci, cd, fd } = self;
        if !cd && pd && !fd {
            Some(RelationType::Defined)
        } else if pi && !pd && !ci && !cd && !fd {
            Some(RelationType::Inferred)
        } else {
            None
        }
    }

    pub fn friend(self) -> Option<RelationType> {
        let RelationVector { pi, pd, ci, cd, fd } = self;
        if fd {
            Some(RelationType::Defined)
        } else if pi && !pd && ci && !cd && !fd {
            Some(RelationType::Inferred)
        } else {
            None
        }
    }
}

pub fn child_kind(relation: &Relation) -> Option<RelationType> {
    RelationVector::of(relation).child()
}

pub fn parent_kind(relation: &Relation) -> Option<RelationType> {
    RelationVector::of(relation).parent()
}

pub fn friend_kind(relation: &Relation) -> Option<RelationType> {
    RelationVector::of(relation).friend()
}

/// Classification of `relation` under the given lens.
pub fn kind(relation: &Relation, lens: Axis) -> Option<RelationType> {
    let v = RelationVector::of(relation);
    match lens {
        Axis::Child => v.child(),
        Axis::Parent => v.parent(),
        Axis::Friend => v.friend(),
    }
}

/// Visibility policy shared by every listing and existence query:
/// DEFINED is always shown, INFERRED only when inferred nodes are on.
pub fn is_visible(kind: Option<RelationType>, show_inferred_nodes: bool) -> bool {
    match kind {
        Some(RelationType::Defined) => true,
        Some(RelationType::Inferred) => show_inferred_nodes,
        None => false,
    }
}

/// Provenance reported by `get_friends` when the friend axis has no type.
///
/// Reached when the friend lens matched through the parent/child symmetry
/// rule. Kept as its own rule: it is not derived from `friend()`.
pub fn friend_fallback_type(relation: &Relation) -> RelationType {
    if relation.parent.relation_type == Some(RelationType::Defined)
        && relation.child.relation_type == Some(RelationType::Defined)
    {
        RelationType::Defined
    } else {
        RelationType::Inferred
    }
}
