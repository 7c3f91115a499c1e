//! End-to-end tests for relation classification on pages.
//!
//! Each test builds a few pages by hand through the `Page` mutators and
//! checks what the listing queries report.

use chrono::Utc;
use page_graph::{
    shared_settings, Axis, FileHandle, GraphSettings, Page, PageRef, RelationToPage,
    RelationType::{Defined, Inferred},
    SharedSettings,
};
use pretty_assertions::assert_eq;

// ============================================================================
// Helpers
// ============================================================================

fn settings() -> SharedSettings {
    shared_settings(GraphSettings {
        index_page_path: Some("ExcaliBrain.md".into()),
        ..GraphSettings::default()
    })
}

fn doc(path: &str, s: &SharedSettings) -> PageRef {
    Page::shared(path, Some(FileHandle::new(path, Utc::now())), s.clone())
}

fn paths(ns: &[page_graph::Neighbour]) -> Vec<String> {
    ns.iter().map(|n| n.page.path().to_string()).collect()
}

// ============================================================================
// 1. Merge monotonicity: DEFINED survives later INFERRED facts
// ============================================================================

#[test]
fn test_defined_survives_inferred_merges() {
    let s = settings();
    let (a, b) = (doc("A.md", &s), doc("B.md", &s));

    a.add_child(&b, Inferred, None);
    a.add_child(&b, Defined, None);
    a.add_child(&b, Inferred, None);

    let children = a.get_children();
    assert_eq!(paths(&children), vec!["B.md"]);
    assert_eq!(children[0].relation_type, Some(Defined));
}

// ============================================================================
// 2. Definition accumulation
// ============================================================================

#[test]
fn test_definitions_concatenate() {
    let s = settings();
    let (a, b) = (doc("A.md", &s), doc("B.md", &s));

    a.add_friend(&b, Defined, Some("A"));
    a.add_friend(&b, Inferred, Some("B"));
    a.add_friend(&b, Inferred, Some("A"));

    let friends = a.get_friends();
    assert_eq!(friends[0].type_definition.as_deref(), Some("A, B"));
    assert_eq!(friends[0].relation_type, Some(Defined));
}

// ============================================================================
// 3. Self-link suppression for the index page
// ============================================================================

#[test]
fn test_index_page_never_recorded() {
    let s = settings();
    let a = doc("A.md", &s);
    let index = doc("ExcaliBrain.md", &s);

    a.add_parent(&index, Defined, Some("up"));
    a.add_child(&index, Defined, None);
    a.add_friend(&index, Defined, None);

    assert_eq!(a.neighbour_count(), 0);
    assert_eq!(a.get_relation_to_page(&index), None);
}

// ============================================================================
// 4. Inferred friend from mutual inferred parent+child
// ============================================================================

#[test]
fn test_mutual_inferred_is_friend() {
    let s = settings();
    let (a, b) = (doc("A.md", &s), doc("B.md", &s));
    a.add_parent(&b, Inferred, None);
    a.add_child(&b, Inferred, None);

    assert!(!a.has_parents());
    assert!(!a.has_children());
    assert!(a.has_friends());
    assert_eq!(a.get_friends()[0].relation_type, Some(Inferred));

    // Hidden once inferred nodes are off.
    s.write().show_inferred_nodes = false;
    assert!(!a.has_friends());
}

// ============================================================================
// 5. Visibility gating keeps DEFINED, hides INFERRED
// ============================================================================

#[test]
fn test_show_inferred_nodes_gates_listing() {
    let s = settings();
    let (a, b, c, d) = (doc("A.md", &s), doc("B.md", &s), doc("C.md", &s), doc("D.md", &s));
    a.add_child(&b, Defined, None);
    a.add_child(&c, Inferred, None);
    a.add_parent(&d, Inferred, None);

    s.write().show_inferred_nodes = false;
    assert_eq!(paths(&a.get_children()), vec!["B.md"]);
    assert!(!a.has_parents());

    s.write().show_inferred_nodes = true;
    assert_eq!(paths(&a.get_children()), vec!["B.md", "C.md"]);
    assert_eq!(paths(&a.get_parents()), vec!["D.md"]);
}

// ============================================================================
// 6. Unlink then re-add starts from a fresh record
// ============================================================================

#[test]
fn test_unlink_round_trip() {
    let s = settings();
    let (a, b) = (doc("A.md", &s), doc("B.md", &s));
    a.add_child(&b, Defined, Some("children"));
    a.add_friend(&b, Defined, None);

    a.unlink_neighbour("B.md");
    a.unlink_neighbour("B.md");
    assert!(a.get_children().is_empty());
    assert!(a.get_parents().is_empty());
    assert!(a.get_friends().is_empty());

    a.add_parent(&b, Inferred, None);
    assert_eq!(paths(&a.get_parents()), vec!["B.md"]);
    assert!(a.get_friends().is_empty());
    assert!(a.get_children().is_empty());
    let r = a.relation("B.md").unwrap();
    assert!(r.child.definition.is_empty());
}

// ============================================================================
// 7. Relation to page: child, then parent, then friend fall-through
// ============================================================================

#[test]
fn test_relation_to_page() {
    let s = settings();
    let (a, b, c) = (doc("A.md", &s), doc("B.md", &s), doc("C.md", &s));
    a.add_child(&b, Defined, Some("down"));
    a.add_friend(&c, Inferred, Some("jump"));

    assert_eq!(
        a.get_relation_to_page(&b),
        Some(RelationToPage {
            kind: Axis::Child,
            relation_type: Some(Defined),
            type_definition: Some("down".into()),
        })
    );
    assert_eq!(
        a.get_relation_to_page(&c),
        Some(RelationToPage {
            kind: Axis::Friend,
            relation_type: Some(Inferred),
            type_definition: Some("jump".into()),
        })
    );
    assert_eq!(b.get_relation_to_page(&a), None);
}

// ============================================================================
// 8. Siblings: discovery order, dedupe, DEFINED dominance
// ============================================================================

#[test]
fn test_siblings_across_two_parents() {
    let s = settings();
    let me = doc("Me.md", &s);
    let (mum, dad) = (doc("Mum.md", &s), doc("Dad.md", &s));
    let (sis, bro) = (doc("Sis.md", &s), doc("Bro.md", &s));

    me.add_parent(&mum, Defined, None);
    me.add_parent(&dad, Inferred, None);

    mum.add_child(&me, Inferred, None);
    mum.add_child(&sis, Defined, None);
    mum.add_child(&bro, Inferred, None);
    dad.add_child(&bro, Defined, None);
    dad.add_child(&sis, Inferred, None);

    let siblings = me.get_siblings();
    assert_eq!(paths(&siblings), vec!["Sis.md", "Bro.md"]);
    // Sis: DEFINED first, INFERRED later, stays DEFINED.
    assert_eq!(siblings[0].relation_type, Some(Defined));
    // Bro: INFERRED first, DEFINED later, upgraded.
    assert_eq!(siblings[1].relation_type, Some(Defined));
}

#[test]
fn test_siblings_respect_visibility() {
    let s = settings();
    let me = doc("Me.md", &s);
    let parent = doc("P.md", &s);
    let sib = doc("S.md", &s);
    me.add_parent(&parent, Inferred, None);
    parent.add_child(&sib, Defined, None);

    assert_eq!(paths(&me.get_siblings()), vec!["S.md"]);
    s.write().show_inferred_nodes = false;
    assert!(me.get_siblings().is_empty());
}

// ============================================================================
// 9. Virtual neighbours and dropped targets
// ============================================================================

#[test]
fn test_virtual_neighbours_filtered_not_deleted() {
    let s = settings();
    let a = doc("A.md", &s);
    let ghost = Page::shared("Ghost.md", None, s.clone());
    a.add_child(&ghost, Defined, None);

    s.write().show_virtual_nodes = false;
    assert!(a.get_children().is_empty());

    ghost.attach_file(FileHandle::new("Ghost.md", Utc::now()));
    assert_eq!(paths(&a.get_children()), vec!["Ghost.md"]);
}

#[test]
fn test_dropped_target_is_skipped() {
    let s = settings();
    let a = doc("A.md", &s);
    {
        let temp = doc("Temp.md", &s);
        a.add_friend(&temp, Defined, None);
    }
    assert_eq!(a.neighbour_count(), 1);
    assert!(a.get_friends().is_empty());
}
