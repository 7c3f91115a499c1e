//! # Page
//!
//! A node of the relationship graph. A page owns its relation store and
//! answers every listing query by classifying that store on demand; nothing
//! is cached, so queries always reflect the latest mutation.
//!
//! Pages are shared as [`PageRef`] (`Arc<Page>`). The store sits behind a
//! `RwLock`, so mutators take `&self`. No lock is held while another page's
//! store is read, which keeps self-links and cycles deadlock-free.
//!
//! This layer never symmetrises: `a.add_child(&b, ..)` does not touch `b`.
//! `PageIndex` records both directions.

pub mod store;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::classify;
use crate::model::{Axis, FileHandle, Neighbour, Relation, RelationToPage, RelationType};
use crate::settings::{SharedSettings, Visibility};

pub use store::NeighbourMap;

/// Shared handle to a page.
pub type PageRef = Arc<Page>;

pub struct Page {
    path: String,
    file: RwLock<Option<FileHandle>>,
    neighbours: RwLock<NeighbourMap>,
    settings: SharedSettings,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("path", &self.path)
            .field("file", &*self.file.read())
            .field("neighbours", &self.neighbours.read().len())
            .finish()
    }
}

impl Page {
    /// A page with no file is virtual: referenced, not yet materialised.
    pub fn new(path: impl Into<String>, file: Option<FileHandle>, settings: SharedSettings) -> Self {
        Self {
            path: path.into(),
            file: RwLock::new(file),
            neighbours: RwLock::new(NeighbourMap::new()),
            settings,
        }
    }

    pub fn shared(path: impl Into<String>, file: Option<FileHandle>, settings: SharedSettings) -> PageRef {
        Arc::new(Self::new(path, file, settings))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn file(&self) -> Option<FileHandle> {
        self.file.read().clone()
    }

    /// Last modification of the backing file; `None` while virtual.
    pub fn mtime(&self) -> Option<DateTime<Utc>> {
        self.file.read().as_ref().map(|f| f.modified)
    }

    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    /// Materialise a virtual page, or refresh the file of a real one.
    /// The neighbour map is left as it is.
    pub fn attach_file(&self, file: FileHandle) {
        tracing::trace!(page = %self.path, file = %file.path, "attaching file");
        *self.file.write() = Some(file);
    }

    /// The backing file is gone; the page becomes virtual again.
    pub fn detach_file(&self) {
        tracing::trace!(page = %self.path, "detaching file");
        *self.file.write() = None;
    }

    pub fn is_virtual(&self) -> bool {
        self.file.read().is_none()
    }

    pub fn is_attachment(&self) -> bool {
        self.file.read().as_ref().is_some_and(|f| !f.is_markdown())
    }

    /// Pages not created yet are assumed to be markdown documents.
    pub fn is_markdown(&self) -> bool {
        self.file.read().as_ref().is_none_or(FileHandle::is_markdown)
    }

    pub fn neighbour_count(&self) -> usize {
        self.neighbours.read().len()
    }

    /// Paths of every stored neighbour, unfiltered, in discovery order.
    pub fn neighbour_paths(&self) -> Vec<String> {
        self.neighbours.read().paths().map(str::to_string).collect()
    }

    /// Raw merged record towards `path`, unfiltered and unclassified.
    pub fn relation(&self, path: &str) -> Option<Relation> {
        self.neighbours.read().get(path).cloned()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    pub fn add_parent(&self, page: &PageRef, relation_type: RelationType, definition: Option<&str>) {
        self.add_relation(page, Axis::Parent, relation_type, definition);
    }

    pub fn add_child(&self, page: &PageRef, relation_type: RelationType, definition: Option<&str>) {
        self.add_relation(page, Axis::Child, relation_type, definition);
    }

    pub fn add_friend(&self, page: &PageRef, relation_type: RelationType, definition: Option<&str>) {
        self.add_relation(page, Axis::Friend, relation_type, definition);
    }

    /// Idempotent upsert on one axis. Links to the reserved index page are
    /// dropped.
    pub fn add_relation(
        &self,
        page: &PageRef,
        axis: Axis,
        relation_type: RelationType,
        definition: Option<&str>,
    ) {
        if self.settings.read().is_index_page(page.path()) {
            tracing::trace!(page = %self.path, neighbour = %page.path(), "ignoring link to index page");
            return;
        }
        let created = self.neighbours.write().upsert(page, axis, relation_type, definition);
        tracing::trace!(
            page = %self.path,
            neighbour = %page.path(),
            %axis,
            %relation_type,
            created,
            "relation recorded"
        );
    }

    /// Forget everything recorded towards `path`. Absent paths are fine.
    pub fn unlink_neighbour(&self, path: &str) {
        if self.neighbours.write().remove(path).is_some() {
            tracing::trace!(page = %self.path, neighbour = %path, "neighbour unlinked");
        }
    }

    // ========================================================================
    // Listing queries
    // ========================================================================

    /// Stored neighbours that pass the virtual/attachment display filters,
    /// mapped through `f`. Dangling targets are skipped.
    fn select<T>(&self, mut f: impl FnMut(PageRef, &Relation, Visibility) -> Option<T>) -> Vec<T> {
        let visibility = self.settings.read().visibility();
        let neighbours = self.neighbours.read();
        neighbours
            .iter()
            .filter_map(|(path, relation)| {
                let Some(target) = relation.target() else {
                    tracing::trace!(page = %self.path, neighbour = %path, "skipping dropped neighbour");
                    return None;
                };
                if !visibility.show_virtual_nodes && target.is_virtual() {
                    return None;
                }
                if !visibility.show_attachments && target.is_attachment() {
                    return None;
                }
                f(target, relation, visibility)
            })
            .collect()
    }

    fn list(&self, lens: Axis) -> Vec<Neighbour> {
        self.select(|page, relation, visibility| {
            classify::is_visible(classify::kind(relation, lens), visibility.show_inferred_nodes)
                .then(|| {
                    let axis = relation.axis(lens);
                    Neighbour {
                        page,
                        relation_type: axis.relation_type,
                        type_definition: axis.definition.joined(),
                    }
                })
        })
    }

    fn has(&self, lens: Axis) -> bool {
        !self
            .select(|_, relation, visibility| {
                classify::is_visible(classify::kind(relation, lens), visibility.show_inferred_nodes)
                    .then_some(())
            })
            .is_empty()
    }

    pub fn has_children(&self) -> bool {
        self.has(Axis::Child)
    }

    pub fn get_children(&self) -> Vec<Neighbour> {
        self.list(Axis::Child)
    }

    pub fn has_parents(&self) -> bool {
        self.has(Axis::Parent)
    }

    pub fn get_parents(&self) -> Vec<Neighbour> {
        self.list(Axis::Parent)
    }

    pub fn has_friends(&self) -> bool {
        self.has(Axis::Friend)
    }

    /// Friends, explicit or inferred from mutual inferred parent+child.
    ///
    /// Without a friend type the reported provenance is DEFINED only when
    /// both the parent and child types are DEFINED.
    pub fn get_friends(&self) -> Vec<Neighbour> {
        self.select(|page, relation, visibility| {
            classify::is_visible(classify::friend_kind(relation), visibility.show_inferred_nodes)
                .then(|| Neighbour {
                    page,
                    relation_type: Some(
                        relation
                            .friend
                            .relation_type
                            .unwrap_or_else(|| classify::friend_fallback_type(relation)),
                    ),
                    type_definition: relation.friend.definition.joined(),
                })
        })
    }

    /// One label for the raw record towards `other`: child, else parent,
    /// else friend.
    ///
    /// The friend answer is a fall-through: it is returned even when the
    /// record has no friend axis, with whatever friend fields exist.
    /// Display filters do not apply.
    pub fn get_relation_to_page(&self, other: &Page) -> Option<RelationToPage> {
        let neighbours = self.neighbours.read();
        let relation = neighbours.get(other.path())?;
        let kind = if classify::child_kind(relation).is_some() {
            Axis::Child
        } else if classify::parent_kind(relation).is_some() {
            Axis::Parent
        } else {
            Axis::Friend
        };
        let axis = relation.axis(kind);
        Some(RelationToPage {
            kind,
            relation_type: axis.relation_type,
            type_definition: axis.definition.joined(),
        })
    }

    /// Other children of this page's parents, in discovery order.
    ///
    /// A sibling reached through several parents is listed once; a DEFINED
    /// discovery upgrades an earlier weaker one and is never downgraded.
    pub fn get_siblings(&self) -> Vec<Neighbour> {
        let mut siblings: Vec<Neighbour> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        for parent in self.get_parents() {
            for sibling in parent.page.get_children() {
                if sibling.page.path() == self.path {
                    continue;
                }
                match seen.get(sibling.page.path()) {
                    Some(&i) => {
                        if sibling.relation_type == Some(RelationType::Defined) {
                            siblings[i].relation_type = Some(RelationType::Defined);
                        }
                    }
                    None => {
                        seen.insert(sibling.page.path().to_string(), siblings.len());
                        siblings.push(sibling);
                    }
                }
            }
        }
        siblings
    }
}
