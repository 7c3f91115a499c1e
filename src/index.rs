//! Page index: the registry that owns every page and applies link facts.
//!
//! A fact `(source → target, kind, definition)` is recorded on the source as
//! DEFINED and on the target, on the inverse axis, as INFERRED. The index
//! remembers the facts each source contributed so that a rescan can unlink
//! a page completely and then restore what *other* pages still say about it.
//!
//! ## Limitations
//!
//! - **Single-writer per page**: each call is consistent on its own, but
//!   concurrent rescans of linked pages can interleave.
//! - Relations added through `Page` directly are unknown to the index and
//!   are not restored by a rescan of their target.

use hashbrown::HashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::model::{Axis, FileHandle, RelationType};
use crate::page::{Page, PageRef};
use crate::settings::SharedSettings;
use crate::{Error, Result};

/// Kind of link a fact describes, from the source's point of view.
pub type LinkKind = Axis;

/// A normalised link discovered in a source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkFact {
    pub target: String,
    pub kind: LinkKind,
    /// Free text describing the link, typically the metadata field name.
    pub definition: Option<String>,
}

impl LinkFact {
    pub fn new(target: impl Into<String>, kind: LinkKind, definition: Option<&str>) -> Self {
        Self {
            target: target.into(),
            kind,
            definition: definition.map(str::to_string),
        }
    }
}

// ============================================================================
// PageIndex
// ============================================================================

pub struct PageIndex {
    settings: SharedSettings,
    pages: RwLock<PageTable>,
    /// source path → facts it contributed
    facts: RwLock<HashMap<String, Vec<LinkFact>>>,
}

#[derive(Default)]
struct PageTable {
    by_path: HashMap<String, PageRef>,
    /// creation order
    order: Vec<String>,
}

impl PageIndex {
    pub fn new(settings: SharedSettings) -> Self {
        Self {
            settings,
            pages: RwLock::new(PageTable::default()),
            facts: RwLock::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.pages.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.read().order.is_empty()
    }

    pub fn page(&self, path: &str) -> Option<PageRef> {
        self.pages.read().by_path.get(path).cloned()
    }

    /// Every page, in creation order.
    pub fn pages(&self) -> Vec<PageRef> {
        let table = self.pages.read();
        table
            .order
            .iter()
            .filter_map(|p| table.by_path.get(p).cloned())
            .collect()
    }

    /// Facts recorded for `source`, in the order they were added.
    pub fn facts(&self, source: &str) -> Vec<LinkFact> {
        self.facts.read().get(source).cloned().unwrap_or_default()
    }

    /// Look up a page, creating it when missing. Passing a file materialises
    /// an existing virtual page.
    pub fn get_or_create(&self, path: &str, file: Option<FileHandle>) -> PageRef {
        let page = {
            let mut guard = self.pages.write();
            let table = &mut *guard;
            match table.by_path.get(path) {
                Some(page) => page.clone(),
                None => {
                    tracing::debug!(page = path, is_virtual = file.is_none(), "creating page");
                    let page = Page::shared(path, file.clone(), self.settings.clone());
                    table.order.push(path.to_string());
                    table.by_path.insert(path.to_string(), page.clone());
                    return page;
                }
            }
        };
        if let Some(file) = file {
            if page.is_virtual() {
                tracing::debug!(page = path, "materialising virtual page");
            }
            page.attach_file(file);
        }
        page
    }

    /// Record a fact from `source` and apply it in both directions.
    ///
    /// Links from or to the reserved index page are ignored entirely.
    pub fn add_link(&self, source: &str, fact: LinkFact) {
        {
            let settings = self.settings.read();
            if settings.is_index_page(source) || settings.is_index_page(&fact.target) {
                tracing::trace!(source, neighbour = %fact.target, "ignoring index page link");
                return;
            }
        }
        {
            let mut facts = self.facts.write();
            let recorded = facts.entry(source.to_string()).or_default();
            if !recorded.contains(&fact) {
                recorded.push(fact.clone());
            }
        }
        self.apply(source, &fact);
    }

    fn apply(&self, source: &str, fact: &LinkFact) {
        let from = self.get_or_create(source, None);
        let to = self.get_or_create(&fact.target, None);
        let definition = fact.definition.as_deref();
        from.add_relation(&to, fact.kind, RelationType::Defined, definition);
        to.add_relation(&from, fact.kind.inverse(), RelationType::Inferred, definition);
    }

    /// Register or refresh a document and replace its links.
    pub fn index_document(&self, file: FileHandle, facts: Vec<LinkFact>) -> Result<PageRef> {
        let path = file.path.clone();
        let page = self.get_or_create(&path, Some(file));
        self.rescan(&path, facts)?;
        Ok(page)
    }

    /// Replace the links of `source`: unlink stale edges, restore what other
    /// pages still assert about `source`, then apply `facts`. Virtual pages
    /// that only `source` linked to are dropped.
    pub fn rescan(&self, source: &str, facts: Vec<LinkFact>) -> Result<()> {
        let page = self
            .page(source)
            .ok_or_else(|| Error::NotFound(format!("Page {source}")))?;
        tracing::debug!(page = source, facts = facts.len(), "rescanning page");

        self.facts.write().remove(source);
        let affected = self.detach(&page);
        self.replay_towards(source, &affected);
        for fact in facts {
            self.add_link(source, fact);
        }
        self.prune_orphans(&affected);
        Ok(())
    }

    /// Drop a deleted document. It stays as a virtual page while other pages
    /// still link to it. Virtual pages left without neighbours are dropped
    /// too.
    pub fn remove(&self, path: &str) -> Result<()> {
        let page = self
            .page(path)
            .ok_or_else(|| Error::NotFound(format!("Page {path}")))?;

        self.facts.write().remove(path);
        let affected = self.detach(&page);
        self.replay_towards(path, &affected);

        if page.neighbour_count() == 0 {
            tracing::debug!(page = path, "removing page");
            self.forget(path);
        } else {
            tracing::debug!(page = path, "page still referenced, keeping it as virtual");
            page.detach_file();
        }
        self.prune_orphans(&affected);
        Ok(())
    }

    /// Drop virtual pages among `paths` that nothing links to any more.
    fn prune_orphans(&self, paths: &[String]) {
        for path in paths {
            let orphan = self
                .page(path)
                .is_some_and(|p| p.is_virtual() && p.neighbour_count() == 0);
            if orphan {
                tracing::debug!(page = %path, "pruning orphaned virtual page");
                self.forget(path);
            }
        }
    }

    fn forget(&self, path: &str) {
        let mut table = self.pages.write();
        table.by_path.remove(path);
        table.order.retain(|p| p != path);
    }

    /// Unlink `page` from every neighbour in both directions. Returns the
    /// former neighbour paths.
    fn detach(&self, page: &PageRef) -> Vec<String> {
        let neighbours = page.neighbour_paths();
        for path in &neighbours {
            page.unlink_neighbour(path);
            if let Some(neighbour) = self.page(path) {
                neighbour.unlink_neighbour(page.path());
            }
        }
        neighbours
    }

    /// Re-apply the facts of `sources` that point at `target`.
    fn replay_towards(&self, target: &str, sources: &[String]) {
        let replay: Vec<(String, LinkFact)> = {
            let facts = self.facts.read();
            sources
                .iter()
                .filter(|s| s.as_str() != target)
                .flat_map(|s| {
                    facts
                        .get(s)
                        .into_iter()
                        .flatten()
                        .filter(|f| f.target == target)
                        .map(move |f| (s.clone(), f.clone()))
                })
                .collect()
        };
        for (source, fact) in &replay {
            self.apply(source, fact);
        }
    }
}
