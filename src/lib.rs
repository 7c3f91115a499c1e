//! # page-graph: Typed Relationship Graph over Document Pages
//!
//! Builds a directed parent/child/friend graph over a collection of pages
//! and resolves, per neighbour, one authoritative relation kind.
//!
//! ## Design Principles
//!
//! 1. **Raw signals, resolved on demand**: a `Relation` stores every flag it
//!    was ever given; `classify` turns it into a kind at query time
//! 2. **DEFINED dominates INFERRED**: on every axis, in every merge, and across
//!    sibling discovery paths
//! 3. **Shared pages, weak edges**: `PageIndex` owns the `Arc<Page>` handles,
//!    relations only point at their targets
//! 4. **Normalised input**: raw metadata shapes stop at `extract`; pages only
//!    ever see `(path, kind, definition)` facts
//!
//! ## Quick Start
//!
//! ```rust
//! use page_graph::{LinkFact, LinkKind, PageIndex, RelationType, shared_settings, GraphSettings};
//!
//! let index = PageIndex::new(shared_settings(GraphSettings::default()));
//! index.get_or_create("Projects.md", None);
//! index.add_link("Projects.md", LinkFact::new("Garden.md", LinkKind::Child, Some("children")));
//!
//! let projects = index.page("Projects.md").unwrap();
//! let children = projects.get_children();
//! assert_eq!(children[0].page.path(), "Garden.md");
//! assert_eq!(children[0].relation_type, Some(RelationType::Defined));
//! ```
//!
//! ## Layers
//!
//! | Module | Role |
//! |--------|------|
//! | `model` | Relation records, provenance types, resolved neighbour views |
//! | `classify` | Pure classification rules and visibility policy |
//! | `page` | Page lifecycle, relation store, listing queries |
//! | `index` | Page registry, symmetric inference, rescans |
//! | `extract` | Metadata field values → link facts |
//! | `export` | Cypher and JSON dumps of the classified graph |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod classify;
pub mod page;
pub mod settings;
pub mod index;
pub mod extract;
pub mod export;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Axis, AxisState, Definitions, FileHandle, Neighbour, Relation, RelationToPage,
    RelationType,
};

// ============================================================================
// Re-exports: Pages and registry
// ============================================================================

pub use page::{Page, PageRef};
pub use settings::{GraphSettings, Hierarchy, SharedSettings, Visibility, shared_settings};
pub use index::{LinkFact, LinkKind, PageIndex};
pub use extract::{FieldLink, FieldValue, LinkResolver};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for Error {
    fn from(src: toml::de::Error) -> Self {
        Error::Config(format!("TOML deserialization error: {src}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(src: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON serialization error: {src}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
