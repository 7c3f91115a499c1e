//! Graph settings: display filters, inference visibility, the reserved
//! index page and the field hierarchy.
//!
//! Pages hold a [`SharedSettings`] handle and read it on every query, so a
//! toggled flag takes effect immediately everywhere.

use std::fs::read_to_string;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::index::LinkKind;
use crate::Result;

/// Settings handle shared by the index and every page.
pub type SharedSettings = Arc<RwLock<GraphSettings>>;

pub fn shared_settings(settings: GraphSettings) -> SharedSettings {
    Arc::new(RwLock::new(settings))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    /// List neighbours that have no backing file.
    pub show_virtual_nodes: bool,
    /// List neighbours backed by non-markdown files.
    pub show_attachments: bool,
    /// List neighbours whose classification is only INFERRED.
    pub show_inferred_nodes: bool,
    /// Path of the page the host renders the graph into. Links to it are
    /// never recorded.
    pub index_page_path: Option<String>,
    pub hierarchy: Hierarchy,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            show_virtual_nodes: true,
            show_attachments: true,
            show_inferred_nodes: true,
            index_page_path: None,
            hierarchy: Hierarchy::default(),
        }
    }
}

impl GraphSettings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Attempting to read graph settings from: {:?}", path);
        if !path.exists() {
            tracing::debug!("Settings file not found, using defaults.");
            return Ok(Self::default());
        }
        let content = read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn visibility(&self) -> Visibility {
        Visibility {
            show_virtual_nodes: self.show_virtual_nodes,
            show_attachments: self.show_attachments,
            show_inferred_nodes: self.show_inferred_nodes,
        }
    }

    pub fn is_index_page(&self, path: &str) -> bool {
        self.index_page_path.as_deref() == Some(path)
    }
}

/// Copy of the three display flags, taken once per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub show_virtual_nodes: bool,
    pub show_attachments: bool,
    pub show_inferred_nodes: bool,
}

/// Metadata field names that carry parent, child and friend links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hierarchy {
    pub parents: Vec<String>,
    pub children: Vec<String>,
    pub friends: Vec<String>,
}

impl Default for Hierarchy {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|n| n.to_string()).collect();
        Self {
            parents: owned(&["parent", "parents", "up"]),
            children: owned(&["child", "children", "down"]),
            friends: owned(&["friend", "friends", "jump", "related"]),
        }
    }
}

impl Hierarchy {
    /// Kind of link a field describes. Parents win over children over friends
    /// when a name is listed more than once.
    pub fn kind_of(&self, field: &str) -> Option<LinkKind> {
        if self.parents.iter().any(|f| f == field) {
            Some(LinkKind::Parent)
        } else if self.children.iter().any(|f| f == field) {
            Some(LinkKind::Child)
        } else if self.friends.iter().any(|f| f == field) {
            Some(LinkKind::Friend)
        } else {
            None
        }
    }

    /// Every field name, in parents → children → friends order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.parents
            .iter()
            .chain(&self.children)
            .chain(&self.friends)
            .map(String::as_str)
    }
}
