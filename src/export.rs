//! Graph export: dump the classified graph as Cypher or JSON.
//!
//! Every page is written once; its edges are the neighbours each page lists
//! under its own child, parent and friend lenses, with the current display
//! settings applied.
//!
//! ```text
//! PageIndex → export_cypher_dump() → CREATE/MATCH statements
//!   → paste into Neo4j Browser, or pipe into cypher-shell
//! PageIndex → export_json() → GraphSnapshot
//! ```

use std::io::Write;

use serde::Serialize;

use crate::index::PageIndex;
use crate::model::{Neighbour, RelationType};
use crate::page::Page;
use crate::Result;

/// Serializable view of the classified graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSnapshot {
    pub pages: Vec<PageSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSnapshot {
    pub path: String,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
    pub children: Vec<EdgeSnapshot>,
    pub parents: Vec<EdgeSnapshot>,
    pub friends: Vec<EdgeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeSnapshot {
    pub path: String,
    #[serde(rename = "relationType")]
    pub relation_type: Option<RelationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl From<&Neighbour> for EdgeSnapshot {
    fn from(n: &Neighbour) -> Self {
        Self {
            path: n.page.path().to_string(),
            relation_type: n.relation_type,
            definition: n.type_definition.clone(),
        }
    }
}

impl PageSnapshot {
    pub fn of(page: &Page) -> Self {
        let edges = |ns: Vec<Neighbour>| -> Vec<EdgeSnapshot> { ns.iter().map(EdgeSnapshot::from).collect() };
        Self {
            path: page.path().to_string(),
            is_virtual: page.is_virtual(),
            children: edges(page.get_children()),
            parents: edges(page.get_parents()),
            friends: edges(page.get_friends()),
        }
    }
}

pub fn snapshot(index: &PageIndex) -> GraphSnapshot {
    GraphSnapshot {
        pages: index.pages().iter().map(|p| PageSnapshot::of(p)).collect(),
    }
}

/// Write the snapshot as pretty-printed JSON.
pub fn export_json(index: &PageIndex, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &snapshot(index))?;
    writeln!(writer)?;
    Ok(())
}

/// Export the graph as a Cypher script.
///
/// Pages become `:Page` nodes keyed by `path`; every listed neighbour
/// becomes a `CHILD`, `PARENT` or `FRIEND` relationship from the listing
/// page.
pub fn export_cypher_dump(index: &PageIndex, writer: &mut dyn Write) -> Result<()> {
    let snapshot = snapshot(index);
    let edge_count: usize = snapshot
        .pages
        .iter()
        .map(|p| p.children.len() + p.parents.len() + p.friends.len())
        .sum();

    // Header
    writeln!(writer, "// Cypher export of the page graph")?;
    writeln!(writer, "// Pages: {}", snapshot.pages.len())?;
    writeln!(writer, "// Relationships: {}", edge_count)?;
    writeln!(writer)?;

    for page in &snapshot.pages {
        writeln!(
            writer,
            "CREATE (:Page {{path: {}, virtual: {}}});",
            quote(&page.path),
            page.is_virtual
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "// Relationships")?;

    for page in &snapshot.pages {
        let lenses = [("CHILD", &page.children), ("PARENT", &page.parents), ("FRIEND", &page.friends)];
        for (rel_type, edges) in lenses {
            for edge in edges {
                writeln!(
                    writer,
                    "MATCH (a:Page {{path: {}}}), (b:Page {{path: {}}}) CREATE (a)-[:{} {{{}}}]->(b);",
                    quote(&page.path),
                    quote(&edge.path),
                    rel_type,
                    format_edge_properties(edge),
                )?;
            }
        }
    }

    Ok(())
}

/// Format an edge's properties as a Cypher property list (key: value, ...).
fn format_edge_properties(edge: &EdgeSnapshot) -> String {
    let mut parts = vec![format!(
        "relationType: {}",
        edge.relation_type.map_or("null".to_string(), |t| quote(t.as_str()))
    )];
    if let Some(definition) = &edge.definition {
        parts.push(format!("definition: {}", quote(definition)));
    }
    parts.join(", ")
}

/// Single-quoted Cypher string literal.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}
