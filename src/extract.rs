//! Link extraction boundary.
//!
//! Metadata fields arrive in several shapes: a single link, a list mixing
//! links, strings and nested frontmatter values, or plain text that may
//! contain links. They are resolved here into [`LinkFact`]s; nothing past
//! this module branches on field shape.
//!
//! Link syntax and path resolution belong to the host and are reached
//! through [`LinkResolver`].

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::index::LinkFact;
use crate::settings::Hierarchy;

/// Raw value of one metadata field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A link the host already recognised.
    Link { path: String },
    /// Text that may contain links.
    Text(String),
    List(Vec<FieldValue>),
}

/// Metadata of one page: field name → value.
pub type FieldMap = HashMap<String, FieldValue>;

/// Host-side link handling.
pub trait LinkResolver {
    /// Page path a link points to, relative to the page it appears in.
    fn resolve(&self, link: &str, host_path: &str) -> Option<String>;

    /// Links found in free text, already resolved to page paths.
    fn links_in_text(&self, text: &str, host_path: &str) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLink {
    pub link: String,
    pub field: String,
}

/// Links carried by one field value, deduplicated, first occurrence first.
pub fn read_field<R: LinkResolver + ?Sized>(resolver: &R, host_path: &str, value: &FieldValue) -> Vec<String> {
    let links: Vec<String> = match value {
        FieldValue::Link { path } => resolver.resolve(path, host_path).into_iter().collect(),
        FieldValue::Text(text) => resolver.links_in_text(text, host_path),
        FieldValue::List(items) => {
            let mut links: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    FieldValue::Link { path } => resolver.resolve(path, host_path),
                    _ => None,
                })
                .collect();

            let text = items
                .iter()
                .filter_map(|item| match item {
                    FieldValue::Text(t) => Some(t.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(" ");
            if !text.is_empty() {
                links.extend(resolver.links_in_text(&text, host_path));
            }

            // Frontmatter lists nest their link text one level down.
            links.extend(items.iter().filter_map(|item| match item {
                FieldValue::List(inner) => match inner.first() {
                    Some(FieldValue::Text(t)) => resolver.resolve(t, host_path),
                    _ => None,
                },
                _ => None,
            }));
            links
        }
    };

    let mut seen = HashSet::new();
    links.into_iter().filter(|l| seen.insert(l.clone())).collect()
}

/// Links of the named fields, in name order. Each field is read once.
pub fn field_links<'a, R: LinkResolver + ?Sized>(
    resolver: &R,
    host_path: &str,
    fields: &FieldMap,
    names: impl IntoIterator<Item = &'a str>,
) -> Vec<FieldLink> {
    let mut processed = HashSet::new();
    let mut out = Vec::new();
    for name in names {
        let Some(value) = fields.get(name) else { continue };
        if !processed.insert(name) {
            continue;
        }
        out.extend(read_field(resolver, host_path, value).into_iter().map(|link| FieldLink {
            link,
            field: name.to_string(),
        }));
    }
    out
}

/// Facts for every hierarchy field of a page; the field name becomes the
/// definition.
pub fn link_facts<R: LinkResolver + ?Sized>(
    hierarchy: &Hierarchy,
    resolver: &R,
    host_path: &str,
    fields: &FieldMap,
) -> Vec<LinkFact> {
    field_links(resolver, host_path, fields, hierarchy.fields())
        .into_iter()
        .filter_map(|fl| {
            hierarchy
                .kind_of(&fl.field)
                .map(|kind| LinkFact::new(fl.link, kind, Some(fl.field.as_str())))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::LinkKind;
    use pretty_assertions::assert_eq;

    /// `[[Name]]` → `Name.md`; `missing` never resolves.
    struct Wiki;

    impl LinkResolver for Wiki {
        fn resolve(&self, link: &str, _host: &str) -> Option<String> {
            (link != "missing").then(|| format!("{link}.md"))
        }

        fn links_in_text(&self, text: &str, host: &str) -> Vec<String> {
            text.split("[[")
                .skip(1)
                .filter_map(|s| s.split("]]").next())
                .filter_map(|l| self.resolve(l, host))
                .collect()
        }
    }

    fn link(path: &str) -> FieldValue {
        FieldValue::Link { path: path.into() }
    }

    #[test]
    fn test_single_link_and_text() {
        assert_eq!(read_field(&Wiki, "A.md", &link("B")), vec!["B.md"]);
        assert!(read_field(&Wiki, "A.md", &link("missing")).is_empty());
        assert_eq!(
            read_field(&Wiki, "A.md", &FieldValue::Text("see [[B]] and [[C]]".into())),
            vec!["B.md", "C.md"]
        );
    }

    #[test]
    fn test_list_mixes_shapes_and_dedupes() {
        let value = FieldValue::List(vec![
            link("B"),
            FieldValue::Text("[[C]]".into()),
            FieldValue::Text("[[B]]".into()),
            FieldValue::List(vec![FieldValue::Text("D".into())]),
            link("missing"),
        ]);
        assert_eq!(read_field(&Wiki, "A.md", &value), vec!["B.md", "C.md", "D.md"]);
    }

    #[test]
    fn test_field_links_reads_each_field_once() {
        let mut fields = FieldMap::new();
        fields.insert("up".into(), link("P"));
        fields.insert("tags".into(), link("T"));
        let links = field_links(&Wiki, "A.md", &fields, ["up", "down", "up"]);
        assert_eq!(links, vec![FieldLink { link: "P.md".into(), field: "up".into() }]);
    }

    #[test]
    fn test_link_facts_follow_hierarchy() {
        let mut fields = FieldMap::new();
        fields.insert("parent".into(), link("P"));
        fields.insert("children".into(), FieldValue::Text("[[C1]], [[C2]]".into()));
        fields.insert("related".into(), link("F"));

        let facts = link_facts(&Hierarchy::default(), &Wiki, "A.md", &fields);
        assert_eq!(
            facts,
            vec![
                LinkFact::new("P.md", LinkKind::Parent, Some("parent")),
                LinkFact::new("C1.md", LinkKind::Child, Some("children")),
                LinkFact::new("C2.md", LinkKind::Child, Some("children")),
                LinkFact::new("F.md", LinkKind::Friend, Some("related")),
            ]
        );
    }

    #[test]
    fn test_field_value_from_json() {
        let v: FieldValue =
            serde_json::from_str(r#"[{"path": "B"}, "[[C]]", ["D"]]"#).unwrap();
        assert_eq!(
            v,
            FieldValue::List(vec![
                link("B"),
                FieldValue::Text("[[C]]".into()),
                FieldValue::List(vec![FieldValue::Text("D".into())]),
            ])
        );
    }
}
