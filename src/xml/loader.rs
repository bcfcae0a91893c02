//! Parse a document, find its schema root and hand it to a mapper.
//!
//! Malformed XML is an error. A well-formed document of another schema, or
//! one whose mapping comes out empty, is `Ok(None)`.

use tracing::debug;

use super::maybes::{IsEmpty, find_one};
use super::namespace::{NamespaceKey, Namespaces};
use super::path::PathExpr;
use super::tree::{Document, Node, ParseOptions};
use crate::core::ExtractError;

/// Parse `bytes` with the default options.
pub fn load(bytes: &[u8]) -> Result<Document, ExtractError> {
    Document::parse(bytes)
}

/// Locate the root of an already parsed document and map it.
///
/// `root_path` builds the path of the schema's root element from a fresh
/// resolver for `doc`; it is evaluated from the document node. `None` when
/// the path cannot be resolved, nothing matches, or `map` yields an empty
/// record.
pub fn map_document<'a, K, T>(
    doc: &'a Document,
    root_path: impl FnOnce(&Namespaces<'a, K>) -> PathExpr,
    map: impl FnOnce(&Namespaces<'a, K>, Node<'a>) -> T,
) -> Option<T>
where
    K: NamespaceKey,
    T: IsEmpty,
{
    let ns = Namespaces::new(doc);
    let path = root_path(&ns);
    if !path.is_resolved() {
        debug!("root namespace not declared, not an instance of this schema");
        return None;
    }

    let Some(root) = find_one(doc.node(), &path) else {
        debug!(%path, "root element not found");
        return None;
    };

    let record = map(&ns, root);
    (!record.is_empty()).then_some(record)
}

/// Parse, locate the root element and map it in one pass.
///
/// Malformed XML is an error. A well-formed document of some other schema
/// is `Ok(None)`.
pub fn load_and_map<K, T>(
    bytes: &[u8],
    root_path: impl for<'d> FnOnce(&Namespaces<'d, K>) -> PathExpr,
    map: impl for<'d> FnOnce(&Namespaces<'d, K>, Node<'d>) -> T,
) -> Result<Option<T>, ExtractError>
where
    K: NamespaceKey,
    T: IsEmpty,
{
    load_and_map_with(bytes, &ParseOptions::default(), root_path, map)
}

/// [`load_and_map`] with explicit parser options.
pub fn load_and_map_with<K, T>(
    bytes: &[u8],
    options: &ParseOptions,
    root_path: impl for<'d> FnOnce(&Namespaces<'d, K>) -> PathExpr,
    map: impl for<'d> FnOnce(&Namespaces<'d, K>, Node<'d>) -> T,
) -> Result<Option<T>, ExtractError>
where
    K: NamespaceKey,
    T: IsEmpty,
{
    let doc = Document::parse_with(bytes, options)?;
    Ok(map_document(&doc, root_path, map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::xml::find_one_text;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Feed {
        Atom,
    }

    impl NamespaceKey for Feed {
        const ALL: &'static [Self] = &[Feed::Atom];

        fn urn(self) -> &'static str {
            "http://www.w3.org/2005/Atom"
        }

        fn key(self) -> &'static str {
            "atom"
        }
    }

    fn root_path(ns: &Namespaces<'_, Feed>) -> PathExpr {
        ns.qname(Feed::Atom, "feed")
    }

    fn title(ns: &Namespaces<'_, Feed>, root: Node<'_>) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        if let Some(text) = find_one_text(root, ns.qname(Feed::Atom, "title")) {
            out.insert("title".to_string(), text);
        }
        out
    }

    #[test]
    fn maps_matching_documents() {
        let xml = br#"<a:feed xmlns:a="http://www.w3.org/2005/Atom"><a:title>News</a:title></a:feed>"#;
        let record = load_and_map(xml, root_path, title).unwrap().unwrap();
        assert_eq!(record["title"], "News");
    }

    #[test]
    fn other_schemas_are_absent() {
        let xml = br#"<rss><channel><title>News</title></channel></rss>"#;
        assert_eq!(load_and_map(xml, root_path, title).unwrap(), None);
    }

    #[test]
    fn empty_records_are_absent() {
        let xml = br#"<feed xmlns="http://www.w3.org/2005/Atom"/>"#;
        assert_eq!(load_and_map(xml, root_path, title).unwrap(), None);
    }

    #[test]
    fn invalid_root_paths_are_absent() {
        let xml = br#"<feed xmlns="http://www.w3.org/2005/Atom"><title>x</title></feed>"#;
        let mapped = load_and_map(xml, |_: &Namespaces<'_, Feed>| PathExpr::new("feed["), title);
        assert_eq!(mapped.unwrap(), None);
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let err = load_and_map(b"<feed>", root_path, title).unwrap_err();
        assert!(matches!(err, ExtractError::Xml(_)));
    }
}
