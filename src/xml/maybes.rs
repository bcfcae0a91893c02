//! Presence-aware extraction combinators.
//!
//! Every function looks for an optional subtree below a search root and
//! returns `None` when nothing matches. Conversions handed to a combinator
//! run only on a match, so mappers can try field after field without ever
//! branching on presence themselves:
//!
//! ```
//! use ubl_extract::xml::{Document, find_one_text, find_one_int};
//!
//! let doc = Document::parse(b"<r><name>Widget</name><qty>3</qty></r>").unwrap();
//! let root = doc.root_element().unwrap();
//! assert_eq!(find_one_text(root, "name").as_deref(), Some("Widget"));
//! assert_eq!(find_one_int(root, "qty"), Some(3));
//! assert_eq!(find_one_text(root, "colour"), None);
//! ```
//!
//! Unresolved or invalid path expressions count as "no match" for the one
//! call that used them.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::path::PathExpr;
use super::tree::Node;

/// Snapshot of requested attributes. Attributes the node lacks are left out.
pub type Attributes = BTreeMap<String, String>;

/// Attribute carrying the language of a human-readable text.
pub const LANGUAGE_ATTRIBUTE: &str = "languageID";

/// Structures that can be empty.
///
/// [`find_one_converted`] and the loader treat an empty conversion result
/// exactly like a missing node.
pub trait IsEmpty {
    fn is_empty(&self) -> bool;
}

impl<T> IsEmpty for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl<K, V> IsEmpty for BTreeMap<K, V> {
    fn is_empty(&self) -> bool {
        BTreeMap::is_empty(self)
    }
}

impl<K, V, S> IsEmpty for HashMap<K, V, S> {
    fn is_empty(&self) -> bool {
        HashMap::is_empty(self)
    }
}

impl IsEmpty for String {
    fn is_empty(&self) -> bool {
        String::is_empty(self)
    }
}

/// `Some` counts as content even when the wrapped value is itself empty.
impl<T> IsEmpty for Option<T> {
    fn is_empty(&self) -> bool {
        self.is_none()
    }
}

impl<T: IsEmpty + ?Sized> IsEmpty for Box<T> {
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

/// Text together with its declared language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedText {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

fn select<'d>(root: Node<'d>, path: PathExpr) -> Vec<Node<'d>> {
    match root.select(&path) {
        Ok(nodes) => nodes,
        Err(e) => {
            debug!(%path, error = %e, "path lookup skipped");
            Vec::new()
        }
    }
}

fn snapshot(node: Node<'_>, names: &[&str]) -> Attributes {
    names
        .iter()
        .filter_map(|name| {
            node.attribute(name)
                .map(|value| ((*name).to_string(), value.to_string()))
        })
        .collect()
}

/// First match in document order.
pub fn find_one<'d>(root: Node<'d>, path: impl Into<PathExpr>) -> Option<Node<'d>> {
    select(root, path.into()).into_iter().next()
}

/// First match plus a snapshot of the named attributes it carries.
pub fn find_one_with_attrs<'d>(
    root: Node<'d>,
    path: impl Into<PathExpr>,
    names: &[&str],
) -> Option<(Node<'d>, Attributes)> {
    find_one(root, path).map(|node| (node, snapshot(node, names)))
}

/// All matches in document order; `None` rather than an empty list.
pub fn find_many<'d>(root: Node<'d>, path: impl Into<PathExpr>) -> Option<Vec<Node<'d>>> {
    let nodes = select(root, path.into());
    (!nodes.is_empty()).then_some(nodes)
}

/// Evaluate independent optional paths below one parent.
///
/// Only labels whose path matched appear in the result; `None` when no
/// label matched.
pub fn find_set<'d, L, P>(
    root: Node<'d>,
    set: impl IntoIterator<Item = (L, P)>,
) -> Option<BTreeMap<L, Node<'d>>>
where
    L: Ord,
    P: Into<PathExpr>,
{
    let found: BTreeMap<L, Node<'d>> = set
        .into_iter()
        .filter_map(|(label, path)| find_one(root, path).map(|node| (label, node)))
        .collect();
    (!found.is_empty()).then_some(found)
}

/// Text of the first match.
pub fn find_one_text(root: Node<'_>, path: impl Into<PathExpr>) -> Option<String> {
    find_one(root, path).map(|node| node.text())
}

/// Text of the first match plus the named attributes it carries.
pub fn find_one_text_with_attrs(
    root: Node<'_>,
    path: impl Into<PathExpr>,
    names: &[&str],
) -> Option<(String, Attributes)> {
    find_one_with_attrs(root, path, names).map(|(node, attrs)| (node.text(), attrs))
}

/// Text of the first match parsed as a base-10 integer.
///
/// Surrounding whitespace is ignored. Text that is not an integer yields
/// `None`, the same as a missing node.
pub fn find_one_int(root: Node<'_>, path: impl Into<PathExpr>) -> Option<i64> {
    let text = find_one_text(root, path)?;
    match text.trim().parse::<i64>() {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(text = %text, error = %e, "non-numeric text treated as absent");
            None
        }
    }
}

/// The node's text with its `languageID`, if declared.
pub fn tagged_text(node: Node<'_>) -> TaggedText {
    TaggedText {
        text: node.text(),
        language: node.attribute(LANGUAGE_ATTRIBUTE).map(str::to_string),
    }
}

/// Text of the first match, tagged with its declared language.
pub fn find_one_tagged_text(root: Node<'_>, path: impl Into<PathExpr>) -> Option<TaggedText> {
    find_one(root, path).map(tagged_text)
}

/// Convert the first match; an empty conversion result counts as no match.
pub fn find_one_converted<'d, T, F>(root: Node<'d>, path: impl Into<PathExpr>, convert: F) -> Option<T>
where
    T: IsEmpty,
    F: FnOnce(Node<'d>) -> T,
{
    find_one(root, path)
        .map(convert)
        .filter(|converted| !converted.is_empty())
}

/// Convert every match, keeping document order; `None` when nothing matched.
pub fn find_many_converted<'d, T, F>(
    root: Node<'d>,
    path: impl Into<PathExpr>,
    convert: F,
) -> Option<Vec<T>>
where
    F: FnMut(Node<'d>) -> T,
{
    find_many(root, path).map(|nodes| nodes.into_iter().map(convert).collect())
}

/// [`find_set`] flattened to the text of every matched label.
pub fn find_set_text<L, P>(
    root: Node<'_>,
    set: impl IntoIterator<Item = (L, P)>,
) -> Option<BTreeMap<L, String>>
where
    L: Ord,
    P: Into<PathExpr>,
{
    find_set(root, set).map(|found| {
        found
            .into_iter()
            .map(|(label, node)| (label, node.text()))
            .collect()
    })
}

/// Texts of several optional single-node paths, in the order given.
///
/// Paths without a match are skipped; `None` when none matched.
pub fn find_list_text<P>(root: Node<'_>, paths: impl IntoIterator<Item = P>) -> Option<Vec<String>>
where
    P: Into<PathExpr>,
{
    let texts: Vec<String> = paths
        .into_iter()
        .filter_map(|path| find_one_text(root, path))
        .collect();
    (!texts.is_empty()).then_some(texts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Document;
    use std::cell::Cell;

    const TREE: &str = r#"<a id="a">
  <aa id="a-aa0" x="aa-x" y="aa-y"><aaa id="a-aa0-aaa0"/><aab id="a-aa0-aab"/><aaa id="a-aa0-aaa1"/><ac id="a-aa0-ac"/></aa>
  <aa id="a-aa1"/>
  <ab id="a-ab0">A-AB0</ab>
  <ab id="a-ab1">A-AB1</ab>
  <ac id="a-ac" x="ac-x" y="ac-y" languageID="en">A-AC</ac>
  <ad> 1 </ad>
  <ae>1234</ae>
  <af>12abc</af>
</a>"#;

    fn id(node: Node<'_>) -> String {
        node.attribute("id").unwrap_or_default().to_string()
    }

    #[test]
    fn find_one_takes_first_in_document_order() {
        let doc = Document::parse(TREE.as_bytes()).unwrap();
        let root = doc.root_element().unwrap();
        assert_eq!(find_one(root, "aa").map(id).as_deref(), Some("a-aa0"));
        assert_eq!(find_one(root, "aa/ac").map(id).as_deref(), Some("a-aa0-ac"));
        assert_eq!(find_one(root, "zz"), None);
    }

    #[test]
    fn attribute_snapshot_omits_missing_names() {
        let doc = Document::parse(TREE.as_bytes()).unwrap();
        let root = doc.root_element().unwrap();
        let (_, attrs) = find_one_with_attrs(root, "aa", &["x", "y", "z"]).unwrap();
        assert_eq!(
            attrs,
            Attributes::from([("x".into(), "aa-x".into()), ("y".into(), "aa-y".into())])
        );
    }

    #[test]
    fn find_many_is_absent_when_empty() {
        let doc = Document::parse(TREE.as_bytes()).unwrap();
        let root = doc.root_element().unwrap();
        let ids: Vec<_> = find_many(root, "aa/aaa").unwrap().into_iter().map(id).collect();
        assert_eq!(ids, ["a-aa0-aaa0", "a-aa0-aaa1"]);
        assert_eq!(find_many(root, "zz"), None);
    }

    #[test]
    fn set_keeps_only_matched_labels() {
        let doc = Document::parse(TREE.as_bytes()).unwrap();
        let root = doc.root_element().unwrap();
        let found = find_set(root, [("k0", "aa"), ("k1", "zz"), ("k2", "aa/aab")]).unwrap();
        let ids: Vec<_> = found.iter().map(|(k, n)| (*k, id(*n))).collect();
        assert_eq!(ids, [("k0", "a-aa0".to_string()), ("k2", "a-aa0-aab".to_string())]);
        assert_eq!(find_set(root, [("k", "zz")]), None);

        let texts = find_set_text(root, [("first", "ab"), ("last", "ac")]).unwrap();
        assert_eq!(texts["first"], "A-AB0");
        assert_eq!(texts["last"], "A-AC");
    }

    #[test]
    fn integers_and_non_numeric_text() {
        let doc = Document::parse(TREE.as_bytes()).unwrap();
        let root = doc.root_element().unwrap();
        assert_eq!(find_one_int(root, "ad"), Some(1));
        assert_eq!(find_one_int(root, "ae"), Some(1234));
        assert_eq!(find_one_int(root, "af"), None);
        assert_eq!(find_one_int(root, "zz"), None);
    }

    #[test]
    fn tagged_text_carries_language() {
        let doc = Document::parse(TREE.as_bytes()).unwrap();
        let root = doc.root_element().unwrap();
        assert_eq!(
            find_one_tagged_text(root, "ac"),
            Some(TaggedText {
                text: "A-AC".into(),
                language: Some("en".into())
            })
        );
        assert_eq!(find_one_tagged_text(root, "ab").unwrap().language, None);
    }

    #[test]
    fn conversions_never_run_without_a_match() {
        let doc = Document::parse(TREE.as_bytes()).unwrap();
        let root = doc.root_element().unwrap();
        let calls = Cell::new(0);
        let convert = |n: Node<'_>| {
            calls.set(calls.get() + 1);
            vec![id(n)]
        };
        assert_eq!(find_one_converted(root, "zz", convert), None);
        assert_eq!(find_many_converted(root, "zz", convert), None);
        assert_eq!(find_one_converted(root, PathExpr::unresolved(), convert), None);
        assert_eq!(calls.get(), 0);

        assert_eq!(find_one_converted(root, "ac", convert), Some(vec!["a-ac".to_string()]));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn empty_conversion_is_absent() {
        let doc = Document::parse(TREE.as_bytes()).unwrap();
        let root = doc.root_element().unwrap();
        assert_eq!(find_one_converted(root, "aa", |_| Vec::<String>::new()), None);
        assert_eq!(find_one_converted(root, "aa", |_| BTreeMap::<String, String>::new()), None);
    }

    #[test]
    fn list_text_skips_missing_paths() {
        let doc = Document::parse(TREE.as_bytes()).unwrap();
        let root = doc.root_element().unwrap();
        assert_eq!(
            find_list_text(root, ["ac", "zz", "ab"]),
            Some(vec!["A-AC".to_string(), "A-AB0".to_string()])
        );
        assert_eq!(find_list_text(root, ["zz"]), None);
    }
}
