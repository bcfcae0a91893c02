//! Canonical namespace keys and their per-document prefix bindings.
//!
//! Producers of the same schema pick their own prefixes (`cbc`, `CBC`,
//! `ns4`, or the default namespace). Mappers name namespaces by a fixed
//! canonical key instead and let [`Namespaces`] find out which prefix the
//! document at hand uses for the key's URN.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::OnceLock;

use tracing::{debug, trace};

use super::path::PathExpr;
use super::tree::Document;

/// Prefix reported for a URN that is only declared as the default namespace.
///
/// [`Document::prefix_urn`] binds it back to the default namespace when paths
/// are compiled.
pub const DEFAULT_PREFIX: &str = "xmlns";

/// A fixed table of canonical namespace keys.
///
/// Implemented by a field-less enum per schema family; `ALL` lists every key.
pub trait NamespaceKey: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    const ALL: &'static [Self];

    /// The URN this key stands for in every document.
    fn urn(self) -> &'static str;

    /// Short symbolic name, e.g. `cbc`.
    fn key(self) -> &'static str;
}

/// Canonical key to prefix mapping for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixBinding<K: NamespaceKey> {
    prefixes: HashMap<K, String>,
}

impl<K: NamespaceKey> PrefixBinding<K> {
    /// Invert the document's declarations and look up every canonical URN.
    ///
    /// A URN declared under several prefixes binds to the first explicit
    /// prefix in document order; the default namespace is used only when no
    /// explicit prefix exists for the URN.
    pub fn from_document(doc: &Document) -> Self {
        let declarations = doc.namespace_declarations();
        let mut by_urn: HashMap<&str, &str> = HashMap::new();

        for decl in declarations {
            if let Some(prefix) = &decl.prefix {
                by_urn.entry(decl.urn.as_str()).or_insert(prefix.as_str());
            }
        }
        for decl in declarations.iter().filter(|decl| decl.prefix.is_none()) {
            by_urn.entry(decl.urn.as_str()).or_insert(DEFAULT_PREFIX);
        }

        let prefixes: HashMap<K, String> = K::ALL
            .iter()
            .filter_map(|key| {
                by_urn
                    .get(key.urn())
                    .map(|prefix| (*key, (*prefix).to_string()))
            })
            .collect();

        trace!(bound = prefixes.len(), known = K::ALL.len(), "namespace prefixes bound");
        Self { prefixes }
    }

    pub fn get(&self, key: K) -> Option<&str> {
        self.prefixes.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Bound keys in table order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &str)> + '_ {
        K::ALL
            .iter()
            .filter_map(|key| self.get(*key).map(|prefix| (*key, prefix)))
    }
}

/// Namespace resolver for a single document.
///
/// Created once per document and passed next to it through the mapping.
/// The binding is computed on first use and kept until the resolver is
/// dropped; a new document always gets a new resolver. The cache is
/// synchronised, so a resolver can be shared by threads walking distinct
/// subtrees of the same document.
pub struct Namespaces<'d, K: NamespaceKey> {
    doc: &'d Document,
    binding: OnceLock<PrefixBinding<K>>,
}

impl<K: NamespaceKey> fmt::Debug for Namespaces<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespaces")
            .field("binding", &self.binding.get())
            .finish()
    }
}

impl<'d, K: NamespaceKey> Namespaces<'d, K> {
    /// A resolver that binds lazily on the first lookup.
    pub fn new(doc: &'d Document) -> Self {
        Self {
            doc,
            binding: OnceLock::new(),
        }
    }

    /// A resolver whose binding is computed up front.
    pub fn bind(doc: &'d Document) -> Self {
        let ns = Self::new(doc);
        ns.binding();
        ns
    }

    pub fn document(&self) -> &'d Document {
        self.doc
    }

    pub fn binding(&self) -> &PrefixBinding<K> {
        self.binding
            .get_or_init(|| PrefixBinding::from_document(self.doc))
    }

    /// The prefix this document uses for `key`, if it declares the key's URN.
    pub fn resolve(&self, key: K) -> Option<&str> {
        self.binding().get(key)
    }

    /// `prefix:local` for `key`, or an unresolved path when `key` is unbound.
    ///
    /// When the document reuses the prefix for another URN elsewhere, so that
    /// `prefix:` would not bind back to the key's URN, the step is written as
    /// `Q{urn}local` instead.
    pub fn qname(&self, key: K, local: &str) -> PathExpr {
        match self.resolve(key) {
            Some(prefix) if self.doc.prefix_urn(prefix) == Some(key.urn()) => {
                PathExpr::new(format!("{prefix}:{local}"))
            }
            Some(_) => PathExpr::new(format!("Q{{{}}}{local}", key.urn())),
            None => {
                debug!(namespace = key.key(), local, "namespace not declared");
                PathExpr::unresolved()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Test {
        A,
        B,
    }

    impl NamespaceKey for Test {
        const ALL: &'static [Self] = &[Test::A, Test::B];

        fn urn(self) -> &'static str {
            match self {
                Test::A => "urn:test:a",
                Test::B => "urn:test:b",
            }
        }

        fn key(self) -> &'static str {
            match self {
                Test::A => "a",
                Test::B => "b",
            }
        }
    }

    #[test]
    fn binds_declared_prefixes_only() {
        let doc = Document::parse(br#"<r xmlns:ns7="urn:test:a"/>"#).unwrap();
        let ns = Namespaces::<Test>::new(&doc);
        assert_eq!(ns.resolve(Test::A), Some("ns7"));
        assert_eq!(ns.resolve(Test::B), None);
        assert_eq!(ns.qname(Test::A, "X").as_str(), Some("ns7:X"));
        assert!(!ns.qname(Test::B, "X").is_resolved());
    }

    #[test]
    fn explicit_prefix_beats_default_and_first_wins() {
        let doc = Document::parse(
            br#"<r xmlns="urn:test:a" xmlns:one="urn:test:a" xmlns:two="urn:test:a"/>"#,
        )
        .unwrap();
        assert_eq!(Namespaces::<Test>::bind(&doc).resolve(Test::A), Some("one"));
    }

    #[test]
    fn default_namespace_uses_reserved_prefix() {
        let doc = Document::parse(br#"<r xmlns="urn:test:b"><x/></r>"#).unwrap();
        let ns = Namespaces::<Test>::new(&doc);
        assert_eq!(ns.resolve(Test::B), Some(DEFAULT_PREFIX));
        let root = doc.root_element().unwrap();
        assert_eq!(root.select(ns.qname(Test::B, "x")).unwrap().len(), 1);
    }

    #[test]
    fn nested_declarations_count() {
        let doc = Document::parse(br#"<r><inner xmlns:deep="urn:test:b"/></r>"#).unwrap();
        let binding = PrefixBinding::<Test>::from_document(&doc);
        assert_eq!(binding.get(Test::B), Some("deep"));
        assert_eq!(binding.iter().collect::<Vec<_>>(), vec![(Test::B, "deep")]);
        assert_eq!(binding.len(), 1);
    }

    #[test]
    fn reused_prefix_still_reaches_each_urn() {
        let doc = Document::parse(
            br#"<r><x xmlns:p="urn:test:a"><p:i/></x><y xmlns:p="urn:test:b"><p:j/></y></r>"#,
        )
        .unwrap();
        let ns = Namespaces::<Test>::new(&doc);
        assert_eq!(ns.resolve(Test::A), Some("p"));
        assert_eq!(ns.resolve(Test::B), Some("p"));
        assert_eq!(ns.qname(Test::A, "i").as_str(), Some("p:i"));
        assert_eq!(ns.qname(Test::B, "j").as_str(), Some("Q{urn:test:b}j"));

        let root = doc.root_element().unwrap();
        for (key, local) in [(Test::A, "i"), (Test::B, "j")] {
            let found = root.select(PathExpr::new("*") / ns.qname(key, local)).unwrap();
            assert_eq!(found.len(), 1, "{key:?}");
            assert_eq!(found[0].namespace(), Some(key.urn()));
        }
    }

    #[test]
    fn second_default_namespace_is_bound() {
        let doc = Document::parse(
            br#"<r xmlns="urn:test:a"><inner xmlns="urn:test:b"><leaf/></inner></r>"#,
        )
        .unwrap();
        let ns = Namespaces::<Test>::new(&doc);
        assert_eq!(ns.resolve(Test::A), Some(DEFAULT_PREFIX));
        assert_eq!(ns.resolve(Test::B), Some(DEFAULT_PREFIX));
        let root = doc.root_element().unwrap();
        let path = ns.qname(Test::B, "inner") / ns.qname(Test::B, "leaf");
        assert_eq!(root.select(path).unwrap().len(), 1);
    }

    #[test]
    fn resolvers_do_not_leak_between_documents() {
        let first = Document::parse(br#"<r xmlns:p="urn:test:a"/>"#).unwrap();
        let second = Document::parse(br#"<r xmlns:q="urn:test:a"/>"#).unwrap();
        assert_eq!(Namespaces::<Test>::new(&first).resolve(Test::A), Some("p"));
        assert_eq!(Namespaces::<Test>::new(&second).resolve(Test::A), Some("q"));
    }
}
