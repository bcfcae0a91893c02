//! Namespace-resilient optional extraction over XML trees.
//!
//! # Pieces
//!
//! - [`Document`] / [`Node`]: an owned tree parsed with quick-xml, plus
//!   read-only node handles borrowed from it.
//! - [`PathExpr`]: location paths such as `cac:InvoicePeriod/cbc:StartDate`.
//! - [`Namespaces`]: per-document resolver from canonical namespace keys to
//!   the prefixes that document declares.
//! - The `find_*` combinators: "find this optional subtree and, if present,
//!   convert it", with absence as `None` instead of an error.
//! - [`load_and_map`]: parse, locate the schema root, run a mapper.
//!
//! # Example
//!
//! ```
//! use ubl_extract::xml::{NamespaceKey, Namespaces, Node, PathExpr, find_one_text, load_and_map};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Ns {
//!     Note,
//! }
//!
//! impl NamespaceKey for Ns {
//!     const ALL: &'static [Self] = &[Ns::Note];
//!     fn urn(self) -> &'static str {
//!         "urn:example:note"
//!     }
//!     fn key(self) -> &'static str {
//!         "note"
//!     }
//! }
//!
//! fn root(ns: &Namespaces<'_, Ns>) -> PathExpr {
//!     ns.qname(Ns::Note, "note")
//! }
//!
//! fn body(ns: &Namespaces<'_, Ns>, el: Node<'_>) -> String {
//!     find_one_text(el, ns.qname(Ns::Note, "body")).unwrap_or_default()
//! }
//!
//! let xml = br#"<n:note xmlns:n="urn:example:note"><n:body>hi</n:body></n:note>"#;
//! assert_eq!(load_and_map(xml, root, body).unwrap().as_deref(), Some("hi"));
//! ```

mod loader;
mod maybes;
pub mod namespace;
mod path;
mod tree;

pub use loader::{load, load_and_map, load_and_map_with, map_document};
pub use maybes::*;
pub use namespace::{NamespaceKey, Namespaces, PrefixBinding};
pub use path::PathExpr;
pub use tree::{Descendants, Document, NamespaceDecl, Node, NodeId, ParseOptions, XML_NAMESPACE};
