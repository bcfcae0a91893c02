//! # ubl-extract
//!
//! Extraction of invoice envelopes, parties, addresses and line items from
//! UBL e-invoicing XML, whatever namespace prefixes the producer chose.
//!
//! The reusable part is the [`xml`] engine: a per-document resolver from
//! canonical namespace keys to declared prefixes, and a set of combinators
//! that find optional or repeated subtrees and convert them only when they
//! are present. The [`ubl`] module is a mapper built on top of it.
//!
//! ## Quick Start
//!
//! ```rust
//! let xml = br#"<ns7:Invoice
//!     xmlns:ns7="urn:oasis:names:specification:ubl:schema:xsd:Invoice-2"
//!     xmlns:CBC="urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2">
//!   <CBC:ID>00012b_EA_TEST</CBC:ID>
//!   <CBC:DocumentCurrencyCode>CAD</CBC:DocumentCurrencyCode>
//! </ns7:Invoice>"#;
//!
//! let invoice = ubl_extract::ubl::parse(xml).unwrap().expect("a UBL invoice");
//! assert_eq!(invoice.envelope.currency.as_deref(), Some("CAD"));
//!
//! // Well-formed XML of another schema is simply not an invoice.
//! assert!(ubl_extract::ubl::parse(b"<rss/>").unwrap().is_none());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Error types |
//! | `xml` | Tree, path expressions, namespace resolver, combinators, loader |
//! | `ubl` (default) | UBL invoice mapper and typed records |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "xml")]
pub mod xml;

#[cfg(feature = "ubl")]
pub mod ubl;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
