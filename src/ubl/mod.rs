//! UBL 2.x invoice mapping.
//!
//! Maps `Invoice` documents to typed [`Invoice`] records. Producers
//! declare the UBL namespaces under whatever prefixes they like (`cac`,
//! `CAC`, `ns7`, the default namespace); every path here is built through
//! [`Namespaces`](crate::xml::Namespaces) so the mapping works for all of
//! them.
//!
//! # Example
//!
//! ```
//! let xml = br#"<Invoice xmlns="urn:oasis:names:specification:ubl:schema:xsd:Invoice-2"
//!     xmlns:b="urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2">
//!   <b:ID>INV-1</b:ID>
//!   <b:IssueDate>2016-11-15</b:IssueDate>
//!   <b:IssueTime>01:23:04-04:00</b:IssueTime>
//! </Invoice>"#;
//!
//! let invoice = ubl_extract::ubl::parse(xml).unwrap().unwrap();
//! assert_eq!(invoice.envelope.issued.as_deref(), Some("2016-11-15T01:23:04-04:00"));
//! assert_eq!(invoice.envelope.document_ids.document_id.as_deref(), Some("INV-1"));
//! ```

mod auto;
mod invoice;
mod types;

pub use auto::{DocumentKind, Record, parse_file, parse_kind};
pub use invoice::{make_invoice, parse, root_path};
pub use types::*;

use crate::xml::NamespaceKey;

/// UBL 2 and UN/CEFACT namespace URNs.
pub mod ubl_ns {
    pub const INVOICE: &str = "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2";
    pub const CAC: &str =
        "urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2";
    pub const CBC: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2";
    pub const CCP: &str = "urn:oasis:names:specification:ubl:schema:xsd:CoreComponentParameters-2";
    pub const CEC: &str =
        "urn:oasis:names:specification:ubl:schema:xsd:CommonExtensionComponents-2";
    pub const SDT: &str = "urn:oasis:names:specification:ubl:schema:xsd:SpecializedDatatypes-2";
    pub const UDT: &str =
        "urn:un:unece:uncefact:data:specification:UnqualifiedDataTypesSchemaModule:2";
}

/// Canonical UBL namespace keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UblNs {
    Invoice,
    /// Common aggregate components.
    Cac,
    /// Common basic components.
    Cbc,
    Ccp,
    Cec,
    Sdt,
    Udt,
}

impl NamespaceKey for UblNs {
    const ALL: &'static [Self] = &[
        UblNs::Invoice,
        UblNs::Cac,
        UblNs::Cbc,
        UblNs::Ccp,
        UblNs::Cec,
        UblNs::Sdt,
        UblNs::Udt,
    ];

    fn urn(self) -> &'static str {
        match self {
            UblNs::Invoice => ubl_ns::INVOICE,
            UblNs::Cac => ubl_ns::CAC,
            UblNs::Cbc => ubl_ns::CBC,
            UblNs::Ccp => ubl_ns::CCP,
            UblNs::Cec => ubl_ns::CEC,
            UblNs::Sdt => ubl_ns::SDT,
            UblNs::Udt => ubl_ns::UDT,
        }
    }

    fn key(self) -> &'static str {
        match self {
            UblNs::Invoice => "invoice",
            UblNs::Cac => "cac",
            UblNs::Cbc => "cbc",
            UblNs::Ccp => "ccp",
            UblNs::Cec => "cec",
            UblNs::Sdt => "sdt",
            UblNs::Udt => "udt",
        }
    }
}
