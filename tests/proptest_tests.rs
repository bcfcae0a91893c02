//! Property-based tests for the namespace resolver and the extraction combinators.
//!
//! Run with: `cargo test --features all --test proptest_tests`

#![cfg(feature = "ubl")]

use proptest::prelude::*;
use ubl_extract::ubl::{self, UblNs, ubl_ns};
use ubl_extract::xml::{Document, Namespaces, find_many, find_many_converted, find_one_int};

/// Prefixes a producer could plausibly declare; `xml*` is reserved.
fn prefix() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,8}".prop_filter("reserved prefix", |p| {
        !p.to_ascii_lowercase().starts_with("xml")
    })
}

fn invoice_with_prefixes(cac: &str, cbc: &str, id: &str) -> String {
    format!(
        r#"<Invoice xmlns="{}" xmlns:{cac}="{}" xmlns:{cbc}="{}">
  <{cbc}:ID>{id}</{cbc}:ID>
  <{cac}:AccountingSupplierParty><{cac}:Party><{cac}:PartyName>
    <{cbc}:Name>Supplier</{cbc}:Name>
  </{cac}:PartyName></{cac}:Party></{cac}:AccountingSupplierParty>
</Invoice>"#,
        ubl_ns::INVOICE,
        ubl_ns::CAC,
        ubl_ns::CBC
    )
}

proptest! {
    /// Whatever prefix a document chooses, the resolver reports it.
    #[test]
    fn resolves_any_declared_prefix(cac in prefix(), cbc in prefix()) {
        prop_assume!(cac != cbc);
        let xml = invoice_with_prefixes(&cac, &cbc, "1");
        let doc = Document::parse(xml.as_bytes()).unwrap();
        let ns = Namespaces::<UblNs>::new(&doc);

        prop_assert_eq!(ns.resolve(UblNs::Cac), Some(cac.as_str()));
        prop_assert_eq!(ns.resolve(UblNs::Cbc), Some(cbc.as_str()));
        prop_assert_eq!(ns.resolve(UblNs::Udt), None);
    }

    /// Repeated lookups and fresh resolvers over the same document agree.
    #[test]
    fn resolution_is_stable(p in prefix()) {
        let xml = format!(r#"<{p}:Invoice xmlns:{p}="{}"/>"#, ubl_ns::INVOICE);
        let doc = Document::parse(xml.as_bytes()).unwrap();
        let first = Namespaces::<UblNs>::new(&doc);
        let second = Namespaces::<UblNs>::bind(&doc);

        prop_assert_eq!(first.resolve(UblNs::Invoice), Some(p.as_str()));
        prop_assert_eq!(first.resolve(UblNs::Invoice), first.resolve(UblNs::Invoice));
        prop_assert_eq!(first.resolve(UblNs::Invoice), second.resolve(UblNs::Invoice));
        prop_assert_eq!(first.resolve(UblNs::Cbc), None);
    }

    /// The mapping does not depend on which prefixes were used.
    #[test]
    fn mapping_is_prefix_independent(cac in prefix(), cbc in prefix(), id in "[A-Z0-9-]{1,12}") {
        prop_assume!(cac != cbc);
        let reference = ubl::parse(invoice_with_prefixes("cac", "cbc", &id).as_bytes())
            .unwrap()
            .unwrap();
        let renamed = ubl::parse(invoice_with_prefixes(&cac, &cbc, &id).as_bytes())
            .unwrap()
            .unwrap();

        prop_assert_eq!(renamed.envelope.document_ids.document_id.as_deref(), Some(id.as_str()));
        prop_assert_eq!(renamed, reference);
    }

    /// Repeated matches come back in document order, and conversions keep it.
    #[test]
    fn many_preserves_document_order(values in prop::collection::vec(any::<u32>(), 1..20)) {
        let body: String = values.iter().map(|v| format!("<v>{v}</v>")).collect();
        let xml = format!("<r><skip/>{body}<skip/></r>");
        let doc = Document::parse(xml.as_bytes()).unwrap();
        let root = doc.root_element().unwrap();

        let texts: Vec<String> = find_many(root, "v").unwrap().iter().map(|n| n.text()).collect();
        let want: Vec<String> = values.iter().map(u32::to_string).collect();
        prop_assert_eq!(&texts, &want);

        let converted = find_many_converted(root, "v", |n| n.text().parse::<u32>().unwrap()).unwrap();
        prop_assert_eq!(converted, values);
    }

    /// Integers survive surrounding whitespace.
    #[test]
    fn integers_are_read_back(n in any::<i64>(), pad in "[ \t\n]{0,3}") {
        let xml = format!("<r><n>{pad}{n}{pad}</n></r>");
        let doc = Document::parse(xml.as_bytes()).unwrap();
        let root = doc.root_element().unwrap();
        prop_assert_eq!(find_one_int(root, "n"), Some(n));
    }

    /// Arbitrary input is either parsed or rejected, never a panic.
    #[test]
    fn parse_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = ubl::parse(&bytes);
    }
}
