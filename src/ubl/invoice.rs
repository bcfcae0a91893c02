use super::UblNs;
use super::types::*;
use crate::core::ExtractError;
use crate::xml::{
    IsEmpty, Namespaces, Node, PathExpr, find_list_text, find_many_converted, find_one,
    find_one_converted, find_one_text, find_one_text_with_attrs, find_set, find_set_text,
    load_and_map, tagged_text,
};

type Ns<'a, 'd> = &'a Namespaces<'d, UblNs>;

/// Shorthand for the two component namespaces almost every path goes through.
trait UblPaths {
    fn cac(&self, local: &str) -> PathExpr;
    fn cbc(&self, local: &str) -> PathExpr;
}

impl UblPaths for Namespaces<'_, UblNs> {
    fn cac(&self, local: &str) -> PathExpr {
        self.qname(UblNs::Cac, local)
    }

    fn cbc(&self, local: &str) -> PathExpr {
        self.qname(UblNs::Cbc, local)
    }
}

/// Parse a UBL invoice.
///
/// `Ok(None)` when the XML is well-formed but not a UBL invoice.
pub fn parse(bytes: &[u8]) -> Result<Option<Invoice>, ExtractError> {
    load_and_map(bytes, root_path, make_invoice)
}

/// Path of the `Invoice` root element in the document's own prefix.
pub fn root_path(ns: &Namespaces<'_, UblNs>) -> PathExpr {
    ns.qname(UblNs::Invoice, "Invoice")
}

/// Map an `Invoice` element.
pub fn make_invoice(ns: &Namespaces<'_, UblNs>, el: Node<'_>) -> Invoice {
    Invoice {
        envelope: extract_envelope(ns, el),
        items: find_many_converted(el, ns.cac("InvoiceLine"), |line| extract_item(ns, line))
            .unwrap_or_default(),
        delivery: find_one_converted(el, ns.cac("Delivery"), |d| extract_delivery(ns, d)),
    }
}

fn extract_envelope(ns: Ns<'_, '_>, el: Node<'_>) -> Envelope {
    let dates = [("date", ns.cbc("IssueDate")), ("time", ns.cbc("IssueTime"))];
    let period = [
        ("starts", ns.cac("InvoicePeriod") / ns.cbc("StartDate")),
        ("ends", ns.cac("InvoicePeriod") / ns.cbc("EndDate")),
    ];

    Envelope {
        document_ids: extract_document_ids(ns, el),
        issued: find_set_text(el, dates).and_then(|mut vals| {
            let date = vals.remove("date")?;
            Some(match vals.remove("time") {
                Some(time) => format!("{date}T{time}"),
                None => date,
            })
        }),
        period: find_set_text(el, period).map(|mut vals| Period {
            starts: vals.remove("starts"),
            ends: vals.remove("ends"),
        }),
        currency: find_one_text(el, ns.cbc("DocumentCurrencyCode")),
        notes: find_many_converted(el, ns.cbc("Note"), tagged_text).unwrap_or_default(),
        parties: find_parties(ns, el),
    }
}

fn extract_document_ids(ns: Ns<'_, '_>, el: Node<'_>) -> DocumentIds {
    DocumentIds {
        document_id: find_one_text(el, ns.cbc("ID")),
        version_id: find_one_text(el, ns.cbc("UBLVersionID")),
        customization_id: find_one_text(el, ns.cbc("CustomizationID")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Role {
    Supplier,
    Customer,
    Payee,
    Buyer,
    Seller,
    Tax,
}

impl Role {
    fn slot(self, parties: &mut Parties) -> &mut Option<Party> {
        match self {
            Role::Supplier => &mut parties.supplier,
            Role::Customer => &mut parties.customer,
            Role::Payee => &mut parties.payee,
            Role::Buyer => &mut parties.buyer,
            Role::Seller => &mut parties.seller,
            Role::Tax => &mut parties.tax,
        }
    }
}

fn find_parties(ns: Ns<'_, '_>, el: Node<'_>) -> Option<Parties> {
    let roles = [
        (Role::Supplier, ns.cac("AccountingSupplierParty") / ns.cac("Party")),
        (Role::Customer, ns.cac("AccountingCustomerParty") / ns.cac("Party")),
        (Role::Payee, ns.cac("PayeeParty")),
        (Role::Buyer, ns.cac("BuyerCustomerParty") / ns.cac("Party")),
        (Role::Seller, ns.cac("SellerSupplierParty") / ns.cac("Party")),
        (Role::Tax, ns.cac("TaxRepresentativeParty")),
    ];

    find_set(el, roles).and_then(|found| {
        let mut parties = Parties::default();
        for (role, party) in found {
            let party = extract_party(ns, party);
            if !IsEmpty::is_empty(&party) {
                *role.slot(&mut parties) = Some(party);
            }
        }
        (!IsEmpty::is_empty(&parties)).then_some(parties)
    })
}

fn find_identifier(ns: Ns<'_, '_>, el: Node<'_>, path: impl Into<PathExpr>) -> Option<Identifier> {
    let holder = find_one(el, path)?;
    find_one_text_with_attrs(holder, ns.cbc("ID"), &Identifier::ATTRIBUTES)
        .map(|(value, attrs)| Identifier::from_parts(value, attrs))
}

fn find_code(el: Node<'_>, path: PathExpr) -> Option<Code> {
    find_one_text_with_attrs(el, path, &Code::ATTRIBUTES)
        .map(|(value, attrs)| Code::from_parts(value, attrs))
}

fn find_amount(el: Node<'_>, path: PathExpr) -> Option<Amount> {
    find_one_text_with_attrs(el, path, &Amount::ATTRIBUTES)
        .map(|(value, attrs)| Amount::from_parts(value, attrs))
}

fn find_quantity(el: Node<'_>, path: PathExpr) -> Option<Quantity> {
    find_one_text_with_attrs(el, path, &Quantity::ATTRIBUTES)
        .map(|(value, attrs)| Quantity::from_parts(value, attrs))
}

/// Texts of `paths` with blank entries dropped; `None` if nothing is left.
fn non_blank_texts(el: Node<'_>, paths: impl IntoIterator<Item = PathExpr>) -> Option<Vec<String>> {
    let texts: Vec<String> = find_list_text(el, paths)?
        .into_iter()
        .filter(|text| !text.is_empty())
        .collect();
    (!texts.is_empty()).then_some(texts)
}

fn extract_party(ns: Ns<'_, '_>, el: Node<'_>) -> Party {
    Party {
        id: find_identifier(ns, el, ns.cac("PartyIdentification")),
        name: find_one_text(el, ns.cac("PartyName") / ns.cbc("Name")),
        address: find_one_converted(el, ns.cac("PostalAddress"), |a| extract_address(ns, a)),
        location: find_one_converted(el, ns.cac("PhysicalLocation"), |l| extract_location(ns, l)),
        person: find_one_converted(el, ns.cac("Person"), |p| extract_person(ns, p)),
        contact: find_one_converted(el, ns.cac("Contact"), |c| extract_contact(ns, c)),
        industry: find_code(el, ns.cbc("IndustryClassificationCode")),
    }
}

fn extract_address(ns: Ns<'_, '_>, el: Node<'_>) -> Address {
    let subentity = Subentity {
        name: find_one_text(el, ns.cbc("CountrySubentity")),
        code: find_code(el, ns.cbc("CountrySubentityCode")),
    };

    Address {
        format: find_code(el, ns.cbc("AddressFormatCode")),
        street: non_blank_texts(el, [ns.cbc("StreetName"), ns.cbc("AdditionalStreetName")]),
        number: find_one_text(el, ns.cbc("BuildingNumber")),
        code: find_one_text(el, ns.cbc("PostalZone")),
        city: find_one_text(el, ns.cbc("CityName")),
        subentity: (subentity.name.is_some() || subentity.code.is_some()).then_some(subentity),
        country: find_one_converted(el, ns.cac("Country"), |c| extract_country(ns, c)),
    }
}

fn extract_country(ns: Ns<'_, '_>, el: Node<'_>) -> Country {
    Country {
        name: find_one_text(el, ns.cbc("Name")),
        code: find_code(el, ns.cbc("IdentificationCode")),
    }
}

fn extract_location(ns: Ns<'_, '_>, el: Node<'_>) -> Location {
    let validity = [
        ("starts", ns.cac("ValidityPeriod") / ns.cbc("StartDate")),
        ("ends", ns.cac("ValidityPeriod") / ns.cbc("EndDate")),
    ];

    Location {
        id: find_identifier(ns, el, "."),
        name: find_one_text(el, ns.cbc("Name")),
        validity: find_set_text(el, validity).map(|mut vals| Period {
            starts: vals.remove("starts"),
            ends: vals.remove("ends"),
        }),
        address: find_one_converted(el, ns.cac("Address"), |a| extract_address(ns, a)),
    }
}

fn extract_person(ns: Ns<'_, '_>, el: Node<'_>) -> Person {
    let names = [ns.cbc("FirstName"), ns.cbc("MiddleName"), ns.cbc("OtherName")];

    Person {
        surname: find_one_text(el, ns.cbc("FamilyName")),
        names: non_blank_texts(el, names),
    }
}

fn extract_contact(ns: Ns<'_, '_>, el: Node<'_>) -> Contact {
    Contact {
        name: find_one_text(el, ns.cbc("Name")),
        telephone: find_one_text(el, ns.cbc("Telephone")),
        email: find_one_text(el, ns.cbc("ElectronicMail")),
        id: find_identifier(ns, el, "."),
    }
}

fn extract_item(ns: Ns<'_, '_>, el: Node<'_>) -> Item {
    let item = find_one(el, ns.cac("Item"));

    Item {
        id: find_identifier(ns, el, "."),
        name: item.and_then(|i| find_one_text(i, ns.cbc("Name"))),
        description: item.and_then(|i| find_one_text(i, ns.cbc("Description"))),
        classification: item.and_then(|i| {
            find_code(
                i,
                ns.cac("CommodityClassification") / ns.cbc("ItemClassificationCode"),
            )
        }),
        total_price: find_amount(el, ns.cbc("LineExtensionAmount")),
        price: find_amount(el, ns.cac("ItemPriceExtension") / ns.cbc("Amount")),
        quantity: find_quantity(el, ns.cbc("InvoicedQuantity")),
        pricing: find_one_converted(el, ns.cac("Price"), |p| extract_pricing(ns, p)),
    }
}

fn extract_pricing(ns: Ns<'_, '_>, el: Node<'_>) -> Pricing {
    Pricing {
        orderable_factor: find_one_text(el, ns.cbc("OrderableUnitFactorRate")),
        price: find_amount(el, ns.cbc("PriceAmount")),
        quantity: find_quantity(el, ns.cbc("BaseQuantity")),
    }
}

fn extract_delivery(ns: Ns<'_, '_>, el: Node<'_>) -> Delivery {
    Delivery {
        date: find_one_text(el, ns.cbc("ActualDeliveryDate")),
        location: find_one_converted(el, ns.cac("DeliveryLocation"), |l| extract_location(ns, l)),
    }
}
