use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::xml::{Attributes, IsEmpty, TaggedText};

/// A mapped UBL invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub envelope: Envelope,
    /// `cac:InvoiceLine`, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    /// `cac:Delivery`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<Delivery>,
}

/// Document-level data: identifiers, dates, currency, notes and parties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "IsEmpty::is_empty")]
    pub document_ids: DocumentIds,
    /// `IssueDate`, joined with `IssueTime` as `dateTtime` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    /// `DocumentCurrencyCode`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// `cbc:Note`, with language when declared.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<TaggedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parties: Option<Parties>,
}

impl Envelope {
    /// The issue date, parsed.
    pub fn issue_date(&self) -> Option<NaiveDate> {
        let issued = self.issued.as_deref()?;
        let date = issued.split('T').next().unwrap_or(issued);
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    }

    /// The issue timestamp, when both a time and a UTC offset were supplied.
    pub fn issued_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(self.issued.as_deref()?).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentIds {
    /// `cbc:ID`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    /// `cbc:UBLVersionID`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    /// `cbc:CustomizationID`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends: Option<String>,
}

/// The parties named on the invoice, by role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<Party>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Party>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee: Option<Party>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer: Option<Party>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<Party>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<Party>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<Person>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<Code>,
}

/// An identifier with its `scheme*` attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Identifier {
    /// Attributes of an identifier type, in the order they are read.
    pub const ATTRIBUTES: [&'static str; 7] = [
        "schemeAgencyID",
        "schemeAgencyName",
        "schemeDataURI",
        "schemeVersionID",
        "schemeID",
        "schemeURI",
        "schemeName",
    ];

    pub(crate) fn from_parts(value: String, mut attrs: Attributes) -> Self {
        Self {
            value,
            agency_id: attrs.remove("schemeAgencyID"),
            agency_name: attrs.remove("schemeAgencyName"),
            data_uri: attrs.remove("schemeDataURI"),
            version_id: attrs.remove("schemeVersionID"),
            id: attrs.remove("schemeID"),
            uri: attrs.remove("schemeURI"),
            name: attrs.remove("schemeName"),
        }
    }
}

/// A code with its `list*` attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Code {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Code {
    pub const ATTRIBUTES: [&'static str; 9] = [
        "languageID",
        "listAgencyID",
        "listAgencyName",
        "listID",
        "listName",
        "listSchemeURI",
        "listURI",
        "listVersionID",
        "name",
    ];

    pub(crate) fn from_parts(value: String, mut attrs: Attributes) -> Self {
        Self {
            value,
            language_id: attrs.remove("languageID"),
            agency_id: attrs.remove("listAgencyID"),
            agency_name: attrs.remove("listAgencyName"),
            list_id: attrs.remove("listID"),
            list_name: attrs.remove("listName"),
            scheme_uri: attrs.remove("listSchemeURI"),
            list_uri: attrs.remove("listURI"),
            version_id: attrs.remove("listVersionID"),
            name: attrs.remove("name"),
        }
    }
}

/// A monetary amount as written, with its `currencyID`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
}

impl Amount {
    pub const ATTRIBUTES: [&'static str; 1] = ["currencyID"];

    pub(crate) fn from_parts(value: String, mut attrs: Attributes) -> Self {
        Self {
            value,
            currency_code: attrs.remove("currencyID"),
        }
    }

    /// The value as a decimal, if it is one.
    pub fn decimal(&self) -> Option<Decimal> {
        Decimal::from_str(self.value.trim()).ok()
    }
}

/// A quantity as written, with its `unitCode`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Quantity {
    pub const ATTRIBUTES: [&'static str; 1] = ["unitCode"];

    pub(crate) fn from_parts(value: String, mut attrs: Attributes) -> Self {
        Self {
            value,
            unit: attrs.remove("unitCode"),
        }
    }

    pub fn decimal(&self) -> Option<Decimal> {
        Decimal::from_str(self.value.trim()).ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// `AddressFormatCode`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Code>,
    /// `StreetName` and `AdditionalStreetName`, blanks dropped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// `PostalZone`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subentity: Option<Subentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<Country>,
}

/// `CountrySubentity` / `CountrySubentityCode`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subentity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Code>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `IdentificationCode`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Code>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `ValidityPeriod`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity: Option<Period>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// `FamilyName`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    /// `FirstName`, `MiddleName`, `OtherName`, blanks dropped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    /// `ElectronicMail`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Identifier>,
}

/// One `cac:InvoiceLine`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Identifier>,
    /// `cac:Item/cbc:Name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `cac:Item/cbc:Description`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `cac:Item/cac:CommodityClassification/cbc:ItemClassificationCode`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Code>,
    /// `LineExtensionAmount`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Amount>,
    /// `cac:ItemPriceExtension/cbc:Amount`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Amount>,
    /// `InvoicedQuantity`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
}

/// `cac:Price`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    /// `OrderableUnitFactorRate`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orderable_factor: Option<String>,
    /// `PriceAmount`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Amount>,
    /// `BaseQuantity`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
}

/// `cac:Delivery`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    /// `ActualDeliveryDate`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// `DeliveryLocation`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

macro_rules! record_is_empty {
    ($($ty:ident { $($field:ident),+ $(,)? })+) => {
        $(
            impl IsEmpty for $ty {
                fn is_empty(&self) -> bool {
                    true $(&& IsEmpty::is_empty(&self.$field))+
                }
            }
        )+
    };
}

record_is_empty! {
    Invoice { envelope, items, delivery }
    Envelope { document_ids, issued, period, currency, notes, parties }
    DocumentIds { document_id, version_id, customization_id }
    Period { starts, ends }
    Parties { supplier, customer, payee, buyer, seller, tax }
    Party { id, name, address, location, person, contact, industry }
    Address { format, street, number, code, city, subentity, country }
    Subentity { name, code }
    Country { name, code }
    Location { id, name, validity, address }
    Person { surname, names }
    Contact { name, telephone, email, id }
    Item { id, name, description, classification, total_price, price, quantity, pricing }
    Pricing { orderable_factor, price, quantity }
    Delivery { date, location }
}
