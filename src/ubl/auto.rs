//! Dispatch by document kind, for callers that pick the schema at runtime.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::invoice;
use super::types::Invoice;
use crate::core::ExtractError;

/// The document kinds a mapper exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum DocumentKind {
    Invoice,
}

impl DocumentKind {
    pub const ALL: &'static [DocumentKind] = &[DocumentKind::Invoice];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ExtractError::UnknownKind(s.to_string()))
    }
}

/// A mapped document of any supported kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum Record {
    Invoice(Invoice),
}

impl Record {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Record::Invoice(_) => DocumentKind::Invoice,
        }
    }

    pub fn as_invoice(&self) -> Option<&Invoice> {
        match self {
            Record::Invoice(invoice) => Some(invoice),
        }
    }
}

/// Map `bytes` as a document of `kind`.
pub fn parse_kind(kind: DocumentKind, bytes: &[u8]) -> Result<Option<Record>, ExtractError> {
    let record = match kind {
        DocumentKind::Invoice => invoice::parse(bytes)?.map(Record::Invoice),
    };
    if record.is_none() {
        debug!(%kind, "document did not map");
    }
    Ok(record)
}

/// Read a file and map it as a document of `kind`.
pub fn parse_file(kind: DocumentKind, path: impl AsRef<Path>) -> Result<Option<Record>, ExtractError> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_kind(kind, &bytes)
}
