//! Core error taxonomy shared by the XML engine and the domain mappers.
//!
//! Only malformed input and I/O are failures. Everything that merely fails
//! to match (missing namespaces, unresolvable paths, empty conversions)
//! is reported as absence by the combinators instead.

mod error;

pub use error::*;
