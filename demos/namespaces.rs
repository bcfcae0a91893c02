//! Print a document's namespace declarations and the UBL keys they bind.
//!
//! ```text
//! cargo run --example namespaces --features ubl -- tests/fixtures/ubl1.xml
//! ```

use std::process::ExitCode;

use ubl_extract::xml::Document;

fn main() -> ExitCode {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: namespaces <file>");
        return ExitCode::from(2);
    };

    let doc = match std::fs::read(&path)
        .map_err(ubl_extract::ExtractError::from)
        .and_then(|bytes| Document::parse(&bytes))
    {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("{path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("declarations:");
    for decl in doc.namespace_declarations() {
        let prefix = decl.prefix.as_deref().unwrap_or("(default)");
        println!("  {prefix:<12} {}", decl.urn);
    }

    #[cfg(feature = "ubl")]
    {
        use ubl_extract::ubl::UblNs;
        use ubl_extract::xml::{NamespaceKey, Namespaces};

        let ns = Namespaces::<UblNs>::bind(&doc);
        println!("ubl keys:");
        for key in UblNs::ALL {
            let prefix = ns.resolve(*key).unwrap_or("-");
            println!("  {:<12} {prefix}", key.key());
        }
    }

    ExitCode::SUCCESS
}
