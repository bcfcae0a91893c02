//! Map a document file and print the record as JSON.
//!
//! ```text
//! cargo run --example extract -- invoice tests/fixtures/ubl0.xml
//! RUST_LOG=ubl_extract=debug cargo run --example extract -- invoice tests/fixtures/0.xml
//! ```

use std::process::ExitCode;

use ubl_extract::ubl::{DocumentKind, parse_file};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(kind), Some(path)) = (args.next(), args.next()) else {
        eprintln!("usage: extract <kind> <file>");
        return ExitCode::from(2);
    };

    let kind: DocumentKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    match parse_file(kind, &path) {
        Ok(Some(record)) => match serde_json::to_string_pretty(&record) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        },
        Ok(None) => {
            eprintln!("{path}: not a {kind} document");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{path}: {e}");
            ExitCode::FAILURE
        }
    }
}
