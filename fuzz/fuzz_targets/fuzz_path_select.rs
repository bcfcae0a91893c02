#![no_main]

use libfuzzer_sys::fuzz_target;
use ubl_extract::xml::Document;

const XML: &[u8] = br#"<r xmlns:a="urn:a"><a:x id="1"><y/></a:x><y/><a:x/></r>"#;

fuzz_target!(|data: &[u8]| {
    if let Ok(path) = std::str::from_utf8(data) {
        if let Ok(doc) = Document::parse(XML) {
            // Arbitrary expressions must compile to an error or a node list.
            let _ = doc.node().select(path);
        }
    }
});
