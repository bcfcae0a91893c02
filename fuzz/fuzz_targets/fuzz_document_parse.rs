#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Errors are fine, panics are bugs.
    if let Ok(doc) = ubl_extract::xml::Document::parse(data) {
        if let Some(root) = doc.root_element() {
            let _ = root.text();
            let _ = root.descendants().count();
        }
    }
});
