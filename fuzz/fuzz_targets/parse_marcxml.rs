#![no_main]

use libfuzzer_sys::fuzz_target;
use marc_crosswalk::Record;

fuzz_target!(|data: &[u8]| {
    if let Ok(xml) = std::str::from_utf8(data) {
        if let Ok(records) = Record::collection_from_marcxml(xml) {
            for record in &records {
                let _ = record.extract("655", "[a]", ".", ".");
            }
        }
    }
});
