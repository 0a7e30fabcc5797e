#![no_main]

use libfuzzer_sys::fuzz_target;
use marc_crosswalk::batch::{convert_records, BatchConfig, Target};
use marc_crosswalk::Record;

fuzz_target!(|data: &[u8]| {
    let Ok(xml) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(records) = Record::collection_from_marcxml(xml) else {
        return;
    };
    for target in [
        Target::DublinCore,
        Target::SchemaOrg,
        Target::Edm,
        Target::OpenGraph,
        Target::TwitterCard,
    ] {
        let config = BatchConfig::new(target).with_parallel(false);
        let _ = convert_records(&records, &config);
    }
});
