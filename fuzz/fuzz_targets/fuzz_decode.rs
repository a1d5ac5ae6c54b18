#![no_main]
use cgs::{DecodeOptions, FileHeader, SectionKind, SectionStatus};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(report) = cgs::decode(data) else {
        assert!(data.len() < FileHeader::SIZE);
        return;
    };

    assert!(report.final_offset() <= report.total_size());
    assert_eq!(report.total_size(), data.len());

    // Sections that finished cleanly have no anomalies attributed to them
    for kind in SectionKind::ORDER {
        if report.section_status(kind) == SectionStatus::Complete {
            assert!(report.anomalies().iter().all(|x| x.section() != kind));
        }
    }

    // Capping what is kept in memory never changes where decoding ends up
    let options = DecodeOptions::new().with_max_materialized_entries(2);
    let capped = cgs::decode_with(data, options).unwrap();
    assert_eq!(capped.final_offset(), report.final_offset());
    assert_eq!(capped.anomalies(), report.anomalies());
    assert!(capped.ints().len() <= 2);

    let _ = cgs::summary::Summary::new(&report).to_string();
});
