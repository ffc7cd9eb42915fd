//! Fuzz target for COCO JSON import.
//!
//! Feeds arbitrary bytes to the importer. Image resolution runs against a
//! directory that does not exist, so every image is dropped and only the
//! parsing and report-building paths are exercised.
//!
//! Run with:
//!   cargo +nightly fuzz run coco_json_parse

#![no_main]

use std::path::Path;

use boxlabel::io::from_coco_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_coco_slice(data, Path::new("/nonexistent/boxlabel-fuzz-base"));
});
