//! Fuzz target for DOTA single-line annotation parsing.
//!
//! Feeds arbitrary UTF-8 lines to the annotation line parser, checking for
//! panics, crashes, or hangs.

#![no_main]

use dota2yolo::ir::io_dota::fuzz_parse_annotation_line;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    let _ = fuzz_parse_annotation_line(line);
});
