//! Fuzz target for mapping a display-space drag into image space.
//!
//! The input is read as eight little-endian `i16`s: natural size, viewport
//! size, then the two drag corners.

#![no_main]

use boxlabel::model::{Point, Size};
use boxlabel::transform::fuzz_display_rect;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 16 {
        return;
    }

    let v: Vec<i32> = data[..16]
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as i32)
        .collect();

    fuzz_display_rect(
        Size::new(v[0], v[1]),
        Size::new(v[2], v[3]),
        Point::new(v[4], v[5]),
        Point::new(v[6], v[7]),
    );
});
