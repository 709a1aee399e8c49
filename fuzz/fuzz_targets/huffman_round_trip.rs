#![no_main]

use libfuzzer_sys::fuzz_target;
use rust_huffman::{compress, decompress};

fuzz_target!(|data: &[u8]| {
    let compressed = compress(data).unwrap();
    assert_eq!(data, &decompress(&compressed).unwrap()[..]);
});
