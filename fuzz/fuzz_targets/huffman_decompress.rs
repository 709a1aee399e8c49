#![no_main]

use libfuzzer_sys::fuzz_target;
use rust_huffman::decompress;

// arbitrary bytes may fail to decode, but must never panic
fuzz_target!(|data: &[u8]| {
    let _ = decompress(data);
});
