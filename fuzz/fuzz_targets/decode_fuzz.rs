#![no_main]
use libfuzzer_sys::fuzz_target;
use retrolz::engine::{self, Codec, DecodeOptions};

fuzz_target!(|data: &[u8]| {
    // First two bytes pick the declared size; the rest is the packed stream.
    if data.len() < 2 {
        return;
    }
    let size = usize::from(u16::from_le_bytes([data[0], data[1]]));
    let packed = &data[2..];

    for codec in Codec::ALL {
        let opts = DecodeOptions::default()
            .with_expected_size(size)
            .keep_partial(true);
        // Errors are fine; panics and output past the declared size are not.
        if let Ok(out) = engine::decode(codec, packed, &opts) {
            assert!(out.data.len() <= size);
        }

        let bounded = opts.clone().with_packed_size(packed.len() / 2);
        let _ = engine::decode(codec, packed, &bounded);
    }
});
