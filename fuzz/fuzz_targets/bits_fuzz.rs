#![no_main]
use libfuzzer_sys::fuzz_target;
use retrolz::bits::{ByteCursor, CarryBitReader, FlagOrder, FlagReader, FlagUnit, MsbBitReader};

fuzz_target!(|data: &[u8]| {
    let Some((&widths, stream)) = data.split_first() else {
        return;
    };
    let width = u32::from(widths % 32) + 1;

    let mut msb = MsbBitReader::from_cursor(ByteCursor::new(stream));
    while msb.read_bits(width).is_ok() {}

    for (unit, order) in [
        (FlagUnit::U8, FlagOrder::TopFirst),
        (FlagUnit::U16Le, FlagOrder::LowFirst),
        (FlagUnit::U32Le, FlagOrder::TopFirst),
    ] {
        let mut flags = FlagReader::new(ByteCursor::new(stream), unit, order);
        while let Ok(set) = flags.bit() {
            if set && flags.byte().is_err() {
                break;
            }
        }
    }

    let mut rcr = CarryBitReader::new(stream, stream.len(), 1, 0);
    while rcr.read_bits(width).is_ok() {}
});
