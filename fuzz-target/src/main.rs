#[macro_use]
extern crate afl;

use racebox::{Decoder, FixedBuffer, TelemetryRecord, UnderlyingBuffer};

fn parse<T: UnderlyingBuffer>(mut decoder: Decoder<T>, chunk_size: usize, data: &[u8]) {
    for chunk in data.chunks(chunk_size) {
        for frame in decoder.feed(chunk) {
            // Every emitted frame must survive a round trip through the record
            let record = frame.decode();
            assert_eq!(&record.to_packet_bytes()[..86], &frame.as_bytes()[..]);
        }
    }

    // Whatever the garbage left behind, one clean frame must come out of the next two
    let clean = TelemetryRecord::from_payload(&[0; 80]).to_packet_bytes();
    let mut found = decoder.feed(&clean).count();
    found += decoder.feed(&clean).count();
    assert!(found >= 1);
}

fn main() {
    fuzz!(|data: &[u8]| {
        if data.len() > 2 {
            let chunk_size = usize::from(data[1]).max(1);
            match data[0] % 3 {
                0 => parse(Decoder::default(), chunk_size, &data[2..]),
                1 => parse(Decoder::new(FixedBuffer::<88>::new()), chunk_size, &data[2..]),
                _ => parse(Decoder::new(FixedBuffer::<256>::new()), chunk_size, &data[2..]),
            }
        }
    });
}
