use crate::{
    constants::{CHECKSUM_LEN, CLASS_OFFSET, HEADER_LEN, LENGTH_OFFSET, MSG_ID_OFFSET, SYNC},
    parser::ChecksumCalc,
};

mod config;
pub(crate) mod telemetry;

pub use config::*;
pub use telemetry::*;

/// Build a complete `N`-byte frame around `payload`.
///
/// `N` must equal `HEADER_LEN + payload.len() + CHECKSUM_LEN`, every caller passes
/// a payload of compile-time known size.
pub(crate) fn frame_bytes<const N: usize>(class: u8, msg_id: u8, payload: &[u8]) -> [u8; N] {
    debug_assert_eq!(N, HEADER_LEN + payload.len() + CHECKSUM_LEN);
    let mut packet = [0u8; N];
    packet[..SYNC.len()].copy_from_slice(&SYNC);
    packet[CLASS_OFFSET] = class;
    packet[MSG_ID_OFFSET] = msg_id;
    // payloads are at most a few dozen bytes
    let pack_len = payload.len() as u16;
    packet[LENGTH_OFFSET..HEADER_LEN].copy_from_slice(&pack_len.to_le_bytes());
    packet[HEADER_LEN..HEADER_LEN + payload.len()].copy_from_slice(payload);

    let (ck_a, ck_b) = ChecksumCalc::compute(&packet[CLASS_OFFSET..HEADER_LEN + payload.len()]);
    packet[N - 2] = ck_a;
    packet[N - 1] = ck_b;
    packet
}
