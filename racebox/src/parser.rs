#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use core::{cmp::min, fmt};

use log::{debug, trace, warn};

use crate::{
    constants::{
        CHECKSUM_LEN, CLASS_OFFSET, HEADER_LEN, LENGTH_OFFSET, MSG_ID_OFFSET, RACEBOX_CLASS,
        SYNC, SYNC_CHAR_1, SYNC_CHAR_2, TELEMETRY_FRAME_LEN, TELEMETRY_MSG_ID,
        TELEMETRY_PACKET_LEN, TELEMETRY_PAYLOAD_LEN,
    },
    error::ParserError,
    packets::TelemetryFrame,
};

mod buffer;
mod checksum;

pub use buffer::{FixedBuffer, UnderlyingBuffer};
pub use checksum::ChecksumCalc;

/// Counters describing what a [`Decoder`] did with the bytes it was fed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoderStats {
    /// Checksum-valid telemetry frames emitted
    pub frames: u64,
    /// Candidate frames whose checksum did not match
    pub checksum_errors: u64,
    /// Sync marker found but length or class/id were not those of a telemetry frame
    pub rejected_headers: u64,
    /// Bytes skipped while looking for a sync marker
    pub skipped_bytes: u64,
    /// Bytes that did not fit into a fixed-size buffer
    pub dropped_bytes: u64,
}

/// Streaming decoder for RaceBox telemetry frames. The default constructor will build
/// a decoder backed by a growable `Vec`, but you can pass your own underlying buffer
/// to `Decoder::new()`.
///
/// If you pass your own buffer it must hold at least one full frame
/// ([`TELEMETRY_PACKET_LEN`] bytes), otherwise nothing can ever be decoded.
///
/// One decoder serves exactly one byte stream. Use one instance per connected device.
pub struct Decoder<T>
where
    T: UnderlyingBuffer,
{
    buf: T,
    stats: DecoderStats,
}

#[cfg(feature = "alloc")]
impl core::default::Default for Decoder<Vec<u8>> {
    fn default() -> Self {
        Self::new(Vec::with_capacity(2 * TELEMETRY_PACKET_LEN))
    }
}

impl<T: UnderlyingBuffer> Decoder<T> {
    pub fn new(underlying: T) -> Self {
        Self {
            buf: underlying,
            stats: DecoderStats::default(),
        }
    }

    pub fn is_buffer_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of bytes received but not consumed yet
    pub fn buffer_len(&self) -> usize {
        self.buf.len()
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Forget any partially received frame, e.g. after the link was re-established
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Append `chunk` to the accumulation buffer and return an iterator over every
    /// frame that can be completed.
    ///
    /// Frames are extracted lazily. If the iterator is dropped before it is exhausted,
    /// the remaining bytes stay buffered for the next call. An empty chunk is a no-op
    /// that still yields frames completed by earlier calls but not read yet.
    pub fn feed<'a>(&'a mut self, chunk: &'a [u8]) -> FrameIter<'a, T> {
        FrameIter {
            decoder: self,
            pending: chunk,
        }
    }

    fn extract_frame(&mut self) -> Option<TelemetryFrame> {
        while self.buf.len() >= TELEMETRY_PACKET_LEN {
            if self.buf[0] != SYNC_CHAR_1 || self.buf[1] != SYNC_CHAR_2 {
                let shift = self.next_sync_offset();
                self.stats.skipped_bytes += shift as u64;
                self.buf.drain(shift);
                continue;
            }

            let pack_len: usize =
                u16::from_le_bytes([self.buf[LENGTH_OFFSET], self.buf[LENGTH_OFFSET + 1]]).into();
            let (class, msg_id) = (self.buf[CLASS_OFFSET], self.buf[MSG_ID_OFFSET]);
            if pack_len != TELEMETRY_PAYLOAD_LEN
                || class != RACEBOX_CLASS
                || msg_id != TELEMETRY_MSG_ID
            {
                // Only the first byte is dropped, a real frame may start inside this one
                debug!(
                    "Rejecting candidate frame: class {class:#04x}, id {msg_id:#04x}, length {pack_len}"
                );
                self.stats.rejected_headers += 1;
                self.buf.drain(1);
                continue;
            }

            let mut checksummer = ChecksumCalc::new();
            checksummer.update(&self.buf[CLASS_OFFSET..TELEMETRY_FRAME_LEN]);
            let (expect_ck_a, expect_ck_b) = (
                self.buf[TELEMETRY_FRAME_LEN],
                self.buf[TELEMETRY_FRAME_LEN + 1],
            );
            if let Err(err) = checksummer.validate_result(expect_ck_a, expect_ck_b) {
                warn!(
                    "{err}: {}",
                    HexBytes(&self.buf[0..TELEMETRY_PACKET_LEN])
                );
                self.stats.checksum_errors += 1;
                self.buf.drain(1);
                continue;
            }

            let mut frame = [0; TELEMETRY_FRAME_LEN];
            frame.copy_from_slice(&self.buf[0..TELEMETRY_FRAME_LEN]);
            self.buf.drain(TELEMETRY_PACKET_LEN);
            self.stats.frames += 1;
            trace!("Telemetry frame #{} extracted", self.stats.frames);
            return Some(TelemetryFrame::new(frame));
        }
        None
    }

    /// Offset of the next sync marker after position 0, or `len - 1` if there is none,
    /// which keeps a trailing `SYNC_CHAR_1` around in case its partner is still in flight.
    fn next_sync_offset(&self) -> usize {
        let len = self.buf.len();
        self.buf[1..len]
            .windows(SYNC.len())
            .position(|w| w == SYNC)
            .map_or(len - 1, |pos| pos + 1)
    }

    fn store(&mut self, bytes: &[u8]) {
        let lost = self.buf.extend_from_slice(bytes);
        if lost > 0 {
            warn!("Decoder buffer full, dropping {lost} bytes");
            self.stats.dropped_bytes += lost as u64;
        }
    }
}

/// Most bytes moved from a pending chunk into the buffer at once. Resync drains shift
/// the whole buffer, so it must stay small for decoding to be linear in the chunk size.
const REFILL_WINDOW: usize = 2 * TELEMETRY_PACKET_LEN;

/// Iterator over the frames completed by one [`Decoder::feed`] call
pub struct FrameIter<'a, T: UnderlyingBuffer> {
    decoder: &'a mut Decoder<T>,
    pending: &'a [u8],
}

impl<T: UnderlyingBuffer> FrameIter<'_, T> {
    /// Move as much of the pending chunk as fits into the accumulation buffer
    fn refill(&mut self) {
        let buf = &mut self.decoder.buf;
        let room = buf.remaining_capacity();
        if room == 0 {
            // Buffer smaller than a frame: slide the window forward
            let evicted = min(self.pending.len(), buf.len());
            warn!("Decoder buffer cannot hold a frame, evicting {evicted} bytes");
            buf.drain(evicted);
            self.decoder.stats.dropped_bytes += evicted as u64;
            return;
        }
        let take = min(min(room, self.pending.len()), REFILL_WINDOW);
        let (head, tail) = self.pending.split_at(take);
        self.pending = tail;
        self.decoder.store(head);
    }
}

impl<T: UnderlyingBuffer> Iterator for FrameIter<'_, T> {
    type Item = TelemetryFrame;

    fn next(&mut self) -> Option<TelemetryFrame> {
        loop {
            if let Some(frame) = self.decoder.extract_frame() {
                return Some(frame);
            }
            if self.pending.is_empty() {
                return None;
            }
            self.refill();
        }
    }
}

impl<T: UnderlyingBuffer> Drop for FrameIter<'_, T> {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            let rest = core::mem::take(&mut self.pending);
            self.decoder.store(rest);
        }
    }
}

/// A checksum-valid frame of any class, borrowed from the validated bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRef<'a> {
    class: u8,
    msg_id: u8,
    payload: &'a [u8],
}

impl<'a> FrameRef<'a> {
    pub fn class(&self) -> u8 {
        self.class
    }

    pub fn msg_id(&self) -> u8 {
        self.msg_id
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Size of the frame on the wire, sync marker and checksum included
    pub fn wire_len(&self) -> usize {
        HEADER_LEN + self.payload.len() + CHECKSUM_LEN
    }
}

/// Validate a single frame of any class/id and payload length.
///
/// `bytes` must start with the sync marker. Bytes after the end of the frame are
/// ignored, use [`FrameRef::wire_len`] to find where the next one starts.
pub fn validate_frame(bytes: &[u8]) -> Result<FrameRef<'_>, ParserError> {
    const MIN_LEN: usize = HEADER_LEN + CHECKSUM_LEN;
    if bytes.len() < MIN_LEN {
        return Err(ParserError::Truncated {
            required: MIN_LEN,
            available: bytes.len(),
        });
    }
    if bytes[0..SYNC.len()] != SYNC {
        return Err(ParserError::InvalidSync);
    }

    let pack_len = usize::from(u16::from_le_bytes([
        bytes[LENGTH_OFFSET],
        bytes[LENGTH_OFFSET + 1],
    ]));
    let required = HEADER_LEN + pack_len + CHECKSUM_LEN;
    if bytes.len() < required {
        return Err(ParserError::Truncated {
            required,
            available: bytes.len(),
        });
    }

    let mut checksummer = ChecksumCalc::new();
    checksummer.update(&bytes[CLASS_OFFSET..HEADER_LEN + pack_len]);
    checksummer.validate_result(bytes[HEADER_LEN + pack_len], bytes[HEADER_LEN + pack_len + 1])?;

    Ok(FrameRef {
        class: bytes[CLASS_OFFSET],
        msg_id: bytes[MSG_ID_OFFSET],
        payload: &bytes[HEADER_LEN..HEADER_LEN + pack_len],
    })
}

/// `B5-62-FF-...` rendering for diagnostics
struct HexBytes<'a>(&'a [u8]);

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}
