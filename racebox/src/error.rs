/// Error that possible during frame validation and packet parsing
///
/// The streaming [`Decoder`](crate::Decoder) never returns these, it resynchronises
/// instead. They come out of [`validate_frame`](crate::validate_frame) and the
/// fallible slice constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParserError {
    #[error("Not valid packet's checksum, expect {expect:x}, got {got:x}")]
    InvalidChecksum { expect: u16, got: u16 },

    #[error("Frame does not start with the sync marker")]
    InvalidSync,

    #[error("Invalid packet({packet}) length, expect {expect}, got {got}")]
    InvalidPacketLen {
        packet: &'static str,
        expect: usize,
        got: usize,
    },

    #[error("Unexpected message class {class:#04x}, id {msg_id:#04x}")]
    UnexpectedMessage { class: u8, msg_id: u8 },

    #[error("Frame truncated, need {required} bytes, have {available}")]
    Truncated { required: usize, available: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DateTimeError {
    #[error("invalid date")]
    InvalidDate,
    #[error("invalid time")]
    InvalidTime,
    #[error("invalid nanoseconds")]
    InvalidNanoseconds,
}

#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Configuration may only be sent over an established link
    #[error("device is not connected (link is {state})")]
    NotConnected { state: crate::LinkState },
}
