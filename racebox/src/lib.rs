//! # racebox
//!
//! A pure-rust codec for the binary protocol spoken by RaceBox GNSS/IMU data loggers
//! (Mini, Mini S and Micro). The devices stream UBX-framed "RaceBox Data Message"
//! packets over a BLE UART and accept a small UBX-framed configuration message.
//!
//! Parsing Packets
//! ===============
//!
//! Parsing happens by instantiating a `Decoder` and feeding it the chunks delivered by
//! your transport using its `feed()` method. The decoder keeps whatever it could not
//! consume yet, so chunk boundaries can fall anywhere, and `feed()` returns an iterator
//! over the frames that became complete:
//! ```
//! # #[cfg(feature = "alloc")] {
//! use racebox::{Decoder, TelemetryRecord};
//!
//! let mut decoder = Decoder::default();
//! let my_raw_data = vec![0xb5, 0x62, 0xff, 0x01]; // From your BLE notification
//! for frame in decoder.feed(&my_raw_data) {
//!     let record: TelemetryRecord = frame.decode();
//!     println!("{}: {:.7} {:.7}", record.timestamp(), record.latitude(), record.longitude());
//! }
//! # }
//! ```
//!
//! Malformed input never surfaces as an error: the decoder resynchronises on the next
//! sync marker and keeps counters in [`DecoderStats`].
//!
//! Constructing Packets
//! ====================
//!
//! The only outbound message is the GNSS configuration message:
//! ```
//! use racebox::{ConfigurationRequest, PlatformModel};
//!
//! let packet: [u8; 11] = ConfigurationRequest {
//!     platform: PlatformModel::Automotive,
//!     enable_3d_speed: false,
//!     min_horizontal_accuracy: 0,
//! }
//! .into_packet_bytes();
//! assert_eq!(packet, [0xb5, 0x62, 0xff, 0x27, 0x03, 0x00, 0x04, 0x00, 0x00, 0x2d, 0xfe]);
//! ```
//!
//! no_std Support
//! ==============
//!
//! Without the `alloc` feature the decoder runs on a fixed-size buffer:
//! ```
//! let mut decoder = racebox::Decoder::new(racebox::FixedBuffer::<256>::new());
//! assert_eq!(decoder.feed(&[]).count(), 0);
//! ```
//! The buffer must be able to hold at least one full frame (88 bytes).

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;
extern crate core;
#[cfg(feature = "serde")]
extern crate serde;

pub use crate::{
    device::{is_racebox_name, Battery, DeviceKind},
    error::{DateTimeError, ParserError},
    packets::*,
    parser::{
        validate_frame, ChecksumCalc, Decoder, DecoderStats, FixedBuffer, FrameIter, FrameRef,
        UnderlyingBuffer,
    },
};

#[cfg(feature = "std")]
pub use crate::{
    error::SessionError,
    session::{Delivery, LatestRecord, LinkState, RecordHandler, Session},
};

pub mod constants;
mod device;
mod error;
mod packets;
mod parser;
#[cfg(feature = "std")]
mod session;
#[cfg(feature = "simulate")]
mod simulate;
