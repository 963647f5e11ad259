#![cfg(feature = "alloc")]

//! A proptest generator for RaceBox Data Messages.
//!
//! Generates byte-level frames with sync marker, class/ID, length, a random payload
//! and a correct checksum, and checks them against the streaming decoder.

use byteorder::{LittleEndian, WriteBytesExt};
use proptest::prelude::*;
use racebox::{Decoder, FixedBuffer, TelemetryRecord};

const SYNC_CHAR_1: u8 = 0xB5;
const SYNC_CHAR_2: u8 = 0x62;

/// Payload of a RaceBox Data Message, field by field
#[derive(Debug, Clone)]
pub struct TelemetryPayload {
    pub itow: u32,
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub validity_flags: u8,
    pub time_accuracy: u32,
    pub nanoseconds: i32,
    pub fix_status: u8,
    pub fix_status_flags: u8,
    pub date_time_flags: u8,
    pub num_svs: u8,
    pub longitude: i32,
    pub latitude: i32,
    pub wgs_altitude: i32,
    pub msl_altitude: i32,
    pub horizontal_accuracy: u32,
    pub vertical_accuracy: u32,
    pub speed: i32,
    pub heading: i32,
    pub speed_accuracy: u32,
    pub heading_accuracy: u32,
    pub pdop: u16,
    pub lat_lon_flags: u8,
    pub battery_status: u8,
    pub g_force: [i16; 3],
    pub rotation_rate: [i16; 3],
}

impl TelemetryPayload {
    /// Serializes the payload into its 80-byte wire layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut wtr = Vec::with_capacity(80);
        wtr.write_u32::<LittleEndian>(self.itow).unwrap();
        wtr.write_u16::<LittleEndian>(self.year).unwrap();
        wtr.write_u8(self.month).unwrap();
        wtr.write_u8(self.day).unwrap();
        wtr.write_u8(self.hour).unwrap();
        wtr.write_u8(self.minute).unwrap();
        wtr.write_u8(self.second).unwrap();
        wtr.write_u8(self.validity_flags).unwrap();
        wtr.write_u32::<LittleEndian>(self.time_accuracy).unwrap();
        wtr.write_i32::<LittleEndian>(self.nanoseconds).unwrap();
        wtr.write_u8(self.fix_status).unwrap();
        wtr.write_u8(self.fix_status_flags).unwrap();
        wtr.write_u8(self.date_time_flags).unwrap();
        wtr.write_u8(self.num_svs).unwrap();
        wtr.write_i32::<LittleEndian>(self.longitude).unwrap();
        wtr.write_i32::<LittleEndian>(self.latitude).unwrap();
        wtr.write_i32::<LittleEndian>(self.wgs_altitude).unwrap();
        wtr.write_i32::<LittleEndian>(self.msl_altitude).unwrap();
        wtr.write_u32::<LittleEndian>(self.horizontal_accuracy)
            .unwrap();
        wtr.write_u32::<LittleEndian>(self.vertical_accuracy)
            .unwrap();
        wtr.write_i32::<LittleEndian>(self.speed).unwrap();
        wtr.write_i32::<LittleEndian>(self.heading).unwrap();
        wtr.write_u32::<LittleEndian>(self.speed_accuracy).unwrap();
        wtr.write_u32::<LittleEndian>(self.heading_accuracy).unwrap();
        wtr.write_u16::<LittleEndian>(self.pdop).unwrap();
        wtr.write_u8(self.lat_lon_flags).unwrap();
        wtr.write_u8(self.battery_status).unwrap();
        for axis in self.g_force.iter().chain(self.rotation_rate.iter()) {
            wtr.write_i16::<LittleEndian>(*axis).unwrap();
        }
        wtr
    }
}

/// Calculates the 8-bit Fletcher checksum
fn calculate_checksum(data: &[u8]) -> (u8, u8) {
    let mut ck_a: u8 = 0;
    let mut ck_b: u8 = 0;
    for byte in data {
        ck_a = ck_a.wrapping_add(*byte);
        ck_b = ck_b.wrapping_add(ck_a);
    }
    (ck_a, ck_b)
}

/// A proptest strategy for generating a `TelemetryPayload`.
fn telemetry_payload_strategy() -> impl Strategy<Value = TelemetryPayload> {
    // Split into smaller tuples to avoid proptest tuple size limits
    let time = (
        any::<u32>(),
        2000u16..2100,
        1u8..=12,
        1u8..=28,
        0u8..24,
        0u8..60,
        0u8..60,
        any::<u8>(),
        any::<u32>(),
        -999_999_999i32..1_000_000_000,
    );
    let fix = (
        any::<u8>(),
        any::<u8>(),
        any::<u8>(),
        any::<u8>(),
        -1_800_000_000i32..=1_800_000_000,
        -900_000_000i32..=900_000_000,
        any::<i32>(),
        any::<i32>(),
    );
    let motion = (
        any::<u32>(),
        any::<u32>(),
        any::<i32>(),
        0i32..36_000_000,
        any::<u32>(),
        any::<u32>(),
        any::<u16>(),
        any::<u8>(),
        any::<u8>(),
    );
    let imu = (
        prop::array::uniform3(any::<i16>()),
        prop::array::uniform3(any::<i16>()),
    );

    (time, fix, motion, imu).prop_map(
        |(
            (itow, year, month, day, hour, minute, second, validity_flags, time_accuracy, nanoseconds),
            (
                fix_status,
                fix_status_flags,
                date_time_flags,
                num_svs,
                longitude,
                latitude,
                wgs_altitude,
                msl_altitude,
            ),
            (
                horizontal_accuracy,
                vertical_accuracy,
                speed,
                heading,
                speed_accuracy,
                heading_accuracy,
                pdop,
                lat_lon_flags,
                battery_status,
            ),
            (g_force, rotation_rate),
        )| TelemetryPayload {
            itow,
            year,
            month,
            day,
            hour,
            minute,
            second,
            validity_flags,
            time_accuracy,
            nanoseconds,
            fix_status,
            fix_status_flags,
            date_time_flags,
            num_svs,
            longitude,
            latitude,
            wgs_altitude,
            msl_altitude,
            horizontal_accuracy,
            vertical_accuracy,
            speed,
            heading,
            speed_accuracy,
            heading_accuracy,
            pdop,
            lat_lon_flags,
            battery_status,
            g_force,
            rotation_rate,
        },
    )
}

/// A proptest strategy that generates a complete, valid frame containing a
/// RaceBox Data Message, along with the source payload struct.
pub fn telemetry_frame_strategy() -> impl Strategy<Value = (TelemetryPayload, Vec<u8>)> {
    telemetry_payload_strategy().prop_map(|payload_struct| {
        let payload = payload_struct.to_bytes();
        let class_id = 0xFF;
        let message_id = 0x01;
        let length = payload.len() as u16;

        let mut frame_core = Vec::with_capacity(4 + payload.len());
        frame_core.push(class_id);
        frame_core.push(message_id);
        frame_core.write_u16::<LittleEndian>(length).unwrap();
        frame_core.extend_from_slice(&payload);

        let (ck_a, ck_b) = calculate_checksum(&frame_core);

        let mut final_frame = Vec::with_capacity(8 + payload.len());
        final_frame.push(SYNC_CHAR_1);
        final_frame.push(SYNC_CHAR_2);
        final_frame.extend_from_slice(&frame_core);
        final_frame.push(ck_a);
        final_frame.push(ck_b);

        (payload_struct, final_frame)
    })
}

fn decode_all(decoder: &mut Decoder<Vec<u8>>, chunk: &[u8]) -> Vec<TelemetryRecord> {
    decoder.feed(chunk).map(|frame| frame.decode()).collect()
}

proptest! {
    #[test]
    fn test_decoder_with_generated_frames((expected, frame) in telemetry_frame_strategy()) {
        let mut decoder = Decoder::default();
        let records = decode_all(&mut decoder, &frame);
        prop_assert_eq!(records.len(), 1);
        let rec = &records[0];

        prop_assert_eq!(rec.itow(), expected.itow);
        prop_assert_eq!(rec.year(), expected.year);
        prop_assert_eq!(rec.month(), expected.month);
        prop_assert_eq!(rec.day(), expected.day);
        prop_assert_eq!(rec.hour(), expected.hour);
        prop_assert_eq!(rec.minute(), expected.minute);
        prop_assert_eq!(rec.second(), expected.second);
        prop_assert_eq!(rec.validity_flags().bits(), expected.validity_flags);
        prop_assert_eq!(rec.time_accuracy(), expected.time_accuracy);
        prop_assert_eq!(rec.nanoseconds(), expected.nanoseconds);
        prop_assert_eq!(rec.fix_status_raw(), expected.fix_status);
        prop_assert_eq!(rec.fix_status_flags().bits(), expected.fix_status_flags);
        prop_assert_eq!(rec.date_time_flags().bits(), expected.date_time_flags);
        prop_assert_eq!(rec.num_svs(), expected.num_svs);
        prop_assert_eq!(rec.longitude_raw(), expected.longitude);
        prop_assert_eq!(rec.latitude_raw(), expected.latitude);
        prop_assert_eq!(rec.wgs_altitude_raw(), expected.wgs_altitude);
        prop_assert_eq!(rec.msl_altitude_raw(), expected.msl_altitude);
        prop_assert_eq!(rec.horizontal_accuracy_raw(), expected.horizontal_accuracy);
        prop_assert_eq!(rec.vertical_accuracy_raw(), expected.vertical_accuracy);
        prop_assert_eq!(rec.speed_raw(), expected.speed);
        prop_assert_eq!(rec.heading_raw(), expected.heading);
        prop_assert_eq!(rec.speed_accuracy_raw(), expected.speed_accuracy);
        prop_assert_eq!(rec.heading_accuracy_raw(), expected.heading_accuracy);
        prop_assert_eq!(rec.pdop_raw(), expected.pdop);
        prop_assert_eq!(rec.lat_lon_flags().bits(), expected.lat_lon_flags);
        prop_assert_eq!(rec.battery_status().bits(), expected.battery_status);
        prop_assert_eq!(rec.g_force_raw(), expected.g_force);
        prop_assert_eq!(rec.rotation_rate_raw(), expected.rotation_rate);

        prop_assert_eq!(rec.longitude(), f64::from(expected.longitude) / 1e7);
        prop_assert_eq!(rec.speed(), f64::from(expected.speed) / 1000.0);
        prop_assert!(rec.heading() >= 0.0 && rec.heading() < 360.0);
        prop_assert_eq!(&rec.to_packet_bytes()[..], &frame[..]);
    }

    #[test]
    fn test_decoder_chunk_boundaries((_expected, frame) in telemetry_frame_strategy(), split in 0usize..=88, split2 in 0usize..=88) {
        let mut whole = Decoder::default();
        let reference = decode_all(&mut whole, &frame);

        let (first, second) = (split.min(split2), split.max(split2));
        let mut decoder = Decoder::default();
        let mut records = decode_all(&mut decoder, &frame[..first]);
        records.extend(decode_all(&mut decoder, &frame[first..second]));
        records.extend(decode_all(&mut decoder, &frame[second..]));

        prop_assert_eq!(records, reference);
        prop_assert!(decoder.is_buffer_empty());
    }

    #[test]
    fn test_decoder_resyncs_after_garbage(
        (_expected, frame) in telemetry_frame_strategy(),
        garbage in prop::collection::vec(any::<u8>(), 0..200),
    ) {
        let mut stream = garbage.clone();
        stream.extend_from_slice(&frame);
        stream.extend_from_slice(&frame);

        let mut decoder = Decoder::new(FixedBuffer::<512>::new());
        prop_assert_eq!(decoder.feed(&stream).count(), 2);
        // Every garbage byte is accounted for, either skipped or dropped with a rejected candidate
        let stats = decoder.stats();
        prop_assert_eq!(
            stats.skipped_bytes + stats.rejected_headers + stats.checksum_errors,
            garbage.len() as u64
        );

        let mut decoder = Decoder::default();
        let records = decode_all(&mut decoder, &stream);
        prop_assert_eq!(records.last(), Some(&TelemetryRecord::try_from(&frame[..]).unwrap()));
    }
}
