use rand::Rng;

use crate::{
    constants::TELEMETRY_PAYLOAD_LEN,
    packets::{offset, TelemetryRecord},
};

impl TelemetryRecord {
    /// A random record for running without a device.
    ///
    /// Values stay within the ranges a device can report: the date and time form a
    /// valid UTC instant, coordinates are in range and the fix status is one of no
    /// fix, 2D or 3D. Flag bytes are random.
    pub fn simulated<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut payload = [0u8; TELEMETRY_PAYLOAD_LEN];
        let mut put = |at: usize, bytes: &[u8]| {
            payload[at..at + bytes.len()].copy_from_slice(bytes);
        };

        put(offset::ITOW, &rng.random_range(0..604_800_000u32).to_le_bytes());
        put(offset::YEAR, &rng.random_range(2000..2030u16).to_le_bytes());
        put(
            offset::MONTH,
            &[
                rng.random_range(1..=12u8),
                rng.random_range(1..=28u8),
                rng.random_range(0..24u8),
                rng.random_range(0..60u8),
                rng.random_range(0..60u8),
                rng.random::<u8>(),
            ],
        );
        put(offset::TIME_ACCURACY, &rng.random_range(0..100_000u32).to_le_bytes());
        put(
            offset::NANOSECONDS,
            &rng.random_range(0..1_000_000_000i32).to_le_bytes(),
        );
        const FIX_STATUS: [u8; 3] = [0, 2, 3];
        put(
            offset::FIX_STATUS,
            &[
                FIX_STATUS[rng.random_range(0..FIX_STATUS.len())],
                rng.random::<u8>(),
                rng.random::<u8>(),
                rng.random_range(0..32u8),
            ],
        );
        put(
            offset::LONGITUDE,
            &rng.random_range(-1_800_000_000..1_800_000_000i32).to_le_bytes(),
        );
        put(
            offset::LATITUDE,
            &rng.random_range(-900_000_000..900_000_000i32).to_le_bytes(),
        );
        put(offset::WGS_ALTITUDE, &rng.random_range(-10_000..10_000i32).to_le_bytes());
        put(offset::MSL_ALTITUDE, &rng.random_range(-10_000..10_000i32).to_le_bytes());
        put(
            offset::HORIZONTAL_ACCURACY,
            &rng.random_range(0..50_000u32).to_le_bytes(),
        );
        put(
            offset::VERTICAL_ACCURACY,
            &rng.random_range(0..50_000u32).to_le_bytes(),
        );
        put(offset::SPEED, &rng.random_range(0..100_000i32).to_le_bytes());
        put(offset::HEADING, &rng.random_range(0..36_000_000i32).to_le_bytes());
        put(offset::SPEED_ACCURACY, &rng.random_range(0..5_000u32).to_le_bytes());
        put(
            offset::HEADING_ACCURACY,
            &rng.random_range(0..18_000_000u32).to_le_bytes(),
        );
        put(offset::PDOP, &rng.random_range(0..1000u16).to_le_bytes());
        put(offset::LAT_LON_FLAGS, &[rng.random::<u8>(), rng.random::<u8>()]);
        for axis in 0..6 {
            put(offset::G_FORCE + 2 * axis, &rng.random::<i16>().to_le_bytes());
        }

        Self::from_payload(&payload)
    }
}
