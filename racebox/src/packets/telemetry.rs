use core::fmt;

use bitflags::bitflags;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::frame_bytes;
use crate::{
    constants::{
        HEADER_LEN, RACEBOX_CLASS, TELEMETRY_FRAME_LEN, TELEMETRY_MSG_ID, TELEMETRY_PACKET_LEN,
        TELEMETRY_PAYLOAD_LEN,
    },
    error::{DateTimeError, ParserError},
    parser::validate_frame,
};

/// Payload offsets of the RaceBox Data Message fields
pub(crate) mod offset {
    pub const ITOW: usize = 0;
    pub const YEAR: usize = 4;
    pub const MONTH: usize = 6;
    pub const DAY: usize = 7;
    pub const HOUR: usize = 8;
    pub const MINUTE: usize = 9;
    pub const SECOND: usize = 10;
    pub const VALIDITY_FLAGS: usize = 11;
    pub const TIME_ACCURACY: usize = 12;
    pub const NANOSECONDS: usize = 16;
    pub const FIX_STATUS: usize = 20;
    pub const FIX_STATUS_FLAGS: usize = 21;
    pub const DATE_TIME_FLAGS: usize = 22;
    pub const NUM_SVS: usize = 23;
    pub const LONGITUDE: usize = 24;
    pub const LATITUDE: usize = 28;
    pub const WGS_ALTITUDE: usize = 32;
    pub const MSL_ALTITUDE: usize = 36;
    pub const HORIZONTAL_ACCURACY: usize = 40;
    pub const VERTICAL_ACCURACY: usize = 44;
    pub const SPEED: usize = 48;
    pub const HEADING: usize = 52;
    pub const SPEED_ACCURACY: usize = 56;
    pub const HEADING_ACCURACY: usize = 60;
    pub const PDOP: usize = 64;
    pub const LAT_LON_FLAGS: usize = 66;
    pub const BATTERY_STATUS: usize = 67;
    pub const G_FORCE: usize = 68;
    pub const ROTATION_RATE: usize = 74;
}

bitflags! {
    /// Validity of the UTC date and time fields
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ValidityFlags: u8 {
        /// 1 = valid UTC Date
        const VALID_DATE = 0x01;
        /// 1 = valid UTC time of day
        const VALID_TIME = 0x02;
        /// 1 = UTC time of day has been fully resolved (no seconds uncertainty)
        const FULLY_RESOLVED = 0x04;
        /// 1 = valid magnetic declination
        const VALID_MAG_DECL = 0x08;
    }
}

bitflags! {
    /// Fix status flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct FixStatusFlags: u8 {
        /// 1 = Position and velocity valid and within DOP and accuracy masks
        const VALID_FIX = 0x01;
        /// 1 = Differential corrections were applied
        const DIFF_CORR_APPLIED = 0x02;
        /// Power save mode state, see [`FixStatusFlags::power_state`]
        const POWER_STATE = 0b0001_1100;
        /// 1 = Heading is valid
        const VALID_HEADING = 0x20;
        /// Carrier phase range solution, see [`FixStatusFlags::carrier_phase`]
        const CARRIER_PHASE = 0b1100_0000;
    }
}

impl FixStatusFlags {
    /// Power save mode state (bits 2-4)
    pub const fn power_state(self) -> u8 {
        (self.bits() & Self::POWER_STATE.bits()) >> 2
    }

    /// Carrier phase solution state (bits 6-7)
    ///
    /// - `0`: no carrier phase range solution
    /// - `1`: solution with floating ambiguities
    /// - `2`: solution with fixed ambiguities
    pub const fn carrier_phase(self) -> u8 {
        (self.bits() & Self::CARRIER_PHASE.bits()) >> 6
    }
}

bitflags! {
    /// Confirmation of the UTC date and time validity
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DateTimeFlags: u8 {
        /// 1 = information about UTC Date and Time of Day validity confirmation is available
        const DATE_TIME_CONFIRMED = 0x20;
        /// 1 = UTC Date validity could be confirmed
        const DATE_VALID_CONFIRMED = 0x40;
        /// 1 = UTC Time of Day validity could be confirmed
        const TIME_VALID_CONFIRMED = 0x80;
    }
}

impl From<u8> for ValidityFlags {
    fn from(val: u8) -> Self {
        Self::from_bits_retain(val)
    }
}

impl From<u8> for FixStatusFlags {
    fn from(val: u8) -> Self {
        Self::from_bits_retain(val)
    }
}

impl From<u8> for DateTimeFlags {
    fn from(val: u8) -> Self {
        Self::from_bits_retain(val)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "u8", into = "u8")
)]
pub struct LatLonFlags {
    bits: u8,
    invalid_lat_lon: bool,
    diff_corr_age: u8,
}

impl LatLonFlags {
    /// 1 = Invalid longitude, latitude and altitudes
    pub fn invalid_lat_lon(&self) -> bool {
        self.invalid_lat_lon
    }

    /// Age of the most recently received differential correction
    ///
    /// Values:
    /// - `0`: Not available
    /// - `1`: Age between 0 and 1 second
    /// - `2`: Age between 1 (inclusive) and 2 seconds
    /// - `3`: Age between 2 (inclusive) and 5 seconds
    /// - `4`: Age between 5 (inclusive) and 10 seconds
    /// - `5`: Age between 10 (inclusive) and 15 seconds
    /// - `6`: Age between 15 (inclusive) and 20 seconds
    /// - `7`: Age between 20 (inclusive) and 30 seconds
    /// - `8`: Age between 30 (inclusive) and 45 seconds
    /// - `9`: Age between 45 (inclusive) and 60 seconds
    /// - `10`: Age between 60 (inclusive) and 90 seconds
    /// - `11`: Age between 90 (inclusive) and 120 seconds
    /// - `>=12`: Age greater or equal than 120 seconds
    pub fn diff_corr_age(&self) -> u8 {
        self.diff_corr_age
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }
}

impl From<u8> for LatLonFlags {
    fn from(val: u8) -> Self {
        const DIFF_CORR_AGE_MASK: u8 = 0b0001_1110;
        Self {
            bits: val,
            invalid_lat_lon: val & 0x01 == 1,
            diff_corr_age: (val & DIFF_CORR_AGE_MASK) >> 1, // bits 1–4
        }
    }
}

impl From<LatLonFlags> for u8 {
    fn from(flags: LatLonFlags) -> u8 {
        flags.bits
    }
}

/// The battery byte as sent by the Mini and Mini S
///
/// The Micro reuses the byte for the input voltage, see [`Battery`](crate::Battery)
/// for a device aware interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "u8", into = "u8")
)]
pub struct BatteryStatus {
    bits: u8,
    is_charging: bool,
    percent: u8,
}

impl BatteryStatus {
    pub fn is_charging(&self) -> bool {
        self.is_charging
    }

    /// Remaining charge, 0-100
    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }
}

impl From<u8> for BatteryStatus {
    fn from(val: u8) -> Self {
        Self {
            bits: val,
            is_charging: val & 0x80 != 0,
            percent: val & 0x7f,
        }
    }
}

impl From<BatteryStatus> for u8 {
    fn from(status: BatteryStatus) -> u8 {
        status.bits
    }
}

/// GNSS fix type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FixStatus {
    NoFix,
    Fix2D,
    Fix3D,
    /// Value the devices are not documented to send
    Other(u8),
}

impl From<u8> for FixStatus {
    fn from(val: u8) -> Self {
        match val {
            0 => Self::NoFix,
            2 => Self::Fix2D,
            3 => Self::Fix3D,
            other => Self::Other(other),
        }
    }
}

impl From<FixStatus> for u8 {
    fn from(status: FixStatus) -> u8 {
        match status {
            FixStatus::NoFix => 0,
            FixStatus::Fix2D => 2,
            FixStatus::Fix3D => 3,
            FixStatus::Other(val) => val,
        }
    }
}

impl fmt::Display for FixStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFix => f.write_str("no fix"),
            Self::Fix2D => f.write_str("2D"),
            Self::Fix3D => f.write_str("3D"),
            Self::Other(val) => write!(f, "unknown ({val})"),
        }
    }
}

/// Three axis measurement in physical units
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Axes {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Axes {
    fn scaled(raw: [i16; 3], divisor: f64) -> Self {
        Self {
            x: f64::from(raw[0]) / divisor,
            y: f64::from(raw[1]) / divisor,
            z: f64::from(raw[2]) / divisor,
        }
    }
}

/// UTC date and time of a record. Displays as `YYYY-MM-DD HH:MM:SS.nnnnnnnnn`.
///
/// The components are shown as received, no calendar validation happens here. Use the
/// `DateTime<Utc>` conversion of [`TelemetryRecord`] for a checked value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Fraction of second, range -1e9 .. 1e9 (UTC)
    pub nanoseconds: i32,
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )?;
        if self.nanoseconds < 0 {
            f.write_str("-")?;
        }
        write!(f, "{:09}", self.nanoseconds.unsigned_abs())
    }
}

/// A checksum-valid telemetry frame, sync marker and header included, checksum stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryFrame([u8; TELEMETRY_FRAME_LEN]);

impl TelemetryFrame {
    pub(crate) fn new(bytes: [u8; TELEMETRY_FRAME_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; TELEMETRY_FRAME_LEN] {
        &self.0
    }

    pub fn payload(&self) -> &[u8] {
        &self.0[HEADER_LEN..]
    }

    /// Decode the frame into a record, cannot fail since the frame was validated
    pub fn decode(&self) -> TelemetryRecord {
        TelemetryRecord::parse(self.payload())
    }
}

impl From<TelemetryFrame> for TelemetryRecord {
    fn from(frame: TelemetryFrame) -> Self {
        frame.decode()
    }
}

/// RaceBox Data Message, one navigation and IMU sample
///
/// Records are immutable. A new sample always means a new value, built in one go
/// by [`TelemetryFrame::decode`] or one of the constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TelemetryRecord {
    itow: u32,
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    validity_flags: ValidityFlags,
    time_accuracy: u32,
    nanoseconds: i32,
    fix_status: u8,
    fix_status_flags: FixStatusFlags,
    date_time_flags: DateTimeFlags,
    num_svs: u8,
    longitude: i32,
    latitude: i32,
    wgs_altitude: i32,
    msl_altitude: i32,
    horizontal_accuracy: u32,
    vertical_accuracy: u32,
    speed: i32,
    heading: i32,
    speed_accuracy: u32,
    heading_accuracy: u32,
    pdop: u16,
    lat_lon_flags: LatLonFlags,
    battery_status: BatteryStatus,
    g_force: [i16; 3],
    rotation_rate: [i16; 3],
}

fn read_u16(payload: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([payload[at], payload[at + 1]])
}

fn read_i16(payload: &[u8], at: usize) -> i16 {
    i16::from_le_bytes([payload[at], payload[at + 1]])
}

fn read_u32(payload: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([payload[at], payload[at + 1], payload[at + 2], payload[at + 3]])
}

fn read_i32(payload: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([payload[at], payload[at + 1], payload[at + 2], payload[at + 3]])
}

fn read_axes(payload: &[u8], at: usize) -> [i16; 3] {
    [
        read_i16(payload, at),
        read_i16(payload, at + 2),
        read_i16(payload, at + 4),
    ]
}

impl TelemetryRecord {
    /// Decode a bare 80-byte payload
    pub fn from_payload(payload: &[u8; TELEMETRY_PAYLOAD_LEN]) -> Self {
        Self::parse(payload)
    }

    /// `payload` is at least `TELEMETRY_PAYLOAD_LEN` long
    fn parse(payload: &[u8]) -> Self {
        debug_assert!(payload.len() >= TELEMETRY_PAYLOAD_LEN);
        Self {
            itow: read_u32(payload, offset::ITOW),
            year: read_u16(payload, offset::YEAR),
            month: payload[offset::MONTH],
            day: payload[offset::DAY],
            hour: payload[offset::HOUR],
            minute: payload[offset::MINUTE],
            second: payload[offset::SECOND],
            validity_flags: payload[offset::VALIDITY_FLAGS].into(),
            time_accuracy: read_u32(payload, offset::TIME_ACCURACY),
            nanoseconds: read_i32(payload, offset::NANOSECONDS),
            fix_status: payload[offset::FIX_STATUS],
            fix_status_flags: payload[offset::FIX_STATUS_FLAGS].into(),
            date_time_flags: payload[offset::DATE_TIME_FLAGS].into(),
            num_svs: payload[offset::NUM_SVS],
            longitude: read_i32(payload, offset::LONGITUDE),
            latitude: read_i32(payload, offset::LATITUDE),
            wgs_altitude: read_i32(payload, offset::WGS_ALTITUDE),
            msl_altitude: read_i32(payload, offset::MSL_ALTITUDE),
            horizontal_accuracy: read_u32(payload, offset::HORIZONTAL_ACCURACY),
            vertical_accuracy: read_u32(payload, offset::VERTICAL_ACCURACY),
            speed: read_i32(payload, offset::SPEED),
            heading: read_i32(payload, offset::HEADING),
            speed_accuracy: read_u32(payload, offset::SPEED_ACCURACY),
            heading_accuracy: read_u32(payload, offset::HEADING_ACCURACY),
            pdop: read_u16(payload, offset::PDOP),
            lat_lon_flags: payload[offset::LAT_LON_FLAGS].into(),
            battery_status: payload[offset::BATTERY_STATUS].into(),
            g_force: read_axes(payload, offset::G_FORCE),
            rotation_rate: read_axes(payload, offset::ROTATION_RATE),
        }
    }

    /// Serialise back into the 80-byte payload layout
    pub fn to_payload(&self) -> [u8; TELEMETRY_PAYLOAD_LEN] {
        fn put(payload: &mut [u8], at: usize, bytes: &[u8]) {
            payload[at..at + bytes.len()].copy_from_slice(bytes);
        }

        let mut payload = [0u8; TELEMETRY_PAYLOAD_LEN];
        put(&mut payload, offset::ITOW, &self.itow.to_le_bytes());
        put(&mut payload, offset::YEAR, &self.year.to_le_bytes());
        payload[offset::MONTH] = self.month;
        payload[offset::DAY] = self.day;
        payload[offset::HOUR] = self.hour;
        payload[offset::MINUTE] = self.minute;
        payload[offset::SECOND] = self.second;
        payload[offset::VALIDITY_FLAGS] = self.validity_flags.bits();
        put(&mut payload, offset::TIME_ACCURACY, &self.time_accuracy.to_le_bytes());
        put(&mut payload, offset::NANOSECONDS, &self.nanoseconds.to_le_bytes());
        payload[offset::FIX_STATUS] = self.fix_status;
        payload[offset::FIX_STATUS_FLAGS] = self.fix_status_flags.bits();
        payload[offset::DATE_TIME_FLAGS] = self.date_time_flags.bits();
        payload[offset::NUM_SVS] = self.num_svs;
        put(&mut payload, offset::LONGITUDE, &self.longitude.to_le_bytes());
        put(&mut payload, offset::LATITUDE, &self.latitude.to_le_bytes());
        put(&mut payload, offset::WGS_ALTITUDE, &self.wgs_altitude.to_le_bytes());
        put(&mut payload, offset::MSL_ALTITUDE, &self.msl_altitude.to_le_bytes());
        put(
            &mut payload,
            offset::HORIZONTAL_ACCURACY,
            &self.horizontal_accuracy.to_le_bytes(),
        );
        put(
            &mut payload,
            offset::VERTICAL_ACCURACY,
            &self.vertical_accuracy.to_le_bytes(),
        );
        put(&mut payload, offset::SPEED, &self.speed.to_le_bytes());
        put(&mut payload, offset::HEADING, &self.heading.to_le_bytes());
        put(&mut payload, offset::SPEED_ACCURACY, &self.speed_accuracy.to_le_bytes());
        put(
            &mut payload,
            offset::HEADING_ACCURACY,
            &self.heading_accuracy.to_le_bytes(),
        );
        put(&mut payload, offset::PDOP, &self.pdop.to_le_bytes());
        payload[offset::LAT_LON_FLAGS] = self.lat_lon_flags.bits();
        payload[offset::BATTERY_STATUS] = self.battery_status.bits();
        for (axis, value) in self.g_force.iter().enumerate() {
            put(&mut payload, offset::G_FORCE + 2 * axis, &value.to_le_bytes());
        }
        for (axis, value) in self.rotation_rate.iter().enumerate() {
            put(&mut payload, offset::ROTATION_RATE + 2 * axis, &value.to_le_bytes());
        }
        payload
    }

    /// Serialise into a complete, checksummed frame as the device would send it
    pub fn to_packet_bytes(&self) -> [u8; TELEMETRY_PACKET_LEN] {
        frame_bytes(RACEBOX_CLASS, TELEMETRY_MSG_ID, &self.to_payload())
    }

    /// GPS time of week of the navigation epoch, ms
    pub fn itow(&self) -> u32 {
        self.itow
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    /// Fraction of second, range -1e9 .. 1e9 (UTC)
    pub fn nanoseconds(&self) -> i32 {
        self.nanoseconds
    }

    /// Time accuracy estimate, ns
    pub fn time_accuracy(&self) -> u32 {
        self.time_accuracy
    }

    pub fn timestamp(&self) -> Timestamp {
        Timestamp {
            year: self.year,
            month: self.month,
            day: self.day,
            hour: self.hour,
            minute: self.minute,
            second: self.second,
            nanoseconds: self.nanoseconds,
        }
    }

    pub fn validity_flags(&self) -> ValidityFlags {
        self.validity_flags
    }

    pub fn valid_date(&self) -> bool {
        self.validity_flags.contains(ValidityFlags::VALID_DATE)
    }

    pub fn valid_time(&self) -> bool {
        self.validity_flags.contains(ValidityFlags::VALID_TIME)
    }

    pub fn fully_resolved(&self) -> bool {
        self.validity_flags.contains(ValidityFlags::FULLY_RESOLVED)
    }

    pub fn valid_mag_decl(&self) -> bool {
        self.validity_flags.contains(ValidityFlags::VALID_MAG_DECL)
    }

    pub fn fix_status(&self) -> FixStatus {
        self.fix_status.into()
    }

    pub fn fix_status_raw(&self) -> u8 {
        self.fix_status
    }

    pub fn fix_status_flags(&self) -> FixStatusFlags {
        self.fix_status_flags
    }

    pub fn valid_fix(&self) -> bool {
        self.fix_status_flags.contains(FixStatusFlags::VALID_FIX)
    }

    pub fn diff_corr_applied(&self) -> bool {
        self.fix_status_flags
            .contains(FixStatusFlags::DIFF_CORR_APPLIED)
    }

    pub fn power_state(&self) -> u8 {
        self.fix_status_flags.power_state()
    }

    pub fn valid_heading(&self) -> bool {
        self.fix_status_flags.contains(FixStatusFlags::VALID_HEADING)
    }

    pub fn carrier_phase(&self) -> u8 {
        self.fix_status_flags.carrier_phase()
    }

    pub fn date_time_flags(&self) -> DateTimeFlags {
        self.date_time_flags
    }

    pub fn date_time_confirmed(&self) -> bool {
        self.date_time_flags
            .contains(DateTimeFlags::DATE_TIME_CONFIRMED)
    }

    pub fn date_valid_confirmed(&self) -> bool {
        self.date_time_flags
            .contains(DateTimeFlags::DATE_VALID_CONFIRMED)
    }

    pub fn time_valid_confirmed(&self) -> bool {
        self.date_time_flags
            .contains(DateTimeFlags::TIME_VALID_CONFIRMED)
    }

    /// Number of satellites used in the navigation solution
    pub fn num_svs(&self) -> u8 {
        self.num_svs
    }

    /// Longitude, degrees
    pub fn longitude(&self) -> f64 {
        f64::from(self.longitude) / 1e7
    }

    pub fn longitude_raw(&self) -> i32 {
        self.longitude
    }

    /// Latitude, degrees
    pub fn latitude(&self) -> f64 {
        f64::from(self.latitude) / 1e7
    }

    pub fn latitude_raw(&self) -> i32 {
        self.latitude
    }

    /// Height above the WGS84 ellipsoid, m
    pub fn wgs_altitude(&self) -> f64 {
        f64::from(self.wgs_altitude) / 1e3
    }

    pub fn wgs_altitude_raw(&self) -> i32 {
        self.wgs_altitude
    }

    /// Height above mean sea level, m
    pub fn msl_altitude(&self) -> f64 {
        f64::from(self.msl_altitude) / 1e3
    }

    pub fn msl_altitude_raw(&self) -> i32 {
        self.msl_altitude
    }

    /// Horizontal accuracy estimate, m
    pub fn horizontal_accuracy(&self) -> f64 {
        f64::from(self.horizontal_accuracy) / 1e3
    }

    pub fn horizontal_accuracy_raw(&self) -> u32 {
        self.horizontal_accuracy
    }

    /// Vertical accuracy estimate, m
    pub fn vertical_accuracy(&self) -> f64 {
        f64::from(self.vertical_accuracy) / 1e3
    }

    pub fn vertical_accuracy_raw(&self) -> u32 {
        self.vertical_accuracy
    }

    /// Ground speed, m/s
    pub fn speed(&self) -> f64 {
        f64::from(self.speed) / 1e3
    }

    pub fn speed_raw(&self) -> i32 {
        self.speed
    }

    /// Heading of motion, degrees
    pub fn heading(&self) -> f64 {
        f64::from(self.heading) / 1e5
    }

    pub fn heading_raw(&self) -> i32 {
        self.heading
    }

    /// Speed accuracy estimate, m/s
    pub fn speed_accuracy(&self) -> f64 {
        f64::from(self.speed_accuracy) / 1e3
    }

    pub fn speed_accuracy_raw(&self) -> u32 {
        self.speed_accuracy
    }

    /// Heading accuracy estimate, degrees
    pub fn heading_accuracy(&self) -> f64 {
        f64::from(self.heading_accuracy) / 1e5
    }

    pub fn heading_accuracy_raw(&self) -> u32 {
        self.heading_accuracy
    }

    /// Position dilution of precision
    pub fn pdop(&self) -> f64 {
        f64::from(self.pdop) / 1e2
    }

    pub fn pdop_raw(&self) -> u16 {
        self.pdop
    }

    pub fn lat_lon_flags(&self) -> LatLonFlags {
        self.lat_lon_flags
    }

    pub fn invalid_lat_lon(&self) -> bool {
        self.lat_lon_flags.invalid_lat_lon()
    }

    pub fn diff_corr_age(&self) -> u8 {
        self.lat_lon_flags.diff_corr_age()
    }

    pub fn battery_status(&self) -> BatteryStatus {
        self.battery_status
    }

    pub fn is_charging(&self) -> bool {
        self.battery_status.is_charging()
    }

    pub fn battery_percent(&self) -> u8 {
        self.battery_status.percent()
    }

    /// Acceleration, g
    pub fn g_force(&self) -> Axes {
        Axes::scaled(self.g_force, 1e3)
    }

    /// Acceleration, milli-g, x/y/z
    pub fn g_force_raw(&self) -> [i16; 3] {
        self.g_force
    }

    /// Rotation rate, degrees per second
    pub fn rotation_rate(&self) -> Axes {
        Axes::scaled(self.rotation_rate, 1e2)
    }

    /// Rotation rate, centi-degrees per second, x/y/z
    pub fn rotation_rate_raw(&self) -> [i16; 3] {
        self.rotation_rate
    }
}

impl TryFrom<&[u8]> for TelemetryRecord {
    type Error = ParserError;

    /// Validate and decode one complete telemetry frame
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let frame = validate_frame(bytes)?;
        if frame.class() != RACEBOX_CLASS || frame.msg_id() != TELEMETRY_MSG_ID {
            return Err(ParserError::UnexpectedMessage {
                class: frame.class(),
                msg_id: frame.msg_id(),
            });
        }
        if frame.payload().len() != TELEMETRY_PAYLOAD_LEN {
            return Err(ParserError::InvalidPacketLen {
                packet: "RaceBoxData",
                expect: TELEMETRY_PAYLOAD_LEN,
                got: frame.payload().len(),
            });
        }
        Ok(Self::parse(frame.payload()))
    }
}

impl TryFrom<&TelemetryRecord> for DateTime<Utc> {
    type Error = DateTimeError;
    fn try_from(rec: &TelemetryRecord) -> Result<Self, Self::Error> {
        let date = NaiveDate::from_ymd_opt(
            i32::from(rec.year),
            u32::from(rec.month),
            u32::from(rec.day),
        )
        .ok_or(DateTimeError::InvalidDate)?;
        const NANOS_LIM: u32 = 1_000_000_000;
        if rec.nanoseconds.unsigned_abs() >= NANOS_LIM {
            return Err(DateTimeError::InvalidNanoseconds);
        }

        let (hour, minute) = (u32::from(rec.hour), u32::from(rec.minute));
        let dt = if rec.second == 60 {
            // Leap second: chrono keeps it as second 59 with a nanosecond field past 1e9
            let nanos = NANOS_LIM
                .checked_add_signed(rec.nanoseconds)
                .ok_or(DateTimeError::InvalidNanoseconds)?;
            let time = NaiveTime::from_hms_nano_opt(hour, minute, 59, nanos)
                .ok_or(DateTimeError::InvalidTime)?;
            NaiveDateTime::new(date, time)
        } else {
            let time = NaiveTime::from_hms_opt(hour, minute, u32::from(rec.second))
                .ok_or(DateTimeError::InvalidTime)?;
            NaiveDateTime::new(date, time)
                + chrono::Duration::nanoseconds(i64::from(rec.nanoseconds))
        };

        Ok(DateTime::from_naive_utc_and_offset(dt, Utc))
    }
}
