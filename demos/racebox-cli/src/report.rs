use std::fmt;

use racebox::{Axes, Battery, DeviceKind, FixStatus, TelemetryRecord};
use serde::Serialize;

/// A decoded record in physical units, for printing
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    device: Option<&'a str>,
    kind: DeviceKind,
    itow: u32,
    timestamp: String,
    valid_date: bool,
    valid_time: bool,
    fully_resolved: bool,
    valid_mag_decl: bool,
    time_accuracy_ns: u32,
    #[serde(serialize_with = "fix_status_raw")]
    fix_status: FixStatus,
    valid_fix: bool,
    diff_corr_applied: bool,
    power_state: u8,
    valid_heading: bool,
    carrier_phase: u8,
    date_time_confirmed: bool,
    date_valid_confirmed: bool,
    time_valid_confirmed: bool,
    num_svs: u8,
    longitude: f64,
    latitude: f64,
    wgs_altitude: f64,
    msl_altitude: f64,
    horizontal_accuracy: f64,
    vertical_accuracy: f64,
    speed: f64,
    heading: f64,
    speed_accuracy: f64,
    heading_accuracy: f64,
    pdop: f64,
    invalid_lat_lon: bool,
    diff_corr_age: u8,
    battery: Battery,
    g_force: Axes,
    rotation_rate: Axes,
}

fn fix_status_raw<S: serde::Serializer>(fix: &FixStatus, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(u8::from(*fix))
}

impl<'a> Report<'a> {
    pub fn new(device: Option<&'a str>, kind: DeviceKind, record: &TelemetryRecord) -> Self {
        Self {
            device,
            kind,
            itow: record.itow(),
            timestamp: record.timestamp().to_string(),
            valid_date: record.valid_date(),
            valid_time: record.valid_time(),
            fully_resolved: record.fully_resolved(),
            valid_mag_decl: record.valid_mag_decl(),
            time_accuracy_ns: record.time_accuracy(),
            fix_status: record.fix_status(),
            valid_fix: record.valid_fix(),
            diff_corr_applied: record.diff_corr_applied(),
            power_state: record.power_state(),
            valid_heading: record.valid_heading(),
            carrier_phase: record.carrier_phase(),
            date_time_confirmed: record.date_time_confirmed(),
            date_valid_confirmed: record.date_valid_confirmed(),
            time_valid_confirmed: record.time_valid_confirmed(),
            num_svs: record.num_svs(),
            longitude: record.longitude(),
            latitude: record.latitude(),
            wgs_altitude: record.wgs_altitude(),
            msl_altitude: record.msl_altitude(),
            horizontal_accuracy: record.horizontal_accuracy(),
            vertical_accuracy: record.vertical_accuracy(),
            speed: record.speed(),
            heading: record.heading(),
            speed_accuracy: record.speed_accuracy(),
            heading_accuracy: record.heading_accuracy(),
            pdop: record.pdop(),
            invalid_lat_lon: record.invalid_lat_lon(),
            diff_corr_age: record.diff_corr_age(),
            battery: kind.battery(record),
            g_force: record.g_force(),
            rotation_rate: record.rotation_rate(),
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.device {
            Some(name) => writeln!(f, "RaceBox Data [{name}]:")?,
            None => writeln!(f, "RaceBox Data:")?,
        }
        writeln!(f, "iTOW: {} ms", self.itow)?;
        writeln!(f, "Timestamp: {} UTC", self.timestamp)?;
        writeln!(
            f,
            "Validity Flags: Date={}, Time={}, Resolved={}, MagDecl={}",
            self.valid_date, self.valid_time, self.fully_resolved, self.valid_mag_decl
        )?;
        writeln!(f, "Time Accuracy: {} ns", self.time_accuracy_ns)?;
        writeln!(f, "Fix Status: {}", self.fix_status)?;
        writeln!(
            f,
            "Fix Status Flags: ValidFix={}, DiffCorr={}, PowerState={}, Heading={}, CarrierPhase={}",
            self.valid_fix,
            self.diff_corr_applied,
            self.power_state,
            self.valid_heading,
            self.carrier_phase
        )?;
        writeln!(
            f,
            "Date/Time Flags: Confirmed={}, DateValid={}, TimeValid={}",
            self.date_time_confirmed, self.date_valid_confirmed, self.time_valid_confirmed
        )?;
        writeln!(f, "Number of SVs: {}", self.num_svs)?;
        writeln!(f, "Longitude: {:.7} degrees", self.longitude)?;
        writeln!(f, "Latitude: {:.7} degrees", self.latitude)?;
        writeln!(f, "WGS Altitude: {:.3} m", self.wgs_altitude)?;
        writeln!(f, "MSL Altitude: {:.3} m", self.msl_altitude)?;
        writeln!(f, "Horizontal Accuracy: {:.3} m", self.horizontal_accuracy)?;
        writeln!(f, "Vertical Accuracy: {:.3} m", self.vertical_accuracy)?;
        writeln!(f, "Speed: {:.3} m/s", self.speed)?;
        writeln!(f, "Heading: {:.5} degrees", self.heading)?;
        writeln!(f, "Speed Accuracy: {:.3} m/s", self.speed_accuracy)?;
        writeln!(f, "Heading Accuracy: {:.5} degrees", self.heading_accuracy)?;
        writeln!(f, "PDOP: {:.2}", self.pdop)?;
        writeln!(
            f,
            "Lat/Lon Flags: InvalidLatLon={}, DiffCorrAge={}",
            self.invalid_lat_lon, self.diff_corr_age
        )?;
        writeln!(f, "Battery: {} ({})", self.battery, self.kind)?;
        writeln!(
            f,
            "G-Force: X={:.3} g, Y={:.3} g, Z={:.3} g",
            self.g_force.x, self.g_force.y, self.g_force.z
        )?;
        write!(
            f,
            "Rotation Rate: X={:.2} deg/s, Y={:.2} deg/s, Z={:.2} deg/s",
            self.rotation_rate.x, self.rotation_rate.y, self.rotation_rate.z
        )
    }
}
