use byteorder::{ByteOrder, LittleEndian};
use racebox::{
    constants::TELEMETRY_PAYLOAD_LEN, Battery, DeviceKind, FixStatus, FixStatusFlags,
    TelemetryRecord, ValidityFlags,
};

fn record(edit: impl FnOnce(&mut [u8; TELEMETRY_PAYLOAD_LEN])) -> TelemetryRecord {
    let mut payload = [0; TELEMETRY_PAYLOAD_LEN];
    edit(&mut payload);
    TelemetryRecord::from_payload(&payload)
}

#[test]
fn test_position_scaling() {
    let rec = record(|p| {
        LittleEndian::write_i32(&mut p[24..], 123_456_789);
        LittleEndian::write_i32(&mut p[28..], -337_654_321);
    });
    assert_eq!(rec.longitude(), 12.3456789);
    assert_eq!(rec.latitude(), -33.7654321);
    assert_eq!(rec.longitude_raw(), 123_456_789);
}

#[test]
fn test_speed_and_heading_scaling() {
    let rec = record(|p| {
        LittleEndian::write_i32(&mut p[48..], 1000);
        LittleEndian::write_i32(&mut p[52..], 18_050_000);
        LittleEndian::write_u32(&mut p[56..], 250);
        LittleEndian::write_u32(&mut p[60..], 500_000);
        LittleEndian::write_u16(&mut p[64..], 132);
    });
    assert_eq!(rec.speed(), 1.0);
    assert_eq!(rec.heading(), 180.5);
    assert_eq!(rec.speed_accuracy(), 0.25);
    assert_eq!(rec.heading_accuracy(), 5.0);
    assert_eq!(rec.pdop(), 1.32);
}

#[test]
fn test_altitude_and_accuracy_scaling() {
    let rec = record(|p| {
        LittleEndian::write_i32(&mut p[32..], 123_500);
        LittleEndian::write_i32(&mut p[36..], -2_000);
        LittleEndian::write_u32(&mut p[40..], 1_500);
        LittleEndian::write_u32(&mut p[44..], 2_250);
    });
    assert_eq!(rec.wgs_altitude(), 123.5);
    assert_eq!(rec.msl_altitude(), -2.0);
    assert_eq!(rec.horizontal_accuracy(), 1.5);
    assert_eq!(rec.vertical_accuracy(), 2.25);
}

#[test]
fn test_validity_flags_0x0f() {
    let rec = record(|p| p[11] = 0x0f);
    assert!(rec.valid_date());
    assert!(rec.valid_time());
    assert!(rec.fully_resolved());
    assert!(rec.valid_mag_decl());
    assert_eq!(rec.validity_flags(), ValidityFlags::all());
}

#[test]
fn test_fix_status_flags_0x69() {
    let rec = record(|p| p[21] = 0b0110_1001);
    assert!(rec.valid_fix());
    assert!(!rec.diff_corr_applied());
    assert_eq!(rec.power_state(), 0b010);
    assert!(rec.valid_heading());
    assert_eq!(rec.carrier_phase(), 0b01);
    assert!(rec.fix_status_flags().contains(FixStatusFlags::VALID_FIX));
}

#[test]
fn test_fix_status() {
    assert_eq!(record(|p| p[20] = 3).fix_status(), FixStatus::Fix3D);
    assert_eq!(record(|p| p[20] = 2).fix_status(), FixStatus::Fix2D);
    assert_eq!(record(|_| {}).fix_status(), FixStatus::NoFix);
    assert_eq!(record(|p| p[20] = 4).fix_status().to_string(), "unknown (4)");
}

#[test]
fn test_timestamp_rendering() {
    let rec = record(|p| {
        LittleEndian::write_u16(&mut p[4..], 2022);
        p[6..11].copy_from_slice(&[1, 10, 19, 51, 8]);
        LittleEndian::write_i32(&mut p[16..], 123_456);
    });
    assert_eq!(rec.timestamp().to_string(), "2022-01-10 19:51:08.000123456");

    let rec = record(|p| {
        LittleEndian::write_u16(&mut p[4..], 2022);
        p[6..11].copy_from_slice(&[12, 31, 23, 59, 59]);
        LittleEndian::write_i32(&mut p[16..], 999_999_999);
    });
    assert_eq!(rec.timestamp().to_string(), "2022-12-31 23:59:59.999999999");
}

#[test]
fn test_timestamp_negative_nanoseconds() {
    let rec = record(|p| {
        LittleEndian::write_u16(&mut p[4..], 2024);
        p[6..11].copy_from_slice(&[2, 29, 0, 0, 1]);
        LittleEndian::write_i32(&mut p[16..], -5);
    });
    assert_eq!(rec.timestamp().to_string(), "2024-02-29 00:00:01.-000000005");
}

#[test]
fn test_battery_interpretation() {
    let rec = record(|p| p[67] = 0x80 | 42);
    assert!(rec.is_charging());
    assert_eq!(rec.battery_percent(), 42);
    assert_eq!(
        DeviceKind::Mini.battery(&rec),
        Battery::Charge {
            percent: 42,
            charging: true
        }
    );
    assert_eq!(DeviceKind::MiniS.battery(&rec).to_string(), "Charging, 42%");

    let rec = record(|p| p[67] = 37);
    assert_eq!(DeviceKind::Micro.battery(&rec), Battery::Voltage(3.7));
    assert_eq!(DeviceKind::Micro.battery(&rec).to_string(), "3.7 V");
}

#[test]
fn test_imu_units() {
    let rec = record(|p| {
        LittleEndian::write_i16(&mut p[68..], 980);
        LittleEndian::write_i16(&mut p[72..], -1_020);
        LittleEndian::write_i16(&mut p[76..], 4_550);
    });
    let g = rec.g_force();
    assert_eq!((g.x, g.y, g.z), (0.98, 0.0, -1.02));
    let rot = rec.rotation_rate();
    assert_eq!((rot.x, rot.y, rot.z), (0.0, 45.5, 0.0));
}

#[test]
fn test_records_are_plain_values() {
    let a = record(|p| p[0] = 1);
    let b = a.clone();
    let c = record(|p| p[0] = 2);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.to_payload()[0], 1);
}
