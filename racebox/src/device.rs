use core::fmt;

use crate::packets::{BatteryStatus, TelemetryRecord};

/// RaceBox product line, as told by the advertised BLE name
///
/// The devices advertise as `RaceBox Mini 1234567890`, `RaceBox Mini S 1234567890`
/// or `RaceBox Micro 1234567890`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceKind {
    Mini,
    MiniS,
    Micro,
    /// Any other name. Telemetry is decoded the same way, the battery byte is not
    /// interpreted.
    Unrecognized,
}

impl DeviceKind {
    const PREFIXES: [(&'static str, Self); 3] = [
        // "RaceBox Mini S" must be tried before "RaceBox Mini"
        ("RaceBox Mini S ", Self::MiniS),
        ("RaceBox Mini ", Self::Mini),
        ("RaceBox Micro ", Self::Micro),
    ];

    pub fn from_name(name: &str) -> Self {
        Self::PREFIXES
            .iter()
            .find(|(prefix, _)| name.starts_with(prefix))
            .map_or(Self::Unrecognized, |(_, kind)| *kind)
    }

    /// Interpret the battery byte of `record` for this device
    pub fn battery(self, record: &TelemetryRecord) -> Battery {
        Battery::new(self, record.battery_status())
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mini => f.write_str("RaceBox Mini"),
            Self::MiniS => f.write_str("RaceBox Mini S"),
            Self::Micro => f.write_str("RaceBox Micro"),
            Self::Unrecognized => f.write_str("unrecognized device"),
        }
    }
}

/// Loose check used when scanning: any name mentioning "racebox", case ignored
pub fn is_racebox_name(name: &str) -> bool {
    const NEEDLE: &[u8] = b"racebox";
    name.as_bytes()
        .windows(NEEDLE.len())
        .any(|window| window.eq_ignore_ascii_case(NEEDLE))
}

/// Battery state, which depends on the device the record came from
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Battery {
    /// Mini and Mini S: internal battery
    Charge { percent: u8, charging: bool },
    /// Micro: input voltage, V
    Voltage(f64),
    /// Unrecognized device, raw byte
    Unknown(u8),
}

impl Battery {
    pub fn new(kind: DeviceKind, status: BatteryStatus) -> Self {
        match kind {
            DeviceKind::Mini | DeviceKind::MiniS => Self::Charge {
                percent: status.percent(),
                charging: status.is_charging(),
            },
            DeviceKind::Micro => Self::Voltage(f64::from(status.bits()) / 10.0),
            DeviceKind::Unrecognized => Self::Unknown(status.bits()),
        }
    }
}

impl fmt::Display for Battery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Charge {
                percent,
                charging: true,
            } => write!(f, "Charging, {percent}%"),
            Self::Charge {
                percent,
                charging: false,
            } => write!(f, "{percent}%"),
            Self::Voltage(volts) => write!(f, "{volts:.1} V"),
            Self::Unknown(raw) => write!(f, "{raw:#04x}"),
        }
    }
}
