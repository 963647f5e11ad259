pub const SYNC_CHAR_1: u8 = 0xb5;
pub const SYNC_CHAR_2: u8 = 0x62;
pub const SYNC: [u8; 2] = [SYNC_CHAR_1, SYNC_CHAR_2];

/// RaceBox proprietary message class, shared by every RaceBox message
pub const RACEBOX_CLASS: u8 = 0xff;
/// RaceBox Data Message
pub const TELEMETRY_MSG_ID: u8 = 0x01;
/// GNSS receiver configuration message
pub const CONFIG_MSG_ID: u8 = 0x27;

pub(crate) const SYNC_SIZE: usize = 2;
pub(crate) const CLASS_LEN: usize = 1;
pub(crate) const ID_LEN: usize = 1;
pub(crate) const PAYLOAD_SIZE_LEN: usize = 2;
pub const HEADER_LEN: usize = SYNC_SIZE + CLASS_LEN + ID_LEN + PAYLOAD_SIZE_LEN;
pub const CHECKSUM_LEN: usize = 2;

pub(crate) const CLASS_OFFSET: usize = 2; // After SYNC_CHAR_1, SYNC_CHAR_2
pub(crate) const MSG_ID_OFFSET: usize = 3; // After CLASS
pub(crate) const LENGTH_OFFSET: usize = 4; // After MSG_ID

pub const TELEMETRY_PAYLOAD_LEN: usize = 80;
/// Header and payload of a telemetry frame, i.e. everything the checksum trails
pub const TELEMETRY_FRAME_LEN: usize = HEADER_LEN + TELEMETRY_PAYLOAD_LEN;
/// A complete telemetry frame on the wire
pub const TELEMETRY_PACKET_LEN: usize = TELEMETRY_FRAME_LEN + CHECKSUM_LEN;

pub const CONFIG_PAYLOAD_LEN: usize = 3;
pub const CONFIG_PACKET_LEN: usize = HEADER_LEN + CONFIG_PAYLOAD_LEN + CHECKSUM_LEN;

/// Nordic UART service carrying the telemetry and configuration frames
pub const UART_SERVICE_UUID: &str = "6e400001-b5a3-f393-e0a9-e50e24dcca9e";
/// Host to device characteristic, configuration frames are written here
pub const UART_RX_CHARACTERISTIC_UUID: &str = "6e400002-b5a3-f393-e0a9-e50e24dcca9e";
/// Device to host characteristic, telemetry arrives as notifications
pub const UART_TX_CHARACTERISTIC_UUID: &str = "6e400003-b5a3-f393-e0a9-e50e24dcca9e";
pub const DEVICE_INFORMATION_SERVICE_UUID: &str = "0000180a-0000-1000-8000-00805f9b34fb";
pub const FIRMWARE_REVISION_CHARACTERISTIC_UUID: &str = "00002a26-0000-1000-8000-00805f9b34fb";
