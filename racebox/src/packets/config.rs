use core::fmt;

use super::frame_bytes;
use crate::{
    constants::{CONFIG_MSG_ID, CONFIG_PACKET_LEN, CONFIG_PAYLOAD_LEN, RACEBOX_CLASS},
    error::ParserError,
    parser::FrameRef,
};

/// Dynamic platform model of the GNSS receiver
#[non_exhaustive]
#[repr(u8)]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlatformModel {
    Portable = 0,
    Stationary = 2,
    Pedestrian = 3,
    #[default]
    Automotive = 4,
    Sea = 5,
    AirborneWithLess1gAcceleration = 6,
    AirborneWithLess2gAcceleration = 7,
    AirborneWithLess4gAcceleration = 8,
}

impl PlatformModel {
    pub const fn into_raw(self) -> u8 {
        self as u8
    }

    /// Every model the devices accept
    pub const ALL: [Self; 8] = [
        Self::Portable,
        Self::Stationary,
        Self::Pedestrian,
        Self::Automotive,
        Self::Sea,
        Self::AirborneWithLess1gAcceleration,
        Self::AirborneWithLess2gAcceleration,
        Self::AirborneWithLess4gAcceleration,
    ];
}

impl From<PlatformModel> for u8 {
    fn from(model: PlatformModel) -> u8 {
        model.into_raw()
    }
}

impl TryFrom<u8> for PlatformModel {
    type Error = u8;

    /// Returns the unknown value back as error
    fn try_from(val: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|model| model.into_raw() == val)
            .ok_or(val)
    }
}

impl fmt::Display for PlatformModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Portable => "portable",
            Self::Stationary => "stationary",
            Self::Pedestrian => "pedestrian",
            Self::Automotive => "automotive",
            Self::Sea => "sea",
            Self::AirborneWithLess1gAcceleration => "airborne-1g",
            Self::AirborneWithLess2gAcceleration => "airborne-2g",
            Self::AirborneWithLess4gAcceleration => "airborne-4g",
        };
        f.write_str(name)
    }
}

/// GNSS receiver configuration, the only message sent to a device
///
/// Only send it over an established link, see [`Session::configure`](crate::Session::configure).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfigurationRequest {
    pub platform: PlatformModel,
    /// Report 3D speed instead of ground speed
    pub enable_3d_speed: bool,
    /// Minimum horizontal accuracy, m, for a fix to be reported as valid
    pub min_horizontal_accuracy: u8,
}

impl ConfigurationRequest {
    pub fn into_packet_bytes(self) -> [u8; CONFIG_PACKET_LEN] {
        encode_config(
            self.platform.into_raw(),
            self.enable_3d_speed,
            self.min_horizontal_accuracy,
        )
    }
}

/// Build a configuration frame from raw values.
///
/// Total: any platform byte is framed as given, validating it is up to the caller.
pub fn encode_config(
    platform_model: u8,
    enable_3d_speed: bool,
    min_accuracy: u8,
) -> [u8; CONFIG_PACKET_LEN] {
    let payload: [u8; CONFIG_PAYLOAD_LEN] =
        [platform_model, u8::from(enable_3d_speed), min_accuracy];
    frame_bytes(RACEBOX_CLASS, CONFIG_MSG_ID, &payload)
}

impl<'a> TryFrom<FrameRef<'a>> for ConfigurationRequest {
    type Error = ParserError;

    fn try_from(frame: FrameRef<'a>) -> Result<Self, Self::Error> {
        if frame.class() != RACEBOX_CLASS || frame.msg_id() != CONFIG_MSG_ID {
            return Err(ParserError::UnexpectedMessage {
                class: frame.class(),
                msg_id: frame.msg_id(),
            });
        }
        let payload = frame.payload();
        if payload.len() != CONFIG_PAYLOAD_LEN {
            return Err(ParserError::InvalidPacketLen {
                packet: "RaceBoxConfig",
                expect: CONFIG_PAYLOAD_LEN,
                got: payload.len(),
            });
        }
        // An unknown model is a frame we did not build
        let platform = PlatformModel::try_from(payload[0]).map_err(|_| {
            ParserError::UnexpectedMessage {
                class: frame.class(),
                msg_id: frame.msg_id(),
            }
        })?;
        Ok(Self {
            platform,
            enable_3d_speed: payload[1] != 0,
            min_horizontal_accuracy: payload[2],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate_frame;

    #[test]
    fn automotive_default_frame() {
        assert_eq!(
            encode_config(4, false, 0),
            [0xb5, 0x62, 0xff, 0x27, 0x03, 0x00, 0x04, 0x00, 0x00, 0x2d, 0xfe]
        );
        assert_eq!(
            ConfigurationRequest::default().into_packet_bytes(),
            encode_config(4, false, 0)
        );
    }

    #[test]
    fn boolean_and_accuracy_bytes() {
        let packet = encode_config(4, true, 5);
        assert_eq!(&packet[6..9], &[0x04, 0x01, 0x05]);
        assert_eq!(&packet[9..], &[0x33, 0x05]);
    }

    #[test]
    fn platform_model_raw_values() {
        assert_eq!(u8::from(PlatformModel::Portable), 0);
        assert_eq!(u8::from(PlatformModel::AirborneWithLess4gAcceleration), 8);
        assert_eq!(PlatformModel::try_from(5u8), Ok(PlatformModel::Sea));
        assert_eq!(PlatformModel::try_from(1u8), Err(1));
        assert_eq!(PlatformModel::try_from(9u8), Err(9));
    }

    #[test]
    fn parse_back_every_model() {
        for platform in PlatformModel::ALL {
            let req = ConfigurationRequest {
                platform,
                enable_3d_speed: true,
                min_horizontal_accuracy: 3,
            };
            let packet = req.into_packet_bytes();
            let frame = validate_frame(&packet).unwrap();
            assert_eq!(ConfigurationRequest::try_from(frame), Ok(req));
        }
    }

    #[test]
    fn parse_rejects_unknown_model() {
        let packet = encode_config(1, false, 0);
        let frame = validate_frame(&packet).unwrap();
        assert!(matches!(
            ConfigurationRequest::try_from(frame),
            Err(ParserError::UnexpectedMessage { .. })
        ));
    }
}
