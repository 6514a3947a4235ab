use std::fmt::Display;
use std::time::Duration;

/// Name the acquisition board advertises over BLE.
pub const DEVICE_NAME: &str = "ESP32_EEG_8Ch";

/// Nordic UART Service characteristic the host writes command bytes to.
pub const RX_UUID: &str = "6E400002-B5A3-F393-E0A9-E50E24DCCA9E";

/// Nordic UART Service characteristic carrying frame notifications.
pub const TX_UUID: &str = "6E400003-B5A3-F393-E0A9-E50E24DCCA9E";

/// Nominal interval between frames while streaming (125 frames/s,
/// 250 samples/s at two sub-frames per frame).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(8);

/// Device operating mode, selected by writing a single command byte to the
/// control characteristic.
///
/// Switching modes never mutates decode state on the host side, with one
/// exception: entering [`Streaming`](AcquisitionMode::Streaming) is the
/// acquisition-session boundary at which callers reset
/// [`StreamStats`](crate::utils::stats::StreamStats) and the
/// [`Synchronizer`](crate::process::sync::Synchronizer) accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionMode {
    /// High-rate frame delivery.
    Streaming,
    /// Connected but not streaming.
    Idle,
    /// Low-power connection kept alive for instant wake-up.
    Sleep,
}

impl AcquisitionMode {
    /// Command byte written to the control characteristic for this mode.
    pub const fn command_byte(self) -> u8 {
        match self {
            AcquisitionMode::Streaming => b'b',
            AcquisitionMode::Idle => b's',
            AcquisitionMode::Sleep => b'd',
        }
    }

    /// Maps a command byte back to its mode.
    pub const fn from_command_byte(byte: u8) -> Option<AcquisitionMode> {
        match byte {
            b'b' => Some(AcquisitionMode::Streaming),
            b's' => Some(AcquisitionMode::Idle),
            b'd' => Some(AcquisitionMode::Sleep),
            _ => None,
        }
    }
}

impl Display for AcquisitionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcquisitionMode::Streaming => write!(f, "streaming"),
            AcquisitionMode::Idle => write!(f, "idle"),
            AcquisitionMode::Sleep => write!(f, "sleep"),
        }
    }
}

#[test]
fn command_bytes_round_trip() {
    for mode in [
        AcquisitionMode::Streaming,
        AcquisitionMode::Idle,
        AcquisitionMode::Sleep,
    ] {
        assert_eq!(
            AcquisitionMode::from_command_byte(mode.command_byte()),
            Some(mode)
        );
    }

    assert_eq!(AcquisitionMode::from_command_byte(b'x'), None);
}
