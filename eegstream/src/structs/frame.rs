use crate::utils::errors::FrameError;

/// Number of acquisition channels per sub-frame.
pub const CHANNELS: usize = 8;

/// Byte offsets of the two sub-frames inside a frame.
///
/// Each sub-frame holds one timestep of all [`CHANNELS`] channels packed as
/// 3-byte big-endian two's-complement integers.
pub const SUBFRAME_OFFSETS: [usize; 2] = [2, 26];

/// A single 52-byte frame of the wire protocol.
///
/// Layout:
///
/// | bytes | meaning                                           |
/// |-------|---------------------------------------------------|
/// | 0     | marker `0xA0`                                     |
/// | 1     | sequence number (wraps mod 256)                   |
/// | 2–25  | channel set A, 8 × 3-byte big-endian signed       |
/// | 26–49 | channel set B, same layout                        |
/// | 50    | additive checksum of bytes 2..50                  |
/// | 51    | footer `0xC0`                                     |
///
/// Construction through [`TryFrom<&[u8]>`] validates length and marker;
/// checksum and footer are advisory and left to the decoder to verify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    data: [u8; Frame::LEN],
}

impl Frame {
    /// Frame length on the wire, in bytes.
    pub const LEN: usize = 52;

    /// Marker byte identifying a frame start.
    pub const MARKER: u8 = 0xA0;

    /// Footer byte written by the transmitting device.
    pub const FOOTER: u8 = 0xC0;

    /// Sequence number assigned by the transmitting device.
    pub fn seq(&self) -> u8 {
        self.data[1]
    }

    /// Checksum byte carried on the wire.
    pub fn checksum(&self) -> u8 {
        self.data[50]
    }

    /// Footer byte carried on the wire.
    pub fn footer(&self) -> u8 {
        self.data[51]
    }

    /// The 48 payload bytes holding both sub-frames.
    pub fn payload(&self) -> &[u8] {
        &self.data[2..50]
    }

    /// Additive mod-256 checksum over the payload, as the device computes it.
    pub fn computed_checksum(&self) -> u8 {
        self.payload()
            .iter()
            .fold(0u8, |acc, byte| acc.wrapping_add(*byte))
    }

    /// Builds a frame from raw channel codes, exactly as the device packs one.
    ///
    /// Codes are truncated to their low 24 bits; negative values take their
    /// two's-complement 24-bit form. Checksum and footer bytes are filled in.
    pub fn pack(seq: u8, set_a: &[i32; CHANNELS], set_b: &[i32; CHANNELS]) -> Frame {
        let mut data = [0u8; Self::LEN];
        data[0] = Self::MARKER;
        data[1] = seq;

        let mut idx = 2;
        for set in [set_a, set_b] {
            for &code in set {
                let be = (code as u32).to_be_bytes();
                data[idx..idx + 3].copy_from_slice(&be[1..]);
                idx += 3;
            }
        }

        data[50] = data[2..50]
            .iter()
            .fold(0u8, |acc, byte| acc.wrapping_add(*byte));
        data[51] = Self::FOOTER;

        Frame { data }
    }

    /// Wraps bytes the synchronizer has already aligned on the marker.
    pub(crate) fn from_raw(data: [u8; Frame::LEN]) -> Frame {
        debug_assert_eq!(data[0], Self::MARKER);
        Frame { data }
    }
}

impl TryFrom<&[u8]> for Frame {
    type Error = FrameError;

    fn try_from(bytes: &[u8]) -> Result<Self, FrameError> {
        let data: [u8; Self::LEN] = bytes
            .try_into()
            .map_err(|_| FrameError::UnexpectedLength(bytes.len()))?;

        if data[0] != Self::MARKER {
            return Err(FrameError::BadMarker(data[0]));
        }

        Ok(Frame { data })
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[test]
fn pack_round_trip() {
    let set_a = [1, -1, 0x7F_FFFF, -0x80_0000, 0, 42, -42, 1000];
    let set_b = [0; CHANNELS];
    let frame = Frame::pack(7, &set_a, &set_b);

    assert_eq!(frame.as_ref().len(), Frame::LEN);
    assert_eq!(frame.as_ref()[0], Frame::MARKER);
    assert_eq!(frame.seq(), 7);
    assert_eq!(frame.footer(), Frame::FOOTER);
    assert_eq!(frame.checksum(), frame.computed_checksum());

    // Channel 0 of set A packs as 0x000001
    assert_eq!(&frame.as_ref()[2..5], &[0x00, 0x00, 0x01]);
    // Channel 1 of set A packs as two's-complement -1
    assert_eq!(&frame.as_ref()[5..8], &[0xFF, 0xFF, 0xFF]);
    // Channel 3 of set A packs as the most negative 24-bit code
    assert_eq!(&frame.as_ref()[11..14], &[0x80, 0x00, 0x00]);
}

#[test]
fn rejects_bad_length_and_marker() {
    let short = [0u8; 10];
    assert!(matches!(
        Frame::try_from(&short[..]),
        Err(FrameError::UnexpectedLength(10))
    ));

    let mut bytes = [0u8; Frame::LEN];
    bytes[0] = 0x55;
    assert!(matches!(
        Frame::try_from(&bytes[..]),
        Err(FrameError::BadMarker(0x55))
    ));

    bytes[0] = Frame::MARKER;
    assert!(Frame::try_from(&bytes[..]).is_ok());
}
