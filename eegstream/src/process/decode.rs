use anyhow::{Result, anyhow};

use crate::log_or_err;
use crate::structs::frame::{CHANNELS, Frame, SUBFRAME_OFFSETS};
use crate::utils::errors::DecodeError;

/// Microvolts per 24-bit code: 4.5 V reference over the 24-bit full scale,
/// divided by the front-end gain of 24.
pub const SCALE_FACTOR_UV: f64 = (4.5 / 8_388_607.0 / 24.0) * 1_000_000.0;

/// One decoded timestep of all channels, in microvolts.
pub type SampleVector = [f64; CHANNELS];

/// Decodes aligned frames into physical-unit samples.
///
/// Decoding is pure computation with no I/O: the 16 channel codes are read
/// as 24-bit big-endian two's-complement integers, sign-extended and scaled
/// by [`SCALE_FACTOR_UV`]. Values are passed through unclamped; only the
/// marker byte (already guaranteed by [`Frame`] construction) gates
/// validity.
///
/// The on-wire checksum and footer are verified as advisory checks: a
/// mismatch is logged as a warning by default and fails the decode only
/// when the fail level is raised to `log::Level::Warn` (strict mode).
#[derive(Default)]
pub struct Decoder {
    state: DecoderState,
}

#[derive(Debug)]
struct DecoderState {
    fail_level: log::Level,
}

impl Default for DecoderState {
    fn default() -> Self {
        Self {
            fail_level: log::Level::Error,
        }
    }
}

/// The result of decoding one frame: two sub-frame sample vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame {
    /// Sequence number carried by the frame.
    pub seq: u8,
    /// Channel set A and channel set B, in timestep order.
    pub samples: [SampleVector; 2],
}

impl Decoder {
    /// Decodes a frame into its sequence number and two sample vectors.
    pub fn decode(&mut self, frame: &Frame) -> Result<DecodedFrame> {
        let calculated = frame.computed_checksum();
        if calculated != frame.checksum() {
            log_or_err!(
                &self.state,
                log::Level::Warn,
                anyhow!(DecodeError::ChecksumMismatch {
                    calculated,
                    read: frame.checksum(),
                }),
            );
        }

        if frame.footer() != Frame::FOOTER {
            log_or_err!(
                &self.state,
                log::Level::Warn,
                anyhow!(DecodeError::FooterMismatch(frame.footer())),
            );
        }

        let bytes = frame.as_ref();
        let mut samples = [[0.0; CHANNELS]; 2];
        for (subframe, &offset) in SUBFRAME_OFFSETS.iter().enumerate() {
            for channel in 0..CHANNELS {
                let idx = offset + channel * 3;
                samples[subframe][channel] = decode_sample([bytes[idx], bytes[idx + 1], bytes[idx + 2]]);
            }
        }

        Ok(DecodedFrame {
            seq: frame.seq(),
            samples,
        })
    }

    /// Sets the failure level for advisory validation.
    ///
    /// - `log::Level::Error`: checksum/footer mismatches are logged (default)
    /// - `log::Level::Warn`: mismatches fail the decode (strict mode)
    pub fn set_fail_level(&mut self, level: log::Level) {
        self.state.fail_level = level;
    }
}

/// Sign-extends a 24-bit big-endian code and scales it to microvolts.
fn decode_sample(bytes: [u8; 3]) -> f64 {
    let mut code =
        (i32::from(bytes[0]) << 16) | (i32::from(bytes[1]) << 8) | i32::from(bytes[2]);
    if code & 0x80_0000 != 0 {
        code -= 1 << 24;
    }

    f64::from(code) * SCALE_FACTOR_UV
}

#[test]
fn sign_extension_round_trip() -> Result<()> {
    let set_a = [1, -1, 8_388_607, -8_388_608, 0, 4_000_000, -4_000_000, 25];
    let set_b = [-8_388_608; CHANNELS];
    let frame = Frame::pack(200, &set_a, &set_b);

    let decoded = Decoder::default().decode(&frame)?;
    assert_eq!(decoded.seq, 200);

    for (channel, &code) in set_a.iter().enumerate() {
        let expected = f64::from(code) * SCALE_FACTOR_UV;
        assert!(
            (decoded.samples[0][channel] - expected).abs() < 1e-12,
            "channel {channel}: {} != {expected}",
            decoded.samples[0][channel]
        );
    }

    // Code 0x800000 is the most negative value, not a large positive one.
    assert!(decoded.samples[1].iter().all(|&v| v < 0.0));
    assert_eq!(decoded.samples[1][0], -8_388_608.0 * SCALE_FACTOR_UV);
    Ok(())
}

#[test]
fn subframe_offsets_are_independent() -> Result<()> {
    let frame = Frame::pack(0, &[1, 0, 0, 0, 0, 0, 0, 0], &[0, 2, 0, 0, 0, 0, 0, 0]);
    let decoded = Decoder::default().decode(&frame)?;

    assert_eq!(decoded.samples[0][0], SCALE_FACTOR_UV);
    assert_eq!(decoded.samples[0][1], 0.0);
    assert_eq!(decoded.samples[1][0], 0.0);
    assert_eq!(decoded.samples[1][1], 2.0 * SCALE_FACTOR_UV);
    Ok(())
}

#[test]
fn checksum_mismatch_is_advisory_unless_strict() {
    let mut bytes = [0u8; Frame::LEN];
    bytes[0] = Frame::MARKER;
    bytes[50] = 0xEE; // wrong checksum for an all-zero payload
    bytes[51] = Frame::FOOTER;
    let frame = Frame::try_from(&bytes[..]).unwrap();

    let mut decoder = Decoder::default();
    assert!(decoder.decode(&frame).is_ok());

    decoder.set_fail_level(log::Level::Warn);
    assert!(decoder.decode(&frame).is_err());
}

#[test]
fn values_outside_physiological_range_pass_through() -> Result<()> {
    // Full-scale codes decode to roughly ±22 mV, far beyond EEG amplitudes;
    // the decoder must not clamp or reject them.
    let frame = Frame::pack(0, &[8_388_607; CHANNELS], &[-8_388_608; CHANNELS]);
    let decoded = Decoder::default().decode(&frame)?;

    assert!((decoded.samples[0][0] - 8_388_607.0 * SCALE_FACTOR_UV).abs() < 1e-9);
    assert!((decoded.samples[1][0] + 8_388_608.0 * SCALE_FACTOR_UV).abs() < 1e-9);
    Ok(())
}
