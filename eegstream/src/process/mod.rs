/// Frame reconstruction from the raw notification byte stream.
///
/// Provides the [`Synchronizer`](sync::Synchronizer) for realigning on the
/// marker byte and extracting individual [`Frame`](crate::structs::frame::Frame)
/// objects from arbitrarily chunked input.
pub mod sync;

/// Frame decoding to physical-unit samples.
///
/// Provides the [`Decoder`](decode::Decoder) for converting frames into
/// [`DecodedFrame`](decode::DecodedFrame) objects holding microvolt sample
/// vectors.
pub mod decode;

/// Two well-formed frames: sequence 0 with an all-zero payload, then
/// sequence 1 with set-A channel 0 at code `0x000001`.
pub const EXAMPLE_DATA: &[u8] = &[
    0xA0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0xC0, 0xA0, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0xC0,
];

#[test]
fn example_data_is_well_formed() {
    use crate::structs::frame::Frame;

    assert_eq!(EXAMPLE_DATA.len(), 2 * Frame::LEN);
    for (i, chunk) in EXAMPLE_DATA.chunks(Frame::LEN).enumerate() {
        let frame = Frame::try_from(chunk).unwrap();
        assert_eq!(frame.seq(), i as u8);
        assert_eq!(frame.checksum(), frame.computed_checksum());
        assert_eq!(frame.footer(), Frame::FOOTER);
    }
}

#[test]
fn end_to_end_garbage_then_two_frames() -> anyhow::Result<()> {
    use crate::process::decode::{Decoder, SCALE_FACTOR_UV};
    use crate::process::sync::Synchronizer;
    use crate::structs::frame::Frame;
    use crate::utils::stats::StreamStats;

    let mut stream = vec![0x00u8];
    stream.extend_from_slice(Frame::pack(5, &[0; 8], &[0; 8]).as_ref());
    stream.extend_from_slice(Frame::pack(6, &[1, 0, 0, 0, 0, 0, 0, 0], &[0; 8]).as_ref());

    let mut synchronizer = Synchronizer::default();
    let mut decoder = Decoder::default();
    let mut stats = StreamStats::default();

    synchronizer.push_bytes(&stream);

    let mut decoded = Vec::new();
    for frame in &mut synchronizer {
        let frame = frame?;
        stats.observe(frame.seq());
        decoded.push(decoder.decode(&frame)?);
    }

    assert_eq!(decoded.len(), 2);
    assert_eq!(synchronizer.bytes_discarded(), 1);
    assert_eq!(stats.expected(), 1);
    assert_eq!(stats.received(), 1);

    let second = &decoded[1];
    assert_eq!(second.seq, 6);
    assert_eq!(second.samples[0][0], SCALE_FACTOR_UV);
    assert!(second.samples[0][1..].iter().all(|&v| v == 0.0));
    assert!(second.samples[1].iter().all(|&v| v == 0.0));
    Ok(())
}
