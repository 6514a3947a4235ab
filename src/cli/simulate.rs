use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::Result;

use eegstream::structs::frame::{CHANNELS, Frame};

use super::command::{Cli, SimulateArgs};

/// Amplitude of the built-in test signal, in raw codes.
const SIG_HIGH: i32 = 4_000_000;

/// Sub-frames per half-period of the square wave.
const HALF_PERIOD: u64 = 25;

/// Generates the firmware's test pattern: a square wave on channels 0-3
/// with channels 4-7 inverted, two sub-frames per frame, wrapping sequence.
#[derive(Debug, Default)]
struct FrameSource {
    seq: u8,
    sample_counter: u64,
}

impl FrameSource {
    fn next_frame(&mut self) -> Frame {
        let mut sets = [[0i32; CHANNELS]; 2];
        for set in &mut sets {
            self.sample_counter += 1;
            let value = if (self.sample_counter / HALF_PERIOD) % 2 == 0 {
                SIG_HIGH
            } else {
                -SIG_HIGH
            };

            for (channel, code) in set.iter_mut().enumerate() {
                *code = if channel < CHANNELS / 2 { value } else { -value };
            }
        }

        let frame = Frame::pack(self.seq, &sets[0], &sets[1]);
        self.seq = self.seq.wrapping_add(1);
        frame
    }
}

pub fn cmd_simulate(args: &SimulateArgs, _cli: &Cli) -> Result<()> {
    let mut writer: Box<dyn Write> = if args.output.to_string_lossy() == "-" {
        Box::new(io::stdout().lock())
    } else {
        log::info!("Writing capture to {}", args.output.display());
        Box::new(BufWriter::new(File::create(&args.output)?))
    };

    if args.garbage > 0 {
        // 0x55 never matches the marker, so the receiver must slide past it.
        writer.write_all(&vec![0x55u8; args.garbage])?;
    }

    let mut source = FrameSource::default();
    let mut written = 0u64;

    for index in 0..args.frames {
        let frame = source.next_frame();

        // A dropped frame still advances the sequence counter, so the
        // receiver sees it as loss.
        if args.drop_every.is_some_and(|n| n > 0 && (index + 1) % n == 0) {
            continue;
        }

        writer.write_all(frame.as_ref())?;
        written += 1;
    }

    writer.flush()?;

    log::info!(
        "Wrote {written} of {} frames ({} bytes of leading garbage)",
        args.frames,
        args.garbage
    );
    Ok(())
}

#[test]
fn generated_frames_are_well_formed() {
    use eegstream::process::decode::{Decoder, SCALE_FACTOR_UV};

    let mut source = FrameSource::default();
    let mut decoder = Decoder::default();

    let mut previous_seq = None;
    for _ in 0..300 {
        let frame = source.next_frame();
        assert_eq!(frame.checksum(), frame.computed_checksum());
        assert_eq!(frame.footer(), Frame::FOOTER);

        if let Some(previous) = previous_seq {
            assert_eq!(frame.seq(), u8::wrapping_add(previous, 1));
        }
        previous_seq = Some(frame.seq());

        let decoded = decoder.decode(&frame).unwrap();
        for samples in decoded.samples {
            let magnitude = 4_000_000.0 * SCALE_FACTOR_UV;
            assert!((samples[0].abs() - magnitude).abs() < 1e-9);
            // Channels 4-7 mirror channels 0-3.
            assert_eq!(samples[4], -samples[0]);
        }
    }
}

#[test]
fn square_wave_toggles_every_half_period() {
    let mut source = FrameSource::default();

    // 25 sub-frames per half-period, 2 sub-frames per frame: sub-frame 24
    // is the last high one, sub-frame 25 the first low one.
    let mut polarity = Vec::new();
    for _ in 0..13 {
        let frame = source.next_frame();
        let bytes = frame.as_ref();
        polarity.push(bytes[2] & 0x80 == 0); // set A, channel 0 sign bit
        polarity.push(bytes[26] & 0x80 == 0); // set B, channel 0 sign bit
    }

    assert!(polarity[..24].iter().all(|&high| high));
    assert!(!polarity[24]);
    assert!(!polarity[25]);
}
