use anyhow::Result;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use serde::Serialize;

use eegstream::process::sync::Synchronizer;
use eegstream::structs::link::FRAME_INTERVAL;
use eegstream::utils::stats::{SAMPLES_PER_FRAME, StreamStats, loss_pct};

use super::command::{Cli, InfoArgs};
use crate::input::InputReader;

/// Machine-readable capture summary, also the source of the table output.
#[derive(Debug, Serialize)]
pub struct CaptureReport {
    pub frames: u64,
    pub samples: u64,
    pub bytes: u64,
    pub bytes_discarded: u64,
    pub resync_stalls: u64,
    pub frames_expected: u64,
    pub loss_pct: f64,
    /// Playback duration at the nominal 8 ms frame interval.
    pub duration_secs: f64,
}

pub fn cmd_info(args: &InfoArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    log::info!("Analyzing EEG capture: {}", args.input.display());

    let pb = multi
        .map(|multi| -> Result<ProgressBar> {
            let pb = multi.add(ProgressBar::new_spinner());
            pb.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            pb.set_message("Analyzing frames...");
            Ok(pb)
        })
        .transpose()?;

    let mut input_reader = InputReader::new(&args.input)?;
    let mut synchronizer = Synchronizer::default();
    let mut stats = StreamStats::default();

    let mut bytes = 0u64;
    let mut resync_stalls = 0u64;

    input_reader.process_chunks(64 * 1024, |chunk| {
        bytes += chunk.len() as u64;
        synchronizer.push_bytes(chunk);

        for frame_result in synchronizer.by_ref() {
            match frame_result {
                Ok(frame) => {
                    stats.observe(frame.seq());
                }
                Err(e) => {
                    resync_stalls += 1;
                    if cli.strict {
                        return Err(e.into());
                    }
                    log::warn!("Resynchronization stalled: {e}");
                }
            }
        }

        if let Some(ref pb) = pb {
            if synchronizer.frames_extracted().is_multiple_of(100) {
                pb.set_message(format!(
                    "Analyzing frames...       {}",
                    synchronizer.frames_extracted()
                ));
            }
        }

        Ok(true)
    })?;

    if let Some(ref pb) = pb {
        pb.finish_and_clear();
    }

    let frames = synchronizer.frames_extracted();
    if frames == 0 {
        println!("No frames found in the capture.");
        println!("This doesn't appear to be a valid EEG frame stream.");
        return Ok(());
    }

    let report = CaptureReport {
        frames,
        samples: frames * SAMPLES_PER_FRAME,
        bytes,
        bytes_discarded: synchronizer.bytes_discarded(),
        resync_stalls,
        // Sequence deltas count gaps between received frames; the first
        // latched frame adds one.
        frames_expected: stats.expected() + 1,
        loss_pct: loss_pct(stats.expected(), stats.received()),
        duration_secs: frames as f64 * FRAME_INTERVAL.as_secs_f64(),
    };

    if args.yaml {
        print!("{}", serde_yaml_ng::to_string(&report)?);
    } else {
        display_report(&report);
    }

    Ok(())
}

fn display_report(report: &CaptureReport) {
    println!();
    println!("EEG Capture Information");
    println!("=======================");
    println!();
    println!("  Frames extracted          {}", report.frames);
    println!("  Samples                   {}", report.samples);
    println!("  Frames expected           {}", report.frames_expected);
    println!("  Frame loss                {:.1}%", report.loss_pct);
    println!("  Bytes read                {}", report.bytes);
    println!("  Bytes discarded           {}", report.bytes_discarded);
    println!("  Resync stalls             {}", report.resync_stalls);
    println!("  Duration (nominal)        {:.2} s", report.duration_secs);
    println!();
}
