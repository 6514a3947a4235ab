use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::Level;

use eegstream::process::decode::Decoder;
use eegstream::process::sync::Synchronizer;
use eegstream::structs::event::StreamEvent;
use eegstream::structs::link::AcquisitionMode;
use eegstream::utils::sink::SampleSink;
use eegstream::utils::stats::{StreamStats, loss_pct};

use super::command::{Cli, StreamArgs};
use crate::input::InputReader;

/// Drain cadence of the rendering consumer.
const DRAIN_INTERVAL: Duration = Duration::from_millis(30);

const CHUNK_SIZE: usize = 4096;

struct ProducerConfig {
    input_path: PathBuf,
    fail_level: Level,
    tx: mpsc::Sender<StreamEvent>,
    sink: SampleSink,
    running: Arc<AtomicBool>,
}

struct StreamSummary {
    frames: u64,
    samples: u64,
    bytes: u64,
    discarded: u64,
    loss_pct: f64,
}

/// The producer owns input reading and the whole decode path; only the
/// sample sink and the event channel cross the thread boundary.
fn spawn_producer(config: ProducerConfig) -> thread::JoinHandle<Result<StreamSummary>> {
    thread::spawn(move || -> Result<StreamSummary> {
        let ProducerConfig {
            input_path,
            fail_level,
            tx,
            sink,
            running,
        } = config;

        let mut input_reader = InputReader::new(&input_path)?;
        let mut synchronizer = Synchronizer::default();
        let mut decoder = Decoder::default();
        decoder.set_fail_level(fail_level);
        let mut stats = StreamStats::default();

        // Session boundary: what a transport does on the 'b' command.
        synchronizer.reset();
        stats.reset();
        let _ = tx.send(StreamEvent::Connected);
        let _ = tx.send(StreamEvent::Mode(AcquisitionMode::Streaming));

        let mut bytes = 0u64;
        let mut samples = 0u64;

        input_reader.process_chunks(CHUNK_SIZE, |chunk| {
            // Liveness check once per chunk keeps cancellation prompt.
            if !running.load(Ordering::Relaxed) {
                return Ok(false);
            }

            bytes += chunk.len() as u64;
            synchronizer.push_bytes(chunk);

            for frame_result in synchronizer.by_ref() {
                match frame_result {
                    Ok(frame) => {
                        if let Some(tick) = stats.observe(frame.seq()) {
                            let _ = tx.send(StreamEvent::Stats(tick));
                        }

                        let decoded = decoder.decode(&frame)?;
                        for vector in decoded.samples {
                            sink.push(vector);
                            samples += 1;
                        }
                    }
                    Err(e) => log::warn!("Resynchronization stalled: {e}"),
                }
            }

            Ok(true)
        })?;

        let _ = tx.send(StreamEvent::Status("stream ended".into(), Level::Info));
        let _ = tx.send(StreamEvent::Disconnected);

        Ok(StreamSummary {
            frames: synchronizer.frames_extracted(),
            samples,
            bytes,
            discarded: synchronizer.bytes_discarded(),
            loss_pct: loss_pct(stats.expected(), stats.received()),
        })
    })
}

pub fn cmd_stream(args: &StreamArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    log::info!(
        "Acquiring EEG stream: {} (strict mode: {})",
        args.input.display(),
        cli.strict
    );

    let fail_level = if cli.strict { Level::Warn } else { Level::Error };

    let pb = multi
        .map(|multi| -> Result<ProgressBar> {
            let pb = multi.add(ProgressBar::new_spinner());
            pb.set_style(ProgressStyle::with_template(
                "{spinner:.green} {pos} samples\n{msg} | elapsed: {elapsed_precise}",
            )?);
            pb.enable_steady_tick(Duration::from_millis(100));
            pb.set_message("waiting for frames");
            Ok(pb)
        })
        .transpose()?;

    let mut writer = args
        .output
        .as_ref()
        .map(|path| -> Result<BufWriter<File>> {
            log::info!("Writing decoded samples to {}", path.display());
            Ok(BufWriter::new(File::create(path)?))
        })
        .transpose()?;

    let sink = SampleSink::new(args.sink_capacity);
    let (tx, rx) = mpsc::channel();
    let running = Arc::new(AtomicBool::new(true));

    let producer = spawn_producer(ProducerConfig {
        input_path: args.input.clone(),
        fail_level,
        tx,
        sink: sink.clone(),
        running: running.clone(),
    });

    // Rendering side: drain the sink on a fixed cadence while relaying
    // producer events, until the channel closes with the producer.
    let mut rendered = 0u64;
    loop {
        match rx.recv_timeout(DRAIN_INTERVAL) {
            Ok(event) => handle_event(event, &pb),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }

        rendered += drain_into(&sink, &mut writer, &pb)?;
    }

    running.store(false, Ordering::Relaxed);

    // Collect whatever the producer pushed after the last timed drain.
    rendered += drain_into(&sink, &mut writer, &pb)?;

    if let Some(writer) = &mut writer {
        writer.flush()?;
    }

    match producer.join() {
        Ok(Ok(summary)) => {
            if let Some(pb) = &pb {
                pb.finish_and_clear();
            }

            println!("Acquisition Summary");
            println!("  Frames extracted          {}", summary.frames);
            println!("  Samples decoded           {}", summary.samples);
            println!("  Samples rendered          {rendered}");
            println!("  Bytes read                {}", summary.bytes);
            println!("  Bytes discarded           {}", summary.discarded);
            println!("  Frame loss                {:.1}%", summary.loss_pct);

            log::info!("Acquisition completed successfully");
            Ok(())
        }
        Ok(Err(e)) => {
            if let Some(pb) = &pb {
                pb.finish_with_message("acquisition failed");
            }
            Err(e)
        }
        Err(_) => Err(anyhow!("acquisition thread panicked")),
    }
}

fn handle_event(event: StreamEvent, pb: &Option<ProgressBar>) {
    match event {
        StreamEvent::Connected => log::info!("Stream connected"),
        StreamEvent::Disconnected => log::info!("Stream disconnected"),
        StreamEvent::Mode(mode) => {
            log::info!(
                "Acquisition mode: {mode} (command '{}')",
                mode.command_byte() as char
            );
        }
        StreamEvent::Status(text, level) => log::log!(level, "{text}"),
        StreamEvent::Stats(tick) => {
            let line = format!("loss: {:.1}% | rate: {:.0} Hz", tick.loss_pct, tick.rate_hz);
            match pb {
                Some(pb) => pb.set_message(line),
                None => log::info!("{line}"),
            }
        }
    }
}

fn drain_into(
    sink: &SampleSink,
    writer: &mut Option<BufWriter<File>>,
    pb: &Option<ProgressBar>,
) -> Result<u64> {
    let batch = sink.drain_all();
    if batch.is_empty() {
        return Ok(0);
    }

    if let Some(writer) = writer {
        for vector in &batch {
            let row = vector
                .iter()
                .map(|value| format!("{value:.3}"))
                .collect::<Vec<_>>()
                .join(",");
            writeln!(writer, "{row}")?;
        }
    }

    if let Some(pb) = pb {
        pb.inc(batch.len() as u64);
    }

    Ok(batch.len() as u64)
}
