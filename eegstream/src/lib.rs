#![doc = include_str!("../README.md")]
//!
//! ## Technical Overview
//!
//! The transport delivers arbitrarily-sized byte chunks with no guarantee
//! of chunk-to-frame alignment. Each 52-byte frame starts with a `0xA0`
//! marker and a wrapping sequence number, followed by two sub-frames of
//! 8 channels packed as 3-byte big-endian two's-complement integers.
//!
//! ## Quick Start
//!
//! Steps for processing a stream:
//!
//! 1. Reconstruct frames from raw chunks using [`process::sync::Synchronizer`]
//! 2. Decode frames to microvolt samples using [`process::decode::Decoder`]
//! 3. Track loss and sample rate using [`utils::stats::StreamStats`]
//! 4. Hand samples to the rendering consumer through [`utils::sink::SampleSink`]
//!
//! ```rust
//! use eegstream::process::{EXAMPLE_DATA, decode::Decoder, sync::Synchronizer};
//! use eegstream::utils::{sink::SampleSink, stats::StreamStats};
//!
//! let mut synchronizer = Synchronizer::default();
//! let mut decoder = Decoder::default();
//! let mut stats = StreamStats::default();
//! let sink = SampleSink::default();
//!
//! // Push raw notification bytes
//! synchronizer.push_bytes(EXAMPLE_DATA);
//!
//! // Extract, decode and account for every aligned frame
//! for frame_result in &mut synchronizer {
//!     let frame = frame_result?;
//!
//!     if let Some(tick) = stats.observe(frame.seq()) {
//!         println!("loss {:.1}% | {:.0} Hz", tick.loss_pct, tick.rate_hz);
//!     }
//!
//!     let decoded = decoder.decode(&frame)?;
//!     for samples in decoded.samples {
//!         sink.push(samples);
//!     }
//! }
//!
//! // The rendering consumer drains on its own cadence
//! assert_eq!(sink.drain_all().len(), 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Processing functionality for the acquisition byte stream.
///
/// 1. **Frame Synchronization** ([`process::sync`]): Realigns on the marker
///    byte and extracts fixed-size frames from unaligned chunks.
///
/// 2. **Decoding** ([`process::decode`]): Converts packed 24-bit channel
///    codes into microvolt sample vectors.
pub mod process;

/// Data structures representing wire-protocol and link components.
///
/// - **Frames** ([`structs::frame`]): The 52-byte wire unit
/// - **Link** ([`structs::link`]): Device identity, modes, command bytes
/// - **Events** ([`structs::event`]): Producer-to-consumer event surface
pub mod structs;

/// Utility functions and supporting infrastructure.
///
/// - **Error Handling** ([`utils::errors`]): Error types
/// - **Stream Health** ([`utils::stats`]): Loss and rate accounting
/// - **Sample Handoff** ([`utils::sink`]): Bounded SPSC buffer
pub mod utils;
