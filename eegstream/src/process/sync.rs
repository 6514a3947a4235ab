use std::collections::VecDeque;

use crate::structs::frame::Frame;
use crate::utils::errors::SyncError;

/// Upper bound on bytes discarded within a single `next()` call.
///
/// The single-byte slide has no recovery-latency bound under adversarial
/// input; this budget hands control back to the producer instead of letting
/// one call stall it. Realignment resumes on the following call.
pub const MAX_DISCARD_PER_CALL: usize = 4096;

/// Reconstructs fixed-size frames from an unreliable byte stream.
///
/// Chunks arrive with no alignment guarantee; the synchronizer accumulates
/// them and realigns on the `0xA0` marker by discarding one byte at a time.
/// Partial frames stay buffered across calls, so the emitted frame sequence
/// is independent of how the input was chunked.
///
/// # Example
///
/// ```rust
/// use eegstream::process::EXAMPLE_DATA;
/// use eegstream::process::sync::Synchronizer;
///
/// let mut synchronizer = Synchronizer::default();
/// synchronizer.push_bytes(EXAMPLE_DATA);
///
/// for frame in &mut synchronizer {
///     let frame = frame?;
///     println!("frame seq {}", frame.seq());
/// }
/// assert_eq!(synchronizer.frames_extracted(), 2);
/// # Ok::<(), eegstream::utils::errors::SyncError>(())
/// ```
#[derive(Debug)]
pub struct Synchronizer {
    buffer: VecDeque<u8>,
    frames_extracted: u64,
    bytes_discarded: u64,
}

impl Default for Synchronizer {
    fn default() -> Self {
        Self {
            buffer: VecDeque::with_capacity(8 * Frame::LEN),
            frames_extracted: 0,
            bytes_discarded: 0,
        }
    }
}

impl Synchronizer {
    /// Appends a raw notification chunk to the accumulator.
    ///
    /// A chunk may contain zero, one or many frames; call site order defines
    /// stream order.
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.buffer.extend(data);
    }

    /// Frames emitted so far.
    pub fn frames_extracted(&self) -> u64 {
        self.frames_extracted
    }

    /// Bytes dropped during realignment so far.
    pub fn bytes_discarded(&self) -> u64 {
        self.bytes_discarded
    }

    /// Bytes currently buffered (the partial tail between notifications).
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Clears the accumulator at an acquisition-session boundary so no
    /// partial frame is carried across sessions.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    fn take_frame(&mut self) -> Frame {
        let mut data = [0u8; Frame::LEN];
        for (dst, src) in data.iter_mut().zip(self.buffer.drain(..Frame::LEN)) {
            *dst = src;
        }

        self.frames_extracted += 1;
        Frame::from_raw(data)
    }
}

impl Iterator for Synchronizer {
    type Item = Result<Frame, SyncError>;

    /// Emits the next aligned frame, `None` when no complete frame can be
    /// produced from the buffered bytes, or an error once the per-call
    /// discard budget is exhausted.
    fn next(&mut self) -> Option<Self::Item> {
        let mut discarded = 0;

        while self.buffer.len() >= Frame::LEN {
            if self.buffer[0] == Frame::MARKER {
                return Some(Ok(self.take_frame()));
            }

            self.buffer.pop_front();
            self.bytes_discarded += 1;
            discarded += 1;

            if discarded >= MAX_DISCARD_PER_CALL {
                return Some(Err(SyncError::ResyncBudgetExhausted { discarded }));
            }
        }

        None
    }
}

#[cfg(test)]
fn frames(synchronizer: &mut Synchronizer) -> Vec<Frame> {
    synchronizer.by_ref().map(|f| f.unwrap()).collect()
}

#[test]
fn chunk_boundary_independence() {
    let mut stream = Vec::new();
    stream.extend_from_slice(&[0x13, 0x37]); // leading garbage
    for seq in 0..5u8 {
        stream.extend_from_slice(Frame::pack(seq, &[seq as i32 * 10; 8], &[0; 8]).as_ref());
        stream.push(0x00); // inter-frame garbage
    }

    let mut whole = Synchronizer::default();
    whole.push_bytes(&stream);
    let expected = frames(&mut whole);
    assert_eq!(expected.len(), 5);

    // Feed the identical stream in every possible split position, then one
    // byte at a time; the emitted frames must not change.
    for split in 0..stream.len() {
        let mut sync = Synchronizer::default();
        sync.push_bytes(&stream[..split]);
        let mut got = frames(&mut sync);
        sync.push_bytes(&stream[split..]);
        got.extend(frames(&mut sync));
        assert_eq!(got, expected, "split at {split}");
    }

    let mut bytewise = Synchronizer::default();
    let mut got = Vec::new();
    for byte in &stream {
        bytewise.push_bytes(&[*byte]);
        got.extend(frames(&mut bytewise));
    }
    assert_eq!(got, expected);
}

#[test]
fn discards_exactly_the_garbage_prefix() {
    for k in [0usize, 1, 7, 51] {
        let mut sync = Synchronizer::default();
        let mut stream = vec![0x42u8; k];
        stream.extend_from_slice(Frame::pack(0, &[0; 8], &[0; 8]).as_ref());

        sync.push_bytes(&stream);
        let got = frames(&mut sync);
        assert_eq!(got.len(), 1);
        assert_eq!(sync.bytes_discarded(), k as u64, "prefix of {k}");
        assert_eq!(sync.pending(), 0);
    }
}

#[test]
fn partial_tail_stays_buffered() {
    let frame = Frame::pack(9, &[1; 8], &[2; 8]);
    let bytes = frame.as_ref();

    let mut sync = Synchronizer::default();
    sync.push_bytes(&bytes[..30]);
    assert!(sync.next().is_none());
    assert_eq!(sync.pending(), 30);

    sync.push_bytes(&bytes[30..]);
    let got = frames(&mut sync);
    assert_eq!(got, vec![frame]);
}

#[test]
fn discard_budget_yields_control() {
    let mut sync = Synchronizer::default();
    sync.push_bytes(&vec![0x55u8; MAX_DISCARD_PER_CALL + Frame::LEN + 3]);
    sync.push_bytes(Frame::pack(1, &[0; 8], &[0; 8]).as_ref());

    match sync.next() {
        Some(Err(SyncError::ResyncBudgetExhausted { discarded })) => {
            assert_eq!(discarded, MAX_DISCARD_PER_CALL);
        }
        other => panic!("expected budget exhaustion, got {other:?}"),
    }

    // The next call keeps sliding and reaches the valid frame.
    let got = frames(&mut sync);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].seq(), 1);
}

#[test]
fn reset_drops_partial_frame() {
    let mut sync = Synchronizer::default();
    sync.push_bytes(&Frame::pack(0, &[0; 8], &[0; 8]).as_ref()[..40]);
    sync.reset();
    assert_eq!(sync.pending(), 0);

    sync.push_bytes(Frame::pack(1, &[0; 8], &[0; 8]).as_ref());
    let got = frames(&mut sync);
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].seq(), 1);
}
