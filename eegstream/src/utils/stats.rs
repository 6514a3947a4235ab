use std::time::Instant;

/// A report is emitted once per this many received frames.
pub const REPORT_INTERVAL: u64 = 50;

/// Sub-frames decoded per physical frame.
pub const SAMPLES_PER_FRAME: u64 = 2;

/// One periodic stream-health report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsTick {
    /// Percentage of expected frames (by sequence delta) not received.
    pub loss_pct: f64,
    /// Effective decoded-sample rate since the first report, in Hz.
    pub rate_hz: f64,
}

/// Tracks sequence numbers to measure frame loss and effective sample rate.
///
/// Feed every decoded frame's sequence number to [`observe`](Self::observe);
/// every [`REPORT_INTERVAL`]th received frame yields a [`StatsTick`].
/// Sequence deltas are taken mod 256, so the 255 → 0 wraparound counts as a
/// delta of one and never as a loss spike.
///
/// The rate clock starts at the first emitted tick, not at stream start, so
/// the first tick always reports `rate_hz = 0.0`.
#[derive(Debug, Default)]
pub struct StreamStats {
    last_seq: Option<u8>,
    expected: u64,
    received: u64,
    first_tick: Option<Instant>,
}

impl StreamStats {
    /// Records one received sequence number.
    ///
    /// The first observation only latches the sequence number and emits
    /// nothing. Afterwards, returns `Some` every [`REPORT_INTERVAL`]th
    /// received frame.
    pub fn observe(&mut self, seq: u8) -> Option<StatsTick> {
        self.observe_at(seq, Instant::now())
    }

    fn observe_at(&mut self, seq: u8, now: Instant) -> Option<StatsTick> {
        let Some(last) = self.last_seq.replace(seq) else {
            return None;
        };

        self.expected += u64::from(seq.wrapping_sub(last));
        self.received += 1;

        if self.received % REPORT_INTERVAL != 0 {
            return None;
        }

        let rate_hz = match self.first_tick {
            None => {
                self.first_tick = Some(now);
                0.0
            }
            Some(first) => {
                let elapsed = now.duration_since(first).as_secs_f64();
                if elapsed > 0.0 {
                    (self.received * SAMPLES_PER_FRAME) as f64 / elapsed
                } else {
                    0.0
                }
            }
        };

        Some(StatsTick {
            loss_pct: loss_pct(self.expected, self.received),
            rate_hz,
        })
    }

    /// Cumulative expected frame count by sequence delta.
    pub fn expected(&self) -> u64 {
        self.expected
    }

    /// Cumulative received frame count.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Clears all counters and the latched sequence number.
    ///
    /// Called at each acquisition-session boundary (the `'b'` command), so
    /// reports reflect only the current session.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Loss percentage for the given cumulative counters; 0.0 when nothing was
/// expected yet.
pub fn loss_pct(expected: u64, received: u64) -> f64 {
    if expected == 0 {
        return 0.0;
    }

    100.0 * (expected as f64 - received as f64) / expected as f64
}

#[test]
fn consecutive_sequences() {
    let mut stats = StreamStats::default();
    for seq in [10, 11, 12] {
        assert!(stats.observe(seq).is_none());
    }

    assert_eq!(stats.expected(), 2);
    assert_eq!(stats.received(), 2);
}

#[test]
fn wraparound_is_not_loss() {
    let mut stats = StreamStats::default();
    for seq in [254, 255, 0, 1] {
        stats.observe(seq);
    }

    assert_eq!(stats.expected(), 3);
    assert_eq!(stats.received(), 3);
}

#[test]
fn dropped_frames_raise_expected() {
    let mut stats = StreamStats::default();
    stats.observe(0);
    stats.observe(1);
    stats.observe(5); // 2, 3, 4 lost

    assert_eq!(stats.expected(), 5);
    assert_eq!(stats.received(), 2);
}

#[test]
fn loss_formula() {
    assert_eq!(loss_pct(100, 50), 50.0);
    assert_eq!(loss_pct(0, 0), 0.0);
    assert_eq!(loss_pct(200, 200), 0.0);
}

#[test]
fn tick_cadence_and_rate_clock() {
    use std::time::Duration;

    let mut stats = StreamStats::default();
    let start = Instant::now();

    // First observation latches only; ticks happen every 50th received.
    let mut ticks = Vec::new();
    for i in 0..101u64 {
        let seq = (i % 256) as u8;
        if let Some(tick) = stats.observe_at(seq, start + Duration::from_millis(8 * i)) {
            ticks.push((stats.received(), tick));
        }
    }

    assert_eq!(ticks.len(), 2);
    let (received, first) = ticks[0];
    assert_eq!(received, 50);
    assert_eq!(first.rate_hz, 0.0);
    assert_eq!(first.loss_pct, 0.0);

    // Second tick: 100 frames received, 50 frames (400 ms) after the clock
    // started, 200 samples decoded since then.
    let (received, second) = ticks[1];
    assert_eq!(received, 100);
    assert!((second.rate_hz - 100.0 * 2.0 / 0.4).abs() < 1e-9);
}

#[test]
fn reset_clears_session_state() {
    let mut stats = StreamStats::default();
    stats.observe(3);
    stats.observe(9);
    assert_eq!(stats.expected(), 6);

    stats.reset();
    assert_eq!(stats.expected(), 0);
    assert_eq!(stats.received(), 0);

    // The next observation is a fresh first observation.
    assert!(stats.observe(200).is_none());
    assert_eq!(stats.received(), 0);
}
