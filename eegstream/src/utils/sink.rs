use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::process::decode::SampleVector;

/// Default sink capacity: ten seconds of samples at the nominal rate.
pub const DEFAULT_CAPACITY: usize = 2500;

/// Bounded handoff buffer between the decode path and a rendering consumer.
///
/// The producer pushes each decoded [`SampleVector`] as it arrives; the
/// consumer drains on its own cadence. The handle is cheap to clone and both
/// sides may live on different threads; every vector is handed off whole.
///
/// This is an observability buffer, not a durable log: when full, the oldest
/// vector is silently overwritten. [`push`](Self::push) therefore never
/// blocks and never fails.
#[derive(Debug, Clone)]
pub struct SampleSink {
    queue: Arc<Mutex<VecDeque<SampleVector>>>,
    capacity: usize,
}

impl SampleSink {
    /// Creates a sink holding at most `capacity` sample vectors.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            queue: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Appends one vector, evicting the oldest when the sink is full.
    pub fn push(&self, samples: SampleVector) {
        let mut queue = self.queue.lock().unwrap();
        if queue.len() == self.capacity {
            queue.pop_front();
        }
        queue.push_back(samples);
    }

    /// Removes and returns everything currently buffered, in arrival order.
    pub fn drain_all(&self) -> Vec<SampleVector> {
        self.queue.lock().unwrap().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().unwrap().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SampleSink {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[test]
fn overflow_keeps_most_recent_in_order() {
    let sink = SampleSink::new(8);
    for i in 0..13 {
        sink.push([f64::from(i); 8]);
    }

    let drained = sink.drain_all();
    assert_eq!(drained.len(), 8);
    for (offset, vector) in drained.iter().enumerate() {
        assert_eq!(vector[0], f64::from(5 + offset as i32));
    }
    assert!(sink.is_empty());
}

#[test]
fn drain_on_empty_sink() {
    let sink = SampleSink::default();
    assert!(sink.drain_all().is_empty());
    assert_eq!(sink.capacity(), DEFAULT_CAPACITY);
}

#[test]
fn cross_thread_handoff() {
    let sink = SampleSink::new(64);
    let producer = sink.clone();

    let handle = std::thread::spawn(move || {
        for i in 0..40 {
            producer.push([f64::from(i); 8]);
        }
    });
    handle.join().unwrap();

    let drained = sink.drain_all();
    assert_eq!(drained.len(), 40);
    assert_eq!(drained[0][0], 0.0);
    assert_eq!(drained[39][0], 39.0);
}
