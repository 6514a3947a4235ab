use crate::structs::link::AcquisitionMode;
use crate::utils::stats::StatsTick;

/// Events emitted by the acquisition producer for a UI or logging consumer.
///
/// The producer sends these over a channel (the consumer context must never
/// run decoding itself); the exact presentation of status text is the
/// consumer's concern.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// Transport link established; frame delivery may begin.
    Connected,
    /// Transport link lost or closed. Terminal for the current session.
    Disconnected,
    /// Device acknowledged a mode change.
    Mode(AcquisitionMode),
    /// Human-readable status line with a severity hint.
    Status(String, log::Level),
    /// Periodic loss/rate report from [`StreamStats`](crate::utils::stats::StreamStats).
    Stats(StatsTick),
}
