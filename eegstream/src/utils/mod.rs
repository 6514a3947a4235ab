//! Supporting infrastructure for the acquisition pipeline.
//!
//! - **Error Handling** ([`errors`]): error types and `log_or_err!`
//! - **Stream Health** ([`stats`]): loss and sample-rate tracking
//! - **Sample Handoff** ([`sink`]): bounded producer/consumer buffer

pub mod errors;
pub mod sink;
pub mod stats;
