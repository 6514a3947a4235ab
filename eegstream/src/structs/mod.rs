//! Data structures representing the wire protocol and the link contract.
//!
//! - **Frames** ([`frame`]): the 52-byte wire unit and its packed layout
//! - **Link** ([`link`]): device identity, acquisition modes, command bytes
//! - **Events** ([`event`]): the producer-to-consumer event surface

pub mod event;
pub mod frame;
pub mod link;
