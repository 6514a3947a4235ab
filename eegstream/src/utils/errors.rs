#[macro_export]
macro_rules! log_or_err {
    ($state:expr, $level:expr, $err:expr $(,)?) => {{
        if $level <= $state.fail_level {
            return Err($err);
        } else {
            match $level {
                ::log::Level::Error => ::log::error!("{}", $err),
                ::log::Level::Warn => ::log::warn!("{}", $err),
                ::log::Level::Info => ::log::info!("{}", $err),
                ::log::Level::Debug => ::log::debug!("{}", $err),
                ::log::Level::Trace => ::log::trace!("{}", $err),
            }
        }
    }};
}

#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    #[error("Expected a 52-byte frame, got {0} bytes")]
    UnexpectedLength(usize),

    #[error("Invalid marker byte {0:#04X}, expected 0xA0")]
    BadMarker(u8),
}

#[derive(thiserror::Error, Debug)]
pub enum SyncError {
    #[error("Discard budget exhausted after sliding {discarded} bytes without realignment")]
    ResyncBudgetExhausted { discarded: usize },
}

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("Frame checksum mismatch: calculated {calculated:#04X}, read {read:#04X}")]
    ChecksumMismatch { calculated: u8, read: u8 },

    #[error("Frame footer mismatch: read {0:#04X}, expected 0xC0")]
    FooterMismatch(u8),
}
