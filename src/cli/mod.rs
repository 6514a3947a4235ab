pub mod command;
pub mod info;
pub mod simulate;
pub mod stream;
