//! Concrete implementations of the domain ports.

pub mod channel;
pub mod codes;
pub mod modem;
pub mod sinks;

pub use channel::AwgnChannel;
pub use codes::BuiltinCodecs;
pub use modem::{modem_for, Bpsk, Qpsk};
pub use sinks::{FileResultSink, FileSinkFactory, MemorySinkFactory};
