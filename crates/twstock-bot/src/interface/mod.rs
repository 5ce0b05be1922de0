//! Outgoing message types and the transport seam

pub mod message;
pub mod sink;

pub use message::TextMessage;
pub use sink::{MemorySink, MessageSink};
