//! Message broker adapters.
//!
//! The rest of the service sees the broker only through [`BrokerSink`].

pub mod amqp_sink;
pub mod memory_sink;
pub mod sink;

pub use amqp_sink::{AmqpSink, BrokerSettings};
pub use memory_sink::MemorySink;
pub use sink::{Ack, BrokerSink, ConnectionError, PublishError};
