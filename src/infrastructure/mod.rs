//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`broker`] - AMQP publishing and the in-memory sink
//!
//! # Design
//!
//! The sink is built once in [`crate::server::run`], shared behind
//! `Arc<dyn BrokerSink>` and closed on graceful shutdown.

pub mod broker;
