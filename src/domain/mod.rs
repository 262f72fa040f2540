//! Domain layer: payload model and the asynchronous publish path.
//!
//! # Architecture
//!
//! - [`payload`] - JSON object codec used by the ingestion endpoint
//! - [`publish_job`] - queued unit of work for publisher tasks
//! - [`publish_stats`] - counters for dispatch and publish outcomes
//! - [`publish_worker`] - fixed pool of publisher tasks
//!
//! # Publish Flow
//!
//! 1. The ingestion handler decodes the body into a [`payload::Payload`]
//! 2. [`crate::application::dispatcher::PublishDispatcher`] queues a [`publish_job::PublishJob`]
//! 3. The HTTP response is sent
//! 4. [`publish_worker::run_publish_workers`] publishes the job through a
//!    [`crate::infrastructure::broker::BrokerSink`] with timeout and retry

pub mod payload;
pub mod publish_job;
pub mod publish_stats;
pub mod publish_worker;
