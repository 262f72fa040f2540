//! Shared application state.

use std::sync::Arc;

use crate::application::dispatcher::PublishDispatcher;
use crate::domain::publish_stats::PublishStats;
use crate::infrastructure::broker::BrokerSink;

/// Process-wide handles injected into handlers.
///
/// Built once in [`crate::server::run`]; nothing is looked up globally.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: PublishDispatcher,
    pub sink: Arc<dyn BrokerSink>,
    pub stats: Arc<PublishStats>,
}

impl AppState {
    pub fn new(dispatcher: PublishDispatcher, sink: Arc<dyn BrokerSink>) -> Self {
        let stats = dispatcher.stats().clone();
        Self {
            dispatcher,
            sink,
            stats,
        }
    }
}
