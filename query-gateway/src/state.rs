//! Application state for the query gateway.

use std::sync::Arc;

use common::config::AppConfig;
use common::models::NumberFormat;
use tokio::sync::watch;

use crate::executor::{MySqlExecutor, QueryExecutor};
use crate::service::QueryService;

/// Process lifecycle as reported by `/is_ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Starting,
    Ready,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub query_service: Arc<QueryService>,
    lifecycle: Arc<watch::Sender<Lifecycle>>,
}

impl AppState {
    /// Creates state backed by a lazily connected MySQL pool.
    pub fn new(config: &AppConfig) -> Self {
        let executor = Arc::new(MySqlExecutor::connect_lazy(&config.database));
        Self::with_executor(config, executor)
    }

    pub fn with_executor(config: &AppConfig, executor: Arc<dyn QueryExecutor>) -> Self {
        let numbers = NumberFormat {
            big_numbers_as_strings: config.database.support_big_numbers,
        };
        let (lifecycle, _) = watch::channel(Lifecycle::Starting);

        Self {
            query_service: Arc::new(QueryService::new(executor, numbers)),
            lifecycle: Arc::new(lifecycle),
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        *self.lifecycle.borrow()
    }

    /// Called once the listener is bound.
    pub fn mark_ready(&self) {
        self.lifecycle.send_replace(Lifecycle::Ready);
    }
}
