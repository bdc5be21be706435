//! 查询执行服务模块

use std::sync::Arc;
use std::time::Instant;

use common::errors::{AppError, AppResult};
use common::models::{NumberFormat, QueryRequest};
use common::response::GatewayResponse;
use validator::Validate;

use crate::executor::QueryExecutor;
use crate::shape::ShapePolicy;

/// Executes a request and shapes the outcome for the calling endpoint.
pub struct QueryService {
    executor: Arc<dyn QueryExecutor>,
    numbers: NumberFormat,
}

impl QueryService {
    pub fn new(executor: Arc<dyn QueryExecutor>, numbers: NumberFormat) -> Self {
        Self { executor, numbers }
    }

    pub async fn execute(
        &self,
        req: QueryRequest,
        policy: ShapePolicy,
    ) -> AppResult<GatewayResponse> {
        // Checked before any connection is taken from the pool.
        if policy.requires_query() {
            req.validate().map_err(|_| AppError::MissingQuery)?;
        }

        let (query, params) = req.into_parts();
        let start = Instant::now();
        let outcome = self.executor.run(&query, &params).await?;

        tracing::debug!(
            endpoint = policy.name(),
            params = params.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "查询执行完成"
        );

        Ok(policy.shape(outcome, self.numbers))
    }
}
