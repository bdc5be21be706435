//! Query execution against the MySQL pool.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{Executor, MySqlPool, Statement};

use common::config::DatabaseConfig;
use common::errors::AppResult;
use common::models::{MutationSummary, NumberFormat, QueryOutcome};

use crate::decode::{bind_param, RowDecoder};

/// Runs one parameterized statement and reports what it produced.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn run(&self, query: &str, params: &[Value]) -> AppResult<QueryOutcome>;
}

/// Executor backed by a shared sqlx MySQL pool.
pub struct MySqlExecutor {
    pool: MySqlPool,
    decoder: RowDecoder,
}

impl MySqlExecutor {
    /// Builds the pool without opening a connection; the first query connects.
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy_with(options);

        Self::new(
            pool,
            NumberFormat {
                big_numbers_as_strings: config.support_big_numbers,
            },
        )
    }

    pub fn new(pool: MySqlPool, numbers: NumberFormat) -> Self {
        Self {
            pool,
            decoder: RowDecoder::new(numbers),
        }
    }
}

#[async_trait]
impl QueryExecutor for MySqlExecutor {
    async fn run(&self, query: &str, params: &[Value]) -> AppResult<QueryOutcome> {
        // Goes back to the pool when dropped, whichever way this returns.
        let mut conn = self.pool.acquire().await?;

        // Preparing tells us up front whether the statement yields a result set.
        let statement = (&mut *conn).prepare(query).await?;
        let mut bound = statement.query();
        for param in params {
            bound = bind_param(bound, param);
        }

        if statement.columns().is_empty() {
            let result = bound.execute(&mut *conn).await?;
            return Ok(QueryOutcome::Mutation(MutationSummary {
                affected_rows: result.rows_affected(),
                insert_id: result.last_insert_id(),
            }));
        }

        let rows = bound.fetch_all(&mut *conn).await?;
        let rows = rows
            .iter()
            .map(|row| self.decoder.decode_row(row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(QueryOutcome::Rows(rows))
    }
}
