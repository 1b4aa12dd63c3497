use log::info;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{StdResult, VisitCounter};

/// Identifier of the row holding the site-wide counter.
const VISITS_COUNTER_ID: &str = "stats";

/// A visit counter stored in a PostgreSQL database.
pub struct PostgresVisitCounter {
    pool: PgPool,
}

impl PostgresVisitCounter {
    /// Creates a new `PostgresVisitCounter` instance, creating its table when missing.
    pub async fn try_new(connection_string: &str) -> StdResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(connection_string)
            .await?;
        sqlx::query(
            r#"
CREATE TABLE IF NOT EXISTS visit_counter (
    id TEXT PRIMARY KEY,
    total BIGINT NOT NULL DEFAULT 0,
    last_updated TIMESTAMPTZ NOT NULL DEFAULT now()
);
            "#,
        )
        .execute(&pool)
        .await?;
        info!("Visit counter table ready");

        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl VisitCounter for PostgresVisitCounter {
    async fn total(&self) -> StdResult<u64> {
        let row: (i64,) = sqlx::query_as(
            r#"
INSERT INTO visit_counter (id, total)
VALUES ($1, 0)
ON CONFLICT (id) DO UPDATE
SET total = visit_counter.total
RETURNING total;
            "#,
        )
        .bind(VISITS_COUNTER_ID)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0.max(0) as u64)
    }

    async fn increment(&self) -> StdResult<u64> {
        let row: (i64,) = sqlx::query_as(
            r#"
INSERT INTO visit_counter (id, total)
VALUES ($1, 1)
ON CONFLICT (id) DO UPDATE
SET total = visit_counter.total + 1, last_updated = now()
RETURNING total;
            "#,
        )
        .bind(VISITS_COUNTER_ID)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0.max(0) as u64)
    }
}
