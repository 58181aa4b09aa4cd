use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use ordsync_reconcile::{OrderId, OrderNumber, OrderStore, StatusCode, StoreError, StoredOrder};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tokio::runtime::Handle;
use tracing::warn;

pub const ENV_DB_URL: &str = "ORDSYNC_DATABASE_URL";

/// Comment stored on every history row written by the sync.
pub const HISTORY_COMMENT: &str = "ordsync: fulfillment status import";

/// Connect to Postgres using ORDSYNC_DATABASE_URL.
pub async fn connect_from_env() -> Result<PgPool> {
    let url = std::env::var(ENV_DB_URL).with_context(|| format!("missing env var {ENV_DB_URL}"))?;
    connect(&url).await
}

pub async fn connect(url: &str) -> Result<PgPool> {
    // Records are processed strictly one at a time; a small pool is plenty.
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(url)
        .await
        .context("failed to connect to Postgres")?;
    Ok(pool)
}

/// Run embedded SQLx migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("db migrate failed")?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct DbStatus {
    pub ok: bool,
    pub has_order_table: bool,
}

/// Simple status query (connectivity + schema presence).
pub async fn status(pool: &PgPool) -> Result<DbStatus> {
    let (one,): (i32,) = sqlx::query_as::<_, (i32,)>("select 1")
        .fetch_one(pool)
        .await
        .context("status connectivity query failed")?;

    let (exists,): (bool,) = sqlx::query_as::<_, (bool,)>(
        r#"
        select exists (
            select 1
            from information_schema.tables
            where table_schema='public' and table_name='s_order'
        )
        "#,
    )
    .fetch_one(pool)
    .await
    .context("status table-exists query failed")?;

    Ok(DbStatus {
        ok: one == 1,
        has_order_table: exists,
    })
}

/// Look an order up by its storefront order number.
pub async fn fetch_order(pool: &PgPool, number: OrderNumber) -> Result<Option<StoredOrder>> {
    let row: Option<(i64, i64)> = sqlx::query_as::<_, (i64, i64)>(
        r#"
        select id, status
        from s_order
        where ordernumber = $1
        "#,
    )
    .bind(number.to_string())
    .fetch_optional(pool)
    .await
    .context("fetch_order failed")?;

    Ok(row.map(|(id, status)| StoredOrder { id, status }))
}

/// Silent status write: update the order and append a history row in one
/// transaction. No customer notification, no document regeneration.
pub async fn apply_status(pool: &PgPool, id: OrderId, status: StatusCode) -> Result<()> {
    let mut tx = pool.begin().await.context("apply_status begin failed")?;

    let prev: Option<(i64,)> =
        sqlx::query_as::<_, (i64,)>("select status from s_order where id = $1 for update")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .context("apply_status lock failed")?;
    let (previous_status,) = prev.ok_or_else(|| anyhow!("apply_status: unknown order id {id}"))?;

    sqlx::query("update s_order set status = $2 where id = $1")
        .bind(id)
        .bind(status)
        .execute(&mut *tx)
        .await
        .context("apply_status update failed")?;

    sqlx::query(
        r#"
        insert into s_order_history (
          order_id, previous_status, new_status, changed_at_utc, comment
        ) values (
          $1, $2, $3, $4, $5
        )
        "#,
    )
    .bind(id)
    .bind(previous_status)
    .bind(status)
    .bind(Utc::now())
    .bind(HISTORY_COMMENT)
    .execute(&mut *tx)
    .await
    .context("apply_status history insert failed")?;

    tx.commit().await.context("apply_status commit failed")?;
    Ok(())
}

/// Insert an order row and return its id. Used for seeding and tests.
pub async fn insert_order(pool: &PgPool, number: OrderNumber, status: StatusCode) -> Result<OrderId> {
    let (id,): (i64,) = sqlx::query_as::<_, (i64,)>(
        r#"
        insert into s_order (ordernumber, status)
        values ($1, $2)
        on conflict (ordernumber) do update set status = excluded.status
        returning id
        "#,
    )
    .bind(number.to_string())
    .bind(status)
    .fetch_one(pool)
    .await
    .context("insert_order failed")?;
    Ok(id)
}

/// Number of history rows recorded for `id`.
pub async fn count_history(pool: &PgPool, id: OrderId) -> Result<i64> {
    let (n,): (i64,) =
        sqlx::query_as::<_, (i64,)>("select count(*)::bigint from s_order_history where order_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .context("count_history failed")?;
    Ok(n)
}

// ---------------------------------------------------------------------------
// PgOrderStore
// ---------------------------------------------------------------------------

/// [`OrderStore`] over Postgres for the synchronous engine.
///
/// Each call blocks on `handle` until the query completes, so the engine
/// keeps its one-record-at-a-time semantics. Must not be used from inside an
/// async context; build it from a runtime the caller owns.
pub struct PgOrderStore {
    pool: PgPool,
    handle: Handle,
}

impl PgOrderStore {
    pub fn new(pool: PgPool, handle: Handle) -> Self {
        Self { pool, handle }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl OrderStore for PgOrderStore {
    fn find_by_order_number(&self, number: OrderNumber) -> Option<StoredOrder> {
        match self.handle.block_on(fetch_order(&self.pool, number)) {
            Ok(found) => found,
            Err(e) => {
                // A failed read counts as "not found"; the run continues.
                warn!(order = number, error = %format!("{e:#}"), "order lookup failed");
                None
            }
        }
    }

    fn set_status(&mut self, id: OrderId, status: StatusCode) -> Result<(), StoreError> {
        self.handle
            .block_on(apply_status(&self.pool, id, status))
            .map_err(|e| StoreError::new(format!("{e:#}")))
    }
}
