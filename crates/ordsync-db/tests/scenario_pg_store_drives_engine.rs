// DB-backed test, skipped if ORDSYNC_DATABASE_URL is not set.
//
// Runs the synchronous engine against PgOrderStore; the runtime is owned by
// the test so the store can block on it.

use anyhow::Result;
use ordsync_db::PgOrderStore;
use ordsync_reconcile::{ReconciliationEngine, RecordParser, StatusMapper};

#[test]
fn engine_run_is_idempotent_against_postgres() -> Result<()> {
    let url = match std::env::var(ordsync_db::ENV_DB_URL) {
        Ok(v) => v,
        Err(_) => {
            eprintln!("SKIP: ORDSYNC_DATABASE_URL not set");
            return Ok(());
        }
    };

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;

    let pool = rt.block_on(async {
        let pool = ordsync_db::connect(&url).await?;
        ordsync_db::migrate(&pool).await?;
        anyhow::Ok(pool)
    })?;

    let base = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_millis() as i64
        * 100;
    let (a, b) = (base + 1, base + 2);
    rt.block_on(async {
        ordsync_db::insert_order(&pool, a, 0).await?;
        ordsync_db::insert_order(&pool, b, 2).await?;
        anyhow::Ok(())
    })?;

    let export = format!("{a}|3\n{b}|3\n{}|3", base + 3);
    let mapper = StatusMapper::build("3:7");

    let store = PgOrderStore::new(pool.clone(), rt.handle().clone());
    let mut engine = ReconciliationEngine::with_default_policy(mapper.clone(), store);
    let first = engine.run_silent(RecordParser::new(&export))?;
    assert_eq!(first.changed, 1);
    assert_eq!(first.invalid_pre_status, 1, "status 2 is terminal");
    assert_eq!(first.not_found, 1);

    let store = PgOrderStore::new(pool, rt.handle().clone());
    let mut engine = ReconciliationEngine::with_default_policy(mapper, store);
    let second = engine.run_silent(RecordParser::new(&export))?;
    assert_eq!(second.changed, 0);
    assert_eq!(second.same_status, 1);
    Ok(())
}
