//! `ordsync sync` and `ordsync inspect`.

use std::fs;

use anyhow::{Context, Result};
use ordsync_config::{SyncConfig, UnusedKeyPolicy};
use ordsync_db::PgOrderStore;
use ordsync_reconcile::{
    OutcomeCounters, ParsedLine, ReconciliationEngine, RecordParser, StatusMapper,
};
use tracing::{info, warn};

use super::progress::Progress;
use super::{load_config, runtime};

// ---------------------------------------------------------------------------
// sync
// ---------------------------------------------------------------------------

pub fn run_sync(config_paths: &[String], strict_config: bool, json: bool) -> Result<()> {
    let policy = if strict_config {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    let loaded = load_config(config_paths, policy)?;
    let cfg = SyncConfig::from_loaded(&loaded)?;
    info!(config_hash = %loaded.config_hash, "config loaded");

    let input_path = cfg.input_path();
    info!(path = %input_path, "reading input file");
    let raw = read_input(&input_path)?;

    let mapper = StatusMapper::build(&cfg.mapping);
    if mapper.is_empty() {
        warn!("status mapping is empty; every record will count as status-not-found");
    }

    let rt = runtime()?;
    let pool = rt.block_on(ordsync_db::connect_from_env())?;
    let store = PgOrderStore::new(pool, rt.handle().clone());

    let parser = RecordParser::new(&raw);
    info!(lines = parser.line_count(), "processing orders");

    let mut progress = Progress::new(parser.line_count(), cfg.redraw_frequency);
    let mut engine = ReconciliationEngine::with_default_policy(mapper, store);
    let counters = engine
        .run(parser, |r| progress.advance(r))
        .context("status sync aborted")?;
    progress.finish();

    print_counters(&counters, json)?;
    Ok(())
}

fn print_counters(counters: &OutcomeCounters, json: bool) -> Result<()> {
    if json {
        let s = serde_json::to_string_pretty(counters).context("report serialize failed")?;
        println!("{s}");
    } else {
        for (name, value) in counters.entries() {
            println!("{name}: {value}");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// inspect
// ---------------------------------------------------------------------------

/// Offline dry look at what a sync would read.
pub fn run_inspect(config_paths: &[String]) -> Result<()> {
    let loaded = load_config(config_paths, UnusedKeyPolicy::Warn)?;
    let cfg = SyncConfig::from_loaded(&loaded)?;
    let input_path = cfg.input_path();
    let raw = read_input(&input_path)?;

    let mapper = StatusMapper::build(&cfg.mapping);
    let parser = RecordParser::new(&raw);
    let malformed = parser
        .iter()
        .filter(|l| matches!(l, ParsedLine::Malformed { .. }))
        .count();
    let unmapped = parser
        .iter()
        .filter(|l| match l {
            ParsedLine::Record(r) => mapper.lookup(r.external_status).is_none(),
            ParsedLine::Malformed { .. } => false,
        })
        .count();

    println!("config_hash={}", loaded.config_hash);
    println!("input_path={}", input_path);
    println!("mapping_entries={}", mapper.len());
    println!("lines={}", parser.line_count());
    println!("invalid_lines={}", malformed);
    println!("status_not_found={}", unmapped);
    Ok(())
}

fn read_input(path: &str) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("read input file failed: {path}"))?;
    // Strip UTF-8 BOM if present.
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);
    Ok(String::from_utf8_lossy(bytes).into_owned())
}
