use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ordsync")]
#[command(about = "Fulfillment → storefront order status sync", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the configured status export to the storefront order table
    Sync {
        /// Layered config paths in merge order (base -> env -> site...)
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Fail instead of warn when the config carries keys nothing reads
        #[arg(long, default_value_t = false)]
        strict_config: bool,

        /// Print the final counters as a JSON object
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Parse config, mapping and export without touching the database
    Inspect {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Database commands
    Db {
        #[command(subcommand)]
        cmd: DbCmd,
    },
}

#[derive(Subcommand)]
enum DbCmd {
    Status,

    /// Apply SQL migrations (order + history tables)
    Migrate,
}

fn main() -> Result<()> {
    // Silent if the file does not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Sync {
            config_paths,
            strict_config,
            json,
        } => commands::sync::run_sync(&config_paths, strict_config, json)?,

        Commands::Inspect { config_paths } => commands::sync::run_inspect(&config_paths)?,

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = ordsync_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Db { cmd } => {
            let rt = commands::runtime()?;
            rt.block_on(async {
                let pool = ordsync_db::connect_from_env().await?;
                match cmd {
                    DbCmd::Status => {
                        let s = ordsync_db::status(&pool).await?;
                        println!("db_ok={} has_order_table={}", s.ok, s.has_order_table);
                    }
                    DbCmd::Migrate => {
                        ordsync_db::migrate(&pool).await?;
                        println!("migrations_applied=true");
                    }
                }
                anyhow::Ok(())
            })?;
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries only command output.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
