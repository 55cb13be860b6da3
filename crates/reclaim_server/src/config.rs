//! Server configuration.
//!
//! Everything is explicit flag-or-environment configuration resolved at
//! startup; in particular the token signing secret only ever enters the
//! process through `RECLAIM_TOKEN_SECRET`.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reclaim-server", about = "Lost-and-found reporting backend")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "RECLAIM_BIND", default_value = "127.0.0.1:3000")]
    pub bind: String,

    /// SQLite database path
    #[arg(long, env = "RECLAIM_DB", default_value_os_t = default_db_path())]
    pub database: PathBuf,

    /// Session token signing secret
    #[arg(long, env = "RECLAIM_TOKEN_SECRET", hide_env_values = true)]
    pub token_secret: String,

    /// Session token lifetime in seconds
    #[arg(long, env = "RECLAIM_TOKEN_TTL_SECS", default_value_t = 3600)]
    pub token_ttl_secs: i64,

    /// Cap on requested page sizes
    #[arg(long, env = "RECLAIM_MAX_PAGE_SIZE", default_value_t = 100)]
    pub max_page_size: i64,

    /// Bound on any single store call, in seconds
    #[arg(long, env = "RECLAIM_STORE_TIMEOUT_SECS", default_value_t = 5)]
    pub store_timeout_secs: u64,

    /// Directory for uploaded images
    #[arg(long, env = "RECLAIM_UPLOAD_DIR", default_value_os_t = default_upload_dir())]
    pub upload_dir: PathBuf,

    /// Include raw internal error text in responses (development only)
    #[arg(long, env = "RECLAIM_DEV_ERRORS")]
    pub dev_errors: bool,

    /// Verbose console logging
    #[arg(long, short)]
    pub verbose: bool,
}

fn default_db_path() -> PathBuf {
    reclaim_logging::reclaim_home().join("reclaim.sqlite3")
}

fn default_upload_dir() -> PathBuf {
    reclaim_logging::reclaim_home().join("uploads")
}
