//! Server configuration from flags and `FUNDMATCH_*` environment variables.

use clap::Parser;
use fundmatch_core::db::{open_db, open_db_in_memory, DbResult};
use rusqlite::Connection;
use std::net::SocketAddr;

/// Database location that selects a private in-memory store.
pub const IN_MEMORY_DATABASE: &str = ":memory:";
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Parser, Debug, Clone)]
#[command(name = "fundmatch-server", author, version, about = "Investor/project matching service", long_about = None)]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "FUNDMATCH_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// SQLite database path, or `:memory:`.
    #[arg(long, env = "FUNDMATCH_DATABASE", default_value = "fundmatch.sqlite3")]
    pub database: String,

    /// trace|debug|info|warn|error. Defaults by build mode.
    #[arg(long, env = "FUNDMATCH_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logs go to stderr when unset.
    #[arg(long, env = "FUNDMATCH_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Largest accepted request body.
    #[arg(long, env = "FUNDMATCH_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,
}

impl ServerConfig {
    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or_else(|| fundmatch_core::default_log_level())
    }

    /// Opens and migrates the configured store.
    pub fn open_database(&self) -> DbResult<Connection> {
        if self.database == IN_MEMORY_DATABASE {
            open_db_in_memory()
        } else {
            open_db(&self.database)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "fundmatch-server",
            "--bind",
            "0.0.0.0:9000",
            "--database",
            IN_MEMORY_DATABASE,
            "--log-level",
            "warn",
            "--max-body-bytes",
            "1024",
        ])
        .unwrap();

        assert_eq!(config.bind, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_level(), "warn");
        assert_eq!(config.max_body_bytes, 1024);
        assert!(config.log_dir.is_none());
        config.open_database().unwrap();
    }

    #[test]
    fn log_level_falls_back_to_build_default() {
        let config = ServerConfig::try_parse_from(["fundmatch-server"]).unwrap();
        if config.log_level.is_none() {
            assert_eq!(config.log_level(), fundmatch_core::default_log_level());
        }
    }

    #[test]
    fn rejects_unparseable_bind_address() {
        assert!(ServerConfig::try_parse_from(["fundmatch-server", "--bind", "nowhere"]).is_err());
    }

    #[test]
    fn opens_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fundmatch.sqlite3");
        let config = ServerConfig::try_parse_from([
            "fundmatch-server",
            "--database",
            path.to_str().unwrap(),
        ])
        .unwrap();

        config.open_database().unwrap();
        assert!(path.exists());
    }
}
