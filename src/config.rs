//! Run configuration
//!
//! The transform run is configured from CLI paths; the benchmark harness is
//! configured from environment variables (dotenv-compatible) with sensible
//! defaults for everything but the database password.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Output layout of one transform run: the dataset directory plus one
/// subdirectory per target under the output root.
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Directory holding the five source CSV files
    pub dataset_dir: PathBuf,
    /// Relational CSV tables
    pub relational_dir: PathBuf,
    /// Document JSON collections
    pub document_dir: PathBuf,
    /// Graph bulk-import files (`nodes/`, `edges/`)
    pub graph_dir: PathBuf,
}

impl TransformConfig {
    pub fn new(dataset_dir: PathBuf, out_dir: PathBuf) -> Self {
        Self {
            dataset_dir,
            relational_dir: out_dir.join("relational"),
            document_dir: out_dir.join("document"),
            graph_dir: out_dir.join("graph"),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.dataset_dir.is_dir() {
            return Err(anyhow::anyhow!(
                "dataset directory does not exist: {}",
                self.dataset_dir.display()
            ));
        }
        Ok(())
    }
}

/// Benchmark harness configuration
///
/// Environment variables:
/// - PG_HOST, PG_PORT, PG_DATABASE, PG_USER, PG_PASSWORD
/// - BENCH_RUNS, BENCH_PAUSE_MS
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// PostgreSQL host
    pub pg_host: String,
    /// PostgreSQL port
    pub pg_port: u16,
    /// PostgreSQL database holding the relational target
    pub pg_database: String,
    /// PostgreSQL user
    pub pg_user: String,
    /// PostgreSQL password
    pub pg_password: String,
    /// Query repetitions per backend
    pub runs: usize,
    /// Pause between repetitions in milliseconds
    pub pause_ms: u64,
}

impl BenchConfig {
    /// Load configuration from environment variables. Everything but the
    /// password has a default.
    pub fn from_env() -> Result<Self> {
        let pg_host = env::var("PG_HOST").unwrap_or_else(|_| "localhost".to_string());
        let pg_port = env::var("PG_PORT")
            .unwrap_or_else(|_| "5432".to_string())
            .parse()
            .unwrap_or(5432);
        let pg_database = env::var("PG_DATABASE").unwrap_or_else(|_| "marketing".to_string());
        let pg_user = env::var("PG_USER").unwrap_or_else(|_| "postgres".to_string());
        let pg_password =
            env::var("PG_PASSWORD").context("PG_PASSWORD environment variable is required")?;

        let runs = env::var("BENCH_RUNS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);
        let pause_ms = env::var("BENCH_PAUSE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(500);

        let config = Self {
            pg_host,
            pg_port,
            pg_database,
            pg_user,
            pg_password,
            runs,
            pause_ms,
        };
        config.validate()?;
        Ok(config)
    }

    /// Connection string for tokio-postgres.
    pub fn conninfo(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            self.pg_host, self.pg_port, self.pg_database, self.pg_user, self.pg_password
        )
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.pg_host.is_empty() {
            return Err(anyhow::anyhow!("PostgreSQL host cannot be empty"));
        }
        if self.pg_port == 0 {
            return Err(anyhow::anyhow!("PostgreSQL port must be greater than 0"));
        }
        if self.pg_database.is_empty() {
            return Err(anyhow::anyhow!("PostgreSQL database name cannot be empty"));
        }
        if self.pg_user.is_empty() {
            return Err(anyhow::anyhow!("PostgreSQL user cannot be empty"));
        }
        if self.runs == 0 {
            return Err(anyhow::anyhow!("Run count must be greater than 0"));
        }
        Ok(())
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            pg_host: "localhost".to_string(),
            pg_port: 5432,
            pg_database: "marketing".to_string(),
            pg_user: "postgres".to_string(),
            pg_password: String::new(),
            runs: 5,
            pause_ms: 500,
        }
    }
}
