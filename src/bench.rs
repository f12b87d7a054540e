//! Query benchmark harness
//!
//! Issues one fixed campaign-analysis read query against each live backend,
//! repeats it a configured number of times with a pause between runs, and
//! reports mean/stdev/min/max latency per backend. PostgreSQL is the only
//! live backend; the document and graph slots exist in the report so all
//! three stores can be compared once their drivers are wired in.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{error, info};

use crate::config::BenchConfig;
use crate::error::Result;

/// The fixed read query: per-campaign message volume, interaction reach,
/// purchase conversions and social spillover (friends of purchasers who
/// purchased as well).
pub const CAMPAIGN_ANALYSIS_QUERY: &str = "\
WITH campaign_messages AS (
    SELECT m.campaign_id,
           ms.message_id,
           ms.client_id
    FROM message_sent ms
    JOIN messages m ON m.id = ms.abstract_message_id
),
interactions AS (
    SELECT cm.campaign_id,
           cm.client_id,
           bool_or(mb.behavior_type = 'purchased') AS purchased
    FROM campaign_messages cm
    JOIN message_behavior mb ON mb.message_id = cm.message_id
    GROUP BY cm.campaign_id, cm.client_id
),
purchasers AS (
    SELECT i.campaign_id, c.user_id
    FROM interactions i
    JOIN clients c ON c.client_id = i.client_id
    WHERE i.purchased
)
SELECT ca.campaign_pk AS campaign_id,
       ca.campaign_type,
       count(DISTINCT cm.message_id) AS total_messages,
       count(DISTINCT i.client_id) AS clients_with_interaction,
       count(DISTINCT p.user_id) AS users_purchased,
       count(DISTINCT f2.user_id) AS friends_who_also_purchased,
       count(DISTINCT p.user_id)::float
           / NULLIF(count(DISTINCT cm.client_id), 0) AS conversion_rate
FROM campaigns ca
LEFT JOIN campaign_messages cm ON cm.campaign_id = ca.campaign_pk
LEFT JOIN interactions i ON i.campaign_id = ca.campaign_pk
LEFT JOIN purchasers p ON p.campaign_id = ca.campaign_pk
LEFT JOIN friends f ON f.friend1 = p.user_id OR f.friend2 = p.user_id
LEFT JOIN purchasers f2 ON f2.campaign_id = ca.campaign_pk
    AND f2.user_id = CASE WHEN f.friend1 = p.user_id THEN f.friend2 ELSE f.friend1 END
GROUP BY ca.campaign_pk, ca.campaign_type
ORDER BY ca.campaign_pk";

/// Latency statistics of one backend's runs, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryStats {
    pub mean: f64,
    pub stdev: f64,
    pub min: f64,
    pub max: f64,
}

impl QueryStats {
    /// Compute statistics over per-run durations in seconds. Sample standard
    /// deviation; zero for a single run. `None` for an empty sample.
    pub fn from_secs(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let stdev = if samples.len() < 2 {
            0.0
        } else {
            let variance = samples
                .iter()
                .map(|sample| (sample - mean).powi(2))
                .sum::<f64>()
                / (n - 1.0);
            variance.sqrt()
        };
        let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            mean,
            stdev,
            min,
            max,
        })
    }
}

/// One benchmarked backend: a name and one timed round-trip of the fixed
/// query.
#[async_trait]
pub trait BenchBackend {
    fn name(&self) -> &str;
    async fn execute(&self) -> Result<Duration>;
}

/// Live PostgreSQL backend over the relational target.
pub struct PostgresBackend {
    client: tokio_postgres::Client,
}

impl PostgresBackend {
    pub async fn connect(config: &BenchConfig) -> Result<Self> {
        let (client, connection) =
            tokio_postgres::connect(&config.conninfo(), tokio_postgres::NoTls).await?;
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                error!(error = %err, "postgres connection task failed");
            }
        });
        Ok(Self { client })
    }
}

#[async_trait]
impl BenchBackend for PostgresBackend {
    fn name(&self) -> &str {
        "postgresql"
    }

    async fn execute(&self) -> Result<Duration> {
        let start = Instant::now();
        self.client.query(CAMPAIGN_ANALYSIS_QUERY, &[]).await?;
        Ok(start.elapsed())
    }
}

/// Run one backend's repetitions, pausing between runs, and return per-run
/// latencies in seconds.
pub async fn run_repeated(
    backend: &dyn BenchBackend,
    runs: usize,
    pause_ms: u64,
) -> Result<Vec<f64>> {
    let mut samples = Vec::with_capacity(runs);
    for run in 1..=runs {
        let elapsed = backend.execute().await?;
        let secs = elapsed.as_secs_f64();
        info!("{} run {}: {:.4}s", backend.name(), run, secs);
        samples.push(secs);
        if run < runs {
            sleep(Duration::from_millis(pause_ms)).await;
        }
    }
    Ok(samples)
}

/// Statistics per backend. A `None` slot means the backend was not run;
/// the document and graph stores have no live driver here.
#[derive(Debug, Default)]
pub struct BenchReport {
    pub postgres: Option<QueryStats>,
    pub mongodb: Option<QueryStats>,
    pub neo4j: Option<QueryStats>,
}

impl BenchReport {
    pub fn log(&self) {
        for (name, stats) in [
            ("postgresql", &self.postgres),
            ("mongodb", &self.mongodb),
            ("neo4j", &self.neo4j),
        ] {
            match stats {
                Some(stats) => info!(
                    backend = name,
                    mean = format!("{:.4}", stats.mean),
                    stdev = format!("{:.4}", stats.stdev),
                    min = format!("{:.4}", stats.min),
                    max = format!("{:.4}", stats.max),
                    "benchmark results"
                ),
                None => info!(backend = name, "benchmark skipped (no live driver)"),
            }
        }
    }
}

/// Run the full benchmark against every live backend.
pub async fn run(config: &BenchConfig) -> Result<BenchReport> {
    let mut report = BenchReport::default();

    let postgres = PostgresBackend::connect(config).await?;
    let samples = run_repeated(&postgres, config.runs, config.pause_ms).await?;
    report.postgres = QueryStats::from_secs(&samples);

    report.log();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedBackend {
        latencies_ms: Vec<u64>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl BenchBackend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn execute(&self) -> Result<Duration> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Duration::from_millis(self.latencies_ms[call]))
        }
    }

    #[test]
    fn stats_over_a_fixed_sample() {
        let stats = QueryStats::from_secs(&[2.0, 4.0, 4.0, 4.0, 6.0]).unwrap();
        assert!((stats.mean - 4.0).abs() < 1e-9);
        // sample stdev of [2,4,4,4,6] is sqrt(2)
        assert!((stats.stdev - 2.0_f64.sqrt()).abs() < 1e-9);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 6.0);
    }

    #[test]
    fn single_sample_has_zero_stdev() {
        let stats = QueryStats::from_secs(&[1.5]).unwrap();
        assert_eq!(stats.mean, 1.5);
        assert_eq!(stats.stdev, 0.0);
        assert_eq!(stats.min, 1.5);
        assert_eq!(stats.max, 1.5);
    }

    #[test]
    fn empty_sample_yields_no_stats() {
        assert!(QueryStats::from_secs(&[]).is_none());
    }

    #[tokio::test]
    async fn run_repeated_collects_one_sample_per_run() {
        let backend = FixedBackend {
            latencies_ms: vec![10, 20, 30],
            calls: AtomicUsize::new(0),
        };
        let samples = run_repeated(&backend, 3, 0).await.unwrap();
        assert_eq!(samples.len(), 3);
        assert!((samples[0] - 0.010).abs() < 1e-9);
        assert!((samples[2] - 0.030).abs() < 1e-9);
    }

    #[test]
    fn report_slots_without_a_driver_stay_empty() {
        let report = BenchReport {
            postgres: QueryStats::from_secs(&[1.0]),
            ..BenchReport::default()
        };
        assert!(report.postgres.is_some());
        assert!(report.mongodb.is_none());
        assert!(report.neo4j.is_none());
    }
}
