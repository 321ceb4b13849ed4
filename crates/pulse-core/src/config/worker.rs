//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Settings for the cron scheduler jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression for the retention purge.
    #[serde(default = "default_purge_cron")]
    pub purge_cron: String,
    /// Days a read notification is retained before purge.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    /// Cron expression for the due-scheduled redelivery scan.
    #[serde(default = "default_redeliver_cron")]
    pub redeliver_cron: String,
    /// Maximum rows picked up per redelivery scan.
    #[serde(default = "default_redeliver_batch")]
    pub redeliver_batch_size: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            purge_cron: default_purge_cron(),
            retention_days: default_retention_days(),
            redeliver_cron: default_redeliver_cron(),
            redeliver_batch_size: default_redeliver_batch(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Nightly at 03:30.
fn default_purge_cron() -> String {
    "0 30 3 * * *".to_string()
}

fn default_retention_days() -> u32 {
    30
}

/// Every minute.
fn default_redeliver_cron() -> String {
    "0 * * * * *".to_string()
}

fn default_redeliver_batch() -> u32 {
    100
}
