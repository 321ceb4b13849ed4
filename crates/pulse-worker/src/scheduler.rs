//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use pulse_core::config::worker::WorkerConfig;
use pulse_core::error::AppError;
use pulse_database::NotificationStore;
use pulse_dispatch::DispatchEngine;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Worker settings (cron expressions, retention window, batch size)
    config: WorkerConfig,
    /// Store for purge and due-scheduled scans
    store: Arc<dyn NotificationStore>,
    /// Engine for redelivering due scheduled notifications
    engine: Arc<DispatchEngine>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(
        config: WorkerConfig,
        store: Arc<dyn NotificationStore>,
        engine: Arc<DispatchEngine>,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            config,
            store,
            engine,
        })
    }

    /// Register all default scheduled tasks
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_retention_purge().await?;
        self.register_scheduled_redelivery().await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Retention purge — nightly by default. Deletes read rows older than
    /// the configured retention window across all tenants.
    async fn register_retention_purge(&self) -> Result<(), AppError> {
        let store = Arc::clone(&self.store);
        let retention_days = self.config.retention_days;
        let job = CronJob::new_async(self.config.purge_cron.as_str(), move |_uuid, _lock| {
            let store = Arc::clone(&store);
            Box::pin(async move {
                tracing::debug!("Running retention purge");
                let cutoff = Utc::now() - Duration::days(i64::from(retention_days));
                match store.purge_read_before(None, cutoff).await {
                    Ok(purged) => {
                        tracing::info!(purged, retention_days, "Retention purge complete");
                    }
                    Err(e) => {
                        tracing::error!("Retention purge failed: {}", e);
                    }
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create retention_purge schedule: {}", e))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add retention_purge schedule: {}", e))
        })?;

        tracing::info!(cron = %self.config.purge_cron, "Registered: retention_purge");
        Ok(())
    }

    /// Scheduled redelivery — every minute by default. Picks up pending
    /// rows whose `scheduled_for` has come due and hands each to the
    /// dispatch engine.
    async fn register_scheduled_redelivery(&self) -> Result<(), AppError> {
        let store = Arc::clone(&self.store);
        let engine = Arc::clone(&self.engine);
        let batch_size = i64::from(self.config.redeliver_batch_size);
        let job = CronJob::new_async(self.config.redeliver_cron.as_str(), move |_uuid, _lock| {
            let store = Arc::clone(&store);
            let engine = Arc::clone(&engine);
            Box::pin(async move {
                tracing::trace!("Scanning for due scheduled notifications");
                let due = match store.due_scheduled(Utc::now(), batch_size).await {
                    Ok(rows) => rows,
                    Err(e) => {
                        tracing::error!("Due-scheduled scan failed: {}", e);
                        return;
                    }
                };
                if due.is_empty() {
                    return;
                }
                tracing::info!(count = due.len(), "Redelivering due scheduled notifications");
                for row in due {
                    if let Err(e) = engine.redeliver(row.business_id, row.id).await {
                        tracing::error!(
                            notification_id = %row.id,
                            "Redelivery failed: {}",
                            e
                        );
                    }
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!(
                "Failed to create scheduled_redelivery schedule: {}",
                e
            ))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add scheduled_redelivery schedule: {}", e))
        })?;

        tracing::info!(cron = %self.config.redeliver_cron, "Registered: scheduled_redelivery");
        Ok(())
    }
}
