//! PostgreSQL implementation of the notification store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use pulse_core::error::{AppError, ErrorKind};
use pulse_core::result::AppResult;
use pulse_core::types::pagination::PageQuery;
use pulse_entity::{Notification, NotificationStatus};

use crate::store::{InsertOutcome, NotificationFilter, NotificationPage, NotificationStore};

/// Rows the dismissed marker hides from listings.
const NOT_DISMISSED: &str = "(metadata->>'dismissed') IS DISTINCT FROM 'true'";

/// Notification store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    /// Create a new store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Degraded write path: the notifications relation is missing (fresh
    /// deployment, schema not provisioned), so the payload goes into the
    /// generic event log instead of failing the dispatch.
    async fn insert_event_log(&self, notification: &Notification) -> AppResult<()> {
        let payload = serde_json::to_value(notification)?;
        sqlx::query(
            "INSERT INTO event_log (id, business_id, event_type, payload, created_at) \
             VALUES ($1, $2, 'notification', $3, $4)",
        )
        .bind(notification.id)
        .bind(notification.business_id)
        .bind(payload)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to write event log fallback", e)
        })?;
        Ok(())
    }
}

/// Whether the error is PostgreSQL `undefined_table` (SQLSTATE 42P01).
fn is_undefined_table(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("42P01")
    )
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Database unreachable", e)
            })?;
        Ok(())
    }

    async fn insert(&self, notification: &Notification) -> AppResult<InsertOutcome> {
        let result = sqlx::query(
            "INSERT INTO notifications \
             (id, business_id, kind, channel, priority, status, title, message, metadata, \
              scheduled_for, sent_at, read_at, error, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(notification.id)
        .bind(notification.business_id)
        .bind(notification.kind)
        .bind(notification.channel)
        .bind(notification.priority)
        .bind(notification.status)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(&notification.metadata)
        .bind(notification.scheduled_for)
        .bind(notification.sent_at)
        .bind(notification.read_at)
        .bind(&notification.error)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Stored),
            Err(e) if is_undefined_table(&e) => {
                tracing::warn!(
                    notification_id = %notification.id,
                    "notifications table unavailable, degrading to event_log"
                );
                self.insert_event_log(notification).await?;
                Ok(InsertOutcome::LoggedFallback)
            }
            Err(e) => Err(AppError::with_source(
                ErrorKind::Database,
                "Failed to insert notification",
                e,
            )),
        }
    }

    async fn get(&self, business_id: Uuid, id: Uuid) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE business_id = $1 AND id = $2",
        )
        .bind(business_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to get notification", e))
    }

    async fn mark_sent(&self, business_id: Uuid, id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET status = 'sent', sent_at = $3 \
             WHERE business_id = $1 AND id = $2 AND status = 'pending'",
        )
        .bind(business_id)
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark sent", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_failed(&self, business_id: Uuid, id: Uuid, error: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET status = 'failed', error = $3 \
             WHERE business_id = $1 AND id = $2 AND status = 'pending'",
        )
        .bind(business_id)
        .bind(id)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark failed", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn query(
        &self,
        business_id: Uuid,
        filter: &NotificationFilter,
        page: PageQuery,
    ) -> AppResult<NotificationPage> {
        let mut where_clause = format!("business_id = $1 AND {NOT_DISMISSED}");
        if filter.unread_only {
            where_clause.push_str(" AND status IN ('pending', 'sent')");
        }
        if filter.kind.is_some() {
            where_clause.push_str(" AND kind = $2");
        }

        let count_sql = format!("SELECT COUNT(*) FROM notifications WHERE {where_clause}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(business_id);
        if let Some(kind) = filter.kind {
            count_query = count_query.bind(kind);
        }
        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
        })?;

        let (limit_ph, offset_ph) = if filter.kind.is_some() {
            ("$3", "$4")
        } else {
            ("$2", "$3")
        };
        let list_sql = format!(
            "SELECT * FROM notifications WHERE {where_clause} \
             ORDER BY created_at DESC LIMIT {limit_ph} OFFSET {offset_ph}"
        );
        let mut list_query = sqlx::query_as::<_, Notification>(&list_sql).bind(business_id);
        if let Some(kind) = filter.kind {
            list_query = list_query.bind(kind);
        }
        let notifications = list_query
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list notifications", e)
            })?;

        let unread_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications \
             WHERE business_id = $1 AND status IN ('pending', 'sent')",
        )
        .bind(business_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))?;

        Ok(NotificationPage {
            notifications,
            total,
            unread_count,
        })
    }

    async fn mark_read(
        &self,
        business_id: Uuid,
        ids: &[Uuid],
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET status = 'read', read_at = $3 \
             WHERE business_id = $1 AND id = ANY($2) AND status <> 'read'",
        )
        .bind(business_id)
        .bind(ids)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        Ok(result.rows_affected())
    }

    async fn mark_all_read(&self, business_id: Uuid, at: DateTime<Utc>) -> AppResult<u64> {
        // failed rows are left alone here; they must be targeted explicitly.
        let result = sqlx::query(
            "UPDATE notifications SET status = 'read', read_at = $2 \
             WHERE business_id = $1 AND status IN ('pending', 'sent')",
        )
        .bind(business_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    async fn dismiss(&self, business_id: Uuid, ids: &[Uuid], at: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET \
                 status = CASE WHEN status <> 'read' THEN 'read' ELSE status END, \
                 read_at = COALESCE(read_at, $3), \
                 metadata = jsonb_set(metadata, '{dismissed}', 'true'::jsonb) \
             WHERE business_id = $1 AND id = ANY($2)",
        )
        .bind(business_id)
        .bind(ids)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to dismiss notifications", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn purge_read_before(
        &self,
        business_id: Option<Uuid>,
        cutoff: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = match business_id {
            Some(business_id) => {
                sqlx::query(
                    "DELETE FROM notifications \
                     WHERE business_id = $1 AND status = 'read' AND created_at < $2",
                )
                .bind(business_id)
                .bind(cutoff)
                .execute(&self.pool)
                .await
            }
            None => {
                sqlx::query("DELETE FROM notifications WHERE status = 'read' AND created_at < $1")
                    .bind(cutoff)
                    .execute(&self.pool)
                    .await
            }
        }
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to purge notifications", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn due_scheduled(&self, now: DateTime<Utc>, limit: i64) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications \
             WHERE status = $1 AND scheduled_for IS NOT NULL AND scheduled_for <= $2 \
             ORDER BY scheduled_for ASC LIMIT $3",
        )
        .bind(NotificationStatus::Pending)
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to scan due notifications", e)
        })
    }
}
