//! The notification store interface.
//!
//! The dispatch engine, retention manager, and bell poller are all written
//! against this trait so the PostgreSQL implementation can be swapped for
//! the in-memory one in tests and single-process development.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pulse_core::result::AppResult;
use pulse_core::types::pagination::PageQuery;
use pulse_entity::{Notification, NotificationType};

/// Where an insert actually landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row went into the notifications table.
    Stored,
    /// The notifications relation was unavailable; the payload was written
    /// to the generic event log instead. The request still succeeds.
    LoggedFallback,
}

/// Filter for scoped notification queries.
#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    /// Only rows with `status ∈ {pending, sent}`.
    pub unread_only: bool,
    /// Restrict to a single event type.
    pub kind: Option<NotificationType>,
}

/// One page of notifications plus tenant-wide counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPage {
    /// The page of rows, newest first.
    pub notifications: Vec<Notification>,
    /// Total rows matching the filter (ignoring the page window).
    pub total: i64,
    /// Tenant-wide count of rows with `status ∈ {pending, sent}`.
    pub unread_count: i64,
}

/// CRUD + filtered query + bulk update against persisted notification rows.
///
/// Every operation is scoped by `business_id`; implementations must never
/// let one tenant's call touch another tenant's rows. Status updates
/// enforce the legal-transition table by predicate, so a lost race shows up
/// as zero affected rows rather than a regressed status.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Cheap reachability probe for the health endpoint.
    async fn ping(&self) -> AppResult<()>;

    /// Persist a fresh `pending` row.
    async fn insert(&self, notification: &Notification) -> AppResult<InsertOutcome>;

    /// Fetch a single row by id within the tenant scope.
    async fn get(&self, business_id: Uuid, id: Uuid) -> AppResult<Option<Notification>>;

    /// `pending → sent`, stamping `sent_at`. Returns `false` if the row was
    /// not in `pending` (already transitioned or missing).
    async fn mark_sent(&self, business_id: Uuid, id: Uuid, at: DateTime<Utc>) -> AppResult<bool>;

    /// `pending → failed`, recording the sender error. Returns `false` if
    /// the row was not in `pending`.
    async fn mark_failed(&self, business_id: Uuid, id: Uuid, error: &str) -> AppResult<bool>;

    /// Page through a tenant's rows (dismissed rows excluded), newest
    /// first, with total and unread counters.
    async fn query(
        &self,
        business_id: Uuid,
        filter: &NotificationFilter,
        page: PageQuery,
    ) -> AppResult<NotificationPage>;

    /// Transition the given rows to `read` where currently in
    /// `{pending, sent, failed}`. Idempotent: already-read rows are left
    /// untouched and do not error. Returns the number of rows changed.
    async fn mark_read(&self, business_id: Uuid, ids: &[Uuid], at: DateTime<Utc>) -> AppResult<u64>;

    /// Transition every row in `{pending, sent}` to `read`. Rows already
    /// `failed` are deliberately left alone unless explicitly targeted.
    async fn mark_all_read(&self, business_id: Uuid, at: DateTime<Utc>) -> AppResult<u64>;

    /// `mark_read` plus the `metadata.dismissed = true` soft-delete marker.
    /// The marker is applied even to rows that were already `read`.
    async fn dismiss(&self, business_id: Uuid, ids: &[Uuid], at: DateTime<Utc>) -> AppResult<u64>;

    /// Hard-delete rows with `status = read` created before `cutoff`.
    /// Non-read rows are never deleted regardless of age. A `None` tenant
    /// scope purges across all tenants (worker maintenance path).
    async fn purge_read_before(
        &self,
        business_id: Option<Uuid>,
        cutoff: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Rows still `pending` whose `scheduled_for` has come due, oldest
    /// first, across tenants. Feed for the redelivery scan.
    async fn due_scheduled(&self, now: DateTime<Utc>, limit: i64) -> AppResult<Vec<Notification>>;
}
