//! Notification handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use pulse_core::types::pagination::PageQuery;
use pulse_database::{NotificationFilter, NotificationStore};
use pulse_dispatch::DispatchStatus;

use crate::dto::request::{
    ListNotificationsQuery, NotificationAction, PurgeQuery, SendNotificationRequest,
    UpdateNotificationsRequest,
};
use crate::dto::response::{
    CountResponse, ListNotificationsResponse, PaginationMeta, SendNotificationResponse,
};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /notifications/send
///
/// 200 when every channel succeeded, 207 on a partial failure, 500 when
/// every channel failed. Validation failures are 400 before anything is
/// persisted.
pub async fn send(
    State(state): State<AppState>,
    Json(req): Json<SendNotificationRequest>,
) -> Result<(StatusCode, Json<SendNotificationResponse>), ApiError> {
    let request = req.into_dispatch_request()?;
    let outcome = state.engine.dispatch(request).await?;

    let status = match outcome.status() {
        DispatchStatus::AllSucceeded => StatusCode::OK,
        DispatchStatus::Partial => StatusCode::MULTI_STATUS,
        DispatchStatus::NoneSucceeded => StatusCode::INTERNAL_SERVER_ERROR,
    };
    Ok((status, Json(SendNotificationResponse::from_outcome(outcome))))
}

/// GET /notifications
pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListNotificationsQuery>,
) -> Result<Json<ListNotificationsResponse>, ApiError> {
    let page = PageQuery::coerce(q.limit, q.offset);
    let filter = NotificationFilter {
        unread_only: q.unread_only.unwrap_or(false),
        kind: q.kind,
    };

    let result = state.store.query(q.business_id, &filter, page).await?;
    let pagination = PaginationMeta {
        limit: page.limit,
        offset: page.offset,
        has_more: page.has_more(result.total),
    };
    Ok(Json(ListNotificationsResponse {
        notifications: result.notifications,
        total: result.total,
        unread_count: result.unread_count,
        pagination,
    }))
}

/// PATCH /notifications
pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<UpdateNotificationsRequest>,
) -> Result<Json<CountResponse>, ApiError> {
    let count = match req.action {
        NotificationAction::MarkRead => {
            state.retention.mark_read(req.business_id, &req.ids()).await?
        }
        NotificationAction::MarkAllRead => state.retention.mark_all_read(req.business_id).await?,
        NotificationAction::Dismiss => {
            state.retention.dismiss(req.business_id, &req.ids()).await?
        }
    };
    Ok(Json(CountResponse {
        success: true,
        count,
    }))
}

/// DELETE /notifications
pub async fn purge(
    State(state): State<AppState>,
    Query(q): Query<PurgeQuery>,
) -> Result<Json<CountResponse>, ApiError> {
    let count = state
        .retention
        .purge_old(q.business_id, q.older_than_days)
        .await?;
    Ok(Json(CountResponse {
        success: true,
        count,
    }))
}
