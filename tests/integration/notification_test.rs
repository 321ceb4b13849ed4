//! Integration tests for the notification endpoints.

use http::StatusCode;
use uuid::Uuid;

use chrono::{Duration, Utc};
use pulse_database::NotificationStore;
use pulse_entity::{Channel, Notification, NotificationStatus, NotificationType, Priority};

use crate::helpers::TestApp;

fn send_body(business_id: Uuid, channels: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "businessId": business_id,
        "type": "new_lead",
        "title": "New lead",
        "message": "Jordan asked for a quote",
        "channels": channels,
    })
}

#[tokio::test]
async fn test_send_fans_out_one_row_per_channel() {
    let app = TestApp::new();
    let business_id = Uuid::new_v4();

    let response = app
        .request(
            "POST",
            "/notifications/send",
            Some(send_body(business_id, &["in_app", "push"])),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["results"].as_array().unwrap().len(), 2);

    let rows = app.store.snapshot();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|n| n.status == NotificationStatus::Sent));
}

#[tokio::test]
async fn test_send_sms_without_phone_is_partial() {
    let app = TestApp::new();
    let business_id = Uuid::new_v4();

    let response = app
        .request(
            "POST",
            "/notifications/send",
            Some(send_body(business_id, &["sms", "in_app"])),
        )
        .await;

    assert_eq!(response.status, StatusCode::MULTI_STATUS);
    assert_eq!(response.body["success"], false);

    let results = response.body["results"].as_array().unwrap();
    assert_eq!(results[0]["channel"], "sms");
    assert_eq!(results[0]["success"], false);
    assert_eq!(results[0]["error"], "No phone number on file");
    assert_eq!(results[1]["channel"], "in_app");
    assert_eq!(results[1]["success"], true);

    let rows = app.store.snapshot();
    let sms = rows.iter().find(|n| n.channel == Channel::Sms).unwrap();
    assert_eq!(sms.status, NotificationStatus::Failed);
    let in_app = rows.iter().find(|n| n.channel == Channel::InApp).unwrap();
    assert_eq!(in_app.status, NotificationStatus::Sent);
}

#[tokio::test]
async fn test_send_email_only_is_a_500() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/notifications/send",
            Some(send_body(Uuid::new_v4(), &["email"])),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["results"][0]["error"], "Email channel not implemented");
}

#[tokio::test]
async fn test_send_without_title_is_a_400() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/notifications/send",
            Some(serde_json::json!({
                "businessId": Uuid::new_v4(),
                "type": "system_alert",
                "message": "no title here",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.store.snapshot().is_empty());
}

#[tokio::test]
async fn test_list_truncates_fractional_limit() {
    let app = TestApp::new();
    let business_id = Uuid::new_v4();

    for _ in 0..7 {
        let response = app
            .request(
                "POST",
                "/notifications/send",
                Some(send_body(business_id, &["in_app"])),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = app
        .request(
            "GET",
            &format!("/notifications?businessId={}&limit=5.7", business_id),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["notifications"].as_array().unwrap().len(), 5);
    assert_eq!(response.body["total"], 7);
    assert_eq!(response.body["pagination"]["limit"], 5);
    assert_eq!(response.body["pagination"]["offset"], 0);
    assert_eq!(response.body["pagination"]["hasMore"], true);
}

#[tokio::test]
async fn test_list_is_tenant_scoped() {
    let app = TestApp::new();
    let mine = Uuid::new_v4();
    let theirs = Uuid::new_v4();

    app.request("POST", "/notifications/send", Some(send_body(mine, &["in_app"])))
        .await;
    app.request("POST", "/notifications/send", Some(send_body(theirs, &["in_app"])))
        .await;

    let response = app
        .request("GET", &format!("/notifications?businessId={}", mine), None)
        .await;

    assert_eq!(response.body["total"], 1);
    let listed = &response.body["notifications"][0];
    assert_eq!(listed["type"], "new_lead");
    assert!(listed.get("kind").is_none());
}

#[tokio::test]
async fn test_mark_read_is_idempotent() {
    let app = TestApp::new();
    let business_id = Uuid::new_v4();

    let sent = app
        .request(
            "POST",
            "/notifications/send",
            Some(send_body(business_id, &["in_app"])),
        )
        .await;
    let id = sent.body["results"][0]["notification_id"].as_str().unwrap().to_string();

    let body = serde_json::json!({
        "businessId": business_id,
        "action": "mark_read",
        "notificationId": id,
    });

    let first = app.request("PATCH", "/notifications", Some(body.clone())).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["count"], 1);

    let second = app.request("PATCH", "/notifications", Some(body)).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["count"], 0);
}

#[tokio::test]
async fn test_mark_read_without_ids_is_a_400() {
    let app = TestApp::new();

    let response = app
        .request(
            "PATCH",
            "/notifications",
            Some(serde_json::json!({
                "businessId": Uuid::new_v4(),
                "action": "mark_read",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mark_all_read_skips_failed_and_is_a_noop_second_time() {
    let app = TestApp::new();
    let business_id = Uuid::new_v4();

    // one sent row, one failed sms row
    app.request(
        "POST",
        "/notifications/send",
        Some(send_body(business_id, &["in_app", "sms"])),
    )
    .await;

    let body = serde_json::json!({
        "businessId": business_id,
        "action": "mark_all_read",
    });

    let first = app.request("PATCH", "/notifications", Some(body.clone())).await;
    assert_eq!(first.body["count"], 1);

    let second = app.request("PATCH", "/notifications", Some(body)).await;
    assert_eq!(second.body["count"], 0);

    let rows = app.store.snapshot();
    let sms = rows.iter().find(|n| n.channel == Channel::Sms).unwrap();
    assert_eq!(sms.status, NotificationStatus::Failed);
}

#[tokio::test]
async fn test_dismiss_hides_the_row_from_listing() {
    let app = TestApp::new();
    let business_id = Uuid::new_v4();

    let sent = app
        .request(
            "POST",
            "/notifications/send",
            Some(send_body(business_id, &["in_app"])),
        )
        .await;
    let id = sent.body["results"][0]["notification_id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "PATCH",
            "/notifications",
            Some(serde_json::json!({
                "businessId": business_id,
                "action": "dismiss",
                "notificationIds": [id],
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let listed = app
        .request("GET", &format!("/notifications?businessId={}", business_id), None)
        .await;
    assert_eq!(listed.body["total"], 0);
}

#[tokio::test]
async fn test_purge_deletes_only_old_read_rows() {
    let app = TestApp::new();
    let business_id = Uuid::new_v4();

    let mut old_read = Notification::pending(
        business_id,
        NotificationType::DailyBriefing,
        Channel::InApp,
        Priority::Low,
        "Old",
        "Long resolved",
        serde_json::json!({}),
        None,
    );
    old_read.created_at = Utc::now() - Duration::days(45);
    app.store.insert(&old_read).await.unwrap();
    app.store
        .mark_read(business_id, &[old_read.id], Utc::now())
        .await
        .unwrap();

    let mut old_unread = Notification::pending(
        business_id,
        NotificationType::SystemAlert,
        Channel::InApp,
        Priority::High,
        "Still open",
        "Never acknowledged",
        serde_json::json!({}),
        None,
    );
    old_unread.created_at = Utc::now() - Duration::days(45);
    app.store.insert(&old_unread).await.unwrap();

    let response = app
        .request(
            "DELETE",
            &format!("/notifications?businessId={}", business_id),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["count"], 1);
    assert!(app.store.get(business_id, old_unread.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.request("GET", "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_health_is_503_when_storage_unreachable() {
    let app = TestApp::new();
    app.store.set_offline(true);

    let response = app.request("GET", "/health", None).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body["error"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_send_with_unknown_type_is_a_400() {
    let app = TestApp::new();

    let mut body = send_body(Uuid::new_v4(), &["in_app"]);
    body["type"] = serde_json::json!("carrier_pigeon");
    let response = app.request("POST", "/notifications/send", Some(body)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert!(app.store.snapshot().is_empty());
}
