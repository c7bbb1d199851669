use carelock::services::credential_store::SecureStorage;
use chrono::{Duration, Utc};

use crate::common::TestContext;

#[tokio::test]
async fn device_id_is_created_once_and_survives_a_wipe() {
    let ctx = TestContext::new().await;

    let first = ctx.credentials.get_or_create_device_id().await.unwrap();
    let second = ctx.credentials.get_or_create_device_id().await.unwrap();
    assert_eq!(first, second);

    ctx.credentials.clear_session().await.unwrap();
    assert_eq!(
        ctx.credentials.device_id().await.unwrap().as_deref(),
        Some(first.as_str())
    );
}

#[tokio::test]
async fn clear_session_wipes_everything_else() {
    let ctx = TestContext::new().await;

    ctx.credentials.get_or_create_device_id().await.unwrap();
    ctx.credentials
        .set_session("u1", "access", "refresh")
        .await
        .unwrap();
    ctx.credentials.set_biometric_enabled(true).await.unwrap();

    ctx.credentials.clear_session().await.unwrap();

    assert!(ctx.credentials.user_id().await.unwrap().is_none());
    assert!(ctx.credentials.access_token().await.unwrap().is_none());
    assert!(ctx.credentials.refresh_token().await.unwrap().is_none());
    assert!(!ctx.credentials.biometric_enabled().await.unwrap());
    assert!(ctx.credentials.last_activity().await.unwrap().is_none());
}

#[tokio::test]
async fn no_activity_marker_counts_as_timed_out() {
    let ctx = TestContext::new().await;
    assert!(ctx.credentials.has_session_timed_out().await.unwrap());
}

#[tokio::test]
async fn recent_activity_is_within_the_window() {
    let ctx = TestContext::new().await;
    ctx.credentials.touch_last_activity().await.unwrap();
    assert!(!ctx.credentials.has_session_timed_out().await.unwrap());
}

#[tokio::test]
async fn activity_older_than_fifteen_minutes_times_out() {
    let ctx = TestContext::new().await;

    let stale = (Utc::now() - Duration::minutes(16)).to_rfc3339();
    ctx.storage.set("last_activity", &stale).await.unwrap();
    assert!(ctx.credentials.has_session_timed_out().await.unwrap());

    let fresh = (Utc::now() - Duration::minutes(14)).to_rfc3339();
    ctx.storage.set("last_activity", &fresh).await.unwrap();
    assert!(!ctx.credentials.has_session_timed_out().await.unwrap());
}
