use carelock::modules::device::DeviceRegistry;

use crate::common::{test_session, test_user, TestContext};

// `is_biometric_already_enabled` is the single predicate the UI defers to;
// every gap in the chain must read as false, never as an error.

#[tokio::test]
async fn false_without_a_local_device_id() {
    let ctx = TestContext::new().await;
    assert!(!ctx.controller().is_biometric_already_enabled(&test_user()).await);
}

#[tokio::test]
async fn false_with_device_id_but_no_access_token() {
    let ctx = TestContext::new().await;
    ctx.credentials.get_or_create_device_id().await.unwrap();
    assert!(!ctx.controller().is_biometric_already_enabled(&test_user()).await);
}

#[tokio::test]
async fn false_without_a_remote_record() {
    let ctx = TestContext::new().await;
    let user = test_user();
    ctx.credentials.get_or_create_device_id().await.unwrap();
    ctx.credentials
        .set_session(&user, "access", "refresh")
        .await
        .unwrap();
    assert!(!ctx.controller().is_biometric_already_enabled(&user).await);
}

#[tokio::test]
async fn true_after_a_completed_enrollment() {
    let ctx = TestContext::new().await;
    let user = test_user();
    ctx.controller()
        .on_login_success(&test_session(&user))
        .await
        .unwrap();
    assert!(ctx.controller().is_biometric_already_enabled(&user).await);
}

#[tokio::test]
async fn false_once_the_device_is_revoked() {
    let ctx = TestContext::new().await;
    let user = test_user();
    let controller = ctx.controller();
    controller.on_login_success(&test_session(&user)).await.unwrap();

    let device_id = ctx.credentials.device_id().await.unwrap().unwrap();
    ctx.registry.revoke_device(&user, &device_id).await.unwrap();

    assert!(!controller.is_biometric_already_enabled(&user).await);
}

#[tokio::test]
async fn false_when_the_remote_flag_is_off() {
    let ctx = TestContext::new().await;
    let user = test_user();
    let controller = ctx.controller();
    controller.on_login_success(&test_session(&user)).await.unwrap();

    let device_id = ctx.credentials.device_id().await.unwrap().unwrap();
    ctx.registry
        .update_biometric_status(&user, &device_id, false)
        .await
        .unwrap();

    assert!(!controller.is_biometric_already_enabled(&user).await);
}
