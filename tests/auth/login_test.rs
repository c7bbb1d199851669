use carelock::modules::auth::schema::AuthError;
use carelock::modules::auth::{AuthController, LoginOutcome};
use carelock::modules::device::model::DeviceRecord;
use carelock::modules::device::DeviceRegistry;
use carelock::services::fingerprint::token_fingerprint;
use chrono::Utc;

use crate::common::{test_session, test_user, TestContext};

#[tokio::test]
async fn unverified_kyc_short_circuits_before_any_device_work() {
    let ctx = TestContext::new().await;
    ctx.kyc.set_verified(false);
    let controller = ctx.controller();

    let outcome = controller
        .on_login_success(&test_session(&test_user()))
        .await
        .unwrap();

    assert_eq!(outcome, LoginOutcome::KycRequired);
    assert_eq!(ctx.biometric.prompt_count(), 0);
    assert!(ctx.credentials.device_id().await.unwrap().is_none());
}

#[tokio::test]
async fn first_login_enrolls_and_persists_fingerprint() {
    let ctx = TestContext::new().await;
    let controller = ctx.controller();
    let user = test_user();
    let session = test_session(&user);

    let outcome = controller.on_login_success(&session).await.unwrap();
    assert_eq!(
        outcome,
        LoginOutcome::Success {
            biometric_enrolled: true
        }
    );

    let device_id = ctx.credentials.device_id().await.unwrap().unwrap();
    assert_eq!(
        ctx.credentials.access_token().await.unwrap().as_deref(),
        Some(session.access_token.as_str())
    );
    assert!(ctx.credentials.biometric_enabled().await.unwrap());

    let record = ctx
        .registry
        .find_device(&user, &device_id)
        .await
        .unwrap()
        .unwrap();
    assert!(record.biometric_enabled);
    assert!(record.trusted);
    assert_eq!(
        record.token_fingerprint.as_deref(),
        Some(token_fingerprint(&session.access_token, &device_id).as_str())
    );
}

#[tokio::test]
async fn declined_prompt_leaves_no_state_behind() {
    let ctx = TestContext::new().await;
    ctx.biometric.set_outcome(Ok(false)).await;
    let controller = ctx.controller();
    let user = test_user();

    let outcome = controller
        .on_login_success(&test_session(&user))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        LoginOutcome::Success {
            biometric_enrolled: false
        }
    );
    assert!(ctx.credentials.access_token().await.unwrap().is_none());
    assert!(!ctx.credentials.biometric_enabled().await.unwrap());

    let device_id = ctx.credentials.device_id().await.unwrap().unwrap();
    assert!(ctx
        .registry
        .find_device(&user, &device_id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn unsupported_hardware_soft_skips_in_the_login_path() {
    let ctx = TestContext::new().await;
    ctx.biometric.set_supported(false);
    let controller = ctx.controller();
    let user = test_user();

    let outcome = controller
        .on_login_success(&test_session(&user))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        LoginOutcome::Success {
            biometric_enrolled: false
        }
    );
    assert_eq!(ctx.biometric.prompt_count(), 0);
    assert!(ctx.credentials.access_token().await.unwrap().is_none());
}

#[tokio::test]
async fn trusted_device_skips_enrollment_on_later_logins() {
    let ctx = TestContext::new().await;
    let controller = ctx.controller();
    let user = test_user();
    let session = test_session(&user);

    controller.on_login_success(&session).await.unwrap();
    assert_eq!(ctx.biometric.prompt_count(), 1);

    let outcome = controller.on_login_success(&session).await.unwrap();
    assert_eq!(
        outcome,
        LoginOutcome::Success {
            biometric_enrolled: true
        }
    );
    // No second prompt: the device record already shows biometric enabled.
    assert_eq!(ctx.biometric.prompt_count(), 1);

    // The fingerprint from enrollment survives the fast-path upsert.
    let device_id = ctx.credentials.device_id().await.unwrap().unwrap();
    let record = ctx
        .registry
        .find_device(&user, &device_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        record.token_fingerprint.as_deref(),
        Some(token_fingerprint(&session.access_token, &device_id).as_str())
    );
}

#[tokio::test]
async fn login_on_revoked_device_is_fatal_and_wipes_the_session() {
    let ctx = TestContext::new().await;
    let controller = ctx.controller();
    let user = test_user();
    let session = test_session(&user);

    controller.on_login_success(&session).await.unwrap();
    let device_id = ctx.credentials.device_id().await.unwrap().unwrap();
    ctx.registry.revoke_device(&user, &device_id).await.unwrap();

    let err = controller.on_login_success(&session).await.unwrap_err();
    assert!(matches!(err, AuthError::DeviceRevoked));
    assert!(ctx.credentials.access_token().await.unwrap().is_none());
    // The device id itself survives the wipe.
    assert_eq!(
        ctx.credentials.device_id().await.unwrap().as_deref(),
        Some(device_id.as_str())
    );
}

#[test]
fn needs_biometric_setup_truth_table() {
    assert!(AuthController::needs_biometric_setup(None));

    let mut record = DeviceRecord {
        user_id: "u".to_string(),
        device_id: "d".to_string(),
        device_name: None,
        platform: None,
        device_model: None,
        os_version: None,
        biometric_enabled: true,
        trusted: true,
        revoked: false,
        revoked_at: None,
        token_fingerprint: None,
        registered_at: Utc::now(),
        last_used_at: None,
    };
    assert!(!AuthController::needs_biometric_setup(Some(&record)));

    record.biometric_enabled = false;
    assert!(AuthController::needs_biometric_setup(Some(&record)));
}
