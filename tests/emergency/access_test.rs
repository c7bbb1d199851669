use carelock::modules::audit::AuditCrud;
use carelock::modules::emergency::model::RequesterRole;
use carelock::modules::emergency::EmergencyAccessError;

use crate::common::{test_user, TestContext};

#[tokio::test]
async fn only_doctors_and_first_responders_may_break_the_glass() {
    let ctx = TestContext::new().await;
    let manager = ctx.emergency();
    let patient = test_user();

    for role in [RequesterRole::Patient, RequesterRole::Pharmacist] {
        let err = manager
            .request_access(&test_user(), role, &patient, "curiosity", None)
            .await
            .unwrap_err();
        assert!(matches!(err, EmergencyAccessError::RoleNotPermitted));
    }

    for role in [RequesterRole::Doctor, RequesterRole::FirstResponder] {
        manager
            .request_access(&test_user(), role, &patient, "cardiac arrest on scene", None)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn biometric_is_mandatory_for_break_glass() {
    let ctx = TestContext::new().await;
    let manager = ctx.emergency();

    ctx.biometric.set_available(false);
    let err = manager
        .request_access(&test_user(), RequesterRole::Doctor, &test_user(), "er", None)
        .await
        .unwrap_err();
    assert!(matches!(err, EmergencyAccessError::BiometricUnavailable));

    ctx.biometric.set_available(true);
    ctx.biometric.set_outcome(Ok(false)).await;
    let err = manager
        .request_access(&test_user(), RequesterRole::Doctor, &test_user(), "er", None)
        .await
        .unwrap_err();
    assert!(matches!(err, EmergencyAccessError::BiometricFailed));
}

#[tokio::test]
async fn a_fresh_grant_is_active_and_audited() {
    let ctx = TestContext::new().await;
    let manager = ctx.emergency();
    let doctor = test_user();
    let patient = test_user();

    let grant_id = manager
        .request_access(
            &doctor,
            RequesterRole::Doctor,
            &patient,
            "unconscious, unknown allergies",
            Some("brought in by ambulance"),
        )
        .await
        .unwrap();

    assert!(manager.has_active_access(&doctor, &patient).await.unwrap());

    let grant = manager.find_grant(&grant_id).await.unwrap().unwrap();
    assert_eq!(grant.status, "active");
    assert!(grant.biometric_verified);
    assert_eq!(grant.requester_role, "doctor");

    let entries = AuditCrud::new(ctx.db.clone())
        .recent_for_user(&doctor, 10)
        .await
        .unwrap();
    assert!(entries
        .iter()
        .any(|e| e.action == "emergency_access_granted"));
}

#[tokio::test]
async fn no_grant_means_no_access() {
    let ctx = TestContext::new().await;
    let manager = ctx.emergency();
    assert!(!manager
        .has_active_access(&test_user(), &test_user())
        .await
        .unwrap());
}

#[tokio::test]
async fn revoke_is_terminal() {
    let ctx = TestContext::new().await;
    let manager = ctx.emergency();
    let doctor = test_user();
    let patient = test_user();

    let grant_id = manager
        .request_access(&doctor, RequesterRole::Doctor, &patient, "er", None)
        .await
        .unwrap();

    manager.revoke_access(&grant_id).await.unwrap();

    let grant = manager.find_grant(&grant_id).await.unwrap().unwrap();
    assert_eq!(grant.status, "revoked");
    assert!(grant.revoked_at.is_some());
    assert!(!manager.has_active_access(&doctor, &patient).await.unwrap());

    // Already terminal: a second revoke finds no active grant to flip.
    let err = manager.revoke_access(&grant_id).await.unwrap_err();
    assert!(matches!(err, EmergencyAccessError::GrantNotFound));
}
