use carelock::modules::two_factor::model::CodeChannel;

use crate::common::{test_user, TestContext};

#[tokio::test]
async fn send_dispatches_a_six_digit_code_that_verifies() {
    let ctx = TestContext::new().await;
    let issuer = ctx.issuer();
    let user = test_user();

    issuer
        .send_code(&user, CodeChannel::Email, "pat@example.com")
        .await
        .unwrap();

    let code = ctx.delivery.last_code().await.unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));

    issuer
        .verify_code(&user, &code, CodeChannel::Email)
        .await
        .unwrap();
}

#[tokio::test]
async fn resend_issues_a_fresh_code_and_retires_the_old_one() {
    let ctx = TestContext::new().await;
    let issuer = ctx.issuer();
    let user = test_user();

    issuer
        .send_code(&user, CodeChannel::Sms, "+15550100")
        .await
        .unwrap();
    let first = ctx.delivery.last_code().await.unwrap();

    issuer
        .resend_code(&user, CodeChannel::Sms, "+15550100")
        .await
        .unwrap();
    let second = ctx.delivery.last_code().await.unwrap();

    assert_eq!(ctx.delivery.sent_count().await, 2);

    // Only the most recent code is live. (Skip the equality assertions in
    // the one-in-a-million case of a duplicate draw.)
    if first != second {
        assert!(issuer
            .verify_code(&user, &first, CodeChannel::Sms)
            .await
            .is_err());
    }
    issuer
        .verify_code(&user, &second, CodeChannel::Sms)
        .await
        .unwrap();
}

#[tokio::test]
async fn channels_are_independent() {
    let ctx = TestContext::new().await;
    let issuer = ctx.issuer();
    let user = test_user();

    issuer
        .send_code(&user, CodeChannel::Email, "pat@example.com")
        .await
        .unwrap();
    let email_code = ctx.delivery.last_code().await.unwrap();

    issuer
        .send_code(&user, CodeChannel::Sms, "+15550100")
        .await
        .unwrap();

    // The SMS send does not retire the pending email code.
    issuer
        .verify_code(&user, &email_code, CodeChannel::Email)
        .await
        .unwrap();
}
