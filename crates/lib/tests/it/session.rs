//! Login lifecycle: code requests, verification, restore, expiry, logout.

use std::time::Duration;

use cardfolio::remote::{GatewayError, VerifyGrant};
use cardfolio::session::AuthError;
use cardfolio::store::{SESSION_KEY, StateStore};
use cardfolio::{Error, ProfileDraft};

use crate::helpers::{login, reopen, test_context};

#[tokio::test]
async fn malformed_email_never_reaches_network() {
    let ctx = test_context();
    for email in ["", "not-an-email", "two@@example.com", "a b@example.com"] {
        let err = ctx.client.request_code(email).await.unwrap_err();
        assert!(
            matches!(err, Error::Auth(AuthError::InvalidEmail { .. })),
            "expected InvalidEmail for {email:?}"
        );
        assert!(err.is_validation_error());
    }
    assert_eq!(ctx.gateway.call_count("request_code"), 0);
}

#[tokio::test]
async fn duplicate_request_inside_cooldown_is_rejected_client_side() {
    let ctx = test_context();
    ctx.client.request_code("user@example.com").await.unwrap();

    let err = ctx
        .client
        .request_code("user@example.com")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Auth(AuthError::ResendCooldown { remaining_secs }) if remaining_secs > 0
    ));
    // The rejection happened before the network: exactly one call went out.
    assert_eq!(ctx.gateway.call_count("request_code"), 1);
    assert!(ctx.client.resend_remaining().await.is_some());

    // Once the cooldown elapses, resend goes through.
    ctx.clock.advance(Duration::from_secs(61));
    assert!(ctx.client.resend_remaining().await.is_none());
    ctx.client.request_code("user@example.com").await.unwrap();
    assert_eq!(ctx.gateway.call_count("request_code"), 2);
}

#[tokio::test]
async fn different_address_replaces_the_challenge() {
    let ctx = test_context();
    ctx.client.request_code("first@example.com").await.unwrap();
    // Switching addresses is a fresh login attempt, not a resend.
    ctx.client.request_code("second@example.com").await.unwrap();
    assert_eq!(ctx.gateway.call_count("request_code"), 2);
}

#[tokio::test]
async fn malformed_code_never_reaches_network() {
    let ctx = test_context();
    ctx.client.request_code("user@example.com").await.unwrap();

    for code in ["", "12345", "1234567", "12a456", "abcdef"] {
        let err = ctx.client.verify_code(code).await.unwrap_err();
        assert!(
            matches!(err, Error::Auth(AuthError::InvalidCodeFormat)),
            "expected InvalidCodeFormat for {code:?}"
        );
    }
    assert_eq!(ctx.gateway.call_count("verify_code"), 0);
}

#[tokio::test]
async fn verify_issues_session_and_adopts_bundled_profile() {
    let ctx = test_context();
    ctx.gateway.push_verify(Ok(VerifyGrant {
        token: "abc".to_string(),
        profile: Some(ProfileDraft {
            name: "Jane".to_string(),
            ..ProfileDraft::default()
        }),
    }));

    ctx.client.request_code("user@example.com").await.unwrap();
    let session = ctx.client.verify_code("123456").await.unwrap();

    assert_eq!(session.email, "user@example.com");
    assert_eq!(session.token, "abc");
    assert_eq!(ctx.client.draft().await.unwrap().name, "Jane");
    // The challenge was consumed with the grant.
    assert!(ctx.client.resend_remaining().await.is_none());
}

#[tokio::test]
async fn restore_replays_session_until_ttl_elapses() {
    let ctx = test_context();
    let session = login(&ctx).await;

    // Fresh start over the same store: login screen is skipped.
    let second = reopen(&ctx);
    assert_eq!(second.client.session().await, Some(session));

    // Past the TTL the record is cleared and nothing is restored.
    ctx.clock.advance(Duration::from_secs(24 * 60 * 60 + 1));
    let third = reopen(&ctx);
    assert_eq!(third.client.session().await, None);
    assert_eq!(ctx.store.get(SESSION_KEY).unwrap(), None);
}

#[tokio::test]
async fn reload_mid_login_lands_back_on_the_code_prompt() {
    let ctx = test_context();
    ctx.client.request_code("user@example.com").await.unwrap();

    // The challenge survives a restart, so the cooldown still applies.
    let second = reopen(&ctx);
    let err = second
        .client
        .request_code("user@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::ResendCooldown { .. })));

    // And the code can be verified without re-requesting.
    second.client.verify_code("123456").await.unwrap();
}

#[tokio::test]
async fn expired_challenge_is_discarded_before_the_network() {
    let ctx = test_context();
    ctx.client.request_code("user@example.com").await.unwrap();
    ctx.clock.advance(Duration::from_secs(10 * 60 + 1));

    let err = ctx.client.verify_code("123456").await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::CodeExpired)));
    assert_eq!(ctx.gateway.call_count("verify_code"), 0);

    // The challenge is gone; another attempt needs a fresh request.
    let err = ctx.client.verify_code("123456").await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::CodeNotRequested)));
}

#[tokio::test]
async fn backend_reported_expiry_also_discards_the_challenge() {
    let ctx = test_context();
    ctx.client.request_code("user@example.com").await.unwrap();
    ctx.gateway.push_verify(Err(GatewayError::Rejected {
        message: "OTP expired".to_string(),
    }));

    let err = ctx.client.verify_code("123456").await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::CodeExpired)));

    let err = ctx.client.verify_code("123456").await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::CodeNotRequested)));
}

#[tokio::test]
async fn rejected_code_keeps_the_challenge_open() {
    let ctx = test_context();
    ctx.client.request_code("user@example.com").await.unwrap();
    ctx.gateway.push_verify(Err(GatewayError::Rejected {
        message: "Invalid OTP".to_string(),
    }));

    let err = ctx.client.verify_code("000000").await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::CodeRejected)));

    // Retyping works without a new request.
    ctx.client.verify_code("123456").await.unwrap();
    assert!(ctx.client.session().await.is_some());
}

#[tokio::test]
async fn network_failure_on_request_leaves_state_untouched() {
    let ctx = test_context();
    ctx.gateway.push_request(Err(GatewayError::Timeout { timeout_secs: 10 }));

    let err = ctx
        .client
        .request_code("user@example.com")
        .await
        .unwrap_err();
    assert!(err.is_network_error());
    // No challenge was created, so there is no cooldown to wait out.
    ctx.client.request_code("user@example.com").await.unwrap();
}

#[tokio::test]
async fn cancel_login_clears_the_challenge() {
    let ctx = test_context();
    ctx.client.request_code("user@example.com").await.unwrap();
    ctx.client.cancel_login().await.unwrap();

    let err = ctx.client.verify_code("123456").await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::CodeNotRequested)));
    // Back on the email form, a new request is allowed immediately.
    ctx.client.request_code("user@example.com").await.unwrap();
}

#[tokio::test]
async fn request_while_logged_in_is_refused() {
    let ctx = test_context();
    login(&ctx).await;
    let err = ctx
        .client
        .request_code("other@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::AlreadyLoggedIn)));
}

#[tokio::test]
async fn logout_is_idempotent_and_discards_the_draft() {
    let ctx = test_context();
    login(&ctx).await;
    assert!(ctx.client.draft().await.is_some());

    ctx.client.logout().await.unwrap();
    assert_eq!(ctx.client.session().await, None);
    assert!(ctx.client.draft().await.is_none());
    assert_eq!(ctx.store.get(SESSION_KEY).unwrap(), None);

    // Logging out again is safe.
    ctx.client.logout().await.unwrap();
}
