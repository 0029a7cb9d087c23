//! The debounce engine, exercised under paused tokio time.
//!
//! `Settings::default()` uses an 8s quiet period; these tests sleep past
//! or short of that boundary and watch what reached the mock gateway.

use std::time::Duration;

use cardfolio::remote::GatewayError;
use tokio::time::sleep;

use crate::helpers::{login, test_context};

#[tokio::test(start_paused = true)]
async fn quiet_period_elapses_and_the_draft_saves_itself() {
    let ctx = test_context();
    login(&ctx).await;
    ctx.client.start_autosave().await;

    ctx.client.set_name("Jane Q. Public").await.unwrap();
    assert!(ctx.client.is_dirty().await);

    sleep(Duration::from_secs(9)).await;

    assert_eq!(ctx.gateway.call_count("update_profile"), 1);
    assert!(!ctx.client.is_dirty().await);
    assert_eq!(
        ctx.gateway.recorded_updates().last().unwrap().name,
        "Jane Q. Public"
    );

    ctx.client.stop_autosave().await;
}

#[tokio::test(start_paused = true)]
async fn every_edit_restarts_the_quiet_period() {
    let ctx = test_context();
    login(&ctx).await;
    ctx.client.start_autosave().await;

    ctx.client.set_name("Jane Q. Public").await.unwrap();
    sleep(Duration::from_secs(5)).await;
    ctx.client.set_tagline("still typing").await.unwrap();

    // 10s after the first edit but only 5s after the second: nothing yet.
    sleep(Duration::from_secs(5)).await;
    assert_eq!(ctx.gateway.call_count("update_profile"), 0);

    // 8s after the second edit the save fires once, with both edits.
    sleep(Duration::from_secs(4)).await;
    assert_eq!(ctx.gateway.call_count("update_profile"), 1);
    let sent = ctx.gateway.recorded_updates();
    assert_eq!(sent.last().unwrap().name, "Jane Q. Public");
    assert_eq!(sent.last().unwrap().tagline, "still typing");

    ctx.client.stop_autosave().await;
}

#[tokio::test(start_paused = true)]
async fn manual_save_makes_the_pending_fire_a_noop() {
    let ctx = test_context();
    login(&ctx).await;
    ctx.client.start_autosave().await;

    ctx.client.set_name("Jane Q. Public").await.unwrap();
    ctx.client.save().await.unwrap();

    // The debounce deadline still fires, finds the draft clean, and sends
    // nothing.
    sleep(Duration::from_secs(9)).await;
    assert_eq!(ctx.gateway.call_count("update_profile"), 1);

    ctx.client.stop_autosave().await;
}

#[tokio::test(start_paused = true)]
async fn stopping_the_engine_cancels_the_pending_save() {
    let ctx = test_context();
    login(&ctx).await;
    ctx.client.start_autosave().await;

    ctx.client.set_name("Jane Q. Public").await.unwrap();
    ctx.client.stop_autosave().await;

    sleep(Duration::from_secs(30)).await;
    assert_eq!(ctx.gateway.call_count("update_profile"), 0);
    assert!(ctx.client.is_dirty().await);
}

#[tokio::test(start_paused = true)]
async fn pausing_discards_the_deadline_until_resumed() {
    let ctx = test_context();
    login(&ctx).await;
    ctx.client.start_autosave().await;

    ctx.client.set_autosave_enabled(false).await;
    ctx.client.set_name("Jane Q. Public").await.unwrap();
    sleep(Duration::from_secs(30)).await;
    assert_eq!(ctx.gateway.call_count("update_profile"), 0);

    ctx.client.set_autosave_enabled(true).await;
    // Resuming does not retroactively arm a deadline; the next edit does.
    sleep(Duration::from_secs(30)).await;
    assert_eq!(ctx.gateway.call_count("update_profile"), 0);

    ctx.client.set_address("14 Rue Example").await.unwrap();
    sleep(Duration::from_secs(9)).await;
    assert_eq!(ctx.gateway.call_count("update_profile"), 1);

    ctx.client.stop_autosave().await;
}

#[tokio::test(start_paused = true)]
async fn failed_auto_save_stays_dirty_and_retries_after_the_next_edit() {
    let ctx = test_context();
    login(&ctx).await;
    ctx.client.start_autosave().await;

    ctx.gateway.push_update(Err(GatewayError::Network {
        reason: "backend down".to_string(),
    }));
    ctx.client.set_name("Jane Q. Public").await.unwrap();
    sleep(Duration::from_secs(9)).await;

    // The attempt happened and failed; nothing was lost.
    assert_eq!(ctx.gateway.call_count("update_profile"), 1);
    assert!(ctx.client.is_dirty().await);
    assert_eq!(ctx.client.draft().await.unwrap().name, "Jane Q. Public");

    // The next edit re-arms the timer and the retry succeeds.
    ctx.client.set_tagline("recovered").await.unwrap();
    sleep(Duration::from_secs(9)).await;
    assert_eq!(ctx.gateway.call_count("update_profile"), 2);
    assert!(!ctx.client.is_dirty().await);

    ctx.client.stop_autosave().await;
}

#[tokio::test(start_paused = true)]
async fn flush_saves_immediately_when_dirty() {
    let ctx = test_context();
    login(&ctx).await;
    ctx.client.start_autosave().await;

    ctx.client.set_name("Jane Q. Public").await.unwrap();
    ctx.client.flush_autosave().await;

    // Let the engine process the command; no quiet period involved.
    sleep(Duration::from_millis(10)).await;
    assert_eq!(ctx.gateway.call_count("update_profile"), 1);
    assert!(!ctx.client.is_dirty().await);

    // And the now-cancelled deadline does not fire a second save.
    sleep(Duration::from_secs(30)).await;
    assert_eq!(ctx.gateway.call_count("update_profile"), 1);

    ctx.client.stop_autosave().await;
}
