//! The JSON state file: round trips, versioning, and session persistence.

use std::sync::Arc;

use cardfolio::store::{JsonFile, SESSION_KEY, StateStore, StoreError};
use cardfolio::{Client, Error, FixedClock, Settings};

use crate::helpers::{MockGateway, MockImageHost, login, test_context};

#[test]
fn values_round_trip_across_reopens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    {
        let store = JsonFile::open(&path).unwrap();
        store.set("session", r#"{"email":"user@example.com"}"#).unwrap();
        store.set("pending_code", "challenge").unwrap();
    }
    {
        let store = JsonFile::open(&path).unwrap();
        assert_eq!(
            store.get("session").unwrap().as_deref(),
            Some(r#"{"email":"user@example.com"}"#)
        );
        store.remove("pending_code").unwrap();
    }
    {
        let store = JsonFile::open(&path).unwrap();
        assert_eq!(store.get("pending_code").unwrap(), None);
        assert!(store.get("session").unwrap().is_some());
    }
}

#[test]
fn missing_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFile::open(dir.path().join("nothing-here.json")).unwrap();
    assert_eq!(store.get("session").unwrap(), None);
}

#[test]
fn unknown_format_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, r#"{"_v":9,"entries":{}}"#).unwrap();

    let err = JsonFile::open(&path).unwrap_err();
    assert!(matches!(
        err,
        Error::Store(StoreError::UnsupportedVersion {
            found: 9,
            expected: 0
        })
    ));
}

#[test]
fn garbage_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "not json at all").unwrap();

    let err = JsonFile::open(&path).unwrap_err();
    assert!(matches!(err, Error::Store(StoreError::Deserialize { .. })));
}

#[tokio::test]
async fn sessions_survive_a_restart_through_the_state_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let ctx = test_context();
    let session = {
        let store = Arc::new(JsonFile::open(&path).unwrap());
        let client = Client::new(
            Settings::default(),
            store,
            ctx.gateway.clone(),
            ctx.image_host.clone(),
            ctx.clock.clone(),
        )
        .unwrap();
        let wrapped = crate::helpers::TestContext {
            client,
            gateway: ctx.gateway.clone(),
            image_host: ctx.image_host.clone(),
            store: ctx.store.clone(),
            clock: ctx.clock.clone(),
        };
        login(&wrapped).await
    };

    // A brand-new process over the same file picks the session back up.
    let store = Arc::new(JsonFile::open(&path).unwrap());
    let client = Client::new(
        Settings::default(),
        store,
        Arc::new(MockGateway::default()),
        Arc::new(MockImageHost::default()),
        Arc::new(FixedClock::default()),
    )
    .unwrap();
    assert_eq!(client.session().await, Some(session));

    // Logout wipes the record on disk as well.
    client.logout().await.unwrap();
    let reread = JsonFile::open(&path).unwrap();
    assert_eq!(reread.get(SESSION_KEY).unwrap(), None);
}
