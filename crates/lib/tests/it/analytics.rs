//! The link dashboard: counter resolution and graceful degradation.

use std::collections::HashMap;

use cardfolio::analytics::AnalyticsReport;
use cardfolio::profile::ProfileError;
use cardfolio::remote::wire::RawAnalytics;
use cardfolio::remote::{GatewayError, VerifyGrant};
use cardfolio::{Error, ProfileDraft};

use crate::helpers::{login, test_context};

fn counters() -> RawAnalytics {
    RawAnalytics {
        total_visits: 10,
        total_clicks: 15,
        shares: 3,
        copied_details: 2,
        // Keyed by 1-based position; "7" points at a link long removed.
        links: HashMap::from([
            ("1".to_string(), 5),
            ("2".to_string(), 9),
            ("7".to_string(), 1),
        ]),
    }
}

#[tokio::test]
async fn report_resolves_counters_against_link_order() {
    let ctx = test_context();
    login(&ctx).await; // links: github.com/jane, www.linkedin.com/in/jane
    ctx.gateway.push_analytics(Ok(counters()));

    let report = ctx.client.analytics().await.unwrap();

    assert_eq!(report.summary.total_visits, 10);
    assert_eq!(report.summary.total_clicks, 15);
    assert_eq!(report.summary.shares, 3);
    assert_eq!(report.summary.copied_details, 2);

    // Busiest first; labels are hosts with any www. stripped; a counter
    // whose index no longer matches a link keeps a positional label.
    let rows = &report.link_performance;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].label, "linkedin.com");
    assert_eq!(rows[0].clicks, 9);
    assert_eq!(rows[1].label, "github.com");
    assert_eq!(rows[1].clicks, 5);
    assert_eq!(rows[2].label, "Link 7");
    assert_eq!(rows[2].url, None);
}

#[tokio::test]
async fn fetch_failure_degrades_to_a_zero_report() {
    let ctx = test_context();
    login(&ctx).await;
    ctx.gateway.push_analytics(Err(GatewayError::Timeout { timeout_secs: 10 }));

    let report = ctx.client.analytics().await.unwrap();
    assert_eq!(report, AnalyticsReport::default());
}

#[tokio::test]
async fn profile_without_a_slug_reports_empty_without_a_call() {
    let ctx = test_context();
    ctx.gateway.push_verify(Ok(VerifyGrant {
        token: "abc".to_string(),
        profile: Some(ProfileDraft {
            name: "Jane".to_string(),
            // No public slug assigned yet.
            ..ProfileDraft::default()
        }),
    }));
    ctx.client.request_code("user@example.com").await.unwrap();
    ctx.client.verify_code("123456").await.unwrap();

    let report = ctx.client.analytics().await.unwrap();
    assert_eq!(report, AnalyticsReport::default());
    assert_eq!(ctx.gateway.call_count("fetch_analytics"), 0);
}

#[tokio::test]
async fn analytics_need_a_loaded_profile() {
    let ctx = test_context();
    let err = ctx.client.analytics().await.unwrap_err();
    assert!(matches!(err, Error::Profile(ProfileError::NotLoaded)));
}
