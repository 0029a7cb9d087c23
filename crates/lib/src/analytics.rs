//! Link analytics: raw counters turned into a dashboard-ready report.
//!
//! The counter endpoint keys per-link clicks by 1-based position in the
//! profile's social-link list, so building a report needs the draft's
//! current ordering. Analytics are strictly read-only decoration: a fetch
//! failure degrades to an all-zero report rather than surfacing an error.

use tracing::debug;
use url::Url;

use crate::remote::wire::RawAnalytics;

/// Headline counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyticsSummary {
    pub total_visits: u64,
    pub total_clicks: u64,
    pub shares: u64,
    pub copied_details: u64,
}

/// One row of the per-link table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPerformance {
    /// The resolved link, when the counter index matched one.
    pub url: Option<String>,
    /// Display label: the link's host, or `Link N` for stale indices.
    pub label: String,
    pub clicks: u64,
}

/// The assembled dashboard data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsReport {
    pub summary: AnalyticsSummary,
    /// Sorted by clicks, busiest first.
    pub link_performance: Vec<LinkPerformance>,
}

/// Resolve raw counters against the draft's ordered links.
///
/// Indices that no longer match a link (the user removed one since the
/// clicks were counted) keep their row under a positional label.
pub fn build_report(raw: RawAnalytics, social_links: &[String]) -> AnalyticsReport {
    let mut rows: Vec<LinkPerformance> = raw
        .links
        .iter()
        .map(|(key, clicks)| {
            let url = key
                .parse::<usize>()
                .ok()
                .and_then(|position| position.checked_sub(1))
                .and_then(|index| social_links.get(index))
                .cloned();
            let label = match &url {
                Some(link) => host_label(link),
                None => format!("Link {key}"),
            };
            LinkPerformance {
                url,
                label,
                clicks: *clicks,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.clicks.cmp(&a.clicks).then_with(|| a.label.cmp(&b.label)));

    if rows.is_empty() {
        debug!("no per-link counters in the analytics reply");
    }

    AnalyticsReport {
        summary: AnalyticsSummary {
            total_visits: raw.total_visits,
            total_clicks: raw.total_clicks,
            shares: raw.shares,
            copied_details: raw.copied_details,
        },
        link_performance: rows,
    }
}

/// Human label for a link: its host with any `www.` prefix dropped.
fn host_label(link: &str) -> String {
    Url::parse(link)
        .ok()
        .and_then(|url| {
            url.host_str()
                .map(|host| host.trim_start_matches("www.").to_string())
        })
        .unwrap_or_else(|| link.to_string())
}
