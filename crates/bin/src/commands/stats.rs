//! The link analytics dashboard.

use cardfolio::Client;

use super::CmdResult;
use crate::output::print_table;

pub async fn analytics(client: &Client) -> CmdResult {
    if client.draft().await.is_none() {
        client.load_profile().await?;
    }
    let report = client.analytics().await?;

    println!("Visits: {}", report.summary.total_visits);
    println!("Clicks: {}", report.summary.total_clicks);
    println!("Shares: {}", report.summary.shares);
    println!("Copied: {}", report.summary.copied_details);
    println!();

    if report.link_performance.is_empty() {
        println!("No link activity yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = report
        .link_performance
        .iter()
        .map(|row| {
            vec![
                row.label.clone(),
                row.clicks.to_string(),
                row.url.clone().unwrap_or_else(|| "(removed link)".to_string()),
            ]
        })
        .collect();
    print_table(&["Link", "Clicks", "URL"], &rows);
    Ok(())
}
