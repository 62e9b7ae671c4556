//! Analytics subcommand: account overview or per-code scan detail.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use snaplink_client::ApiClient;
use snaplink_core::entitlements::{Action, Entitlements};

use crate::fmt::truncate;

/// Execute the analytics subcommand.
pub async fn run(
    client: &ApiClient,
    ents: &Entitlements,
    id: Option<String>,
) -> anyhow::Result<()> {
    let mut out = io::stdout();

    let decision = ents.evaluate(Action::ViewAnalytics);
    if !decision.allowed {
        writeln!(out, "{}", decision.reason.unwrap_or_default())?;
        writeln!(out, "Run `snaplink plans` to see upgrade options.")?;
        return Ok(());
    }

    match id {
        Some(id) => artifact_detail(client, &id, &mut out).await,
        None => overview(client, &mut out).await,
    }
}

async fn overview(client: &ApiClient, out: &mut impl Write) -> anyhow::Result<()> {
    let dashboard = client.dashboard_analytics().await?;

    writeln!(out, "Overview")?;
    writeln!(out, "  QR codes:   {} ({} active)",
        dashboard.overview.total_artifacts, dashboard.overview.active_artifacts)?;
    writeln!(out, "  Scans:      {} total, {} this month",
        dashboard.overview.total_scans, dashboard.overview.scans_this_month)?;

    if !dashboard.top_performing.is_empty() {
        writeln!(out, "\nTop performing")?;
        writeln!(out, "  {:<24} {:<10} {:>8}", "TITLE", "SHORT", "SCANS")?;
        for top in &dashboard.top_performing {
            writeln!(
                out,
                "  {:<24} {:<10} {:>8}",
                truncate(&top.title, 24),
                top.short_id,
                top.total_scans
            )?;
        }
    }

    if !dashboard.recent_activity.is_empty() {
        writeln!(out, "\nRecent activity")?;
        for event in &dashboard.recent_activity {
            writeln!(
                out,
                "  {}  {} ({})",
                event.timestamp,
                truncate(&event.title, 30),
                event.short_id
            )?;
        }
    }
    Ok(())
}

async fn artifact_detail(
    client: &ApiClient,
    id: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let analytics = client.artifact_analytics(id).await?;

    writeln!(out, "  Scans:    {}", analytics.total_scans)?;
    if let Some(last) = &analytics.last_scanned {
        writeln!(out, "  Last:     {last}")?;
    }
    writeln!(out, "  Created:  {}", analytics.created_at)?;

    if !analytics.daily_scans.is_empty() {
        writeln!(out, "\nDaily scans")?;
        for day in &analytics.daily_scans {
            writeln!(out, "  {:<12} {:>6}", day.date, day.scans)?;
        }
    }

    if !analytics.device_stats.is_empty() {
        writeln!(out, "\nDevices")?;
        for device in &analytics.device_stats {
            writeln!(
                out,
                "  {:<16} {:>6} ({:.0}%)",
                device.device, device.count, device.percentage
            )?;
        }
    }

    if !analytics.location_stats.is_empty() {
        writeln!(out, "\nLocations")?;
        for location in &analytics.location_stats {
            writeln!(out, "  {:<16} {:>6}", location.country, location.count)?;
        }
    }

    if !analytics.recent_scans.is_empty() {
        writeln!(out, "\nRecent scans")?;
        for scan in &analytics.recent_scans {
            let place = scan
                .location
                .as_ref()
                .and_then(|l| l.country.as_deref())
                .unwrap_or("-");
            writeln!(out, "  {}  {}", scan.timestamp, place)?;
        }
    }
    Ok(())
}
