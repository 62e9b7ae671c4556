//! Account subcommand: profile, plan, and usage.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use snaplink_client::ApiClient;
use snaplink_core::entitlements::Entitlements;

use crate::fmt::write_usage_meter;

/// Show the authenticated account with its usage meter.
pub async fn run(client: &ApiClient) -> anyhow::Result<()> {
    let account = client.me().await?;
    let ents = Entitlements::for_account(&account);
    let mut out = io::stdout();

    writeln!(out, "  Name:     {}", account.name)?;
    writeln!(out, "  Email:    {}", account.email)?;
    writeln!(out, "  Plan:     {}", account.plan)?;
    if let Some(sub) = &account.subscription {
        let state = if sub.is_active { "active" } else { "inactive" };
        match &sub.current_period_end {
            Some(end) => writeln!(out, "  Billing:  {state}, renews {end}")?,
            None => writeln!(out, "  Billing:  {state}")?,
        }
    }

    writeln!(out, "\nUsage")?;
    write_usage_meter(&mut out, &ents)?;

    writeln!(out, "\nIncluded in your plan")?;
    writeln!(out, "  Customization:  {}", yes_no(account.limits.can_customize))?;
    writeln!(out, "  Analytics:      {}", yes_no(account.limits.can_track_analytics))?;
    writeln!(out, "  SVG/PDF export: {}", yes_no(account.limits.can_export_data))?;
    Ok(())
}

const fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}
