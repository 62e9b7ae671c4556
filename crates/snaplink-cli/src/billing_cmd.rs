//! Billing subcommands: plans and upgrade checkout.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use snaplink_client::ApiClient;
use snaplink_core::entitlements::Plan;

/// Render the advertised plans.
pub async fn plans(client: &ApiClient) -> anyhow::Result<()> {
    let mut out = io::stdout();
    let resp = client.plans().await?;
    if resp.plans.is_empty() {
        writeln!(out, "No plans advertised.")?;
        return Ok(());
    }

    for offer in &resp.plans {
        let price = match offer.price {
            Some(p) if p > 0.0 => format!(
                "${p:.0}/{}",
                offer.period.as_deref().unwrap_or("month")
            ),
            _ => "free".to_string(),
        };
        let marker = if offer.popular { "  (most popular)" } else { "" };
        writeln!(out, "{} — {price}{marker}", offer.name)?;
        if let Some(description) = &offer.description {
            writeln!(out, "  {description}")?;
        }
        for feature in &offer.features {
            writeln!(out, "  - {feature}")?;
        }
        writeln!(out)?;
    }
    writeln!(out, "Upgrade with `snaplink upgrade <plan>`.")?;
    Ok(())
}

/// Create a hosted checkout session and print its URL. Payment itself
/// happens on the hosted page; this client only hands over the link.
pub async fn upgrade(client: &ApiClient, plan: &str) -> anyhow::Result<()> {
    let mut out = io::stdout();
    let plan = Plan::parse(plan)
        .ok_or_else(|| anyhow::anyhow!("unknown plan {plan:?}: expected free, pro, business, or enterprise"))?;
    if plan == Plan::Free {
        writeln!(out, "The free plan needs no checkout.")?;
        return Ok(());
    }
    let session = client.create_checkout_session(plan).await?;
    writeln!(out, "Open this link to complete checkout:")?;
    writeln!(out, "  {}", session.url)?;
    Ok(())
}
