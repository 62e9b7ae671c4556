//! QR code management subcommands: list, show, update, delete.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use dialoguer::Confirm;

use snaplink_client::ApiClient;
use snaplink_client::types::UpdateArtifactRequest;

use crate::fmt::{active_str, truncate, write_artifact_detail};

/// List the user's QR codes as a table.
pub async fn list(client: &ApiClient, page: u32, limit: u32) -> anyhow::Result<()> {
    let mut out = io::stdout();
    let resp = client.list_artifacts(page, limit).await?;
    if resp.artifacts.is_empty() {
        writeln!(out, "No QR codes yet. Create one with `snaplink generate`.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<14} {:<24} {:<32} {:>6} {:<8}",
        "ID", "TITLE", "TARGET", "SCANS", "STATUS"
    )?;
    for artifact in &resp.artifacts {
        let title = artifact.title.as_deref().unwrap_or("Untitled");
        let scans = artifact
            .analytics
            .as_ref()
            .map_or(0, |a| a.total_scans);
        writeln!(
            out,
            "{:<14} {:<24} {:<32} {:>6} {:<8}",
            truncate(&artifact.id, 14),
            truncate(title, 24),
            truncate(&artifact.target_url, 32),
            scans,
            active_str(artifact.is_active),
        )?;
    }

    match &resp.pagination {
        Some(p) => writeln!(
            out,
            "\nPage {} of {} ({} total)",
            p.current, p.total, p.total_items
        )?,
        None => writeln!(out, "\n{} QR code(s)", resp.artifacts.len())?,
    }
    Ok(())
}

/// Show one QR code in detail.
pub async fn show(client: &ApiClient, id: &str) -> anyhow::Result<()> {
    let mut out = io::stdout();
    let artifact = client.get_artifact(id).await?;
    write_artifact_detail(&mut out, &artifact)?;
    Ok(())
}

/// Update title, description, or the active flag.
pub async fn update(
    client: &ApiClient,
    id: &str,
    title: Option<String>,
    description: Option<String>,
    active: Option<bool>,
) -> anyhow::Result<()> {
    if title.is_none() && description.is_none() && active.is_none() {
        anyhow::bail!("nothing to update: pass --title, --description, or --active");
    }
    let req = UpdateArtifactRequest {
        title,
        description,
        is_active: active,
    };
    let artifact = client.update_artifact(id, &req).await?;
    let mut out = io::stdout();
    writeln!(out, "Updated:")?;
    write_artifact_detail(&mut out, &artifact)?;
    Ok(())
}

/// Delete a QR code, confirming unless `--yes` was passed.
pub async fn delete(client: &ApiClient, id: &str, yes: bool) -> anyhow::Result<()> {
    let mut out = io::stdout();
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete QR code {id}? Its short link will stop working."))
            .default(false)
            .interact()?;
        if !confirmed {
            writeln!(out, "Aborted.")?;
            return Ok(());
        }
    }
    client.delete_artifact(id).await?;
    writeln!(out, "Deleted {id}")?;
    Ok(())
}
