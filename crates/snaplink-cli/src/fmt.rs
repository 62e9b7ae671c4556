//! Output formatting helpers.

use std::io::{self, Write};

use snaplink_core::entitlements::Entitlements;
use snaplink_core::models::{AnalyticsSummary, Artifact};

pub fn write_artifact_detail(w: &mut impl Write, artifact: &Artifact) -> io::Result<()> {
    writeln!(w, "  Id:       {}", artifact.id)?;
    if let Some(title) = &artifact.title {
        writeln!(w, "  Title:    {title}")?;
    }
    if let Some(description) = &artifact.description {
        writeln!(w, "  Desc:     {description}")?;
    }
    writeln!(w, "  Target:   {}", artifact.target_url)?;
    writeln!(w, "  Short:    {}", artifact.short_url)?;
    writeln!(w, "  Created:  {}", artifact.created_at)?;
    writeln!(
        w,
        "  Style:    {}px, level {}, {} on {}",
        artifact.customization.size,
        artifact.customization.error_correction_level.as_str(),
        artifact.customization.foreground_color,
        artifact.customization.background_color,
    )?;
    writeln!(w, "  Status:   {}", active_str(artifact.is_active))?;
    writeln!(w, "  Scans:    {}", scans_str(artifact.analytics.as_ref()))?;
    Ok(())
}

/// Usage meter with the non-blocking warning banner once the quota
/// crosses the warning threshold.
pub fn write_usage_meter(w: &mut impl Write, ents: &Entitlements) -> io::Result<()> {
    writeln!(
        w,
        "  QR codes: {} of {} used",
        ents.usage.artifacts_created, ents.limits.max_artifacts
    )?;
    writeln!(w, "  Scans:    {} this month", ents.usage.scans_this_month)?;
    if let Some(warning) = ents.usage_warning() {
        writeln!(w, "\n  Warning: {warning}")?;
    }
    Ok(())
}

pub fn active_str(is_active: Option<bool>) -> &'static str {
    match is_active {
        Some(true) => "active",
        Some(false) => "inactive",
        None => "-",
    }
}

pub fn scans_str(analytics: Option<&AnalyticsSummary>) -> String {
    match analytics {
        Some(a) => match &a.last_scanned {
            Some(last) => format!("{} (last {last})", a.total_scans),
            None => a.total_scans.to_string(),
        },
        None => "0".to_string(),
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        s.to_string()
    } else {
        format!("{}…", s.chars().take(max - 1).collect::<String>())
    }
}
