//! Download subcommand: export a QR code image to disk.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;

use snaplink_client::{ApiClient, export, export_png_large};
use snaplink_core::entitlements::{Action, Entitlements};
use snaplink_core::export::{DiskSaver, DownloadFormat};

/// Download subcommand arguments. The format is per-invocation state,
/// defaulting to png.
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// QR code id.
    pub id: String,
    /// File format: png, svg, or pdf.
    #[arg(long, default_value = "png")]
    pub format: String,
    /// Directory to save into.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out: PathBuf,
    /// Save the large view variant (png only).
    #[arg(long)]
    pub large: bool,
}

/// Execute the download subcommand.
pub async fn run(
    client: &ApiClient,
    ents: &Entitlements,
    args: DownloadArgs,
) -> anyhow::Result<()> {
    let mut out = io::stdout();

    let format = DownloadFormat::parse(&args.format)
        .ok_or_else(|| anyhow::anyhow!("unknown format {:?}: expected png, svg, or pdf", args.format))?;
    if args.large && format != DownloadFormat::Png {
        anyhow::bail!("--large is only available for png");
    }

    let decision = ents.evaluate(Action::Export(format));
    if !decision.allowed {
        writeln!(out, "{}", decision.reason.unwrap_or_default())?;
        writeln!(out, "Run `snaplink plans` to see upgrade options.")?;
        return Ok(());
    }

    let artifact = client.get_artifact(&args.id).await?;
    let mut saver = DiskSaver::new(&args.out);
    let path = if args.large {
        export_png_large(&artifact, &mut saver)?
    } else {
        export(client, &artifact, format, &mut saver).await?
    };
    writeln!(out, "Saved {}", path.display())?;
    Ok(())
}
