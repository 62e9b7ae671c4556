//! Generate subcommand: create a new QR artifact.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use dialoguer::{Confirm, Input, Select};

use snaplink_client::ApiClient;
use snaplink_core::entitlements::{Action, Entitlements};
use snaplink_core::export::{DiskSaver, Saver, png_save_command};
use snaplink_core::generate::{GenerateFlow, GenerateRequest, MAX_SIZE, MIN_SIZE};
use snaplink_core::models::{Artifact, ErrorCorrectionLevel};

use crate::fmt::write_artifact_detail;

/// Generate subcommand arguments.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Target URL to encode (prompted for in interactive mode).
    pub url: Option<String>,
    /// Title shown in listings.
    #[arg(long)]
    pub title: Option<String>,
    /// Longer description.
    #[arg(long)]
    pub description: Option<String>,
    /// Image size in pixels (128-512).
    #[arg(long)]
    pub size: Option<u32>,
    /// Error correction level: L, M, Q, or H.
    #[arg(long)]
    pub level: Option<String>,
    /// Foreground color (#rrggbb).
    #[arg(long)]
    pub fg: Option<String>,
    /// Background color (#rrggbb).
    #[arg(long)]
    pub bg: Option<String>,
    /// Prompt for fields interactively, with a "generate another" loop.
    #[arg(short, long)]
    pub interactive: bool,
    /// Save the PNG into this directory after generation.
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

/// Execute the generate subcommand.
pub async fn run(
    client: &ApiClient,
    ents: &Entitlements,
    args: GenerateArgs,
) -> anyhow::Result<()> {
    let mut out = io::stdout();

    let decision = ents.evaluate(Action::CreateArtifact);
    if !decision.allowed {
        let reason = decision.reason.unwrap_or_default();
        writeln!(out, "{reason}")?;
        writeln!(out, "Run `snaplink plans` to see upgrade options.")?;
        return Ok(());
    }
    if let Some(warning) = ents.usage_warning() {
        writeln!(out, "Warning: {warning}\n")?;
    }

    let customize = ents.evaluate(Action::Customize);

    if args.interactive {
        run_interactive(client, customize.allowed, args.out.as_deref(), &mut out).await
    } else {
        let req = request_from_flags(&args, &customize)?;
        req.validate()?;
        let mut flow = GenerateFlow::new();
        flow.begin_submit()?;
        match client.generate(&req).await {
            Ok(artifact) => {
                flow.complete(artifact.clone())?;
                print_result(&mut out, &artifact)?;
                save_png_if_requested(args.out.as_deref(), &artifact, &mut out)?;
                Ok(())
            }
            Err(err) => {
                flow.fail(err.to_string())?;
                Err(err.into())
            }
        }
    }
}

/// Interactive mode: prompt, submit, then loop on "Generate another?".
async fn run_interactive(
    client: &ApiClient,
    customize_allowed: bool,
    out_dir: Option<&std::path::Path>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut flow = GenerateFlow::new();
    loop {
        let req = prompt_request(customize_allowed)?;
        if let Err(err) = req.validate() {
            writeln!(out, "{err}")?;
            continue;
        }
        flow.begin_submit()?;
        writeln!(out, "Generating...")?;
        match client.generate(&req).await {
            Ok(artifact) => {
                flow.complete(artifact.clone())?;
                print_result(out, &artifact)?;
                save_png_if_requested(out_dir, &artifact, out)?;
            }
            Err(err) => {
                flow.fail(err.to_string())?;
                writeln!(out, "Generation failed: {err}")?;
            }
        }

        let again = Confirm::new()
            .with_prompt("Generate another?")
            .default(false)
            .interact()?;
        if !again {
            break;
        }
        flow.reset();
    }
    Ok(())
}

/// Build a request from command-line flags. Customization flags are
/// rejected up front when the plan does not include customization.
fn request_from_flags(
    args: &GenerateArgs,
    customize: &snaplink_core::entitlements::Decision,
) -> anyhow::Result<GenerateRequest> {
    let url = args
        .url
        .clone()
        .ok_or_else(|| anyhow::anyhow!("URL is required (or use --interactive)"))?;

    let wants_customization =
        args.size.is_some() || args.level.is_some() || args.fg.is_some() || args.bg.is_some();
    if wants_customization && !customize.allowed {
        anyhow::bail!(
            "{} Run `snaplink plans` to see upgrade options.",
            customize.reason.clone().unwrap_or_default()
        );
    }

    let level = match &args.level {
        Some(s) => Some(
            ErrorCorrectionLevel::parse(s)
                .ok_or_else(|| anyhow::anyhow!("level: expected one of L, M, Q, H, got {s:?}"))?,
        ),
        None => None,
    };

    Ok(GenerateRequest {
        url,
        title: args.title.clone(),
        description: args.description.clone(),
        size: args.size,
        error_correction_level: level,
        foreground_color: args.fg.clone(),
        background_color: args.bg.clone(),
    })
}

/// Prompt for request fields. Customization prompts appear only when the
/// plan (or an anonymous session) includes them.
fn prompt_request(customize_allowed: bool) -> anyhow::Result<GenerateRequest> {
    let url: String = Input::new().with_prompt("Target URL").interact_text()?;
    let title: String = Input::new()
        .with_prompt("Title (optional)")
        .allow_empty(true)
        .interact_text()?;
    let description: String = Input::new()
        .with_prompt("Description (optional)")
        .allow_empty(true)
        .interact_text()?;

    let mut req = GenerateRequest {
        url,
        title: none_if_empty(title),
        description: none_if_empty(description),
        ..GenerateRequest::default()
    };

    if customize_allowed {
        let wants = Confirm::new()
            .with_prompt("Customize the QR code?")
            .default(false)
            .interact()?;
        if wants {
            let size: u32 = Input::new()
                .with_prompt(format!("Size in pixels ({MIN_SIZE}-{MAX_SIZE})"))
                .default(256)
                .interact_text()?;
            let levels = [
                ErrorCorrectionLevel::Low,
                ErrorCorrectionLevel::Medium,
                ErrorCorrectionLevel::Quartile,
                ErrorCorrectionLevel::High,
            ];
            let labels: Vec<&str> = levels.iter().map(|l| l.label()).collect();
            let picked = Select::new()
                .with_prompt("Error correction")
                .items(&labels)
                .default(1)
                .interact()?;
            let fg: String = Input::new()
                .with_prompt("Foreground color")
                .default("#000000".to_string())
                .interact_text()?;
            let bg: String = Input::new()
                .with_prompt("Background color")
                .default("#FFFFFF".to_string())
                .interact_text()?;
            req.size = Some(size);
            req.error_correction_level = Some(levels[picked]);
            req.foreground_color = Some(fg);
            req.background_color = Some(bg);
        }
    }

    Ok(req)
}

fn print_result(out: &mut impl Write, artifact: &Artifact) -> io::Result<()> {
    writeln!(out, "\nQR code generated:")?;
    write_artifact_detail(out, artifact)?;
    writeln!(
        out,
        "\nDownload it with `snaplink download {}`",
        artifact.id
    )?;
    Ok(())
}

/// When `--out` is given, export the PNG immediately.
fn save_png_if_requested(
    dir: Option<&std::path::Path>,
    artifact: &Artifact,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let Some(dir) = dir else { return Ok(()) };
    let cmd = png_save_command(artifact, false)?;
    let mut saver = DiskSaver::new(dir);
    let path = saver.save(&cmd)?;
    writeln!(out, "Saved {}", path.display())?;
    Ok(())
}

fn none_if_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
