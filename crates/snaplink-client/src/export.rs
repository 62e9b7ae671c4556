//! Export orchestration: the uniform `export(artifact, format)` surface.
//!
//! PNG exports decode the artifact's data URL locally; SVG and PDF fetch
//! the server-rendered body first. Either way the result flows through a
//! [`Saver`], which owns exactly one save handle per call — a failed
//! download never allocates one.

use std::path::PathBuf;

use snaplink_core::export::{
    DownloadFormat, ExportError, Saver, png_save_command, server_save_command,
};
use snaplink_core::models::Artifact;

use crate::client::{ApiClient, ApiError};

impl From<ApiError> for ExportError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Api { status, .. } => Self::DownloadFailed { status },
            other => Self::Network(other.to_string()),
        }
    }
}

/// Export an artifact in the requested format and save it.
pub async fn export(
    client: &ApiClient,
    artifact: &Artifact,
    format: DownloadFormat,
    saver: &mut dyn Saver,
) -> Result<PathBuf, ExportError> {
    let cmd = if format.is_server_rendered() {
        let bytes = client.download(&artifact.id, format).await?;
        server_save_command(artifact, format, bytes)
    } else {
        png_save_command(artifact, false)?
    };
    saver.save(&cmd)
}

/// Export the large view variant (PNG-only, from the same data URL).
pub fn export_png_large(
    artifact: &Artifact,
    saver: &mut dyn Saver,
) -> Result<PathBuf, ExportError> {
    let cmd = png_save_command(artifact, true)?;
    saver.save(&cmd)
}
