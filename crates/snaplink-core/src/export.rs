//! File export pipeline.
//!
//! Turns an artifact's encoded image into a file on disk. Command
//! construction (`SaveCommand`) is pure and separated from the
//! side-effecting save step (`Saver`), so the decode logic is testable
//! without touching the filesystem.

use std::io::Write;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;
use tracing::warn;

use crate::models::Artifact;

/// Export pipeline errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The artifact has no encoded image yet.
    #[error("artifact has no generated image to export")]
    MissingImage,

    /// The server export endpoint returned a non-success status.
    #[error("download failed with HTTP status {status}")]
    DownloadFailed { status: u16 },

    /// The server export request never completed.
    #[error("network error during export: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Requested download format. PNG is always derivable client-side from
/// the artifact's data URL; SVG and PDF are rendered server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadFormat {
    #[default]
    Png,
    Svg,
    Pdf,
}

impl DownloadFormat {
    /// Wire value used in the download endpoint path.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
        }
    }

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Svg => "SVG",
            Self::Pdf => "PDF",
        }
    }

    /// Filename extension for the saved file.
    ///
    /// The backend currently serves PNG bytes even when `pdf` is
    /// requested, so `Pdf` maps to `.png`. This mirrors the live endpoint
    /// behavior and is pinned by tests; it changes when the backend
    /// contract does.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png | Self::Pdf => ".png",
            Self::Svg => ".svg",
        }
    }

    /// Whether this format is rendered by the server rather than decoded
    /// from the artifact's data URL.
    pub const fn is_server_rendered(self) -> bool {
        !matches!(self, Self::Png)
    }

    /// Whether downloading this format requires the plan's data-export
    /// entitlement.
    pub const fn requires_export_entitlement(self) -> bool {
        self.is_server_rendered()
    }

    /// Parse a user-supplied format name, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

/// A pure description of one file save: what bytes, tagged with what MIME
/// type, under what name. Constructing one performs no I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveCommand {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub filename: String,
}

/// Errors from strict data-URL decoding. Callers that want the
/// best-effort path use [`png_save_command`], which never fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUrlError {
    #[error("data URL has no comma separator")]
    MissingComma,

    #[error("data URL payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Decode a `data:<mime>;base64,<payload>` string into raw bytes and the
/// declared MIME type. The MIME defaults to `image/png` when the header
/// is absent or malformed.
pub fn decode_data_url(data_url: &str) -> Result<(Vec<u8>, String), DataUrlError> {
    let (header, payload) = data_url.split_once(',').ok_or(DataUrlError::MissingComma)?;
    let mime = mime_from_header(header);
    let bytes = BASE64.decode(payload.trim())?;
    Ok((bytes, mime))
}

/// Extract the MIME type from a data-URL header segment
/// (`data:image/png;base64`), defaulting to `image/png`.
fn mime_from_header(header: &str) -> String {
    let mime = header
        .strip_prefix("data:")
        .map(|rest| rest.split(';').next().unwrap_or(""))
        .unwrap_or("");
    if mime.is_empty() {
        "image/png".to_string()
    } else {
        mime.to_string()
    }
}

/// Filename for an exported artifact: `qr-{short_id_or_id}{ext}`, or
/// `qr-code-{short_id_or_id}-large.png` for the large view variant.
pub fn export_filename(artifact: &Artifact, format: DownloadFormat, large: bool) -> String {
    let id = artifact.short_id_or_id();
    if large {
        format!("qr-code-{id}-large.png")
    } else {
        format!("qr-{id}{}", format.extension())
    }
}

/// Build the save command for a client-side PNG export.
///
/// A malformed data URL (missing comma, undecodable base64) does not fail
/// the export: the raw string bytes are saved verbatim as a best-effort
/// degraded path, matching the behavior of handing the data URL straight
/// to the browser as a download target.
pub fn png_save_command(artifact: &Artifact, large: bool) -> Result<SaveCommand, ExportError> {
    let data_url = artifact
        .image_data_url
        .as_deref()
        .ok_or(ExportError::MissingImage)?;
    let filename = export_filename(artifact, DownloadFormat::Png, large);
    match decode_data_url(data_url) {
        Ok((bytes, mime)) => Ok(SaveCommand {
            bytes,
            mime,
            filename,
        }),
        Err(err) => {
            warn!(artifact = %artifact.id, %err, "data URL decode failed, saving raw payload");
            Ok(SaveCommand {
                bytes: data_url.as_bytes().to_vec(),
                mime: "image/png".to_string(),
                filename,
            })
        }
    }
}

/// Build the save command for a server-rendered export body.
pub fn server_save_command(
    artifact: &Artifact,
    format: DownloadFormat,
    bytes: Vec<u8>,
) -> SaveCommand {
    let mime = match format {
        // Pinned: pdf responses currently carry PNG bytes.
        DownloadFormat::Png | DownloadFormat::Pdf => "image/png",
        DownloadFormat::Svg => "image/svg+xml",
    };
    SaveCommand {
        bytes,
        mime: mime.to_string(),
        filename: export_filename(artifact, format, false),
    }
}

/// The side-effecting half of the pipeline.
pub trait Saver {
    /// Persist one save command, returning the final path.
    fn save(&mut self, cmd: &SaveCommand) -> Result<PathBuf, ExportError>;
}

/// Saves into a target directory via a temporary file handle.
///
/// Each save allocates exactly one temp handle and releases it exactly
/// once: persisted to the final name on success, deleted on the error
/// path when the handle drops. Concurrent saves are independent.
#[derive(Debug, Clone)]
pub struct DiskSaver {
    dir: PathBuf,
}

impl DiskSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Saver for DiskSaver {
    fn save(&mut self, cmd: &SaveCommand) -> Result<PathBuf, ExportError> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&cmd.bytes)?;
        tmp.flush()?;
        let path = self.dir.join(&cmd.filename);
        tmp.persist(&path).map_err(|e| ExportError::Io(e.error))?;
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{Customization, ErrorCorrectionLevel};

    fn artifact(data_url: Option<&str>) -> Artifact {
        Artifact {
            id: "id-1".into(),
            image_data_url: data_url.map(str::to_string),
            short_url: "https://snap.link/r/ab12".into(),
            short_id: "ab12".into(),
            target_url: "https://example.com".into(),
            title: None,
            description: None,
            created_at: "2026-03-01T12:00:00Z".into(),
            customization: Customization {
                size: 256,
                error_correction_level: ErrorCorrectionLevel::Medium,
                foreground_color: "#000000".into(),
                background_color: "#FFFFFF".into(),
                logo_url: None,
            },
            analytics: None,
            is_active: Some(true),
        }
    }

    // =========================================================================
    // Data URL decoding
    // =========================================================================

    #[test]
    fn decode_roundtrips_payload() {
        let payload = BASE64.encode(b"\x89PNG\r\n\x1a\nhello");
        let data_url = format!("data:image/png;base64,{payload}");
        let (bytes, mime) = decode_data_url(&data_url).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(BASE64.encode(&bytes), payload);
    }

    #[test]
    fn decode_extracts_declared_mime() {
        let data_url = format!("data:image/webp;base64,{}", BASE64.encode(b"x"));
        let (_, mime) = decode_data_url(&data_url).unwrap();
        assert_eq!(mime, "image/webp");
    }

    #[test]
    fn decode_defaults_mime_when_header_empty() {
        let data_url = format!("data:;base64,{}", BASE64.encode(b"x"));
        let (_, mime) = decode_data_url(&data_url).unwrap();
        assert_eq!(mime, "image/png");
    }

    #[test]
    fn decode_defaults_mime_when_header_malformed() {
        let data_url = format!("garbage-header;base64,{}", BASE64.encode(b"x"));
        let (_, mime) = decode_data_url(&data_url).unwrap();
        assert_eq!(mime, "image/png");
    }

    #[test]
    fn decode_rejects_missing_comma() {
        assert_eq!(
            decode_data_url("data:image/png;base64"),
            Err(DataUrlError::MissingComma)
        );
    }

    #[test]
    fn decode_rejects_bad_base64() {
        let err = decode_data_url("data:image/png;base64,!!!not-base64!!!").unwrap_err();
        assert!(matches!(err, DataUrlError::Base64(_)));
    }

    // =========================================================================
    // Save command construction
    // =========================================================================

    #[test]
    fn png_command_decodes_valid_data_url() {
        let payload = BASE64.encode(b"png-bytes");
        let art = artifact(Some(&format!("data:image/png;base64,{payload}")));
        let cmd = png_save_command(&art, false).unwrap();
        assert_eq!(cmd.bytes, b"png-bytes");
        assert_eq!(cmd.mime, "image/png");
        assert_eq!(cmd.filename, "qr-ab12.png");
    }

    #[test]
    fn png_command_falls_back_on_missing_comma() {
        let art = artifact(Some("data:image/png;base64"));
        let cmd = png_save_command(&art, false).unwrap();
        assert_eq!(cmd.bytes, b"data:image/png;base64");
        assert_eq!(cmd.filename, "qr-ab12.png");
    }

    #[test]
    fn png_command_falls_back_on_bad_base64() {
        let art = artifact(Some("data:image/png;base64,%%%"));
        let cmd = png_save_command(&art, false).unwrap();
        assert_eq!(cmd.bytes, b"data:image/png;base64,%%%");
    }

    #[test]
    fn png_command_errors_without_image() {
        let art = artifact(None);
        assert!(matches!(
            png_save_command(&art, false),
            Err(ExportError::MissingImage)
        ));
    }

    #[test]
    fn large_variant_filename() {
        let payload = BASE64.encode(b"x");
        let art = artifact(Some(&format!("data:image/png;base64,{payload}")));
        let cmd = png_save_command(&art, true).unwrap();
        assert_eq!(cmd.filename, "qr-code-ab12-large.png");
    }

    #[test]
    fn pdf_filename_maps_to_png_extension() {
        let art = artifact(None);
        assert_eq!(
            export_filename(&art, DownloadFormat::Pdf, false),
            "qr-ab12.png"
        );
    }

    #[test]
    fn svg_filename_keeps_svg_extension() {
        let art = artifact(None);
        assert_eq!(
            export_filename(&art, DownloadFormat::Svg, false),
            "qr-ab12.svg"
        );
    }

    #[test]
    fn server_command_tags_svg_mime() {
        let art = artifact(None);
        let cmd = server_save_command(&art, DownloadFormat::Svg, b"<svg/>".to_vec());
        assert_eq!(cmd.mime, "image/svg+xml");
        assert_eq!(cmd.filename, "qr-ab12.svg");
    }

    #[test]
    fn server_command_pdf_carries_png_mime() {
        let art = artifact(None);
        let cmd = server_save_command(&art, DownloadFormat::Pdf, vec![1, 2, 3]);
        assert_eq!(cmd.mime, "image/png");
        assert!(cmd.filename.ends_with(".png"));
    }

    #[test]
    fn format_parse_roundtrip() {
        for fmt in [DownloadFormat::Png, DownloadFormat::Svg, DownloadFormat::Pdf] {
            assert_eq!(DownloadFormat::parse(fmt.as_str()), Some(fmt));
        }
        assert_eq!(DownloadFormat::parse("PDF"), Some(DownloadFormat::Pdf));
        assert_eq!(DownloadFormat::parse("gif"), None);
    }

    // =========================================================================
    // Disk saver
    // =========================================================================

    #[test]
    fn disk_saver_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut saver = DiskSaver::new(dir.path());
        let cmd = SaveCommand {
            bytes: b"content".to_vec(),
            mime: "image/png".into(),
            filename: "qr-ab12.png".into(),
        };
        let path = saver.save(&cmd).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"content");
    }

    #[test]
    fn disk_saver_errors_on_missing_dir() {
        let mut saver = DiskSaver::new("/nonexistent/snaplink-test");
        let cmd = SaveCommand {
            bytes: vec![],
            mime: "image/png".into(),
            filename: "qr.png".into(),
        };
        assert!(matches!(saver.save(&cmd), Err(ExportError::Io(_))));
    }

    #[test]
    fn concurrent_saves_release_their_own_handles() {
        let dir = tempfile::tempdir().unwrap();
        let handles: Vec<_> = (0..2)
            .map(|i| {
                let mut saver = DiskSaver::new(dir.path());
                std::thread::spawn(move || {
                    let cmd = SaveCommand {
                        bytes: format!("payload-{i}").into_bytes(),
                        mime: "image/png".into(),
                        filename: format!("qr-art{i}.png"),
                    };
                    saver.save(&cmd).unwrap()
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        // Both exports landed and every temp handle was released: the
        // directory holds exactly the two final files.
        let mut names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec!["qr-art0.png", "qr-art1.png"]);
    }
}
