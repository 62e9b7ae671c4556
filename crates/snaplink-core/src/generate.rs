//! QR generation flow.
//!
//! Client-side request validation and the submission state machine:
//! `Idle -> Submitting -> { Success | Failed }`, returning to `Idle` on an
//! explicit "generate another" or a resubmission after failure. A single
//! user-initiated resubmission suffices; there is no retry-with-backoff.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{Artifact, ErrorCorrectionLevel};

/// Size range accepted by the generator, in pixels.
pub const MIN_SIZE: u32 = 128;
pub const MAX_SIZE: u32 = 512;

const MAX_TITLE_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 500;

/// Payload for `POST /qr/generate`. Optional fields are omitted from the
/// JSON body and the backend applies its own defaults.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_correction_level: Option<ErrorCorrectionLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl GenerateRequest {
    /// Pre-submit validation. The backend validates again and stays
    /// authoritative; this keeps obviously bad input off the network and
    /// ties errors to the offending field.
    pub fn validate(&self) -> Result<()> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(Error::Validation("url: please enter a URL".into()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::Validation(
                "url: must start with http:// or https://".into(),
            ));
        }
        if let Some(title) = &self.title {
            if title.chars().count() > MAX_TITLE_LEN {
                return Err(Error::Validation(format!(
                    "title: at most {MAX_TITLE_LEN} characters"
                )));
            }
        }
        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(Error::Validation(format!(
                    "description: at most {MAX_DESCRIPTION_LEN} characters"
                )));
            }
        }
        if let Some(size) = self.size {
            if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
                return Err(Error::Validation(format!(
                    "size: must be between {MIN_SIZE} and {MAX_SIZE} pixels"
                )));
            }
        }
        if let Some(color) = &self.foreground_color {
            validate_color("foreground-color", color)?;
        }
        if let Some(color) = &self.background_color {
            validate_color("background-color", color)?;
        }
        Ok(())
    }
}

fn validate_color(field: &str, color: &str) -> Result<()> {
    let hex = color.strip_prefix('#').unwrap_or("");
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{field}: expected a #rrggbb color, got {color:?}"
        )))
    }
}

/// Generation form state.
#[derive(Debug, Clone, Default)]
pub enum GenerateState {
    #[default]
    Idle,
    Submitting,
    Success(Box<Artifact>),
    Failed(String),
}

/// State machine driving one generation form.
#[derive(Debug, Clone, Default)]
pub struct GenerateFlow {
    state: GenerateState,
}

impl GenerateFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn state(&self) -> &GenerateState {
        &self.state
    }

    /// Begin a submission. Legal from `Idle`, and from `Failed` (a
    /// resubmission passes back through `Idle`). A submission in flight
    /// or an unacknowledged success rejects the transition.
    pub fn begin_submit(&mut self) -> Result<()> {
        match self.state {
            GenerateState::Idle | GenerateState::Failed(_) => {
                self.state = GenerateState::Submitting;
                Ok(())
            }
            GenerateState::Submitting => Err(Error::Validation(
                "a generation request is already in flight".into(),
            )),
            GenerateState::Success(_) => Err(Error::Validation(
                "acknowledge the generated code first (generate another)".into(),
            )),
        }
    }

    /// Record a successful response. Legal only while submitting.
    pub fn complete(&mut self, artifact: Artifact) -> Result<()> {
        if matches!(self.state, GenerateState::Submitting) {
            self.state = GenerateState::Success(Box::new(artifact));
            Ok(())
        } else {
            Err(Error::Validation("no submission in flight".into()))
        }
    }

    /// Record a failed response. Legal only while submitting.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<()> {
        if matches!(self.state, GenerateState::Submitting) {
            self.state = GenerateState::Failed(reason.into());
            Ok(())
        } else {
            Err(Error::Validation("no submission in flight".into()))
        }
    }

    /// "Generate another": return to `Idle` from any state.
    pub fn reset(&mut self) {
        self.state = GenerateState::Idle;
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::Customization;

    fn request(url: &str) -> GenerateRequest {
        GenerateRequest {
            url: url.into(),
            ..GenerateRequest::default()
        }
    }

    fn artifact() -> Artifact {
        Artifact {
            id: "a1".into(),
            image_data_url: Some("data:image/png;base64,aGk=".into()),
            short_url: "https://snap.link/r/a1".into(),
            short_id: "a1".into(),
            target_url: "https://example.com".into(),
            title: None,
            description: None,
            created_at: "2026-03-01T00:00:00Z".into(),
            customization: Customization {
                size: 256,
                error_correction_level: ErrorCorrectionLevel::Medium,
                foreground_color: "#000000".into(),
                background_color: "#FFFFFF".into(),
                logo_url: None,
            },
            analytics: None,
            is_active: None,
        }
    }

    #[test]
    fn valid_request_passes() {
        let req = GenerateRequest {
            url: "https://example.com/page".into(),
            title: Some("Launch".into()),
            size: Some(256),
            foreground_color: Some("#1a2b3c".into()),
            background_color: Some("#FFFFFF".into()),
            error_correction_level: Some(ErrorCorrectionLevel::High),
            ..GenerateRequest::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn empty_url_rejected() {
        let err = request("  ").validate().unwrap_err();
        assert!(err.to_string().contains("url"));
    }

    #[test]
    fn non_http_scheme_rejected() {
        assert!(request("ftp://example.com").validate().is_err());
        assert!(request("example.com").validate().is_err());
    }

    #[test]
    fn size_out_of_range_rejected() {
        let mut req = request("https://example.com");
        req.size = Some(64);
        assert!(req.validate().is_err());
        req.size = Some(1024);
        assert!(req.validate().is_err());
        req.size = Some(512);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn bad_color_rejected() {
        let mut req = request("https://example.com");
        req.foreground_color = Some("red".into());
        assert!(req.validate().is_err());
        req.foreground_color = Some("#12345".into());
        assert!(req.validate().is_err());
        req.foreground_color = Some("#a1B2c3".into());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn optional_fields_omitted_from_json() {
        let json = serde_json::to_string(&request("https://example.com")).unwrap();
        assert!(!json.contains("size"));
        assert!(!json.contains("errorCorrectionLevel"));
        assert!(json.contains("\"url\""));
    }

    #[test]
    fn level_serializes_to_wire_letter() {
        let mut req = request("https://example.com");
        req.error_correction_level = Some(ErrorCorrectionLevel::Quartile);
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"errorCorrectionLevel\":\"Q\""));
    }

    #[test]
    fn flow_happy_path() {
        let mut flow = GenerateFlow::new();
        assert!(matches!(flow.state(), GenerateState::Idle));
        flow.begin_submit().unwrap();
        assert!(matches!(flow.state(), GenerateState::Submitting));
        flow.complete(artifact()).unwrap();
        assert!(matches!(flow.state(), GenerateState::Success(_)));
        flow.reset();
        assert!(matches!(flow.state(), GenerateState::Idle));
    }

    #[test]
    fn flow_failure_allows_resubmission() {
        let mut flow = GenerateFlow::new();
        flow.begin_submit().unwrap();
        flow.fail("backend rejected url").unwrap();
        assert!(matches!(flow.state(), GenerateState::Failed(_)));
        flow.begin_submit().unwrap();
        assert!(matches!(flow.state(), GenerateState::Submitting));
    }

    #[test]
    fn flow_rejects_double_submit() {
        let mut flow = GenerateFlow::new();
        flow.begin_submit().unwrap();
        assert!(flow.begin_submit().is_err());
    }

    #[test]
    fn flow_rejects_submit_from_success() {
        let mut flow = GenerateFlow::new();
        flow.begin_submit().unwrap();
        flow.complete(artifact()).unwrap();
        assert!(flow.begin_submit().is_err());
    }

    #[test]
    fn flow_rejects_completion_when_idle() {
        let mut flow = GenerateFlow::new();
        assert!(flow.complete(artifact()).is_err());
        assert!(flow.fail("x").is_err());
    }
}
