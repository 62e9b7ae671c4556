//! SnapLink REST API client.
//!
//! Uses reqwest to call the backend endpoints for QR artifacts,
//! analytics, billing, and auth. The bearer token comes from an injected
//! [`TokenStore`]; a 401 response clears it and surfaces
//! [`ApiError::AuthRequired`].

use std::sync::Arc;

use reqwest::Method;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use snaplink_core::entitlements::Plan;
use snaplink_core::export::DownloadFormat;
use snaplink_core::generate::GenerateRequest;
use snaplink_core::models::{Account, Artifact, ArtifactAnalytics, DashboardAnalytics};

use crate::session::TokenStore;
use crate::types::{
    AuthResponse, CheckoutRequest, CheckoutSession, ListArtifactsResponse, LoginRequest,
    MeResponse, PlansResponse, RegisterRequest, UpdateArtifactRequest, UpdateProfileRequest,
};

/// Default backend base URL, overridable per client.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001/api";

/// SnapLink API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not logged in. Run `snaplink auth login` first.")]
    AuthRequired,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// SnapLink REST API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a new API client against `base_url` with the given session
    /// store.
    pub fn new(base_url: &str, session: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        if base_url.is_empty() {
            return Err(ApiError::Config("base_url is empty".into()));
        }

        // Ensure a TLS crypto provider is installed (reqwest uses rustls-no-provider).
        // The `Err` case just means it was already installed — safe to ignore.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder().build()?;
        let base_url = base_url.trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// Build the full URL for a given API path.
    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Start a request, attaching the bearer token when a session exists.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, self.api_url(path));
        match self.session.read() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Check the HTTP response status. A 401 invalidates the stored
    /// session; any other non-success status maps to [`ApiError::Api`]
    /// with the backend's error message when the body carries one.
    async fn check(&self, resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            debug!("401 from backend, clearing stored session");
            self.session.clear();
            return Err(ApiError::AuthRequired);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }
        Ok(resp)
    }

    // =========================================================================
    // QR artifacts
    // =========================================================================

    /// Generate a new QR artifact.
    pub async fn generate(&self, req: &GenerateRequest) -> Result<Artifact, ApiError> {
        let resp = self
            .request(Method::POST, "/qr/generate")
            .json(req)
            .send()
            .await?;
        Ok(self.check(resp).await?.json().await?)
    }

    /// List the authenticated user's artifacts.
    pub async fn list_artifacts(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<ListArtifactsResponse, ApiError> {
        let resp = self
            .request(
                Method::GET,
                &format!("/qr/user/list?page={page}&limit={limit}"),
            )
            .send()
            .await?;
        Ok(self.check(resp).await?.json().await?)
    }

    /// Fetch a single artifact by id.
    pub async fn get_artifact(&self, id: &str) -> Result<Artifact, ApiError> {
        let resp = self.request(Method::GET, &format!("/qr/{id}")).send().await?;
        Ok(self.check(resp).await?.json().await?)
    }

    /// Update an artifact's editable fields.
    pub async fn update_artifact(
        &self,
        id: &str,
        req: &UpdateArtifactRequest,
    ) -> Result<Artifact, ApiError> {
        let resp = self
            .request(Method::PUT, &format!("/qr/{id}"))
            .json(req)
            .send()
            .await?;
        Ok(self.check(resp).await?.json().await?)
    }

    /// Delete an artifact.
    pub async fn delete_artifact(&self, id: &str) -> Result<(), ApiError> {
        let resp = self
            .request(Method::DELETE, &format!("/qr/{id}"))
            .send()
            .await?;
        self.check(resp).await?;
        Ok(())
    }

    /// Fetch a server-rendered export body. The response is treated as an
    /// opaque binary payload; note that the backend currently serves PNG
    /// bytes for `pdf` requests.
    pub async fn download(&self, id: &str, format: DownloadFormat) -> Result<Vec<u8>, ApiError> {
        let resp = self
            .request(
                Method::GET,
                &format!("/qr/download/{id}/{}", format.as_str()),
            )
            .send()
            .await?;
        let resp = self.check(resp).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    // =========================================================================
    // Analytics
    // =========================================================================

    /// Account-wide analytics overview.
    pub async fn dashboard_analytics(&self) -> Result<DashboardAnalytics, ApiError> {
        let resp = self.request(Method::GET, "/analytics/overview").send().await?;
        Ok(self.check(resp).await?.json().await?)
    }

    /// Per-artifact analytics detail.
    pub async fn artifact_analytics(&self, id: &str) -> Result<ArtifactAnalytics, ApiError> {
        let resp = self
            .request(Method::GET, &format!("/analytics/qr/{id}"))
            .send()
            .await?;
        Ok(self.check(resp).await?.json().await?)
    }

    // =========================================================================
    // Billing
    // =========================================================================

    /// Advertised plans with the billing publishable key.
    pub async fn plans(&self) -> Result<PlansResponse, ApiError> {
        let resp = self.request(Method::GET, "/billing/plans").send().await?;
        Ok(self.check(resp).await?.json().await?)
    }

    /// Create a hosted checkout session for a plan upgrade.
    pub async fn create_checkout_session(&self, plan: Plan) -> Result<CheckoutSession, ApiError> {
        let req = CheckoutRequest {
            plan_type: plan.as_str().to_string(),
        };
        let resp = self
            .request(Method::POST, "/billing/create-checkout-session")
            .json(&req)
            .send()
            .await?;
        Ok(self.check(resp).await?.json().await?)
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Register a new account. Stores the returned token in the session.
    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let resp = self
            .request(Method::POST, "/auth/register")
            .json(req)
            .send()
            .await?;
        let auth: AuthResponse = self.check(resp).await?.json().await?;
        self.session.write(&auth.token);
        Ok(auth)
    }

    /// Log in. Stores the returned token in the session.
    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let resp = self
            .request(Method::POST, "/auth/login")
            .json(req)
            .send()
            .await?;
        let auth: AuthResponse = self.check(resp).await?.json().await?;
        self.session.write(&auth.token);
        Ok(auth)
    }

    /// Fetch the authenticated account profile.
    pub async fn me(&self) -> Result<Account, ApiError> {
        let resp = self.request(Method::GET, "/auth/me").send().await?;
        let me: MeResponse = self.check(resp).await?.json().await?;
        Ok(me.user)
    }

    /// Update the profile display name.
    pub async fn update_profile(&self, name: &str) -> Result<Account, ApiError> {
        let req = UpdateProfileRequest { name: name.into() };
        let resp = self
            .request(Method::PUT, "/auth/profile")
            .json(&req)
            .send()
            .await?;
        let me: MeResponse = self.check(resp).await?.json().await?;
        Ok(me.user)
    }
}

/// Best error message for a failed response: the backend's `error` (or
/// `message`) field when the body is JSON, else the canonical status
/// reason.
pub(crate) fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string())
}
