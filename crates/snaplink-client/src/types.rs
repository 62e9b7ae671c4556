//! Request and response payloads for the SnapLink backend.
//!
//! Serialization structs for the endpoints the client calls; artifact and
//! analytics bodies deserialize into the `snaplink-core` domain types.

use serde::{Deserialize, Serialize};

use snaplink_core::models::{Account, Artifact, Pagination};

/// Response of `GET /qr/user/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListArtifactsResponse {
    #[serde(rename = "qrCodes", default)]
    pub artifacts: Vec<Artifact>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Body of `PUT /qr/{id}`. Only title, description, and the active flag
/// are editable; everything else requires re-generation.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArtifactRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Response of `GET /billing/plans`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlansResponse {
    #[serde(default)]
    pub plans: Vec<PlanOffer>,
    #[serde(rename = "publishableKey", default)]
    pub publishable_key: Option<String>,
}

/// One purchasable plan as advertised by the backend. Deserialized
/// leniently: unknown plan types stay as strings so new tiers render
/// without a client update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOffer {
    #[serde(default)]
    pub plan_type: String,
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
}

/// Body of `POST /billing/create-checkout-session`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    #[serde(rename = "planType")]
    pub plan_type: String,
}

/// Hosted checkout handoff: the client only redirects to this URL.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub url: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response of login/register: the bearer token plus the account profile.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: Account,
}

/// Response of `GET /auth/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub user: Account,
}

/// Body of `PUT /auth/profile`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateProfileRequest {
    pub name: String,
}
