//! SnapLink backend API response types.
//!
//! Deserialization structs matching the backend's JSON contract. The wire
//! format is camelCase; a few legacy keys (`qrCodeData`, `originalUrl`)
//! are renamed to their domain names here.

use serde::{Deserialize, Serialize};

/// A generated QR code record with its encoded image and metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Server-assigned opaque identifier.
    pub id: String,
    /// Self-contained encoded image (`data:<mime>;base64,<payload>`).
    /// Absent until the backend has rendered the code.
    #[serde(rename = "qrCodeData", default)]
    pub image_data_url: Option<String>,
    /// Redirect alias used for scan tracking.
    pub short_url: String,
    pub short_id: String,
    /// Destination the code encodes. Changes only via re-generation.
    #[serde(rename = "originalUrl")]
    pub target_url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: String,
    pub customization: Customization,
    #[serde(default)]
    pub analytics: Option<AnalyticsSummary>,
    /// Scan redirects are served only while active. Server is the source
    /// of truth; older records omit the flag.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl Artifact {
    /// Identifier used in filenames and display: the short id when the
    /// backend assigned one, otherwise the record id.
    pub fn short_id_or_id(&self) -> &str {
        if self.short_id.is_empty() {
            &self.id
        } else {
            &self.short_id
        }
    }
}

/// Rendering options fixed at creation time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    pub size: u32,
    pub error_correction_level: ErrorCorrectionLevel,
    pub foreground_color: String,
    pub background_color: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// QR error correction level, ordered by increasing redundancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum ErrorCorrectionLevel {
    #[serde(rename = "L")]
    Low,
    #[serde(rename = "M")]
    #[default]
    Medium,
    #[serde(rename = "Q")]
    Quartile,
    #[serde(rename = "H")]
    High,
}

impl ErrorCorrectionLevel {
    /// Human-readable label with the recovery percentage.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low (7%)",
            Self::Medium => "Medium (15%)",
            Self::Quartile => "Quartile (25%)",
            Self::High => "High (30%)",
        }
    }

    /// Wire value accepted by the generate endpoint.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "L",
            Self::Medium => "M",
            Self::Quartile => "Q",
            Self::High => "H",
        }
    }

    /// Parse a wire value, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "L" => Some(Self::Low),
            "M" => Some(Self::Medium),
            "Q" => Some(Self::Quartile),
            "H" => Some(Self::High),
            _ => None,
        }
    }
}

/// Aggregate scan counters embedded in an artifact record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_scans: u64,
    #[serde(default)]
    pub last_scanned: Option<String>,
}

/// Authenticated user profile with plan entitlements.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub email: String,
    pub name: String,
    pub plan: crate::entitlements::Plan,
    pub limits: crate::entitlements::PlanLimits,
    #[serde(default)]
    pub usage: Option<crate::entitlements::Usage>,
    #[serde(default)]
    pub subscription: Option<Subscription>,
}

/// Billing subscription status (read-only mirror of the billing provider).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub is_active: bool,
    #[serde(default)]
    pub current_period_end: Option<String>,
}

/// Pagination envelope returned by list endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current: u32,
    pub total: u32,
    pub count: u32,
    pub total_items: u64,
}

/// Per-artifact analytics detail.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactAnalytics {
    pub total_scans: u64,
    #[serde(default)]
    pub last_scanned: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub recent_scans: Vec<ScanEvent>,
    #[serde(default)]
    pub daily_scans: Vec<DailyScans>,
    #[serde(default)]
    pub device_stats: Vec<DeviceStat>,
    #[serde(default)]
    pub location_stats: Vec<LocationStat>,
}

/// A single recorded scan.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEvent {
    pub timestamp: String,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub location: Option<ScanLocation>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanLocation {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Scans bucketed by day.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyScans {
    pub date: String,
    pub scans: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceStat {
    pub device: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationStat {
    pub country: String,
    pub count: u64,
}

/// Account-wide analytics overview.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAnalytics {
    pub overview: DashboardOverview,
    #[serde(default)]
    pub recent_activity: Vec<RecentActivity>,
    #[serde(default)]
    pub top_performing: Vec<TopArtifact>,
    #[serde(default)]
    pub chart_data: Option<ChartData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    #[serde(rename = "totalQRCodes")]
    pub total_artifacts: u64,
    #[serde(rename = "activeQRCodes")]
    pub active_artifacts: u64,
    pub total_scans: u64,
    pub scans_this_month: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    #[serde(rename = "qrCodeId")]
    pub artifact_id: String,
    pub title: String,
    pub short_id: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopArtifact {
    pub id: String,
    pub title: String,
    pub short_id: String,
    pub total_scans: u64,
    #[serde(default)]
    pub last_scanned: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    #[serde(default)]
    pub daily_scans: Vec<DailyScans>,
}
