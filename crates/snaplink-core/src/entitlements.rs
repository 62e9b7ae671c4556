//! Plan entitlement evaluation.
//!
//! Maps a subscription plan plus usage counters to allowed client actions.
//! Evaluation is pure and stateless; limits come from the backend and the
//! client never invents them. The backend's own validation stays
//! authoritative — these checks are a UX guard, not a security boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::export::DownloadFormat;
use crate::models::Account;

/// Fraction of the artifact quota at which a non-blocking warning is shown.
pub const USAGE_WARNING_RATIO: f64 = 0.8;

/// Subscription tier, ordered by increasing capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
    Business,
    Enterprise,
}

impl Plan {
    /// Wire value, also used in display messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Business => "business",
            Self::Enterprise => "enterprise",
        }
    }

    /// Parse a wire value, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "free" => Some(Self::Free),
            "pro" => Some(Self::Pro),
            "business" => Some(Self::Business),
            "enterprise" => Some(Self::Enterprise),
            _ => None,
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-plan limits supplied by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
    #[serde(rename = "maxQRCodes")]
    pub max_artifacts: u64,
    pub max_scans_per_month: u64,
    pub can_customize: bool,
    pub can_track_analytics: bool,
    pub can_export_data: bool,
}

/// Usage counters maintained by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    #[serde(rename = "qrCodesCreated")]
    pub artifacts_created: u64,
    #[serde(rename = "monthlyScans")]
    pub scans_this_month: u64,
    #[serde(default)]
    pub last_reset_date: Option<String>,
}

/// Client action gated by the entitlement rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateArtifact,
    Customize,
    ViewAnalytics,
    Export(DownloadFormat),
}

/// Result of entitlement evaluation.
#[derive(Debug, Clone)]
pub struct Decision {
    pub allowed: bool,
    /// User-facing denial reason, present when `allowed` is false.
    pub reason: Option<String>,
}

impl Decision {
    fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    fn deny(reason: String) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

/// Evaluated entitlement context for one account (or an anonymous visitor).
#[derive(Debug, Clone)]
pub struct Entitlements {
    pub plan: Plan,
    pub limits: PlanLimits,
    pub usage: Usage,
}

impl Entitlements {
    /// Build from an authenticated account. Missing usage counters are
    /// treated as zero.
    pub fn for_account(account: &Account) -> Self {
        Self {
            plan: account.plan,
            limits: account.limits.clone(),
            usage: account.usage.clone().unwrap_or_default(),
        }
    }

    /// Optimistic entitlements for a visitor who is not logged in:
    /// customization is offered client-side and the backend stays the
    /// final arbiter of everything else.
    pub fn anonymous() -> Self {
        Self {
            plan: Plan::Free,
            limits: PlanLimits {
                max_artifacts: u64::MAX,
                max_scans_per_month: 0,
                can_customize: true,
                can_track_analytics: false,
                can_export_data: false,
            },
            usage: Usage::default(),
        }
    }

    /// Evaluate an action against the entitlement rules, in precedence
    /// order. Rules are a closed set; anything not denied is allowed.
    pub fn evaluate(&self, action: Action) -> Decision {
        match action {
            Action::CreateArtifact => {
                if self.usage.artifacts_created >= self.limits.max_artifacts {
                    return Decision::deny(format!(
                        "Plan limit reached: the {} plan allows {} QR codes. Upgrade to create more.",
                        self.plan, self.limits.max_artifacts
                    ));
                }
                Decision::allow()
            }
            Action::Customize => {
                if !self.limits.can_customize {
                    return Decision::deny(format!(
                        "Customization is not included in the {} plan.",
                        self.plan
                    ));
                }
                Decision::allow()
            }
            Action::ViewAnalytics => {
                if !self.limits.can_track_analytics {
                    return Decision::deny(format!(
                        "Analytics tracking is not included in the {} plan. Upgrade to view scan data.",
                        self.plan
                    ));
                }
                Decision::allow()
            }
            Action::Export(format) => {
                if format.requires_export_entitlement() && !self.limits.can_export_data {
                    return Decision::deny(format!(
                        "{} export is not included in the {} plan. Upgrade to download this format.",
                        format.label(),
                        self.plan
                    ));
                }
                Decision::allow()
            }
        }
    }

    /// Non-blocking warning once usage crosses [`USAGE_WARNING_RATIO`] of
    /// the artifact quota. Distinct from the hard deny at 100%, which rule
    /// one enforces regardless of this banner.
    pub fn usage_warning(&self) -> Option<String> {
        if self.limits.max_artifacts == 0 || self.limits.max_artifacts == u64::MAX {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.usage.artifacts_created as f64 / self.limits.max_artifacts as f64;
        if ratio >= USAGE_WARNING_RATIO {
            Some(format!(
                "You've used {} of {} QR codes on the {} plan.",
                self.usage.artifacts_created, self.limits.max_artifacts, self.plan
            ))
        } else {
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn free_limits() -> PlanLimits {
        PlanLimits {
            max_artifacts: 5,
            max_scans_per_month: 100,
            can_customize: false,
            can_track_analytics: false,
            can_export_data: false,
        }
    }

    fn pro_limits() -> PlanLimits {
        PlanLimits {
            max_artifacts: 100,
            max_scans_per_month: 10_000,
            can_customize: true,
            can_track_analytics: true,
            can_export_data: true,
        }
    }

    fn entitlements(plan: Plan, limits: PlanLimits, created: u64) -> Entitlements {
        Entitlements {
            plan,
            limits,
            usage: Usage {
                artifacts_created: created,
                ..Usage::default()
            },
        }
    }

    #[test]
    fn create_denied_at_limit() {
        let ents = entitlements(Plan::Free, free_limits(), 5);
        let decision = ents.evaluate(Action::CreateArtifact);
        assert!(!decision.allowed);
        let reason = decision.reason.unwrap();
        assert!(reason.contains('5'), "reason should carry the limit: {reason}");
        assert!(reason.contains("free"), "reason should carry the plan: {reason}");
    }

    #[test]
    fn create_allowed_below_limit() {
        let ents = entitlements(Plan::Free, free_limits(), 4);
        assert!(ents.evaluate(Action::CreateArtifact).allowed);
    }

    #[test]
    fn warning_fires_at_four_of_five() {
        let ents = entitlements(Plan::Free, free_limits(), 4);
        let warning = ents.usage_warning().unwrap();
        assert!(warning.contains("4 of 5"));
    }

    #[test]
    fn no_warning_below_threshold() {
        let ents = entitlements(Plan::Free, free_limits(), 3);
        assert!(ents.usage_warning().is_none());
    }

    #[test]
    fn customize_denied_on_free() {
        let ents = entitlements(Plan::Free, free_limits(), 0);
        assert!(!ents.evaluate(Action::Customize).allowed);
    }

    #[test]
    fn customize_allowed_for_anonymous() {
        let ents = Entitlements::anonymous();
        assert!(ents.evaluate(Action::Customize).allowed);
        assert!(ents.usage_warning().is_none());
    }

    #[test]
    fn analytics_denied_routes_with_reason() {
        let ents = entitlements(Plan::Free, free_limits(), 0);
        let decision = ents.evaluate(Action::ViewAnalytics);
        assert!(!decision.allowed);
        assert!(decision.reason.unwrap().contains("Upgrade"));
    }

    #[test]
    fn png_export_never_gated() {
        let ents = entitlements(Plan::Free, free_limits(), 0);
        assert!(ents.evaluate(Action::Export(DownloadFormat::Png)).allowed);
    }

    #[test]
    fn svg_and_pdf_export_gated_on_free() {
        let ents = entitlements(Plan::Free, free_limits(), 0);
        assert!(!ents.evaluate(Action::Export(DownloadFormat::Svg)).allowed);
        assert!(!ents.evaluate(Action::Export(DownloadFormat::Pdf)).allowed);
    }

    #[test]
    fn pro_plan_allows_everything() {
        let ents = entitlements(Plan::Pro, pro_limits(), 50);
        assert!(ents.evaluate(Action::CreateArtifact).allowed);
        assert!(ents.evaluate(Action::Customize).allowed);
        assert!(ents.evaluate(Action::ViewAnalytics).allowed);
        assert!(ents.evaluate(Action::Export(DownloadFormat::Svg)).allowed);
        assert!(ents.usage_warning().is_none());
    }

    #[test]
    fn plans_are_ordered() {
        assert!(Plan::Free < Plan::Pro);
        assert!(Plan::Pro < Plan::Business);
        assert!(Plan::Business < Plan::Enterprise);
    }

    #[test]
    fn plan_parse_roundtrip() {
        for plan in [Plan::Free, Plan::Pro, Plan::Business, Plan::Enterprise] {
            assert_eq!(Plan::parse(plan.as_str()), Some(plan));
        }
        assert_eq!(Plan::parse("Pro"), Some(Plan::Pro));
        assert_eq!(Plan::parse("platinum"), None);
    }

    #[test]
    fn deserialize_limits_wire_names() {
        let json = r#"{
            "maxQRCodes": 5,
            "maxScansPerMonth": 100,
            "canCustomize": false,
            "canTrackAnalytics": false,
            "canExportData": false
        }"#;
        let limits: PlanLimits = serde_json::from_str(json).unwrap();
        assert_eq!(limits.max_artifacts, 5);
        assert!(!limits.can_export_data);
    }
}
