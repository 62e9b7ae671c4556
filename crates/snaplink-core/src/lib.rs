//! SnapLink Core Library
//!
//! Shared functionality for SnapLink components:
//! - Domain models for QR artifacts, accounts, and analytics
//! - Plan entitlement evaluation
//! - File export pipeline (data-URL decoding, atomic saves)
//! - Generation flow state machine
//! - Common error types

pub mod entitlements;
pub mod error;
pub mod export;
pub mod generate;
pub mod models;
pub mod tracing_init;

pub use entitlements::{Action, Decision, Entitlements, Plan, PlanLimits, Usage};
pub use error::{Error, Result};
pub use export::{DownloadFormat, SaveCommand, Saver};
pub use models::{Account, Artifact, ErrorCorrectionLevel};
