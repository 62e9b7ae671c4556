//! SnapLink REST API client.
//!
//! Provides a reqwest-based client for the SnapLink backend, covering QR
//! artifact generation and management, analytics, billing, and auth, plus
//! the network half of the file export pipeline.

pub mod client;
pub mod export;
pub mod session;
pub mod types;


pub use client::{ApiClient, ApiError};
pub use export::{export, export_png_large};
pub use session::{MemoryTokenStore, TokenStore};
