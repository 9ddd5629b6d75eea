//! # anigate
//!
//! A caching, retrying gateway client for the AniList GraphQL API.
//!
//! Every outbound call goes through [`GatewayClient::request`], which
//! memoizes replies for five minutes per (query, variables) pair, retries
//! transient HTTP failures with exponential backoff (1s, 2s, 4s), and
//! reduces every failure to a [`GatewayError`]. The [`anilist`] module layers
//! typed accessors for the catalog pages on top.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use anigate::{ClientConfig, GatewayClient, anilist::AniList};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GatewayClient::new(&ClientConfig::default())?;
//!     let anilist = AniList::new(client);
//!
//!     let details = anilist.details(1).await?;
//!     println!("{} ({:?})", details.display_title(), details.status);
//!     Ok(())
//! }
//! ```

pub mod anilist;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use client::{GatewayClient, RetryPolicy};
pub use config::{ClientConfig, ConfigError};
pub use error::GatewayError;
pub use http::Variables;
