//! Scry - Container Registry Metadata Resolver
//!
//! Scry discovers the container image repositories of one fixed
//! registry/organization pairing, lists their tags, and extracts
//! human-readable descriptions by walking the OCI distribution protocol
//! (token exchange → manifest → manifest-index → config blob → label) —
//! without ever pulling an image.
//!
//! # Quick Start
//!
//! ```no_run
//! use libscry::Scry;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scry = Scry::connect("acme")?;
//!
//!     let packages = scry.list_packages(false).await;
//!     let packages = scry.enrich(packages, false).await;
//!     for entry in packages {
//!         println!("{}\t{}", entry.name, entry.description);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - **Description resolution**: manifest → index → config-blob walk,
//!   preferring a configured platform, reading the
//!   `org.opencontainers.image.description` label
//! - **Token brokering**: anonymous exchange first, then identity-based
//!   fallbacks; a missing token is a valid outcome, not an error
//! - **Session caching**: TTL-scoped tables for the org listing, tokens,
//!   tag lists, and descriptions, with targeted invalidation
//! - **Progressive enrichment**: concurrent per-repository resolution
//!   merging results as they complete
//!
//! # Main Types
//!
//! - [`Scry`] - Main entry point
//! - [`ScryBuilder`] - Builder for advanced configuration
//! - [`PackageEntry`] - One discovered repository plus its description
//! - [`RepositoryRef`] - Parsed repository reference
//! - [`Credentials`] - Authentication material
//!
//! # Architecture
//!
//! The high-level [`Scry`] facade is the recommended surface. The
//! low-level modules (client, resolver, cache, oci) are public for
//! fine-grained use but hidden from the documentation.

#![warn(clippy::all)]

/// Returns the libscry crate version.
///
/// # Examples
///
/// ```
/// let version = libscry::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// High-level public API (main entry point)
mod scry;
pub use scry::{Scry, ScryBuilder};

// Re-export commonly used types for convenience
pub use auth::Credentials;
pub use config::Config;
pub use error::{Result, ScryError};
pub use oci::ManifestOrIndex;
pub use reference::RepositoryRef;
pub use resolver::{PackageEntry, Resolver};

// Low-level implementation modules (hidden from docs but still public)
#[doc(hidden)]
pub mod auth;
#[doc(hidden)]
pub mod cache;
#[doc(hidden)]
pub mod client;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod error;
#[doc(hidden)]
pub mod oci;
#[doc(hidden)]
pub mod reference;
#[doc(hidden)]
pub mod resolver;
#[doc(hidden)]
pub mod tags;
