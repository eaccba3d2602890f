//! Application configuration.
//!
//! Settings load from a YAML file merged over defaults. Everything here
//! is also settable through [`crate::ScryBuilder`]; the file is optional.

use crate::error::{Result, ScryError};
use config::{Config as ConfigRs, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;


/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub registry: Registry,
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub resolve: Resolve,
    #[serde(default)]
    pub cache: Cache,
}

impl Config {
    /// Parses a `Config` from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let builder = ConfigRs::builder()
            .add_source(Self::defaults_source()?)
            .add_source(File::from_str(s, FileFormat::Yaml));

        Self::from_builder(builder)
    }

    /// Loads a `Config` from an optional file path.
    ///
    /// With no path, the defaults are returned.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigRs::builder().add_source(Self::defaults_source()?);

        if let Some(p) = path {
            builder = builder.add_source(File::from(p).required(true));
        }

        Self::from_builder(builder)
    }

    fn defaults_source() -> Result<ConfigRs> {
        ConfigRs::try_from(&Config::default()).map_err(|e| {
            ScryError::config_with_source(
                "Failed to build default configuration",
                None::<&str>,
                e,
            )
        })
    }

    fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                ScryError::config_with_source(
                    "Failed to deserialize configuration",
                    None::<&str>,
                    e,
                )
            })
    }
}

/// The fixed registry/organization pairing and its metadata API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registry {
    #[serde(default = "default_registry_url")]
    pub url: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// The organization whose packages are resolved. Must be set here or
    /// through the builder.
    #[serde(default)]
    pub organization: String,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            url: default_registry_url(),
            api_url: default_api_url(),
            organization: String::new(),
        }
    }
}

fn default_registry_url() -> String {
    "https://ghcr.io".to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

/// Network settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Network {
    /// Per-request timeout in seconds.
    #[serde(default = "default_network_timeout")]
    pub timeout: u64,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            timeout: default_network_timeout(),
        }
    }
}

fn default_network_timeout() -> u64 {
    20
}

/// Resolution behavior knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resolve {
    #[serde(default)]
    pub platform: PlatformPreference,

    /// Usernames tried, in order, for identity-based token exchange when
    /// no username is configured.
    #[serde(default = "default_fallback_identities")]
    pub fallback_identities: Vec<String>,

    /// Page size for tag and package listings.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for Resolve {
    fn default() -> Self {
        Self {
            platform: PlatformPreference::default(),
            fallback_identities: default_fallback_identities(),
            page_size: default_page_size(),
        }
    }
}

fn default_fallback_identities() -> Vec<String> {
    vec![
        String::new(),
        "token".to_string(),
        "oauth2accesstoken".to_string(),
    ]
}

fn default_page_size() -> usize {
    100
}

/// The preferred platform when a manifest index offers several.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformPreference {
    #[serde(default = "default_platform_os")]
    pub os: String,

    #[serde(default = "default_platform_architecture")]
    pub architecture: String,
}

impl Default for PlatformPreference {
    fn default() -> Self {
        Self {
            os: default_platform_os(),
            architecture: default_platform_architecture(),
        }
    }
}

fn default_platform_os() -> String {
    "linux".to_string()
}

fn default_platform_architecture() -> String {
    "amd64".to_string()
}

/// Cache settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Cache {
    #[serde(default)]
    pub ttl: CacheTtl,

    #[serde(default)]
    pub limits: CacheLimits,
}

/// Cache time-to-live settings in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheTtl {
    #[serde(default = "default_cache_ttl_listing")]
    pub listing: u64,

    #[serde(default = "default_cache_ttl_token")]
    pub token: u64,

    #[serde(default = "default_cache_ttl_tags")]
    pub tags: u64,

    #[serde(default = "default_cache_ttl_description")]
    pub description: u64,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            listing: default_cache_ttl_listing(),
            token: default_cache_ttl_token(),
            tags: default_cache_ttl_tags(),
            description: default_cache_ttl_description(),
        }
    }
}

fn default_cache_ttl_listing() -> u64 {
    1800 // 30 minutes - the org package set changes rarely
}

fn default_cache_ttl_token() -> u64 {
    86400 // session-scale; explicit invalidation is the real bound
}

fn default_cache_ttl_tags() -> u64 {
    86400
}

fn default_cache_ttl_description() -> u64 {
    86400
}

/// Per-table entry limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheLimits {
    #[serde(default = "default_cache_limits_entries")]
    pub entries: usize,
}

impl Default for CacheLimits {
    fn default() -> Self {
        Self {
            entries: default_cache_limits_entries(),
        }
    }
}

fn default_cache_limits_entries() -> usize {
    1024
}
