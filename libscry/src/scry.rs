//! High-level API for the Scry library.
//!
//! [`Scry`] wires the client, resolver, cache, and credential store
//! together for one registry/organization pairing, and accepts free-form
//! user input where a UI would supply it.
//!
//! # Examples
//!
//! ```no_run
//! use libscry::Scry;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scry = Scry::connect("acme")?;
//!
//!     // Discover packages, then fill in descriptions from the registry.
//!     let packages = scry.list_packages(false).await;
//!     let packages = scry.enrich(packages, false).await;
//!     for entry in &packages {
//!         println!("{}: {}", entry.name, entry.description);
//!     }
//!
//!     // Tags for a typed search term.
//!     let tags = scry.list_tags("ghcr.io/acme/web", false).await?;
//!     println!("{:?}", tags);
//!
//!     Ok(())
//! }
//! ```

use crate::auth::{CredentialStore, Credentials, FileCredentialStore};
use crate::client::{Client, ClientConfig};
use crate::config::Config;
use crate::error::Result;
use crate::reference::RepositoryRef;
use crate::resolver::{PackageEntry, Resolver};
use std::path::PathBuf;

/// High-level interface for resolving repository metadata under one
/// registry/organization pairing.
///
/// # Examples
///
/// ```no_run
/// use libscry::{Credentials, Scry};
///
/// # fn example() -> libscry::error::Result<()> {
/// let mut scry = Scry::builder()
///     .organization("acme")
///     .with_credentials(Credentials::basic("", "ghp_example"))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct Scry {
    resolver: Resolver,
    registry_url: String,
    /// Host aliases recognized when parsing free-form input.
    aliases: Vec<String>,
}

impl Scry {
    /// Connects to the default registry pairing for `organization`.
    pub fn connect(organization: &str) -> Result<Self> {
        Self::builder().organization(organization).build()
    }

    /// Creates a builder for advanced configuration.
    pub fn builder() -> ScryBuilder {
        ScryBuilder::new()
    }

    /// The organization this instance resolves.
    pub fn organization(&self) -> &str {
        self.resolver.namespace()
    }

    /// The base registry URL.
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// Sets credentials for token exchange and the metadata API.
    pub fn login(&mut self, credentials: Credentials) {
        self.resolver.set_credentials(credentials);
    }

    /// Clears credentials and switches to anonymous access.
    pub fn logout(&mut self) {
        self.resolver.clear_credentials();
    }

    /// Parses free-form user input into a repository reference.
    pub fn parse(&self, input: &str) -> Result<RepositoryRef> {
        RepositoryRef::from_input(input, self.organization(), &self.aliases)
    }

    /// Lists the organization's packages. Descriptions come from the
    /// side-channel listing and may be empty; see [`Scry::enrich`].
    pub async fn list_packages(&self, bypass_cache: bool) -> Vec<PackageEntry> {
        self.resolver.list_packages(bypass_cache).await
    }

    /// Concurrently resolves missing descriptions against `latest`.
    pub async fn enrich(
        &self,
        entries: Vec<PackageEntry>,
        bypass_cache: bool,
    ) -> Vec<PackageEntry> {
        self.resolver.enrich(entries, bypass_cache).await
    }

    /// Like [`Scry::enrich`], invoking `observer` as each description
    /// merges in, in completion order.
    pub async fn enrich_with<F>(
        &self,
        entries: Vec<PackageEntry>,
        bypass_cache: bool,
        observer: F,
    ) -> Vec<PackageEntry>
    where
        F: FnMut(usize, &PackageEntry),
    {
        self.resolver
            .enrich_with(entries, bypass_cache, observer)
            .await
    }

    /// Lists tags for a typed search term, in canonical order.
    ///
    /// Input parsing failures are the caller's to handle; resolution
    /// failures degrade to an empty list.
    pub async fn list_tags(&self, input: &str, bypass_cache: bool) -> Result<Vec<String>> {
        let repository = self.parse(input)?;
        Ok(self.resolver.list_tags(&repository, bypass_cache).await)
    }

    /// Resolves the description for a typed search term and tag.
    ///
    /// `Ok(None)` means the resolution chain failed; `Ok(Some(""))` means
    /// the image has no description label.
    pub async fn describe(
        &self,
        input: &str,
        tag: &str,
        bypass_cache: bool,
    ) -> Result<Option<String>> {
        let repository = self.parse(input)?;
        Ok(self.resolver.describe(&repository, tag, bypass_cache).await)
    }

    /// Drops cached tokens, tag lists, and descriptions for the given
    /// repositories — the "reload" operation. Other repositories and the
    /// org listing keep their entries.
    pub fn reload(&self, visible: &[RepositoryRef]) {
        self.resolver.invalidate(visible);
    }

    /// Access to the underlying resolver for callers that already hold
    /// parsed references.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }
}

/// Builder for creating a [`Scry`] instance.
///
/// # Examples
///
/// ```no_run
/// use libscry::Scry;
///
/// # fn example() -> libscry::error::Result<()> {
/// let scry = Scry::builder()
///     .organization("acme")
///     .registry_url("https://ghcr.io")
///     .api_url("https://api.github.com")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ScryBuilder {
    organization: Option<String>,
    registry_url: Option<String>,
    api_url: Option<String>,
    config: Option<Config>,
    config_file: Option<PathBuf>,
    credentials: Option<Credentials>,
    credentials_file: Option<PathBuf>,
}

impl ScryBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            organization: None,
            registry_url: None,
            api_url: None,
            config: None,
            config_file: None,
            credentials: None,
            credentials_file: None,
        }
    }

    /// Sets the organization whose packages are resolved.
    pub fn organization(mut self, organization: &str) -> Self {
        self.organization = Some(organization.to_string());
        self
    }

    /// Overrides the registry URL.
    pub fn registry_url(mut self, url: &str) -> Self {
        self.registry_url = Some(url.to_string());
        self
    }

    /// Overrides the metadata API URL.
    pub fn api_url(mut self, url: &str) -> Self {
        self.api_url = Some(url.to_string());
        self
    }

    /// Sets configuration directly.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Loads configuration from a YAML file at build time.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Sets credentials directly.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Reads credentials for the registry host from a credential store
    /// file at build time. Explicit credentials take precedence.
    pub fn with_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    /// Builds the [`Scry`] instance.
    pub fn build(self) -> Result<Scry> {
        let mut config = match (self.config, self.config_file) {
            (Some(config), _) => config,
            (None, Some(path)) => Config::load(Some(&path))?,
            (None, None) => Config::default(),
        };

        if let Some(organization) = self.organization {
            config.registry.organization = organization;
        }
        if let Some(url) = self.registry_url {
            config.registry.url = url;
        }
        if let Some(url) = self.api_url {
            config.registry.api_url = url;
        }

        let client = Client::with_config(
            &config.registry.url,
            &config.registry.api_url,
            ClientConfig::new().with_timeout(config.network.timeout),
        )?;

        let registry_url = client.registry_url().to_string();
        let registry_host = registry_url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .to_string();

        let credentials = match (self.credentials, self.credentials_file) {
            (Some(credentials), _) => Some(credentials),
            (None, Some(path)) => FileCredentialStore::new(path)?.get(&registry_host)?,
            (None, None) => None,
        };

        let resolver = Resolver::new(client, &config, credentials)?;

        Ok(Scry {
            resolver,
            registry_url,
            aliases: vec![registry_host],
        })
    }
}

impl Default for ScryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
