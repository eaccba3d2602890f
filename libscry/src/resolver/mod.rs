//! Resolution pipeline: token broker, tag lister, manifest resolver,
//! label extractor, package discovery, and the enrichment fan-out.
//!
//! Every operation here has a well-defined "nothing found" result;
//! transport and protocol failures are logged and downgraded, never
//! propagated. The four cache tables in [`ResolutionCache`] are the only
//! shared state, and clones of a [`Resolver`] share them.

use crate::auth::Credentials;
use crate::cache::{KeyedCache, SingletonCache};
use crate::client::{Client, PackageRecord};
use crate::config::{Config, Resolve};
use crate::error::{Result, ScryError};
use crate::oci::{self, ManifestOrIndex};
use crate::reference::RepositoryRef;
use crate::tags;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, warn};

#[cfg(test)]
mod tests;

/// One discovered package: a repository plus its human-readable
/// description. The description may be empty and fills in asynchronously
/// through enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    /// The repository under the fixed namespace
    pub name: RepositoryRef,
    /// Human-readable description; empty when unknown
    pub description: String,
}

/// The four TTL tables of the resolution cache.
///
/// Keys: none (org listing), repository path (tokens, tag lists), and
/// `path:tag` (descriptions).
pub(crate) struct ResolutionCache {
    pub(crate) listing: SingletonCache<Vec<PackageEntry>>,
    pub(crate) tokens: KeyedCache<String>,
    pub(crate) tag_lists: KeyedCache<Vec<String>>,
    pub(crate) descriptions: KeyedCache<String>,
}

impl ResolutionCache {
    fn new(config: &crate::config::Cache) -> Result<Self> {
        let capacity = NonZeroUsize::new(config.limits.entries).ok_or_else(|| {
            ScryError::config("cache.limits.entries must be non-zero", None)
        })?;

        Ok(Self {
            listing: SingletonCache::new(Duration::from_secs(config.ttl.listing)),
            tokens: KeyedCache::new(capacity, Duration::from_secs(config.ttl.token)),
            tag_lists: KeyedCache::new(capacity, Duration::from_secs(config.ttl.tags)),
            descriptions: KeyedCache::new(capacity, Duration::from_secs(config.ttl.description)),
        })
    }
}

/// Resolves repository metadata for the fixed registry namespace.
///
/// Cloning is cheap; clones share the cache tables, so a clone handed to
/// a spawned task writes through the same cache as its parent.
#[derive(Clone)]
pub struct Resolver {
    client: Client,
    namespace: String,
    resolve: Resolve,
    cache: Arc<ResolutionCache>,
    credentials: Option<Credentials>,
}

impl Resolver {
    /// Creates a resolver from a client and configuration.
    ///
    /// Fails if the configuration names no organization.
    pub fn new(client: Client, config: &Config, credentials: Option<Credentials>) -> Result<Self> {
        if config.registry.organization.is_empty() {
            return Err(ScryError::config(
                "registry.organization must be set",
                None,
            ));
        }

        Ok(Self {
            client,
            namespace: config.registry.organization.clone(),
            resolve: config.resolve.clone(),
            cache: Arc::new(ResolutionCache::new(&config.cache)?),
            credentials,
        })
    }

    /// The fixed organization/namespace this resolver targets.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Sets the credentials used for token exchange and the metadata API.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    /// Clears credentials, switching to anonymous access.
    pub fn clear_credentials(&mut self) {
        self.credentials = None;
    }

    /// Acquires a pull-scoped bearer token for a repository.
    ///
    /// Anonymous exchange is tried first, then identity-based exchange
    /// with the configured username or the fallback identity list. An
    /// empty string means "no token" and is a valid outcome — it is
    /// cached like any other, and downstream requests fall back to
    /// anonymous access.
    pub async fn acquire_token(&self, repository: &RepositoryRef, bypass_cache: bool) -> String {
        let key = repository.path();

        if !bypass_cache && let Some(token) = self.cache.tokens.get(&key) {
            return token;
        }

        let token = self.exchange_token(repository).await;
        self.cache.tokens.put(&key, token.clone());
        token
    }

    async fn exchange_token(&self, repository: &RepositoryRef) -> String {
        let path = repository.path();

        match self.client.fetch_token(&path, None).await {
            Ok(token) if !token.is_empty() => return token,
            Ok(_) => {}
            Err(e) => debug!(repository = %path, error = %e, "anonymous token request failed"),
        }

        let Some(secret) = self.credentials.as_ref().and_then(|c| c.secret()) else {
            return String::new();
        };

        let identities: Vec<String> = match self.credentials.as_ref().and_then(|c| c.username()) {
            Some(username) => vec![username.to_string()],
            None => self.resolve.fallback_identities.clone(),
        };

        for identity in &identities {
            match self
                .client
                .fetch_token(&path, Some((identity.as_str(), secret)))
                .await
            {
                Ok(token) if !token.is_empty() => return token,
                Ok(_) => {}
                Err(e) => {
                    debug!(repository = %path, error = %e, "identity token exchange failed")
                }
            }
        }

        String::new()
    }

    /// Lists a repository's tags in canonical order.
    ///
    /// Returns an empty list on any fetch or parse failure.
    pub async fn list_tags(&self, repository: &RepositoryRef, bypass_cache: bool) -> Vec<String> {
        let key = repository.path();

        if !bypass_cache && let Some(tags) = self.cache.tag_lists.get(&key) {
            return tags;
        }

        let token = self.acquire_token(repository, bypass_cache).await;
        match self
            .client
            .fetch_tags(&key, Some(token.as_str()), self.resolve.page_size)
            .await
        {
            Ok(list) => {
                let ordered = tags::canonical_order(list);
                self.cache.tag_lists.put(&key, ordered.clone());
                ordered
            }
            Err(e) => {
                warn!(repository = %key, error = %e, "tag listing failed");
                Vec::new()
            }
        }
    }

    /// Resolves the config blob digest for `repository:reference`.
    ///
    /// Fetches the manifest, and for a multi-platform index selects the
    /// preferred platform's entry (or the first listed one) and follows
    /// it to the concrete manifest. `None` covers every failure shape:
    /// unreachable, malformed, or an empty index.
    pub async fn resolve_config_digest(
        &self,
        repository: &RepositoryRef,
        reference: &str,
    ) -> Option<String> {
        let token = self.acquire_token(repository, false).await;
        self.config_digest_with_token(repository, reference, &token)
            .await
    }

    async fn config_digest_with_token(
        &self,
        repository: &RepositoryRef,
        reference: &str,
        token: &str,
    ) -> Option<String> {
        let path = repository.path();
        let document = self.fetch_document(&path, reference, token).await?;

        match document {
            ManifestOrIndex::Manifest(_) => document.config_digest(),
            ManifestOrIndex::Index(index) => {
                let platform = &self.resolve.platform;
                let descriptor =
                    oci::select_platform(&index, &platform.os, &platform.architecture)?;
                let digest = descriptor.digest().to_string();

                let document = self.fetch_document(&path, &digest, token).await?;
                document.config_digest()
            }
        }
    }

    async fn fetch_document(
        &self,
        path: &str,
        reference: &str,
        token: &str,
    ) -> Option<ManifestOrIndex> {
        let bytes = match self
            .client
            .fetch_manifest(path, reference, Some(token))
            .await
        {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(repository = %path, reference = %reference, error = %e, "manifest fetch failed");
                return None;
            }
        };

        match ManifestOrIndex::from_bytes(&bytes) {
            Ok(document) => Some(document),
            Err(e) => {
                debug!(repository = %path, reference = %reference, error = %e, "manifest parse failed");
                None
            }
        }
    }

    /// Extracts the description label from the config blob at `digest`.
    ///
    /// `None` means the blob was unfetchable or unparsable; `Some("")`
    /// means the image has no description label.
    pub async fn extract_description(
        &self,
        repository: &RepositoryRef,
        digest: &str,
    ) -> Option<String> {
        let token = self.acquire_token(repository, false).await;
        self.description_from_blob(repository, digest, &token).await
    }

    async fn description_from_blob(
        &self,
        repository: &RepositoryRef,
        digest: &str,
        token: &str,
    ) -> Option<String> {
        let path = repository.path();
        let bytes = match self.client.fetch_blob(&path, digest, Some(token)).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(repository = %path, digest = %digest, error = %e, "config blob fetch failed");
                return None;
            }
        };

        oci::description_from_config(&bytes)
    }

    /// Runs the full token → manifest → config → label chain for one
    /// repository and tag, with the description cache in front.
    ///
    /// `None` means the chain failed and nothing was cached; `Some("")`
    /// means the image resolved and carries no description.
    pub async fn describe(
        &self,
        repository: &RepositoryRef,
        tag: &str,
        bypass_cache: bool,
    ) -> Option<String> {
        let key = format!("{}:{}", repository.path(), tag);

        if !bypass_cache && let Some(description) = self.cache.descriptions.get(&key) {
            return Some(description);
        }

        let token = self.acquire_token(repository, bypass_cache).await;
        let digest = self
            .config_digest_with_token(repository, tag, &token)
            .await?;
        let description = self
            .description_from_blob(repository, &digest, &token)
            .await?;

        self.cache.descriptions.put(&key, description.clone());
        Some(description)
    }

    /// Lists the organization's container packages from the metadata API.
    ///
    /// Descriptions come from the side-channel listing and may be empty;
    /// [`Resolver::enrich`] fills them in from the registry. Any failure
    /// degrades to an empty list and is not cached.
    pub async fn list_packages(&self, bypass_cache: bool) -> Vec<PackageEntry> {
        if !bypass_cache && let Some(listing) = self.cache.listing.get() {
            return listing;
        }

        let bearer = self.credentials.as_ref().and_then(|c| c.secret());
        let records = match self
            .client
            .fetch_org_packages(&self.namespace, self.resolve.page_size, bearer)
            .await
        {
            Ok(records) => records,
            Err(e) => {
                warn!(organization = %self.namespace, error = %e, "package listing failed");
                return Vec::new();
            }
        };

        let entries = entries_from_records(&self.namespace, records);
        self.cache.listing.put(entries.clone());
        entries
    }

    /// Concurrently resolves descriptions for every entry still lacking
    /// one, against the `latest` tag.
    ///
    /// Failure is silent and per-entry: an entry whose chain fails keeps
    /// its original description.
    pub async fn enrich(
        &self,
        entries: Vec<PackageEntry>,
        bypass_cache: bool,
    ) -> Vec<PackageEntry> {
        self.enrich_with(entries, bypass_cache, |_, _| {}).await
    }

    /// Like [`Resolver::enrich`], invoking `observer` with the entry
    /// index as each description merges in, in completion order.
    pub async fn enrich_with<F>(
        &self,
        mut entries: Vec<PackageEntry>,
        bypass_cache: bool,
        mut observer: F,
    ) -> Vec<PackageEntry>
    where
        F: FnMut(usize, &PackageEntry),
    {
        let mut chains = JoinSet::new();

        for (index, entry) in entries.iter().enumerate() {
            if !entry.description.is_empty() {
                continue;
            }

            let resolver = self.clone();
            let repository = entry.name.clone();
            chains.spawn(async move {
                let description = resolver
                    .describe(&repository, tags::LATEST, bypass_cache)
                    .await;
                (index, description)
            });
        }

        while let Some(joined) = chains.join_next().await {
            let Ok((index, description)) = joined else {
                continue;
            };
            if let Some(description) = description
                && !description.is_empty()
            {
                entries[index].description = description;
                observer(index, &entries[index]);
            }
        }

        entries
    }

    /// Invalidates the token, tag-list, and description entries for the
    /// given repositories, leaving everything else cached.
    pub fn invalidate(&self, repositories: &[RepositoryRef]) {
        for repository in repositories {
            let path = repository.path();
            self.cache.tokens.invalidate(&path);
            self.cache.tag_lists.invalidate(&path);
            self.cache.descriptions.invalidate_prefix(&format!("{}:", path));
        }
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &ResolutionCache {
        &self.cache
    }
}

/// Maps package records from the metadata API into namespaced entries,
/// skipping names that do not form a valid repository reference.
fn entries_from_records(namespace: &str, records: Vec<PackageRecord>) -> Vec<PackageEntry> {
    records
        .into_iter()
        .filter_map(|record| match RepositoryRef::new(namespace, &record.name) {
            Ok(name) => Some(PackageEntry {
                name,
                description: record.description.unwrap_or_default(),
            }),
            Err(e) => {
                debug!(package = %record.name, error = %e, "skipping unusable package name");
                None
            }
        })
        .collect()
}
