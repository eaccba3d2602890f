//! Repository references under the fixed registry namespace.
//!
//! A [`RepositoryRef`] identifies one repository as `{namespace}/{name}`.
//! It is derived from free-form user input (a typed search term, a pasted
//! image reference) by stripping the recognized registry aliases and the
//! namespace prefix.

use crate::error::{Result, ScryError};
use std::fmt;

#[cfg(test)]
mod tests;

/// Identifies one repository under the fixed registry/organization pairing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    namespace: String,
    name: String,
}

impl RepositoryRef {
    /// Creates a reference from an already-split namespace and name.
    ///
    /// Both parts must be non-empty and must not contain path separators.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let namespace = namespace.into();
        let name = name.into();

        if namespace.is_empty() || namespace.contains('/') {
            return Err(ScryError::validation(format!(
                "Invalid repository namespace: '{}'",
                namespace
            )));
        }
        if name.is_empty() || name.contains('/') {
            return Err(ScryError::validation(format!(
                "Invalid repository name: '{}'",
                name
            )));
        }

        Ok(Self { namespace, name })
    }

    /// Derives a reference from free-form input.
    ///
    /// Strips, in order: a URL scheme, any of the recognized registry
    /// `aliases` (host names), the `namespace` prefix, and a trailing
    /// `:tag` portion. Whatever remains must be a bare repository name.
    ///
    /// # Examples
    ///
    /// ```
    /// use libscry::reference::RepositoryRef;
    ///
    /// let aliases = vec!["ghcr.io".to_string()];
    /// let r = RepositoryRef::from_input("ghcr.io/acme/web:1.2", "acme", &aliases).unwrap();
    /// assert_eq!(r.path(), "acme/web");
    /// ```
    pub fn from_input(input: &str, namespace: &str, aliases: &[String]) -> Result<Self> {
        let mut rest = input.trim();

        for scheme in ["https://", "http://"] {
            if let Some(stripped) = rest.strip_prefix(scheme) {
                rest = stripped;
                break;
            }
        }

        for alias in aliases {
            if let Some(stripped) = rest.strip_prefix(alias.as_str())
                && let Some(stripped) = stripped.strip_prefix('/')
            {
                rest = stripped;
                break;
            }
        }

        if let Some(stripped) = rest.strip_prefix(namespace)
            && let Some(stripped) = stripped.strip_prefix('/')
        {
            rest = stripped;
        }

        // Pasted references often carry a tag; the tag is selected
        // separately, so it is ignored here.
        let name = rest.split(':').next().unwrap_or_default();

        Self::new(namespace, name)
    }

    /// The fixed organization/namespace part.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The bare repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The repository path used in registry URLs and token scopes.
    pub fn path(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
