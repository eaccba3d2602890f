//! Credential material for registry and metadata-API access.
//!
//! The token broker only ever *reads* credentials: a configured username
//! plus secret, or a bare secret tried under conventional fallback
//! identities. Storage lives in [`store`].

use std::fmt;

mod store;
pub use store::{CredentialStore, FileCredentialStore};


/// Credentials for registry or metadata-API authentication.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication (anonymous access)
    Anonymous,

    /// HTTP Basic authentication with username and secret
    Basic {
        /// Username; may be empty, in which case the token broker tries
        /// its fallback identity list
        username: String,
        /// Password or personal access token
        secret: String,
    },

    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },
}

impl Credentials {
    /// Creates anonymous credentials.
    pub fn anonymous() -> Self {
        Self::Anonymous
    }

    /// Creates Basic authentication credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use libscry::auth::Credentials;
    ///
    /// let creds = Credentials::basic("octocat", "s3cret");
    /// ```
    pub fn basic(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// Creates Bearer token credentials.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// The configured username, if one is present and non-empty.
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Basic { username, .. } if !username.is_empty() => Some(username),
            _ => None,
        }
    }

    /// The secret usable for identity-based token exchange, if any.
    pub fn secret(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Basic { secret, .. } => Some(secret),
            Self::Bearer { token } => Some(token),
        }
    }

    /// Returns the Authorization header value for these credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use libscry::auth::Credentials;
    ///
    /// let creds = Credentials::basic("user", "pass");
    /// assert!(creds.to_header_value().is_some());
    /// assert!(Credentials::anonymous().to_header_value().is_none());
    /// ```
    pub fn to_header_value(&self) -> Option<String> {
        match self {
            Self::Anonymous => None,
            Self::Basic { username, secret } => {
                use base64::{Engine as _, engine::general_purpose};
                let credentials = format!("{}:{}", username, secret);
                let encoded = general_purpose::STANDARD.encode(credentials);
                Some(format!("Basic {}", encoded))
            }
            Self::Bearer { token } => Some(format!("Bearer {}", token)),
        }
    }
}

// Secrets stay out of logs and debug output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "Credentials::Anonymous"),
            Self::Basic { username, .. } => f
                .debug_struct("Credentials::Basic")
                .field("username", username)
                .field("secret", &"<redacted>")
                .finish(),
            Self::Bearer { .. } => write!(f, "Credentials::Bearer {{ token: <redacted> }}"),
        }
    }
}
