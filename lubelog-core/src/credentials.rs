//! Server credentials and the lookup seam used by the submitter.

use std::fmt;

/// Server address plus Basic auth credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    domain: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Creates credentials, normalizing the domain.
    ///
    /// A bare host gets `http://` prepended and trailing slashes are removed.
    pub fn new(
        domain: impl AsRef<str>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            domain: normalize_domain(domain.as_ref()),
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Builds a full API URL from a path such as `/api/vehicle/info`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.domain, path)
    }
}

// Never print the password.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("domain", &self.domain)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

fn normalize_domain(domain: &str) -> String {
    let domain = domain.trim();
    let with_scheme = if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.to_string()
    } else {
        format!("http://{}", domain)
    };
    with_scheme.trim_end_matches('/').to_string()
}

/// Where the current credentials come from.
pub trait CredentialSource {
    /// Returns `None` when the user is not logged in.
    fn credentials(&self) -> Option<Credentials>;
}

impl CredentialSource for Option<Credentials> {
    fn credentials(&self) -> Option<Credentials> {
        self.clone()
    }
}

impl CredentialSource for Credentials {
    fn credentials(&self) -> Option<Credentials> {
        Some(self.clone())
    }
}
