//! API credential types.
//!
//! Defines the identity used to sign EC open platform requests.

use std::fmt;

use crate::sign;

/// Corp id, app id and app secret issued by the EC open platform.
///
/// Values are trimmed once at construction and never change afterwards.
/// Empty values are accepted: some read-only endpoints work with partial
/// configuration and the platform is the one to reject anything else.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    corp_id: String,
    app_id: String,
    app_secret: String,
}

impl Credentials {
    pub fn new(
        corp_id: impl AsRef<str>,
        app_id: impl AsRef<str>,
        app_secret: impl AsRef<str>,
    ) -> Self {
        Self {
            corp_id: corp_id.as_ref().trim().to_string(),
            app_id: app_id.as_ref().trim().to_string(),
            app_secret: app_secret.as_ref().trim().to_string(),
        }
    }

    pub fn corp_id(&self) -> &str {
        &self.corp_id
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Signature proving possession of the secret at `timestamp`.
    pub fn sign(&self, timestamp: u64) -> String {
        sign::sign(timestamp, &self.app_id, &self.app_secret)
    }
}

// The secret must never end up in logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("corp_id", &self.corp_id)
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .finish()
    }
}
