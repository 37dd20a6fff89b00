//! The authenticated session, as an explicit value.
//!
//! Nothing in the library reads the token from the environment on its own;
//! the client builds a [`Session`] once at start-up and hands it to the
//! source that needs it.

use crate::config::AlertaConfig;

pub const TOKEN_ENV: &str = "ALERTA_TOKEN";

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let trimmed = token.trim();
        Self {
            token: (!trimmed.is_empty()).then(|| trimmed.to_string()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An explicit token wins over the one stored in the config file.
    pub fn resolve(explicit: Option<String>, config: &AlertaConfig) -> Self {
        match explicit.or_else(|| config.token.clone()) {
            Some(token) => Self::new(token),
            None => Self::anonymous(),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn authorization_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }
}

// Keeps the token out of debug logs.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
