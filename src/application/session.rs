use std::sync::Arc;

use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::{Credentials, Session};
use crate::ports::{Authenticator, SourceError};

use super::ServiceError;

/// Login fields as submitted; blanks fall back to the configured defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Owner of the process-wide session slot.
///
/// A login replaces the whole `Session` under one write lock, so a concurrent
/// reader sees either the old server/token pair or the new one.
pub struct SessionService {
    authenticator: Arc<dyn Authenticator>,
    defaults: LoginInput,
    current: RwLock<Option<Arc<Session>>>,
}

impl SessionService {
    pub fn new(authenticator: Arc<dyn Authenticator>, defaults: LoginInput) -> Self {
        Self {
            authenticator,
            defaults,
            current: RwLock::new(None),
        }
    }

    fn pick(
        submitted: Option<String>,
        fallback: &Option<String>,
        field: &'static str,
    ) -> Result<String, ServiceError> {
        submitted
            .filter(|v| !v.trim().is_empty())
            .or_else(|| fallback.clone().filter(|v| !v.trim().is_empty()))
            .ok_or(ServiceError::MissingCredential(field))
    }

    fn resolve(&self, input: LoginInput) -> Result<Credentials, ServiceError> {
        Ok(Credentials {
            server: Self::pick(input.server, &self.defaults.server, "server")?,
            username: Self::pick(input.username, &self.defaults.username, "username")?,
            password: Self::pick(input.password, &self.defaults.password, "password")?,
        })
    }

    /// Exchange credentials for a session and make it the current one.
    ///
    /// On rejection the previous session, if any, stays in place.
    pub async fn login(&self, input: LoginInput) -> Result<Arc<Session>, ServiceError> {
        let credentials = self.resolve(input)?;

        match self.authenticator.create_session(&credentials).await {
            Ok(session) => {
                let session = Arc::new(session);
                *self.current.write() = Some(Arc::clone(&session));
                info!("Logged in to {} as {}", credentials.server, credentials.username);
                Ok(session)
            }
            Err(SourceError::Rejected { server, status }) => {
                warn!("Login to {} rejected (status {})", server, status);
                Err(ServiceError::AuthenticationRejected)
            }
            Err(e) => Err(ServiceError::Upstream(e)),
        }
    }

    /// The session captured for the duration of one request
    pub fn current(&self) -> Result<Arc<Session>, ServiceError> {
        self.current
            .read()
            .clone()
            .ok_or(ServiceError::Unauthenticated)
    }
}
