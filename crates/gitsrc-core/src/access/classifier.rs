//! Public/private classification and token validation.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::reference::Reference;

use super::transport::{DEFAULT_HTTP_TIMEOUT, HttpRequest, Transport, TransportError, resolve_timeout};

#[derive(Debug, Error)]
pub enum AuthError {
    /// The provider did not accept the token. The reference carried here has
    /// no token attached.
    #[error("failed to set token for {reference}: {source}")]
    TokenRejected {
        reference: Box<Reference>,
        #[source]
        source: TransportError,
    },
}

impl AuthError {
    /// Recover the reference, stripped of any token.
    pub fn into_reference(self) -> Reference {
        match self {
            AuthError::TokenRejected { reference, .. } => *reference,
        }
    }
}

/// Probes provider metadata APIs to classify repository access.
#[derive(Clone)]
pub struct AccessClassifier {
    transport: Arc<dyn Transport>,
    default_timeout: Duration,
    client_name: Option<String>,
}

impl AccessClassifier {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            default_timeout: DEFAULT_HTTP_TIMEOUT,
            client_name: None,
        }
    }

    /// Timeout used when a call passes no valid override.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_client_name(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = Some(client_name.into());
        self
    }

    /// True when the repository metadata can be read without a token.
    ///
    /// Network failures and error responses count as "not public".
    pub fn is_public(&self, reference: &Reference, timeout_secs: Option<i64>) -> bool {
        match self.probe(reference, None, timeout_secs) {
            Ok(()) => true,
            Err(err) => {
                debug!(%reference, error = %err, "Anonymous probe failed, treating repository as private");
                false
            }
        }
    }

    /// Validate `token` against the provider and attach it to the reference.
    ///
    /// On failure the returned error holds the reference with its token cleared,
    /// so a reference never carries an unverified credential.
    pub fn set_token(
        &self,
        reference: Reference,
        token: &str,
        timeout_secs: Option<i64>,
    ) -> Result<Reference, AuthError> {
        match self.probe(&reference, Some(token), timeout_secs) {
            Ok(()) => {
                debug!(%reference, "Token accepted");
                Ok(reference.with_token(token))
            }
            Err(source) => {
                debug!(%reference, "Token rejected");
                Err(AuthError::TokenRejected {
                    reference: Box::new(reference.without_token()),
                    source,
                })
            }
        }
    }

    fn probe(
        &self,
        reference: &Reference,
        token: Option<&str>,
        timeout_secs: Option<i64>,
    ) -> Result<(), TransportError> {
        let url = reference.metadata_api_url();
        let request = HttpRequest {
            url: &url,
            token,
            timeout: resolve_timeout(timeout_secs, self.default_timeout),
            client_name: self.client_name.as_deref(),
        };

        let body = self.transport.get(&request)?;
        if body.is_empty() {
            return Err(TransportError::EmptyBody { url });
        }
        Ok(())
    }
}

impl std::fmt::Debug for AccessClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessClassifier")
            .field("default_timeout", &self.default_timeout)
            .field("client_name", &self.client_name)
            .finish_non_exhaustive()
    }
}
