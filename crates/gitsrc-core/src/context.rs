//! Fetch context for dependency injection.

use std::sync::Arc;

use crate::access::{AccessClassifier, ReqwestTransport, Transport};
use crate::config::FetchConfig;
use crate::extract::ResourceExtractor;
use crate::git::{GitFetcher, ProcessRunner, SystemRunner};

/// Holds the configuration and collaborators shared by the fetch components.
///
/// Callers build this once and derive classifiers, fetchers and extractors
/// from it. Tests swap in their own [`Transport`] and [`ProcessRunner`].
#[derive(Clone)]
pub struct FetchContext {
    config: FetchConfig,
    transport: Arc<dyn Transport>,
    runner: Arc<dyn ProcessRunner>,
}

impl FetchContext {
    /// Create a context using `reqwest` for probes and the system `git`.
    pub fn new(config: FetchConfig) -> Self {
        let transport = Arc::new(ReqwestTransport::new(config.user_agent.clone()));
        Self::with_collaborators(config, transport, Arc::new(SystemRunner))
    }

    pub fn with_collaborators(
        config: FetchConfig,
        transport: Arc<dyn Transport>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            config,
            transport,
            runner,
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn access_classifier(&self) -> AccessClassifier {
        let classifier =
            AccessClassifier::new(self.transport.clone()).with_default_timeout(self.config.timeout());
        match &self.config.client_name {
            Some(name) => classifier.with_client_name(name.clone()),
            None => classifier,
        }
    }

    pub fn git_fetcher(&self) -> GitFetcher {
        GitFetcher::new(self.runner.clone()).with_branch_checkout(self.config.checkout_branch)
    }

    pub fn resource_extractor(&self) -> ResourceExtractor {
        let extractor = ResourceExtractor::new(self.access_classifier(), self.git_fetcher())
            .with_scratch_prefix(self.config.scratch_prefix.clone())
            .with_env_token_fallback(self.config.env_token_fallback);
        match &self.config.scratch_root {
            Some(root) => extractor.with_scratch_root(root.clone()),
            None => extractor,
        }
    }
}

impl Default for FetchContext {
    fn default() -> Self {
        Self::new(FetchConfig::default())
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
