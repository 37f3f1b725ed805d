//! The caller-facing client: validate, send once, parse.
//!
//! # Design
//! Every operation returns a result record, never an error. Local validation
//! failures, transport failures, unexpected HTTP statuses and unparseable
//! bodies all become a failure `RewriteResult` or a `UsageStats` with its
//! `error` set, the same shape the service uses for its own failures.
//! Callers branch on `is_success()` / `is_error()` only.

use tracing::{debug, instrument, warn};

use crate::client::{ChimpClient, CREATE_SPIN_OPERATION, REWRITE_OPERATION, STATISTICS_OPERATION};
use crate::config::ClientConfig;
#[cfg(feature = "reqwest")]
use crate::error::TransportError;
use crate::error::{ApiError, ValidationError};
use crate::http::{HttpRequest, HttpResponse};
use crate::options::{CreateSpinOptions, RewriteOptions};
#[cfg(feature = "reqwest")]
use crate::transport::ReqwestTransport;
use crate::transport::Transport;
use crate::types::{RewriteResult, UsageStats};

/// Client for the remote rewrite service.
///
/// Each operation performs at most one request and has a single await point.
pub struct RewriteServiceClient<T> {
    client: ChimpClient,
    transport: T,
}

#[cfg(feature = "reqwest")]
impl RewriteServiceClient<ReqwestTransport> {
    /// Client sending over `reqwest` with the timeout from `config`.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::from_config(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> RewriteServiceClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            client: ChimpClient::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        self.client.config()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Spin or rewrite `text`.
    #[instrument(skip_all, fields(operation = REWRITE_OPERATION, advanced = options.is_advanced()))]
    pub async fn rewrite(
        &self,
        email: &str,
        api_key: &str,
        text: &str,
        options: &RewriteOptions,
    ) -> RewriteResult {
        let built = self.client.build_rewrite(email, api_key, text, options);
        let result = self
            .execute(built, |c, r| c.parse_rewrite(r), RewriteResult::failure)
            .await;
        log_outcome(&result);
        result
    }

    /// Resolve the spintax in `text` into one plain version.
    #[instrument(skip_all, fields(operation = CREATE_SPIN_OPERATION))]
    pub async fn create_spin(
        &self,
        email: &str,
        api_key: &str,
        text: &str,
        options: &CreateSpinOptions,
    ) -> RewriteResult {
        let built = self.client.build_create_spin(email, api_key, text, options);
        let result = self
            .execute(built, |c, r| c.parse_create_spin(r), RewriteResult::failure)
            .await;
        log_outcome(&result);
        result
    }

    /// Credit usage for the account.
    #[instrument(skip_all, fields(operation = STATISTICS_OPERATION))]
    pub async fn usage_statistics(&self, email: &str, api_key: &str) -> UsageStats {
        let built = self.client.build_statistics(email, api_key);
        let stats = self
            .execute(built, |c, r| c.parse_statistics(r), UsageStats::failed)
            .await;
        if stats.is_error() {
            warn!(error = %stats.error, "statistics failed");
        }
        stats
    }

    async fn execute<R>(
        &self,
        built: Result<HttpRequest, ValidationError>,
        parse: impl FnOnce(&ChimpClient, HttpResponse) -> Result<R, ApiError>,
        failure: impl FnOnce(String) -> R,
    ) -> R {
        let request = match built {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "rejected before sending");
                return failure(e.to_string());
            }
        };

        debug!(url = %request.url, fields = request.form.len(), "sending request");
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => return failure(format!("Request failed: {e}")),
        };

        parse(&self.client, response).unwrap_or_else(|e| failure(e.to_string()))
    }
}

fn log_outcome(result: &RewriteResult) {
    if result.is_success() {
        debug!(len = result.output.len(), "success");
    } else {
        warn!(reason = %result.output, "failure");
    }
}
