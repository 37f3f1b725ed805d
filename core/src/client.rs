//! Stateless HTTP request builder and response parser for the rewrite API.
//!
//! # Design
//! `ChimpClient` holds only a `ClientConfig` and carries no mutable state
//! between calls. Each remote operation is split into a `build_*` method that
//! validates the arguments and produces an `HttpRequest`, and a `parse_*`
//! method that consumes an `HttpResponse`. Executing the round-trip is
//! somebody else's job, which keeps this module free of I/O.

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ApiError, ValidationError};
use crate::form::FormBody;
use crate::http::{HttpRequest, HttpResponse, FORM_CONTENT_TYPE};
use crate::options::{CreateSpinOptions, RewriteOptions};
use crate::types::{RewriteResult, UsageStats};

pub const REWRITE_OPERATION: &str = "ChimpRewrite";
pub const CREATE_SPIN_OPERATION: &str = "CreateSpin";
pub const STATISTICS_OPERATION: &str = "Statistics";

/// Synchronous, stateless client for the rewrite API.
///
/// Argument checks happen in a fixed order: application id, email, API key,
/// then text. The first missing one is reported.
#[derive(Debug, Clone)]
pub struct ChimpClient {
    config: ClientConfig,
}

impl ChimpClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_rewrite(
        &self,
        email: &str,
        api_key: &str,
        text: &str,
        options: &RewriteOptions,
    ) -> Result<HttpRequest, ValidationError> {
        let mut form = self.credentials(email, api_key)?;
        push_text(&mut form, text)?;
        options.write_form(&mut form);
        Ok(self.post(REWRITE_OPERATION, form))
    }

    pub fn build_create_spin(
        &self,
        email: &str,
        api_key: &str,
        text: &str,
        options: &CreateSpinOptions,
    ) -> Result<HttpRequest, ValidationError> {
        let mut form = self.credentials(email, api_key)?;
        push_text(&mut form, text)?;
        options.write_form(&mut form);
        Ok(self.post(CREATE_SPIN_OPERATION, form))
    }

    pub fn build_statistics(&self, email: &str, api_key: &str) -> Result<HttpRequest, ValidationError> {
        let form = self.credentials(email, api_key)?;
        Ok(self.post(STATISTICS_OPERATION, form))
    }

    pub fn parse_rewrite(&self, response: HttpResponse) -> Result<RewriteResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_spin(&self, response: HttpResponse) -> Result<RewriteResult, ApiError> {
        parse_json(response)
    }

    pub fn parse_statistics(&self, response: HttpResponse) -> Result<UsageStats, ApiError> {
        parse_json(response)
    }

    /// Check and emit the fields every operation sends.
    fn credentials(&self, email: &str, api_key: &str) -> Result<FormBody, ValidationError> {
        if self.config.app_id().is_empty() {
            return Err(ValidationError::MissingAppId);
        }
        if email.is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        if api_key.is_empty() {
            return Err(ValidationError::MissingApiKey);
        }
        let mut form = FormBody::new();
        form.push("email", email);
        form.push("apikey", api_key);
        form.push("aid", self.config.app_id());
        Ok(form)
    }

    fn post(&self, operation: &str, form: FormBody) -> HttpRequest {
        HttpRequest {
            url: self.config.endpoint(operation),
            headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
            form,
        }
    }
}

fn push_text(form: &mut FormBody, text: &str) -> Result<(), ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::MissingText);
    }
    form.push("text", text);
    Ok(())
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-2xx status codes to `ApiError::HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
