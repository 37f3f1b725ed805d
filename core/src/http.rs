//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `ChimpClient` builds `HttpRequest`
//! values and parses `HttpResponse` values without touching the network;
//! executing the exchange is left to a `Transport` (or to the caller, when
//! the lower-level client is used directly).
//!
//! Every remote operation is a form POST, so a request carries its form body
//! as structured pairs and only encodes it when it is sent. Tests can then
//! inspect exactly which keys went out.

use crate::form::FormBody;

/// Content type sent with every request.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// A form POST described as plain data.
///
/// Built by `ChimpClient::build_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub form: FormBody,
}

impl HttpRequest {
    /// The UTF-8, url-encoded request body.
    pub fn body(&self) -> String {
        self.form.encode()
    }
}

/// An HTTP response described as plain data.
///
/// The body has already been decoded as UTF-8 by whoever executed the
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// A 200 response carrying `body`, with no headers.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}
