//! HTTP verb helpers shared by the protocol clients
//!
//! One attempt per call, awaited to completion. Responses are classified by
//! status-code family only: anything outside 2xx becomes
//! [`OxilinkError::UnexpectedResponse`] carrying the captured response.

use std::borrow::Cow;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::error::{ErrorResponse, OxilinkError};
use crate::media_type::{self, MediaTypes};
use crate::service::ServiceContext;
use crate::Result;

/// Percent-encode a URI component under the unreserved rule.
///
/// Idempotent for values already made of unreserved characters.
pub fn encode_component(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// HTTP client base: a configured reqwest client plus the fixed media-type
/// lists the protocol clients negotiate with.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    media_types: MediaTypes,
}

impl HttpClient {
    /// Create a client with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Create a client from settings.
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            http,
            media_types: MediaTypes::new(),
        })
    }

    /// Replace the media-type lists used for accept headers.
    pub fn with_media_types(mut self, media_types: MediaTypes) -> Self {
        self.media_types = media_types;
        self
    }

    pub fn media_types(&self) -> &MediaTypes {
        &self.media_types
    }

    /// Append query parameters to a URL, percent-encoding each key and
    /// value under the unreserved rule.
    fn apply_params(url: &str, params: Option<&[(&str, &str)]>) -> String {
        let Some(params) = params else {
            return url.to_string();
        };
        let mut url = url.to_string();
        for (name, value) in params {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&encode_component(name));
            url.push('=');
            url.push_str(&encode_component(value));
        }
        url
    }

    /// Issue a request without inspecting the response status.
    pub(crate) async fn send_raw(
        &self,
        method: Method,
        url: &str,
        accepted: Option<&[&'static str]>,
        params: Option<&[(&str, &str)]>,
        body: Option<(String, &'static str)>,
        context: Option<&ServiceContext>,
    ) -> Result<Response> {
        let url = Self::apply_params(url, params);
        debug!(%method, %url, "sending request");

        let mut request = self.http.request(method, &url);
        if let Some(types) = accepted {
            request = request.header(ACCEPT, media_type::accept_value(types));
        }
        if let Some((payload, content_type)) = body {
            request = request.header(CONTENT_TYPE, content_type).body(payload);
        }
        if let Some(context) = context {
            if context.has_credentials() {
                request = request.basic_auth(
                    context.username().unwrap_or(""),
                    Some(context.password().unwrap_or("")),
                );
            }
        }

        Ok(request.send().await?)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        accepted: Option<&[&'static str]>,
        params: Option<&[(&str, &str)]>,
        body: Option<(String, &'static str)>,
        context: Option<&ServiceContext>,
    ) -> Result<Response> {
        let response = self
            .send_raw(method.clone(), url, accepted, params, body, context)
            .await?;

        if response.status().is_success() {
            return Ok(response);
        }

        let reason = response
            .status()
            .canonical_reason()
            .unwrap_or("unknown reason");
        error!(%method, url, status = %response.status(), reason, "request unsuccessful");
        Err(OxilinkError::UnexpectedResponse(
            ErrorResponse::capture(response).await,
        ))
    }

    pub async fn head(
        &self,
        url: &str,
        accepted: Option<&[&'static str]>,
        params: Option<&[(&str, &str)]>,
        context: Option<&ServiceContext>,
    ) -> Result<Response> {
        self.send(Method::HEAD, url, accepted, params, None, context)
            .await
    }

    pub async fn get(
        &self,
        url: &str,
        accepted: Option<&[&'static str]>,
        params: Option<&[(&str, &str)]>,
        context: Option<&ServiceContext>,
    ) -> Result<Response> {
        self.send(Method::GET, url, accepted, params, None, context)
            .await
    }

    pub async fn post(
        &self,
        url: &str,
        body: String,
        content_type: &'static str,
        accepted: Option<&[&'static str]>,
        params: Option<&[(&str, &str)]>,
        context: Option<&ServiceContext>,
    ) -> Result<Response> {
        self.send(
            Method::POST,
            url,
            accepted,
            params,
            Some((body, content_type)),
            context,
        )
        .await
    }

    pub async fn put(
        &self,
        url: &str,
        body: String,
        content_type: &'static str,
        accepted: Option<&[&'static str]>,
        params: Option<&[(&str, &str)]>,
        context: Option<&ServiceContext>,
    ) -> Result<Response> {
        self.send(
            Method::PUT,
            url,
            accepted,
            params,
            Some((body, content_type)),
            context,
        )
        .await
    }

    pub async fn delete(
        &self,
        url: &str,
        accepted: Option<&[&'static str]>,
        params: Option<&[(&str, &str)]>,
        context: Option<&ServiceContext>,
    ) -> Result<Response> {
        self.send(Method::DELETE, url, accepted, params, None, context)
            .await
    }
}
