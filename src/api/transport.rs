use std::time::Duration;

use reqwest::{
    blocking::{Client, ClientBuilder, RequestBuilder},
    header::HeaderMap,
    Method,
};
use serde_json::Value;
use url::Url;

use crate::errors::RequestFailure;

use super::errors::TransportError;

/// HTTP primitive the client is built on.
///
/// Implementations resolve `path` against `base_url`, attach `token` as a
/// bearer credential when present, and hand back the parsed JSON body.
/// Non-2xx responses and connection failures are errors.
pub trait Transport {
    /// # Errors
    ///
    /// Will return `Err` on network failure, non-2xx status or a body
    /// that is not JSON.
    fn request_with_params(
        &self,
        method: Method,
        path: &str,
        base_url: &str,
        params: &Value,
        token: Option<&str>,
        headers: Option<&HeaderMap>,
    ) -> Result<Value, TransportError>;

    /// # Errors
    ///
    /// Will return `Err` on network failure, non-2xx status or a body
    /// that is not JSON.
    fn request_without_params(
        &self,
        method: Method,
        path: &str,
        base_url: &str,
        token: Option<&str>,
    ) -> Result<Value, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn request_with_params(
        &self,
        method: Method,
        path: &str,
        base_url: &str,
        params: &Value,
        token: Option<&str>,
        headers: Option<&HeaderMap>,
    ) -> Result<Value, TransportError> {
        (**self).request_with_params(method, path, base_url, params, token, headers)
    }

    fn request_without_params(
        &self,
        method: Method,
        path: &str,
        base_url: &str,
        token: Option<&str>,
    ) -> Result<Value, TransportError> {
        (**self).request_without_params(method, path, base_url, token)
    }
}

/// # Errors
///
/// Fails if `base_url` doesn't parse or cannot be a base.
pub fn endpoint_url(base_url: &str, path: &str) -> Result<Url, TransportError> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|()| TransportError::CannotBeBase(base_url.to_owned()))?
        .pop_if_empty()
        .extend(path.split('/').filter(|segment| !segment.is_empty()));
    Ok(url)
}

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("swan-sdk/", env!("CARGO_PKG_VERSION"));

fn client_builder() -> ClientBuilder {
    Client::builder().user_agent(USER_AGENT)
}

/// Blocking `reqwest` transport (no Tokio runtime required).
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = client_builder().build().unwrap_or_else(|e| {
            log::warn!("Falling back to a default HTTP client: {e}");
            Client::new()
        });
        Self { client }
    }

    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be built.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = client_builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    fn send(
        &self,
        request: RequestBuilder,
        url: Url,
        token: Option<&str>,
    ) -> Result<Value, TransportError> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send()?;
        let status = response.status();
        let response_text = response.text()?;
        log::debug!("{status} from {url}: {response_text}");

        if !status.is_success() {
            return Err(TransportError::from(RequestFailure::new(
                url,
                status,
                response_text,
            )));
        }

        serde_json::from_str(&response_text).map_err(|e| {
            log::error!("Failed to parse JSON response: {e}");
            log::error!("Response text: {response_text}");
            TransportError::from(RequestFailure::new(
                url,
                status,
                format!("Failed to parse JSON response: {e}"),
            ))
        })
    }
}

impl Transport for HttpTransport {
    fn request_with_params(
        &self,
        method: Method,
        path: &str,
        base_url: &str,
        params: &Value,
        token: Option<&str>,
        headers: Option<&HeaderMap>,
    ) -> Result<Value, TransportError> {
        let url = endpoint_url(base_url, path)?;
        let mut request = self.client.request(method.clone(), url.clone());
        request = if method == Method::GET {
            request.query(params)
        } else {
            request.json(params)
        };
        if let Some(headers) = headers {
            request = request.headers(headers.clone());
        }
        self.send(request, url, token)
    }

    fn request_without_params(
        &self,
        method: Method,
        path: &str,
        base_url: &str,
        token: Option<&str>,
    ) -> Result<Value, TransportError> {
        let url = endpoint_url(base_url, path)?;
        let request = self.client.request(method, url.clone());
        self.send(request, url, token)
    }
}
