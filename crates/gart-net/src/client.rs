use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client, Response, StatusCode};
use tracing::trace;
use url::Url;

use crate::{
    error::{NetError, NetResult},
    traits::Net,
    types::{normalize_validator, Conditional, Headers, NetOptions},
};

/// Reqwest-backed [`Net`] implementation.
#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: Client,
    options: NetOptions,
}

impl HttpClient {
    /// # Panics
    ///
    /// Panics if the `reqwest::Client` builder fails to build.
    #[must_use]
    pub fn new(options: NetOptions) -> Self {
        let inner = Client::builder()
            .pool_max_idle_per_host(options.pool_max_idle_per_host)
            .build()
            .expect("failed to build reqwest client");
        Self { inner, options }
    }

    fn check_status(resp: &Response, url: &Url) -> NetResult<()> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(NetError::status(status.as_u16(), url))
        }
    }

    fn response_validator(resp: &Response) -> Option<String> {
        resp.headers()
            .get(header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(normalize_validator)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(NetOptions::default())
    }
}

#[async_trait]
impl Net for HttpClient {
    async fn get_bytes(&self, url: Url) -> Result<Bytes, NetError> {
        trace!(%url, "GET");
        let resp = self
            .inner
            .get(url.clone())
            .timeout(self.options.request_timeout)
            .send()
            .await?;
        Self::check_status(&resp, &url)?;
        resp.bytes().await.map_err(NetError::from)
    }

    async fn get_conditional(
        &self,
        url: Url,
        validator: Option<&str>,
    ) -> Result<Conditional, NetError> {
        trace!(%url, validator, "conditional GET");
        // No request timeout here: this is the file-download path and bodies
        // can take arbitrary time.
        let mut req = self.inner.get(url.clone());
        if let Some(tag) = validator {
            req = req.header(header::IF_NONE_MATCH, format!("\"{tag}\""));
        }
        let resp = req.send().await?;

        if resp.status() == StatusCode::NOT_MODIFIED {
            return Ok(Conditional::NotModified);
        }
        Self::check_status(&resp, &url)?;

        let new_validator = Self::response_validator(&resp);
        let bytes = resp.bytes().await?;
        Ok(Conditional::Fresh {
            bytes,
            validator: new_validator,
        })
    }

    async fn head(&self, url: Url) -> Result<Headers, NetError> {
        trace!(%url, "HEAD");
        let resp = self
            .inner
            .head(url.clone())
            .timeout(self.options.request_timeout)
            .send()
            .await?;
        Self::check_status(&resp, &url)?;

        let mut out = Headers::new();
        for (name, value) in resp.headers() {
            if let Ok(v) = value.to_str() {
                out.insert(name.as_str(), v);
            }
        }
        Ok(out)
    }
}
