use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::{
    error::NetError,
    limit::BoundedNet,
    types::{Conditional, Headers},
};

/// The fetch boundary.
///
/// Everything above gart-net issues requests through this trait, which makes
/// the admission discipline ([`BoundedNet`]) and test instrumentation
/// (synthetic responders) plain decorators.
#[async_trait]
pub trait Net: Send + Sync {
    /// Unconditional GET; whole body in memory.
    async fn get_bytes(&self, url: Url) -> Result<Bytes, NetError>;

    /// GET with an optional `If-None-Match` validator.
    async fn get_conditional(
        &self,
        url: Url,
        validator: Option<&str>,
    ) -> Result<Conditional, NetError>;

    /// HEAD; response headers only.
    async fn head(&self, url: Url) -> Result<Headers, NetError>;
}

pub trait NetExt: Net + Sized {
    /// Cap this client at `limit` concurrent in-flight requests.
    fn with_limit(self, limit: usize) -> BoundedNet<Self> {
        BoundedNet::new(self, limit)
    }
}

impl<T: Net> NetExt for T {}
