use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Semaphore;
use url::Url;

use crate::{
    error::NetError,
    traits::Net,
    types::{Conditional, Headers},
};

/// Admission-ceiling decorator for [`Net`] implementations.
///
/// At most `limit` requests are in flight at once across every caller holding
/// a clone of this value. Waiters queue in arrival order; the underlying
/// tokio semaphore is fair. The permit is an RAII guard, so a slot is
/// released exactly once whether the inner call completes, fails, or the
/// calling task is dropped mid-await.
#[derive(Clone)]
pub struct BoundedNet<N> {
    inner: Arc<N>,
    slots: Arc<Semaphore>,
}

impl<N: Net> BoundedNet<N> {
    pub fn new(inner: N, limit: usize) -> Self {
        Self::shared(inner, Arc::new(Semaphore::new(limit.max(1))))
    }

    /// Build from an externally owned semaphore, so one budget can be shared
    /// across decorators and inspected in tests.
    pub fn shared(inner: N, slots: Arc<Semaphore>) -> Self {
        Self {
            inner: Arc::new(inner),
            slots,
        }
    }

    /// Currently free slots. Observability hook for tests and logs.
    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }

    async fn admit(&self) -> Result<tokio::sync::OwnedSemaphorePermit, NetError> {
        // The semaphore is never closed by this type; acquire can only fail
        // if a caller closed a shared semaphore out from under us.
        self.slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| NetError::transport("fetch pool closed"))
    }
}

#[async_trait]
impl<N: Net> Net for BoundedNet<N> {
    async fn get_bytes(&self, url: Url) -> Result<Bytes, NetError> {
        let _permit = self.admit().await?;
        self.inner.get_bytes(url).await
    }

    async fn get_conditional(
        &self,
        url: Url,
        validator: Option<&str>,
    ) -> Result<Conditional, NetError> {
        let _permit = self.admit().await?;
        self.inner.get_conditional(url, validator).await
    }

    async fn head(&self, url: Url) -> Result<Headers, NetError> {
        let _permit = self.admit().await?;
        self.inner.head(url).await
    }
}
