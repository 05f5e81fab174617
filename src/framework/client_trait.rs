//! # ActorClient Trait
//!
//! Common base for the resource-specific clients. Implementors supply the inner
//! `ResourceClient` and the error mapping; the trait provides the raw reads every store needs.
//!
//! These reads are the store-to-store surface: they do not consult role authority. The
//! domain clients layer their gated operations on top of them.

use crate::framework::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// The error reported when `id` is not in the store.
    fn not_found(id: &T::Id) -> Self::Error;

    /// Fetch an entity by id, treating absence as an error.
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, id: T::Id) -> Result<T, Self::Error> {
        tracing::debug!("Sending request");
        match self.inner().get(id.clone()).await {
            Ok(Some(item)) => Ok(item),
            Ok(None) => Err(Self::not_found(&id)),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Fetch every entity selected by `filter`.
    #[tracing::instrument(skip(self))]
    async fn fetch_all(&self, filter: T::Filter) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list(filter).await.map_err(Self::map_error)
    }
}
