//! # RemoteCollection Trait
//!
//! The boundary a [`ResourceStore`](crate::ResourceStore) talks to. Anything that
//! can answer the four table operations can back a store: the channel-based
//! [`CollectionClient`], or an adapter over a hosted data service.
use crate::{CollectionClient, Query, RemoteError, Resource};
use async_trait::async_trait;

/// Generic remote collection API.
///
/// # Example
///
/// ```rust
/// use resource_framework::{Query, RemoteCollection, RemoteError, Resource};
/// use async_trait::async_trait;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Debug, Serialize, Deserialize)]
/// struct Tag { id: u32, name: String }
///
/// impl Resource for Tag {
///     type Id = u32;
///     type Create = String;
///     type Patch = Option<String>;
///     const COLLECTION: &'static str = "tags";
///     fn id(&self) -> &u32 { &self.id }
///     fn from_create(id: u32, name: String) -> Result<Self, String> { Ok(Self { id, name }) }
///     fn apply_patch(&mut self, patch: Option<String>) {
///         if let Some(name) = patch { self.name = name; }
///     }
/// }
///
/// // A read-only collection that always answers with the same rows.
/// struct Fixed(Vec<Tag>);
///
/// #[async_trait]
/// impl RemoteCollection<Tag> for Fixed {
///     async fn select(&self, query: Query) -> Result<Vec<Tag>, RemoteError> {
///         Ok(query.apply(&self.0))
///     }
///     async fn insert(&self, _: String) -> Result<Tag, RemoteError> {
///         Err(RemoteError::Rejected("read only".into()))
///     }
///     async fn update(&self, _: u32, _: Option<String>) -> Result<Tag, RemoteError> {
///         Err(RemoteError::Rejected("read only".into()))
///     }
///     async fn delete(&self, _: u32) -> Result<(), RemoteError> {
///         Err(RemoteError::Rejected("read only".into()))
///     }
/// }
/// ```
#[async_trait]
pub trait RemoteCollection<T: Resource>: Send + Sync + 'static {
    /// `SELECT * FROM <collection> [WHERE field = value] ORDER BY <field>`.
    async fn select(&self, query: Query) -> Result<Vec<T>, RemoteError>;

    /// `INSERT INTO <collection> VALUES (...) RETURNING *`.
    async fn insert(&self, params: T::Create) -> Result<T, RemoteError>;

    /// `UPDATE <collection> SET ... WHERE id = <id> RETURNING *`.
    async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, RemoteError>;

    /// `DELETE FROM <collection> WHERE id = <id>`.
    async fn delete(&self, id: T::Id) -> Result<(), RemoteError>;
}

#[async_trait]
impl<T: Resource> RemoteCollection<T> for CollectionClient<T> {
    #[tracing::instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn select(&self, query: Query) -> Result<Vec<T>, RemoteError> {
        tracing::debug!("Sending request");
        CollectionClient::select(self, query).await
    }

    #[tracing::instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn insert(&self, params: T::Create) -> Result<T, RemoteError> {
        tracing::debug!("Sending request");
        CollectionClient::insert(self, params).await
    }

    #[tracing::instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, RemoteError> {
        tracing::debug!("Sending request");
        CollectionClient::update(self, id, patch).await
    }

    #[tracing::instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn delete(&self, id: T::Id) -> Result<(), RemoteError> {
        tracing::debug!("Sending request");
        CollectionClient::delete(self, id).await
    }
}
