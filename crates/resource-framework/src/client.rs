//! # Collection Client
//!
//! The channel-backed client for a remote collection.

use crate::entity::Resource;
use crate::error::RemoteError;
use crate::message::CollectionRequest;
use crate::query::Query;
use tokio::sync::{mpsc, oneshot};

/// ## CollectionClient
///
/// Forwards table requests over a Tokio mpsc channel to whatever serves the
/// collection (a [`CollectionActor`](crate::CollectionActor) or a
/// [`MockCollection`](crate::mock::MockCollection)) and awaits the reply on a
/// oneshot channel. Cloning only clones the sender.
#[derive(Clone)]
pub struct CollectionClient<T: Resource> {
    sender: mpsc::Sender<CollectionRequest<T>>,
}

impl<T: Resource> CollectionClient<T> {
    pub fn new(sender: mpsc::Sender<CollectionRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn select(&self, query: Query) -> Result<Vec<T>, RemoteError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CollectionRequest::Select { query, respond_to })
            .await
            .map_err(|_| RemoteError::ServiceClosed)?;
        response.await.map_err(|_| RemoteError::ServiceDropped)?
    }

    pub async fn insert(&self, params: T::Create) -> Result<T, RemoteError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CollectionRequest::Insert { params, respond_to })
            .await
            .map_err(|_| RemoteError::ServiceClosed)?;
        response.await.map_err(|_| RemoteError::ServiceDropped)?
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, RemoteError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CollectionRequest::Update {
                id,
                patch,
                respond_to,
            })
            .await
            .map_err(|_| RemoteError::ServiceClosed)?;
        response.await.map_err(|_| RemoteError::ServiceDropped)?
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), RemoteError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CollectionRequest::Delete { id, respond_to })
            .await
            .map_err(|_| RemoteError::ServiceClosed)?;
        response.await.map_err(|_| RemoteError::ServiceDropped)?
    }
}
