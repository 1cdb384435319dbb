//! # Mock Collections & Testing Guide
//!
//! `MockCollection<T>` answers the requests of a real [`CollectionClient<T>`]
//! from a queue of expectations instead of a hosted table. Use it to test a
//! [`ResourceStore`](crate::ResourceStore) (or anything else built on a
//! collection client) without spawning a [`CollectionActor`](crate::CollectionActor).
//!
//! ## When to use Mocks vs the In-Memory Host
//!
//! | Feature | MockCollection | CollectionActor |
//! |---------|----------------|-----------------|
//! | **State** | None (scripted responses) | Real rows |
//! | **Error Injection** | Easy (`return_err`) | Only server-side rejections |
//! | **Use Case** | Store reconciliation and failure paths | End-to-end flows |
//!
//! ## Scripted Responses
//!
//! ```rust
//! use resource_framework::mock::MockCollection;
//! use resource_framework::{LogNotifier, RemoteError, Resource, ResourceStore};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
//! struct Tag { id: u32, name: String }
//!
//! impl Resource for Tag {
//!     type Id = u32;
//!     type Create = String;
//!     type Patch = Option<String>;
//!     const COLLECTION: &'static str = "tags";
//!     fn id(&self) -> &u32 { &self.id }
//!     fn from_create(id: u32, name: String) -> Result<Self, String> { Ok(Self { id, name }) }
//!     fn apply_patch(&mut self, patch: Option<String>) {
//!         if let Some(name) = patch { self.name = name; }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockCollection::<Tag>::new();
//!     mock.expect_select().return_ok(vec![Tag { id: 1, name: "a".into() }]);
//!     mock.expect_delete(1).return_err(RemoteError::Rejected("offline".into()));
//!
//!     let store = ResourceStore::new(mock.client(), LogNotifier);
//!     assert_eq!(store.list().await.records.len(), 1);
//!     assert!(store.delete(1).await.is_err());
//!     assert_eq!(store.snapshot().records.len(), 1);
//!
//!     mock.verify();
//! }
//! ```
//!
//! ## Hand-Driven Responses
//!
//! [`create_mock_client`] plus the `expect_*` helpers hand the raw request and
//! its responder to the test, so the test decides when (and in which order)
//! responses arrive. That is how out-of-order responses are reproduced.

use crate::client::CollectionClient;
use crate::entity::Resource;
use crate::error::RemoteError;
use crate::message::{CollectionRequest, Response};
use crate::query::Query;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the response to give it.
enum Expectation<T: Resource> {
    Select {
        response: Result<Vec<T>, RemoteError>,
    },
    Insert {
        response: Result<T, RemoteError>,
    },
    Update {
        id: T::Id,
        response: Result<T, RemoteError>,
    },
    Delete {
        id: T::Id,
        response: Result<(), RemoteError>,
    },
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A scripted collection with expectation tracking.
///
/// Expectations are consumed in FIFO order. A request that does not match the
/// next expectation (wrong operation or wrong id) panics the mock task, which
/// the client observes as `ServiceDropped`/`ServiceClosed`.
pub struct MockCollection<T: Resource> {
    client: CollectionClient<T>,
    expectations: Expectations<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: Resource> Default for MockCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> MockCollection<T> {
    /// Creates a new mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<CollectionRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone.lock().unwrap().pop_front();

                match (request, expectation) {
                    (
                        CollectionRequest::Select { respond_to, .. },
                        Some(Expectation::Select { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        CollectionRequest::Insert { respond_to, .. },
                        Some(Expectation::Insert { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        CollectionRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "update sent for unexpected id");
                        let _ = respond_to.send(response);
                    }
                    (
                        CollectionRequest::Delete { id, respond_to },
                        Some(Expectation::Delete {
                            id: expected,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected, "delete sent for unexpected id");
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: CollectionClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> CollectionClient<T> {
        self.client.clone()
    }

    /// Expects a `select` operation.
    pub fn expect_select(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        ExpectationBuilder::new(self.expectations.clone(), |response| {
            Expectation::Select { response }
        })
    }

    /// Expects an `insert` operation.
    pub fn expect_insert(&mut self) -> ExpectationBuilder<T, T> {
        ExpectationBuilder::new(self.expectations.clone(), |response| {
            Expectation::Insert { response }
        })
    }

    /// Expects an `update` operation for `id`.
    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Update { id, response }
        })
    }

    /// Expects a `delete` operation for `id`.
    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        ExpectationBuilder::new(self.expectations.clone(), move |response| {
            Expectation::Delete { id, response }
        })
    }

    /// Number of expectations not yet consumed.
    pub fn remaining(&self) -> usize {
        self.expectations.lock().unwrap().len()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.remaining();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

/// Completes an expectation with the response to return.
pub struct ExpectationBuilder<T: Resource, V> {
    expectations: Expectations<T>,
    build: Box<dyn FnOnce(Result<V, RemoteError>) -> Expectation<T> + Send>,
}

impl<T: Resource, V> ExpectationBuilder<T, V> {
    fn new(
        expectations: Expectations<T>,
        build: impl FnOnce(Result<V, RemoteError>) -> Expectation<T> + Send + 'static,
    ) -> Self {
        Self {
            expectations,
            build: Box::new(build),
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: V) {
        let expectation = (self.build)(Ok(value));
        self.expectations.lock().unwrap().push_back(expectation);
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: RemoteError) {
        let expectation = (self.build)(Err(error));
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

// =============================================================================
// HAND-DRIVEN HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// The test plays the collection host: it pulls requests with the `expect_*`
/// helpers and answers them through the returned responders whenever it likes.
pub fn create_mock_client<T: Resource>(
    buffer_size: usize,
) -> (CollectionClient<T>, mpsc::Receiver<CollectionRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CollectionClient::new(sender), receiver)
}

/// Next message must be a Select request.
pub async fn expect_select<T: Resource>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(Query, Response<Vec<T>>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Select { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

/// Next message must be an Insert request.
pub async fn expect_insert<T: Resource>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(T::Create, Response<T>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Insert { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next message must be an Update request.
pub async fn expect_update<T: Resource>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(T::Id, T::Patch, Response<T>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Update {
            id,
            patch,
            respond_to,
        }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

/// Next message must be a Delete request.
pub async fn expect_delete<T: Resource>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(T::Id, Response<()>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Supplier {
        id: u32,
        name: String,
    }

    impl Resource for Supplier {
        type Id = u32;
        type Create = String;
        type Patch = Option<String>;
        const COLLECTION: &'static str = "suppliers";

        fn id(&self) -> &u32 {
            &self.id
        }

        fn from_create(id: u32, name: String) -> Result<Self, String> {
            Ok(Self { id, name })
        }

        fn apply_patch(&mut self, patch: Option<String>) {
            if let Some(name) = patch {
                self.name = name;
            }
        }
    }

    #[tokio::test]
    async fn hand_driven_insert() {
        let (client, mut receiver) = create_mock_client::<Supplier>(10);

        let task = tokio::spawn(async move { client.insert("Acme".to_string()).await });

        let (params, responder) = expect_insert(&mut receiver)
            .await
            .expect("Expected Insert request");
        assert_eq!(params, "Acme");
        responder
            .send(Ok(Supplier {
                id: 7,
                name: params,
            }))
            .unwrap();

        let created = task.await.unwrap().unwrap();
        assert_eq!(created.id, 7);
    }

    #[tokio::test]
    async fn scripted_expectations_in_order() {
        let mut mock = MockCollection::<Supplier>::new();
        mock.expect_insert().return_ok(Supplier {
            id: 1,
            name: "Acme".into(),
        });
        mock.expect_update(1)
            .return_err(RemoteError::NotFound("1".into()));
        mock.expect_delete(1).return_ok(());

        let client = mock.client();
        assert_eq!(client.insert("Acme".into()).await.unwrap().id, 1);
        assert_eq!(
            client.update(1, None).await,
            Err(RemoteError::NotFound("1".into()))
        );
        assert_eq!(client.delete(1).await, Ok(()));

        mock.verify();
    }

    #[tokio::test]
    async fn unmet_expectations_are_counted() {
        let mut mock = MockCollection::<Supplier>::new();
        mock.expect_select().return_ok(vec![]);
        assert_eq!(mock.remaining(), 1);

        mock.client().select(Query::ordered_by("name")).await.unwrap();
        assert_eq!(mock.remaining(), 0);
    }
}
