//! # Resource Framework
//!
//! Building blocks for keeping an in-memory, observable copy of a remote
//! collection consistent with the outcome of every remote call.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into four layers:
//!
//! 1. **Entity Layer** ([`Resource`]) - the record type, its payloads and its collection name
//! 2. **Boundary Layer** ([`RemoteCollection`]) - the table API: select, insert, update, delete
//! 3. **Cache Layer** ([`ResourceStore`]) - the ordered in-memory list and its reconciliation rules
//! 4. **Host Layer** ([`CollectionActor`], [`CollectionClient`]) - an in-memory collection
//!    served from its own Tokio task, standing in for the hosted data service
//!
//! Business code writes one `Resource` impl per entity; the fetch/create/update/delete
//! logic exists once, in [`ResourceStore`].
//!
//! ```rust
//! use resource_framework::{CollectionActor, LogNotifier, Resource, ResourceStore};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Debug, Serialize, Deserialize)]
//! struct Customer { id: u32, name: String }
//!
//! #[derive(Debug)]
//! struct CustomerPatch { name: Option<String> }
//!
//! impl Resource for Customer {
//!     type Id = u32;
//!     type Create = String;
//!     type Patch = CustomerPatch;
//!     const COLLECTION: &'static str = "customers";
//!
//!     fn id(&self) -> &u32 { &self.id }
//!     fn from_create(id: u32, name: String) -> Result<Self, String> { Ok(Self { id, name }) }
//!     fn apply_patch(&mut self, patch: CustomerPatch) {
//!         if let Some(name) = patch.name { self.name = name; }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = CollectionActor::<Customer>::new(10);
//!     tokio::spawn(actor.run());
//!
//!     let store = ResourceStore::new(client, LogNotifier);
//!     assert!(store.list().await.records.is_empty());
//!
//!     let acme = store.create("Acme".to_string()).await.unwrap();
//!     store.update(acme.id, CustomerPatch { name: Some("Acme Ltd".into()) }).await.unwrap();
//!     assert_eq!(store.snapshot().records[0].name, "Acme Ltd");
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each collection host runs in its own Tokio task and handles requests one at a time.
//! - Store operations are independent async calls; none is queued, retried or cancelled.
//! - The cache lives in a `tokio::sync::watch` channel, so UI code can subscribe to changes.
//!
//! ## Testing
//!
//! The [`mock`] module provides [`MockCollection`](mock::MockCollection) for scripted
//! responses (including failures) and hand-driven helpers for controlling response order.

pub mod actor;
pub mod client;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod notify;
pub mod query;
pub mod remote;
pub mod store;
pub mod tracing;

// Re-export core types for convenience
pub use actor::CollectionActor;
pub use client::CollectionClient;
pub use entity::Resource;
pub use error::{RemoteError, StoreError};
pub use message::{CollectionRequest, Response};
pub use notify::{ChannelNotifier, LogNotifier, Notification, Notifier, Severity};
pub use query::{Direction, Query};
pub use remote::RemoteCollection;
pub use store::{Listing, Phase, ResourceStore, StoreConfig, StoreState};
