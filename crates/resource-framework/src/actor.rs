//! # In-Memory Collection Host
//!
//! This module defines the `CollectionActor`, an in-memory stand-in for the
//! hosted data service. It owns the rows of one collection and processes
//! table requests sequentially in its own task.

use crate::client::CollectionClient;
use crate::entity::Resource;
use crate::error::RemoteError;
use crate::message::CollectionRequest;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The server half of one remote collection.
///
/// Rows are kept in insertion order. Because requests are handled one at a
/// time inside the actor's task, the row list needs no lock.
///
/// # Usage Pattern
///
/// 1.  **Create**: `CollectionActor::new()` returns the actor and a client.
/// 2.  **Run**: spawn `actor.run()` on the runtime.
/// 3.  **Use**: hand the client to a [`ResourceStore`](crate::ResourceStore).
///
/// ```rust
/// use resource_framework::{CollectionActor, Query, Resource};
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
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = CollectionActor::<Tag>::new(10);
///     tokio::spawn(actor.run());
///
///     let tag = client.insert("urgent".to_string()).await.unwrap();
///     assert_eq!(tag.id, 1);
///     let rows = client.select(Query::ordered_by("name")).await.unwrap();
///     assert_eq!(rows.len(), 1);
/// }
/// ```
///
/// # Operations
///
/// * **Select**: filters and orders a copy of the rows with the request's [`Query`](crate::Query).
/// * **Insert**: assigns the next id from the `u32` counter, builds the row with
///   [`Resource::from_create`] and appends it.
/// * **Update**: applies the patch with [`Resource::apply_patch`] and returns the full row;
///   an unknown id is `NotFound`.
/// * **Delete**: removes the row; an unknown id matches zero rows and still succeeds.
pub struct CollectionActor<T: Resource> {
    receiver: mpsc::Receiver<CollectionRequest<T>>,
    rows: Vec<T>,
    next_id: u32,
}

impl<T: Resource> CollectionActor<T> {
    /// Creates a new `CollectionActor` and its associated `CollectionClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; clients wait for
    /// space when it is full.
    pub fn new(buffer_size: usize) -> (Self, CollectionClient<T>) {
        Self::with_rows(buffer_size, Vec::new())
    }

    /// Creates a host pre-seeded with `rows`. The id counter continues after
    /// the number of seeded rows and skips any id a seeded row already holds.
    pub fn with_rows(buffer_size: usize, rows: Vec<T>) -> (Self, CollectionClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let next_id = u32::try_from(rows.len()).unwrap_or(u32::MAX).saturating_add(1);
        let actor = Self {
            receiver,
            rows,
            next_id,
        };
        (actor, CollectionClient::new(sender))
    }

    fn position(&self, id: &T::Id) -> Option<usize> {
        self.rows.iter().position(|r| r.id() == id)
    }

    /// First counter value not taken by an existing row.
    fn vacant_id(&mut self) -> T::Id {
        loop {
            let id = T::Id::from(self.next_id);
            if self.position(&id).is_none() {
                return id;
            }
            self.next_id += 1;
        }
    }

    /// Runs the request loop until every client has been dropped.
    pub async fn run(mut self) {
        let collection = T::COLLECTION;
        info!(collection, "Collection started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CollectionRequest::Select { query, respond_to } => {
                    let rows = query.apply(&self.rows);
                    debug!(collection, ?query, matched = rows.len(), "Select");
                    let _ = respond_to.send(Ok(rows));
                }
                CollectionRequest::Insert { params, respond_to } => {
                    debug!(collection, ?params, "Insert");
                    let id = self.vacant_id();
                    match T::from_create(id.clone(), params) {
                        Ok(row) => {
                            self.next_id += 1;
                            self.rows.push(row.clone());
                            info!(collection, %id, size = self.rows.len(), "Inserted");
                            let _ = respond_to.send(Ok(row));
                        }
                        Err(e) => {
                            warn!(collection, error = %e, "Insert rejected");
                            let _ = respond_to.send(Err(RemoteError::Rejected(e)));
                        }
                    }
                }
                CollectionRequest::Update {
                    id,
                    patch,
                    respond_to,
                } => {
                    debug!(collection, %id, ?patch, "Update");
                    if let Some(pos) = self.position(&id) {
                        let row = &mut self.rows[pos];
                        row.apply_patch(patch);
                        info!(collection, %id, "Updated");
                        let _ = respond_to.send(Ok(row.clone()));
                    } else {
                        warn!(collection, %id, "Not found");
                        let _ = respond_to.send(Err(RemoteError::NotFound(id.to_string())));
                    }
                }
                CollectionRequest::Delete { id, respond_to } => {
                    match self.position(&id) {
                        Some(pos) => {
                            self.rows.remove(pos);
                            info!(collection, %id, size = self.rows.len(), "Deleted");
                        }
                        None => debug!(collection, %id, "Delete matched no rows"),
                    }
                    let _ = respond_to.send(Ok(()));
                }
            }
        }

        info!(collection, size = self.rows.len(), "Shutdown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Tag {
        id: u32,
        name: String,
    }

    impl Resource for Tag {
        type Id = u32;
        type Create = String;
        type Patch = Option<String>;
        const COLLECTION: &'static str = "tags";

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

    fn tag(id: u32, name: &str) -> Tag {
        Tag {
            id,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn inserts_skip_ids_held_by_seeded_rows() {
        let (actor, client) = CollectionActor::with_rows(4, vec![tag(2, "b"), tag(3, "c")]);
        tokio::spawn(actor.run());

        let first = client.insert("d".to_string()).await.unwrap();
        let second = client.insert("e".to_string()).await.unwrap();
        assert_eq!(first.id, 4);
        assert_eq!(second.id, 5);

        let mut ids: Vec<u32> = client
            .select(Query::ordered_by("id"))
            .await
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        ids.dedup();
        assert_eq!(ids, vec![2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn seeded_gap_below_counter_is_filled_in_order() {
        let (actor, client) = CollectionActor::with_rows(4, vec![tag(1, "a"), tag(7, "g")]);
        tokio::spawn(actor.run());

        let created = client.insert("c".to_string()).await.unwrap();
        assert_eq!(created.id, 3);
        assert_eq!(
            client.update(9, None).await.unwrap_err(),
            RemoteError::NotFound("9".to_string())
        );
    }
}
