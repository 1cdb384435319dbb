//! # Resource Trait
//!
//! The `Resource` trait is the contract every record type (customer, supplier,
//! sale) implements so that one generic [`ResourceStore`](crate::ResourceStore)
//! and one generic [`CollectionActor`](crate::CollectionActor) can manage it.
//!
//! Associated types keep the payloads apart: a `Customer` store only accepts a
//! `CustomerCreate`, and the compiler rejects a `SupplierCreate` sent to it.

use crate::query::Query;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A record type stored in a remote collection.
///
/// Records are serializable so the collection host can evaluate
/// `WHERE field = value` and `ORDER BY field` by field name.
pub trait Resource: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Unique key of a record. Hosts assign ids from a `u32` counter.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Insert payload: the record minus its identifier and generated fields.
    type Create: Send + Sync + Debug;

    /// Partial update payload. `None` fields leave the stored value alone.
    type Patch: Send + Sync + Debug;

    /// Name of the remote collection backing this resource.
    const COLLECTION: &'static str;

    /// Field the default listing is ordered by.
    const ORDER_BY: &'static str = "name";

    fn id(&self) -> &Self::Id;

    /// Listing used by a store that was not given an explicit query.
    fn default_query() -> Query {
        Query::ordered_by(Self::ORDER_BY)
    }

    /// Build the full row from a server-assigned id and the insert payload.
    ///
    /// Returning `Err` rejects the insert (e.g. a blank required field).
    fn from_create(id: Self::Id, params: Self::Create) -> Result<Self, String>;

    /// Shallow merge of `patch` into `self`.
    fn apply_patch(&mut self, patch: Self::Patch);
}
