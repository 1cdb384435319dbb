//! # Collection Messages
//!
//! Message types exchanged between a [`CollectionClient`](crate::CollectionClient)
//! and a [`CollectionActor`](crate::CollectionActor).

use crate::entity::Resource;
use crate::error::RemoteError;
use crate::query::Query;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by collection hosts.
pub type Response<T> = oneshot::Sender<Result<T, RemoteError>>;

/// One request against a remote collection.
///
/// The variants map one-to-one onto the table API the store consumes:
///
/// - **Select**: `SELECT * ... [WHERE] ORDER BY`: returns the matching rows.
/// - **Insert**: `INSERT ... RETURNING *`: returns the row with its generated id.
/// - **Update**: `UPDATE ... WHERE id = ? RETURNING *`: returns the full updated row.
/// - **Delete**: `DELETE ... WHERE id = ?`.
///
/// The enum is generic over `T: Resource`, so a `Customer` collection can only
/// ever receive customer payloads.
#[derive(Debug)]
pub enum CollectionRequest<T: Resource> {
    Select {
        query: Query,
        respond_to: Response<Vec<T>>,
    },
    Insert {
        params: T::Create,
        respond_to: Response<T>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
}
