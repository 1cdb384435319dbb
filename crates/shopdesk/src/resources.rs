//! # Typed Stores
//!
//! One [`ResourceStore`] alias and factory per business resource. Each factory
//! wires a collection client to the shared notifier and lists the collection
//! by the resource's default query.

use crate::model::{
    Customer, Product, Sale, Service, ServiceOrder, ServiceOrderItem, ServiceOrderProduct,
    Supplier, User,
};
use paste::paste;
use resource_framework::{CollectionClient, Notifier, Resource, ResourceStore, StoreConfig};
use std::sync::Arc;

macro_rules! resource_stores {
    ($($resource:ident),* $(,)?) => {
        paste! {
            $(
                #[doc = concat!("Store over the `", stringify!($resource), "` collection.")]
                pub type [<$resource Store>] = ResourceStore<$resource, CollectionClient<$resource>>;

                #[doc = concat!("Builds a [`", stringify!($resource), "Store`] listed by its default query.")]
                pub fn [<$resource:snake _store>](
                    client: CollectionClient<$resource>,
                    notifier: Arc<dyn Notifier>,
                    config: &StoreConfig,
                ) -> [<$resource Store>] {
                    ResourceStore::with_config(
                        client,
                        notifier,
                        config.clone(),
                        <$resource as Resource>::default_query(),
                    )
                }
            )*
        }
    };
}

resource_stores!(
    Customer,
    Supplier,
    Service,
    User,
    Sale,
    Product,
    ServiceOrder,
    ServiceOrderItem,
    ServiceOrderProduct,
);
