use crate::config::AppConfig;
use crate::resources::*;
use crate::service_orders::ServiceOrderBook;
use resource_framework::{CollectionActor, CollectionClient, Notifier, Resource};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Collection host task failed: {0}")]
    HostFailed(#[from] tokio::task::JoinError),
}

/// Runtime orchestrator for every business collection.
///
/// # Example
///
/// ```ignore
/// let backend = Backend::new(&AppConfig::default(), LogNotifier);
///
/// let customers = backend.customers.list().await;
/// let product = backend.products.create(params).await?;
///
/// backend.shutdown().await?;
/// ```
pub struct Backend {
    pub customers: CustomerStore,
    pub suppliers: SupplierStore,
    pub services: ServiceStore,
    pub users: UserStore,
    pub sales: SaleStore,
    pub products: ProductStore,
    pub service_orders: ServiceOrderStore,
    pub service_order_items: ServiceOrderItemStore,
    pub service_order_products: ServiceOrderProductStore,

    /// Host tasks, awaited on shutdown.
    handles: Vec<JoinHandle<()>>,
}

fn spawn_host<T: Resource>(buffer_size: usize, handles: &mut Vec<JoinHandle<()>>) -> CollectionClient<T> {
    let (actor, client) = CollectionActor::<T>::new(buffer_size);
    handles.push(tokio::spawn(actor.run()));
    client
}

impl Backend {
    /// Spawns all collection hosts. Must be called inside a Tokio runtime.
    pub fn new(config: &AppConfig, notifier: impl Notifier) -> Self {
        let notifier: Arc<dyn Notifier> = Arc::new(notifier);
        let store_config = &config.store;
        let mut handles = Vec::new();

        macro_rules! store {
            ($factory:ident) => {
                $factory(
                    spawn_host(store_config.buffer_size, &mut handles),
                    notifier.clone(),
                    store_config,
                )
            };
        }

        let backend = Self {
            customers: store!(customer_store),
            suppliers: store!(supplier_store),
            services: store!(service_store),
            users: store!(user_store),
            sales: store!(sale_store),
            products: store!(product_store),
            service_orders: store!(service_order_store),
            service_order_items: store!(service_order_item_store),
            service_order_products: store!(service_order_product_store),
            handles,
        };
        info!(collections = backend.handles.len(), "Backend started");
        backend
    }

    /// Aggregate view over service orders and their lines.
    pub fn service_order_book(&self) -> ServiceOrderBook {
        ServiceOrderBook::new(
            self.service_orders.clone(),
            self.service_order_items.clone(),
            self.service_order_products.clone(),
        )
    }

    /// Closes every store, drops the request senders and waits for each host
    /// to exit.
    pub async fn shutdown(self) -> Result<(), BackendError> {
        info!("Shutting down backend...");

        self.customers.close();
        self.suppliers.close();
        self.services.close();
        self.users.close();
        self.sales.close();
        self.products.close();
        self.service_orders.close();
        self.service_order_items.close();
        self.service_order_products.close();

        // Dropping the stores closes the request channels.
        drop(self.customers);
        drop(self.suppliers);
        drop(self.services);
        drop(self.users);
        drop(self.sales);
        drop(self.products);
        drop(self.service_orders);
        drop(self.service_order_items);
        drop(self.service_order_products);

        join_hosts(self.handles).await?;
        info!("Backend shutdown complete.");
        Ok(())
    }
}

/// Awaits every host task, then reports the first one that failed.
async fn join_hosts(handles: Vec<JoinHandle<()>>) -> Result<(), BackendError> {
    let mut first_failure = None;
    for handle in handles {
        if let Err(e) = handle.await {
            error!(error = %e, "Collection host failed");
            first_failure.get_or_insert(e);
        }
    }
    match first_failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn failed_host_does_not_stop_the_others_being_awaited() {
        let finished = Arc::new(AtomicBool::new(false));
        let failing = tokio::spawn(async { panic!("host crashed") });
        let slow = tokio::spawn({
            let finished = finished.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                finished.store(true, Ordering::SeqCst);
            }
        });

        let err = join_hosts(vec![failing, slow]).await.unwrap_err();
        assert!(matches!(err, BackendError::HostFailed(_)));
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn shutdown_waits_for_every_host() {
        let backend = Backend::new(&AppConfig::default(), resource_framework::LogNotifier);
        backend.customers.list().await;
        backend.shutdown().await.unwrap();
    }
}
