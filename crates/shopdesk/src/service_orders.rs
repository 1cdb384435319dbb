//! # Service-Order Book
//!
//! Joins a service order with its service lines and product lines, which live
//! in three separate collections, and keeps the order's stored total in step
//! with its lines.

use crate::model::{
    OrderLine, ServiceOrder, ServiceOrderId, ServiceOrderItem, ServiceOrderItemCreate,
    ServiceOrderProduct, ServiceOrderProductCreate, ServiceOrderUpdate,
};
use crate::resources::{ServiceOrderItemStore, ServiceOrderProductStore, ServiceOrderStore};
use resource_framework::{Query, RemoteError, StoreError};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// A service order with its lines and totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceOrderDetails {
    pub order: ServiceOrder,
    pub services: Vec<ServiceOrderItem>,
    pub products: Vec<ServiceOrderProduct>,
    pub services_total: f64,
    pub products_total: f64,
    pub total: f64,
}

impl ServiceOrderDetails {
    fn assemble(
        order: ServiceOrder,
        services: Vec<ServiceOrderItem>,
        products: Vec<ServiceOrderProduct>,
    ) -> Self {
        let services_total = sum_lines(&services);
        let products_total = sum_lines(&products);
        Self {
            order,
            services,
            products,
            services_total,
            products_total,
            total: services_total + products_total,
        }
    }

    /// True when the order row's stored total disagrees with its lines.
    pub fn is_stale(&self) -> bool {
        (self.order.total - self.total).abs() > f64::EPSILON
    }
}

fn sum_lines<L: OrderLine>(lines: &[L]) -> f64 {
    lines.iter().map(OrderLine::subtotal).sum()
}

fn lines_of(order_id: ServiceOrderId) -> Query {
    Query::ordered_by("id").where_eq("service_order_id", order_id.0)
}

fn line_not_found(order_id: ServiceOrderId, line_id: u32) -> StoreError {
    RemoteError::NotFound(format!("line {line_id} of {order_id}")).into()
}

/// Facade over the order, service-line and product-line stores.
#[derive(Clone)]
pub struct ServiceOrderBook {
    orders: ServiceOrderStore,
    services: ServiceOrderItemStore,
    products: ServiceOrderProductStore,
}

impl ServiceOrderBook {
    pub fn new(
        orders: ServiceOrderStore,
        services: ServiceOrderItemStore,
        products: ServiceOrderProductStore,
    ) -> Self {
        Self {
            orders,
            services,
            products,
        }
    }

    pub fn orders(&self) -> &ServiceOrderStore {
        &self.orders
    }

    /// Loads an order and its lines straight from the collections.
    #[instrument(skip(self))]
    pub async fn details(&self, order_id: ServiceOrderId) -> Result<ServiceOrderDetails, StoreError> {
        let order = self
            .orders
            .remote()
            .select(Query::ordered_by("id").where_eq("id", order_id.0))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RemoteError::NotFound(order_id.to_string()))?;

        let (services, products) = tokio::try_join!(
            self.services.remote().select(lines_of(order_id)),
            self.products.remote().select(lines_of(order_id)),
        )?;

        let details = ServiceOrderDetails::assemble(order, services, products);
        debug!(
            services = details.services.len(),
            products = details.products.len(),
            total = details.total,
            "Details loaded"
        );
        Ok(details)
    }

    /// Writes the line-derived total back to the order row when it drifted.
    #[instrument(skip(self))]
    pub async fn recompute_total(&self, order_id: ServiceOrderId) -> Result<ServiceOrderDetails, StoreError> {
        let mut details = self.details(order_id).await?;
        if details.is_stale() {
            let patch = ServiceOrderUpdate {
                total: Some(details.total),
                ..ServiceOrderUpdate::default()
            };
            details.order = self.orders.update(order_id, patch).await?;
            info!(total = details.total, "Total recomputed");
        }
        Ok(details)
    }

    pub async fn add_service(&self, params: ServiceOrderItemCreate) -> Result<ServiceOrderDetails, StoreError> {
        let order_id = params.service_order_id;
        self.require_order(order_id).await?;
        self.services.create(params).await?;
        self.recompute_total(order_id).await
    }

    pub async fn add_product(&self, params: ServiceOrderProductCreate) -> Result<ServiceOrderDetails, StoreError> {
        let order_id = params.service_order_id;
        self.require_order(order_id).await?;
        self.products.create(params).await?;
        self.recompute_total(order_id).await
    }

    /// Deletes a service line of `order_id`. A line of another order is `NotFound`.
    pub async fn remove_service(&self, order_id: ServiceOrderId, line_id: u32) -> Result<ServiceOrderDetails, StoreError> {
        let lines = self.services.remote().select(lines_of(order_id)).await?;
        if !lines.iter().any(|l| l.id == line_id) {
            return Err(line_not_found(order_id, line_id));
        }
        self.services.delete(line_id).await?;
        self.recompute_total(order_id).await
    }

    /// Deletes a product line of `order_id`. A line of another order is `NotFound`.
    pub async fn remove_product(&self, order_id: ServiceOrderId, line_id: u32) -> Result<ServiceOrderDetails, StoreError> {
        let lines = self.products.remote().select(lines_of(order_id)).await?;
        if !lines.iter().any(|l| l.id == line_id) {
            return Err(line_not_found(order_id, line_id));
        }
        self.products.delete(line_id).await?;
        self.recompute_total(order_id).await
    }

    async fn require_order(&self, order_id: ServiceOrderId) -> Result<(), StoreError> {
        if self.orders.find(&order_id).is_some() {
            return Ok(());
        }
        self.details(order_id).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProductId, ServiceId, ServiceOrderCreate};
    use crate::resources::{service_order_item_store, service_order_product_store, service_order_store};
    use resource_framework::{ChannelNotifier, CollectionActor, Notifier, StoreConfig};
    use std::sync::Arc;

    fn book() -> ServiceOrderBook {
        let (notifier, _rx) = ChannelNotifier::new();
        let notifier: Arc<dyn Notifier> = Arc::new(notifier);
        let config = StoreConfig::default();

        let (orders, orders_client) = CollectionActor::<ServiceOrder>::new(8);
        let (items, items_client) = CollectionActor::<ServiceOrderItem>::new(8);
        let (products, products_client) = CollectionActor::<ServiceOrderProduct>::new(8);
        tokio::spawn(orders.run());
        tokio::spawn(items.run());
        tokio::spawn(products.run());

        ServiceOrderBook::new(
            service_order_store(orders_client, notifier.clone(), &config),
            service_order_item_store(items_client, notifier.clone(), &config),
            service_order_product_store(products_client, notifier, &config),
        )
    }

    fn alignment(order_id: ServiceOrderId, quantity: u32) -> ServiceOrderItemCreate {
        ServiceOrderItemCreate {
            service_order_id: order_id,
            service_id: ServiceId(1),
            service_name: "Alignment".into(),
            quantity,
            unit_price: 80.0,
        }
    }

    fn oil(order_id: ServiceOrderId) -> ServiceOrderProductCreate {
        ServiceOrderProductCreate {
            service_order_id: order_id,
            product_id: ProductId(3),
            product_name: "Engine oil".into(),
            quantity: 4,
            unit_price: 9.5,
        }
    }

    #[tokio::test]
    async fn adding_lines_updates_the_order_total() {
        let book = book();
        let order = book.orders().create(ServiceOrderCreate::default()).await.unwrap();

        book.add_service(alignment(order.id, 2)).await.unwrap();
        let details = book.add_product(oil(order.id)).await.unwrap();

        assert_eq!(details.services_total, 160.0);
        assert_eq!(details.products_total, 38.0);
        assert_eq!(details.total, 198.0);
        assert_eq!(details.order.total, 198.0);
        assert_eq!(book.orders().find(&order.id).unwrap().total, 198.0);
    }

    #[tokio::test]
    async fn details_only_include_lines_of_that_order() {
        let book = book();
        let first = book.orders().create(ServiceOrderCreate::default()).await.unwrap();
        let second = book.orders().create(ServiceOrderCreate::default()).await.unwrap();

        book.add_service(alignment(first.id, 1)).await.unwrap();
        book.add_service(alignment(second.id, 3)).await.unwrap();

        let details = book.details(first.id).await.unwrap();
        assert_eq!(details.services.len(), 1);
        assert_eq!(details.total, 80.0);
        assert!(details.products.is_empty());
    }

    #[tokio::test]
    async fn removing_a_line_lowers_the_total() {
        let book = book();
        let order = book.orders().create(ServiceOrderCreate::default()).await.unwrap();
        book.add_service(alignment(order.id, 1)).await.unwrap();
        let details = book.add_product(oil(order.id)).await.unwrap();

        let line = details.products[0].id;
        let details = book.remove_product(order.id, line).await.unwrap();
        assert_eq!(details.total, 80.0);
        assert_eq!(details.order.total, 80.0);
    }

    #[tokio::test]
    async fn lines_of_another_order_cannot_be_removed() {
        let book = book();
        let first = book.orders().create(ServiceOrderCreate::default()).await.unwrap();
        let second = book.orders().create(ServiceOrderCreate::default()).await.unwrap();
        let details = book.add_service(alignment(first.id, 1)).await.unwrap();
        book.add_product(oil(first.id)).await.unwrap();
        let service_line = details.services[0].id;

        let err = book.remove_service(second.id, service_line).await.unwrap_err();
        assert_eq!(
            err.remote(),
            &RemoteError::NotFound(format!("line {service_line} of {}", second.id))
        );
        let product_line = book.details(first.id).await.unwrap().products[0].id;
        assert!(book.remove_product(second.id, product_line).await.is_err());

        let details = book.details(first.id).await.unwrap();
        assert_eq!(details.services.len(), 1);
        assert_eq!(details.products.len(), 1);
        assert_eq!(details.order.total, 118.0);
        assert_eq!(book.orders().find(&second.id).unwrap().total, 0.0);
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let book = book();
        let err = book.details(ServiceOrderId(42)).await.unwrap_err();
        assert_eq!(err.remote(), &RemoteError::NotFound("service_order_42".into()));

        let err = book.add_service(alignment(ServiceOrderId(42), 1)).await.unwrap_err();
        assert!(matches!(err.remote(), RemoteError::NotFound(_)));
    }
}
