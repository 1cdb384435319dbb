//! Demo run: starts the backend, records a sale and a service order, then
//! shuts down.

use resource_framework::tracing::setup_tracing;
use resource_framework::LogNotifier;
use shopdesk::config::AppConfig;
use shopdesk::lifecycle::Backend;
use shopdesk::model::{
    CustomerCreate, PaymentMethod, ProductCreate, Role, SaleCreate, SaleItem, ServiceCreate,
    ServiceOrderCreate, ServiceOrderItemCreate, ServiceOrderProductCreate, UserCreate,
};
use shopdesk::session::{InMemoryIdentityProvider, MemoryKeyValueStore, Session};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = AppConfig::from_env();
    info!(?config, "Starting shopdesk");
    let backend = Backend::new(&config, LogNotifier);

    // Staff account and session
    let admin = backend
        .users
        .create(UserCreate {
            name: "Ana".to_string(),
            email: "ana@shopdesk.test".to_string(),
            role: Role::Admin,
        })
        .await?;
    let identity = InMemoryIdentityProvider::new();
    identity.register(&admin, "change-me");
    let mut session = Session::new(MemoryKeyValueStore::new());
    session.sign_in(&identity, &admin.email, "change-me").await?;

    // Catalog
    let customer = backend
        .customers
        .create(CustomerCreate {
            email: Some("contact@acme.test".to_string()),
            ..CustomerCreate::named("Acme")
        })
        .await?;
    let filter = backend
        .products
        .create(ProductCreate {
            name: "Oil filter".to_string(),
            price: 30.0,
            cost: 18.0,
            stock: 3,
            min_stock: 5,
            ..ProductCreate::default()
        })
        .await?;
    let alignment = backend
        .services
        .create(ServiceCreate {
            name: "Wheel alignment".to_string(),
            price: 80.0,
            duration_minutes: Some(45),
            ..ServiceCreate::default()
        })
        .await?;

    let span = tracing::info_span!("sale");
    let sale = async {
        backend
            .sales
            .create(SaleCreate {
                customer_id: Some(customer.id),
                customer_name: Some(customer.name.clone()),
                items: vec![SaleItem {
                    product_id: filter.id,
                    product_name: filter.name.clone(),
                    quantity: 2,
                    unit_price: filter.price,
                }],
                payment_method: PaymentMethod::Card,
                date: None,
            })
            .await
    }
    .instrument(span)
    .await?;
    info!(sale_id = %sale.id, total = sale.total, "Sale recorded");

    let book = backend.service_order_book();
    let span = tracing::info_span!("service_order");
    let details = async {
        let order = book
            .orders()
            .create(ServiceOrderCreate {
                customer_id: Some(customer.id),
                customer_name: Some(customer.name.clone()),
                notes: Some("Pulling to the left".to_string()),
            })
            .await?;
        book.add_service(ServiceOrderItemCreate {
            service_order_id: order.id,
            service_id: alignment.id,
            service_name: alignment.name.clone(),
            quantity: 1,
            unit_price: alignment.price,
        })
        .await?;
        book.add_product(ServiceOrderProductCreate {
            service_order_id: order.id,
            product_id: filter.id,
            product_name: filter.name.clone(),
            quantity: 1,
            unit_price: filter.price,
        })
        .await
    }
    .instrument(span)
    .await;

    match details {
        Ok(details) => info!(order_id = %details.order.id, total = details.total, "Service order ready"),
        Err(e) => error!(error = %e, "Service order failed"),
    }

    let low_stock: Vec<_> = backend
        .products
        .list()
        .await
        .records
        .into_iter()
        .filter(|p| p.is_low_stock())
        .map(|p| p.name)
        .collect();
    info!(?low_stock, "Inventory check");

    session.sign_out()?;
    drop(book);
    backend.shutdown().await?;

    info!("Shopdesk demo completed");
    Ok(())
}
