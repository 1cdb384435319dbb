//! # Shopdesk
//!
//! Business records and their stores for a small shop: customers, suppliers,
//! services, staff users, sales, inventory and service orders.
//!
//! - **[model]**: record types implementing [`Resource`](resource_framework::Resource)
//! - **[resources]**: one typed [`ResourceStore`](resource_framework::ResourceStore) per collection
//! - **[service_orders]**: orders joined with their service and product lines
//! - **[session]**: who is signed in, verified by an identity provider
//! - **[lifecycle]**: starts and stops the collection hosts
//! - **[config]**: `SHOPDESK_*` environment settings

pub mod config;
pub mod lifecycle;
pub mod model;
pub mod resources;
pub mod service_orders;
pub mod session;
