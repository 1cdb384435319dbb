use super::{merge, record_id, CustomerId, ProductId, ServiceId};
use chrono::{DateTime, Utc};
use resource_framework::Resource;
use serde::{Deserialize, Serialize};

record_id!(
    /// Type-safe identifier for ServiceOrders.
    ServiceOrderId,
    "service_order"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceOrderStatus {
    #[default]
    Open,
    InProgress,
    Completed,
    Cancelled,
}

/// A work order: services performed and parts used for one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub id: ServiceOrderId,
    pub customer_id: Option<CustomerId>,
    pub customer_name: Option<String>,
    pub status: ServiceOrderStatus,
    pub notes: Option<String>,
    pub total: f64,
    /// Stored as epoch milliseconds so the host orders it numerically.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceOrderCreate {
    pub customer_id: Option<CustomerId>,
    pub customer_name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceOrderUpdate {
    pub status: Option<ServiceOrderStatus>,
    pub notes: Option<String>,
    pub total: Option<f64>,
}

impl Resource for ServiceOrder {
    type Id = ServiceOrderId;
    type Create = ServiceOrderCreate;
    type Patch = ServiceOrderUpdate;
    const COLLECTION: &'static str = "service_orders";
    const ORDER_BY: &'static str = "created_at";

    fn id(&self) -> &ServiceOrderId {
        &self.id
    }

    fn from_create(id: ServiceOrderId, params: ServiceOrderCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            customer_id: params.customer_id,
            customer_name: params.customer_name,
            status: ServiceOrderStatus::Open,
            notes: params.notes,
            total: 0.0,
            created_at: Utc::now(),
        })
    }

    fn apply_patch(&mut self, patch: ServiceOrderUpdate) {
        merge(&mut self.status, patch.status);
        merge(&mut self.total, patch.total);
        if patch.notes.is_some() {
            self.notes = patch.notes;
        }
    }
}

// --- Line items ---

/// A service performed as part of a service order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrderItem {
    pub id: u32,
    pub service_order_id: ServiceOrderId,
    pub service_id: ServiceId,
    pub service_name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

#[derive(Debug, Clone)]
pub struct ServiceOrderItemCreate {
    pub service_order_id: ServiceOrderId,
    pub service_id: ServiceId,
    pub service_name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// A product consumed by a service order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrderProduct {
    pub id: u32,
    pub service_order_id: ServiceOrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

#[derive(Debug, Clone)]
pub struct ServiceOrderProductCreate {
    pub service_order_id: ServiceOrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// Quantity or price change of an order line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineUpdate {
    pub quantity: Option<u32>,
    pub unit_price: Option<f64>,
}

/// Shared view of both line kinds.
pub trait OrderLine {
    fn quantity(&self) -> u32;
    fn unit_price(&self) -> f64;

    fn subtotal(&self) -> f64 {
        f64::from(self.quantity()) * self.unit_price()
    }
}

fn check_line(quantity: u32, unit_price: f64) -> Result<(), String> {
    if quantity == 0 {
        return Err("quantity must be positive".to_string());
    }
    if unit_price < 0.0 {
        return Err("unit price must not be negative".to_string());
    }
    Ok(())
}

macro_rules! order_line {
    ($line:ident, $create:ident, $collection:literal, $ref_id:ident, $ref_name:ident) => {
        impl OrderLine for $line {
            fn quantity(&self) -> u32 {
                self.quantity
            }

            fn unit_price(&self) -> f64 {
                self.unit_price
            }
        }

        impl Resource for $line {
            type Id = u32;
            type Create = $create;
            type Patch = LineUpdate;
            const COLLECTION: &'static str = $collection;
            const ORDER_BY: &'static str = "id";

            fn id(&self) -> &u32 {
                &self.id
            }

            fn from_create(id: u32, params: $create) -> Result<Self, String> {
                check_line(params.quantity, params.unit_price)?;
                Ok(Self {
                    id,
                    service_order_id: params.service_order_id,
                    $ref_id: params.$ref_id,
                    $ref_name: params.$ref_name,
                    quantity: params.quantity,
                    unit_price: params.unit_price,
                })
            }

            fn apply_patch(&mut self, patch: LineUpdate) {
                merge(&mut self.quantity, patch.quantity);
                merge(&mut self.unit_price, patch.unit_price);
            }
        }
    };
}

order_line!(
    ServiceOrderItem,
    ServiceOrderItemCreate,
    "service_order_items",
    service_id,
    service_name
);
order_line!(
    ServiceOrderProduct,
    ServiceOrderProductCreate,
    "service_order_products",
    product_id,
    product_name
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_orders_start_open_with_zero_total() {
        let order = ServiceOrder::from_create(ServiceOrderId(1), ServiceOrderCreate::default()).unwrap();
        assert_eq!(order.status, ServiceOrderStatus::Open);
        assert_eq!(order.total, 0.0);
    }

    #[test]
    fn created_at_serializes_as_millis() {
        let order = ServiceOrder::from_create(ServiceOrderId(1), ServiceOrderCreate::default()).unwrap();
        let value = serde_json::to_value(&order).unwrap();
        assert!(value["created_at"].is_i64());
    }

    #[test]
    fn zero_quantity_line_is_rejected() {
        let params = ServiceOrderItemCreate {
            service_order_id: ServiceOrderId(1),
            service_id: ServiceId(2),
            service_name: "Alignment".into(),
            quantity: 0,
            unit_price: 80.0,
        };
        assert!(ServiceOrderItem::from_create(1, params).is_err());
    }
}
