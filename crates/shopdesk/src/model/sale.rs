use super::{merge, record_id, CustomerId, ProductId};
use chrono::{NaiveDate, Utc};
use resource_framework::{Query, Resource};
use serde::{Deserialize, Serialize};

record_id!(
    /// Type-safe identifier for Sales.
    SaleId,
    "sale"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Pix,
    BankTransfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    #[default]
    Completed,
    Pending,
    Cancelled,
}

/// One product line of a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl SaleItem {
    pub fn subtotal(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

/// A completed or pending sale.
///
/// `customer_name` is denormalized from the customer record at the time of
/// sale so listings render without a join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub customer_id: Option<CustomerId>,
    pub customer_name: Option<String>,
    pub items: Vec<SaleItem>,
    pub total: f64,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    pub date: NaiveDate,
}

impl Sale {
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SaleCreate {
    pub customer_id: Option<CustomerId>,
    pub customer_name: Option<String>,
    pub items: Vec<SaleItem>,
    pub payment_method: PaymentMethod,
    /// Defaults to today (UTC) when absent.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleUpdate {
    pub payment_method: Option<PaymentMethod>,
    pub status: Option<SaleStatus>,
    pub date: Option<NaiveDate>,
}

pub fn items_total(items: &[SaleItem]) -> f64 {
    items.iter().map(SaleItem::subtotal).sum()
}

impl Resource for Sale {
    type Id = SaleId;
    type Create = SaleCreate;
    type Patch = SaleUpdate;
    const COLLECTION: &'static str = "sales";
    const ORDER_BY: &'static str = "date";

    fn id(&self) -> &SaleId {
        &self.id
    }

    /// Most recent sales first.
    fn default_query() -> Query {
        Query::ordered_by(Self::ORDER_BY).descending()
    }

    fn from_create(id: SaleId, params: SaleCreate) -> Result<Self, String> {
        if params.items.is_empty() {
            return Err("a sale needs at least one item".to_string());
        }
        if params.items.iter().any(|i| i.quantity == 0) {
            return Err("item quantity must be positive".to_string());
        }
        Ok(Self {
            id,
            customer_id: params.customer_id,
            customer_name: params.customer_name,
            total: items_total(&params.items),
            items: params.items,
            payment_method: params.payment_method,
            status: SaleStatus::Completed,
            date: params.date.unwrap_or_else(|| Utc::now().date_naive()),
        })
    }

    fn apply_patch(&mut self, patch: SaleUpdate) {
        merge(&mut self.payment_method, patch.payment_method);
        merge(&mut self.status, patch.status);
        merge(&mut self.date, patch.date);
    }
}
