use super::{merge, record_id, require, SupplierId};
use resource_framework::Resource;
use serde::{Deserialize, Serialize};

record_id!(
    /// Type-safe identifier for Products.
    ProductId,
    "product"
);

/// An inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: Option<String>,
    pub price: f64,
    pub cost: f64,
    pub stock: u32,
    /// Reorder threshold.
    pub min_stock: u32,
    pub supplier_id: Option<SupplierId>,
    pub supplier_name: Option<String>,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    pub fn margin(&self) -> f64 {
        self.price - self.cost
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductCreate {
    pub name: String,
    pub sku: Option<String>,
    pub price: f64,
    pub cost: f64,
    pub stock: u32,
    pub min_stock: u32,
    pub supplier_id: Option<SupplierId>,
    pub supplier_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub stock: Option<u32>,
    pub min_stock: Option<u32>,
}

impl Resource for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Patch = ProductUpdate;
    const COLLECTION: &'static str = "products";

    fn id(&self) -> &ProductId {
        &self.id
    }

    fn from_create(id: ProductId, params: ProductCreate) -> Result<Self, String> {
        require("name", &params.name)?;
        if params.price < 0.0 || params.cost < 0.0 {
            return Err("price and cost must not be negative".to_string());
        }
        Ok(Self {
            id,
            name: params.name,
            sku: params.sku,
            price: params.price,
            cost: params.cost,
            stock: params.stock,
            min_stock: params.min_stock,
            supplier_id: params.supplier_id,
            supplier_name: params.supplier_name,
        })
    }

    fn apply_patch(&mut self, patch: ProductUpdate) {
        merge(&mut self.name, patch.name);
        merge(&mut self.price, patch.price);
        merge(&mut self.cost, patch.cost);
        merge(&mut self.stock, patch.stock);
        merge(&mut self.min_stock, patch.min_stock);
        if patch.sku.is_some() {
            self.sku = patch.sku;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_stock_includes_threshold() {
        let mut product = Product::from_create(
            ProductId(1),
            ProductCreate {
                name: "Oil filter".into(),
                price: 30.0,
                cost: 18.0,
                stock: 5,
                min_stock: 5,
                ..ProductCreate::default()
            },
        )
        .unwrap();
        assert!(product.is_low_stock());
        assert_eq!(product.margin(), 12.0);

        product.apply_patch(ProductUpdate {
            stock: Some(6),
            ..ProductUpdate::default()
        });
        assert!(!product.is_low_stock());
    }
}
