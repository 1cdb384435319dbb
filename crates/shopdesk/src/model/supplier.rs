use super::{merge, record_id, require};
use resource_framework::Resource;
use serde::{Deserialize, Serialize};

record_id!(
    /// Type-safe identifier for Suppliers.
    SupplierId,
    "supplier"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    /// Contact person at the supplier.
    pub contact: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SupplierCreate {
    pub name: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierUpdate {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
}

impl Resource for Supplier {
    type Id = SupplierId;
    type Create = SupplierCreate;
    type Patch = SupplierUpdate;
    const COLLECTION: &'static str = "suppliers";

    fn id(&self) -> &SupplierId {
        &self.id
    }

    fn from_create(id: SupplierId, params: SupplierCreate) -> Result<Self, String> {
        require("name", &params.name)?;
        Ok(Self {
            id,
            name: params.name,
            contact: params.contact,
            email: params.email,
            phone: params.phone,
            category: params.category,
        })
    }

    fn apply_patch(&mut self, patch: SupplierUpdate) {
        merge(&mut self.name, patch.name);
        if patch.contact.is_some() {
            self.contact = patch.contact;
        }
        if patch.email.is_some() {
            self.email = patch.email;
        }
        if patch.phone.is_some() {
            self.phone = patch.phone;
        }
        if patch.category.is_some() {
            self.category = patch.category;
        }
    }
}
