use super::{merge, record_id, require};
use resource_framework::Resource;
use serde::{Deserialize, Serialize};

record_id!(
    /// Type-safe identifier for Customers.
    CustomerId,
    "customer"
);

/// A customer of the business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Tax or identity document number.
    pub document: Option<String>,
    pub address: Option<String>,
    pub active: bool,
}

/// Payload for creating a new customer.
#[derive(Debug, Clone, Default)]
pub struct CustomerCreate {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document: Option<String>,
    pub address: Option<String>,
}

impl CustomerCreate {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Payload for updating an existing customer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document: Option<String>,
    pub address: Option<String>,
    pub active: Option<bool>,
}

impl Resource for Customer {
    type Id = CustomerId;
    type Create = CustomerCreate;
    type Patch = CustomerUpdate;
    const COLLECTION: &'static str = "customers";

    fn id(&self) -> &CustomerId {
        &self.id
    }

    fn from_create(id: CustomerId, params: CustomerCreate) -> Result<Self, String> {
        require("name", &params.name)?;
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
            phone: params.phone,
            document: params.document,
            address: params.address,
            active: true,
        })
    }

    fn apply_patch(&mut self, patch: CustomerUpdate) {
        merge(&mut self.name, patch.name);
        merge(&mut self.active, patch.active);
        if patch.email.is_some() {
            self.email = patch.email;
        }
        if patch.phone.is_some() {
            self.phone = patch.phone;
        }
        if patch.document.is_some() {
            self.document = patch.document;
        }
        if patch.address.is_some() {
            self.address = patch.address;
        }
    }
}
