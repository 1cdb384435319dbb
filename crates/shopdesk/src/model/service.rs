use super::{merge, record_id, require};
use resource_framework::Resource;
use serde::{Deserialize, Serialize};

record_id!(
    /// Type-safe identifier for Services.
    ServiceId,
    "service"
);

/// A service offered to customers, e.g. a repair or an installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub duration_minutes: Option<u32>,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub duration_minutes: Option<u32>,
    pub active: Option<bool>,
}

impl Resource for Service {
    type Id = ServiceId;
    type Create = ServiceCreate;
    type Patch = ServiceUpdate;
    const COLLECTION: &'static str = "services";

    fn id(&self) -> &ServiceId {
        &self.id
    }

    fn from_create(id: ServiceId, params: ServiceCreate) -> Result<Self, String> {
        require("name", &params.name)?;
        if params.price < 0.0 {
            return Err("price must not be negative".to_string());
        }
        Ok(Self {
            id,
            name: params.name,
            description: params.description,
            price: params.price,
            duration_minutes: params.duration_minutes,
            active: true,
        })
    }

    fn apply_patch(&mut self, patch: ServiceUpdate) {
        merge(&mut self.name, patch.name);
        merge(&mut self.price, patch.price);
        merge(&mut self.active, patch.active);
        if patch.description.is_some() {
            self.description = patch.description;
        }
        if patch.duration_minutes.is_some() {
            self.duration_minutes = patch.duration_minutes;
        }
    }
}
