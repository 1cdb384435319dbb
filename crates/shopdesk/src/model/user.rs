use super::{merge, record_id, require};
use resource_framework::Resource;
use serde::{Deserialize, Serialize};

record_id!(
    /// Type-safe identifier for Users.
    UserId,
    "user"
);

/// Access level of a staff account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    #[default]
    Staff,
}

/// A staff account. Credentials live with the identity provider, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

impl Resource for User {
    type Id = UserId;
    type Create = UserCreate;
    type Patch = UserUpdate;
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &UserId {
        &self.id
    }

    fn from_create(id: UserId, params: UserCreate) -> Result<Self, String> {
        require("name", &params.name)?;
        if !params.email.contains('@') {
            return Err(format!("invalid email: {}", params.email));
        }
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
            role: params.role,
            active: true,
        })
    }

    fn apply_patch(&mut self, patch: UserUpdate) {
        merge(&mut self.name, patch.name);
        merge(&mut self.email, patch.email);
        merge(&mut self.role, patch.role);
        merge(&mut self.active, patch.active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_malformed_email() {
        let params = UserCreate {
            name: "Ana".into(),
            email: "ana.example.com".into(),
            role: Role::Manager,
        };
        assert!(User::from_create(UserId(1), params).is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), serde_json::json!("admin"));
    }
}
