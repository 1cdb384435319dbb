//! Business records implementing the [`Resource`](resource_framework::Resource) trait.

pub mod customer;
pub mod product;
pub mod sale;
pub mod service;
pub mod service_order;
pub mod supplier;
pub mod user;

pub use customer::*;
pub use product::*;
pub use sale::*;
pub use service::*;
pub use service_order::*;
pub use supplier::*;
pub use user::*;

/// Declares a type-safe `u32` identifier that displays as `<prefix>_<n>`.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }
    };
}
pub(crate) use record_id;

/// Rejects blank required text fields.
pub(crate) fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} is required"))
    } else {
        Ok(())
    }
}

/// Overwrites `slot` when the patch carries a value.
pub(crate) fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_with_prefix() {
        assert_eq!(CustomerId(3).to_string(), "customer_3");
        assert_eq!(SaleId::from(12).to_string(), "sale_12");
    }

    #[test]
    fn ids_serialize_as_plain_numbers() {
        assert_eq!(serde_json::to_value(ProductId(5)).unwrap(), serde_json::json!(5));
    }

    #[test]
    fn require_rejects_whitespace() {
        assert!(require("name", "  ").is_err());
        assert!(require("name", "Acme").is_ok());
    }
}
