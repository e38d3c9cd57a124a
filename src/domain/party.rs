//! Owner reference shared by addresses and contacts.

use serde::Serialize;

use crate::domain::types::{ClientId, SupplierId, TypeConstraintError};

/// Either a client or a supplier of the same organization.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Party {
    Client(ClientId),
    Supplier(SupplierId),
}

impl Party {
    /// Rebuilds the owner from the two nullable foreign-key columns.
    /// Exactly one must be set.
    pub fn from_columns(
        client_id: Option<i32>,
        supplier_id: Option<i32>,
    ) -> Result<Self, TypeConstraintError> {
        match (client_id, supplier_id) {
            (Some(id), None) => Ok(Party::Client(ClientId::new(id)?)),
            (None, Some(id)) => Ok(Party::Supplier(SupplierId::new(id)?)),
            _ => Err(TypeConstraintError::InvalidValue(
                "address or contact must belong to exactly one party".to_string(),
            )),
        }
    }

    pub fn client_id(self) -> Option<i32> {
        match self {
            Party::Client(id) => Some(id.get()),
            Party::Supplier(_) => None,
        }
    }

    pub fn supplier_id(self) -> Option<i32> {
        match self {
            Party::Supplier(id) => Some(id.get()),
            Party::Client(_) => None,
        }
    }
}
