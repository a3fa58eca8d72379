use std::fmt;

use serde::{Deserialize, Serialize};

/// Surrogate key assigned by the store. `0` marks a record that was never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub i64);

impl CustomerId {
    pub const UNASSIGNED: Self = Self(0);

    pub fn is_unassigned(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Storage representation of a customer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub tax_id: String,
}

impl Customer {
    pub fn new(name: impl Into<String>, tax_id: impl Into<String>) -> Self {
        Self { id: CustomerId::UNASSIGNED, name: name.into(), tax_id: tax_id.into() }
    }

    pub fn intent(&self) -> MaintainIntent {
        MaintainIntent::from_id(self.id)
    }
}

/// Whether a submitted candidate should be inserted or should overwrite an existing row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaintainIntent {
    Create,
    Update,
}

impl MaintainIntent {
    pub fn from_id(id: CustomerId) -> Self {
        if id.is_unassigned() {
            Self::Create
        } else {
            Self::Update
        }
    }
}

/// Wire representation of a customer, as accepted and returned by the HTTP API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tax_id: String,
}

impl From<Customer> for CustomerDto {
    fn from(customer: Customer) -> Self {
        Self { id: customer.id.0, name: customer.name, tax_id: customer.tax_id }
    }
}

impl From<CustomerDto> for Customer {
    fn from(dto: CustomerDto) -> Self {
        Self { id: CustomerId(dto.id), name: dto.name, tax_id: dto.tax_id }
    }
}
