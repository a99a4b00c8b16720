use serde::{Deserialize, Serialize};

use conrod_core::{require_text, CustomerId, DomainResult, Entity};

/// A billing party. Deleting one leaves bills that reference it untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    #[serde(default)]
    pub address: String,
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    #[serde(default)]
    pub address: String,
}

impl NewCustomer {
    pub fn validate(&self) -> DomainResult<()> {
        require_text("name", &self.name)
    }

    pub fn into_customer(self, id: CustomerId) -> Customer {
        Customer {
            id,
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
        }
    }
}
