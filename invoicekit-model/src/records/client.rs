use serde::{Deserialize, Serialize};

use crate::{EntityShape, Record};

/// A customer invoices are issued to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Client {
    /// Unsaved client; the repository assigns the id on create.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            address: None,
            tax_id: None,
            email: None,
            phone: None,
        }
    }

    #[must_use]
    pub fn with_tax_id(mut self, tax_id: impl Into<String>) -> Self {
        self.tax_id = Some(tax_id.into());
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl Record for Client {
    const TYPE_NAME: &'static str = "Client";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn shape() -> EntityShape {
        EntityShape::new()
            .integer("id")
            .text("name")
            .text("address")
            .text("tax_id")
            .text("email")
            .text("phone")
    }
}
