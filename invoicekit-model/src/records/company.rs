use serde::{Deserialize, Serialize};

use crate::{EntityShape, Record};

use super::default_true;

/// The issuing company printed on invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub legal_name: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_default: bool,
}

impl Company {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            legal_name: None,
            tax_id: None,
            address: None,
            email: None,
            is_active: true,
            is_default: false,
        }
    }
}

impl Record for Company {
    const TYPE_NAME: &'static str = "Company";

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
            .text("legal_name")
            .text("tax_id")
            .text("address")
            .text("email")
            .boolean("is_active")
            .boolean("is_default")
    }
}
