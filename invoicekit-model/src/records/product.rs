use serde::{Deserialize, Serialize};

use crate::{EntityShape, Record};

use super::default_true;

/// A catalogue item that can be put on invoice lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub unit_price: f64,
    #[serde(default)]
    pub tax_rate: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Product {
    pub fn new(name: impl Into<String>, unit_price: f64) -> Self {
        Self {
            id: 0,
            code: None,
            name: name.into(),
            description: None,
            unit_price,
            tax_rate: 0.0,
            category: None,
            is_active: true,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

impl Record for Product {
    const TYPE_NAME: &'static str = "Product";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn shape() -> EntityShape {
        EntityShape::new()
            .integer("id")
            .text("code")
            .text("name")
            .text("description")
            .number("unit_price")
            .number("tax_rate")
            .text("category")
            .boolean("is_active")
    }
}
