use serde::{Deserialize, Serialize};

use crate::{EntityShape, Record};

use super::default_true;

/// Payment instructions printed at the bottom of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentNote {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub company_id: Option<i64>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl PaymentNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: 0,
            company_id: None,
            title: title.into(),
            content: content.into(),
            is_default: false,
            is_active: true,
        }
    }
}

impl Record for PaymentNote {
    const TYPE_NAME: &'static str = "PaymentNote";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn shape() -> EntityShape {
        EntityShape::new()
            .integer("id")
            .integer("company_id")
            .text("title")
            .text("content")
            .boolean("is_default")
            .boolean("is_active")
    }
}
