use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{EntityShape, Record};

/// Money received against an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default)]
    pub id: i64,
    pub invoice_id: i64,
    pub amount: f64,
    pub payment_date: NaiveDate,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl Payment {
    pub fn new(invoice_id: i64, amount: f64, payment_date: NaiveDate) -> Self {
        Self {
            id: 0,
            invoice_id,
            amount,
            payment_date,
            method: None,
            reference: None,
        }
    }
}

impl Record for Payment {
    const TYPE_NAME: &'static str = "Payment";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn shape() -> EntityShape {
        EntityShape::new()
            .integer("id")
            .integer("invoice_id")
            .number("amount")
            .text("payment_date")
            .text("method")
            .text("reference")
    }
}
