#![allow(dead_code)]

use chrono::NaiveDate;
use invoicekit_model::{EntityShape, FieldShape, Invoice, InvoiceLine, Record};
use serde::{Deserialize, Serialize};

/// Minimal record used to exercise the stores without invoicing semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub value: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl Widget {
    pub fn new(name: &str, value: i64) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            value,
            tags: Vec::new(),
            note: None,
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }
}

impl Record for Widget {
    const TYPE_NAME: &'static str = "Widget";

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
            .integer("value")
            .field("tags", FieldShape::sequence_of(FieldShape::Text))
            .text("note")
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn sample_invoice() -> Invoice {
    let mut invoice = Invoice::new("INV-2024-001", 3, date(2024, 1, 15), date(2024, 2, 14))
        .with_line(InvoiceLine::new("Consulting", 10.0, 95.5))
        .with_line(InvoiceLine {
            tax_rate: 0.21,
            ..InvoiceLine::new("Hosting", 1.0, 20.0)
        });
    invoice.company_id = Some(1);
    invoice.notes = Some("Thanks for your business".into());
    invoice.metadata.insert("po".into(), "PO-77".into());
    invoice
}
